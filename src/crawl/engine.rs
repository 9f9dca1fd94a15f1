// src/crawl/engine.rs
// =============================================================================
// This module walks a website and saves the images it finds.
//
// How a single page (a Frame) is visited:
// 1. Skip it if it is deeper than the depth limit
// 2. Claim it in the visited set (skip if someone already did)
// 3. Fetch it; a failure abandons only this page
// 4. Download every image it embeds (whitelisted extensions only)
// 5. If recursion is on and we're above the depth limit, turn its same-domain
//    links into child frames
//
// Two drivers run those visits:
// - Sequential: an explicit stack, depth-first, a page's images before its
//   children, first link first. Same order as the obvious recursive version.
// - Concurrent: every frame is a task in a JoinSet, a Semaphore bounds how
//   many are fetching at once, and the crawl ends when the set drains.
//
// In both modes only the driver loop touches the report, so it is a plain
// &mut CrawlReport.
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use super::report::{CrawlReport, Failure, PageVisit, SavedImage};
use super::request::{CrawlMode, CrawlOptions, CrawlRequest, Frame};
use super::visited::VisitedSet;
use crate::fetch::{Downloader, Fetcher};
use crate::page;

pub struct CrawlEngine<F> {
    fetcher: Arc<F>,
    request: CrawlRequest,
    options: CrawlOptions,
}

// Shared, read-mostly state of one running crawl
struct Crawl<F> {
    fetcher: Arc<F>,
    downloader: Downloader<F>,
    scope: Url,
    max_depth: usize,
    follow_links: bool,
    visited: VisitedSet,
    deadline: Option<Instant>,
    image_workers: usize,
}

// What visiting one frame produced
enum Visit {
    Skipped,
    DeadlineReached,
    Failed(Failure),
    Done(PageOutcome),
}

struct PageOutcome {
    page: PageVisit,
    images: Vec<Result<SavedImage, Failure>>,
    children: Vec<Frame>,
    skipped: usize,
}

impl<F: Fetcher + 'static> CrawlEngine<F> {
    pub fn new(fetcher: Arc<F>, request: CrawlRequest, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            request,
            options,
        }
    }

    // Runs the crawl to completion and reports what happened
    //
    // Never fails: per-page and per-image errors end up in the report.
    pub async fn run(self) -> CrawlReport {
        let started = Instant::now();
        let CrawlRequest {
            seed,
            recursion,
            save_path,
        } = self.request;
        let workers = self.options.workers.max(1);

        let crawl = Arc::new(Crawl {
            downloader: Downloader::new(Arc::clone(&self.fetcher), save_path),
            fetcher: self.fetcher,
            scope: seed.clone(),
            max_depth: recursion.max_depth(),
            follow_links: recursion.follows_links(),
            visited: VisitedSet::new(),
            deadline: self.options.deadline.map(|limit| started + limit),
            image_workers: match self.options.mode {
                CrawlMode::Sequential => 1,
                CrawlMode::Concurrent => workers,
            },
        });

        info!(
            "Crawling {} (domain {}, {}, {:?} mode, saving to {})",
            seed,
            page::network_location(&seed).unwrap_or_default(),
            if crawl.follow_links {
                format!("max depth {}", crawl.max_depth)
            } else {
                "no recursion".to_string()
            },
            self.options.mode,
            crawl.downloader.save_path().display()
        );

        let mut report = CrawlReport::new(seed.as_str(), recursion);
        let root = Frame::seed(seed);

        match self.options.mode {
            CrawlMode::Sequential => run_sequential(&crawl, root, &mut report).await,
            CrawlMode::Concurrent => {
                run_concurrent(Arc::clone(&crawl), root, workers, &mut report).await
            }
        }

        info!(
            "Crawl finished in {:.1?}: {} page(s) claimed, {} image(s) saved, {} failure(s)",
            started.elapsed(),
            crawl.visited.len(),
            report.images.len(),
            report.failure_count()
        );

        report
    }
}

async fn run_sequential<F: Fetcher + 'static>(
    crawl: &Crawl<F>,
    root: Frame,
    report: &mut CrawlReport,
) {
    let mut stack = vec![root];

    while let Some(frame) = stack.pop() {
        let children = record(report, crawl.visit(frame).await);
        // Reversed so the first link on the page is popped next
        stack.extend(children.into_iter().rev());
    }
}

async fn run_concurrent<F: Fetcher + 'static>(
    crawl: Arc<Crawl<F>>,
    root: Frame,
    workers: usize,
    report: &mut CrawlReport,
) {
    let permits = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    spawn_visit(&mut tasks, &crawl, &permits, root);

    // Every child is spawned before its parent's task is joined, so an empty
    // set means nothing is pending anywhere.
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(visit) => {
                for child in record(report, visit) {
                    spawn_visit(&mut tasks, &crawl, &permits, child);
                }
            }
            Err(e) => warn!("Crawl task failed: {}", e),
        }
    }
}

fn spawn_visit<F: Fetcher + 'static>(
    tasks: &mut JoinSet<Visit>,
    crawl: &Arc<Crawl<F>>,
    permits: &Arc<Semaphore>,
    frame: Frame,
) {
    let crawl = Arc::clone(crawl);
    let permits = Arc::clone(permits);

    tasks.spawn(async move {
        // The semaphore is never closed, so acquiring only waits
        let _permit = permits.acquire_owned().await.ok();
        crawl.visit(frame).await
    });
}

// Folds one visit into the report and hands back the frames to visit next
fn record(report: &mut CrawlReport, visit: Visit) -> Vec<Frame> {
    match visit {
        Visit::Skipped => Vec::new(),
        Visit::DeadlineReached => {
            if !report.deadline_reached {
                warn!("Crawl deadline reached, no further pages will be fetched");
                report.deadline_reached = true;
            }
            Vec::new()
        }
        Visit::Failed(failure) => {
            report.failed_pages.push(failure);
            Vec::new()
        }
        Visit::Done(outcome) => {
            report.pages.push(outcome.page);
            report.skipped_references += outcome.skipped;
            for image in outcome.images {
                match image {
                    Ok(saved) => report.images.push(saved),
                    Err(failure) => report.failed_images.push(failure),
                }
            }
            outcome.children
        }
    }
}

impl<F: Fetcher> Crawl<F> {
    async fn visit(&self, frame: Frame) -> Visit {
        if frame.depth > self.max_depth {
            debug!("Depth {} exceeds limit, skipping {}", frame.depth, frame.url);
            return Visit::Skipped;
        }

        if self.deadline_passed() {
            return Visit::DeadlineReached;
        }

        // Claimed before the fetch so a concurrent rediscovery can't slip in
        if !self.visited.claim(&frame.url) {
            debug!("Already visited {}", frame.url);
            return Visit::Skipped;
        }

        info!("Crawling [depth {}]: {}", frame.depth, frame.url);

        let body = match self.fetcher.fetch(&frame.url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch {}: {}", frame.url, e);
                return Visit::Failed(Failure {
                    url: frame.url.to_string(),
                    error: e.to_string(),
                });
            }
        };

        let refs = page::extract(&String::from_utf8_lossy(&body));
        let mut skipped = 0;

        let image_urls = self.image_targets(&frame, &refs.images, &mut skipped);
        let images = self.download_all(image_urls).await;

        let children = if self.follow_links && frame.depth < self.max_depth {
            self.child_frames(&frame, &refs.links, &mut skipped)
        } else {
            Vec::new()
        };

        Visit::Done(PageOutcome {
            page: PageVisit {
                url: frame.url.to_string(),
                depth: frame.depth,
            },
            images,
            children,
            skipped,
        })
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    // Resolves raw <img src> values and keeps the downloadable ones
    fn image_targets(&self, frame: &Frame, raw: &[String], skipped: &mut usize) -> Vec<Url> {
        let mut targets = Vec::new();

        for reference in raw {
            let url = match page::resolve(&frame.url, reference) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping image on {}: {}", frame.url, e);
                    *skipped += 1;
                    continue;
                }
            };

            if !page::is_fetchable(&url) || !page::is_downloadable_image(&url) {
                debug!("Not a downloadable image: {}", url);
                *skipped += 1;
                continue;
            }

            targets.push(url);
        }

        targets
    }

    // Resolves raw <a href> values into same-domain child frames
    //
    // Domain scoping happens only after resolution: a relative href has no
    // host to compare.
    fn child_frames(&self, frame: &Frame, raw: &[String], skipped: &mut usize) -> Vec<Frame> {
        let mut children = Vec::new();

        for reference in raw {
            let url = match page::resolve(&frame.url, reference) {
                Ok(url) => page::without_fragment(url),
                Err(e) => {
                    debug!("Skipping link on {}: {}", frame.url, e);
                    *skipped += 1;
                    continue;
                }
            };

            if !page::is_fetchable(&url) || !page::is_same_domain(&url, &self.scope) {
                debug!("Outside crawl domain: {}", url);
                *skipped += 1;
                continue;
            }

            if self.visited.contains(&url) {
                debug!("Already visited {}", url);
                continue;
            }

            children.push(frame.child(url));
        }

        children
    }

    // Downloads a page's images, at most `image_workers` at a time
    //
    // Results come back in document order whatever order they finish in.
    async fn download_all(&self, urls: Vec<Url>) -> Vec<Result<SavedImage, Failure>> {
        let downloads: Vec<_> = urls.into_iter().map(|url| self.download_one(url)).collect();

        stream::iter(downloads)
            .buffered(self.image_workers)
            .collect()
            .await
    }

    async fn download_one(&self, url: Url) -> Result<SavedImage, Failure> {
        match self.downloader.download(&url).await {
            Ok(path) => {
                info!("Saved {} -> {}", url, path.display());
                Ok(SavedImage {
                    url: url.to_string(),
                    path,
                })
            }
            Err(e) => {
                warn!("Failed to download {}: {}", url, e);
                Err(Failure {
                    url: url.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }
}
