// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   crawl [-r] [-l N] [-p PATH] URL
//
// clap handles every usage error for us: a missing URL, a non-numeric depth,
// or -l given without -r all print a usage message and exit with code 2
// before any crawling starts.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::crawl::{CrawlMode, CrawlOptions, Recursion};

// Depth used when -r is given without -l
pub const DEFAULT_DEPTH: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "crawl",
    version,
    about = "Download the images of a web page, optionally following its links",
    long_about = "crawl fetches a page, saves every .jpg/.jpeg/.png/.gif/.bmp image it embeds, \
                  and with -r follows links on the same domain up to a depth limit. \
                  Failed pages and images are logged and skipped; the crawl always finishes."
)]
pub struct Cli {
    /// Follow same-domain links recursively (default: only the given page)
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Maximum recursion depth (default: 5). Only valid together with -r
    ///
    /// Depth 0 = just the starting page
    /// Depth 1 = starting page + the pages it links to
    #[arg(short = 'l', long = "level", value_name = "N", requires = "recursive")]
    pub level: Option<usize>,

    /// Directory downloaded images are saved to (created if missing)
    #[arg(short = 'p', long = "path", value_name = "PATH", default_value = "./data/")]
    pub path: PathBuf,

    /// Run pages one at a time, or on a bounded pool of workers
    #[arg(long, value_enum, default_value_t = CrawlMode::Sequential)]
    pub mode: CrawlMode,

    /// Maximum pages fetched at once in concurrent mode
    #[arg(long, value_name = "N", default_value_t = 8)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Stop fetching new pages after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Page to start from (e.g., https://example.com)
    #[arg(value_name = "URL")]
    pub url: String,
}

impl Cli {
    // Recursion is only switched on by -r; -l alone never gets this far
    pub fn recursion(&self) -> Recursion {
        if self.recursive {
            Recursion::Enabled {
                max_depth: self.level.unwrap_or(DEFAULT_DEPTH),
            }
        } else {
            Recursion::Disabled
        }
    }

    pub fn options(&self) -> CrawlOptions {
        CrawlOptions {
            mode: self.mode,
            workers: self.workers.max(1),
            request_timeout: Duration::from_secs(self.timeout),
            deadline: self.deadline.map(Duration::from_secs),
        }
    }
}
