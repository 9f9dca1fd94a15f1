// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG overrides the default "info" level)
// 2. Parse command-line arguments using clap (usage errors exit with 2)
// 3. Validate the seed URL and build the HTTP fetcher
// 4. Run the crawl and print what it did
// 5. Exit with proper code (0 = crawl ran, 2 = usage or start-up error)
//
// A crawl that ran always exits 0, even if some pages or images failed.
// Those failures are logged as they happen and listed in the report.
// =============================================================================

mod cli;
mod crawl;
mod error;
mod fetch;
mod page;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use crawl::{CrawlEngine, CrawlReport, CrawlRequest};
use fetch::HttpFetcher;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Prints usage and exits with code 2 on bad arguments
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Everything that can fail happens before the crawl starts
async fn run(cli: Cli) -> Result<()> {
    let request = CrawlRequest::new(&cli.url, cli.recursion(), &cli.path)?;
    let options = cli.options();
    let fetcher = Arc::new(HttpFetcher::new(options.request_timeout)?);

    if !cli.json {
        println!("🔍 Crawling: {}", request.seed);
        if request.recursion.follows_links() {
            println!("📊 Max depth: {}", request.recursion.max_depth());
        } else {
            println!("📊 Single page (no recursion)");
        }
        println!("📁 Saving images to: {}\n", request.save_path.display());
    }

    let report = CrawlEngine::new(fetcher, request, options).run().await;

    print_report(&report, cli.json)
}

// Prints the report either as a summary or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &CrawlReport) {
    if !report.images.is_empty() {
        println!("{:<60} {:<40}", "IMAGE", "SAVED AS");
        println!("{}", "=".repeat(100));

        for image in &report.images {
            println!("{:<60} {:<40}", truncate(&image.url, 57), image.path.display());
        }
        println!();
    }

    for failure in report.failed_pages.iter().chain(&report.failed_images) {
        println!("❌ {} ({})", truncate(&failure.url, 57), failure.error);
    }

    println!("📊 Summary:");
    println!("   📄 Pages crawled: {}", report.pages.len());
    println!("   🖼️  Images saved: {}", report.images.len());
    println!("   ❌ Failed: {}", report.failure_count());
    println!("   ⏭️  Skipped references: {}", report.skipped_references);
    if report.deadline_reached {
        println!("   ⏱️  Deadline reached before the crawl finished");
    }
}

// Keeps long URLs from breaking the table layout
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let cut: String = url.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_url_untouched() {
        assert_eq!(truncate("https://x.test/", 57), "https://x.test/");
    }

    #[test]
    fn test_truncate_long_url() {
        let long = format!("https://x.test/{}", "a".repeat(100));
        let shown = truncate(&long, 57);
        assert_eq!(shown.chars().count(), 60);
        assert!(shown.ends_with("..."));
    }
}
