// src/fetch/http.rs
// =============================================================================
// The network-backed Fetcher.
//
// Key functionality:
// - One reqwest Client for the whole crawl (connection pooling)
// - Per-request timeout from the command line
// - Non-2xx statuses are failures, not error-page bodies
//
// Rust concepts:
// - async_trait: lets a trait have async methods
// - map_err: converts reqwest errors into our own error type
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::Fetcher;
use crate::error::CrawlError;

const USER_AGENT: &str = concat!("image-crawler/", env!("CARGO_PKG_VERSION"));

// Follow up to this many redirects before giving up
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared client
    //
    // Parameters:
    //   timeout: applies to each request (connect + body)
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, CrawlError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CrawlError::transport(url.as_str(), describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::transport(url.as_str(), format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CrawlError::transport(url.as_str(), describe(&e)))?;

        Ok(body.to_vec())
    }
}

// Short, stable reason strings for the common reqwest failure modes
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html>hello</html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let body = fetcher().fetch(&url).await.unwrap();

        assert_eq!(body, b"<html>hello</html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("Not here")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();

        match err {
            CrawlError::Transport { reason, .. } => assert!(reason.contains("404")),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/boom")
            .with_status(500)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/boom", server.url())).unwrap();
        assert!(fetcher().fetch(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is almost never listening on a test machine
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, CrawlError::Transport { .. }));
    }
}
