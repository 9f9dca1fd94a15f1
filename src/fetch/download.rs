// src/fetch/download.rs
// =============================================================================
// Saves images under the output directory.
//
// How a file gets its name:
// 1. Take the last path segment of the image URL ("a/b/cat.jpg" -> "cat.jpg")
// 2. Percent-decode it when the result is still a plain file name
// 3. If the segment is empty, use a hash of the URL plus ".jpg"
// 4. If a *different* URL already claimed that name during this crawl,
//    append a counter: "cat-1.jpg", "cat-2.jpg", ...
//
// The same URL downloaded twice (it appears on two pages) keeps its name and
// is simply written again. Files left over from earlier runs are overwritten.
// =============================================================================

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use url::Url;

use super::Fetcher;
use crate::error::CrawlError;

const FALLBACK_EXTENSION: &str = "jpg";

pub struct Downloader<F> {
    fetcher: Arc<F>,
    save_path: PathBuf,
    // file name -> URL that owns it for this crawl
    claimed: DashMap<String, String>,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: Arc<F>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            save_path: save_path.into(),
            claimed: DashMap::new(),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    // Fetches one image and writes it to disk
    //
    // Returns the path the bytes were written to. Any failure abandons just
    // this image; the caller logs it and moves on.
    pub async fn download(&self, image_url: &Url) -> Result<PathBuf, CrawlError> {
        let bytes = self.fetcher.fetch(image_url).await?;

        let name = self.claim_name(image_url, derive_filename(image_url));
        let path = self.save_path.join(&name);

        tokio::fs::create_dir_all(&self.save_path)
            .await
            .map_err(|e| CrawlError::io(&self.save_path, e))?;

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CrawlError::io(&path, e))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    // Reserves a file name for `url`, suffixing a counter on collision
    //
    // The DashMap entry lock makes check-and-claim a single step, so two
    // concurrent downloads can never end up with the same name.
    fn claim_name(&self, url: &Url, name: String) -> String {
        let (stem, extension) = split_name(&name);

        let mut n = 0usize;
        loop {
            let candidate = if n == 0 {
                name.clone()
            } else {
                match &extension {
                    Some(ext) => format!("{}-{}.{}", stem, n, ext),
                    None => format!("{}-{}", stem, n),
                }
            };

            match self.claimed.entry(candidate.clone()) {
                Entry::Occupied(owner) if owner.get() == url.as_str() => return candidate,
                Entry::Occupied(_) => n += 1,
                Entry::Vacant(slot) => {
                    slot.insert(url.to_string());
                    return candidate;
                }
            }
        }
    }
}

// The file name an image URL maps to, before collision handling
pub fn derive_filename(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    if segment.is_empty() {
        return hashed_name(url);
    }

    match urlencoding::decode(segment) {
        Ok(decoded) if is_plain_file_name(&decoded) => decoded.into_owned(),
        _ => segment.to_string(),
    }
}

fn hashed_name(url: &Url) -> String {
    let mut hasher = DefaultHasher::new();
    url.as_str().hash(&mut hasher);
    format!("{:016x}.{}", hasher.finish(), FALLBACK_EXTENSION)
}

// A decoded segment must still be a single, harmless path component
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn split_name(name: &str) -> (String, Option<String>) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_last_segment_is_name() {
        assert_eq!(derive_filename(&url("https://x.test/a/b/cat.jpg")), "cat.jpg");
    }

    #[test]
    fn test_query_not_in_name() {
        assert_eq!(derive_filename(&url("https://x.test/dog.png?w=10")), "dog.png");
    }

    #[test]
    fn test_percent_decoded_name() {
        assert_eq!(
            derive_filename(&url("https://x.test/my%20cat.gif")),
            "my cat.gif"
        );
    }

    #[test]
    fn test_encoded_slash_kept_encoded() {
        assert_eq!(
            derive_filename(&url("https://x.test/a%2Fb.png")),
            "a%2Fb.png"
        );
    }

    #[test]
    fn test_trailing_slash_gets_hashed_name() {
        let name = derive_filename(&url("https://x.test/gallery/"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 16 + ".jpg".len());
        // Stable for the same URL, different for another
        assert_eq!(name, derive_filename(&url("https://x.test/gallery/")));
        assert_ne!(name, derive_filename(&url("https://x.test/other/")));
    }

    #[tokio::test]
    async fn test_download_creates_directory_and_writes_bytes() {
        let dir = TempDir::new().unwrap();
        let save_path = dir.path().join("nested").join("out");
        let fetcher = StaticFetcher::new().body("https://x.test/cat.jpg", vec![1, 2, 3]);
        let downloader = Downloader::new(Arc::new(fetcher), &save_path);

        let path = downloader.download(&url("https://x.test/cat.jpg")).await.unwrap();

        assert_eq!(path, save_path.join("cat.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_transport_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::new().failing("https://x.test/cat.jpg", "connection refused");
        let downloader = Downloader::new(Arc::new(fetcher), dir.path().join("out"));

        let err = downloader
            .download(&url("https://x.test/cat.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Transport { .. }));
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_colliding_names_get_counter() {
        let dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::new()
            .body("https://x.test/a/cat.jpg", b"first".to_vec())
            .body("https://x.test/b/cat.jpg", b"second".to_vec());
        let downloader = Downloader::new(Arc::new(fetcher), dir.path());

        let first = downloader.download(&url("https://x.test/a/cat.jpg")).await.unwrap();
        let second = downloader.download(&url("https://x.test/b/cat.jpg")).await.unwrap();

        assert_eq!(first, dir.path().join("cat.jpg"));
        assert_eq!(second, dir.path().join("cat-1.jpg"));
        assert_eq!(std::fs::read(&first).unwrap(), b"first");
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_same_url_keeps_its_name() {
        let dir = TempDir::new().unwrap();
        let fetcher = StaticFetcher::new().body("https://x.test/cat.jpg", b"meow".to_vec());
        let downloader = Downloader::new(Arc::new(fetcher), dir.path());

        let first = downloader.download(&url("https://x.test/cat.jpg")).await.unwrap();
        let again = downloader.download(&url("https://x.test/cat.jpg")).await.unwrap();

        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn test_write_failure_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the output directory should be
        let blocker = dir.path().join("out");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let fetcher = StaticFetcher::new().body("https://x.test/cat.jpg", vec![0]);
        let downloader = Downloader::new(Arc::new(fetcher), &blocker);

        let err = downloader
            .download(&url("https://x.test/cat.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Io { .. }));
    }
}
