//! Image resolution.
//!
//! Image sources in rendered chapters come in three shapes: remote `http(s)`
//! URLs, which are downloaded into the book's temp folder; `app://` URIs,
//! whose path names a vault file directly; and everything else, which is a
//! path relative to the vault. Each resolves to a file on disk whose bytes are
//! read when the book is assembled.

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Name of the per-book download folder.
pub const TEMP_DIR: &str = "binder-temp";

/// Fetches remote bytes.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<HttpFetcher> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build image download client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .with_context(|| format!("GET {url}"))?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("download failed ({status})");
        }
        let bytes = response.bytes().context("Failed to read response body")?;
        Ok(bytes.to_vec())
    }
}

#[derive(Default)]
struct Downloads {
    /// url -> local file
    by_url: HashMap<String, PathBuf>,
    /// file names already used in the temp folder
    names: HashSet<String>,
}

pub struct ResourceResolver {
    vault: PathBuf,
    temp_dir: PathBuf,
    fetcher: Box<dyn Fetch>,
    downloads: Mutex<Downloads>,
}

/// Decode a percent-encoded path.
fn decode(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

impl ResourceResolver {
    pub fn new(vault: PathBuf, temp_dir: PathBuf, fetcher: Box<dyn Fetch>) -> ResourceResolver {
        ResourceResolver {
            vault,
            temp_dir,
            fetcher,
            downloads: Mutex::new(Downloads::default()),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Resolve an image source to a local file.
    pub fn resolve(&self, source: &str) -> Result<PathBuf> {
        let source = source.trim();
        let path = match Url::parse(source) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                return self.download(&url);
            }
            Ok(url) if url.scheme() == "app" => {
                let decoded = decode(url.path());
                let direct = PathBuf::from(&decoded);
                if direct.is_file() {
                    direct
                } else {
                    self.vault.join(decoded.trim_start_matches('/'))
                }
            }
            _ => self.vault.join(decode(source)),
        };

        if !path.is_file() {
            anyhow::bail!("{} does not exist", path.display());
        }
        Ok(path)
    }

    fn download(&self, url: &Url) -> Result<PathBuf> {
        let key = url.as_str().to_string();
        if let Some(path) = self.lock().by_url.get(&key) {
            return Ok(path.clone());
        }

        let bytes = self
            .fetcher
            .fetch(url)
            .with_context(|| format!("Failed to download {url}"))?;

        std::fs::create_dir_all(&self.temp_dir)
            .with_context(|| format!("Failed to create {}", self.temp_dir.display()))?;

        let mut downloads = self.lock();
        if let Some(path) = downloads.by_url.get(&key) {
            return Ok(path.clone());
        }
        let name = unique_name(&downloads.names, &download_name(url));
        let path = self.temp_dir.join(&name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("downloaded {url} to {}", path.display());

        downloads.names.insert(name);
        downloads.by_url.insert(key, path.clone());
        Ok(path)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Downloads> {
        // a panic while holding the lock leaves the maps consistent
        self.downloads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Delete the temp folder and everything in it.
    pub fn cleanup(&self) -> Result<()> {
        if self.temp_dir.exists() {
            std::fs::remove_dir_all(&self.temp_dir)
                .with_context(|| format!("Failed to remove {}", self.temp_dir.display()))?;
        }
        let mut downloads = self.lock();
        downloads.by_url.clear();
        downloads.names.clear();
        Ok(())
    }
}

/// The last path segment of the URL, or `image` when there is none.
fn download_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(decode)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "image".to_string())
}

/// `name`, or `stem-2.ext`, `stem-3.ext`, … when `name` is taken.
pub fn unique_name(taken: &HashSet<String>, name: &str) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (2..)
        .map(|n| match &ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Book-wide names for bundled images.
///
/// The same file always gets the same name; different files that share a
/// basename get numbered names.
#[derive(Debug, Default)]
pub struct ResourceNames {
    by_path: HashMap<PathBuf, String>,
    taken: HashSet<String>,
}

impl ResourceNames {
    /// Name for `path`, and whether it is new to the book.
    pub fn register(&mut self, path: &Path) -> (String, bool) {
        if let Some(name) = self.by_path.get(path) {
            return (name.clone(), false);
        }
        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let name = unique_name(&self.taken, &base);
        self.taken.insert(name.clone());
        self.by_path.insert(path.to_path_buf(), name.clone());
        (name, true)
    }
}

/// Guess a MIME type from a file extension.
pub fn mime_from_path<P: AsRef<Path>>(path: P) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed bytes for every URL, or fails when `fail` is set.
    pub(crate) struct StaticFetcher {
        pub bytes: Vec<u8>,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn serving(bytes: &[u8]) -> StaticFetcher {
            StaticFetcher {
                bytes: bytes.to_vec(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> StaticFetcher {
            StaticFetcher {
                bytes: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetch for StaticFetcher {
        fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused: {url}");
            }
            Ok(self.bytes.clone())
        }
    }

    fn resolver(vault: &Path, fetcher: StaticFetcher) -> ResourceResolver {
        ResourceResolver::new(
            vault.to_path_buf(),
            vault.join("book").join(TEMP_DIR),
            Box::new(fetcher),
        )
    }

    #[test]
    fn can_download_remote_images() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path(), StaticFetcher::serving(b"png"));
        let path = resolver.resolve("https://example.com/img/a.png?size=2").unwrap();
        assert_eq!(path, vault.path().join("book").join(TEMP_DIR).join("a.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png");

        let again = resolver.resolve("https://example.com/img/a.png?size=2").unwrap();
        assert_eq!(again, path);
        let other = resolver.resolve("https://mirror.example.com/a.png").unwrap();
        assert_eq!(other.file_name().unwrap(), "a-2.png");
    }

    #[test]
    fn failed_download_is_an_error() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path(), StaticFetcher::failing());
        let error = resolver.resolve("http://example.com/a.png").unwrap_err();
        assert!(format!("{error:#}").contains("Failed to download http://example.com/a.png"));
        assert!(!resolver.temp_dir().exists());
    }

    #[test]
    fn can_resolve_vault_paths() {
        let vault = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(vault.path().join("art")).unwrap();
        std::fs::write(vault.path().join("art/map 1.png"), b"map").unwrap();
        let resolver = resolver(vault.path(), StaticFetcher::failing());

        let path = resolver.resolve("art/map%201.png").unwrap();
        assert_eq!(path, vault.path().join("art/map 1.png"));
        assert!(resolver.resolve("art/missing.png").is_err());
    }

    #[test]
    fn app_uris_name_files_directly() {
        let vault = tempfile::tempdir().unwrap();
        let file = vault.path().join("cover art.png");
        std::fs::write(&file, b"cover").unwrap();
        let resolver = resolver(vault.path(), StaticFetcher::failing());

        let uri = format!("app://local{}", file.to_string_lossy().replace(' ', "%20"));
        let resolved = resolver.resolve(&uri).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "cover art.png");
    }

    #[test]
    fn cleanup_removes_downloads() {
        let vault = tempfile::tempdir().unwrap();
        let resolver = resolver(vault.path(), StaticFetcher::serving(b"x"));
        resolver.resolve("https://example.com/a.png").unwrap();
        assert!(resolver.temp_dir().exists());
        resolver.cleanup().unwrap();
        assert!(!resolver.temp_dir().exists());
        resolver.cleanup().unwrap();
    }

    #[test]
    fn shared_basenames_get_distinct_names() {
        let mut names = ResourceNames::default();
        assert_eq!(names.register(Path::new("a/cover.png")), ("cover.png".to_string(), true));
        assert_eq!(names.register(Path::new("b/cover.png")), ("cover-2.png".to_string(), true));
        assert_eq!(names.register(Path::new("a/cover.png")), ("cover.png".to_string(), false));
    }

    #[test]
    fn can_guess_mime_types() {
        assert_eq!(mime_from_path("a.PNG"), "image/png");
        assert_eq!(mime_from_path("a.jpeg"), "image/jpeg");
        assert_eq!(mime_from_path("a"), "application/octet-stream");
    }
}
