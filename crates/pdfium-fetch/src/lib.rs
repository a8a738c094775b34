//! # pdfium-fetch
//!
//! Finds a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render`, downloading a pinned build into a per-user
//! cache when none is present.
//!
//! Lookup order used by [`bind`]:
//!
//! 1. `PDFIUM_LIB_PATH`: explicit path to `libpdfium.{so,dylib}` / `pdfium.dll`.
//! 2. The cache directory returned by [`cache_dir`].
//! 3. The system library search path.
//!
//! [`ensure_library`] additionally downloads the platform archive from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//! into the cache when steps 1 and 2 come up empty. [`locate`] checks the
//! system library before falling back to that download.
//!
//! ```rust,no_run
//! let path = pdfium_fetch::ensure_library(Some(&|done, total| {
//!     if let Some(t) = total {
//!         eprint!("\rPDFium: {done}/{t} bytes");
//!     }
//! }))?;
//! let pdfium = pdfium_fetch::bind_from_path(&path)?;
//! # Ok::<(), pdfium_fetch::FetchError>(())
//! ```
//!
//! Environment overrides:
//!
//! - `PDFIUM_LIB_PATH`: use this library, never download.
//! - `PDFIUM_FETCH_CACHE_DIR`: cache root instead of the user cache dir.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

/// pdfium-binaries release tag (`chromium/<VERSION>`) fetched by [`ensure_library`].
pub const PDFIUM_VERSION: &str = "7690";

const RELEASES_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";
const CACHE_DIR_ENV: &str = "PDFIUM_FETCH_CACHE_DIR";

/// Read buffer size for the streaming download.
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors from locating, downloading or binding PDFium.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No pdfium-binaries build exists for this OS/architecture pair.
    #[error("No PDFium build available for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The cache directory could not be created.
    #[error("Cannot create PDFium cache directory '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request or body read failed.
    #[error("PDFium download failed: {0}")]
    Download(String),

    /// The downloaded archive was unreadable or lacked the library.
    #[error("PDFium archive extraction failed: {0}")]
    Extract(String),

    /// `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from {location}: {reason}")]
    Bind { location: String, reason: String },
}

/// Release asset and in-archive member for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformBuild {
    pub archive: &'static str,
    pub member: &'static str,
    pub file_name: &'static str,
}

const PLATFORM_BUILDS: &[(&str, &str, PlatformBuild)] = &[
    ("macos", "aarch64", build("pdfium-mac-arm64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib")),
    ("macos", "x86_64", build("pdfium-mac-x64.tgz", "lib/libpdfium.dylib", "libpdfium.dylib")),
    ("linux", "x86_64", build("pdfium-linux-x64.tgz", "lib/libpdfium.so", "libpdfium.so")),
    ("linux", "aarch64", build("pdfium-linux-arm64.tgz", "lib/libpdfium.so", "libpdfium.so")),
    ("windows", "x86_64", build("pdfium-win-x64.tgz", "bin/pdfium.dll", "pdfium.dll")),
    ("windows", "aarch64", build("pdfium-win-arm64.tgz", "bin/pdfium.dll", "pdfium.dll")),
    ("windows", "x86", build("pdfium-win-x86.tgz", "bin/pdfium.dll", "pdfium.dll")),
];

const fn build(archive: &'static str, member: &'static str, file_name: &'static str) -> PlatformBuild {
    PlatformBuild {
        archive,
        member,
        file_name,
    }
}

/// Look up the pdfium-binaries asset for an OS/arch pair
/// (values as in [`std::env::consts`]).
pub fn platform_build(os: &str, arch: &str) -> Result<PlatformBuild, FetchError> {
    PLATFORM_BUILDS
        .iter()
        .find(|(o, a, _)| *o == os && *a == arch)
        .map(|(_, _, b)| *b)
        .ok_or_else(|| FetchError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

fn current_build() -> Result<PlatformBuild, FetchError> {
    platform_build(std::env::consts::OS, std::env::consts::ARCH)
}

/// Versioned cache directory, e.g. `~/.cache/pdf2pptx/pdfium-7690/` on Linux.
pub fn cache_dir() -> PathBuf {
    let root = match std::env::var_os(CACHE_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .unwrap_or_else(std::env::temp_dir)
            .join("pdf2pptx"),
    };
    root.join(format!("pdfium-{PDFIUM_VERSION}"))
}

fn env_library() -> Option<PathBuf> {
    std::env::var_os(LIB_PATH_ENV)
        .map(PathBuf::from)
        .filter(|p| p.is_file())
}

/// Path of an already-available library (env override or cache), if any.
pub fn cached_library_path() -> Option<PathBuf> {
    env_library().or_else(|| {
        let build = current_build().ok()?;
        Some(cache_dir().join(build.file_name)).filter(|p| p.is_file())
    })
}

/// `true` when [`ensure_library`] would not touch the network.
pub fn is_cached() -> bool {
    cached_library_path().is_some()
}

static RESOLVED: OnceLock<PathBuf> = OnceLock::new();

/// Return a local PDFium library path, downloading it on first use.
///
/// `on_progress` receives `(bytes_downloaded, content_length)`.
pub fn ensure_library(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, FetchError> {
    if let Some(path) = RESOLVED.get() {
        return Ok(path.clone());
    }

    let path = match cached_library_path() {
        Some(path) => path,
        None => {
            if let Some(missing) = std::env::var_os(LIB_PATH_ENV) {
                warn!(
                    "{LIB_PATH_ENV}={} does not exist; downloading PDFium instead",
                    Path::new(&missing).display()
                );
            }
            download_into_cache(on_progress)?
        }
    };

    let _ = RESOLVED.set(path.clone());
    Ok(path)
}

/// Bind to the library at `path`.
pub fn bind_from_path(path: &Path) -> Result<Pdfium, FetchError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| FetchError::Bind {
            location: format!("'{}'", path.display()),
            reason: e.to_string(),
        })
}

/// Bind without downloading: env override, then cache, then system library.
pub fn bind() -> Result<Pdfium, FetchError> {
    if let Some(path) = cached_library_path() {
        debug!("Binding PDFium from {}", path.display());
        return bind_from_path(&path);
    }
    debug!("Binding system PDFium library");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| FetchError::Bind {
            location: "the system library path".to_string(),
            reason: e.to_string(),
        })
}

/// Where [`locate`] found a usable PDFium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Library {
    /// A library file: env override, cache entry, or fresh download.
    Path(PathBuf),
    /// Loadable from the system library search path.
    System,
}

/// `true` when `pdfium-render` can load PDFium from the system search path.
pub fn system_library_available() -> bool {
    Pdfium::bind_to_system_library().is_ok()
}

/// Find PDFium in the same order as [`bind`], downloading into the cache
/// only when neither the cache nor the system library has one.
pub fn locate(on_progress: Option<&dyn Fn(u64, Option<u64>)>) -> Result<Library, FetchError> {
    locate_with(cached_library_path(), system_library_available, || {
        ensure_library(on_progress)
    })
}

fn locate_with(
    cached: Option<PathBuf>,
    system_available: impl FnOnce() -> bool,
    download: impl FnOnce() -> Result<PathBuf, FetchError>,
) -> Result<Library, FetchError> {
    if let Some(path) = cached {
        return Ok(Library::Path(path));
    }
    if system_available() {
        debug!("Using system PDFium library");
        return Ok(Library::System);
    }
    download().map(Library::Path)
}

fn download_into_cache(
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<PathBuf, FetchError> {
    let build = current_build()?;
    let dir = cache_dir();
    std::fs::create_dir_all(&dir).map_err(|source| FetchError::CacheDir {
        path: dir.clone(),
        source,
    })?;

    let url = format!(
        "{RELEASES_URL}/chromium%2F{PDFIUM_VERSION}/{}",
        build.archive
    );
    info!("Downloading PDFium from {url}");

    let archive = fetch(&url, on_progress)?;
    let target = dir.join(build.file_name);
    unpack_member(&archive, build.member, &target)?;

    info!("PDFium cached at {}", target.display());
    Ok(target)
}

fn fetch(url: &str, on_progress: Option<&dyn Fn(u64, Option<u64>)>) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-fetch/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| FetchError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| FetchError::Download(format!("GET {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Download(format!("HTTP {status} for {url}")));
    }

    let total = response.content_length();
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut received: u64 = 0;

    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FetchError::Download(format!("reading body: {e}"))),
        };
        body.extend_from_slice(&chunk[..n]);
        received += n as u64;
        if let Some(report) = on_progress {
            report(received, total);
        }
    }

    debug!("Downloaded {received} bytes");
    Ok(body)
}

/// Extract the single archive entry named `member` from a `.tgz` into `target`.
fn unpack_member(tgz: &[u8], member: &str, target: &Path) -> Result<(), FetchError> {
    let extract_err = |e: std::io::Error| FetchError::Extract(e.to_string());
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(tgz));

    for entry in archive.entries().map_err(extract_err)? {
        let mut entry = entry.map_err(extract_err)?;
        let matches = entry.path().map_err(extract_err)? == Path::new(member);
        if matches {
            entry.unpack(target).map_err(extract_err)?;
            return Ok(());
        }
    }

    Err(FetchError::Extract(format!("'{member}' not present in archive")))
}
