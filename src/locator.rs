//! Addresses for catalog documents and media files.
//!
//! A `Locator` is either an `http(s)` URL or a filesystem path. Catalog
//! documents and the media files they reference are both read through it,
//! so a catalog served over HTTP can point at songs on the same server and
//! a catalog on disk can point at files next to it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

/// Upper bound on a media body downloaded into memory.
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("invalid URL {raw:?}: {source}")]
    Url {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error! Status: {0}")]
    Status(u16),

    #[error("HTTP request failed: {0}")]
    Http(ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Status(code),
            ureq::Error::Io(io) => Self::Io(io),
            other => Self::Http(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Path(PathBuf),
    Url(Url),
}

fn is_http(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl Locator {
    /// Parse a locator: `http://` and `https://` become URLs, anything else a path.
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        if is_http(raw) {
            let url = Url::parse(raw.trim()).map_err(|source| LocatorError::Url {
                raw: raw.to_string(),
                source,
            })?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::Path(PathBuf::from(raw)))
        }
    }

    /// Parse a locator naming a directory. URLs get a trailing slash so that
    /// joining keeps the last path segment.
    pub fn parse_dir(raw: &str) -> Result<Self, LocatorError> {
        match Self::parse(raw)? {
            Self::Url(mut url) => {
                if !url.path().ends_with('/') {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                Ok(Self::Url(url))
            }
            path => Ok(path),
        }
    }

    /// Resolve `reference` as an entry inside this directory locator.
    pub fn join_child(&self, reference: &str) -> Result<Self, LocatorError> {
        match self {
            Self::Path(dir) => Self::join_path(dir, reference),
            Self::Url(base) => Self::join_url(base, reference),
        }
    }

    /// Resolve `reference` relative to the document this locator names
    /// (its directory for paths, standard URL resolution for URLs).
    pub fn join_sibling(&self, reference: &str) -> Result<Self, LocatorError> {
        match self {
            Self::Path(doc) => {
                let dir = doc.parent().unwrap_or_else(|| Path::new(""));
                Self::join_path(dir, reference)
            }
            Self::Url(base) => Self::join_url(base, reference),
        }
    }

    fn join_path(dir: &Path, reference: &str) -> Result<Self, LocatorError> {
        if is_http(reference) {
            return Self::parse(reference);
        }
        let reference = Path::new(reference);
        if reference.is_absolute() {
            Ok(Self::Path(reference.to_path_buf()))
        } else {
            Ok(Self::Path(dir.join(reference)))
        }
    }

    fn join_url(base: &Url, reference: &str) -> Result<Self, LocatorError> {
        base.join(reference)
            .map(Self::Url)
            .map_err(|source| LocatorError::Url {
                raw: reference.to_string(),
                source,
            })
    }

    /// Read the whole resource as UTF-8 text.
    pub fn fetch_string(&self) -> Result<String, FetchError> {
        match self {
            Self::Path(path) => Ok(fs::read_to_string(path)?),
            Self::Url(url) => {
                debug!("GET {url}");
                let mut response = ureq::get(url.as_str()).call()?;
                Ok(response.body_mut().read_to_string()?)
            }
        }
    }

    /// Read the whole resource into memory.
    pub fn fetch_bytes(&self) -> Result<Vec<u8>, FetchError> {
        match self {
            Self::Path(path) => Ok(fs::read(path)?),
            Self::Url(url) => {
                debug!("GET {url}");
                let mut response = ureq::get(url.as_str()).call()?;
                Ok(response
                    .body_mut()
                    .with_config()
                    .limit(MAX_BODY_BYTES)
                    .read_to_vec()?)
            }
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}
