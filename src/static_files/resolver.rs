//! Request path to file resolution
//!
//! Every file is read whole into memory for the one response that needs
//! it; nothing is cached between requests.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;

use crate::config::StaticFilesConfig;
use crate::http::mime;

/// Why a request path could not be served.
///
/// Callers only ever see `NotFound`: a missing file, a permission problem,
/// a directory and an attempt to leave the web root all look the same from
/// the outside.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no servable file for {path:?}")]
    NotFound { path: String },
}

/// File contents plus the type to announce for them.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub body: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
    index_file: String,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(cfg.root.clone(), cfg.index_file.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Turns a request path into a path relative to the web root.
    ///
    /// `/` becomes the index file. Anything else must start with `/`;
    /// `.` segments are dropped and `..` removes the previous segment.
    /// Returns `None` when the path would step above the root or smuggles
    /// in an absolute path (`//etc/passwd`).
    pub fn relative_path(&self, request_path: impl AsRef<[u8]>) -> Option<PathBuf> {
        let request_path = request_path.as_ref();
        if request_path == b"/" {
            return Some(PathBuf::from(&self.index_file));
        }

        let rest = path_from_bytes(request_path.strip_prefix(b"/")?)?;
        let mut clean = PathBuf::new();

        for component in rest.components() {
            match component {
                Component::Normal(segment) => clean.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !clean.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        Some(clean)
    }

    /// Loads the file behind `request_path`.
    pub async fn resolve(
        &self,
        request_path: impl AsRef<[u8]>,
    ) -> Result<ResolvedFile, ResolveError> {
        let request_path = request_path.as_ref();
        let not_found = || ResolveError::NotFound {
            path: String::from_utf8_lossy(request_path).into_owned(),
        };

        let Some(relative) = self.relative_path(request_path) else {
            tracing::debug!(path = %String::from_utf8_lossy(request_path), "Path escapes web root");
            return Err(not_found());
        };

        let full_path = self.root.join(&relative);
        let body = match tokio::fs::read(&full_path).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(file = %full_path.display(), error = %e, "Cannot read file");
                return Err(not_found());
            }
        };

        Ok(ResolvedFile {
            body: Bytes::from(body),
            content_type: mime::content_type(&relative.to_string_lossy()),
        })
    }
}

/// Raw request bytes as a filesystem path. Unix paths are arbitrary bytes;
/// elsewhere a path must be UTF-8 to name anything.
#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> Option<&Path> {
    use std::os::unix::ffi::OsStrExt;
    Some(Path::new(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> Option<&Path> {
    std::str::from_utf8(bytes).ok().map(Path::new)
}
