//! Static file serving.

use std::io;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use futures::FutureExt;
use http_types::{Body, Response, StatusCode};
use tracing::debug;

use crate::context::{Context, Handler};

/// Serves files below a fixed root directory, using the `filepath` route
/// parameter as the path inside the root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> StaticFiles {
        StaticFiles { root: root.into() }
    }

    /// Maps a request sub-path onto the root.
    ///
    /// `.` and empty components are dropped and `..` removes the previous
    /// component, but never climbs above the root. Components holding a
    /// backslash are rejected.
    pub fn resolve(&self, filepath: &str) -> Option<PathBuf> {
        let mut parts: Vec<&str> = Vec::new();
        for part in filepath.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                part if part.contains('\\') => return None,
                part => parts.push(part),
            }
        }

        let mut path = self.root.clone();
        path.extend(parts);
        Some(path)
    }
}

impl Handler for StaticFiles {
    fn call<'a>(&'a self, c: &'a mut Context) -> BoxFuture<'a, ()> {
        async move {
            let filepath = c.param("filepath").unwrap_or_default().to_string();
            let body = match self.resolve(&filepath) {
                Some(path) => open(&path).await,
                None => Err(io::Error::new(io::ErrorKind::InvalidInput, "bad path")),
            };

            match body {
                Ok(body) => {
                    let mut res = Response::new(StatusCode::Ok);
                    res.set_body(body);
                    c.respond(res);
                }
                Err(err) => {
                    debug!(filepath = %filepath, error = %err, "static file unavailable");
                    c.status(StatusCode::NotFound);
                }
            }
        }
        .boxed()
    }
}

async fn open(path: &Path) -> io::Result<Body> {
    let meta = async_std::fs::metadata(async_std::path::Path::new(path)).await?;
    if meta.is_dir() {
        return Body::from_file(path.join("index.html")).await;
    }
    Body::from_file(path).await
}
