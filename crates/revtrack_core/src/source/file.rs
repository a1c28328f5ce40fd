//! File-backed data source.

use super::{DataSource, LoadError, LoadResult};
use futures::future::{BoxFuture, FutureExt};
use std::path::PathBuf;

/// Reads the payload from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DataSource for FileSource {
    fn fetch(&self) -> BoxFuture<'static, LoadResult<Vec<u8>>> {
        let path = self.path.clone();
        async move {
            tokio::fs::read(&path).await.map_err(|err| LoadError::Io {
                resource: path.display().to_string(),
                message: err.to_string(),
            })
        }
        .boxed()
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
