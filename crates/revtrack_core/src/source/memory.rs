//! In-memory data source used for seeding and tests.

use super::{DataSource, LoadResult, Payload};
use futures::future::{self, BoxFuture, FutureExt};
use std::sync::Arc;

/// Serves a fixed payload held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    bytes: Arc<[u8]>,
}

impl StaticSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Serializes a typed payload once, up front.
    pub fn from_payload(payload: &Payload) -> LoadResult<Self> {
        Ok(Self::from_bytes(serde_json::to_vec(payload)?))
    }

    /// A source whose payload is `{}`, i.e. no users and no documents.
    pub fn empty() -> Self {
        Self::from_bytes(b"{}".to_vec())
    }
}

impl DataSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'static, LoadResult<Vec<u8>>> {
        future::ready(Ok(self.bytes.to_vec())).boxed()
    }

    fn describe(&self) -> String {
        format!("memory:{}b", self.bytes.len())
    }
}
