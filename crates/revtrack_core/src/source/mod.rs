//! External data sources feeding the store.
//!
//! # Responsibility
//! - Define the `DataSource` seam the store fetches its payload through.
//! - Decode the payload bytes into typed users and documents.
//!
//! # Invariants
//! - A source only produces bytes; decoding and reviewer resolution happen
//!   in one place (`decode_payload`).
//! - Missing or `null` collections decode as empty, never as an error.

mod file;
#[cfg(feature = "http")]
mod http;
mod memory;

pub use file::FileSource;
#[cfg(feature = "http")]
pub use http::HttpSource;
pub use memory::StaticSource;

use crate::model::document::Document;
use crate::model::user::User;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;

pub type LoadResult<T> = Result<T, LoadError>;

/// Failure to fetch or decode the backing payload.
///
/// `Clone` because one failed attempt is reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Reading a local resource failed.
    Io { resource: String, message: String },
    /// The resource answered with a non-success status.
    Status { resource: String, code: u16 },
    /// The request never produced a response.
    Transport(String),
    /// The payload was not the expected JSON shape.
    Decode(String),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { resource, message } => write!(f, "failed to read `{resource}`: {message}"),
            Self::Status { resource, code } => {
                write!(f, "`{resource}` answered with status {code}")
            }
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Decode(message) => write!(f, "invalid payload: {message}"),
        }
    }
}

impl Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Addressable resource that yields the raw JSON payload.
pub trait DataSource: Send + Sync + 'static {
    /// Fetches the full payload. Called at most once per load attempt.
    fn fetch(&self) -> BoxFuture<'static, LoadResult<Vec<u8>>>;

    /// Short label used in log lines and error messages.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

impl<F, Fut> DataSource for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = LoadResult<Vec<u8>>> + Send + 'static,
{
    fn fetch(&self) -> BoxFuture<'static, LoadResult<Vec<u8>>> {
        self().boxed()
    }
}

/// Decoded payload: the two canonical collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub users: Vec<User>,
    pub documents: Vec<Document>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    users: Option<Vec<User>>,
    #[serde(default)]
    documents: Option<Vec<Document>>,
}

/// Decodes payload bytes and resolves every document's reviewer name.
pub fn decode_payload(bytes: &[u8]) -> LoadResult<Payload> {
    let raw: RawPayload = serde_json::from_slice(bytes)?;
    Ok(Payload::resolved(
        raw.users.unwrap_or_default(),
        raw.documents.unwrap_or_default(),
    ))
}

impl Payload {
    /// Builds a payload with reviewer names recomputed from `users`.
    pub fn resolved(users: Vec<User>, mut documents: Vec<Document>) -> Self {
        for document in &mut documents {
            document.refresh_reviewer_name(&users);
        }
        Self { users, documents }
    }
}
