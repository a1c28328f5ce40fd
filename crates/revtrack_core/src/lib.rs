//! Core logic for the review tracker.
//! This crate owns the reviewer/document data and every rule derived from it.

pub mod config;
pub mod logging;
pub mod model;
pub mod schedule;
pub mod service;
pub mod source;
pub mod store;
pub mod views;

pub use config::{ConfigError, TrackerConfig, UserSettings, ViewMode};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    resolve_reviewer_name, Document, DocumentId, DocumentStatus, NewDocument, UNASSIGNED_REVIEWER,
};
pub use model::user::{NewUser, User, UserId};
pub use schedule::{effective_status, is_overdue, local_today, DisplayStatus};
pub use service::review_service::{ReviewDetail, ReviewService, ServiceError, ServiceResult};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{
    decode_payload, DataSource, FileSource, LoadError, LoadResult, Payload, StaticSource,
};
pub use store::DataStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
