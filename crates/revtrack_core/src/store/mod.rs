//! In-memory store for reviewers and documents.
//!
//! # Responsibility
//! - Own the canonical collections for the lifetime of one session.
//! - Load them from a `DataSource` exactly once, shared by all callers.
//! - Keep referential integrity on writes (reviewer removal cascades).
//!
//! # Invariants
//! - Callers only ever receive owned copies; canonical state changes only
//!   through `DataStore` methods.
//! - A failed load leaves the store `Unloaded` so the next call retries.

mod data_store;

pub use data_store::DataStore;
