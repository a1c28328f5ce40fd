//! Core use-case services.
//!
//! # Responsibility
//! - Apply caller-side policies (presence checks, reviewer name dedup) on
//!   top of the store's unvalidated writes.
//! - Assemble view projections from fresh store copies.

pub mod review_service;
