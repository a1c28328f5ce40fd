//! Domain model for reviewers and the documents assigned to them.
//!
//! # Responsibility
//! - Define the canonical records held by the data store.
//! - Map the external JSON payload shape onto typed Rust structs.
//!
//! # Invariants
//! - `reviewer_name` is a derived cache and never the source of truth.
//! - Unknown payload fields survive every copy handed out by the store.

pub mod document;
pub mod user;

use uuid::Uuid;

/// Builds a collection-unique identifier with a readable kind prefix.
///
/// Produces values such as `doc3b1f0c...`; the suffix is a v4 UUID in
/// simple (hyphenless) form.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::generate_id;

    #[test]
    fn generated_ids_keep_prefix_and_differ() {
        let first = generate_id("doc");
        let second = generate_id("doc");
        assert!(first.starts_with("doc"));
        assert_eq!(first.len(), "doc".len() + 32);
        assert_ne!(first, second);
    }
}
