//! Reviewer (user) model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a reviewer. Opaque to the store.
pub type UserId = String;

/// A reviewer that documents can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Payload fields this crate does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for registering a reviewer; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

impl User {
    pub(crate) fn from_new(id: UserId, new_user: NewUser) -> Self {
        let mut extra = new_user.extra;
        // A caller-supplied `id` would collide with the generated one on serialize.
        extra.remove("id");
        Self {
            id,
            name: new_user.name,
            extra,
        }
    }
}

/// Case-insensitive reviewer name comparison used by duplicate checks and
/// the assignment filter. Ignores surrounding whitespace.
pub fn same_reviewer_name(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
