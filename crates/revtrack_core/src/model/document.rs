//! Document (review task) model.
//!
//! # Responsibility
//! - Define the canonical document record and its stored status.
//! - Resolve the denormalized `reviewer_name` from the reviewer set.
//!
//! # Invariants
//! - `status` keeps any string verbatim; only the three known values are
//!   given their own variants.
//! - Dates stay as text; parsing happens only inside derivations.
//! - A missing, `null` or empty `assigned_to_user_id` means unassigned.

use crate::model::user::{User, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Identifier of a document. Opaque to the store.
pub type DocumentId = String;

/// Reviewer display name used when no valid assignment exists.
pub const UNASSIGNED_REVIEWER: &str = "Unassigned";

/// Wire format for all calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored lifecycle state of a document.
///
/// `Overdue` is intentionally absent: it is derived at read time by
/// [`crate::schedule::effective_status`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    /// Any other stored value. Accepted without validation.
    Other(String),
}

impl DocumentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Not Started" => Self::NotStarted,
            "In Progress" => Self::InProgress,
            "Completed" => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for DocumentStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DocumentStatus> for String {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical review document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub status: DocumentStatus,
    /// ISO `YYYY-MM-DD`. Not validated.
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub assigned_to_user_id: Option<UserId>,
    /// Derived from `assigned_to_user_id`; whatever the payload carries is
    /// overwritten on load.
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input for creating a document; the store assigns id and reviewer name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub title: String,
    /// Defaults to [`DocumentStatus::NotStarted`] when absent.
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    pub due_date: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub assigned_to_user_id: Option<UserId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    pub fn assigned_to(mut self, user_id: impl Into<UserId>) -> Self {
        self.assigned_to_user_id = Some(user_id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<DocumentStatus>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Keys the store owns on a document; never taken from caller extras.
const RESERVED_KEYS: [&str; 2] = ["id", "reviewerName"];

impl Document {
    /// Builds a document from creation input.
    ///
    /// `reviewer_name` starts empty; the store resolves it right after.
    pub(crate) fn from_new(id: DocumentId, new_document: NewDocument) -> Self {
        let mut extra = new_document.extra;
        for key in RESERVED_KEYS {
            extra.remove(key);
        }
        Self {
            id,
            title: new_document.title,
            status: new_document
                .status
                .filter(|status| !status.as_str().trim().is_empty())
                .unwrap_or_default(),
            due_date: new_document.due_date,
            start_date: new_document.start_date,
            completion_date: new_document.completion_date,
            assigned_to_user_id: new_document.assigned_to_user_id,
            reviewer_name: String::new(),
            extra,
        }
    }

    /// Returns the assigned reviewer id, treating empty strings as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to_user_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Recomputes `reviewer_name` against the given reviewer set.
    pub fn refresh_reviewer_name(&mut self, users: &[User]) {
        self.reviewer_name = resolve_reviewer_name(users, self.assignee());
    }

    /// Clears the assignment and resets the derived reviewer name.
    pub(crate) fn unassign(&mut self) {
        self.assigned_to_user_id = None;
        self.reviewer_name = UNASSIGNED_REVIEWER.to_string();
    }

    /// Parsed due date, or `None` when the stored text is not `YYYY-MM-DD`.
    pub fn due_on(&self) -> Option<NaiveDate> {
        parse_date(&self.due_date)
    }

    pub fn starts_on(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(parse_date)
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completion_date.as_deref().and_then(parse_date)
    }
}

/// Looks up the display name for an assignment.
///
/// Dangling or missing references degrade to [`UNASSIGNED_REVIEWER`].
pub fn resolve_reviewer_name(users: &[User], assignee: Option<&str>) -> String {
    assignee
        .and_then(|id| users.iter().find(|user| user.id == id))
        .map(|user| user.name.clone())
        .unwrap_or_else(|| UNASSIGNED_REVIEWER.to_string())
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}
