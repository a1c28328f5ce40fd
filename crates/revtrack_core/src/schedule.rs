//! Read-time status derivation.
//!
//! # Invariants
//! - `Overdue` is never written back into a stored document.
//! - Dates compare as calendar days; a document due today is not overdue.
//! - An unparseable due date never derives `Overdue`.

use crate::model::document::{Document, DocumentStatus};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Status as presented to readers: the stored status plus `Overdue`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
    Other(String),
}

impl DisplayStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for DisplayStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Overdue" => Self::Overdue,
            _ => Self::from(DocumentStatus::from(value)),
        }
    }
}

impl From<&str> for DisplayStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DocumentStatus> for DisplayStatus {
    fn from(value: DocumentStatus) -> Self {
        match value {
            DocumentStatus::NotStarted => Self::NotStarted,
            DocumentStatus::InProgress => Self::InProgress,
            DocumentStatus::Completed => Self::Completed,
            DocumentStatus::Other(value) => Self::Other(value),
        }
    }
}

impl From<DisplayStatus> for String {
    fn from(value: DisplayStatus) -> Self {
        match value {
            DisplayStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for DisplayStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Returns whether `document` is past due and not completed as of `today`.
pub fn is_overdue(document: &Document, today: NaiveDate) -> bool {
    if document.status.is_completed() {
        return false;
    }
    document.due_on().is_some_and(|due| due < today)
}

/// Derives the status a reader should see for `document` on `today`.
pub fn effective_status(document: &Document, today: NaiveDate) -> DisplayStatus {
    if is_overdue(document, today) {
        DisplayStatus::Overdue
    } else {
        DisplayStatus::from(document.status.clone())
    }
}
