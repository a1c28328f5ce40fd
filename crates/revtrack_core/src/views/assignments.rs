//! Assignment list with reviewer/status filters.

use crate::model::document::{Document, UNASSIGNED_REVIEWER};
use crate::model::user::{same_reviewer_name, User};
use crate::schedule::{effective_status, DisplayStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter state of the assignments page. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFilter {
    /// Matches `reviewer_name`, case-insensitively.
    pub reviewer: Option<String>,
    /// Matches the derived display status, so `Overdue` is filterable.
    pub status: Option<DisplayStatus>,
}

impl AssignmentFilter {
    fn matches(&self, document: &Document, status: &DisplayStatus) -> bool {
        let reviewer_ok = self
            .reviewer
            .as_deref()
            .map_or(true, |wanted| same_reviewer_name(&document.reviewer_name, wanted));
        let status_ok = self.status.as_ref().map_or(true, |wanted| wanted == status);
        reviewer_ok && status_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRow {
    pub document: Document,
    pub display_status: DisplayStatus,
}

/// Lists documents matching `filter`, ordered by due date text then title.
pub fn list_assignments(
    documents: &[Document],
    filter: &AssignmentFilter,
    today: NaiveDate,
) -> Vec<AssignmentRow> {
    let mut rows: Vec<AssignmentRow> = documents
        .iter()
        .map(|document| AssignmentRow {
            display_status: effective_status(document, today),
            document: document.clone(),
        })
        .filter(|row| filter.matches(&row.document, &row.display_status))
        .collect();

    // ISO dates sort correctly as text, and malformed ones still get a stable slot.
    rows.sort_by(|a, b| {
        a.document
            .due_date
            .cmp(&b.document.due_date)
            .then_with(|| a.document.title.cmp(&b.document.title))
    });
    rows
}

/// Reviewer names for a filter dropdown: sorted, deduplicated, plus
/// `Unassigned`.
pub fn reviewer_options(users: &[User]) -> Vec<String> {
    let mut names: BTreeSet<String> = users.iter().map(|user| user.name.clone()).collect();
    names.insert(UNASSIGNED_REVIEWER.to_string());
    names.into_iter().collect()
}
