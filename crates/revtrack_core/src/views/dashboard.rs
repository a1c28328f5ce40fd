//! Dashboard tables: upcoming and overdue reviews.

use crate::model::document::Document;
use crate::schedule::is_overdue;
use chrono::NaiveDate;
use serde::Serialize;

/// Two dashboard tables. Completed documents appear in neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub upcoming: Vec<Document>,
    pub overdue: Vec<Document>,
}

/// Splits open documents into overdue and upcoming, keeping input order.
///
/// Documents with an unparseable due date are listed as upcoming.
pub fn build_dashboard(documents: &[Document], today: NaiveDate) -> Dashboard {
    let mut dashboard = Dashboard::default();
    for document in documents.iter().filter(|doc| !doc.status.is_completed()) {
        if is_overdue(document, today) {
            dashboard.overdue.push(document.clone());
        } else {
            dashboard.upcoming.push(document.clone());
        }
    }
    dashboard
}
