//! Reminder buckets: overdue and due soon.

use crate::model::document::Document;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Default look-ahead for "due soon", in days after today.
pub const DEFAULT_REMINDER_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reminders {
    pub overdue: Vec<Document>,
    /// Due between today and `today + window` inclusive.
    pub due_soon: Vec<Document>,
}

/// Buckets open documents for the reminders page.
///
/// Completed documents and documents whose due date does not parse are
/// left out of both buckets.
pub fn build_reminders(documents: &[Document], today: NaiveDate, window_days: u32) -> Reminders {
    let horizon = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut reminders = Reminders::default();
    for document in documents.iter().filter(|doc| !doc.status.is_completed()) {
        let Some(due) = document.due_on() else {
            continue;
        };
        if due < today {
            reminders.overdue.push(document.clone());
        } else if due <= horizon {
            reminders.due_soon.push(document.clone());
        }
    }
    reminders
}
