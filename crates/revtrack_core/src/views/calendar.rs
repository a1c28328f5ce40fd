//! Calendar projections: month grid, single day, week range and agenda.
//!
//! # Invariants
//! - The month grid is Sunday-first.
//! - Completed documents are hidden from month, day and agenda views; the
//!   week view keeps them because it spans start and completion dates.

use crate::model::document::Document;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A calendar month, always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Returns `None` for months outside `1..=12` or an unrepresentable year.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
            .ok()
            .map(|first| Self { first })
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.next() {
            Some(next) => (next.first - self.first).num_days() as u32,
            // December of the last representable year.
            None => 31,
        }
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn previous(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Iterates every date of the month in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub month: YearMonth,
    /// Empty cells before day 1 in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    /// Sunday.
    pub start: NaiveDate,
    /// Saturday.
    pub end: NaiveDate,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub documents: Vec<Document>,
}

/// Open documents due exactly on `date`.
pub fn documents_due_on(documents: &[Document], date: NaiveDate) -> Vec<Document> {
    documents
        .iter()
        .filter(|doc| !doc.status.is_completed() && doc.due_on() == Some(date))
        .cloned()
        .collect()
}

pub fn build_month(documents: &[Document], month: YearMonth, today: NaiveDate) -> MonthView {
    let days = month
        .dates()
        .map(|date| CalendarDay {
            date,
            is_today: date == today,
            documents: documents_due_on(documents, date),
        })
        .collect();

    MonthView {
        month,
        leading_blanks: month.first_day().weekday().num_days_from_sunday(),
        days,
    }
}

/// Documents active during the Sunday..Saturday week containing `any_day`.
///
/// A document is active from `startDate` (or its due date) through
/// `completionDate` (or its due date). Documents with neither a parseable
/// start nor due date are skipped.
pub fn build_week(documents: &[Document], any_day: NaiveDate) -> WeekView {
    let start = any_day - Days::new(u64::from(any_day.weekday().num_days_from_sunday()));
    let end = start + Days::new(6);

    let documents = documents
        .iter()
        .filter(|doc| match active_span(doc) {
            Some((begin, finish)) => begin <= end && finish >= start,
            None => false,
        })
        .cloned()
        .collect();

    WeekView {
        start,
        end,
        documents,
    }
}

/// Open documents due today or later, grouped by due date in ascending order.
pub fn build_agenda(documents: &[Document], today: NaiveDate) -> Vec<AgendaDay> {
    let mut upcoming: Vec<(NaiveDate, &Document)> = documents
        .iter()
        .filter(|doc| !doc.status.is_completed())
        .filter_map(|doc| doc.due_on().map(|due| (due, doc)))
        .filter(|(due, _)| *due >= today)
        .collect();
    upcoming.sort_by_key(|(due, _)| *due);

    let mut agenda: Vec<AgendaDay> = Vec::new();
    for (due, doc) in upcoming {
        match agenda.last_mut() {
            Some(day) if day.date == due => day.documents.push(doc.clone()),
            _ => agenda.push(AgendaDay {
                date: due,
                documents: vec![doc.clone()],
            }),
        }
    }
    agenda
}

fn active_span(document: &Document) -> Option<(NaiveDate, NaiveDate)> {
    let due = document.due_on();
    let begin = document.starts_on().or(due)?;
    let finish = document.completed_on().or(due).unwrap_or(begin);
    Some((begin.min(finish), begin.max(finish)))
}
