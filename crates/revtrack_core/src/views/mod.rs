//! Read-only projections consumed by page renderers.
//!
//! # Responsibility
//! - Bucket, filter and group document copies for each view.
//! - Stay pure: every function is a function of its inputs and `today`.
//!
//! # Invariants
//! - Projections never reach back into the store.
//! - Overdue is always derived through `schedule::effective_status`.

pub mod assignments;
pub mod calendar;
pub mod dashboard;
pub mod reminders;

pub use assignments::{list_assignments, reviewer_options, AssignmentFilter, AssignmentRow};
pub use calendar::{
    build_agenda, build_month, build_week, documents_due_on, AgendaDay, CalendarDay, MonthView,
    WeekView, YearMonth,
};
pub use dashboard::{build_dashboard, Dashboard};
pub use reminders::{build_reminders, Reminders, DEFAULT_REMINDER_WINDOW_DAYS};
