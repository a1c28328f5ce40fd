//! Review tracking use-case service.
//!
//! # Responsibility
//! - Provide the entry points pages call: register/retire reviewers,
//!   create/complete/reassign reviews, and build view projections.
//!
//! # Invariants
//! - Service APIs never bypass `DataStore`; every read is a fresh copy.
//! - Validation stays at presence checks; statuses and dates are not
//!   checked for format.

use crate::model::document::{Document, DocumentStatus, NewDocument};
use crate::model::user::{same_reviewer_name, NewUser, User};
use crate::schedule::{effective_status, DisplayStatus};
use crate::source::LoadError;
use crate::store::DataStore;
use crate::views::{
    build_agenda, build_dashboard, build_month, build_reminders, list_assignments, AgendaDay,
    AssignmentFilter, AssignmentRow, Dashboard, MonthView, Reminders, YearMonth,
    DEFAULT_REMINDER_WINDOW_DAYS,
};
use chrono::NaiveDate;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for review use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Backing data could not be loaded.
    Load(LoadError),
    /// No reviewer or document has this id.
    NotFound(String),
    /// A required field is blank.
    EmptyField(&'static str),
    /// A reviewer with this name (case-insensitive) already exists.
    DuplicateReviewer(String),
    /// The assignment names a reviewer that does not exist.
    UnknownReviewer(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::DuplicateReviewer(name) => write!(f, "reviewer already exists: `{name}`"),
            Self::UnknownReviewer(id) => write!(f, "unknown reviewer: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for ServiceError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

/// One document with its derived status, for the detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDetail {
    pub document: Document,
    pub display_status: DisplayStatus,
    pub reviewer: Option<User>,
}

/// Use-case wrapper over a shared `DataStore`.
#[derive(Clone)]
pub struct ReviewService {
    store: Arc<DataStore>,
    reminder_window_days: u32,
}

impl ReviewService {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self {
            store,
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
        }
    }

    /// Overrides the "due soon" look-ahead used by `reminders`.
    pub fn with_reminder_window(mut self, days: u32) -> Self {
        self.reminder_window_days = days;
        self
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Registers a reviewer after trimming its name.
    ///
    /// # Errors
    /// - `EmptyField("name")` for blank names.
    /// - `DuplicateReviewer` when a reviewer with the same name exists,
    ///   ignoring case.
    pub async fn register_reviewer(&self, name: &str) -> ServiceResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyField("name"));
        }

        let users = self.store.get_users().await?;
        if users.iter().any(|user| same_reviewer_name(&user.name, name)) {
            warn!("event=reviewer_register module=service status=rejected reason=duplicate");
            return Err(ServiceError::DuplicateReviewer(name.to_string()));
        }

        Ok(self.store.add_user(NewUser::new(name)).await?)
    }

    /// Removes a reviewer; their documents become unassigned.
    pub async fn retire_reviewer(&self, user_id: &str) -> ServiceResult<User> {
        self.store
            .remove_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(user_id.to_string()))
    }

    /// Creates a review after presence checks on title, due date and
    /// assignee.
    pub async fn create_review(&self, mut new_document: NewDocument) -> ServiceResult<Document> {
        new_document.title = new_document.title.trim().to_string();
        if new_document.title.is_empty() {
            return Err(ServiceError::EmptyField("title"));
        }
        if new_document.due_date.trim().is_empty() {
            return Err(ServiceError::EmptyField("dueDate"));
        }

        if let Some(user_id) = new_document.assigned_to_user_id.clone() {
            if user_id.is_empty() {
                new_document.assigned_to_user_id = None;
            } else if self.store.get_user_by_id(&user_id).await?.is_none() {
                return Err(ServiceError::UnknownReviewer(user_id));
            }
        }

        Ok(self.store.add_document(new_document).await?)
    }

    pub async fn delete_review(&self, document_id: &str) -> ServiceResult<Document> {
        self.store
            .remove_document(document_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))
    }

    pub async fn set_status(
        &self,
        document_id: &str,
        status: impl Into<DocumentStatus>,
    ) -> ServiceResult<Document> {
        self.store
            .update_document_status(document_id, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))
    }

    pub async fn complete_review(&self, document_id: &str) -> ServiceResult<Document> {
        self.set_status(document_id, DocumentStatus::Completed).await
    }

    /// Moves a review to another reviewer, or unassigns it with `None` or an
    /// empty id.
    pub async fn reassign(
        &self,
        document_id: &str,
        user_id: Option<&str>,
    ) -> ServiceResult<Document> {
        let user_id = user_id.filter(|id| !id.is_empty());
        if let Some(user_id) = user_id {
            if self.store.get_user_by_id(user_id).await?.is_none() {
                return Err(ServiceError::UnknownReviewer(user_id.to_string()));
            }
        }
        self.store
            .assign_document(document_id, user_id.map(str::to_string))
            .await?
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))
    }

    pub async fn review_detail(
        &self,
        document_id: &str,
        today: NaiveDate,
    ) -> ServiceResult<ReviewDetail> {
        let document = self
            .store
            .get_document_by_id(document_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(document_id.to_string()))?;
        let reviewer = match document.assignee() {
            Some(user_id) => self.store.get_user_by_id(user_id).await?,
            None => None,
        };
        Ok(ReviewDetail {
            display_status: effective_status(&document, today),
            document,
            reviewer,
        })
    }

    pub async fn dashboard(&self, today: NaiveDate) -> ServiceResult<Dashboard> {
        let documents = self.store.get_documents().await?;
        Ok(build_dashboard(&documents, today))
    }

    pub async fn reminders(&self, today: NaiveDate) -> ServiceResult<Reminders> {
        let documents = self.store.get_documents().await?;
        Ok(build_reminders(
            &documents,
            today,
            self.reminder_window_days,
        ))
    }

    pub async fn agenda(&self, today: NaiveDate) -> ServiceResult<Vec<AgendaDay>> {
        let documents = self.store.get_documents().await?;
        Ok(build_agenda(&documents, today))
    }

    pub async fn month(&self, month: YearMonth, today: NaiveDate) -> ServiceResult<MonthView> {
        let documents = self.store.get_documents().await?;
        Ok(build_month(&documents, month, today))
    }

    pub async fn assignments(
        &self,
        filter: &AssignmentFilter,
        today: NaiveDate,
    ) -> ServiceResult<Vec<AssignmentRow>> {
        let documents = self.store.get_documents().await?;
        Ok(list_assignments(&documents, filter, today))
    }
}
