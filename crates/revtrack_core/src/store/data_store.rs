//! Load-once, copy-on-read data store.
//!
//! # Responsibility
//! - Drive the `Unloaded -> Loading -> Loaded` state machine.
//! - Serve read and write operations over the canonical collections.
//!
//! # Invariants
//! - At most one fetch is in flight; concurrent `load` callers await the
//!   same `Shared` task and observe the same outcome.
//! - The state mutex is never held across an `.await`.
//! - Each load attempt carries a generation number; an attempt finishing
//!   after `reset()` reports to its waiters but is not installed.

use crate::model::document::{Document, DocumentStatus, NewDocument};
use crate::model::generate_id;
use crate::model::user::{NewUser, User};
use crate::source::{decode_payload, DataSource, LoadResult, Payload, StaticSource};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const USER_ID_PREFIX: &str = "user";
const DOCUMENT_ID_PREFIX: &str = "doc";

type LoadTask = Shared<BoxFuture<'static, LoadResult<Arc<Payload>>>>;

enum LoadState {
    Unloaded,
    Loading { attempt: u64, task: LoadTask },
    Loaded,
}

struct StoreState {
    load: LoadState,
    next_attempt: u64,
    users: Vec<User>,
    documents: Vec<Document>,
}

/// Authoritative in-memory holder of users and documents.
///
/// Share it as `Arc<DataStore>`; every method takes `&self`.
pub struct DataStore {
    source: Arc<dyn DataSource>,
    state: Mutex<StoreState>,
}

impl DataStore {
    /// Creates an unloaded store backed by `source`.
    pub fn new(source: impl DataSource) -> Self {
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            state: Mutex::new(StoreState {
                load: LoadState::Unloaded,
                next_attempt: 1,
                users: Vec::new(),
                documents: Vec::new(),
            }),
        }
    }

    /// Creates a store that is already loaded with the given collections.
    ///
    /// Reviewer names are resolved up front. The backing source serves the
    /// same seed, so `reset()` followed by `load()` restores it.
    pub fn seeded(users: Vec<User>, documents: Vec<Document>) -> LoadResult<Self> {
        let payload = Payload::resolved(users, documents);
        let store = Self::new(StaticSource::from_payload(&payload)?);
        {
            let mut state = store.lock();
            state.users = payload.users;
            state.documents = payload.documents;
            state.load = LoadState::Loaded;
        }
        Ok(store)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.lock().load, LoadState::Loaded)
    }

    /// Returns the store to `Unloaded` and drops all canonical data.
    ///
    /// An in-flight attempt still resolves for its waiters but its result is
    /// discarded.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.load = LoadState::Unloaded;
        state.users.clear();
        state.documents.clear();
        info!("event=store_reset module=store status=ok");
    }

    /// Ensures the backing payload has been fetched and decoded.
    ///
    /// # Errors
    /// - Returns the attempt's `LoadError` to every caller that awaited it;
    ///   the store is `Unloaded` again afterwards.
    pub async fn load(&self) -> LoadResult<()> {
        let Some((attempt, task)) = self.join_or_start_load() else {
            return Ok(());
        };

        let started_at = Instant::now();
        let outcome = task.await;

        let mut state = self.lock();
        let is_current = matches!(
            &state.load,
            LoadState::Loading { attempt: current, .. } if *current == attempt
        );

        match outcome {
            Ok(payload) => {
                if is_current {
                    state.users = payload.users.clone();
                    state.documents = payload.documents.clone();
                    state.load = LoadState::Loaded;
                    info!(
                        "event=store_load module=store status=ok attempt={} users={} documents={} duration_ms={}",
                        attempt,
                        state.users.len(),
                        state.documents.len(),
                        started_at.elapsed().as_millis()
                    );
                }
                Ok(())
            }
            Err(err) => {
                if is_current {
                    state.load = LoadState::Unloaded;
                    error!(
                        "event=store_load module=store status=error attempt={} duration_ms={} error={}",
                        attempt,
                        started_at.elapsed().as_millis(),
                        err
                    );
                }
                Err(err)
            }
        }
    }

    /// Returns copies of all reviewers.
    pub async fn get_users(&self) -> LoadResult<Vec<User>> {
        self.ensure_loaded().await?;
        Ok(self.lock().users.clone())
    }

    /// Returns copies of all documents with freshly resolved reviewer names.
    pub async fn get_documents(&self) -> LoadResult<Vec<Document>> {
        self.ensure_loaded().await?;
        let state = self.lock();
        let documents = state
            .documents
            .iter()
            .map(|document| snapshot(document, &state.users))
            .collect();
        Ok(documents)
    }

    pub async fn get_user_by_id(&self, id: &str) -> LoadResult<Option<User>> {
        self.ensure_loaded().await?;
        Ok(self.lock().users.iter().find(|user| user.id == id).cloned())
    }

    pub async fn get_document_by_id(&self, id: &str) -> LoadResult<Option<Document>> {
        self.ensure_loaded().await?;
        let state = self.lock();
        let found = state
            .documents
            .iter()
            .find(|document| document.id == id)
            .map(|document| snapshot(document, &state.users));
        Ok(found)
    }

    /// Appends a new document and returns a copy of it.
    ///
    /// # Contract
    /// - A fresh id is generated; caller-supplied ids are ignored.
    /// - A missing or blank `status` defaults to `Not Started`.
    /// - Duplicate titles are allowed.
    pub async fn add_document(&self, new_document: NewDocument) -> LoadResult<Document> {
        self.ensure_loaded().await?;
        let mut state = self.lock();
        let mut document = Document::from_new(generate_id(DOCUMENT_ID_PREFIX), new_document);
        document.refresh_reviewer_name(&state.users);
        state.documents.push(document.clone());
        info!("event=store_write module=store op=add_document status=ok");
        Ok(document)
    }

    /// Removes a document. Returns `None` when the id is unknown.
    pub async fn remove_document(&self, id: &str) -> LoadResult<Option<Document>> {
        self.ensure_loaded().await?;
        let mut state = self.lock();
        let Some(index) = state.documents.iter().position(|document| document.id == id) else {
            info!("event=store_write module=store op=remove_document status=not_found");
            return Ok(None);
        };
        let removed = state.documents.remove(index);
        info!("event=store_write module=store op=remove_document status=ok");
        Ok(Some(removed))
    }

    /// Appends a new reviewer and returns a copy of it.
    ///
    /// No name uniqueness is enforced here.
    pub async fn add_user(&self, new_user: NewUser) -> LoadResult<User> {
        self.ensure_loaded().await?;
        let mut state = self.lock();
        let user = User::from_new(generate_id(USER_ID_PREFIX), new_user);
        state.users.push(user.clone());
        info!("event=store_write module=store op=add_user status=ok");
        Ok(user)
    }

    /// Removes a reviewer and unassigns every document that pointed at it.
    ///
    /// Returns `None` (and touches nothing) when the id is unknown.
    pub async fn remove_user(&self, id: &str) -> LoadResult<Option<User>> {
        self.ensure_loaded().await?;
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(index) = state.users.iter().position(|user| user.id == id) else {
            info!("event=store_write module=store op=remove_user status=not_found");
            return Ok(None);
        };

        let removed = state.users.remove(index);
        let mut cascaded = 0usize;
        for document in state
            .documents
            .iter_mut()
            .filter(|document| document.assigned_to_user_id.as_deref() == Some(id))
        {
            document.unassign();
            cascaded += 1;
        }
        info!(
            "event=store_write module=store op=remove_user status=ok cascaded_documents={}",
            cascaded
        );
        Ok(Some(removed))
    }

    /// Overwrites a document's stored status. The value is not validated.
    pub async fn update_document_status(
        &self,
        id: &str,
        status: impl Into<DocumentStatus>,
    ) -> LoadResult<Option<Document>> {
        let status = status.into();
        self.ensure_loaded().await?;
        let mut state = self.lock();
        let Some(document) = state.documents.iter_mut().find(|document| document.id == id) else {
            info!("event=store_write module=store op=update_status status=not_found");
            return Ok(None);
        };
        document.status = status;
        let updated = document.clone();
        info!("event=store_write module=store op=update_status status=ok");
        Ok(Some(updated))
    }

    /// Points a document at another reviewer (or none) and re-resolves the
    /// reviewer name.
    pub async fn assign_document(
        &self,
        id: &str,
        user_id: Option<String>,
    ) -> LoadResult<Option<Document>> {
        self.ensure_loaded().await?;
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(document) = state.documents.iter_mut().find(|document| document.id == id) else {
            info!("event=store_write module=store op=assign_document status=not_found");
            return Ok(None);
        };
        document.assigned_to_user_id = user_id;
        document.refresh_reviewer_name(&state.users);
        let updated = document.clone();
        info!("event=store_write module=store op=assign_document status=ok");
        Ok(Some(updated))
    }

    /// Loads until the store reports `Loaded`.
    ///
    /// Loops because an attempt that raced with `reset()` succeeds without
    /// installing its data.
    async fn ensure_loaded(&self) -> LoadResult<()> {
        while !self.is_loaded() {
            self.load().await?;
        }
        Ok(())
    }

    /// Returns the attempt to await, or `None` when already loaded.
    fn join_or_start_load(&self) -> Option<(u64, LoadTask)> {
        let mut state = self.lock();
        match &state.load {
            LoadState::Loaded => None,
            LoadState::Loading { attempt, task } => Some((*attempt, task.clone())),
            LoadState::Unloaded => {
                let attempt = state.next_attempt;
                state.next_attempt += 1;
                let task = fetch_payload(Arc::clone(&self.source));
                state.load = LoadState::Loading {
                    attempt,
                    task: task.clone(),
                };
                info!(
                    "event=store_load module=store status=start attempt={} source={}",
                    attempt,
                    self.source.describe()
                );
                Some((attempt, task))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn fetch_payload(source: Arc<dyn DataSource>) -> LoadTask {
    async move {
        let bytes = source.fetch().await?;
        let payload = decode_payload(&bytes)?;
        Ok(Arc::new(payload))
    }
    .boxed()
    .shared()
}

fn snapshot(document: &Document, users: &[User]) -> Document {
    let mut copy = document.clone();
    copy.refresh_reviewer_name(users);
    copy
}
