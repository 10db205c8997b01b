// ── Page view models ──
//
// One type per page. Each holds an `AppContext` plus the reactive lists
// the page renders. Mutations patch local rows from the entity the
// server returns; a failed mutation leaves the rows untouched and raises
// an error toast.

pub mod admin;
pub mod bookings;
pub mod books;
pub mod checkin;
pub mod dashboard;
pub mod events;
pub mod libraries;
pub mod notifications;
pub mod subscriptions;
pub mod superadmin;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use libseat_api::PageParams;
use libseat_api::models::{EntityId, Page};

use crate::context::AppContext;
use crate::error::CoreError;
use crate::store::{Entity, EntityList, LoadStatus};

/// A paginated list plus its fetch status.
pub struct Listing<T: Entity> {
    list: EntityList<T>,
    status: watch::Sender<LoadStatus>,
}

impl<T: Entity> Listing<T> {
    pub(crate) fn new(page_size: u32) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            list: EntityList::new(page_size),
            status,
        }
    }

    pub fn list(&self) -> &EntityList<T> {
        &self.list
    }

    pub fn status(&self) -> LoadStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    pub fn rows(&self) -> Arc<Vec<Arc<T>>> {
        self.list.snapshot()
    }

    /// Fetch one page. `page` must be the selection the request was built
    /// from so the page count divides by the size the server used. On
    /// failure the previous rows stay in place.
    pub(crate) async fn load<F>(&self, page: PageParams, fetch: F) -> Result<(), CoreError>
    where
        F: Future<Output = Result<Page<T>, libseat_api::Error>>,
    {
        self.status.send_replace(LoadStatus::Loading);
        match fetch.await {
            Ok(results) => {
                debug!(
                    count = results.count,
                    rows = results.results.len(),
                    page_size = ?page.page_size,
                    "page loaded"
                );
                self.list
                    .replace_page_sized(results, page.page.unwrap_or(1), page.page_size);
                self.status.send_replace(LoadStatus::Ready);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.status
                    .send_replace(LoadStatus::Failed(err.user_message()));
                Err(err)
            }
        }
    }

    /// Same as [`load`](Self::load) for endpoints that return a bare array.
    pub(crate) async fn load_all<F>(&self, fetch: F) -> Result<(), CoreError>
    where
        F: Future<Output = Result<Vec<T>, libseat_api::Error>>,
    {
        self.load(PageParams::default(), async move {
            fetch.await.map(|items| Page {
                count: u64::try_from(items.len()).unwrap_or(u64::MAX),
                next: None,
                previous: None,
                results: items,
            })
        })
        .await
    }

    /// Patch a row from the server's response to a mutation.
    pub(crate) fn apply(
        &self,
        ctx: &AppContext,
        action: &str,
        result: Result<T, libseat_api::Error>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<Arc<T>, CoreError> {
        match result {
            Ok(entity) => {
                ctx.ui().success(success(&entity));
                let id = entity.entity_id().clone();
                self.list.upsert(entity);
                self.list
                    .get(&id)
                    .ok_or_else(|| CoreError::Internal(format!("row {id} vanished after {action}")))
            }
            Err(e) => Err(ctx.report(action, e.into())),
        }
    }

    /// Drop a row once the server acknowledged the deletion.
    pub(crate) fn remove_acknowledged(
        &self,
        ctx: &AppContext,
        action: &str,
        id: &EntityId,
        result: Result<(), libseat_api::Error>,
        success: impl Into<String>,
    ) -> Result<(), CoreError> {
        match result {
            Ok(()) => {
                self.list.remove(id);
                ctx.ui().success(success);
                Ok(())
            }
            Err(e) => Err(ctx.report(action, e.into())),
        }
    }
}
