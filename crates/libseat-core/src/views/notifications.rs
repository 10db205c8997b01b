// ── Notification centre ──

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use libseat_api::NotificationQuery;
use libseat_api::models::{EntityId, Notification};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

pub struct NotificationCenter {
    ctx: AppContext,
    listing: Listing<Notification>,
    unread: watch::Sender<u64>,
    query: std::sync::Mutex<NotificationQuery>,
}

impl NotificationCenter {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        let (unread, _) = watch::channel(0);
        Self {
            ctx,
            listing,
            unread,
            query: std::sync::Mutex::new(NotificationQuery::default()),
        }
    }

    pub fn listing(&self) -> &Listing<Notification> {
        &self.listing
    }

    /// Last known unread count as reported by the server.
    pub fn unread(&self) -> u64 {
        *self.unread.borrow()
    }

    pub fn subscribe_unread(&self) -> watch::Receiver<u64> {
        self.unread.subscribe()
    }

    pub async fn load(&self, query: &NotificationQuery) -> Result<(), CoreError> {
        self.ctx.require_session()?;
        let query = &NotificationQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        *self
            .query
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = query.clone();
        let client = self.ctx.client();
        let (listed, count) = tokio::join!(
            self.listing
                .load(query.page, client.list_notifications(query)),
            client.unread_notification_count(),
        );
        match count {
            Ok(count) => {
                self.unread.send_replace(count);
            }
            Err(e) => debug!(error = %e, "unread count unavailable"),
        }
        listed
    }

    pub async fn refresh_unread(&self) -> Result<u64, CoreError> {
        let count = self.ctx.client().unread_notification_count().await?;
        self.unread.send_replace(count);
        Ok(count)
    }

    /// Mark one notification read, patching the row from the response.
    pub async fn mark_read(&self, id: &EntityId) -> Result<Arc<Notification>, CoreError> {
        let was_unread = self.listing.list().get(id).is_some_and(|n| !n.is_read);
        let result = self.ctx.client().mark_notification_read(id).await;
        let row = self
            .listing
            .apply(&self.ctx, "mark notification read", result, |_| {
                "Marked as read".into()
            })?;
        if was_unread && row.is_read {
            self.unread.send_modify(|n| *n = n.saturating_sub(1));
        }
        Ok(row)
    }

    /// Mark everything read, then reload the current page from the server.
    pub async fn mark_all_read(&self) -> Result<u64, CoreError> {
        let updated = match self.ctx.client().mark_all_notifications_read().await {
            Ok(resp) => resp.updated,
            Err(e) => return Err(self.ctx.report("mark all notifications read", e.into())),
        };
        self.ctx
            .ui()
            .success(format!("Marked {updated} notifications as read"));
        let query = self
            .query
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        self.load(&query).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.ctx.client().delete_notification(id).await;
        self.listing.remove_acknowledged(
            &self.ctx,
            "delete notification",
            id,
            result,
            "Notification deleted",
        )
    }
}
