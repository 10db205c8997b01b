use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EntityId, MarkAllReadResponse, Notification, Page, UnreadCount};
use crate::query::{NotificationQuery, QueryParams};

impl ApiClient {
    pub async fn list_notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<Page<Notification>, Error> {
        self.get_with_params("notifications/", &query.to_params()?)
            .await
    }

    pub async fn mark_notification_read(&self, id: &EntityId) -> Result<Notification, Error> {
        self.post_action(&format!("notifications/{id}/read/")).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<MarkAllReadResponse, Error> {
        self.post_action("notifications/read_all/").await
    }

    pub async fn unread_notification_count(&self) -> Result<u64, Error> {
        let resp: UnreadCount = self.get("notifications/unread_count/").await?;
        Ok(resp.count)
    }

    pub async fn delete_notification(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("notifications/{id}/")).await
    }
}
