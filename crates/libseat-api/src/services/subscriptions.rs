// Subscription plans and the user's subscription lifecycle.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EntityId, Page, SubscribeRequest, Subscription, SubscriptionPlan};
use crate::query::{PageParams, QueryParams};

impl ApiClient {
    pub async fn list_plans(&self) -> Result<Page<SubscriptionPlan>, Error> {
        self.get("subscriptions/plans/").await
    }

    /// The active subscription, or `None` when the backend answers 404.
    pub async fn current_subscription(&self) -> Result<Option<Subscription>, Error> {
        match self.get("subscriptions/current/").await {
            Ok(sub) => Ok(Some(sub)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn subscribe(&self, plan_id: &EntityId) -> Result<Subscription, Error> {
        self.post("subscriptions/", &SubscribeRequest { plan: plan_id })
            .await
    }

    pub async fn cancel_subscription(&self, id: &EntityId) -> Result<Subscription, Error> {
        self.post_action(&format!("subscriptions/{id}/cancel/"))
            .await
    }

    pub async fn subscription_history(&self, page: PageParams) -> Result<Page<Subscription>, Error> {
        self.get_with_params("subscriptions/history/", &page.to_params()?)
            .await
    }
}
