// ── Subscription plans ──

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use libseat_api::PageParams;
use libseat_api::models::{EntityId, Subscription, SubscriptionPlan};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

pub struct SubscriptionCenter {
    ctx: AppContext,
    plans: Listing<SubscriptionPlan>,
    history: Listing<Subscription>,
    current: Mutex<Option<Arc<Subscription>>>,
}

impl SubscriptionCenter {
    pub fn new(ctx: AppContext) -> Self {
        let plans = Listing::new(ctx.page_size());
        let history = Listing::new(ctx.page_size());
        Self {
            ctx,
            plans,
            history,
            current: Mutex::new(None),
        }
    }

    pub fn plans(&self) -> &Listing<SubscriptionPlan> {
        &self.plans
    }

    pub fn history(&self) -> &Listing<Subscription> {
        &self.history
    }

    pub fn current(&self) -> Option<Arc<Subscription>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load the plan catalogue and the user's current subscription.
    pub async fn load(&self) -> Result<(), CoreError> {
        let client = self.ctx.client();
        if !client.has_token() {
            return self.plans.load(PageParams::default(), client.list_plans()).await;
        }
        let (plans, current) = tokio::join!(
            self.plans.load(PageParams::default(), client.list_plans()),
            client.current_subscription(),
        );
        self.set_current(current?.map(Arc::new));
        plans
    }

    pub async fn load_history(&self, page: PageParams) -> Result<(), CoreError> {
        self.ctx.require_session()?;
        let page = self.ctx.paged(page);
        self.history
            .load(page, self.ctx.client().subscription_history(page))
            .await
    }

    pub async fn subscribe(&self, plan: &EntityId) -> Result<Arc<Subscription>, CoreError> {
        self.ctx.require_session()?;
        if self.current().is_some_and(|s| s.is_active()) {
            return Err(CoreError::validation(
                "Cancel the current subscription before choosing another plan",
            ));
        }
        match self.ctx.client().subscribe(plan).await {
            Ok(subscription) => {
                info!(plan = %plan, subscription = %subscription.id, "subscribed");
                let name = subscription
                    .plan_name
                    .clone()
                    .unwrap_or_else(|| "plan".into());
                self.ctx.ui().success(format!("Subscribed to {name}"));
                let subscription = Arc::new(subscription);
                self.set_current(Some(Arc::clone(&subscription)));
                Ok(subscription)
            }
            Err(e) => Err(self.ctx.report("subscribe", e.into())),
        }
    }

    pub async fn cancel(&self) -> Result<Arc<Subscription>, CoreError> {
        let current = self
            .current()
            .ok_or_else(|| CoreError::validation("There is no subscription to cancel"))?;
        match self.ctx.client().cancel_subscription(&current.id).await {
            Ok(subscription) => {
                self.ctx.ui().success("Subscription cancelled");
                let subscription = Arc::new(subscription);
                self.set_current(Some(Arc::clone(&subscription)));
                Ok(subscription)
            }
            Err(e) => Err(self.ctx.report("cancel subscription", e.into())),
        }
    }

    fn set_current(&self, subscription: Option<Arc<Subscription>>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = subscription;
    }
}
