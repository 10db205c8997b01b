// ── Subscription plan DTOs ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::EntityId;

/// A purchasable tier granting elevated quotas for a billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal price as rendered by the backend (e.g. `"9.99"`).
    pub price: String,
    pub duration_days: u32,
    #[serde(default)]
    pub max_book_reservations: Option<u32>,
    #[serde(default)]
    pub max_seat_bookings: Option<u32>,
    #[serde(default)]
    pub max_event_registrations: Option<u32>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: EntityId,
    pub plan: EntityId,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub auto_renew: bool,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

/// Body for `POST subscriptions/`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest<'a> {
    pub plan: &'a EntityId,
}
