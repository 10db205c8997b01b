// ── Library event and registration DTOs ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub library: Option<EntityId>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_type_display: Option<String>,
    pub start_datetime: DateTime<Utc>,
    #[serde(default)]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registered_count: u32,
    #[serde(default)]
    pub is_registration_open: bool,
}

impl Event {
    /// Seats left according to the server's counters; `None` when uncapped.
    pub fn spots_left(&self) -> Option<u32> {
        self.capacity
            .map(|c| c.saturating_sub(self.registered_count))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Registered,
    Waitlisted,
    Attended,
    Cancelled,
    NoShow,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: EntityId,
    pub event: EntityId,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub event_start: Option<DateTime<Utc>>,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub can_check_in: bool,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

/// Body for `POST events/registrations/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterForEventRequest<'a> {
    pub event: &'a EntityId,
}
