// ── Library, floor, section, seat, and access application DTOs ──

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::{EntityId, opt_hm_time};

/// A library branch -- from `GET libraries/` and `GET libraries/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "opt_hm_time")]
    pub opening_time: Option<NaiveTime>,
    #[serde(default, with = "opt_hm_time")]
    pub closing_time: Option<NaiveTime>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub total_seats: Option<u32>,
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: EntityId,
    pub library: EntityId,
    pub number: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Floor {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Floor {}", self.number))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: EntityId,
    pub floor: EntityId,
    pub name: String,
    #[serde(default)]
    pub section_type: Option<String>,
    #[serde(default)]
    pub section_type_display: Option<String>,
}

/// Physical seat state as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: EntityId,
    pub section: EntityId,
    pub seat_number: String,
    #[serde(default)]
    pub seat_type: Option<String>,
    #[serde(default)]
    pub seat_type_display: Option<String>,
    pub status: SeatStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub has_power_outlet: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// ── Access applications ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// A user's request for permission to use a specific library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryApplication {
    pub id: EntityId,
    #[serde(default)]
    pub user: Option<EntityId>,
    #[serde(default)]
    pub username: Option<String>,
    pub library: EntityId,
    #[serde(default)]
    pub library_name: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Body for `POST superadmin/libraries/` and `PATCH superadmin/libraries/{id}/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_hm_time"
    )]
    pub opening_time: Option<NaiveTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_hm_time"
    )]
    pub closing_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
