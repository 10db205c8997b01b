// ── Book catalogue and reservation DTOs ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub library: Option<EntityId>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total_copies: u32,
    #[serde(default)]
    pub available_copies: u32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Ready,
    Collected,
    Returned,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl ReservationStatus {
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Ready)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookReservation {
    pub id: EntityId,
    pub book: EntityId,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub reserved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body for `POST books/reservations/`.
#[derive(Debug, Clone, Serialize)]
pub struct ReserveBookRequest<'a> {
    pub book: &'a EntityId,
}
