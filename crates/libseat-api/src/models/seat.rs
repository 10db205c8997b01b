// ── Seat booking DTOs ──

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use super::common::{EntityId, hm_time};

/// Booking lifecycle status. Transitions are enforced server-side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
    Expired,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Confirmed or checked in -- the booking still occupies its slot.
    pub fn is_current(self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::NoShow | Self::Expired
        )
    }
}

/// One time-slot entry from `GET seats/{id}/availability/?date=`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hm_time")]
    pub start_time: NaiveTime,
    #[serde(with = "hm_time")]
    pub end_time: NaiveTime,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn available_by_default() -> bool {
    true
}

impl TimeSlot {
    /// Whether `[start, end)` lies inside this slot.
    pub fn covers(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time <= start && end <= self.end_time
    }
}

/// A reservation of a physical seat for a date/time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatBooking {
    pub id: EntityId,
    pub seat: EntityId,
    #[serde(default)]
    pub seat_number: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    pub booking_date: NaiveDate,
    #[serde(with = "hm_time")]
    pub start_time: NaiveTime,
    #[serde(with = "hm_time")]
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub can_check_in: bool,
    #[serde(default)]
    pub can_check_out: bool,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub checked_out_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeatBooking {
    /// Display label for the status, preferring the server's `*_display` text.
    pub fn status_label(&self) -> String {
        self.status_display
            .clone()
            .unwrap_or_else(|| self.status.to_string())
    }
}

/// Body for `POST seats/bookings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub seat: EntityId,
    pub booking_date: NaiveDate,
    #[serde(with = "hm_time")]
    pub start_time: NaiveTime,
    #[serde(with = "hm_time")]
    pub end_time: NaiveTime,
}

/// Short-lived check-in token returned by the `.../qr/` endpoints.
///
/// `qr_data` is rendered as-is; its structure belongs to the backend.
/// Expiry is asserted server-side and never checked locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInCode {
    #[serde(default)]
    pub booking: Option<EntityId>,
    /// Server-rendered image (usually a `data:image/png;base64,...` URI).
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_data: Value,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body for `POST seats/bookings/{id}/check_in/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckInRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn booking_parses_fixture() {
        let booking: SeatBooking = serde_json::from_value(json!({
            "id": 7,
            "seat": 12,
            "seat_number": "A-12",
            "library_name": "Central",
            "booking_date": "2024-01-15",
            "start_time": "09:00:00",
            "end_time": "11:00:00",
            "status": "CONFIRMED",
            "status_display": "Confirmed",
            "can_check_in": true,
            "can_check_out": false,
            "created_at": "2024-01-10T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(booking.id.as_str(), "7");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.status.is_current());
        assert!(booking.can_check_in);
        assert_eq!(booking.status_label(), "Confirmed");
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let status: BookingStatus = serde_json::from_value(json!("ON_HOLD")).unwrap();
        assert_eq!(status, BookingStatus::Unknown);
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(BookingStatus::CheckedIn.to_string(), "CHECKED_IN");
        assert_eq!("NO_SHOW".parse::<BookingStatus>().unwrap(), BookingStatus::NoShow);
    }

    #[test]
    fn slot_covers_range() {
        let slot = TimeSlot {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            is_available: true,
        };
        assert!(slot.covers(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        ));
        assert!(!slot.covers(
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        ));
    }
}
