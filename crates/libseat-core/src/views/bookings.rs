// ── My bookings page ──
//
// The signed-in user's seat bookings, grouped into tabs, with the
// cancel / check-in / check-out actions the server allows.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use strum::{Display, EnumIter};

use libseat_api::BookingQuery;
use libseat_api::models::{BookingStatus, EntityId, SeatBooking};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BookingTab {
    Upcoming,
    Active,
    Past,
    Cancelled,
}

impl BookingTab {
    pub fn of(booking: &SeatBooking, today: NaiveDate) -> Self {
        match booking.status {
            BookingStatus::CheckedIn => Self::Active,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Confirmed if booking.booking_date >= today => Self::Upcoming,
            _ => Self::Past,
        }
    }
}

/// What the user may do with a booking right now.
///
/// Check-in and check-out follow the server's flags verbatim; nothing is
/// inferred from the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingActions {
    pub can_check_in: bool,
    pub can_check_out: bool,
    pub can_cancel: bool,
}

impl BookingActions {
    pub fn for_booking(booking: &SeatBooking) -> Self {
        Self {
            can_check_in: booking.can_check_in,
            can_check_out: booking.can_check_out,
            can_cancel: booking.status == BookingStatus::Confirmed,
        }
    }
}

pub struct MyBookings {
    ctx: AppContext,
    listing: Listing<SeatBooking>,
}

impl MyBookings {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<SeatBooking> {
        &self.listing
    }

    pub async fn load(&self, query: &BookingQuery) -> Result<(), CoreError> {
        self.ctx.require_session()?;
        let query = BookingQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.listing
            .load(query.page, self.ctx.client().list_bookings(&query))
            .await
    }

    /// Rows in one tab, in server order.
    pub fn tab(&self, tab: BookingTab, today: NaiveDate) -> Vec<Arc<SeatBooking>> {
        self.listing
            .list()
            .filtered(|b| BookingTab::of(b, today) == tab)
    }

    pub fn actions(&self, id: &EntityId) -> Option<BookingActions> {
        self.listing
            .list()
            .get(id)
            .map(|b| BookingActions::for_booking(&b))
    }

    /// Cancel a confirmed booking. The row is patched from the server's
    /// response; on failure it keeps its previous status.
    pub async fn cancel(&self, id: &EntityId) -> Result<Arc<SeatBooking>, CoreError> {
        if let Some(actions) = self.actions(id) {
            if !actions.can_cancel {
                return Err(CoreError::validation(
                    "Only confirmed bookings can be cancelled",
                ));
            }
        }
        let result = self.ctx.client().cancel_booking(id).await;
        self.listing
            .apply(&self.ctx, "cancel booking", result, |_| "Booking cancelled".into())
    }

    pub async fn check_in(
        &self,
        id: &EntityId,
        qr_data: Option<Value>,
    ) -> Result<Arc<SeatBooking>, CoreError> {
        let result = self.ctx.client().check_in(id, qr_data).await;
        self.listing
            .apply(&self.ctx, "check in", result, |b| match &b.seat_number {
                Some(seat) => format!("Checked in to seat {seat}"),
                None => "Checked in".into(),
            })
    }

    pub async fn check_out(&self, id: &EntityId) -> Result<Arc<SeatBooking>, CoreError> {
        let result = self.ctx.client().check_out(id).await;
        self.listing
            .apply(&self.ctx, "check out", result, |_| "Checked out".into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn booking(status: &str, date: &str, can_check_in: bool) -> SeatBooking {
        serde_json::from_value(json!({
            "id": 1,
            "seat": 2,
            "booking_date": date,
            "start_time": "09:00:00",
            "end_time": "11:00:00",
            "status": status,
            "can_check_in": can_check_in,
        }))
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn tabs_follow_status_and_date() {
        assert_eq!(
            BookingTab::of(&booking("CONFIRMED", "2024-03-04", false), today()),
            BookingTab::Upcoming
        );
        assert_eq!(
            BookingTab::of(&booking("CONFIRMED", "2024-03-01", false), today()),
            BookingTab::Past
        );
        assert_eq!(
            BookingTab::of(&booking("CHECKED_IN", "2024-03-04", false), today()),
            BookingTab::Active
        );
        assert_eq!(
            BookingTab::of(&booking("CANCELLED", "2024-03-09", false), today()),
            BookingTab::Cancelled
        );
        assert_eq!(
            BookingTab::of(&booking("NO_SHOW", "2024-03-01", false), today()),
            BookingTab::Past
        );
    }

    #[test]
    fn actions_mirror_server_flags() {
        let confirmed = BookingActions::for_booking(&booking("CONFIRMED", "2024-03-04", true));
        assert!(confirmed.can_check_in);
        assert!(!confirmed.can_check_out);
        assert!(confirmed.can_cancel);

        let checked_in = BookingActions::for_booking(&booking("CHECKED_IN", "2024-03-04", false));
        assert!(!checked_in.can_cancel);
        assert!(!checked_in.can_check_in);
    }
}
