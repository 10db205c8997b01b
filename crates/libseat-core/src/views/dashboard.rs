// ── Dashboard ──
//
// Today's bookings, the unread notification count, and the current
// subscription, fetched concurrently. Each panel fails on its own.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use libseat_api::BookingQuery;
use libseat_api::models::{SeatBooking, Subscription};

use super::bookings::BookingActions;
use crate::context::AppContext;
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingCard {
    pub booking: Arc<SeatBooking>,
    pub actions: BookingActions,
}

impl BookingCard {
    pub fn new(booking: SeatBooking) -> Self {
        let actions = BookingActions::for_booking(&booking);
        Self {
            booking: Arc::new(booking),
            actions,
        }
    }
}

/// One dashboard panel: its data, or the message to show in its place.
pub type Panel<T> = Result<T, String>;

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub date: NaiveDate,
    pub bookings: Panel<Vec<BookingCard>>,
    pub unread_notifications: Panel<u64>,
    pub subscription: Panel<Option<Subscription>>,
}

pub struct Dashboard {
    ctx: AppContext,
}

impl Dashboard {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn load(&self, date: NaiveDate) -> Result<DashboardData, CoreError> {
        self.ctx.require_session()?;
        let client = self.ctx.client();
        let query = BookingQuery::current_on(date);

        let (bookings, unread, subscription) = tokio::join!(
            client.list_bookings(&query),
            client.unread_notification_count(),
            client.current_subscription(),
        );

        Ok(DashboardData {
            date,
            bookings: panel("bookings", bookings)
                .map(|page| page.results.into_iter().map(BookingCard::new).collect()),
            unread_notifications: panel("unread count", unread),
            subscription: panel("subscription", subscription),
        })
    }
}

fn panel<T>(name: &str, result: Result<T, libseat_api::Error>) -> Panel<T> {
    result.map_err(|e| {
        let err = CoreError::from(e);
        warn!(panel = name, error = %err, "dashboard panel failed");
        err.user_message()
    })
}
