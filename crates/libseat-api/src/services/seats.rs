// Seat availability, bookings, and QR check-in / check-out.

use chrono::NaiveDate;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    CheckInCode, CheckInRequest, CreateBookingRequest, EntityId, Page, SeatBooking, TimeSlot,
};
use crate::query::{BookingQuery, QueryParams};

impl ApiClient {
    /// Time slots for one seat on one date. This is the only availability
    /// signal the client gets; it is computed entirely server-side.
    pub async fn seat_availability(
        &self,
        seat_id: &EntityId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, Error> {
        self.get_with_params(
            &format!("seats/{seat_id}/availability/"),
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    pub async fn list_bookings(&self, query: &BookingQuery) -> Result<Page<SeatBooking>, Error> {
        self.get_with_params("seats/bookings/", &query.to_params()?)
            .await
    }

    pub async fn get_booking(&self, id: &EntityId) -> Result<SeatBooking, Error> {
        self.get(&format!("seats/bookings/{id}/")).await
    }

    pub async fn create_booking(&self, req: &CreateBookingRequest) -> Result<SeatBooking, Error> {
        self.post("seats/bookings/", req).await
    }

    pub async fn cancel_booking(&self, id: &EntityId) -> Result<SeatBooking, Error> {
        self.post_action(&format!("seats/bookings/{id}/cancel/"))
            .await
    }

    /// Request a short-lived check-in code for a booking.
    pub async fn booking_qr(&self, id: &EntityId) -> Result<CheckInCode, Error> {
        self.post_action(&format!("seats/bookings/{id}/qr/")).await
    }

    /// Check in to a booking, optionally presenting a scanned QR payload.
    pub async fn check_in(
        &self,
        id: &EntityId,
        qr_data: Option<Value>,
    ) -> Result<SeatBooking, Error> {
        self.post(
            &format!("seats/bookings/{id}/check_in/"),
            &CheckInRequest { qr_data },
        )
        .await
    }

    pub async fn check_out(&self, id: &EntityId) -> Result<SeatBooking, Error> {
        self.post_action(&format!("seats/bookings/{id}/check_out/"))
            .await
    }
}
