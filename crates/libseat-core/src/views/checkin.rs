// ── QR check-in ──
//
// Fetches short-lived check-in codes and presents them back to the
// server. The payload is opaque: it is shown and forwarded unchanged,
// and expiry is only ever judged by the server.

use tracing::info;

use libseat_api::models::{CheckInCode, EntityId, SeatBooking};

use crate::context::AppContext;
use crate::error::CoreError;

/// Hint rendered under a check-in code.
pub const CODE_VALIDITY_HINT: &str =
    "Show this code at the library desk. It expires after 15 minutes.";

pub struct CheckInDesk {
    ctx: AppContext,
}

impl CheckInDesk {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn booking_code(&self, booking: &EntityId) -> Result<CheckInCode, CoreError> {
        self.ctx.require_session()?;
        self.ctx
            .client()
            .booking_qr(booking)
            .await
            .map_err(|e| self.ctx.report("fetch check-in code", e.into()))
    }

    pub async fn registration_code(
        &self,
        registration: &EntityId,
    ) -> Result<CheckInCode, CoreError> {
        self.ctx.require_session()?;
        self.ctx
            .client()
            .registration_qr(registration)
            .await
            .map_err(|e| self.ctx.report("fetch event code", e.into()))
    }

    /// Present a code as if it had been scanned at the desk.
    pub async fn redeem(
        &self,
        booking: &EntityId,
        code: &CheckInCode,
    ) -> Result<SeatBooking, CoreError> {
        self.ctx.require_session()?;
        let qr_data = (!code.qr_data.is_null()).then(|| code.qr_data.clone());
        match self.ctx.client().check_in(booking, qr_data).await {
            Ok(updated) => {
                info!(booking = %updated.id, "checked in with code");
                self.ctx.ui().success("Checked in");
                Ok(updated)
            }
            Err(e) => Err(self.ctx.report("check in", e.into())),
        }
    }
}
