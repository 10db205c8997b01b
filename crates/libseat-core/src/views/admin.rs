// ── Library admin pages ──
//
// User approval, access applications, and the booking overview for the
// admin's library. Rows change only once the server has answered.

use std::sync::Arc;

use libseat_api::models::{
    AdminDashboardStats, AdminProfile, EntityId, LibraryApplication, SeatBooking, User,
};
use libseat_api::{ApplicationQuery, BookingQuery, UserQuery};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

fn require_admin(ctx: &AppContext) -> Result<(), CoreError> {
    ctx.require_session()?;
    let session = ctx.session().snapshot();
    if session.is_signed_in() && !session.is_admin() {
        return Err(CoreError::Api {
            message: "Admin access required".into(),
            status: Some(403),
        });
    }
    Ok(())
}

pub struct AdminOverview {
    ctx: AppContext,
}

impl AdminOverview {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn load(&self) -> Result<(AdminProfile, AdminDashboardStats), CoreError> {
        require_admin(&self.ctx)?;
        let client = self.ctx.client();
        let (profile, stats) = tokio::join!(client.admin_profile(), client.admin_dashboard());
        Ok((profile?, stats?))
    }
}

// ── Users ────────────────────────────────────────────────────────────

pub struct UserAdmin {
    ctx: AppContext,
    listing: Listing<User>,
}

impl UserAdmin {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<User> {
        &self.listing
    }

    pub async fn load(&self, query: &UserQuery) -> Result<(), CoreError> {
        require_admin(&self.ctx)?;
        let query = UserQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.listing
            .load(query.page, self.ctx.client().list_users(&query))
            .await
    }

    pub async fn approve(&self, id: &EntityId) -> Result<Arc<User>, CoreError> {
        let result = self.ctx.client().approve_user(id).await;
        self.listing.apply(&self.ctx, "approve user", result, |u| {
            format!("Approved {}", u.username)
        })
    }

    pub async fn reject(&self, id: &EntityId, reason: Option<&str>) -> Result<Arc<User>, CoreError> {
        let result = self.ctx.client().reject_user(id, reason).await;
        self.listing.apply(&self.ctx, "reject user", result, |u| {
            format!("Rejected {}", u.username)
        })
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.ctx.client().delete_user(id).await;
        self.listing
            .remove_acknowledged(&self.ctx, "delete user", id, result, "User deleted")
    }
}

// ── Access applications ──────────────────────────────────────────────

pub struct ApplicationReview {
    ctx: AppContext,
    listing: Listing<LibraryApplication>,
}

impl ApplicationReview {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<LibraryApplication> {
        &self.listing
    }

    pub async fn load(&self, query: &ApplicationQuery) -> Result<(), CoreError> {
        require_admin(&self.ctx)?;
        let query = ApplicationQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.listing
            .load(query.page, self.ctx.client().list_applications(&query))
            .await
    }

    pub async fn approve(&self, id: &EntityId) -> Result<Arc<LibraryApplication>, CoreError> {
        let result = self.ctx.client().approve_application(id).await;
        self.listing
            .apply(&self.ctx, "approve application", result, |_| {
                "Application approved".into()
            })
    }

    pub async fn reject(
        &self,
        id: &EntityId,
        reason: Option<&str>,
    ) -> Result<Arc<LibraryApplication>, CoreError> {
        let result = self.ctx.client().reject_application(id, reason).await;
        self.listing
            .apply(&self.ctx, "reject application", result, |_| {
                "Application rejected".into()
            })
    }
}

// ── Bookings overview ────────────────────────────────────────────────

pub struct BookingOverview {
    ctx: AppContext,
    listing: Listing<SeatBooking>,
}

impl BookingOverview {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<SeatBooking> {
        &self.listing
    }

    pub async fn load(&self, query: &BookingQuery) -> Result<(), CoreError> {
        require_admin(&self.ctx)?;
        let query = BookingQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.listing
            .load(query.page, self.ctx.client().list_all_bookings(&query))
            .await
    }
}
