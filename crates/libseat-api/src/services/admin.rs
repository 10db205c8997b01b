// Library-admin endpoints: dashboard, user approvals, access applications.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AdminDashboardStats, AdminProfile, EntityId, LibraryApplication, Page, RejectRequest,
    SeatBooking, User,
};
use crate::query::{ApplicationQuery, BookingQuery, QueryParams, UserQuery};

impl ApiClient {
    pub async fn admin_dashboard(&self) -> Result<AdminDashboardStats, Error> {
        self.get("admin/dashboard/").await
    }

    pub async fn admin_profile(&self) -> Result<AdminProfile, Error> {
        self.get("admin/profile/").await
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn list_users(&self, query: &UserQuery) -> Result<Page<User>, Error> {
        self.get_with_params("admin/users/", &query.to_params()?)
            .await
    }

    pub async fn approve_user(&self, id: &EntityId) -> Result<User, Error> {
        self.post_action(&format!("admin/users/{id}/approve/")).await
    }

    pub async fn reject_user(&self, id: &EntityId, reason: Option<&str>) -> Result<User, Error> {
        self.post(
            &format!("admin/users/{id}/reject/"),
            &RejectRequest { reason },
        )
        .await
    }

    pub async fn delete_user(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("admin/users/{id}/")).await
    }

    // ── Access applications ──────────────────────────────────────────

    pub async fn list_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<Page<LibraryApplication>, Error> {
        self.get_with_params("admin/applications/", &query.to_params()?)
            .await
    }

    pub async fn approve_application(&self, id: &EntityId) -> Result<LibraryApplication, Error> {
        self.post_action(&format!("admin/applications/{id}/approve/"))
            .await
    }

    pub async fn reject_application(
        &self,
        id: &EntityId,
        reason: Option<&str>,
    ) -> Result<LibraryApplication, Error> {
        self.post(
            &format!("admin/applications/{id}/reject/"),
            &RejectRequest { reason },
        )
        .await
    }

    // ── Bookings ─────────────────────────────────────────────────────

    /// Every booking the admin's libraries hold, not just the caller's own.
    pub async fn list_all_bookings(&self, query: &BookingQuery) -> Result<Page<SeatBooking>, Error> {
        self.get_with_params("admin/bookings/", &query.to_params()?)
            .await
    }
}
