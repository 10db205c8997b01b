// ── Users, auth, and admin DTOs ──

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::common::EntityId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Member,
    Admin,
    Superadmin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub role_display: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !first.is_empty() => format!("{first} {last}"),
            (Some(first), _) if !first.is_empty() => first.to_owned(),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: EntityId,
    pub user: User,
    #[serde(default)]
    pub library: Option<EntityId>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub pending_approvals: u64,
    #[serde(default)]
    pub active_bookings: u64,
    #[serde(default)]
    pub today_bookings: u64,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub pending_applications: u64,
}

// ── Auth payloads ───────────────────────────────────────────────────

/// Response of `POST auth/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: SecretString,
    #[serde(default)]
    pub refresh: Option<SecretString>,
    pub user: User,
}

/// Response of `POST auth/token/refresh/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: SecretString,
}

/// Body for `POST auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Body for `POST superadmin/admins/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminRequest {
    pub user: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

/// Body for `PATCH superadmin/admins/{id}/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAdminRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Body for the `.../reject/` endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RejectRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}
