//! Endpoint functions, one module per resource.
//!
//! Each module adds inherent methods to [`ApiClient`](crate::ApiClient);
//! every method issues exactly one request and performs no business logic.

pub mod admin;
pub mod auth;
pub mod books;
pub mod events;
pub mod libraries;
pub mod notifications;
pub mod seats;
pub mod subscriptions;
pub mod superadmin;
