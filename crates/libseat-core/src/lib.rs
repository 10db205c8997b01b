//! Client-side application layer between `libseat-api` and front ends.
//!
//! - **[`AppContext`]**: the injected dependency every page receives. It
//!   bundles one [`ApiClient`](libseat_api::ApiClient), the
//!   [`SessionStore`], and the [`UiStore`].
//!
//! - **[`EntityList`]**: ordered, reactive storage for one page of server
//!   results (`RwLock<IndexMap>` + `tokio::sync::watch`). Mutations patch
//!   rows from the entity the server returns.
//!
//! - **Workflows** ([`workflow`]): synchronous state machines for seat
//!   booking and event registration, and async sessions that drive them.
//!   Cascaded fetches carry a generation ticket plus a cancellation token
//!   so a superseded response is never applied.
//!
//! - **Views** ([`views`]): one view model per page (dashboard, bookings,
//!   libraries, books, events, notifications, subscriptions, check-in,
//!   admin, superadmin).

pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod store;
pub mod ui;
pub mod views;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, ClientConfig, TlsVerification};
pub use context::AppContext;
pub use error::CoreError;
pub use session::{Session, SessionStore};
pub use store::{Entity, EntityList, LoadStatus};
pub use ui::{Toast, ToastLevel, UiStore};
pub use views::Listing;
pub use workflow::{
    Applied, BookingStep, BookingSummary, EventRegistrationFlow, EventRegistrationSession,
    FetchTicket, Level, RegistrationStep, SeatBookingFlow, SeatBookingSession, Selection,
};

// Wire types are part of this crate's API surface.
pub use libseat_api::models;
