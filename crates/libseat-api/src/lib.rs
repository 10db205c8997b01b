// libseat-api: Async Rust client for the libseat REST API

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod services;
pub mod transport;

pub use client::{ApiClient, DEFAULT_API_BASE};
pub use error::Error;
pub use query::{
    ApplicationQuery, BookQuery, BookingQuery, EventQuery, LibraryQuery, NotificationQuery,
    PageParams, QueryParams, RegistrationQuery, ReservationQuery, UserQuery,
};
pub use transport::{TlsMode, TransportConfig};
