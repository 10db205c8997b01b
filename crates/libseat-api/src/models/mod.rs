//! Wire types for the libseat REST API.
//!
//! Every type mirrors a server-defined JSON shape. Fields the backend may
//! omit are optional with serde defaults; unknown fields are ignored and
//! unknown enum codes map to an `Unknown` variant.

pub mod book;
pub mod common;
pub mod event;
pub mod library;
pub mod notification;
pub mod seat;
pub mod subscription;
pub mod user;

pub use book::{Book, BookReservation, ReservationStatus, ReserveBookRequest};
pub use common::{Ack, DEFAULT_PAGE_SIZE, EntityId, Page, total_pages};
pub use event::{Event, EventRegistration, RegisterForEventRequest, RegistrationStatus};
pub use library::{
    ApplicationStatus, Floor, Library, LibraryApplication, LibraryRequest, Seat, SeatStatus,
    Section,
};
pub use notification::{MarkAllReadResponse, Notification, UnreadCount};
pub use seat::{
    BookingStatus, CheckInCode, CheckInRequest, CreateBookingRequest, SeatBooking, TimeSlot,
};
pub use subscription::{SubscribeRequest, Subscription, SubscriptionPlan, SubscriptionStatus};
pub use user::{
    AdminDashboardStats, AdminProfile, CreateAdminRequest, LoginResponse, RefreshResponse,
    RegisterRequest, RejectRequest, Role, UpdateAdminRequest, User,
};
