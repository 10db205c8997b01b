//! Clap derive structures for the `libseat` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};

use libseat_api::models::{ApplicationStatus, BookingStatus, ReservationStatus, Role};
use libseat_core::views::bookings::BookingTab;

use crate::commands::util::{parse_code, parse_date, parse_time};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// libseat -- book library seats, books, and events from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "libseat",
    version,
    about = "Book library seats, books, and events from the command line",
    long_about = "A command-line client for the libseat library booking service.\n\n\
        Browse libraries and their seats, book time slots, reserve books,\n\
        register for events, and administer users and libraries.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "LIBSEAT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "LIBSEAT_SERVER", global = true)]
    pub server: Option<String>,

    /// Access token (overrides keyring and profile)
    #[arg(long, env = "LIBSEAT_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LIBSEAT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "LIBSEAT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LIBSEAT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session tokens in the system keyring
    Login(LoginArgs),

    /// Sign out and forget the stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Today's bookings, unread notifications, and subscription
    #[command(alias = "home")]
    Dashboard {
        /// Day to show (YYYY-MM-DD, default today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Browse libraries, floors, sections, and seats
    #[command(alias = "lib")]
    Libraries(LibrariesArgs),

    /// Seat availability
    Seats(SeatsArgs),

    /// Manage your seat bookings
    #[command(alias = "bk")]
    Bookings(BookingsArgs),

    /// Search and reserve books
    Books(BooksArgs),

    /// Browse and register for events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Subscription plans and your membership
    #[command(alias = "subs")]
    Subscriptions(SubscriptionsArgs),

    /// Read and manage notifications
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// Library administration (admin role)
    Admin(AdminArgs),

    /// Installation-wide administration (superadmin role)
    Superadmin(SuperadminArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for all list commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ListArgs {
    /// Page number (starting at 1)
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page (1-100, default from profile)
    #[arg(long, short = 'l')]
    pub page_size: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'u', env = "LIBSEAT_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "LIBSEAT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the tokens for this process only
    #[arg(long)]
    pub no_store: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIBRARIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LibrariesArgs {
    #[command(subcommand)]
    pub command: LibrariesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LibrariesCommand {
    /// List libraries and your access to each
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Free-text search on name and address
        #[arg(long)]
        search: Option<String>,

        /// Only libraries in this city
        #[arg(long)]
        city: Option<String>,

        /// Include inactive libraries
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Show library details
    Show {
        /// Library ID
        library: String,
    },

    /// List the floors of a library
    Floors {
        /// Library ID
        library: String,
    },

    /// List the sections on a floor
    Sections {
        /// Floor ID
        floor: String,
    },

    /// List the seats in a section
    Seats {
        /// Section ID
        section: String,
    },

    /// Apply for access to a library
    Apply {
        /// Library ID
        library: String,

        /// Why you want access
        #[arg(long)]
        reason: Option<String>,
    },

    /// List your access applications
    Applications(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEATS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SeatsArgs {
    #[command(subcommand)]
    pub command: SeatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeatsCommand {
    /// Show the bookable time slots of a seat
    #[command(alias = "avail")]
    Availability {
        /// Seat ID
        seat: String,

        /// Day to check (YYYY-MM-DD, default today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Upcoming,
    Active,
    Past,
    Cancelled,
}

impl From<TabArg> for BookingTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Upcoming => Self::Upcoming,
            TabArg::Active => Self::Active,
            TabArg::Past => Self::Past,
            TabArg::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List your seat bookings
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only bookings on this day
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Earliest booking day
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Latest booking day
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Filter by status (repeatable, e.g. confirmed, checked-in)
        #[arg(long, value_parser = parse_code::<BookingStatus>)]
        status: Vec<BookingStatus>,

        /// Show one tab of the bookings page
        #[arg(long, value_enum)]
        tab: Option<TabArg>,
    },

    /// Show booking details
    Show {
        /// Booking ID
        booking: String,
    },

    /// Book a seat, prompting for anything not given as a flag
    #[command(alias = "new")]
    Book(BookArgs),

    /// Cancel a confirmed booking
    Cancel {
        /// Booking ID
        booking: String,
    },

    /// Check in to a booking
    CheckIn {
        /// Booking ID
        booking: String,

        /// Fetch a check-in code first and present it, as the desk scanner would
        #[arg(long)]
        with_code: bool,
    },

    /// Check out of a checked-in booking
    CheckOut {
        /// Booking ID
        booking: String,
    },

    /// Show the check-in code for a booking
    Qr {
        /// Booking ID
        booking: String,
    },
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Library ID
    #[arg(long)]
    pub library: Option<String>,

    /// Floor ID
    #[arg(long)]
    pub floor: Option<String>,

    /// Section ID
    #[arg(long)]
    pub section: Option<String>,

    /// Seat ID
    #[arg(long)]
    pub seat: Option<String>,

    /// Day to book (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub start: Option<NaiveTime>,

    /// End time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub end: Option<NaiveTime>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BooksArgs {
    #[command(subcommand)]
    pub command: BooksCommand,
}

#[derive(Debug, Subcommand)]
pub enum BooksCommand {
    /// Search the catalogue
    #[command(alias = "ls")]
    Search {
        /// Title, author, or ISBN
        term: Option<String>,

        #[command(flatten)]
        list: ListArgs,

        /// Only books held by this library
        #[arg(long)]
        library: Option<String>,

        /// Only books in this category
        #[arg(long)]
        category: Option<String>,

        /// Only books with a copy available
        #[arg(long)]
        available: bool,
    },

    /// Reserve a copy of a book
    Reserve {
        /// Book ID
        book: String,
    },

    /// List your book reservations
    Reservations {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status (repeatable)
        #[arg(long, value_parser = parse_code::<ReservationStatus>)]
        status: Vec<ReservationStatus>,
    },

    /// Cancel a book reservation
    Cancel {
        /// Reservation ID
        reservation: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Free-text search on title and description
        #[arg(long)]
        search: Option<String>,

        /// Only events at this library
        #[arg(long)]
        library: Option<String>,

        /// Only events of this type
        #[arg(long = "type")]
        event_type: Option<String>,

        /// Include past events
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Show event details
    Show {
        /// Event ID
        event: String,
    },

    /// Register for an event, choosing interactively when no ID is given
    Register {
        /// Event ID
        event: Option<String>,

        /// Only offer events at this library
        #[arg(long)]
        library: Option<String>,
    },

    /// List your event registrations
    Registrations(ListArgs),

    /// Cancel an event registration
    Cancel {
        /// Registration ID
        registration: String,
    },

    /// Show the check-in code for a registration
    Qr {
        /// Registration ID
        registration: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBSCRIPTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubscriptionsArgs {
    #[command(subcommand)]
    pub command: SubscriptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionsCommand {
    /// List subscription plans
    Plans,

    /// Show your current subscription
    Current,

    /// Subscribe to a plan
    Subscribe {
        /// Plan ID
        plan: String,
    },

    /// Cancel your current subscription
    Cancel,

    /// List your past subscriptions
    History(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID
        notification: String,
    },

    /// Mark every notification as read
    ReadAll,

    /// Print the number of unread notifications
    Unread,

    /// Delete a notification
    #[command(alias = "rm")]
    Delete {
        /// Notification ID
        notification: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Your admin profile and library statistics
    Dashboard,

    /// Manage user accounts
    Users(AdminUsersArgs),

    /// Review library access applications
    Applications(AdminApplicationsArgs),

    /// List every seat booking
    Bookings {
        #[command(flatten)]
        list: ListArgs,

        /// Only bookings on this day
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Only bookings at this library
        #[arg(long)]
        library: Option<String>,

        /// Filter by status (repeatable)
        #[arg(long, value_parser = parse_code::<BookingStatus>)]
        status: Vec<BookingStatus>,
    },
}

#[derive(Debug, Args)]
pub struct AdminUsersArgs {
    #[command(subcommand)]
    pub command: AdminUsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminUsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Search username, name, and email
        #[arg(long)]
        search: Option<String>,

        /// Only users with this role
        #[arg(long, value_parser = parse_code::<Role>)]
        role: Option<Role>,

        /// Only users awaiting approval
        #[arg(long)]
        pending: bool,
    },

    /// Approve a user account
    Approve {
        /// User ID
        user: String,
    },

    /// Reject a user account
    Reject {
        /// User ID
        user: String,

        /// Reason shown to the user
        #[arg(long)]
        reason: Option<String>,
    },

    /// Delete a user account
    #[command(alias = "rm")]
    Delete {
        /// User ID
        user: String,
    },
}

#[derive(Debug, Args)]
pub struct AdminApplicationsArgs {
    #[command(subcommand)]
    pub command: AdminApplicationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminApplicationsCommand {
    /// List access applications
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status
        #[arg(long, value_parser = parse_code::<ApplicationStatus>)]
        status: Option<ApplicationStatus>,

        /// Only applications for this library
        #[arg(long)]
        library: Option<String>,
    },

    /// Approve an application
    Approve {
        /// Application ID
        application: String,
    },

    /// Reject an application
    Reject {
        /// Application ID
        application: String,

        /// Reason shown to the applicant
        #[arg(long)]
        reason: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUPERADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SuperadminArgs {
    #[command(subcommand)]
    pub command: SuperadminCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuperadminCommand {
    /// Manage admin accounts
    Admins(SuperadminAdminsArgs),

    /// Manage library records
    Libraries(SuperadminLibrariesArgs),
}

#[derive(Debug, Args)]
pub struct SuperadminAdminsArgs {
    #[command(subcommand)]
    pub command: SuperadminAdminsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuperadminAdminsCommand {
    /// List admin accounts
    #[command(alias = "ls")]
    List(ListArgs),

    /// Grant admin rights to a user
    Create {
        /// User ID
        #[arg(long)]
        user: String,

        /// Library the admin manages
        #[arg(long)]
        library: Option<String>,

        /// Permission code (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },

    /// Change an admin's library or permissions
    Update {
        /// Admin profile ID
        admin: String,

        /// Library the admin manages
        #[arg(long)]
        library: Option<String>,

        /// Replace the permission set (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },

    /// Revoke an admin account
    #[command(alias = "rm")]
    Delete {
        /// Admin profile ID
        admin: String,
    },
}

#[derive(Debug, Args)]
pub struct SuperadminLibrariesArgs {
    #[command(subcommand)]
    pub command: SuperadminLibrariesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuperadminLibrariesCommand {
    /// List all libraries, active or not
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Free-text search on name and address
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a library
    Create(LibraryFields),

    /// Update a library
    Update {
        /// Library ID
        library: String,

        #[command(flatten)]
        fields: LibraryFields,
    },

    /// Delete a library
    #[command(alias = "rm")]
    Delete {
        /// Library ID
        library: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct LibraryFields {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Opening time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub opens: Option<NaiveTime>,

    /// Closing time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub closes: Option<NaiveTime>,

    /// Accept bookings (true/false)
    #[arg(long)]
    pub active: Option<bool>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a profile field
    Set {
        /// Field name (server, api_base, username, token_env, ca_cert, insecure, timeout, page_size)
        key: String,

        /// New value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
