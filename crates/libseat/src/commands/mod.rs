//! Command dispatch: bridges CLI args -> core views -> output formatting.

pub mod admin;
pub mod bookings;
pub mod books;
pub mod config_cmd;
pub mod dashboard;
pub mod events;
pub mod libraries;
pub mod notifications;
pub mod seats;
pub mod session;
pub mod subscriptions;
pub mod superadmin;
pub mod util;
pub mod wizard;

use libseat_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &AppContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => session::whoami(ctx, global).await,
        Command::Dashboard { date } => dashboard::handle(ctx, date, global).await,
        Command::Libraries(args) => libraries::handle(ctx, args, global).await,
        Command::Seats(args) => seats::handle(ctx, args, global).await,
        Command::Bookings(args) => bookings::handle(ctx, args, global).await,
        Command::Books(args) => books::handle(ctx, args, global).await,
        Command::Events(args) => events::handle(ctx, args, global).await,
        Command::Subscriptions(args) => subscriptions::handle(ctx, args, global).await,
        Command::Notifications(args) => notifications::handle(ctx, args, global).await,
        Command::Admin(args) => admin::handle(ctx, args, global).await,
        Command::Superadmin(args) => superadmin::handle(ctx, args, global).await,
        // Session, Config and Completions commands are handled before dispatch
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            Ok(())
        }
    }
}
