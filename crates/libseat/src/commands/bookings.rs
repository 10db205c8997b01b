//! Seat booking command handlers.

use std::sync::Arc;

use tabled::Tabled;

use libseat_api::BookingQuery;
use libseat_api::models::{BookingStatus, CheckInCode, EntityId, SeatBooking};
use libseat_core::AppContext;
use libseat_core::views::bookings::{BookingActions, BookingTab, MyBookings};
use libseat_core::views::checkin::{CODE_VALIDITY_HINT, CheckInDesk};

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{Painter, Tone};

use super::{util, wizard};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Seat")]
    seat: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

pub(super) fn booking_tone(status: BookingStatus) -> Tone {
    match status {
        BookingStatus::Confirmed => Tone::Good,
        BookingStatus::CheckedIn => Tone::Active,
        BookingStatus::Cancelled | BookingStatus::NoShow | BookingStatus::Expired => Tone::Bad,
        BookingStatus::Completed | BookingStatus::Unknown => Tone::Muted,
    }
}

fn action_labels(actions: BookingActions) -> String {
    let labels: Vec<&str> = [
        (actions.can_check_in, "check-in"),
        (actions.can_check_out, "check-out"),
        (actions.can_cancel, "cancel"),
    ]
    .into_iter()
    .filter_map(|(allowed, label)| allowed.then_some(label))
    .collect();
    if labels.is_empty() {
        "-".into()
    } else {
        labels.join(", ")
    }
}

pub(super) fn booking_row(b: &Arc<SeatBooking>, painter: Painter) -> BookingRow {
    BookingRow {
        id: b.id.to_string(),
        date: b.booking_date.to_string(),
        time: format!("{}-{}", util::hhmm(b.start_time), util::hhmm(b.end_time)),
        library: util::or_dash(b.library_name.as_deref()),
        seat: b
            .seat_number
            .clone()
            .unwrap_or_else(|| b.seat.to_string()),
        status: painter.paint(&b.status_label(), booking_tone(b.status)),
        actions: action_labels(BookingActions::for_booking(b)),
    }
}

pub(super) fn booking_detail(b: &SeatBooking) -> String {
    [
        format!("ID:          {}", b.id),
        format!("Library:     {}", util::or_dash(b.library_name.as_deref())),
        format!(
            "Seat:        {}",
            b.seat_number.clone().unwrap_or_else(|| b.seat.to_string())
        ),
        format!("Date:        {}", b.booking_date),
        format!(
            "Time:        {}-{}",
            util::hhmm(b.start_time),
            util::hhmm(b.end_time)
        ),
        format!("Status:      {}", b.status_label()),
        format!("Checked in:  {}", util::moment(b.checked_in_at)),
        format!("Checked out: {}", util::moment(b.checked_out_at)),
        format!(
            "Actions:     {}",
            action_labels(BookingActions::for_booking(b))
        ),
    ]
    .join("\n")
}

/// Detail block for a check-in code. The payload is shown verbatim.
pub(super) fn code_detail(code: &CheckInCode) -> String {
    let payload = serde_json::to_string_pretty(&code.qr_data)
        .unwrap_or_else(|_| code.qr_data.to_string());
    let mut lines = vec![format!("Payload:\n{payload}")];
    if let Some(image) = &code.qr_code {
        lines.push(format!("Image:   {image}"));
    }
    lines.push(format!("Expires: {}", util::moment(code.expires_at)));
    lines.push(String::new());
    lines.push(CODE_VALIDITY_HINT.into());
    lines.join("\n")
}

pub(super) fn print_code(code: &CheckInCode, global: &GlobalOpts) {
    util::print_detail(code, global, code_detail, |c| c.qr_data.to_string());
}

/// Seed the listing with the server's copy so local action gates apply.
async fn track(
    bookings: &MyBookings,
    ctx: &AppContext,
    id: &EntityId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let booking = util::fetch("Loading booking", global, ctx.client().get_booking(id)).await?;
    bookings.listing().list().upsert(booking);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let painter = Painter::new(global.color);
    let bookings = MyBookings::new(ctx.clone());

    match args.command {
        BookingsCommand::List {
            list,
            date,
            from,
            to,
            status,
            tab,
        } => {
            let query = BookingQuery {
                booking_date: date,
                date_from: from,
                date_to: to,
                statuses: status,
                page: util::page(list),
                ..BookingQuery::default()
            };
            util::spin("Loading bookings", global, bookings.load(&query)).await?;
            match tab {
                Some(tab) => {
                    let rows = bookings.tab(BookingTab::from(tab), util::today());
                    util::print_rows(&rows, global, |b| booking_row(b, painter));
                }
                None => util::print_listing(bookings.listing(), global, |b| booking_row(b, painter)),
            }
            Ok(())
        }

        BookingsCommand::Show { booking } => {
            let id = util::entity_id(&booking);
            let booking = util::fetch("Loading booking", global, ctx.client().get_booking(&id)).await?;
            util::print_detail(&booking, global, booking_detail, |b| b.id.to_string());
            Ok(())
        }

        BookingsCommand::Book(args) => wizard::book_seat(ctx, args, global).await,

        BookingsCommand::Cancel { booking } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&booking);
            track(&bookings, ctx, &id, global).await?;
            if !util::confirm(&format!("Cancel booking {id}?"), global)? {
                return Ok(());
            }
            let updated = util::spin("Cancelling booking", global, bookings.cancel(&id)).await?;
            util::print_detail(updated.as_ref(), global, booking_detail, |b| b.id.to_string());
            Ok(())
        }

        BookingsCommand::CheckIn { booking, with_code } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&booking);
            let updated = if with_code {
                let desk = CheckInDesk::new(ctx.clone());
                let code = util::spin("Fetching check-in code", global, desk.booking_code(&id)).await?;
                util::spin("Checking in", global, desk.redeem(&id, &code)).await?
            } else {
                let updated = util::spin("Checking in", global, bookings.check_in(&id, None)).await?;
                updated.as_ref().clone()
            };
            util::print_detail(&updated, global, booking_detail, |b| b.id.to_string());
            Ok(())
        }

        BookingsCommand::CheckOut { booking } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&booking);
            let updated = util::spin("Checking out", global, bookings.check_out(&id)).await?;
            util::print_detail(updated.as_ref(), global, booking_detail, |b| b.id.to_string());
            Ok(())
        }

        BookingsCommand::Qr { booking } => {
            let desk = CheckInDesk::new(ctx.clone());
            let id = util::entity_id(&booking);
            let code = util::spin("Fetching check-in code", global, desk.booking_code(&id)).await?;
            print_code(&code, global);
            Ok(())
        }
    }
}
