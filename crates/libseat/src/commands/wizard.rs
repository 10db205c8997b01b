//! Interactive multi-step flows: seat booking and event registration.
//!
//! Every step can be answered by a flag; missing answers are prompted
//! for with `dialoguer` when stdin is a terminal.

use std::io::{self, IsTerminal};

use dialoguer::{Input, Select};

use libseat_api::models::{EntityId, TimeSlot};
use libseat_core::AppContext;
use libseat_core::workflow::{BookingSummary, EventRegistrationSession, SeatBookingSession};

use crate::cli::{BookArgs, GlobalOpts};
use crate::error::CliError;

use super::{bookings, events, util};

/// Resolve one step: the flag wins, otherwise the user picks from `items`.
fn choose<T>(
    flag: Option<String>,
    items: &[T],
    what: &str,
    label: impl Fn(&T) -> String,
    id: impl Fn(&T) -> &EntityId,
) -> Result<EntityId, CliError> {
    if let Some(raw) = flag {
        return Ok(util::entity_id(&raw));
    }
    if items.is_empty() {
        return Err(CliError::Missing {
            message: format!("No {what} to choose from"),
        });
    }
    require_terminal(what)?;
    let labels: Vec<String> = items.iter().map(label).collect();
    let index = Select::new()
        .with_prompt(format!("Choose a {what}"))
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(id(&items[index]).clone())
}

fn require_terminal(what: &str) -> Result<(), CliError> {
    if io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: what.into(),
            reason: format!("pass --{what} when not running interactively"),
        })
    }
}

fn slot_label(slot: &TimeSlot) -> String {
    format!("{}-{}", util::hhmm(slot.start_time), util::hhmm(slot.end_time))
}

fn summary_text(summary: &BookingSummary) -> String {
    let time = match (summary.start_time, summary.end_time) {
        (Some(start), Some(end)) => format!("{}-{}", util::hhmm(start), util::hhmm(end)),
        _ => "-".into(),
    };
    [
        format!("Library: {}", summary.library),
        format!("Floor:   {}", summary.floor),
        format!("Section: {}", summary.section),
        format!("Seat:    {}", summary.seat),
        format!("Date:    {}", summary.date),
        format!("Time:    {time}"),
    ]
    .join("\n")
}

// ── Seat booking ────────────────────────────────────────────────────

pub async fn book_seat(ctx: &AppContext, args: BookArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_token(ctx)?;
    let session = SeatBookingSession::new(ctx.clone());

    util::spin("Loading libraries", global, session.start()).await?;
    let library = choose(
        args.library,
        session.snapshot().libraries(),
        "library",
        |l| format!("{} ({})", l.name, l.city.as_deref().unwrap_or("-")),
        |l| &l.id,
    )?;
    util::spin("Loading floors", global, session.select_library(&library)).await?;

    let floor = choose(args.floor, session.snapshot().floors(), "floor", |f| f.label(), |f| &f.id)?;
    util::spin("Loading sections", global, session.select_floor(&floor)).await?;

    let section = choose(
        args.section,
        session.snapshot().sections(),
        "section",
        |s| s.name.clone(),
        |s| &s.id,
    )?;
    util::spin("Loading seats", global, session.select_section(&section)).await?;

    let seat = choose(
        args.seat,
        session.snapshot().seats(),
        "seat",
        |s| {
            let power = if s.has_power_outlet { ", power" } else { "" };
            format!("{} ({}{power})", s.seat_number, s.status)
        },
        |s| &s.id,
    )?;
    util::spin("Selecting seat", global, session.select_seat(&seat)).await?;

    let date = match args.date {
        Some(date) => date,
        None => {
            require_terminal("date")?;
            let raw: String = Input::new()
                .with_prompt("Date (YYYY-MM-DD)")
                .default("today".into())
                .interact_text()?;
            util::parse_date(&raw).map_err(|reason| CliError::Validation {
                field: "date".into(),
                reason,
            })?
        }
    };
    util::spin("Checking availability", global, session.select_date(date)).await?;

    if args.start.is_some() || args.end.is_some() {
        session.set_times(args.start, args.end)?;
    } else {
        let slots: Vec<TimeSlot> = session
            .snapshot()
            .slots()
            .iter()
            .filter(|s| s.is_available)
            .cloned()
            .collect();
        if slots.is_empty() {
            return Err(CliError::Missing {
                message: format!("No free time slots on {date}"),
            });
        }
        require_terminal("start")?;
        let labels: Vec<String> = slots.iter().map(slot_label).collect();
        let index = Select::new()
            .with_prompt("Choose a time slot")
            .items(&labels)
            .default(0)
            .interact()?;
        session.select_slot(&slots[index])?;
    }

    session.review()?;
    if let Some(summary) = session.snapshot().summary() {
        util::note(global, &summary_text(&summary));
    }
    if !util::confirm("Book this seat?", global)? {
        return Ok(());
    }

    let booking = util::spin("Booking seat", global, session.submit()).await?;
    util::print_detail(&booking, global, bookings::booking_detail, |b| b.id.to_string());
    Ok(())
}

// ── Event registration ──────────────────────────────────────────────

pub async fn register_for_event(
    ctx: &AppContext,
    event: Option<String>,
    library: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_token(ctx)?;
    let session = EventRegistrationSession::new(ctx.clone());
    let library = library.as_deref().map(util::entity_id);
    util::spin("Loading events", global, session.start(library)).await?;

    let open: Vec<_> = session
        .snapshot()
        .events()
        .iter()
        .filter(|e| e.is_registration_open)
        .cloned()
        .collect();
    let event = choose(event, &open, "event", events::event_label, |e| &e.id)?;
    session.select_event(&event)?;

    if let Some(selected) = session.snapshot().selected_event() {
        util::note(global, &events::event_detail(selected));
    }
    if !util::confirm("Register for this event?", global)? {
        return Ok(());
    }

    let registration = util::spin("Registering", global, session.submit()).await?;
    util::print_detail(&registration, global, events::registration_detail, |r| {
        r.id.to_string()
    });
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    #[test]
    fn flag_skips_the_prompt() {
        let items: Vec<EntityId> = Vec::new();
        let id = choose(Some(" 12 ".into()), &items, "seat", |i| i.to_string(), |i| i).unwrap();
        assert_eq!(id.as_str(), "12");
    }

    #[test]
    fn nothing_to_choose_is_an_error() {
        let items: Vec<EntityId> = Vec::new();
        let err = choose(None, &items, "floor", |i| i.to_string(), |i| i).unwrap_err();
        assert!(matches!(err, CliError::Missing { .. }));
    }

    #[test]
    fn summary_lists_every_selection() {
        let summary = BookingSummary {
            library: "Central".into(),
            floor: "Ground".into(),
            section: "Quiet".into(),
            seat: "A-12".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0),
            end_time: NaiveTime::from_hms_opt(11, 0, 0),
        };
        let text = summary_text(&summary);
        assert!(text.contains("Seat:    A-12"));
        assert!(text.contains("Time:    09:00-11:00"));
    }
}
