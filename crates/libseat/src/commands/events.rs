//! Library event command handlers.

use tabled::Tabled;
use tracing::debug;

use libseat_api::models::{Event, EventRegistration, RegistrationStatus};
use libseat_api::{EventQuery, PageParams, RegistrationQuery};
use libseat_core::AppContext;
use libseat_core::views::checkin::CheckInDesk;
use libseat_core::views::events::EventBoard;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{Painter, Tone};

use super::{bookings, util, wizard};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Spots")]
    spots: String,
    #[tabled(rename = "Registration")]
    registration: String,
}

#[derive(Tabled)]
struct RegistrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Starts")]
    starts: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
}

fn spots(e: &Event) -> String {
    match (e.spots_left(), e.capacity) {
        (Some(left), Some(capacity)) => format!("{left}/{capacity}"),
        _ => "-".into(),
    }
}

pub(super) fn event_label(e: &Event) -> String {
    format!(
        "{} ({}, {})",
        e.title,
        e.library_name.as_deref().unwrap_or("-"),
        util::moment(Some(e.start_datetime))
    )
}

pub(super) fn event_detail(e: &Event) -> String {
    [
        format!("ID:          {}", e.id),
        format!("Title:       {}", e.title),
        format!("Library:     {}", util::or_dash(e.library_name.as_deref())),
        format!(
            "Type:        {}",
            util::or_dash(e.event_type_display.as_deref().or(e.event_type.as_deref()))
        ),
        format!("Starts:      {}", util::moment(Some(e.start_datetime))),
        format!("Ends:        {}", util::moment(e.end_datetime)),
        format!("Spots:       {}", spots(e)),
        format!("Open:        {}", util::yes_no(e.is_registration_open)),
        format!("Description: {}", util::or_dash(e.description.as_deref())),
    ]
    .join("\n")
}

fn registration_status(r: &EventRegistration) -> String {
    r.status_display
        .clone()
        .unwrap_or_else(|| r.status.to_string())
}

pub(super) fn registration_detail(r: &EventRegistration) -> String {
    [
        format!("ID:         {}", r.id),
        format!(
            "Event:      {}",
            r.event_title.clone().unwrap_or_else(|| r.event.to_string())
        ),
        format!("Starts:     {}", util::moment(r.event_start)),
        format!("Status:     {}", registration_status(r)),
        format!("Registered: {}", util::moment(r.registered_at)),
    ]
    .join("\n")
}

fn registration_tone(status: RegistrationStatus) -> Tone {
    match status {
        RegistrationStatus::Registered => Tone::Good,
        RegistrationStatus::Waitlisted | RegistrationStatus::Attended => Tone::Active,
        RegistrationStatus::Cancelled | RegistrationStatus::NoShow => Tone::Bad,
        RegistrationStatus::Unknown => Tone::Muted,
    }
}

pub async fn handle(ctx: &AppContext, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(global.color);
    let board = EventBoard::new(ctx.clone());

    match args.command {
        EventsCommand::List {
            list,
            search,
            library,
            event_type,
            all,
        } => {
            let query = EventQuery {
                search,
                library: library.as_deref().map(util::entity_id),
                event_type,
                upcoming: (!all).then_some(true),
                page: util::page(list),
            };
            if ctx.client().has_token() {
                let mine = RegistrationQuery {
                    page: PageParams::page(1),
                    ..RegistrationQuery::default()
                };
                let (events, registrations) = util::spin("Loading events", global, async {
                    tokio::join!(board.load_events(&query), board.load_registrations(&mine))
                })
                .await;
                events?;
                // The registration column is a hint; the event list stands alone
                if let Err(e) = registrations {
                    debug!(error = %e, "registrations unavailable");
                }
            } else {
                util::spin("Loading events", global, board.load_events(&query)).await?;
            }
            util::print_listing(board.events(), global, |e| EventRow {
                id: e.id.to_string(),
                title: e.title.clone(),
                library: util::or_dash(e.library_name.as_deref()),
                kind: util::or_dash(e.event_type_display.as_deref().or(e.event_type.as_deref())),
                starts: util::moment(Some(e.start_datetime)),
                spots: spots(e),
                registration: match board.registration_for(&e.id) {
                    Some(r) => painter.paint(&registration_status(&r), registration_tone(r.status)),
                    None if e.is_registration_open => "open".into(),
                    None => painter.paint("closed", Tone::Muted),
                },
            });
            Ok(())
        }

        EventsCommand::Show { event } => {
            let id = util::entity_id(&event);
            let event = util::fetch("Loading event", global, ctx.client().get_event(&id)).await?;
            util::print_detail(&event, global, event_detail, |e| e.id.to_string());
            Ok(())
        }

        EventsCommand::Register { event, library } => {
            wizard::register_for_event(ctx, event, library, global).await
        }

        EventsCommand::Registrations(list) => {
            let query = RegistrationQuery {
                page: util::page(list),
                ..RegistrationQuery::default()
            };
            util::spin("Loading registrations", global, board.load_registrations(&query)).await?;
            util::print_listing(board.registrations(), global, |r| RegistrationRow {
                id: r.id.to_string(),
                event: r
                    .event_title
                    .clone()
                    .unwrap_or_else(|| r.event.to_string()),
                starts: util::moment(r.event_start),
                status: painter.paint(&registration_status(r), registration_tone(r.status)),
                check_in: util::yes_no(r.can_check_in),
            });
            Ok(())
        }

        EventsCommand::Cancel { registration } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&registration);
            if !util::confirm(&format!("Cancel registration {id}?"), global)? {
                return Ok(());
            }
            let updated =
                util::spin("Cancelling registration", global, board.cancel_registration(&id)).await?;
            util::print_detail(updated.as_ref(), global, registration_detail, |r| {
                r.id.to_string()
            });
            Ok(())
        }

        EventsCommand::Qr { registration } => {
            let desk = CheckInDesk::new(ctx.clone());
            let id = util::entity_id(&registration);
            let code =
                util::spin("Fetching event code", global, desk.registration_code(&id)).await?;
            bookings::print_code(&code, global);
            Ok(())
        }
    }
}
