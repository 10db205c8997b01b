//! Library browsing command handlers.

use std::sync::Arc;

use tabled::Tabled;

use libseat_api::models::{Library, LibraryApplication, SeatStatus};
use libseat_api::{LibraryQuery, PageParams};
use libseat_core::AppContext;
use libseat_core::views::libraries::LibraryDirectory;

use crate::cli::{GlobalOpts, LibrariesArgs, LibrariesCommand};
use crate::error::CliError;
use crate::output::{Painter, Tone};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LibraryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Access")]
    access: String,
}

/// Library row without per-user access state, for management listings.
#[derive(Tabled)]
pub(super) struct ManagedLibraryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Active")]
    active: String,
}

#[derive(Tabled)]
struct FloorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Floor")]
    label: String,
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
}

#[derive(Tabled)]
struct SeatRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Seat")]
    number: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
pub(super) struct ApplicationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
}

pub(super) fn hours(l: &Library) -> String {
    match (l.opening_time, l.closing_time) {
        (Some(open), Some(close)) => format!("{}-{}", util::hhmm(open), util::hhmm(close)),
        _ => "-".into(),
    }
}

fn seat_counts(l: &Library) -> String {
    match (l.available_seats, l.total_seats) {
        (Some(free), Some(total)) => format!("{free}/{total}"),
        (None, Some(total)) => total.to_string(),
        _ => "-".into(),
    }
}

pub(super) fn managed_library_row(l: &Arc<Library>) -> ManagedLibraryRow {
    ManagedLibraryRow {
        id: l.id.to_string(),
        name: l.name.clone(),
        city: util::or_dash(l.city.as_deref()),
        hours: hours(l),
        active: util::yes_no(l.is_active),
    }
}

pub(super) fn library_detail(l: &Library) -> String {
    [
        format!("ID:          {}", l.id),
        format!("Name:        {}", l.name),
        format!("Address:     {}", util::or_dash(l.address.as_deref())),
        format!("City:        {}", util::or_dash(l.city.as_deref())),
        format!("Hours:       {}", hours(l)),
        format!("Seats:       {}", seat_counts(l)),
        format!("Active:      {}", util::yes_no(l.is_active)),
        format!("Description: {}", util::or_dash(l.description.as_deref())),
    ]
    .join("\n")
}

pub(super) fn application_row(a: &Arc<LibraryApplication>) -> ApplicationRow {
    ApplicationRow {
        id: a.id.to_string(),
        library: a
            .library_name
            .clone()
            .unwrap_or_else(|| a.library.to_string()),
        user: util::or_dash(a.username.as_deref()),
        status: a
            .status_display
            .clone()
            .unwrap_or_else(|| a.status.to_string()),
        submitted: util::day(a.created_at),
    }
}

fn seat_tone(status: SeatStatus) -> Tone {
    match status {
        SeatStatus::Available => Tone::Good,
        SeatStatus::Occupied | SeatStatus::Reserved => Tone::Active,
        SeatStatus::Maintenance => Tone::Bad,
        SeatStatus::Unknown => Tone::Muted,
    }
}

fn label(display: Option<&String>, code: Option<&String>) -> String {
    display.or(code).cloned().unwrap_or_else(|| "-".into())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: LibrariesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let painter = Painter::new(global.color);

    match args.command {
        LibrariesCommand::List {
            list,
            search,
            city,
            all,
        } => {
            let directory = LibraryDirectory::new(ctx.clone());
            let query = LibraryQuery {
                search,
                city,
                is_active: (!all).then_some(true),
                page: util::page(list),
            };
            util::spin("Loading libraries", global, directory.load(&query)).await?;
            util::print_listing(directory.libraries(), global, |l| LibraryRow {
                id: l.id.to_string(),
                name: l.name.clone(),
                city: util::or_dash(l.city.as_deref()),
                hours: hours(l),
                seats: seat_counts(l),
                access: directory.access_state(&l.id).to_string(),
            });
            Ok(())
        }

        LibrariesCommand::Show { library } => {
            let id = util::entity_id(&library);
            let library = util::fetch("Loading library", global, ctx.client().get_library(&id)).await?;
            util::print_detail(&library, global, library_detail, |l| l.id.to_string());
            Ok(())
        }

        LibrariesCommand::Floors { library } => {
            let id = util::entity_id(&library);
            let floors = util::fetch("Loading floors", global, ctx.client().list_floors(&id)).await?;
            let floors: Vec<_> = floors.into_iter().map(Arc::new).collect();
            util::print_rows(&floors, global, |f| FloorRow {
                id: f.id.to_string(),
                label: f.label(),
            });
            Ok(())
        }

        LibrariesCommand::Sections { floor } => {
            let id = util::entity_id(&floor);
            let sections =
                util::fetch("Loading sections", global, ctx.client().list_sections(&id)).await?;
            let sections: Vec<_> = sections.into_iter().map(Arc::new).collect();
            util::print_rows(&sections, global, |s| SectionRow {
                id: s.id.to_string(),
                name: s.name.clone(),
                kind: label(s.section_type_display.as_ref(), s.section_type.as_ref()),
            });
            Ok(())
        }

        LibrariesCommand::Seats { section } => {
            let id = util::entity_id(&section);
            let seats = util::fetch("Loading seats", global, ctx.client().list_seats(&id)).await?;
            let seats: Vec<_> = seats.into_iter().map(Arc::new).collect();
            util::print_rows(&seats, global, |s| {
                let status = s
                    .status_display
                    .clone()
                    .unwrap_or_else(|| s.status.to_string());
                SeatRow {
                    id: s.id.to_string(),
                    number: s.seat_number.clone(),
                    kind: label(s.seat_type_display.as_ref(), s.seat_type.as_ref()),
                    power: util::yes_no(s.has_power_outlet),
                    status: painter.paint(&status, seat_tone(s.status)),
                }
            });
            Ok(())
        }

        LibrariesCommand::Apply { library, reason } => {
            util::require_token(ctx)?;
            let directory = LibraryDirectory::new(ctx.clone());
            let id = util::entity_id(&library);
            // Applications are loaded first so an open one is caught locally
            let query = LibraryQuery {
                page: PageParams::page(1),
                ..LibraryQuery::default()
            };
            util::spin("Checking applications", global, directory.load(&query)).await?;
            let application = util::spin(
                "Sending application",
                global,
                directory.apply(&id, reason.as_deref()),
            )
            .await?;
            util::print_detail(
                application.as_ref(),
                global,
                |a| {
                    format!(
                        "Application {} for {} is {}",
                        a.id,
                        a.library_name.as_deref().unwrap_or("library"),
                        a.status
                    )
                },
                |a| a.id.to_string(),
            );
            Ok(())
        }

        LibrariesCommand::Applications(list) => {
            util::require_token(ctx)?;
            let page = util::fetch(
                "Loading applications",
                global,
                ctx.client().my_applications(util::page(list)),
            )
            .await?;
            let applications: Vec<_> = page.results.into_iter().map(Arc::new).collect();
            util::print_rows(&applications, global, application_row);
            Ok(())
        }
    }
}
