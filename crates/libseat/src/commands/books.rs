//! Book catalogue and reservation command handlers.

use tabled::Tabled;

use libseat_api::models::{BookReservation, ReservationStatus};
use libseat_api::{BookQuery, ReservationQuery};
use libseat_core::AppContext;
use libseat_core::views::books::BookCatalog;

use crate::cli::{BooksArgs, BooksCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{Painter, Tone};

use super::util;

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Copies")]
    copies: String,
}

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reserved")]
    reserved: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

fn reservation_tone(status: ReservationStatus) -> Tone {
    match status {
        ReservationStatus::Ready => Tone::Good,
        ReservationStatus::Pending | ReservationStatus::Collected => Tone::Active,
        ReservationStatus::Cancelled | ReservationStatus::Expired => Tone::Bad,
        ReservationStatus::Returned | ReservationStatus::Unknown => Tone::Muted,
    }
}

fn reservation_status(r: &BookReservation) -> String {
    r.status_display
        .clone()
        .unwrap_or_else(|| r.status.to_string())
}

fn reservation_detail(r: &BookReservation) -> String {
    [
        format!("ID:       {}", r.id),
        format!(
            "Book:     {}",
            r.book_title.clone().unwrap_or_else(|| r.book.to_string())
        ),
        format!("Library:  {}", util::or_dash(r.library_name.as_deref())),
        format!("Status:   {}", reservation_status(r)),
        format!("Reserved: {}", util::moment(r.reserved_at)),
        format!("Expires:  {}", util::moment(r.expires_at)),
    ]
    .join("\n")
}

pub async fn handle(ctx: &AppContext, args: BooksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(global.color);
    let catalog = BookCatalog::new(ctx.clone());

    match args.command {
        BooksCommand::Search {
            term,
            list,
            library,
            category,
            available,
        } => {
            let query = BookQuery {
                search: term,
                library: library.as_deref().map(util::entity_id),
                category,
                available: available.then_some(true),
                page: util::page(list),
            };
            util::spin("Searching books", global, catalog.search(&query)).await?;
            util::print_listing(catalog.books(), global, |b| BookRow {
                id: b.id.to_string(),
                title: b.title.clone(),
                author: util::or_dash(b.author.as_deref()),
                library: util::or_dash(b.library_name.as_deref()),
                copies: {
                    let copies = format!("{}/{}", b.available_copies, b.total_copies);
                    if b.is_available() {
                        painter.paint(&copies, Tone::Good)
                    } else {
                        painter.paint(&copies, Tone::Muted)
                    }
                },
            });
            Ok(())
        }

        BooksCommand::Reserve { book } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&book);
            let current = util::fetch("Loading book", global, ctx.client().get_book(&id)).await?;
            catalog.books().list().upsert(current);
            let reservation = util::spin("Reserving book", global, catalog.reserve(&id)).await?;
            util::print_detail(reservation.as_ref(), global, reservation_detail, |r| {
                r.id.to_string()
            });
            Ok(())
        }

        BooksCommand::Reservations { list, status } => {
            let query = ReservationQuery {
                statuses: status,
                page: util::page(list),
            };
            util::spin("Loading reservations", global, catalog.load_reservations(&query)).await?;
            util::print_listing(catalog.reservations(), global, |r| ReservationRow {
                id: r.id.to_string(),
                book: r
                    .book_title
                    .clone()
                    .unwrap_or_else(|| r.book.to_string()),
                library: util::or_dash(r.library_name.as_deref()),
                status: painter.paint(&reservation_status(r), reservation_tone(r.status)),
                reserved: util::day(r.reserved_at),
                expires: util::day(r.expires_at),
            });
            Ok(())
        }

        BooksCommand::Cancel { reservation } => {
            util::require_token(ctx)?;
            let id = util::entity_id(&reservation);
            if !util::confirm(&format!("Cancel reservation {id}?"), global)? {
                return Ok(());
            }
            let updated =
                util::spin("Cancelling reservation", global, catalog.cancel_reservation(&id)).await?;
            util::print_detail(updated.as_ref(), global, reservation_detail, |r| {
                r.id.to_string()
            });
            Ok(())
        }
    }
}
