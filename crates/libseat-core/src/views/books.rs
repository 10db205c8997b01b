// ── Book catalogue and reservations ──

use std::sync::Arc;

use libseat_api::models::{Book, BookReservation, EntityId};
use libseat_api::{BookQuery, ReservationQuery};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

pub struct BookCatalog {
    ctx: AppContext,
    books: Listing<Book>,
    reservations: Listing<BookReservation>,
}

impl BookCatalog {
    pub fn new(ctx: AppContext) -> Self {
        let books = Listing::new(ctx.page_size());
        let reservations = Listing::new(ctx.page_size());
        Self {
            ctx,
            books,
            reservations,
        }
    }

    pub fn books(&self) -> &Listing<Book> {
        &self.books
    }

    pub fn reservations(&self) -> &Listing<BookReservation> {
        &self.reservations
    }

    pub async fn search(&self, query: &BookQuery) -> Result<(), CoreError> {
        let query = BookQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.books
            .load(query.page, self.ctx.client().list_books(&query))
            .await
    }

    pub async fn load_reservations(&self, query: &ReservationQuery) -> Result<(), CoreError> {
        self.ctx.require_session()?;
        let query = ReservationQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.reservations
            .load(query.page, self.ctx.client().list_reservations(&query))
            .await
    }

    /// Reserve a copy. The book row is re-fetched afterwards so its
    /// availability reflects the server's count.
    pub async fn reserve(&self, book: &EntityId) -> Result<Arc<BookReservation>, CoreError> {
        self.ctx.require_session()?;
        if let Some(row) = self.books.list().get(book) {
            if !row.is_available() {
                return Err(CoreError::validation("No copies are available"));
            }
        }
        let result = self.ctx.client().reserve_book(book).await;
        let reservation = self.reservations.apply(&self.ctx, "reserve book", result, |r| {
            match &r.book_title {
                Some(title) => format!("Reserved \"{title}\""),
                None => "Book reserved".into(),
            }
        })?;
        if let Ok(updated) = self.ctx.client().get_book(book).await {
            self.books.list().upsert(updated);
        }
        Ok(reservation)
    }

    pub async fn cancel_reservation(
        &self,
        id: &EntityId,
    ) -> Result<Arc<BookReservation>, CoreError> {
        if let Some(row) = self.reservations.list().get(id) {
            if !row.status.is_cancellable() {
                return Err(CoreError::validation(
                    "This reservation can no longer be cancelled",
                ));
            }
        }
        let result = self.ctx.client().cancel_reservation(id).await;
        self.reservations
            .apply(&self.ctx, "cancel reservation", result, |_| {
                "Reservation cancelled".into()
            })
    }
}
