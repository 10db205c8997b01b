// Book catalogue and reservations.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Book, BookReservation, EntityId, Page, ReserveBookRequest};
use crate::query::{BookQuery, QueryParams, ReservationQuery};

impl ApiClient {
    pub async fn list_books(&self, query: &BookQuery) -> Result<Page<Book>, Error> {
        self.get_with_params("books/", &query.to_params()?).await
    }

    pub async fn get_book(&self, id: &EntityId) -> Result<Book, Error> {
        self.get(&format!("books/{id}/")).await
    }

    pub async fn reserve_book(&self, book_id: &EntityId) -> Result<BookReservation, Error> {
        self.post("books/reservations/", &ReserveBookRequest { book: book_id })
            .await
    }

    pub async fn list_reservations(
        &self,
        query: &ReservationQuery,
    ) -> Result<Page<BookReservation>, Error> {
        self.get_with_params("books/reservations/", &query.to_params()?)
            .await
    }

    pub async fn cancel_reservation(&self, id: &EntityId) -> Result<BookReservation, Error> {
        self.post_action(&format!("books/reservations/{id}/cancel/"))
            .await
    }
}
