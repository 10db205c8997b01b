// Library events and registrations.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CheckInCode, EntityId, Event, EventRegistration, Page, RegisterForEventRequest};
use crate::query::{EventQuery, QueryParams, RegistrationQuery};

impl ApiClient {
    pub async fn list_events(&self, query: &EventQuery) -> Result<Page<Event>, Error> {
        self.get_with_params("events/", &query.to_params()?).await
    }

    pub async fn get_event(&self, id: &EntityId) -> Result<Event, Error> {
        self.get(&format!("events/{id}/")).await
    }

    pub async fn register_for_event(&self, event_id: &EntityId) -> Result<EventRegistration, Error> {
        self.post(
            "events/registrations/",
            &RegisterForEventRequest { event: event_id },
        )
        .await
    }

    pub async fn list_registrations(
        &self,
        query: &RegistrationQuery,
    ) -> Result<Page<EventRegistration>, Error> {
        self.get_with_params("events/registrations/", &query.to_params()?)
            .await
    }

    pub async fn cancel_registration(&self, id: &EntityId) -> Result<EventRegistration, Error> {
        self.post_action(&format!("events/registrations/{id}/cancel/"))
            .await
    }

    pub async fn registration_qr(&self, id: &EntityId) -> Result<CheckInCode, Error> {
        self.post_action(&format!("events/registrations/{id}/qr/"))
            .await
    }
}
