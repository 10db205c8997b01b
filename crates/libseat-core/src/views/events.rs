// ── Events and registrations ──

use std::sync::Arc;

use libseat_api::models::{EntityId, Event, EventRegistration, RegistrationStatus};
use libseat_api::{EventQuery, RegistrationQuery};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

pub struct EventBoard {
    ctx: AppContext,
    events: Listing<Event>,
    registrations: Listing<EventRegistration>,
}

impl EventBoard {
    pub fn new(ctx: AppContext) -> Self {
        let events = Listing::new(ctx.page_size());
        let registrations = Listing::new(ctx.page_size());
        Self {
            ctx,
            events,
            registrations,
        }
    }

    pub fn events(&self) -> &Listing<Event> {
        &self.events
    }

    pub fn registrations(&self) -> &Listing<EventRegistration> {
        &self.registrations
    }

    pub async fn load_events(&self, query: &EventQuery) -> Result<(), CoreError> {
        let query = EventQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.events
            .load(query.page, self.ctx.client().list_events(&query))
            .await
    }

    pub async fn load_registrations(&self, query: &RegistrationQuery) -> Result<(), CoreError> {
        self.ctx.require_session()?;
        let query = RegistrationQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.registrations
            .load(query.page, self.ctx.client().list_registrations(&query))
            .await
    }

    /// The user's live registration for `event`, if any.
    pub fn registration_for(&self, event: &EntityId) -> Option<Arc<EventRegistration>> {
        self.registrations
            .list()
            .filtered(|r| {
                &r.event == event
                    && matches!(
                        r.status,
                        RegistrationStatus::Registered | RegistrationStatus::Waitlisted
                    )
            })
            .into_iter()
            .next()
    }

    pub async fn cancel_registration(
        &self,
        id: &EntityId,
    ) -> Result<Arc<EventRegistration>, CoreError> {
        let result = self.ctx.client().cancel_registration(id).await;
        self.registrations
            .apply(&self.ctx, "cancel registration", result, |_| {
                "Registration cancelled".into()
            })
    }
}
