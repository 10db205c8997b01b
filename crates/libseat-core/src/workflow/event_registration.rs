// ── Event registration state machine ──
//
// Optional library filter → event → confirm → submit.

use strum::{Display, IntoStaticStr};

use libseat_api::models::{EntityId, Event, EventRegistration};

use super::{Applied, FetchTicket, Generations, Level};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum RegistrationStep {
    #[default]
    Idle,
    SelectingEvent,
    Confirming,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct EventRegistrationFlow {
    step: RegistrationStep,
    library: Option<EntityId>,
    events: Vec<Event>,
    event: Option<EntityId>,
    generations: Generations,
    loading: bool,
    error: Option<String>,
    registration: Option<EventRegistration>,
}

impl EventRegistrationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn library_filter(&self) -> Option<&EntityId> {
        self.library.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selected_event(&self) -> Option<&Event> {
        let id = self.event.as_ref()?;
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn registration(&self) -> Option<&EventRegistration> {
        self.registration.as_ref()
    }

    pub fn start(&mut self, library: Option<EntityId>) -> FetchTicket {
        let mut generations = std::mem::take(&mut self.generations);
        generations.reset();
        *self = Self {
            generations,
            step: RegistrationStep::SelectingEvent,
            library,
            ..Self::default()
        };
        self.issue()
    }

    /// Narrow the event list to one library (or clear the filter).
    pub fn filter_library(&mut self, library: Option<EntityId>) -> Result<FetchTicket, CoreError> {
        if matches!(
            self.step,
            RegistrationStep::Idle | RegistrationStep::Submitting | RegistrationStep::Success
        ) {
            return Err(self.transition_error("change the library"));
        }
        self.library = library;
        self.event = None;
        self.events.clear();
        self.step = RegistrationStep::SelectingEvent;
        Ok(self.issue())
    }

    pub fn apply_events(&mut self, ticket: FetchTicket, events: Vec<Event>) -> Applied {
        if !self.generations.is_current(ticket) {
            return Applied::Stale;
        }
        self.loading = false;
        self.events = events;
        Applied::Fresh
    }

    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: String) -> Applied {
        if !self.generations.is_current(ticket) {
            return Applied::Stale;
        }
        self.loading = false;
        self.error = Some(message);
        Applied::Fresh
    }

    pub fn select_event(&mut self, id: &EntityId) -> Result<(), CoreError> {
        if self.step != RegistrationStep::SelectingEvent {
            return Err(self.transition_error("choose an event"));
        }
        let event = self
            .events
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| CoreError::UnknownResource {
                kind: "event",
                id: id.to_string(),
            })?;
        if !event.is_registration_open {
            return Err(CoreError::validation(
                "Registration for this event is closed",
            ));
        }
        self.event = Some(id.clone());
        self.error = None;
        self.step = RegistrationStep::Confirming;
        Ok(())
    }

    pub fn begin_submit(&mut self) -> Result<EntityId, CoreError> {
        if !matches!(
            self.step,
            RegistrationStep::Confirming | RegistrationStep::Error
        ) {
            return Err(self.transition_error("submit"));
        }
        let Some(event) = self.event.clone() else {
            self.error = Some("Select an event".into());
            return Err(CoreError::validation("Select an event"));
        };
        self.step = RegistrationStep::Submitting;
        self.error = None;
        Ok(event)
    }

    pub fn finish_submit(&mut self, result: Result<EventRegistration, String>) {
        if self.step != RegistrationStep::Submitting {
            return;
        }
        match result {
            Ok(registration) => {
                self.registration = Some(registration);
                self.step = RegistrationStep::Success;
            }
            Err(message) => {
                self.error = Some(message);
                self.step = RegistrationStep::Error;
            }
        }
    }

    pub fn back(&mut self) -> Result<RegistrationStep, CoreError> {
        self.step = match self.step {
            RegistrationStep::Submitting => return Err(self.transition_error("go back")),
            RegistrationStep::Confirming | RegistrationStep::Error => {
                RegistrationStep::SelectingEvent
            }
            other => other,
        };
        self.error = None;
        Ok(self.step)
    }

    fn issue(&mut self) -> FetchTicket {
        self.loading = true;
        self.error = None;
        self.generations.issue(Level::Events)
    }

    fn transition_error(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            step: self.step.into(),
            action,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn events() -> Vec<Event> {
        serde_json::from_value(json!([
            {
                "id": 5,
                "title": "Rust reading group",
                "start_datetime": "2024-03-04T17:00:00Z",
                "is_registration_open": true,
            },
            {
                "id": 6,
                "title": "Archive tour",
                "start_datetime": "2024-03-05T10:00:00Z",
                "is_registration_open": false,
            },
        ]))
        .unwrap()
    }

    #[test]
    fn closed_event_cannot_be_selected() {
        let mut flow = EventRegistrationFlow::new();
        let t = flow.start(None);
        flow.apply_events(t, events());

        assert!(flow.select_event(&EntityId::from(6u64)).unwrap_err().is_validation());
        flow.select_event(&EntityId::from(5u64)).unwrap();
        assert_eq!(flow.step(), RegistrationStep::Confirming);
        assert_eq!(flow.selected_event().unwrap().title, "Rust reading group");
    }

    #[test]
    fn filter_change_drops_older_event_list() {
        let mut flow = EventRegistrationFlow::new();
        let unfiltered = flow.start(None);
        let filtered = flow.filter_library(Some(EntityId::from(1u64))).unwrap();

        assert!(flow.apply_events(unfiltered, events()).is_stale());
        assert!(flow.events().is_empty());
        assert!(flow.is_loading());
        assert!(!flow.apply_events(filtered, Vec::new()).is_stale());
        assert!(!flow.is_loading());
    }

    #[test]
    fn failed_registration_can_be_retried() {
        let mut flow = EventRegistrationFlow::new();
        let t = flow.start(None);
        flow.apply_events(t, events());
        flow.select_event(&EntityId::from(5u64)).unwrap();

        let event = flow.begin_submit().unwrap();
        assert_eq!(event, EntityId::from(5u64));
        flow.finish_submit(Err("Event is full".into()));
        assert_eq!(flow.step(), RegistrationStep::Error);
        assert_eq!(flow.error(), Some("Event is full"));

        assert!(flow.begin_submit().is_ok());
    }

    #[test]
    fn submit_requires_confirmation() {
        let mut flow = EventRegistrationFlow::new();
        flow.start(None);
        assert!(matches!(
            flow.begin_submit().unwrap_err(),
            CoreError::InvalidTransition { .. }
        ));
    }
}
