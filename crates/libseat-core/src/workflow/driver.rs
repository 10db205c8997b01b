// ── Async workflow drivers ──
//
// Run a workflow state machine against the API. Every cascaded fetch
// gets a generation ticket and a cancellation token, issued together
// under the flow's lock. A parent selection cancels the tokens of its
// dependents, and a response that arrives after its ticket was
// superseded is discarded.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use chrono::NaiveTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use libseat_api::models::{EntityId, EventRegistration, SeatBooking, TimeSlot};
use libseat_api::query::MAX_PAGE_SIZE;
use libseat_api::{EventQuery, LibraryQuery, PageParams};

use super::{
    Applied, BookingStep, EventRegistrationFlow, FetchTicket, Level, RegistrationStep,
    SeatBookingFlow,
};
use crate::context::AppContext;
use crate::error::CoreError;

fn full_page() -> PageParams {
    PageParams {
        page: Some(1),
        page_size: Some(MAX_PAGE_SIZE),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A flow plus the cancellation tokens of its in-flight fetches, one per
/// level. Both live behind the same mutex: the token for a ticket is armed
/// before the lock that issued the ticket is released, so the newest
/// ticket of a level always owns the live token.
struct Guarded<F> {
    flow: F,
    tokens: HashMap<Level, CancellationToken>,
}

impl<F> Guarded<F> {
    fn new(flow: F) -> Mutex<Self> {
        Mutex::new(Self {
            flow,
            tokens: HashMap::new(),
        })
    }

    /// Cancel the ticket's level and everything below it, then arm a fresh
    /// token for the ticket.
    fn arm(&mut self, ticket: FetchTicket) -> (FetchTicket, CancellationToken) {
        self.cancel_from(ticket.level);
        let token = CancellationToken::new();
        self.tokens.insert(ticket.level, token.clone());
        (ticket, token)
    }

    fn cancel_from(&mut self, level: Level) {
        self.tokens.retain(|l, token| {
            if *l >= level {
                token.cancel();
                false
            } else {
                true
            }
        });
    }
}

/// Await `fetch` unless `token` fires first.
async fn fetch_or_cancel<T, F>(
    ticket: FetchTicket,
    token: CancellationToken,
    fetch: F,
) -> Option<Result<T, CoreError>>
where
    F: Future<Output = Result<T, libseat_api::Error>>,
{
    tokio::select! {
        () = token.cancelled() => {
            debug!(level = %ticket.level, generation = ticket.generation, "fetch cancelled");
            None
        }
        result = fetch => Some(result.map_err(CoreError::from)),
    }
}

fn log_stale(ticket: FetchTicket, applied: Applied) -> Applied {
    if applied.is_stale() {
        warn!(
            level = %ticket.level,
            generation = ticket.generation,
            "discarded superseded response"
        );
    }
    applied
}

// ── Seat booking ─────────────────────────────────────────────────────

/// Drives a [`SeatBookingFlow`] against the API.
pub struct SeatBookingSession {
    ctx: AppContext,
    state: Mutex<Guarded<SeatBookingFlow>>,
}

impl SeatBookingSession {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Guarded::new(SeatBookingFlow::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, Guarded<SeatBookingFlow>> {
        lock(&self.state)
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> SeatBookingFlow {
        self.state().flow.clone()
    }

    pub fn step(&self) -> BookingStep {
        self.state().flow.step()
    }

    /// Start over and load the active libraries.
    pub async fn start(&self) -> Result<Applied, CoreError> {
        let (ticket, token) = {
            let mut state = self.state();
            state.cancel_from(Level::Libraries);
            let ticket = state.flow.start();
            state.arm(ticket)
        };
        let query = LibraryQuery {
            is_active: Some(true),
            page: full_page(),
            ..LibraryQuery::default()
        };
        let client = self.ctx.client();
        let fetch = async { client.list_libraries(&query).await.map(|p| p.results) };
        self.finish_fetch(ticket, fetch_or_cancel(ticket, token, fetch).await, |flow, t, v| {
            flow.apply_libraries(t, v)
        })
    }

    pub async fn select_library(&self, id: &EntityId) -> Result<Applied, CoreError> {
        let (ticket, token) = {
            let mut state = self.state();
            let ticket = state.flow.select_library(id)?;
            state.arm(ticket)
        };
        let fetch = self.ctx.client().list_floors(id);
        self.finish_fetch(ticket, fetch_or_cancel(ticket, token, fetch).await, |flow, t, v| {
            flow.apply_floors(t, v)
        })
    }

    pub async fn select_floor(&self, id: &EntityId) -> Result<Applied, CoreError> {
        let (ticket, token) = {
            let mut state = self.state();
            let ticket = state.flow.select_floor(id)?;
            state.arm(ticket)
        };
        let fetch = self.ctx.client().list_sections(id);
        self.finish_fetch(ticket, fetch_or_cancel(ticket, token, fetch).await, |flow, t, v| {
            flow.apply_sections(t, v)
        })
    }

    pub async fn select_section(&self, id: &EntityId) -> Result<Applied, CoreError> {
        let (ticket, token) = {
            let mut state = self.state();
            let ticket = state.flow.select_section(id)?;
            state.arm(ticket)
        };
        let fetch = self.ctx.client().list_seats(id);
        self.finish_fetch(ticket, fetch_or_cancel(ticket, token, fetch).await, |flow, t, v| {
            flow.apply_seats(t, v)
        })
    }

    pub async fn select_seat(&self, id: &EntityId) -> Result<Applied, CoreError> {
        self.load_slots(|flow| flow.select_seat(id)).await
    }

    pub async fn select_date(&self, date: NaiveDate) -> Result<Applied, CoreError> {
        self.load_slots(|flow| flow.select_date(date)).await
    }

    pub fn set_times(
        &self,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Result<(), CoreError> {
        self.state().flow.set_times(start, end)
    }

    pub fn select_slot(&self, slot: &TimeSlot) -> Result<(), CoreError> {
        self.state().flow.select_slot(slot)
    }

    pub fn review(&self) -> Result<(), CoreError> {
        self.state().flow.review()
    }

    pub fn back(&self) -> Result<BookingStep, CoreError> {
        self.state().flow.back()
    }

    /// Validate and create the booking. Nothing is sent when validation
    /// fails; a server rejection leaves the flow in the error step.
    pub async fn submit(&self) -> Result<SeatBooking, CoreError> {
        self.ctx.require_session()?;
        let req = self.state().flow.begin_submit()?;

        match self.ctx.client().create_booking(&req).await {
            Ok(booking) => {
                info!(booking = %booking.id, seat = %req.seat, "seat booked");
                self.state().flow.finish_submit(Ok(booking.clone()));
                self.ctx.ui().success(format!(
                    "Seat booked for {} from {} to {}",
                    req.booking_date,
                    req.start_time.format("%H:%M"),
                    req.end_time.format("%H:%M"),
                ));
                Ok(booking)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.state().flow.finish_submit(Err(err.user_message()));
                Err(self.ctx.report("create booking", err))
            }
        }
    }

    /// Run a selection that may need fresh slots. No ticket means a slot
    /// input was cleared, which cancels any slot fetch still in flight.
    async fn load_slots(
        &self,
        select: impl FnOnce(&mut SeatBookingFlow) -> Result<Option<FetchTicket>, CoreError>,
    ) -> Result<Applied, CoreError> {
        let (ticket, token, seat, date) = {
            let mut state = self.state();
            let Some(ticket) = select(&mut state.flow)? else {
                state.cancel_from(Level::Slots);
                return Ok(Applied::Fresh);
            };
            let selection = state.flow.selection();
            let (Some(seat), Some(date)) = (selection.seat.clone(), selection.date) else {
                return Ok(Applied::Stale);
            };
            let (ticket, token) = state.arm(ticket);
            (ticket, token, seat, date)
        };
        let fetch = self.ctx.client().seat_availability(&seat, date);
        self.finish_fetch(ticket, fetch_or_cancel(ticket, token, fetch).await, |flow, t, v| {
            flow.apply_slots(t, v)
        })
    }

    fn finish_fetch<T>(
        &self,
        ticket: FetchTicket,
        outcome: Option<Result<T, CoreError>>,
        apply: impl FnOnce(&mut SeatBookingFlow, FetchTicket, T) -> Applied,
    ) -> Result<Applied, CoreError> {
        let Some(result) = outcome else {
            return Ok(Applied::Stale);
        };
        let mut state = self.state();
        let flow = &mut state.flow;
        match result {
            Ok(data) => Ok(log_stale(ticket, apply(flow, ticket, data))),
            Err(err) => {
                if flow.fail_fetch(ticket, err.user_message()).is_stale() {
                    return Ok(log_stale(ticket, Applied::Stale));
                }
                warn!(level = %ticket.level, error = %err, "fetch failed");
                Err(err)
            }
        }
    }
}

// ── Event registration ───────────────────────────────────────────────

/// Drives an [`EventRegistrationFlow`] against the API.
pub struct EventRegistrationSession {
    ctx: AppContext,
    state: Mutex<Guarded<EventRegistrationFlow>>,
}

impl EventRegistrationSession {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Guarded::new(EventRegistrationFlow::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, Guarded<EventRegistrationFlow>> {
        lock(&self.state)
    }

    pub fn snapshot(&self) -> EventRegistrationFlow {
        self.state().flow.clone()
    }

    pub fn step(&self) -> RegistrationStep {
        self.state().flow.step()
    }

    /// Start over, listing upcoming events (optionally for one library).
    pub async fn start(&self, library: Option<EntityId>) -> Result<Applied, CoreError> {
        self.load_events(|flow| Ok(flow.start(library))).await
    }

    pub async fn filter_library(&self, library: Option<EntityId>) -> Result<Applied, CoreError> {
        self.load_events(|flow| flow.filter_library(library)).await
    }

    pub fn select_event(&self, id: &EntityId) -> Result<(), CoreError> {
        self.state().flow.select_event(id)
    }

    pub fn back(&self) -> Result<RegistrationStep, CoreError> {
        self.state().flow.back()
    }

    pub async fn submit(&self) -> Result<EventRegistration, CoreError> {
        self.ctx.require_session()?;
        let event = self.state().flow.begin_submit()?;

        match self.ctx.client().register_for_event(&event).await {
            Ok(registration) => {
                info!(event = %event, registration = %registration.id, "registered for event");
                self.state().flow.finish_submit(Ok(registration.clone()));
                let title = registration
                    .event_title
                    .clone()
                    .unwrap_or_else(|| "the event".into());
                self.ctx.ui().success(format!("Registered for {title}"));
                Ok(registration)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.state().flow.finish_submit(Err(err.user_message()));
                Err(self.ctx.report("register for event", err))
            }
        }
    }

    async fn load_events(
        &self,
        select: impl FnOnce(&mut EventRegistrationFlow) -> Result<FetchTicket, CoreError>,
    ) -> Result<Applied, CoreError> {
        let (ticket, token, library) = {
            let mut state = self.state();
            let ticket = select(&mut state.flow)?;
            let library = state.flow.library_filter().cloned();
            let (ticket, token) = state.arm(ticket);
            (ticket, token, library)
        };
        let query = EventQuery {
            library,
            upcoming: Some(true),
            page: full_page(),
            ..EventQuery::default()
        };
        let client = self.ctx.client();
        let fetch = async { client.list_events(&query).await.map(|p| p.results) };
        let Some(result) = fetch_or_cancel(ticket, token, fetch).await else {
            return Ok(Applied::Stale);
        };
        let mut state = self.state();
        match result {
            Ok(events) => Ok(log_stale(ticket, state.flow.apply_events(ticket, events))),
            Err(err) => {
                if state.flow.fail_fetch(ticket, err.user_message()).is_stale() {
                    return Ok(log_stale(ticket, Applied::Stale));
                }
                warn!(error = %err, "event list fetch failed");
                Err(err)
            }
        }
    }
}
