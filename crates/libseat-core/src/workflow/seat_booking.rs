// ── Seat booking state machine ──
//
// library → floor → section → seat → date → time → confirm → submit.
// Changing a parent clears every dependent selection and list, and
// supersedes dependent fetches still in flight. Nothing here performs
// I/O; `SeatBookingSession` drives it.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use strum::{Display, IntoStaticStr};

use libseat_api::models::{
    CreateBookingRequest, EntityId, Floor, Library, Seat, SeatBooking, Section, TimeSlot,
};

use super::{Applied, FetchTicket, Generations, Level};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum BookingStep {
    #[default]
    Idle,
    SelectingResource,
    SelectingTime,
    Confirming,
    Submitting,
    Success,
    /// Submission failed; the confirmation is shown again with the error.
    Error,
}

/// Everything the user has picked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub library: Option<EntityId>,
    pub floor: Option<EntityId>,
    pub section: Option<EntityId>,
    pub seat: Option<EntityId>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Read-only confirmation view of a complete selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub library: String,
    pub floor: String,
    pub section: String,
    pub seat: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default)]
pub struct SeatBookingFlow {
    step: BookingStep,
    libraries: Vec<Library>,
    floors: Vec<Floor>,
    sections: Vec<Section>,
    seats: Vec<Seat>,
    slots: Vec<TimeSlot>,
    selection: Selection,
    generations: Generations,
    loading: HashSet<Level>,
    error: Option<String>,
    booking: Option<SeatBooking>,
}

impl SeatBookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn is_loading(&self, level: Level) -> bool {
        self.loading.contains(&level)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The booking created by a successful submission.
    pub fn booking(&self) -> Option<&SeatBooking> {
        self.booking.as_ref()
    }

    // ── Selection transitions ────────────────────────────────────────

    /// Begin (or restart) the flow. Tickets issued before the restart
    /// become stale.
    pub fn start(&mut self) -> FetchTicket {
        let mut generations = std::mem::take(&mut self.generations);
        generations.reset();
        *self = Self {
            generations,
            step: BookingStep::SelectingResource,
            ..Self::default()
        };
        self.issue(Level::Libraries)
    }

    pub fn select_library(&mut self, id: &EntityId) -> Result<FetchTicket, CoreError> {
        self.ensure_editable("change the library")?;
        if !self.libraries.iter().any(|l| &l.id == id) {
            return Err(unknown("library", id));
        }
        self.selection.library = Some(id.clone());
        self.clear_below(Level::Floors);
        self.step = BookingStep::SelectingResource;
        Ok(self.issue(Level::Floors))
    }

    pub fn select_floor(&mut self, id: &EntityId) -> Result<FetchTicket, CoreError> {
        self.ensure_editable("change the floor")?;
        if !self.floors.iter().any(|f| &f.id == id) {
            return Err(unknown("floor", id));
        }
        self.selection.floor = Some(id.clone());
        self.clear_below(Level::Sections);
        self.step = BookingStep::SelectingResource;
        Ok(self.issue(Level::Sections))
    }

    pub fn select_section(&mut self, id: &EntityId) -> Result<FetchTicket, CoreError> {
        self.ensure_editable("change the section")?;
        if !self.sections.iter().any(|s| &s.id == id) {
            return Err(unknown("section", id));
        }
        self.selection.section = Some(id.clone());
        self.clear_below(Level::Seats);
        self.step = BookingStep::SelectingResource;
        Ok(self.issue(Level::Seats))
    }

    /// Pick a seat. Availability is fetched once a date is also chosen.
    pub fn select_seat(&mut self, id: &EntityId) -> Result<Option<FetchTicket>, CoreError> {
        self.ensure_editable("change the seat")?;
        if !self.seats.iter().any(|s| &s.id == id) {
            return Err(unknown("seat", id));
        }
        self.selection.seat = Some(id.clone());
        self.clear_below(Level::Slots);
        self.step = BookingStep::SelectingTime;
        Ok(self.slots_ticket())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<Option<FetchTicket>, CoreError> {
        self.ensure_editable("change the date")?;
        self.selection.date = Some(date);
        self.clear_below(Level::Slots);
        if self.selection.seat.is_some() {
            self.step = BookingStep::SelectingTime;
        }
        Ok(self.slots_ticket())
    }

    /// Set the requested range. Either end may be left open until submit.
    pub fn set_times(
        &mut self,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Result<(), CoreError> {
        self.ensure_editable("change the time")?;
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(CoreError::validation("End time must be after start time"));
            }
        }
        self.selection.start_time = start;
        self.selection.end_time = end;
        if matches!(self.step, BookingStep::Confirming | BookingStep::Error) {
            self.step = BookingStep::SelectingTime;
        }
        Ok(())
    }

    /// Use one of the server-provided slots as the range.
    pub fn select_slot(&mut self, slot: &TimeSlot) -> Result<(), CoreError> {
        if !slot.is_available {
            return Err(CoreError::validation("That time slot is not available"));
        }
        self.set_times(Some(slot.start_time), Some(slot.end_time))
    }

    /// Move to the confirmation step.
    pub fn review(&mut self) -> Result<(), CoreError> {
        if self.step != BookingStep::SelectingTime {
            return Err(self.transition_error("review the booking"));
        }
        if self.selection.seat.is_none() {
            return Err(CoreError::validation("Select a seat"));
        }
        if self.selection.date.is_none() {
            return Err(CoreError::validation("Select a date"));
        }
        self.step = BookingStep::Confirming;
        Ok(())
    }

    pub fn summary(&self) -> Option<BookingSummary> {
        let sel = &self.selection;
        let library = self.libraries.iter().find(|l| Some(&l.id) == sel.library.as_ref())?;
        let floor = self.floors.iter().find(|f| Some(&f.id) == sel.floor.as_ref())?;
        let section = self.sections.iter().find(|s| Some(&s.id) == sel.section.as_ref())?;
        let seat = self.seats.iter().find(|s| Some(&s.id) == sel.seat.as_ref())?;
        Some(BookingSummary {
            library: library.name.clone(),
            floor: floor.label(),
            section: section.name.clone(),
            seat: seat.seat_number.clone(),
            date: sel.date?,
            start_time: sel.start_time,
            end_time: sel.end_time,
        })
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate the selection and produce the create request.
    ///
    /// On failure the flow stays where it is with the message recorded,
    /// and no request must be sent.
    pub fn begin_submit(&mut self) -> Result<CreateBookingRequest, CoreError> {
        if !matches!(self.step, BookingStep::Confirming | BookingStep::Error) {
            return Err(self.transition_error("submit"));
        }
        match self.build_request() {
            Ok(req) => {
                self.step = BookingStep::Submitting;
                self.error = None;
                Ok(req)
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Record the server's answer to a submission.
    pub fn finish_submit(&mut self, result: Result<SeatBooking, String>) {
        if self.step != BookingStep::Submitting {
            return;
        }
        match result {
            Ok(booking) => {
                self.booking = Some(booking);
                self.step = BookingStep::Success;
            }
            Err(message) => {
                self.error = Some(message);
                self.step = BookingStep::Error;
            }
        }
    }

    /// Step back one screen. Selections are kept.
    pub fn back(&mut self) -> Result<BookingStep, CoreError> {
        self.step = match self.step {
            BookingStep::Submitting => return Err(self.transition_error("go back")),
            BookingStep::SelectingTime => BookingStep::SelectingResource,
            BookingStep::Confirming | BookingStep::Error => BookingStep::SelectingTime,
            other => other,
        };
        self.error = None;
        Ok(self.step)
    }

    // ── Fetch results ────────────────────────────────────────────────

    pub fn apply_libraries(&mut self, ticket: FetchTicket, libraries: Vec<Library>) -> Applied {
        self.accept(ticket, |flow| flow.libraries = libraries)
    }

    pub fn apply_floors(&mut self, ticket: FetchTicket, floors: Vec<Floor>) -> Applied {
        self.accept(ticket, |flow| flow.floors = floors)
    }

    pub fn apply_sections(&mut self, ticket: FetchTicket, sections: Vec<Section>) -> Applied {
        self.accept(ticket, |flow| flow.sections = sections)
    }

    pub fn apply_seats(&mut self, ticket: FetchTicket, seats: Vec<Seat>) -> Applied {
        self.accept(ticket, |flow| flow.seats = seats)
    }

    pub fn apply_slots(&mut self, ticket: FetchTicket, slots: Vec<TimeSlot>) -> Applied {
        self.accept(ticket, |flow| flow.slots = slots)
    }

    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: String) -> Applied {
        self.accept(ticket, |flow| flow.error = Some(message))
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn issue(&mut self, level: Level) -> FetchTicket {
        self.loading.insert(level);
        self.error = None;
        self.generations.issue(level)
    }

    fn accept(&mut self, ticket: FetchTicket, apply: impl FnOnce(&mut Self)) -> Applied {
        if !self.generations.is_current(ticket) {
            return Applied::Stale;
        }
        self.loading.remove(&ticket.level);
        apply(self);
        Applied::Fresh
    }

    fn slots_ticket(&mut self) -> Option<FetchTicket> {
        if self.selection.seat.is_some() && self.selection.date.is_some() {
            Some(self.issue(Level::Slots))
        } else {
            None
        }
    }

    /// Clear `from` and every level below it, superseding their fetches.
    fn clear_below(&mut self, from: Level) {
        let sel = &mut self.selection;
        if from <= Level::Floors {
            sel.floor = None;
            self.floors.clear();
        }
        if from <= Level::Sections {
            sel.section = None;
            self.sections.clear();
        }
        if from <= Level::Seats {
            sel.seat = None;
            self.seats.clear();
        }
        sel.start_time = None;
        sel.end_time = None;
        self.slots.clear();

        let levels: Vec<Level> = [Level::Floors, Level::Sections, Level::Seats, Level::Slots]
            .into_iter()
            .filter(|l| *l >= from)
            .collect();
        for level in &levels {
            self.loading.remove(level);
        }
        self.generations.invalidate(&levels);
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), CoreError> {
        match self.step {
            BookingStep::Submitting | BookingStep::Success | BookingStep::Idle => {
                Err(self.transition_error(action))
            }
            _ => Ok(()),
        }
    }

    fn transition_error(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            step: self.step.into(),
            action,
        }
    }

    fn build_request(&self) -> Result<CreateBookingRequest, CoreError> {
        let sel = &self.selection;
        let seat = sel
            .seat
            .clone()
            .ok_or_else(|| CoreError::validation("Select a seat"))?;
        let booking_date = sel
            .date
            .ok_or_else(|| CoreError::validation("Select a date"))?;
        let start_time = sel
            .start_time
            .ok_or_else(|| CoreError::validation("Select a start time"))?;
        let end_time = sel
            .end_time
            .ok_or_else(|| CoreError::validation("Select an end time"))?;
        if end_time <= start_time {
            return Err(CoreError::validation("End time must be after start time"));
        }
        Ok(CreateBookingRequest {
            seat,
            booking_date,
            start_time,
            end_time,
        })
    }
}

fn unknown(kind: &'static str, id: &EntityId) -> CoreError {
    CoreError::UnknownResource {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn id(n: u64) -> EntityId {
        EntityId::from(n)
    }

    fn libraries() -> Vec<Library> {
        serde_json::from_value(json!([
            { "id": 1, "name": "Central" },
            { "id": 2, "name": "Annex" },
        ]))
        .unwrap()
    }

    fn floors(library: u64) -> Vec<Floor> {
        serde_json::from_value(json!([
            { "id": library * 10 + 1, "library": library, "number": 1 },
            { "id": library * 10 + 2, "library": library, "number": 2, "name": "Mezzanine" },
        ]))
        .unwrap()
    }

    fn sections(floor: u64) -> Vec<Section> {
        serde_json::from_value(json!([
            { "id": floor * 10 + 1, "floor": floor, "name": "Quiet zone" },
        ]))
        .unwrap()
    }

    fn seats(section: u64) -> Vec<Seat> {
        serde_json::from_value(json!([
            { "id": section * 10 + 1, "section": section, "seat_number": "A-1", "status": "AVAILABLE" },
        ]))
        .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    /// Drive a flow to the confirmation step with a full selection.
    fn confirmed_flow() -> SeatBookingFlow {
        let mut flow = SeatBookingFlow::new();
        let t = flow.start();
        flow.apply_libraries(t, libraries());
        let t = flow.select_library(&id(1)).unwrap();
        flow.apply_floors(t, floors(1));
        let t = flow.select_floor(&id(11)).unwrap();
        flow.apply_sections(t, sections(11));
        let t = flow.select_section(&id(111)).unwrap();
        flow.apply_seats(t, seats(111));
        assert!(flow.select_seat(&id(1111)).unwrap().is_none());
        let t = flow.select_date(date()).unwrap().unwrap();
        flow.apply_slots(t, Vec::new());
        flow.set_times(Some(hm(9, 0)), Some(hm(11, 0))).unwrap();
        flow.review().unwrap();
        flow
    }

    #[test]
    fn changing_library_resets_dependents() {
        let mut flow = confirmed_flow();
        flow.back().unwrap();
        flow.back().unwrap();

        let t = flow.select_library(&id(2)).unwrap();
        assert_eq!(t.level, Level::Floors);
        let sel = flow.selection();
        assert_eq!(sel.library, Some(id(2)));
        assert_eq!(sel.floor, None);
        assert_eq!(sel.section, None);
        assert_eq!(sel.seat, None);
        assert_eq!(sel.start_time, None);
        assert!(flow.floors().is_empty());
        assert!(flow.sections().is_empty());
        assert!(flow.seats().is_empty());
        assert_eq!(flow.step(), BookingStep::SelectingResource);
    }

    #[test]
    fn stale_floor_response_is_discarded() {
        let mut flow = SeatBookingFlow::new();
        let t = flow.start();
        flow.apply_libraries(t, libraries());

        let first = flow.select_library(&id(1)).unwrap();
        let second = flow.select_library(&id(2)).unwrap();

        assert_eq!(flow.apply_floors(second, floors(2)), Applied::Fresh);
        assert_eq!(flow.apply_floors(first, floors(1)), Applied::Stale);
        assert!(flow.floors().iter().all(|f| f.library == id(2)));
    }

    #[test]
    fn section_response_for_old_floor_is_discarded() {
        let mut flow = SeatBookingFlow::new();
        let t = flow.start();
        flow.apply_libraries(t, libraries());
        let t = flow.select_library(&id(1)).unwrap();
        flow.apply_floors(t, floors(1));

        let old = flow.select_floor(&id(11)).unwrap();
        let _new = flow.select_floor(&id(12)).unwrap();
        assert!(flow.apply_sections(old, sections(11)).is_stale());
        assert!(flow.sections().is_empty());
        assert!(flow.is_loading(Level::Sections));
    }

    #[test]
    fn restart_makes_old_tickets_stale() {
        let mut flow = SeatBookingFlow::new();
        let old = flow.start();
        let _ = flow.start();
        assert!(flow.apply_libraries(old, libraries()).is_stale());
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let mut flow = SeatBookingFlow::new();
        let t = flow.start();
        flow.apply_libraries(t, libraries());
        let err = flow.select_library(&id(99)).unwrap_err();
        assert!(matches!(err, CoreError::UnknownResource { kind: "library", .. }));
    }

    #[test]
    fn missing_start_time_blocks_submit() {
        let mut flow = confirmed_flow();
        flow.set_times(None, Some(hm(11, 0))).unwrap();
        flow.review().unwrap();

        let err = flow.begin_submit().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(flow.step(), BookingStep::Confirming);
        assert_eq!(flow.error(), Some("Select a start time"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut flow = confirmed_flow();
        let err = flow.set_times(Some(hm(12, 0)), Some(hm(12, 0))).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(flow.selection().start_time, Some(hm(9, 0)));
    }

    #[test]
    fn submit_builds_request_from_selection() {
        let mut flow = confirmed_flow();
        let summary = flow.summary().unwrap();
        assert_eq!(summary.library, "Central");
        assert_eq!(summary.floor, "Floor 1");
        assert_eq!(summary.seat, "A-1");

        let req = flow.begin_submit().unwrap();
        assert_eq!(req.seat, id(1111));
        assert_eq!(req.booking_date, date());
        assert_eq!(req.start_time, hm(9, 0));
        assert_eq!(req.end_time, hm(11, 0));
        assert_eq!(flow.step(), BookingStep::Submitting);
    }

    #[test]
    fn edits_are_blocked_while_submitting() {
        let mut flow = confirmed_flow();
        flow.begin_submit().unwrap();
        let err = flow.select_date(date()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                step: "submitting",
                ..
            }
        ));
        assert!(flow.back().is_err());
    }

    #[test]
    fn failed_submit_allows_resubmit() {
        let mut flow = confirmed_flow();
        flow.begin_submit().unwrap();
        flow.finish_submit(Err("Seat already booked".into()));

        assert_eq!(flow.step(), BookingStep::Error);
        assert_eq!(flow.error(), Some("Seat already booked"));
        assert!(flow.summary().is_some());

        flow.begin_submit().unwrap();
        assert_eq!(flow.step(), BookingStep::Submitting);
        assert_eq!(flow.error(), None);
    }

    #[test]
    fn back_walks_one_step() {
        let mut flow = confirmed_flow();
        assert_eq!(flow.back().unwrap(), BookingStep::SelectingTime);
        assert_eq!(flow.back().unwrap(), BookingStep::SelectingResource);
        assert_eq!(flow.selection().seat, Some(id(1111)));
    }

    #[test]
    fn unavailable_slot_cannot_be_picked() {
        let mut flow = confirmed_flow();
        let slot: TimeSlot = serde_json::from_value(json!({
            "start_time": "13:00:00",
            "end_time": "14:00:00",
            "is_available": false,
        }))
        .unwrap();
        assert!(flow.select_slot(&slot).is_err());
    }
}
