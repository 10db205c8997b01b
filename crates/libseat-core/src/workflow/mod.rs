// ── Multi-step selection workflows ──
//
// Each workflow is split in two: a synchronous state machine that owns
// selections and validation, and an async session that drives it against
// the API. Cascaded fetches are tagged with a `FetchTicket`; a response
// whose ticket is no longer current is discarded.

mod driver;
mod event_registration;
mod seat_booking;

use std::collections::HashMap;

use strum::Display;

pub use driver::{EventRegistrationSession, SeatBookingSession};
pub use event_registration::{EventRegistrationFlow, RegistrationStep};
pub use seat_booking::{BookingStep, BookingSummary, SeatBookingFlow, Selection};

/// A dependent list in a selection cascade, parent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Libraries,
    Floors,
    Sections,
    Seats,
    Slots,
    Events,
}

/// Identifies one in-flight fetch for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: Level,
    pub generation: u64,
}

/// Outcome of handing a fetch result back to a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    /// A newer selection superseded the request; the data was dropped.
    Stale,
}

impl Applied {
    pub fn is_stale(self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Monotonic generation counter per level.
#[derive(Debug, Clone, Default)]
pub(crate) struct Generations {
    counter: u64,
    current: HashMap<Level, u64>,
}

impl Generations {
    /// Start a new fetch for `level`, superseding any older one.
    pub(crate) fn issue(&mut self, level: Level) -> FetchTicket {
        self.counter += 1;
        self.current.insert(level, self.counter);
        FetchTicket {
            level,
            generation: self.counter,
        }
    }

    /// Supersede outstanding fetches without starting a new one.
    pub(crate) fn invalidate(&mut self, levels: &[Level]) {
        for &level in levels {
            self.counter += 1;
            self.current.insert(level, self.counter);
        }
    }

    pub(crate) fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current.get(&ticket.level) == Some(&ticket.generation)
    }

    pub(crate) fn reset(&mut self) {
        let levels: Vec<Level> = self.current.keys().copied().collect();
        self.invalidate(&levels);
    }
}
