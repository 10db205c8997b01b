// ── Typed list-endpoint query parameters ──
//
// One struct per resource. Each validates itself before producing the
// `(key, value)` pairs handed to `reqwest`, so malformed filters fail
// locally instead of turning into a confusing 400.

use chrono::NaiveDate;

use crate::error::Error;
use crate::models::{
    ApplicationStatus, BookingStatus, EntityId, RegistrationStatus, ReservationStatus, Role,
};

/// Upper bound the backend accepts for `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

pub type Params = Vec<(&'static str, String)>;

/// A query object that can be serialized into URL parameters.
pub trait QueryParams {
    fn to_params(&self) -> Result<Params, Error>;
}

// ── Shared pieces ────────────────────────────────────────────────────

/// Page selection shared by every list query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            page_size: None,
        }
    }

    fn push(&self, out: &mut Params) -> Result<(), Error> {
        if let Some(page) = self.page {
            if page == 0 {
                return Err(Error::InvalidQuery {
                    field: "page",
                    reason: "must be at least 1".into(),
                });
            }
            out.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(Error::InvalidQuery {
                    field: "page_size",
                    reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
                });
            }
            out.push(("page_size", size.to_string()));
        }
        Ok(())
    }
}

impl QueryParams for PageParams {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        self.push(&mut out)?;
        Ok(out)
    }
}

fn push_search(out: &mut Params, search: Option<&str>) -> Result<(), Error> {
    if let Some(term) = search {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::InvalidQuery {
                field: "search",
                reason: "must not be blank".into(),
            });
        }
        out.push(("search", term.to_owned()));
    }
    Ok(())
}

fn push_id(out: &mut Params, key: &'static str, id: Option<&EntityId>) {
    if let Some(id) = id {
        out.push((key, id.to_string()));
    }
}

fn push_date(out: &mut Params, key: &'static str, date: Option<NaiveDate>) {
    if let Some(date) = date {
        out.push((key, date.format("%Y-%m-%d").to_string()));
    }
}

fn push_bool(out: &mut Params, key: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        out.push((key, value.to_string()));
    }
}

/// Comma-joined multi-value filter (`status=CONFIRMED,CHECKED_IN`).
fn push_statuses<S: ToString>(out: &mut Params, key: &'static str, statuses: &[S]) {
    if !statuses.is_empty() {
        let joined = statuses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        out.push((key, joined));
    }
}

// ── Libraries ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
    pub page: PageParams,
}

impl QueryParams for LibraryQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_search(&mut out, self.search.as_deref())?;
        if let Some(city) = self.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            out.push(("city", city.to_owned()));
        }
        push_bool(&mut out, "is_active", self.is_active);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub library: Option<EntityId>,
    pub page: PageParams,
}

impl QueryParams for ApplicationQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        if let Some(status) = self.status {
            out.push(("status", status.to_string()));
        }
        push_id(&mut out, "library", self.library.as_ref());
        self.page.push(&mut out)?;
        Ok(out)
    }
}

// ── Seat bookings ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub booking_date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub statuses: Vec<BookingStatus>,
    pub library: Option<EntityId>,
    pub seat: Option<EntityId>,
    pub page: PageParams,
}

impl BookingQuery {
    /// Bookings on `date` still holding their slot (confirmed or checked in).
    pub fn current_on(date: NaiveDate) -> Self {
        Self {
            booking_date: Some(date),
            statuses: vec![BookingStatus::Confirmed, BookingStatus::CheckedIn],
            ..Self::default()
        }
    }
}

impl QueryParams for BookingQuery {
    fn to_params(&self) -> Result<Params, Error> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(Error::InvalidQuery {
                    field: "date_from",
                    reason: format!("{from} is after date_to {to}"),
                });
            }
        }
        let mut out = Vec::new();
        push_date(&mut out, "booking_date", self.booking_date);
        push_date(&mut out, "date_from", self.date_from);
        push_date(&mut out, "date_to", self.date_to);
        push_statuses(&mut out, "status", &self.statuses);
        push_id(&mut out, "library", self.library.as_ref());
        push_id(&mut out, "seat", self.seat.as_ref());
        self.page.push(&mut out)?;
        Ok(out)
    }
}

// ── Books ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub search: Option<String>,
    pub library: Option<EntityId>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub page: PageParams,
}

impl QueryParams for BookQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_search(&mut out, self.search.as_deref())?;
        push_id(&mut out, "library", self.library.as_ref());
        if let Some(category) = &self.category {
            out.push(("category", category.clone()));
        }
        push_bool(&mut out, "available", self.available);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    pub statuses: Vec<ReservationStatus>,
    pub page: PageParams,
}

impl QueryParams for ReservationQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_statuses(&mut out, "status", &self.statuses);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub search: Option<String>,
    pub library: Option<EntityId>,
    pub event_type: Option<String>,
    pub upcoming: Option<bool>,
    pub page: PageParams,
}

impl QueryParams for EventQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_search(&mut out, self.search.as_deref())?;
        push_id(&mut out, "library", self.library.as_ref());
        if let Some(kind) = &self.event_type {
            out.push(("event_type", kind.clone()));
        }
        push_bool(&mut out, "upcoming", self.upcoming);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationQuery {
    pub statuses: Vec<RegistrationStatus>,
    pub event: Option<EntityId>,
    pub page: PageParams,
}

impl QueryParams for RegistrationQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_statuses(&mut out, "status", &self.statuses);
        push_id(&mut out, "event", self.event.as_ref());
        self.page.push(&mut out)?;
        Ok(out)
    }
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQuery {
    pub is_read: Option<bool>,
    pub page: PageParams,
}

impl QueryParams for NotificationQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_bool(&mut out, "is_read", self.is_read);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub is_approved: Option<bool>,
    pub page: PageParams,
}

impl QueryParams for UserQuery {
    fn to_params(&self) -> Result<Params, Error> {
        let mut out = Vec::new();
        push_search(&mut out, self.search.as_deref())?;
        if let Some(role) = self.role {
            out.push(("role", role.to_string()));
        }
        push_bool(&mut out, "is_approved", self.is_approved);
        self.page.push(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn current_bookings_query_joins_statuses() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let params = BookingQuery::current_on(date).to_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("booking_date", "2024-01-15".to_owned()),
                ("status", "CONFIRMED,CHECKED_IN".to_owned()),
            ]
        );
    }

    #[test]
    fn page_zero_is_rejected() {
        let query = LibraryQuery {
            page: PageParams::page(0),
            ..LibraryQuery::default()
        };
        let err = query.to_params().unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { field: "page", .. }));
    }

    #[test]
    fn oversized_page_size_is_rejected() {
        let query = NotificationQuery {
            page: PageParams {
                page: Some(1),
                page_size: Some(500),
            },
            ..NotificationQuery::default()
        };
        assert!(query.to_params().is_err());
    }

    #[test]
    fn blank_search_is_rejected_and_terms_are_trimmed() {
        let blank = BookQuery {
            search: Some("   ".into()),
            ..BookQuery::default()
        };
        assert!(blank.to_params().is_err());

        let trimmed = BookQuery {
            search: Some("  rust  ".into()),
            available: Some(true),
            ..BookQuery::default()
        };
        assert_eq!(
            trimmed.to_params().unwrap(),
            vec![
                ("search", "rust".to_owned()),
                ("available", "true".to_owned()),
            ]
        );
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let query = BookingQuery {
            date_from: NaiveDate::from_ymd_opt(2024, 2, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..BookingQuery::default()
        };
        assert!(query.to_params().is_err());
    }

    #[test]
    fn empty_query_has_no_params() {
        assert!(UserQuery::default().to_params().unwrap().is_empty());
        assert!(PageParams::default().to_params().unwrap().is_empty());
    }
}
