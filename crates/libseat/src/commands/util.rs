//! Shared helpers for command handlers.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate, NaiveTime};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use libseat_api::PageParams;
use libseat_api::models::EntityId;
use libseat_core::{AppContext, CoreError, Entity, Listing};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

// ── Argument parsing ────────────────────────────────────────────────

/// `YYYY-MM-DD`, `today`, or `tomorrow`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    match raw.trim() {
        "today" => Ok(today()),
        "tomorrow" => today()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_owned()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("expected YYYY-MM-DD, got '{other}'")),
    }
}

/// `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM, got '{raw}'"))
}

/// Parse a backend status code case-insensitively (`checked-in` → `CHECKED_IN`).
pub fn parse_code<T: FromStr>(raw: &str) -> Result<T, String> {
    let code = raw.trim().to_uppercase().replace('-', "_");
    if code == "UNKNOWN" {
        return Err(format!("unknown value '{raw}'"));
    }
    code.parse::<T>()
        .map_err(|_| format!("unknown value '{raw}'"))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::from(raw.trim())
}

pub fn page(list: ListArgs) -> PageParams {
    PageParams {
        page: list.page,
        page_size: list.page_size,
    }
}

// ── Interaction ─────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Await `fut` behind a spinner on interactive terminals.
pub async fn spin<F: Future>(message: &str, global: &GlobalOpts, fut: F) -> F::Output {
    let bar = if global.quiet || !io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };
    let out = fut.await;
    bar.finish_and_clear();
    out
}

/// Await a raw API call behind a spinner and fold its error into `CliError`.
pub async fn fetch<T>(
    message: &str,
    global: &GlobalOpts,
    fut: impl Future<Output = Result<T, libseat_api::Error>>,
) -> Result<T, CliError> {
    spin(message, global, fut)
        .await
        .map_err(|e| CoreError::from(e).into())
}

/// Fail early for endpoints that need a session.
pub fn require_token(ctx: &AppContext) -> Result<(), CliError> {
    if ctx.client().has_token() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Print a one-line status message to stderr unless `--quiet`.
pub fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

// ── Rendering ───────────────────────────────────────────────────────

/// Render the current page of a listing, with a page footer for tables.
pub fn print_listing<T, R>(listing: &Listing<T>, global: &GlobalOpts, to_row: impl Fn(&Arc<T>) -> R)
where
    T: Entity + Serialize,
    R: Tabled,
{
    let rows = listing.rows();
    print_rows(&rows, global, to_row);

    let list = listing.list();
    let footer = output::page_footer(
        global.output,
        list.current_page(),
        list.total_pages(),
        list.count(),
    );
    output::print_output(&footer, global.quiet);
}

/// Render an already-materialized set of rows.
pub fn print_rows<T, R>(rows: &[Arc<T>], global: &GlobalOpts, to_row: impl Fn(&Arc<T>) -> R)
where
    T: Entity + Serialize,
    R: Tabled,
{
    let out = output::render_list(global.output, rows, to_row, |t| {
        t.entity_id().to_string()
    });
    output::print_output(&out, global.quiet);
}

/// Render one entity as a detail block.
pub fn print_detail<T: Serialize + ?Sized>(
    data: &T,
    global: &GlobalOpts,
    detail: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) {
    let out = output::render_single(global.output, data, detail, id_fn);
    output::print_output(&out, global.quiet);
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.into()
}

pub fn day(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d").to_string())
}

pub fn moment(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(
        || "-".into(),
        |d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use libseat_api::models::{BookingStatus, Role};

    use super::*;

    #[test]
    fn status_codes_parse_case_insensitively() {
        assert_eq!(
            parse_code::<BookingStatus>("checked-in").unwrap(),
            BookingStatus::CheckedIn
        );
        assert_eq!(parse_code::<Role>("Admin").unwrap(), Role::Admin);
        assert!(parse_code::<BookingStatus>("unknown").is_err());
        assert!(parse_code::<BookingStatus>("teleported").is_err());
    }

    #[test]
    fn times_accept_optional_seconds() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_time("09:00").unwrap(), nine);
        assert_eq!(parse_time("09:00:00").unwrap(), nine);
        assert!(parse_time("9am").is_err());
    }

    #[test]
    fn dates_accept_keywords() {
        assert_eq!(parse_date("today").unwrap(), today());
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2024").is_err());
    }
}
