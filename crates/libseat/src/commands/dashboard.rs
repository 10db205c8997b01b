//! Dashboard: today's bookings, unread notifications, current plan.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use libseat_core::AppContext;
use libseat_core::views::dashboard::{BookingCard, Dashboard, DashboardData};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter, Tone};

use super::util;

pub async fn handle(
    ctx: &AppContext,
    date: Option<NaiveDate>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let date = date.unwrap_or_else(util::today);
    let dashboard = Dashboard::new(ctx.clone());
    let data = util::spin("Loading dashboard", global, dashboard.load(date)).await?;

    let painter = Painter::new(global.color);
    let out = match global.output {
        OutputFormat::Table => render_panels(&data, painter),
        _ => output::render_single(global.output, &DashboardJson::from(&data), |_| String::new(), |d| {
            d.date.to_string()
        }),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Labels for the actions a card offers, in display order.
fn action_labels(card: &BookingCard) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if card.actions.can_check_in {
        labels.push("Check In");
    }
    if card.actions.can_check_out {
        labels.push("Check Out");
    }
    if card.actions.can_cancel {
        labels.push("Cancel");
    }
    labels
}

fn render_panels(data: &DashboardData, painter: Painter) -> String {
    let mut lines = vec![format!("Dashboard for {}", data.date), String::new()];

    lines.push("Bookings".into());
    match &data.bookings {
        Ok(cards) if cards.is_empty() => lines.push("  No bookings for this day".into()),
        Ok(cards) => {
            for card in cards {
                let b = &card.booking;
                let actions = action_labels(card);
                lines.push(format!(
                    "  #{} {} seat {} {}-{} {}{}",
                    b.id,
                    b.library_name.as_deref().unwrap_or("-"),
                    b.seat_number.as_deref().unwrap_or("-"),
                    util::hhmm(b.start_time),
                    util::hhmm(b.end_time),
                    painter.paint(&b.status_label(), Tone::Active),
                    if actions.is_empty() {
                        String::new()
                    } else {
                        format!("  [{}]", actions.join(", "))
                    },
                ));
            }
        }
        Err(message) => lines.push(painter.paint(&format!("  {message}"), Tone::Bad)),
    }

    lines.push(String::new());
    lines.push(match &data.unread_notifications {
        Ok(count) => format!("Unread notifications: {count}"),
        Err(message) => painter.paint(&format!("Unread notifications: {message}"), Tone::Bad),
    });

    lines.push(match &data.subscription {
        Ok(Some(sub)) => format!(
            "Subscription: {} until {}",
            sub.plan_name.as_deref().unwrap_or("plan"),
            sub.end_date
        ),
        Ok(None) => painter.paint("Subscription: none", Tone::Muted),
        Err(message) => painter.paint(&format!("Subscription: {message}"), Tone::Bad),
    });

    lines.join("\n")
}

/// Structured view of the dashboard. Failed panels carry their message.
#[derive(Serialize)]
struct DashboardJson {
    date: NaiveDate,
    bookings: serde_json::Value,
    unread_notifications: serde_json::Value,
    subscription: serde_json::Value,
}

impl From<&DashboardData> for DashboardJson {
    fn from(data: &DashboardData) -> Self {
        let bookings = match &data.bookings {
            Ok(cards) => json!(
                cards
                    .iter()
                    .map(|c| json!({ "booking": c.booking.as_ref(), "actions": action_labels(c) }))
                    .collect::<Vec<_>>()
            ),
            Err(message) => json!({ "error": message }),
        };
        let unread_notifications = match &data.unread_notifications {
            Ok(count) => json!(count),
            Err(message) => json!({ "error": message }),
        };
        let subscription = match &data.subscription {
            Ok(sub) => json!(sub),
            Err(message) => json!({ "error": message }),
        };
        Self {
            date: data.date,
            bookings,
            unread_notifications,
            subscription,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use libseat_api::models::SeatBooking;

    use super::*;
    use crate::cli::ColorMode;

    fn card(can_check_in: bool, can_check_out: bool) -> BookingCard {
        let booking: SeatBooking = serde_json::from_value(json!({
            "id": 7,
            "seat": 12,
            "seat_number": "A-12",
            "library_name": "Central",
            "booking_date": "2024-01-15",
            "start_time": "09:00:00",
            "end_time": "11:00:00",
            "status": "CONFIRMED",
            "can_check_in": can_check_in,
            "can_check_out": can_check_out
        }))
        .unwrap();
        BookingCard::new(booking)
    }

    #[test]
    fn confirmed_card_offers_check_in_only() {
        let labels = action_labels(&card(true, false));
        assert!(labels.contains(&"Check In"));
        assert!(!labels.contains(&"Check Out"));
    }

    #[test]
    fn failed_panels_render_their_message() {
        let data = DashboardData {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            bookings: Ok(vec![card(true, false)]),
            unread_notifications: Err("Service unavailable".into()),
            subscription: Ok(None),
        };
        let text = render_panels(&data, Painter::new(ColorMode::Never));
        assert!(text.contains("#7 Central seat A-12 09:00-11:00"));
        assert!(text.contains("[Check In, Cancel]"));
        assert!(text.contains("Unread notifications: Service unavailable"));
        assert!(text.contains("Subscription: none"));
    }
}
