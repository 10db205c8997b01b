//! Subscription plan command handlers.

use tabled::Tabled;

use libseat_api::models::{Subscription, SubscriptionPlan, SubscriptionStatus};
use libseat_core::AppContext;
use libseat_core::views::subscriptions::SubscriptionCenter;

use crate::cli::{GlobalOpts, SubscriptionsArgs, SubscriptionsCommand};
use crate::error::CliError;
use crate::output::{self, Painter, Tone};

use super::util;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Plan")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Days")]
    days: u32,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Books")]
    books: String,
    #[tabled(rename = "Events")]
    events: String,
}

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Until")]
    until: String,
    #[tabled(rename = "Renews")]
    renews: String,
}

fn quota(limit: Option<u32>) -> String {
    limit.map_or_else(|| "unlimited".into(), |n| n.to_string())
}

fn plan_row(p: &SubscriptionPlan) -> PlanRow {
    PlanRow {
        id: p.id.to_string(),
        name: p.name.clone(),
        price: p.price.clone(),
        days: p.duration_days,
        seats: quota(p.max_seat_bookings),
        books: quota(p.max_book_reservations),
        events: quota(p.max_event_registrations),
    }
}

fn status_tone(status: SubscriptionStatus) -> Tone {
    match status {
        SubscriptionStatus::Active => Tone::Good,
        SubscriptionStatus::Pending => Tone::Active,
        SubscriptionStatus::Cancelled | SubscriptionStatus::Expired => Tone::Bad,
        SubscriptionStatus::Unknown => Tone::Muted,
    }
}

fn subscription_status(s: &Subscription) -> String {
    s.status_display
        .clone()
        .unwrap_or_else(|| s.status.to_string())
}

fn subscription_detail(s: &Subscription) -> String {
    [
        format!("ID:         {}", s.id),
        format!(
            "Plan:       {}",
            s.plan_name.clone().unwrap_or_else(|| s.plan.to_string())
        ),
        format!("Status:     {}", subscription_status(s)),
        format!("From:       {}", s.start_date),
        format!("Until:      {}", s.end_date),
        format!("Auto-renew: {}", util::yes_no(s.auto_renew)),
    ]
    .join("\n")
}

pub async fn handle(
    ctx: &AppContext,
    args: SubscriptionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let painter = Painter::new(global.color);
    let center = SubscriptionCenter::new(ctx.clone());

    match args.command {
        SubscriptionsCommand::Plans => {
            util::spin("Loading plans", global, center.load()).await?;
            let plans: Vec<_> = center
                .plans()
                .rows()
                .iter()
                .filter(|p| p.is_active)
                .cloned()
                .collect();
            util::print_rows(&plans, global, |p| plan_row(p));
            Ok(())
        }

        SubscriptionsCommand::Current => {
            util::require_token(ctx)?;
            util::spin("Loading subscription", global, center.load()).await?;
            match center.current() {
                Some(sub) => util::print_detail(sub.as_ref(), global, subscription_detail, |s| {
                    s.id.to_string()
                }),
                None => {
                    let out = output::render_single(
                        global.output,
                        &serde_json::Value::Null,
                        |_| "No active subscription".into(),
                        |_| String::new(),
                    );
                    output::print_output(&out, global.quiet);
                }
            }
            Ok(())
        }

        SubscriptionsCommand::Subscribe { plan } => {
            util::require_token(ctx)?;
            util::spin("Loading plans", global, center.load()).await?;
            let id = util::entity_id(&plan);
            let name = center
                .plans()
                .list()
                .get(&id)
                .map_or_else(|| format!("plan {id}"), |p| format!("{} ({})", p.name, p.price));
            if !util::confirm(&format!("Subscribe to {name}?"), global)? {
                return Ok(());
            }
            let sub = util::spin("Subscribing", global, center.subscribe(&id)).await?;
            util::print_detail(sub.as_ref(), global, subscription_detail, |s| s.id.to_string());
            Ok(())
        }

        SubscriptionsCommand::Cancel => {
            util::require_token(ctx)?;
            util::spin("Loading subscription", global, center.load()).await?;
            if !util::confirm("Cancel the current subscription?", global)? {
                return Ok(());
            }
            let sub = util::spin("Cancelling subscription", global, center.cancel()).await?;
            util::print_detail(sub.as_ref(), global, subscription_detail, |s| s.id.to_string());
            Ok(())
        }

        SubscriptionsCommand::History(list) => {
            util::spin("Loading history", global, center.load_history(util::page(list))).await?;
            util::print_listing(center.history(), global, |s| SubscriptionRow {
                id: s.id.to_string(),
                plan: s
                    .plan_name
                    .clone()
                    .unwrap_or_else(|| s.plan.to_string()),
                status: painter.paint(&subscription_status(s), status_tone(s.status)),
                from: s.start_date.to_string(),
                until: s.end_date.to_string(),
                renews: util::yes_no(s.auto_renew),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_quotas_read_as_unlimited() {
        let plan: SubscriptionPlan = serde_json::from_value(json!({
            "id": 2,
            "name": "Scholar",
            "price": "9.99",
            "duration_days": 30,
            "max_seat_bookings": 10,
            "is_active": true
        }))
        .unwrap();
        let row = plan_row(&plan);
        assert_eq!(row.seats, "10");
        assert_eq!(row.books, "unlimited");
        assert_eq!(row.price, "9.99");
    }
}
