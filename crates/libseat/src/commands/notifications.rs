//! Notification inbox command handlers.

use tabled::Tabled;

use libseat_api::NotificationQuery;
use libseat_api::models::Notification;
use libseat_core::AppContext;
use libseat_core::views::notifications::NotificationCenter;

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter, Tone};

use super::util;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Received")]
    received: String,
}

fn notification_detail(n: &Notification) -> String {
    [
        format!("ID:       {}", n.id),
        format!("Title:    {}", n.title),
        format!(
            "Type:     {}",
            util::or_dash(
                n.notification_type_display
                    .as_deref()
                    .or(n.notification_type.as_deref())
            )
        ),
        format!("Read:     {}", util::yes_no(n.is_read)),
        format!("Received: {}", util::moment(n.created_at)),
        String::new(),
        n.message.clone(),
    ]
    .join("\n")
}

fn print_count(count: u64, global: &GlobalOpts) {
    let out = match global.output {
        OutputFormat::Table => format!("{count} unread"),
        OutputFormat::Plain => count.to_string(),
        format => output::render_single(
            format,
            &serde_json::json!({ "unread": count }),
            |_| String::new(),
            |_| String::new(),
        ),
    };
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    ctx: &AppContext,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let painter = Painter::new(global.color);
    let center = NotificationCenter::new(ctx.clone());

    match args.command {
        NotificationsCommand::List { list, unread } => {
            let query = NotificationQuery {
                is_read: unread.then_some(false),
                page: util::page(list),
            };
            util::spin("Loading notifications", global, center.load(&query)).await?;
            util::print_listing(center.listing(), global, |n| NotificationRow {
                id: n.id.to_string(),
                unread: if n.is_read {
                    String::new()
                } else {
                    painter.paint("●", Tone::Active)
                },
                title: n.title.clone(),
                kind: util::or_dash(
                    n.notification_type_display
                        .as_deref()
                        .or(n.notification_type.as_deref()),
                ),
                received: util::moment(n.created_at),
            });
            if global.output == OutputFormat::Table {
                util::note(global, &format!("{} unread", center.unread()));
            }
            Ok(())
        }

        NotificationsCommand::Read { notification } => {
            let id = util::entity_id(&notification);
            let updated = util::spin("Marking as read", global, center.mark_read(&id)).await?;
            util::print_detail(updated.as_ref(), global, notification_detail, |n| {
                n.id.to_string()
            });
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            util::spin("Marking all as read", global, center.mark_all_read()).await?;
            Ok(())
        }

        NotificationsCommand::Unread => {
            let count = util::spin("Counting", global, center.refresh_unread()).await?;
            print_count(count, global);
            Ok(())
        }

        NotificationsCommand::Delete { notification } => {
            let id = util::entity_id(&notification);
            if !util::confirm(&format!("Delete notification {id}?"), global)? {
                return Ok(());
            }
            util::spin("Deleting notification", global, center.delete(&id)).await?;
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
    fn detail_ends_with_the_message_body() {
        let n: Notification = serde_json::from_value(json!({
            "id": 4,
            "title": "Booking reminder",
            "message": "Your seat is ready at 09:00",
            "notification_type": "BOOKING",
            "is_read": false
        }))
        .unwrap();
        let text = notification_detail(&n);
        assert!(text.contains("Type:     BOOKING"));
        assert!(text.contains("Read:     no"));
        assert!(text.ends_with("Your seat is ready at 09:00"));
    }
}
