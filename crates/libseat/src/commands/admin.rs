//! Library admin command handlers: users, access applications, bookings.

use serde::Serialize;
use tabled::Tabled;

use libseat_api::models::{AdminDashboardStats, AdminProfile, User};
use libseat_api::{ApplicationQuery, BookingQuery, UserQuery};
use libseat_core::AppContext;
use libseat_core::views::admin::{AdminOverview, ApplicationReview, BookingOverview, UserAdmin};

use crate::cli::{
    AdminApplicationsCommand, AdminArgs, AdminCommand, AdminUsersCommand, GlobalOpts,
};
use crate::error::CliError;
use crate::output::{Painter, Tone};

use super::{bookings, libraries, session, util};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Approved")]
    approved: String,
}

#[derive(Serialize)]
struct Overview<'a> {
    profile: &'a AdminProfile,
    stats: &'a AdminDashboardStats,
}

fn overview_detail(o: &Overview<'_>) -> String {
    let s = o.stats;
    [
        format!("Admin:                {}", o.profile.user.display_name()),
        format!(
            "Library:              {}",
            util::or_dash(o.profile.library_name.as_deref())
        ),
        String::new(),
        format!("Total users:          {}", s.total_users),
        format!("Pending approvals:    {}", s.pending_approvals),
        format!("Active bookings:      {}", s.active_bookings),
        format!("Bookings today:       {}", s.today_bookings),
        format!("Events:               {}", s.total_events),
        format!("Pending applications: {}", s.pending_applications),
    ]
    .join("\n")
}

fn user_row(u: &User, painter: Painter) -> UserRow {
    UserRow {
        id: u.id.to_string(),
        username: u.username.clone(),
        name: u.display_name(),
        email: util::or_dash(u.email.as_deref()),
        role: u
            .role_display
            .clone()
            .unwrap_or_else(|| u.role.to_string()),
        approved: if u.is_approved {
            painter.paint("yes", Tone::Good)
        } else {
            painter.paint("pending", Tone::Active)
        },
    }
}

pub async fn handle(ctx: &AppContext, args: AdminArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(global.color);

    match args.command {
        AdminCommand::Dashboard => {
            let overview = AdminOverview::new(ctx.clone());
            let (profile, stats) = util::spin("Loading admin dashboard", global, overview.load()).await?;
            let view = Overview {
                profile: &profile,
                stats: &stats,
            };
            util::print_detail(&view, global, overview_detail, |o| o.profile.id.to_string());
            Ok(())
        }

        AdminCommand::Users(users) => {
            let admin = UserAdmin::new(ctx.clone());
            match users.command {
                AdminUsersCommand::List {
                    list,
                    search,
                    role,
                    pending,
                } => {
                    let query = UserQuery {
                        search,
                        role,
                        is_approved: pending.then_some(false),
                        page: util::page(list),
                    };
                    util::spin("Loading users", global, admin.load(&query)).await?;
                    util::print_listing(admin.listing(), global, |u| user_row(u, painter));
                }
                AdminUsersCommand::Approve { user } => {
                    let id = util::entity_id(&user);
                    let updated = util::spin("Approving user", global, admin.approve(&id)).await?;
                    util::print_detail(updated.as_ref(), global, session::user_detail, |u| {
                        u.id.to_string()
                    });
                }
                AdminUsersCommand::Reject { user, reason } => {
                    let id = util::entity_id(&user);
                    if !util::confirm(&format!("Reject user {id}?"), global)? {
                        return Ok(());
                    }
                    let updated = util::spin(
                        "Rejecting user",
                        global,
                        admin.reject(&id, reason.as_deref()),
                    )
                    .await?;
                    util::print_detail(updated.as_ref(), global, session::user_detail, |u| {
                        u.id.to_string()
                    });
                }
                AdminUsersCommand::Delete { user } => {
                    let id = util::entity_id(&user);
                    if !util::confirm(&format!("Delete user {id}? This cannot be undone."), global)? {
                        return Ok(());
                    }
                    util::spin("Deleting user", global, admin.delete(&id)).await?;
                }
            }
            Ok(())
        }

        AdminCommand::Applications(applications) => {
            let review = ApplicationReview::new(ctx.clone());
            match applications.command {
                AdminApplicationsCommand::List {
                    list,
                    status,
                    library,
                } => {
                    let query = ApplicationQuery {
                        status,
                        library: library.as_deref().map(util::entity_id),
                        page: util::page(list),
                    };
                    util::spin("Loading applications", global, review.load(&query)).await?;
                    util::print_listing(review.listing(), global, libraries::application_row);
                }
                AdminApplicationsCommand::Approve { application } => {
                    let id = util::entity_id(&application);
                    let updated =
                        util::spin("Approving application", global, review.approve(&id)).await?;
                    util::print_rows(&[updated], global, libraries::application_row);
                }
                AdminApplicationsCommand::Reject {
                    application,
                    reason,
                } => {
                    let id = util::entity_id(&application);
                    if !util::confirm(&format!("Reject application {id}?"), global)? {
                        return Ok(());
                    }
                    let updated = util::spin(
                        "Rejecting application",
                        global,
                        review.reject(&id, reason.as_deref()),
                    )
                    .await?;
                    util::print_rows(&[updated], global, libraries::application_row);
                }
            }
            Ok(())
        }

        AdminCommand::Bookings {
            list,
            date,
            library,
            status,
        } => {
            let overview = BookingOverview::new(ctx.clone());
            let query = BookingQuery {
                booking_date: date,
                statuses: status,
                library: library.as_deref().map(util::entity_id),
                page: util::page(list),
                ..BookingQuery::default()
            };
            util::spin("Loading bookings", global, overview.load(&query)).await?;
            util::print_listing(overview.listing(), global, |b| {
                bookings::booking_row(b, painter)
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
    use crate::cli::ColorMode;

    #[test]
    fn unapproved_users_read_as_pending() {
        let user: User = serde_json::from_value(json!({
            "id": 9,
            "username": "ada",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "STUDENT",
            "is_approved": false
        }))
        .unwrap();
        let row = user_row(&user, Painter::new(ColorMode::Never));
        assert_eq!(row.name, "Ada Lovelace");
        assert_eq!(row.approved, "pending");
        assert_eq!(row.role, "STUDENT");
    }
}
