//! Superadmin command handlers: admin accounts and library records.

use tabled::Tabled;

use libseat_api::LibraryQuery;
use libseat_api::models::{AdminProfile, CreateAdminRequest, LibraryRequest, UpdateAdminRequest};
use libseat_core::AppContext;
use libseat_core::views::superadmin::{AdminAccounts, LibraryManagement};

use crate::cli::{
    GlobalOpts, LibraryFields, SuperadminAdminsCommand, SuperadminArgs, SuperadminCommand,
    SuperadminLibrariesCommand,
};
use crate::error::CliError;

use super::{libraries, util};

#[derive(Tabled)]
struct AdminRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Library")]
    library: String,
    #[tabled(rename = "Permissions")]
    permissions: String,
}

fn admin_row(a: &AdminProfile) -> AdminRow {
    AdminRow {
        id: a.id.to_string(),
        user: a.user.username.clone(),
        library: a
            .library_name
            .clone()
            .or_else(|| a.library.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "-".into()),
        permissions: if a.permissions.is_empty() {
            "-".into()
        } else {
            a.permissions.join(", ")
        },
    }
}

fn admin_detail(a: &AdminProfile) -> String {
    let row = admin_row(a);
    [
        format!("ID:          {}", row.id),
        format!("User:        {} ({})", a.user.display_name(), row.user),
        format!("Library:     {}", row.library),
        format!("Permissions: {}", row.permissions),
        format!("Created:     {}", util::day(a.created_at)),
    ]
    .join("\n")
}

impl From<LibraryFields> for LibraryRequest {
    fn from(f: LibraryFields) -> Self {
        Self {
            name: f.name,
            address: f.address,
            city: f.city,
            description: f.description,
            opening_time: f.opens,
            closing_time: f.closes,
            is_active: f.active,
        }
    }
}

fn update_admin_request(library: Option<String>, permissions: Vec<String>) -> UpdateAdminRequest {
    UpdateAdminRequest {
        library: library.as_deref().map(util::entity_id),
        permissions: (!permissions.is_empty()).then_some(permissions),
    }
}

pub async fn handle(
    ctx: &AppContext,
    args: SuperadminArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SuperadminCommand::Admins(admins) => {
            let accounts = AdminAccounts::new(ctx.clone());
            match admins.command {
                SuperadminAdminsCommand::List(list) => {
                    util::spin("Loading admins", global, accounts.load(util::page(list))).await?;
                    util::print_listing(accounts.listing(), global, |a| admin_row(a));
                }
                SuperadminAdminsCommand::Create {
                    user,
                    library,
                    permissions,
                } => {
                    let req = CreateAdminRequest {
                        user: util::entity_id(&user),
                        library: library.as_deref().map(util::entity_id),
                        permissions,
                    };
                    let admin = util::spin("Creating admin", global, accounts.create(&req)).await?;
                    util::print_detail(admin.as_ref(), global, admin_detail, |a| a.id.to_string());
                }
                SuperadminAdminsCommand::Update {
                    admin,
                    library,
                    permissions,
                } => {
                    let req = update_admin_request(library, permissions);
                    if req.library.is_none() && req.permissions.is_none() {
                        return Err(CliError::Validation {
                            field: "admin".into(),
                            reason: "pass --library or --permission to change something".into(),
                        });
                    }
                    let id = util::entity_id(&admin);
                    let updated =
                        util::spin("Updating admin", global, accounts.update(&id, &req)).await?;
                    util::print_detail(updated.as_ref(), global, admin_detail, |a| {
                        a.id.to_string()
                    });
                }
                SuperadminAdminsCommand::Delete { admin } => {
                    let id = util::entity_id(&admin);
                    if !util::confirm(&format!("Revoke admin {id}?"), global)? {
                        return Ok(());
                    }
                    util::spin("Revoking admin", global, accounts.delete(&id)).await?;
                }
            }
            Ok(())
        }

        SuperadminCommand::Libraries(libs) => {
            let management = LibraryManagement::new(ctx.clone());
            match libs.command {
                SuperadminLibrariesCommand::List { list, search } => {
                    let query = LibraryQuery {
                        search,
                        page: util::page(list),
                        ..LibraryQuery::default()
                    };
                    util::spin("Loading libraries", global, management.load(&query)).await?;
                    util::print_listing(management.listing(), global, libraries::managed_library_row);
                }
                SuperadminLibrariesCommand::Create(fields) => {
                    let req = LibraryRequest::from(fields);
                    let library =
                        util::spin("Creating library", global, management.create(&req)).await?;
                    util::print_detail(library.as_ref(), global, libraries::library_detail, |l| {
                        l.id.to_string()
                    });
                }
                SuperadminLibrariesCommand::Update { library, fields } => {
                    let id = util::entity_id(&library);
                    let req = LibraryRequest::from(fields);
                    let updated =
                        util::spin("Updating library", global, management.update(&id, &req)).await?;
                    util::print_detail(updated.as_ref(), global, libraries::library_detail, |l| {
                        l.id.to_string()
                    });
                }
                SuperadminLibrariesCommand::Delete { library } => {
                    let id = util::entity_id(&library);
                    if !util::confirm(
                        &format!("Delete library {id} and all of its floors and seats?"),
                        global,
                    )? {
                        return Ok(());
                    }
                    util::spin("Deleting library", global, management.delete(&id)).await?;
                }
            }
            Ok(())
        }
    }
}
