// ── Superadmin pages ──
//
// Admin accounts and library records across the whole installation.

use std::sync::Arc;

use libseat_api::models::{
    AdminProfile, CreateAdminRequest, EntityId, Library, LibraryRequest, UpdateAdminRequest,
};
use libseat_api::{LibraryQuery, PageParams};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

fn require_superadmin(ctx: &AppContext) -> Result<(), CoreError> {
    ctx.require_session()?;
    let session = ctx.session().snapshot();
    if session.is_signed_in() && !session.is_superadmin() {
        return Err(CoreError::Api {
            message: "Superadmin access required".into(),
            status: Some(403),
        });
    }
    Ok(())
}

pub struct AdminAccounts {
    ctx: AppContext,
    listing: Listing<AdminProfile>,
}

impl AdminAccounts {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<AdminProfile> {
        &self.listing
    }

    pub async fn load(&self, page: PageParams) -> Result<(), CoreError> {
        require_superadmin(&self.ctx)?;
        let page = self.ctx.paged(page);
        self.listing
            .load(page, self.ctx.client().list_admins(page))
            .await
    }

    pub async fn create(&self, req: &CreateAdminRequest) -> Result<Arc<AdminProfile>, CoreError> {
        require_superadmin(&self.ctx)?;
        let result = self.ctx.client().create_admin(req).await;
        self.listing.apply(&self.ctx, "create admin", result, |a| {
            format!("Created admin {}", a.user.username)
        })
    }

    pub async fn update(
        &self,
        id: &EntityId,
        req: &UpdateAdminRequest,
    ) -> Result<Arc<AdminProfile>, CoreError> {
        let result = self.ctx.client().update_admin(id, req).await;
        self.listing
            .apply(&self.ctx, "update admin", result, |_| "Admin updated".into())
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.ctx.client().delete_admin(id).await;
        self.listing
            .remove_acknowledged(&self.ctx, "delete admin", id, result, "Admin removed")
    }
}

pub struct LibraryManagement {
    ctx: AppContext,
    listing: Listing<Library>,
}

impl LibraryManagement {
    pub fn new(ctx: AppContext) -> Self {
        let listing = Listing::new(ctx.page_size());
        Self { ctx, listing }
    }

    pub fn listing(&self) -> &Listing<Library> {
        &self.listing
    }

    pub async fn load(&self, query: &LibraryQuery) -> Result<(), CoreError> {
        require_superadmin(&self.ctx)?;
        let query = LibraryQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        self.listing
            .load(query.page, self.ctx.client().list_libraries(&query))
            .await
    }

    pub async fn create(&self, req: &LibraryRequest) -> Result<Arc<Library>, CoreError> {
        require_superadmin(&self.ctx)?;
        if req.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(CoreError::validation("A library needs a name"));
        }
        let result = self.ctx.client().create_library(req).await;
        self.listing.apply(&self.ctx, "create library", result, |l| {
            format!("Created {}", l.name)
        })
    }

    pub async fn update(
        &self,
        id: &EntityId,
        req: &LibraryRequest,
    ) -> Result<Arc<Library>, CoreError> {
        let result = self.ctx.client().update_library(id, req).await;
        self.listing.apply(&self.ctx, "update library", result, |l| {
            format!("Updated {}", l.name)
        })
    }

    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let result = self.ctx.client().delete_library(id).await;
        self.listing
            .remove_acknowledged(&self.ctx, "delete library", id, result, "Library deleted")
    }
}
