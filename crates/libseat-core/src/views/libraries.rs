// ── Library directory ──
//
// Browsable library list joined with the user's own access
// applications, so each row can show whether access is pending,
// granted, or still to be requested.

use std::sync::Arc;

use strum::Display;

use libseat_api::models::{ApplicationStatus, EntityId, Library, LibraryApplication};
use libseat_api::{LibraryQuery, PageParams};

use super::Listing;
use crate::context::AppContext;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessState {
    /// No application on file.
    #[strum(to_string = "not requested")]
    NotRequested,
    Pending,
    Approved,
    Rejected,
}

impl From<ApplicationStatus> for AccessState {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Approved => Self::Approved,
            ApplicationStatus::Rejected => Self::Rejected,
            ApplicationStatus::Pending | ApplicationStatus::Unknown => Self::Pending,
        }
    }
}

pub struct LibraryDirectory {
    ctx: AppContext,
    libraries: Listing<Library>,
    applications: Listing<LibraryApplication>,
}

impl LibraryDirectory {
    pub fn new(ctx: AppContext) -> Self {
        let libraries = Listing::new(ctx.page_size());
        let applications = Listing::new(ctx.page_size());
        Self {
            ctx,
            libraries,
            applications,
        }
    }

    pub fn libraries(&self) -> &Listing<Library> {
        &self.libraries
    }

    pub fn applications(&self) -> &Listing<LibraryApplication> {
        &self.applications
    }

    /// Load a page of libraries and, when signed in, the user's
    /// applications alongside it.
    pub async fn load(&self, query: &LibraryQuery) -> Result<(), CoreError> {
        let client = self.ctx.client();
        let query = LibraryQuery {
            page: self.ctx.paged(query.page),
            ..query.clone()
        };
        let libraries = self
            .libraries
            .load(query.page, client.list_libraries(&query));

        if !client.has_token() {
            return libraries.await;
        }

        let page = PageParams {
            page: Some(1),
            page_size: Some(libseat_api::query::MAX_PAGE_SIZE),
        };
        let applications = self
            .applications
            .load(page, client.my_applications(page));
        let (libraries, applications) = tokio::join!(libraries, applications);
        libraries?;
        applications
    }

    pub fn access_state(&self, library: &EntityId) -> AccessState {
        self.applications
            .list()
            .filtered(|a| &a.library == library)
            .into_iter()
            .map(|a| AccessState::from(a.status))
            .max_by_key(|state| match state {
                AccessState::Approved => 3,
                AccessState::Pending => 2,
                AccessState::Rejected => 1,
                AccessState::NotRequested => 0,
            })
            .unwrap_or(AccessState::NotRequested)
    }

    /// Ask a library's admins for access.
    pub async fn apply(
        &self,
        library: &EntityId,
        reason: Option<&str>,
    ) -> Result<Arc<LibraryApplication>, CoreError> {
        self.ctx.require_session()?;
        if matches!(
            self.access_state(library),
            AccessState::Pending | AccessState::Approved
        ) {
            return Err(CoreError::validation(
                "An application for this library is already open",
            ));
        }
        let result = self.ctx.client().apply_for_access(library, reason).await;
        self.applications
            .apply(&self.ctx, "apply for library access", result, |a| {
                match &a.library_name {
                    Some(name) => format!("Application sent to {name}"),
                    None => "Application sent".into(),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_reads_as_pending() {
        assert_eq!(
            AccessState::from(ApplicationStatus::Unknown),
            AccessState::Pending
        );
        assert_eq!(AccessState::NotRequested.to_string(), "not requested");
    }
}
