// Library browsing: libraries, floors, sections, seats, access applications.

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{EntityId, Floor, Library, LibraryApplication, Page, Section, Seat};
use crate::query::{LibraryQuery, PageParams, QueryParams};

impl ApiClient {
    pub async fn list_libraries(&self, query: &LibraryQuery) -> Result<Page<Library>, Error> {
        self.get_with_params("libraries/", &query.to_params()?)
            .await
    }

    pub async fn get_library(&self, id: &EntityId) -> Result<Library, Error> {
        self.get(&format!("libraries/{id}/")).await
    }

    pub async fn list_floors(&self, library_id: &EntityId) -> Result<Vec<Floor>, Error> {
        self.get(&format!("libraries/{library_id}/floors/")).await
    }

    pub async fn list_sections(&self, floor_id: &EntityId) -> Result<Vec<Section>, Error> {
        self.get(&format!("libraries/floors/{floor_id}/sections/"))
            .await
    }

    pub async fn list_seats(&self, section_id: &EntityId) -> Result<Vec<Seat>, Error> {
        self.get(&format!("libraries/sections/{section_id}/seats/"))
            .await
    }

    /// Request permission to use a library; subject to admin approval.
    pub async fn apply_for_access(
        &self,
        library_id: &EntityId,
        reason: Option<&str>,
    ) -> Result<LibraryApplication, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            reason: Option<&'a str>,
        }

        self.post(&format!("libraries/{library_id}/apply/"), &Body { reason })
            .await
    }

    /// The signed-in user's own access applications.
    pub async fn my_applications(
        &self,
        page: PageParams,
    ) -> Result<Page<LibraryApplication>, Error> {
        self.get_with_params("libraries/applications/", &page.to_params()?)
            .await
    }
}
