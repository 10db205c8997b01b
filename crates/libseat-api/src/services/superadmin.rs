// Superadmin endpoints: admin accounts and library CRUD.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AdminProfile, CreateAdminRequest, EntityId, Library, LibraryRequest, Page, UpdateAdminRequest,
};
use crate::query::{PageParams, QueryParams};

impl ApiClient {
    pub async fn list_admins(&self, page: PageParams) -> Result<Page<AdminProfile>, Error> {
        self.get_with_params("superadmin/admins/", &page.to_params()?)
            .await
    }

    pub async fn create_admin(&self, req: &CreateAdminRequest) -> Result<AdminProfile, Error> {
        self.post("superadmin/admins/", req).await
    }

    pub async fn update_admin(
        &self,
        id: &EntityId,
        req: &UpdateAdminRequest,
    ) -> Result<AdminProfile, Error> {
        self.patch(&format!("superadmin/admins/{id}/"), req).await
    }

    pub async fn delete_admin(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("superadmin/admins/{id}/")).await
    }

    pub async fn create_library(&self, req: &LibraryRequest) -> Result<Library, Error> {
        self.post("superadmin/libraries/", req).await
    }

    pub async fn update_library(&self, id: &EntityId, req: &LibraryRequest) -> Result<Library, Error> {
        self.patch(&format!("superadmin/libraries/{id}/"), req).await
    }

    pub async fn delete_library(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("superadmin/libraries/{id}/")).await
    }
}
