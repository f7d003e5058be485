use async_trait::async_trait;
use contracts::shared::list::{ListQuery, ListRequest, ListResult};
use contracts::system::subadmins::{
    DeleteSubadminRequest, RegisterSubadminRequest, Subadmin, SubadminPage,
};

use crate::shared::api_utils::{post_data, post_plain, ApiError};
use crate::shared::list_controller::ListSource;

/// Server-paged `/subadmin/getlist`.
pub struct SubadminSource;

#[async_trait(?Send)]
impl ListSource<Subadmin> for SubadminSource {
    async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<Subadmin>, ApiError> {
        let mut request = ListRequest::from(query);
        // the endpoint does not sort
        request.sort_field = None;
        request.sort_order = None;
        let page: SubadminPage = post_data("/subadmin/getlist", &request).await?;
        Ok(page.into_result(query.page_size))
    }
}

pub async fn register_subadmin(request: &RegisterSubadminRequest) -> Result<(), ApiError> {
    post_plain("/subadmin/register", request).await
}

pub async fn delete_subadmin(subadmin_id: &str) -> Result<(), ApiError> {
    post_plain(
        "/subadmin/deleterecord",
        &DeleteSubadminRequest {
            subadmin_id: subadmin_id.to_string(),
        },
    )
    .await
}
