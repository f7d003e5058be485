use async_trait::async_trait;
use contracts::domain::a003_kpi::aggregate::{
    ExportRejection, ExportScope, Kpi, KpiExportRequest, KpiIdRequest, KpiListRequest, KpiPage,
    KpiSubmission, PunchRequest, QualityPointRequest,
};
use contracts::shared::list::{ListQuery, ListResult};
use thiserror::Error;

use crate::shared::api_utils::{get_data, post_ack, post_binary, post_data, ApiError};
use crate::shared::date_utils::today;
use crate::shared::export::{dated_file_name, save_file, CSV};
use crate::shared::list_controller::ListSource;

/// Whose KPIs a list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KpiScope {
    /// Every employee, narrowed by the query's employee filter.
    Everyone,
    /// One employee's own KPIs; the endpoint returns them unpaged.
    Own(Option<String>),
}

pub struct KpiSource {
    scope: KpiScope,
}

impl KpiSource {
    pub fn new(scope: KpiScope) -> Self {
        Self { scope }
    }
}

#[async_trait(?Send)]
impl ListSource<Kpi> for KpiSource {
    async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<Kpi>, ApiError> {
        match &self.scope {
            KpiScope::Everyone => {
                let page: KpiPage = post_data("/kpi/getAll", &KpiListRequest::all(query)).await?;
                Ok(page.into_result(query.page_size))
            }
            KpiScope::Own(Some(employee_id)) => {
                let page: KpiPage =
                    post_data("/kpi/getByEmployeeId", &KpiListRequest::own(query, employee_id))
                        .await?;
                Ok(page.into_single_page())
            }
            KpiScope::Own(None) => Err(ApiError::Application {
                message: Some(ExportRejection::NoOwnEmployee.message().to_string()),
            }),
        }
    }
}

fn kpi_path(kpi_id: &str) -> String {
    format!("/kpi/getByKpiId/{}", urlencoding::encode(kpi_id.trim()))
}

pub async fn fetch_kpi(kpi_id: &str) -> Result<Kpi, ApiError> {
    get_data(&kpi_path(kpi_id)).await
}

pub async fn submit_kpi(submission: &KpiSubmission) -> Result<Option<String>, ApiError> {
    match submission {
        KpiSubmission::Add(body) => post_ack("/kpi/addkpi", body).await,
        KpiSubmission::Update(body) => post_ack("/kpi/updateKPi", body).await,
    }
}

pub async fn punch(kpi_id: &str, remark: &str) -> Result<Option<String>, ApiError> {
    post_ack(
        "/kpi/punch",
        &PunchRequest {
            kpi_id: kpi_id.to_string(),
            remark: remark.to_string(),
        },
    )
    .await
}

pub async fn set_quality_point(kpi_id: &str, up: bool) -> Result<Option<String>, ApiError> {
    post_ack(
        "/kpi/setQualityPoint",
        &QualityPointRequest {
            kpi_id: kpi_id.to_string(),
            quality_points: if up { 1 } else { -1 },
        },
    )
    .await
}

pub async fn delete_kpi(kpi_id: &str) -> Result<Option<String>, ApiError> {
    post_ack(
        "/kpi/deleteKpi",
        &KpiIdRequest {
            kpi_id: kpi_id.to_string(),
        },
    )
    .await
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("{}", .0.message())]
    Rejected(ExportRejection),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("download failed: {0}")]
    Download(String),
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Rejected(rejection) => rejection.message().to_string(),
            ExportError::Api(e) => e.user_message("Failed to export KPIs"),
            ExportError::Download(_) => "The export could not be saved".to_string(),
        }
    }

    /// Refusals are the user's to fix; the rest are failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ExportError::Rejected(_))
    }
}

fn export_stem(scope: ExportScope) -> String {
    let name = match scope {
        ExportScope::All => "all",
        ExportScope::Selected => "selected",
        ExportScope::Mine => "mine",
    };
    format!("kpi_export_{name}")
}

/// Builds the export request; a refused scope never reaches the network.
pub fn export_request(
    scope: ExportScope,
    query: &ListQuery,
    selected: &[String],
    own_employee_id: Option<&str>,
) -> Result<KpiExportRequest, ExportError> {
    KpiExportRequest::build(scope, query, selected, own_employee_id).map_err(ExportError::Rejected)
}

/// Downloads the CSV for the current filters.
pub async fn export_kpis(request: KpiExportRequest) -> Result<String, ExportError> {
    let binary = post_binary("/kpi/export", &request, CSV).await?;
    let file_name = dated_file_name(&export_stem(request.scope), today(), "csv");
    save_file(&binary, CSV, &file_name).map_err(ExportError::Download)?;
    log::info!("exported {} bytes as {}", binary.bytes.len(), file_name);
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn kpi_path_is_encoded() {
        assert_eq!(kpi_path("K 1/2"), "/kpi/getByKpiId/K%201%2F2");
    }

    #[test]
    fn selected_scope_without_selection_is_refused() {
        let query = ListQuery::new("createdAt", false, 10);
        let err = export_request(ExportScope::Selected, &query, &[], Some("E1")).unwrap_err();
        assert_eq!(err, ExportError::Rejected(ExportRejection::EmptySelection));
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "Select at least one employee to export");
    }

    #[test]
    fn mine_scope_needs_a_linked_employee() {
        let query = ListQuery::default();
        let err = export_request(ExportScope::Mine, &query, &[], None).unwrap_err();
        assert_eq!(err, ExportError::Rejected(ExportRejection::NoOwnEmployee));
        let ok = export_request(ExportScope::Mine, &query, &[], Some("E7")).unwrap();
        assert_eq!(ok.employee_ids, vec!["E7".to_string()]);
    }

    #[test]
    fn api_failures_keep_the_server_message() {
        let err = ExportError::from(ApiError::Application {
            message: Some("No KPIs match".into()),
        });
        assert!(!err.is_rejection());
        assert_eq!(err.user_message(), "No KPIs match");
    }

    #[test]
    fn own_scope_without_employee_fails_without_request() {
        let source = KpiSource::new(KpiScope::Own(None));
        let outcome = block_on(source.fetch_page(&ListQuery::default()));
        assert_eq!(
            outcome.unwrap_err().user_message("x"),
            ExportRejection::NoOwnEmployee.message()
        );
    }

    #[test]
    fn export_file_names() {
        assert_eq!(export_stem(ExportScope::Selected), "kpi_export_selected");
    }
}
