use serde::{Deserialize, Serialize};

use crate::shared::dates::{date_sort_key, UNPARSABLE_DATE_KEY};
use crate::shared::lenient;
use crate::shared::list::{ListQuery, ListResult};

pub const START_DATE: &str = "startdate";
pub const DEADLINE: &str = "deadline";
pub const CREATED_AT: &str = "createdAt";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Punch {
    #[serde(rename = "punchDate", default)]
    pub punch_date: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// KPI record as the API returns it. Remark and quality points arrive under
/// several spellings; use the accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(rename = "kpiId", default, deserialize_with = "lenient::string")]
    pub kpi_id: String,
    #[serde(rename = "employeeId", default, deserialize_with = "lenient::string")]
    pub employee_id: String,
    #[serde(rename = "employeeName", default)]
    pub employee_name: String,
    #[serde(rename = "projectName", default)]
    pub project_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub startdate: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub deadline: Option<String>,
    #[serde(rename = "Remark", default, skip_serializing)]
    remark_legacy: Option<String>,
    #[serde(default)]
    remark: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub points: Option<f64>,
    #[serde(rename = "qualityPoints", default, deserialize_with = "lenient::opt_number")]
    quality_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number", skip_serializing)]
    quality: Option<f64>,
    #[serde(rename = "quality_points", default, deserialize_with = "lenient::opt_number", skip_serializing)]
    quality_points_snake: Option<f64>,
    #[serde(default)]
    pub punches: Vec<Punch>,
}

impl Kpi {
    pub fn remark(&self) -> &str {
        self.remark_legacy
            .as_deref()
            .filter(|r| !r.is_empty())
            .or(self.remark.as_deref())
            .unwrap_or_default()
    }

    /// `-1`, `+1` or unrated.
    pub fn quality_points(&self) -> Option<i8> {
        self.quality_points
            .or(self.quality)
            .or(self.quality_points_snake)
            .map(|q| if q < 0.0 { -1 } else if q > 0.0 { 1 } else { 0 })
            .filter(|q| *q != 0)
    }

    pub fn last_punch(&self) -> Option<&Punch> {
        self.punches.last()
    }

    pub fn date_key(&self, field: &str) -> i64 {
        let value = match field {
            START_DATE => self.startdate.as_deref(),
            DEADLINE => self.deadline.as_deref(),
            _ => None,
        };
        value.map(date_sort_key).unwrap_or(UNPARSABLE_DATE_KEY)
    }
}

/// The server only sorts KPIs by these; anything else maps to creation time.
pub fn api_sort_field(field: &str) -> &'static str {
    match field {
        START_DATE => START_DATE,
        DEADLINE => DEADLINE,
        _ => CREATED_AT,
    }
}

/// Body of `/kpi/getAll` and `/kpi/getByEmployeeId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiListRequest {
    pub search: String,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    #[serde(rename = "sortOrder")]
    pub sort_order: String,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "employeeIds", skip_serializing_if = "Vec::is_empty", default)]
    pub employee_ids: Vec<String>,
    #[serde(rename = "employeeId", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

impl KpiListRequest {
    /// Manager listing across employees, optionally filtered.
    pub fn all(query: &ListQuery) -> Self {
        Self::base(query, query.employee_ids.clone(), None)
    }

    /// A non-manager's own KPIs.
    pub fn own(query: &ListQuery, employee_id: &str) -> Self {
        Self::base(query, Vec::new(), Some(employee_id.to_string()))
    }

    fn base(query: &ListQuery, employee_ids: Vec<String>, employee_id: Option<String>) -> Self {
        Self {
            search: query.search.trim().to_string(),
            page: query.page.max(1),
            page_size: query.page_size.max(1),
            sort_by: api_sort_field(&query.sort_field).to_string(),
            sort_order: query.sort_order().to_string(),
            start_date: query.date_range.as_ref().map(|r| r.start.clone()),
            end_date: query.date_range.as_ref().map(|r| r.end.clone()),
            employee_ids,
            employee_id,
        }
    }
}

/// `data` of the KPI list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KpiPage {
    #[serde(default)]
    pub kpis: Vec<Kpi>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl KpiPage {
    pub fn into_result(self, page_size: usize) -> ListResult<Kpi> {
        ListResult::from_counts(self.kpis, self.total, None, page_size)
    }

    /// The own-KPI endpoint is unpaged: everything on one page.
    pub fn into_single_page(self) -> ListResult<Kpi> {
        let total_count = self.kpis.len();
        ListResult {
            rows: self.kpis,
            total_count,
            total_pages: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiIdRequest {
    #[serde(rename = "kpiId")]
    pub kpi_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    #[serde(rename = "kpiId")]
    pub kpi_id: String,
    pub remark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityPointRequest {
    #[serde(rename = "kpiId")]
    pub kpi_id: String,
    #[serde(rename = "qualityPoints")]
    pub quality_points: i8,
}

/// The add/update form. `kpi_id` is set when editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KpiForm {
    pub kpi_id: Option<String>,
    pub employee_id: String,
    pub project_name: String,
    pub startdate: String,
    pub deadline: String,
    pub remark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddKpiRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    #[serde(rename = "projectName")]
    pub project_name: String,
    pub startdate: String,
    pub deadline: String,
    #[serde(rename = "Remark")]
    pub remark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKpiRequest {
    #[serde(rename = "kpiId")]
    pub kpi_id: String,
    #[serde(rename = "projectName")]
    pub project_name: String,
    #[serde(rename = "Remark")]
    pub remark: String,
}

#[derive(Debug, Clone)]
pub enum KpiSubmission {
    Add(AddKpiRequest),
    Update(UpdateKpiRequest),
}

impl KpiForm {
    pub fn from_kpi(kpi: &Kpi) -> Self {
        Self {
            kpi_id: Some(kpi.kpi_id.clone()),
            employee_id: kpi.employee_id.clone(),
            project_name: kpi.project_name.clone(),
            startdate: kpi.startdate.clone().unwrap_or_default(),
            deadline: kpi.deadline.clone().unwrap_or_default(),
            remark: kpi.remark().to_string(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.kpi_id.is_some()
    }

    /// Validates and builds the request body for the matching endpoint.
    pub fn submission(&self) -> Result<KpiSubmission, String> {
        if self.project_name.trim().is_empty() {
            return Err("Project name is required".into());
        }
        if let Some(kpi_id) = &self.kpi_id {
            return Ok(KpiSubmission::Update(UpdateKpiRequest {
                kpi_id: kpi_id.clone(),
                project_name: self.project_name.trim().to_string(),
                remark: self.remark.trim().to_string(),
            }));
        }
        if self.employee_id.trim().is_empty() {
            return Err("Select an employee".into());
        }
        let (start, end) = (date_sort_key(&self.startdate), date_sort_key(&self.deadline));
        if start == UNPARSABLE_DATE_KEY || end == UNPARSABLE_DATE_KEY {
            return Err("Start date and deadline are required".into());
        }
        if start > end {
            return Err("Start date cannot be after the deadline".into());
        }
        Ok(KpiSubmission::Add(AddKpiRequest {
            employee_id: self.employee_id.trim().to_string(),
            project_name: self.project_name.trim().to_string(),
            startdate: self.startdate.clone(),
            deadline: self.deadline.clone(),
            remark: self.remark.trim().to_string(),
        }))
    }
}

/// Which KPIs a CSV export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    All,
    Selected,
    Mine,
}

impl ExportScope {
    pub const ALL: [ExportScope; 3] = [ExportScope::All, ExportScope::Selected, ExportScope::Mine];

    pub fn label(&self) -> &'static str {
        match self {
            ExportScope::All => "All employees",
            ExportScope::Selected => "Selected employees",
            ExportScope::Mine => "My KPIs",
        }
    }
}

/// Body of `/kpi/export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiExportRequest {
    pub scope: ExportScope,
    #[serde(rename = "employeeIds", skip_serializing_if = "Vec::is_empty", default)]
    pub employee_ids: Vec<String>,
    pub search: String,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    #[serde(rename = "sortOrder")]
    pub sort_order: String,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Why an export was refused before any request went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRejection {
    EmptySelection,
    NoOwnEmployee,
}

impl ExportRejection {
    pub fn message(&self) -> &'static str {
        match self {
            ExportRejection::EmptySelection => "Select at least one employee to export",
            ExportRejection::NoOwnEmployee => "Your account is not linked to an employee",
        }
    }
}

impl KpiExportRequest {
    pub fn build(
        scope: ExportScope,
        query: &ListQuery,
        selected: &[String],
        own_employee_id: Option<&str>,
    ) -> Result<Self, ExportRejection> {
        let employee_ids = match scope {
            ExportScope::All => Vec::new(),
            ExportScope::Selected => {
                if selected.is_empty() {
                    return Err(ExportRejection::EmptySelection);
                }
                selected.to_vec()
            }
            ExportScope::Mine => match own_employee_id.map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => vec![id.to_string()],
                None => return Err(ExportRejection::NoOwnEmployee),
            },
        };
        Ok(Self {
            scope,
            employee_ids,
            search: query.search.trim().to_string(),
            sort_by: api_sort_field(&query.sort_field).to_string(),
            sort_order: query.sort_order().to_string(),
            start_date: query.date_range.as_ref().map(|r| r.start.clone()),
            end_date: query.date_range.as_ref().map(|r| r.end.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::DateRange;
    use serde_json::json;

    #[test]
    fn record_accessors_handle_spellings() {
        let kpi: Kpi = serde_json::from_value(json!({
            "kpiId": 5,
            "employeeId": "E1",
            "projectName": "Apollo",
            "startdate": "",
            "deadline": "2025-06-01",
            "Remark": "ship it",
            "quality": -3,
            "punches": [
                { "punchDate": "2025-05-01", "remark": "first" },
                { "punchDate": "2025-05-20", "remark": "done", "status": "On time" }
            ]
        }))
        .unwrap();
        assert_eq!(kpi.kpi_id, "5");
        assert_eq!(kpi.startdate, None);
        assert_eq!(kpi.remark(), "ship it");
        assert_eq!(kpi.quality_points(), Some(-1));
        assert_eq!(kpi.last_punch().map(|p| p.remark.as_str()), Some("done"));
        assert_eq!(kpi.date_key(DEADLINE), 20250601);
        assert_eq!(kpi.date_key(START_DATE), UNPARSABLE_DATE_KEY);
    }

    #[test]
    fn lowercase_remark_and_unrated_quality() {
        let kpi: Kpi =
            serde_json::from_value(json!({ "kpiId": "K", "remark": "r", "qualityPoints": 0 })).unwrap();
        assert_eq!(kpi.remark(), "r");
        assert_eq!(kpi.quality_points(), None);
        assert!(kpi.last_punch().is_none());
    }

    #[test]
    fn list_request_maps_sort_fields() {
        let mut q = ListQuery::new("projectName", true, 10);
        q.employee_ids = vec!["E1".into(), "E2".into()];
        let all = serde_json::to_value(KpiListRequest::all(&q)).unwrap();
        assert_eq!(all["sortBy"], "createdAt");
        assert_eq!(all["sortOrder"], "asc");
        assert_eq!(all["employeeIds"], json!(["E1", "E2"]));
        assert!(all.get("employeeId").is_none());

        q.sort_field = DEADLINE.into();
        let own = serde_json::to_value(KpiListRequest::own(&q, "E9")).unwrap();
        assert_eq!(own["sortBy"], "deadline");
        assert_eq!(own["employeeId"], "E9");
        assert!(own.get("employeeIds").is_none());
    }

    #[test]
    fn form_validation_and_routing() {
        let mut form = KpiForm {
            employee_id: "E1".into(),
            project_name: "Apollo".into(),
            startdate: "2025-06-10".into(),
            deadline: "2025-06-01".into(),
            ..KpiForm::default()
        };
        assert!(form.submission().unwrap_err().contains("after the deadline"));
        form.deadline = "2025-06-30".into();
        assert!(matches!(form.submission(), Ok(KpiSubmission::Add(_))));

        form.kpi_id = Some("K1".into());
        form.startdate.clear();
        match form.submission() {
            Ok(KpiSubmission::Update(req)) => assert_eq!(req.kpi_id, "K1"),
            other => panic!("unexpected {other:?}"),
        }

        let body = serde_json::to_value(AddKpiRequest {
            employee_id: "E1".into(),
            project_name: "P".into(),
            startdate: "a".into(),
            deadline: "b".into(),
            remark: "x".into(),
        })
        .unwrap();
        assert_eq!(body["Remark"], "x");
    }

    #[test]
    fn export_selected_requires_selection() {
        let q = ListQuery::default();
        assert_eq!(
            KpiExportRequest::build(ExportScope::Selected, &q, &[], None),
            Err(ExportRejection::EmptySelection)
        );
        let ok = KpiExportRequest::build(ExportScope::Selected, &q, &["E3".into()], None).unwrap();
        assert_eq!(ok.employee_ids, vec!["E3"]);
    }

    #[test]
    fn export_mine_uses_session_employee() {
        let mut q = ListQuery::new(START_DATE, false, 10);
        q.search = " late ".into();
        q.date_range = Some(DateRange {
            start: "2025-01-01".into(),
            end: "2025-03-31".into(),
        });
        assert_eq!(
            KpiExportRequest::build(ExportScope::Mine, &q, &[], Some("  ")),
            Err(ExportRejection::NoOwnEmployee)
        );
        let req = KpiExportRequest::build(ExportScope::Mine, &q, &["ignored".into()], Some("E5")).unwrap();
        assert_eq!(req.employee_ids, vec!["E5"]);
        assert_eq!(req.search, "late");
        assert_eq!(req.sort_by, "startdate");
        assert_eq!(req.sort_order, "desc");
        assert_eq!(req.start_date.as_deref(), Some("2025-01-01"));

        let all = KpiExportRequest::build(ExportScope::All, &q, &["E1".into()], None).unwrap();
        assert!(all.employee_ids.is_empty());
        assert_eq!(serde_json::to_value(&all).unwrap()["scope"], "all");
    }
}
