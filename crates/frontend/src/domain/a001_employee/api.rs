use async_trait::async_trait;
use contracts::domain::a001_employee::aggregate::{
    Employee, EmployeeForm, EmployeeIdRequest, EmployeePage, EmployeeRecord,
};
use contracts::shared::list::{ListQuery, ListRequest, ListResult};

use crate::shared::api_utils::{get_data, post_ack, post_data, ApiError};
use crate::shared::list_controller::ListSource;

/// Page size used when a form needs every employee at once.
pub const PICKER_PAGE_SIZE: usize = 1000;

/// Server-paged `/employee/getlist`.
pub struct EmployeeSource;

#[async_trait(?Send)]
impl ListSource<Employee> for EmployeeSource {
    async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<Employee>, ApiError> {
        let page: EmployeePage = post_data("/employee/getlist", &ListRequest::from(query)).await?;
        Ok(page.into_result(query.page_size))
    }
}

/// Every employee, for pickers.
pub async fn fetch_all_employees() -> Result<Vec<Employee>, ApiError> {
    let mut query = ListQuery::new("name", true, PICKER_PAGE_SIZE);
    query.sort_field.clear();
    let page: EmployeePage = post_data("/employee/getlist", &ListRequest::from(&query)).await?;
    Ok(page.employees)
}

fn record_path(employee_id: &str) -> String {
    format!(
        "/employee/getrecord?employeeId={}",
        urlencoding::encode(employee_id.trim())
    )
}

pub async fn fetch_employee(employee_id: &str) -> Result<Employee, ApiError> {
    let record: EmployeeRecord = get_data(&record_path(employee_id)).await?;
    Ok(record.employee)
}

fn save_path(form: &EmployeeForm) -> &'static str {
    if form.is_update() {
        "/employee/update"
    } else {
        "/employee/add"
    }
}

/// Adds or updates, depending on whether the form carries an id.
pub async fn save_employee(form: &EmployeeForm) -> Result<Option<String>, ApiError> {
    post_ack(save_path(form), form).await
}

pub async fn delete_employee(employee_id: &str) -> Result<Option<String>, ApiError> {
    post_ack(
        "/employee/delete",
        &EmployeeIdRequest {
            employee_id: employee_id.to_string(),
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_path_encodes_the_id() {
        assert_eq!(record_path("E 7&x"), "/employee/getrecord?employeeId=E%207%26x");
    }

    #[test]
    fn save_path_follows_the_form_mode() {
        let mut form = EmployeeForm::default();
        assert_eq!(save_path(&form), "/employee/add");
        form.employee_id = Some("E1".into());
        assert_eq!(save_path(&form), "/employee/update");
    }
}
