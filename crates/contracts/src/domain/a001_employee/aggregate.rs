use serde::{Deserialize, Serialize};

use crate::shared::lenient;
use crate::shared::list::ListResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    #[serde(default, deserialize_with = "lenient::string")]
    pub account_number: String,
    #[serde(default)]
    pub ifsc: String,
    #[serde(default)]
    pub bank_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub pin: String,
}

/// Employee record as returned by `/employee/getlist` and `/employee/getrecord`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "employeeId", default, deserialize_with = "lenient::string")]
    pub employee_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub adharnumber: String,
    #[serde(default)]
    pub pan_number: String,
    #[serde(default)]
    pub date_of_joining: String,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub annual_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub base_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub monthly_salary: Option<f64>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub bank_details: BankDetails,
    #[serde(default)]
    pub address: Address,
}

/// `data` of `/employee/getlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePage {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<usize>,
}

impl EmployeePage {
    pub fn into_result(self, page_size: usize) -> ListResult<Employee> {
        ListResult::from_counts(self.employees, self.total, self.total_pages, page_size)
    }
}

/// Body of `/employee/add` and `/employee/update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeForm {
    #[serde(rename = "employeeId", skip_serializing_if = "Option::is_none", default)]
    pub employee_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub adharnumber: String,
    pub pan_number: String,
    pub date_of_joining: String,
    pub annual_salary: f64,
    pub base_salary: f64,
    pub department: String,
    pub designation: String,
    pub bank_details: BankDetails,
    pub address: Address,
}

impl EmployeeForm {
    pub fn from_employee(e: &Employee) -> Self {
        Self {
            employee_id: Some(e.employee_id.clone()).filter(|id| !id.is_empty()),
            name: e.name.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            dob: e.dob.clone(),
            adharnumber: e.adharnumber.clone(),
            pan_number: e.pan_number.clone(),
            date_of_joining: e.date_of_joining.clone(),
            annual_salary: e.annual_salary.unwrap_or_default(),
            base_salary: e.base_salary.or(e.monthly_salary).unwrap_or_default(),
            department: e.department.clone(),
            designation: e.designation.clone(),
            bank_details: e.bank_details.clone(),
            address: e.address.clone(),
        }
    }

    pub fn is_update(&self) -> bool {
        self.employee_id.is_some()
    }

    /// First problem found, phrased for the user.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err("A valid email is required".into());
        }
        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !self.phone.trim().is_empty() && digits < 7 {
            return Err("Phone number looks too short".into());
        }
        if self.annual_salary < 0.0 || self.base_salary < 0.0 {
            return Err("Salary cannot be negative".into());
        }
        Ok(())
    }
}

/// `data` of `/employee/getrecord`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeRecord {
    #[serde(default)]
    pub employee: Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeIdRequest {
    #[serde(rename = "employeeId")]
    pub employee_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_with_total_pages_only() {
        let page: EmployeePage = serde_json::from_value(json!({
            "employees": [
                { "employeeId": 101, "name": "Ravi", "annual_salary": "600000" },
                { "employeeId": "E-2", "name": "Meera", "address": { "pin": 560001 } }
            ],
            "totalPages": 3
        }))
        .unwrap();
        let result = page.into_result(10);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.rows[0].employee_id, "101");
        assert_eq!(result.rows[0].annual_salary, Some(600000.0));
        assert_eq!(result.rows[1].address.pin, "560001");
    }

    #[test]
    fn form_validation() {
        let mut form = EmployeeForm {
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            ..EmployeeForm::default()
        };
        assert!(form.validate().is_ok());
        form.email = "ravi@".into();
        assert!(form.validate().is_err());
        form.email = "ravi@example.com".into();
        form.phone = "12".into();
        assert!(form.validate().is_err());
        form.phone = "+91 98450 12345".into();
        form.base_salary = -1.0;
        assert_eq!(form.validate(), Err("Salary cannot be negative".to_string()));
    }

    #[test]
    fn new_employee_omits_id_on_the_wire() {
        let body = serde_json::to_value(EmployeeForm::default()).unwrap();
        assert!(body.get("employeeId").is_none());
        let edit = EmployeeForm::from_employee(&Employee {
            employee_id: "E9".into(),
            monthly_salary: Some(50000.0),
            ..Employee::default()
        });
        assert!(edit.is_update());
        assert_eq!(edit.base_salary, 50000.0);
    }
}
