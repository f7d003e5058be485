use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::access::capability;
use super::auth::permissions_from_json;
use crate::shared::list::ListResult;

/// A subadmin account as returned by `/subadmin/getlist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subadmin {
    #[serde(rename = "subadminId", default)]
    pub subadmin_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "employeeId", default)]
    pub employee_id: String,
    #[serde(default)]
    pub permissions: serde_json::Value,
}

impl Subadmin {
    /// Names of the capabilities granted to this account.
    pub fn granted(&self) -> Vec<String> {
        permissions_from_json(&self.permissions)
            .into_iter()
            .filter(|(_, flag)| *flag == 1)
            .map(|(name, _)| name)
            .collect()
    }
}

/// `data` of `/subadmin/getlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubadminPage {
    #[serde(default)]
    pub subadmins: Vec<Subadmin>,
    #[serde(default)]
    pub total: Option<usize>,
}

impl SubadminPage {
    pub fn into_result(self, page_size: usize) -> ListResult<Subadmin> {
        ListResult::from_counts(self.subadmins, self.total, None, page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSubadminRequest {
    pub adminid: String,
    pub employeeid: String,
    pub username: String,
    pub password: String,
    pub permissions: BTreeMap<String, bool>,
}

/// Draft of a new subadmin account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubadminForm {
    pub employee_id: String,
    pub username: String,
    pub password: String,
    pub granted: BTreeSet<String>,
}

impl SubadminForm {
    pub fn toggle(&mut self, name: &str, on: bool) {
        if on {
            self.granted.insert(name.to_string());
        } else {
            self.granted.remove(name);
        }
    }

    /// Every field is required and at least one capability must be granted.
    /// Capabilities outside the known list are dropped.
    pub fn to_request(&self, admin_id: &str) -> Result<RegisterSubadminRequest, String> {
        if self.employee_id.trim().is_empty()
            || self.username.trim().is_empty()
            || self.password.is_empty()
        {
            return Err("Please fill in all fields".into());
        }
        let permissions: BTreeMap<String, bool> = capability::ALL
            .iter()
            .filter(|name| self.granted.contains(**name))
            .map(|name| (name.to_string(), true))
            .collect();
        if permissions.is_empty() {
            return Err("Select at least one permission".into());
        }
        Ok(RegisterSubadminRequest {
            adminid: admin_id.to_string(),
            employeeid: self.employee_id.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            permissions,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSubadminRequest {
    #[serde(rename = "subadminId")]
    pub subadmin_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn granted_lists_only_enabled_capabilities() {
        let row: Subadmin = serde_json::from_value(json!({
            "subadminId": "S1",
            "name": "Asha",
            "username": "asha",
            "employeeId": "E7",
            "permissions": { "User Access": true, "Manage KPI": false, "Generate payslip": 1 }
        }))
        .unwrap();
        assert_eq!(row.granted(), vec!["Generate payslip", "User Access"]);
    }

    #[test]
    fn form_requires_fields_and_a_permission() {
        let mut form = SubadminForm {
            employee_id: "E7".into(),
            username: " asha ".into(),
            password: "pw".into(),
            ..SubadminForm::default()
        };
        assert_eq!(
            form.to_request("A1").unwrap_err(),
            "Select at least one permission"
        );
        form.toggle(capability::MANAGE_KPI, true);
        form.toggle("Launch rockets", true);
        let req = form.to_request("A1").unwrap();
        assert_eq!(req.username, "asha");
        assert_eq!(req.adminid, "A1");
        assert_eq!(req.permissions.len(), 1);
        assert_eq!(req.permissions.get(capability::MANAGE_KPI), Some(&true));

        form.toggle(capability::MANAGE_KPI, false);
        form.password.clear();
        assert_eq!(form.to_request("A1").unwrap_err(), "Please fill in all fields");
    }

    #[test]
    fn page_totals() {
        let page: SubadminPage =
            serde_json::from_value(json!({ "subadmins": [{ "subadminId": "S1" }], "total": 6 })).unwrap();
        let result = page.into_result(5);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.rows.len(), 1);
    }
}
