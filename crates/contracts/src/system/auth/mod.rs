use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability name -> granted flag (`0` or `1`).
pub type PermissionMap = BTreeMap<String, u8>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload of a successful `/admin/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(rename = "adminId", default)]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Option<serde_json::Value>,
    #[serde(rename = "employeeId", default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Subadmin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Subadmin => "subadmin",
            Role::User => "user",
        }
    }

    /// Parses the role string stored by the login flow.
    ///
    /// Any non-empty unknown role is treated as a plain user.
    pub fn parse(raw: &str) -> Option<Role> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "" | "null" | "undefined" => None,
            "admin" => Some(Role::Admin),
            "subadmin" => Some(Role::Subadmin),
            _ => Some(Role::User),
        }
    }
}

/// The authenticated session, restored from browser storage on mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Option<Role>,
    pub permissions: PermissionMap,
    pub employee_id: Option<String>,
    pub admin_id: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_login(data: &LoginData) -> Self {
        Self {
            role: data.role.as_deref().and_then(Role::parse),
            permissions: data
                .permissions
                .as_ref()
                .map(permissions_from_json)
                .unwrap_or_default(),
            employee_id: non_empty(data.employee_id.as_deref()),
            admin_id: non_empty(data.admin_id.as_deref()),
            display_name: non_empty(data.name.as_deref()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// A missing key reads as not granted.
    pub fn has(&self, capability: &str) -> bool {
        self.permissions.get(capability).copied().unwrap_or(0) == 1
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "null" && *v != "undefined")
        .map(str::to_string)
}

/// Normalizes a permissions object from the wire.
///
/// Integers `0/1`, booleans and the strings `"0"/"1"/"true"/"false"` are
/// accepted; any other value, or a non-object input, reads as not granted.
pub fn permissions_from_json(value: &serde_json::Value) -> PermissionMap {
    let Some(object) = value.as_object() else {
        return PermissionMap::new();
    };
    object
        .iter()
        .map(|(name, flag)| {
            let granted = match flag {
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_i64() == Some(1),
                serde_json::Value::String(s) => matches!(s.trim(), "1" | "true"),
                _ => false,
            };
            (name.clone(), u8::from(granted))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parsing() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" SubAdmin "), Some(Role::Subadmin));
        assert_eq!(Role::parse("employee"), Some(Role::User));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("null"), None);
    }

    #[test]
    fn permissions_accept_ints_and_bools() {
        let map = permissions_from_json(&json!({
            "View Invoice details": 1,
            "Generate payslip": true,
            "Manage KPI": 0,
            "User Access": "1",
            "Delete KPI": null,
            "Add KPI details": 7
        }));
        assert_eq!(map.get("View Invoice details"), Some(&1));
        assert_eq!(map.get("Generate payslip"), Some(&1));
        assert_eq!(map.get("Manage KPI"), Some(&0));
        assert_eq!(map.get("User Access"), Some(&1));
        assert_eq!(map.get("Delete KPI"), Some(&0));
        assert_eq!(map.get("Add KPI details"), Some(&0));
    }

    #[test]
    fn malformed_permissions_are_empty() {
        assert!(permissions_from_json(&json!("oops")).is_empty());
        assert!(permissions_from_json(&json!([1, 2])).is_empty());
    }

    #[test]
    fn session_from_login_payload() {
        let data: LoginData = serde_json::from_value(json!({
            "adminId": "A1",
            "role": "subadmin",
            "permissions": { "View KPI details": 1 },
            "employeeId": ""
        }))
        .unwrap();
        let session = Session::from_login(&data);
        assert_eq!(session.role, Some(Role::Subadmin));
        assert!(session.has("View KPI details"));
        assert!(!session.has("Manage KPI"));
        assert_eq!(session.employee_id, None);
        assert_eq!(session.admin_id.as_deref(), Some("A1"));
        assert!(session.is_authenticated());
        assert!(!session.is_admin());
    }
}
