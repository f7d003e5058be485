use contracts::system::auth::{permissions_from_json, Role, Session};
use web_sys::window;

const ADMIN_ID_KEY: &str = "adminId";
const ROLE_KEY: &str = "role";
const PERMISSIONS_KEY: &str = "permissions";
const EMPLOYEE_ID_KEY: &str = "employeeId";
const NAME_KEY: &str = "displayName";

const ALL_KEYS: [&str; 5] = [
    ADMIN_ID_KEY,
    ROLE_KEY,
    PERMISSIONS_KEY,
    EMPLOYEE_ID_KEY,
    NAME_KEY,
];

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn read(storage: &web_sys::Storage, key: &str) -> Option<String> {
    storage.get_item(key).ok().flatten()
}

/// Rebuilds a session from stored values; anything missing or unreadable
/// leaves the session anonymous or the permission map empty.
pub fn session_from_values(
    role: Option<&str>,
    permissions: Option<&str>,
    employee_id: Option<&str>,
    admin_id: Option<&str>,
    display_name: Option<&str>,
) -> Session {
    let Some(role) = role.and_then(Role::parse) else {
        return Session::anonymous();
    };
    let permissions = permissions
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
        .map(|v| permissions_from_json(&v))
        .unwrap_or_default();
    let clean = |v: Option<&str>| {
        v.map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null" && *s != "undefined")
            .map(str::to_string)
    };
    Session {
        role: Some(role),
        permissions,
        employee_id: clean(employee_id),
        admin_id: clean(admin_id),
        display_name: clean(display_name),
    }
}

/// Load the session saved by the last login
pub fn load_session() -> Session {
    let Some(storage) = get_local_storage() else {
        return Session::anonymous();
    };
    session_from_values(
        read(&storage, ROLE_KEY).as_deref(),
        read(&storage, PERMISSIONS_KEY).as_deref(),
        read(&storage, EMPLOYEE_ID_KEY).as_deref(),
        read(&storage, ADMIN_ID_KEY).as_deref(),
        read(&storage, NAME_KEY).as_deref(),
    )
}

/// Save session to localStorage
pub fn save_session(session: &Session) {
    let Some(storage) = get_local_storage() else {
        log::warn!("localStorage unavailable; session will not survive a reload");
        return;
    };
    let Some(role) = session.role else {
        clear_session();
        return;
    };
    let _ = storage.set_item(ROLE_KEY, role.as_str());
    if let Ok(raw) = serde_json::to_string(&session.permissions) {
        let _ = storage.set_item(PERMISSIONS_KEY, &raw);
    }
    let optional = [
        (EMPLOYEE_ID_KEY, &session.employee_id),
        (ADMIN_ID_KEY, &session.admin_id),
        (NAME_KEY, &session.display_name),
    ];
    for (key, value) in optional {
        match value {
            Some(v) => {
                let _ = storage.set_item(key, v);
            }
            None => {
                let _ = storage.remove_item(key);
            }
        }
    }
}

/// Clear everything the login stored
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        for key in ALL_KEYS {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::access::capability::VIEW_INVOICE;

    #[test]
    fn missing_role_is_anonymous() {
        let s = session_from_values(None, Some("{}"), Some("E1"), Some("A1"), None);
        assert!(!s.is_authenticated());
        let s = session_from_values(Some("null"), None, None, None, None);
        assert_eq!(s, Session::anonymous());
    }

    #[test]
    fn restores_role_permissions_and_ids() {
        let s = session_from_values(
            Some("subadmin"),
            Some(r#"{"View Invoice details":1,"Generate invoice details":0}"#),
            Some("E42"),
            Some("undefined"),
            Some(" Priya "),
        );
        assert_eq!(s.role, Some(Role::Subadmin));
        assert!(s.has(VIEW_INVOICE));
        assert!(!s.has("Generate invoice details"));
        assert_eq!(s.employee_id.as_deref(), Some("E42"));
        assert_eq!(s.admin_id, None);
        assert_eq!(s.display_name.as_deref(), Some("Priya"));
    }

    #[test]
    fn broken_permissions_read_as_empty() {
        let s = session_from_values(Some("user"), Some("not json"), None, None, None);
        assert!(s.is_authenticated());
        assert!(s.permissions.is_empty());
    }
}
