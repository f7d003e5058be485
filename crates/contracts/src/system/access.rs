//! Role and capability driven visibility for navigation and in-page actions.
//!
//! The result is advisory: it decides what the UI renders and never replaces
//! the remote API's own authorization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::auth::Session;

/// Capability names exactly as the remote API stores them.
pub mod capability {
    pub const VIEW_INVOICE: &str = "View Invoice details";
    pub const GENERATE_INVOICE: &str = "Generate invoice details";
    pub const VIEW_PAYSLIP: &str = "View payslip details";
    pub const GENERATE_PAYSLIP: &str = "Generate payslip";
    pub const VIEW_EMPLOYEE: &str = "View Employee Details";
    pub const ADD_EMPLOYEE: &str = "Add Employee Details";
    pub const USER_ACCESS: &str = "User Access";
    pub const MANAGE_SETTINGS: &str = "Manage Settings";
    pub const MANAGE_KPI: &str = "Manage KPI";
    pub const ADD_KPI: &str = "Add KPI details";
    pub const DELETE_KPI: &str = "Delete KPI";
    pub const VIEW_KPI: &str = "View KPI details";

    /// Every capability a subadmin can be granted, in form order.
    pub const ALL: [&str; 12] = [
        VIEW_INVOICE,
        GENERATE_INVOICE,
        VIEW_PAYSLIP,
        GENERATE_PAYSLIP,
        VIEW_EMPLOYEE,
        ADD_EMPLOYEE,
        USER_ACCESS,
        MANAGE_SETTINGS,
        MANAGE_KPI,
        ADD_KPI,
        DELETE_KPI,
        VIEW_KPI,
    ];
}

use capability::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavSection {
    Dashboard,
    Invoice,
    Payslip,
    Employee,
    #[serde(rename = "useraccess")]
    UserAccess,
    Settings,
    Kpi,
}

impl NavSection {
    pub const ALL: [NavSection; 7] = [
        NavSection::Dashboard,
        NavSection::Invoice,
        NavSection::Payslip,
        NavSection::Employee,
        NavSection::UserAccess,
        NavSection::Settings,
        NavSection::Kpi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            NavSection::Dashboard => "dashboard",
            NavSection::Invoice => "invoice",
            NavSection::Payslip => "payslip",
            NavSection::Employee => "employee",
            NavSection::UserAccess => "useraccess",
            NavSection::Settings => "settings",
            NavSection::Kpi => "kpi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavSection::Dashboard => "Dashboard",
            NavSection::Invoice => "Invoice",
            NavSection::Payslip => "Payslip",
            NavSection::Employee => "Employees",
            NavSection::UserAccess => "User Access",
            NavSection::Settings => "Settings",
            NavSection::Kpi => "KPI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionId {
    InvoiceView,
    InvoiceGenerate,
    PayslipView,
    PayslipGenerate,
    EmployeeView,
    EmployeeAdd,
    EmployeeEdit,
    EmployeeDelete,
    UserAccessManage,
    SettingsManage,
    KpiView,
    KpiAdd,
    KpiDelete,
    KpiManage,
    KpiExport,
    KpiPunch,
}

impl ActionId {
    pub const ALL: [ActionId; 16] = [
        ActionId::InvoiceView,
        ActionId::InvoiceGenerate,
        ActionId::PayslipView,
        ActionId::PayslipGenerate,
        ActionId::EmployeeView,
        ActionId::EmployeeAdd,
        ActionId::EmployeeEdit,
        ActionId::EmployeeDelete,
        ActionId::UserAccessManage,
        ActionId::SettingsManage,
        ActionId::KpiView,
        ActionId::KpiAdd,
        ActionId::KpiDelete,
        ActionId::KpiManage,
        ActionId::KpiExport,
        ActionId::KpiPunch,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ActionId::InvoiceView => "invoice.view",
            ActionId::InvoiceGenerate => "invoice.generate",
            ActionId::PayslipView => "payslip.view",
            ActionId::PayslipGenerate => "payslip.generate",
            ActionId::EmployeeView => "employee.view",
            ActionId::EmployeeAdd => "employee.add",
            ActionId::EmployeeEdit => "employee.edit",
            ActionId::EmployeeDelete => "employee.delete",
            ActionId::UserAccessManage => "useraccess.manage",
            ActionId::SettingsManage => "settings.manage",
            ActionId::KpiView => "kpi.view",
            ActionId::KpiAdd => "kpi.add",
            ActionId::KpiDelete => "kpi.delete",
            ActionId::KpiManage => "kpi.manage",
            ActionId::KpiExport => "kpi.export",
            ActionId::KpiPunch => "kpi.punch",
        }
    }
}

/// A visibility rule for non-admin sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any authenticated session.
    Always,
    /// At least one of the capabilities is granted.
    AnyOf(&'static [&'static str]),
    /// No capability unlocks it; only the admin role passes.
    AdminOnly,
}

impl Guard {
    fn allows(&self, session: &Session) -> bool {
        match self {
            Guard::Always => true,
            Guard::AnyOf(names) => names.iter().any(|name| session.has(name)),
            Guard::AdminOnly => false,
        }
    }
}

const SECTION_GUARDS: [(NavSection, Guard); 7] = [
    (NavSection::Dashboard, Guard::Always),
    (NavSection::Invoice, Guard::AnyOf(&[VIEW_INVOICE, GENERATE_INVOICE])),
    (NavSection::Payslip, Guard::AnyOf(&[VIEW_PAYSLIP, GENERATE_PAYSLIP])),
    (NavSection::Employee, Guard::AnyOf(&[VIEW_EMPLOYEE, ADD_EMPLOYEE])),
    (NavSection::UserAccess, Guard::AnyOf(&[USER_ACCESS])),
    (NavSection::Settings, Guard::AnyOf(&[MANAGE_SETTINGS])),
    (
        NavSection::Kpi,
        Guard::AnyOf(&[VIEW_KPI, ADD_KPI, MANAGE_KPI, DELETE_KPI]),
    ),
];

const ACTION_GUARDS: [(ActionId, Guard); 16] = [
    (ActionId::InvoiceView, Guard::AnyOf(&[VIEW_INVOICE, GENERATE_INVOICE])),
    (ActionId::InvoiceGenerate, Guard::AnyOf(&[GENERATE_INVOICE])),
    (ActionId::PayslipView, Guard::AnyOf(&[VIEW_PAYSLIP, GENERATE_PAYSLIP])),
    (ActionId::PayslipGenerate, Guard::AnyOf(&[GENERATE_PAYSLIP])),
    (ActionId::EmployeeView, Guard::AnyOf(&[VIEW_EMPLOYEE, ADD_EMPLOYEE])),
    (ActionId::EmployeeAdd, Guard::AnyOf(&[ADD_EMPLOYEE])),
    (ActionId::EmployeeEdit, Guard::AnyOf(&[ADD_EMPLOYEE])),
    (ActionId::EmployeeDelete, Guard::AdminOnly),
    (ActionId::UserAccessManage, Guard::AnyOf(&[USER_ACCESS])),
    (ActionId::SettingsManage, Guard::AnyOf(&[MANAGE_SETTINGS])),
    (
        ActionId::KpiView,
        Guard::AnyOf(&[VIEW_KPI, ADD_KPI, MANAGE_KPI, DELETE_KPI]),
    ),
    (ActionId::KpiAdd, Guard::AnyOf(&[ADD_KPI])),
    (ActionId::KpiDelete, Guard::AnyOf(&[DELETE_KPI])),
    (ActionId::KpiManage, Guard::AnyOf(&[MANAGE_KPI])),
    (ActionId::KpiExport, Guard::AnyOf(&[MANAGE_KPI])),
    (ActionId::KpiPunch, Guard::AnyOf(&[VIEW_KPI, ADD_KPI])),
];

/// What the current session may see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    pub sections: BTreeSet<NavSection>,
    pub actions: BTreeSet<ActionId>,
}

impl Visibility {
    pub fn everything() -> Self {
        Self {
            sections: NavSection::ALL.into_iter().collect(),
            actions: ActionId::ALL.into_iter().collect(),
        }
    }

    pub fn shows(&self, section: NavSection) -> bool {
        self.sections.contains(&section)
    }

    pub fn allows(&self, action: ActionId) -> bool {
        self.actions.contains(&action)
    }
}

/// Computes the visible sections and actions for a session.
///
/// Admin gets the universal set whatever its permission map holds. An
/// unauthenticated session sees nothing.
pub fn resolve_visibility(session: &Session) -> Visibility {
    if !session.is_authenticated() {
        return Visibility::default();
    }
    if session.is_admin() {
        return Visibility::everything();
    }

    Visibility {
        sections: SECTION_GUARDS
            .iter()
            .filter(|(_, guard)| guard.allows(session))
            .map(|(section, _)| *section)
            .collect(),
        actions: ACTION_GUARDS
            .iter()
            .filter(|(_, guard)| guard.allows(session))
            .map(|(action, _)| *action)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::{PermissionMap, Role};

    fn session(role: Role, granted: &[(&str, u8)]) -> Session {
        Session {
            role: Some(role),
            permissions: granted
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<PermissionMap>(),
            ..Session::default()
        }
    }

    #[test]
    fn guard_tables_cover_every_variant() {
        for section in NavSection::ALL {
            assert!(SECTION_GUARDS.iter().any(|(s, _)| *s == section));
        }
        for action in ActionId::ALL {
            assert!(ACTION_GUARDS.iter().any(|(a, _)| *a == action));
        }
    }

    #[test]
    fn admin_sees_everything_with_empty_permissions() {
        let visibility = resolve_visibility(&session(Role::Admin, &[]));
        assert_eq!(visibility, Visibility::everything());
        assert!(visibility.allows(ActionId::EmployeeDelete));
    }

    #[test]
    fn admin_ignores_explicit_zeros() {
        let visibility =
            resolve_visibility(&session(Role::Admin, &[(USER_ACCESS, 0), (MANAGE_KPI, 0)]));
        assert!(visibility.shows(NavSection::UserAccess));
        assert!(visibility.allows(ActionId::KpiExport));
    }

    #[test]
    fn subadmin_with_view_invoice_only() {
        let visibility = resolve_visibility(&session(Role::Subadmin, &[(VIEW_INVOICE, 1)]));
        let expected: BTreeSet<NavSection> =
            [NavSection::Dashboard, NavSection::Invoice].into_iter().collect();
        assert_eq!(visibility.sections, expected);
        assert!(visibility.allows(ActionId::InvoiceView));
        assert!(!visibility.allows(ActionId::InvoiceGenerate));
    }

    #[test]
    fn flipping_only_grant_removes_section() {
        let on = resolve_visibility(&session(Role::Subadmin, &[(GENERATE_PAYSLIP, 1)]));
        assert!(on.shows(NavSection::Payslip));
        let off = resolve_visibility(&session(Role::Subadmin, &[(GENERATE_PAYSLIP, 0)]));
        assert!(!off.shows(NavSection::Payslip));
        assert!(off.shows(NavSection::Dashboard));
    }

    #[test]
    fn employee_delete_is_admin_only() {
        let visibility = resolve_visibility(&session(
            Role::Subadmin,
            &capability::ALL.iter().map(|c| (*c, 1u8)).collect::<Vec<_>>(),
        ));
        assert!(visibility.allows(ActionId::EmployeeAdd));
        assert!(!visibility.allows(ActionId::EmployeeDelete));
        assert_eq!(visibility.sections.len(), NavSection::ALL.len());
    }

    #[test]
    fn plain_user_without_permissions_sees_dashboard() {
        let visibility = resolve_visibility(&session(Role::User, &[]));
        assert_eq!(visibility.sections.len(), 1);
        assert!(visibility.shows(NavSection::Dashboard));
        assert!(visibility.actions.is_empty());
    }

    #[test]
    fn anonymous_sees_nothing() {
        let visibility = resolve_visibility(&Session::anonymous());
        assert!(visibility.sections.is_empty());
        assert!(visibility.actions.is_empty());
    }

    #[test]
    fn kpi_export_follows_manage_kpi() {
        let manager = resolve_visibility(&session(Role::Subadmin, &[(MANAGE_KPI, 1)]));
        assert!(manager.allows(ActionId::KpiExport));
        assert!(manager.allows(ActionId::KpiManage));
        assert!(!manager.allows(ActionId::KpiDelete));

        let viewer = resolve_visibility(&session(Role::Subadmin, &[(VIEW_KPI, 1)]));
        assert!(viewer.shows(NavSection::Kpi));
        assert!(viewer.allows(ActionId::KpiPunch));
        assert!(!viewer.allows(ActionId::KpiExport));
    }

    #[test]
    fn section_keys_round_trip_serde() {
        let json = serde_json::to_string(&NavSection::UserAccess).unwrap();
        assert_eq!(json, "\"useraccess\"");
        assert_eq!(NavSection::UserAccess.key(), "useraccess");
    }
}
