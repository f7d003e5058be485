//! Tab keys and their titles.
//!
//! Keys are `<section>` for a section's main page, plus a few suffixed forms
//! (`employee_edit_<id>`, `invoice_<company>` ...). Every key belongs to one
//! [`NavSection`], which is what the registry checks before rendering.

use contracts::domain::a002_invoice::aggregate::Company;
use contracts::system::access::NavSection;

pub const EMPLOYEE_NEW: &str = "employee_new";
pub const KPI_NEW: &str = "kpi_new";
pub const SUBADMIN_REGISTER: &str = "useraccess_register";

const EMPLOYEE_EDIT: &str = "employee_edit_";
const KPI_EDIT: &str = "kpi_edit_";
const INVOICE_GENERATE: &str = "invoice_generate_";
const INVOICE_LIST: &str = "invoice_";

pub fn employee_edit_key(employee_id: &str) -> String {
    format!("{EMPLOYEE_EDIT}{employee_id}")
}

pub fn kpi_edit_key(kpi_id: &str) -> String {
    format!("{KPI_EDIT}{kpi_id}")
}

pub fn invoice_list_key(company: Company) -> String {
    format!("{INVOICE_LIST}{}", company.key())
}

pub fn invoice_generate_key(company: Company) -> String {
    format!("{INVOICE_GENERATE}{}", company.key())
}

/// A parsed tab key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRoute {
    Section(NavSection),
    EmployeeNew,
    EmployeeEdit(String),
    KpiNew,
    KpiEdit(String),
    InvoiceList(Company),
    InvoiceGenerate(Company),
    SubadminRegister,
}

impl TabRoute {
    pub fn parse(key: &str) -> Option<TabRoute> {
        if let Some(section) = NavSection::ALL.into_iter().find(|s| s.key() == key) {
            return Some(TabRoute::Section(section));
        }
        match key {
            EMPLOYEE_NEW => return Some(TabRoute::EmployeeNew),
            KPI_NEW => return Some(TabRoute::KpiNew),
            SUBADMIN_REGISTER => return Some(TabRoute::SubadminRegister),
            _ => {}
        }
        if let Some(id) = key.strip_prefix(EMPLOYEE_EDIT).filter(|id| !id.is_empty()) {
            return Some(TabRoute::EmployeeEdit(id.to_string()));
        }
        if let Some(id) = key.strip_prefix(KPI_EDIT).filter(|id| !id.is_empty()) {
            return Some(TabRoute::KpiEdit(id.to_string()));
        }
        if let Some(company) = key.strip_prefix(INVOICE_GENERATE).and_then(Company::from_key) {
            return Some(TabRoute::InvoiceGenerate(company));
        }
        key.strip_prefix(INVOICE_LIST)
            .and_then(Company::from_key)
            .map(TabRoute::InvoiceList)
    }

    pub fn section(&self) -> NavSection {
        match self {
            TabRoute::Section(section) => *section,
            TabRoute::EmployeeNew | TabRoute::EmployeeEdit(_) => NavSection::Employee,
            TabRoute::KpiNew | TabRoute::KpiEdit(_) => NavSection::Kpi,
            TabRoute::InvoiceList(_) | TabRoute::InvoiceGenerate(_) => NavSection::Invoice,
            TabRoute::SubadminRegister => NavSection::UserAccess,
        }
    }

    pub fn title(&self) -> String {
        match self {
            TabRoute::Section(section) => section.label().to_string(),
            TabRoute::EmployeeNew => "New employee".to_string(),
            TabRoute::EmployeeEdit(id) => format!("Employee {id}"),
            TabRoute::KpiNew => "New KPI".to_string(),
            TabRoute::KpiEdit(_) => "Edit KPI".to_string(),
            TabRoute::InvoiceList(company) => format!("Invoices: {}", company.label()),
            TabRoute::InvoiceGenerate(company) => format!("New invoice: {}", company.label()),
            TabRoute::SubadminRegister => "New subadmin".to_string(),
        }
    }
}

/// Readable tab title for a key; unknown keys show as-is.
pub fn tab_label_for_key(key: &str) -> String {
    TabRoute::parse(key)
        .map(|route| route.title())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_keys_parse() {
        assert_eq!(TabRoute::parse("kpi"), Some(TabRoute::Section(NavSection::Kpi)));
        assert_eq!(
            TabRoute::parse("useraccess"),
            Some(TabRoute::Section(NavSection::UserAccess))
        );
        assert_eq!(TabRoute::parse("nope"), None);
    }

    #[test]
    fn parameterized_keys_round_trip() {
        let key = employee_edit_key("E17");
        assert_eq!(TabRoute::parse(&key), Some(TabRoute::EmployeeEdit("E17".into())));
        assert_eq!(TabRoute::parse("employee_edit_"), None);

        let key = invoice_generate_key(Company::EnoylityStudio);
        let route = TabRoute::parse(&key).unwrap();
        assert_eq!(route, TabRoute::InvoiceGenerate(Company::EnoylityStudio));
        assert_eq!(route.section(), NavSection::Invoice);

        let key = invoice_list_key(Company::MhdTech);
        assert_eq!(TabRoute::parse(&key), Some(TabRoute::InvoiceList(Company::MhdTech)));
        assert_eq!(TabRoute::parse("invoice_unknown"), None);
    }

    #[test]
    fn every_route_maps_to_a_section() {
        assert_eq!(TabRoute::parse(KPI_NEW).unwrap().section(), NavSection::Kpi);
        assert_eq!(
            TabRoute::parse(SUBADMIN_REGISTER).unwrap().section(),
            NavSection::UserAccess
        );
        assert_eq!(tab_label_for_key(&kpi_edit_key("k1")), "Edit KPI");
        assert_eq!(tab_label_for_key("mystery"), "mystery");
    }
}
