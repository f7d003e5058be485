//! Tab key → view. Every page is wrapped in the section guard of its route,
//! so a tab restored from the URL cannot show a page the session may not see.

use super::tab_labels::TabRoute;
use crate::domain::a001_employee::ui::details::EmployeeDetails;
use crate::domain::a001_employee::ui::list::EmployeeList;
use crate::domain::a002_invoice::ui::companies::InvoiceCompanies;
use crate::domain::a002_invoice::ui::generate::InvoiceGenerate;
use crate::domain::a002_invoice::ui::list::InvoiceList;
use crate::domain::a003_kpi::ui::details::KpiDetails;
use crate::domain::a003_kpi::ui::list::KpiList;
use crate::domain::a004_payslip::ui::generate::PayslipGenerate;
use crate::domain::a005_company_settings::ui::settings::CompanySettingsPage;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::guard::RequireSection;
use crate::system::pages::dashboard::DashboardPage;
use crate::system::subadmins::ui::list::SubadminList;
use crate::system::subadmins::ui::register::SubadminRegister;
use contracts::system::access::NavSection;
use leptos::prelude::*;

pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let Some(route) = TabRoute::parse(key) else {
        log::warn!("unknown tab key: {}", key);
        return view! { <div class="placeholder">"Unknown page"</div> }.into_any();
    };

    let key_for_close = key.to_string();
    let on_close = Callback::new(move |_: ()| tabs_store.close_tab(&key_for_close));
    let section = route.section();

    let content = move || match route.clone() {
        TabRoute::Section(NavSection::Dashboard) => view! { <DashboardPage /> }.into_any(),
        TabRoute::Section(NavSection::Invoice) => view! { <InvoiceCompanies /> }.into_any(),
        TabRoute::Section(NavSection::Payslip) => view! { <PayslipGenerate /> }.into_any(),
        TabRoute::Section(NavSection::Employee) => view! { <EmployeeList /> }.into_any(),
        TabRoute::Section(NavSection::UserAccess) => view! { <SubadminList /> }.into_any(),
        TabRoute::Section(NavSection::Settings) => view! { <CompanySettingsPage /> }.into_any(),
        TabRoute::Section(NavSection::Kpi) => view! { <KpiList /> }.into_any(),
        TabRoute::EmployeeNew => {
            view! { <EmployeeDetails employee_id=None on_close=on_close /> }.into_any()
        }
        TabRoute::EmployeeEdit(id) => {
            view! { <EmployeeDetails employee_id=Some(id) on_close=on_close /> }.into_any()
        }
        TabRoute::KpiNew => view! { <KpiDetails kpi_id=None on_close=on_close /> }.into_any(),
        TabRoute::KpiEdit(id) => {
            view! { <KpiDetails kpi_id=Some(id) on_close=on_close /> }.into_any()
        }
        TabRoute::InvoiceList(company) => view! { <InvoiceList company=company /> }.into_any(),
        TabRoute::InvoiceGenerate(company) => {
            view! { <InvoiceGenerate company=company on_close=on_close /> }.into_any()
        }
        TabRoute::SubadminRegister => view! { <SubadminRegister on_close=on_close /> }.into_any(),
    };

    view! { <RequireSection section=section>{content()}</RequireSection> }.into_any()
}
