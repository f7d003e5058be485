//! Landing page: a greeting and one tile per section the session may open.

use contracts::system::access::{ActionId, NavSection, Visibility};
use contracts::system::auth::Session;
use leptos::prelude::*;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::{EMPLOYEE_NEW, KPI_NEW, SUBADMIN_REGISTER};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::system::auth::context::{use_session, use_visibility};

#[derive(Debug, Clone, PartialEq)]
struct Tile {
    section: NavSection,
    icon: &'static str,
    blurb: &'static str,
    /// Second button: `(tab key, caption)`.
    shortcut: Option<(&'static str, &'static str)>,
}

fn tile(section: NavSection, visibility: &Visibility) -> Option<Tile> {
    let (icon, blurb, shortcut) = match section {
        NavSection::Dashboard => return None,
        NavSection::Invoice => ("file-text", "Issue and review invoices per company", None),
        NavSection::Payslip => ("receipt", "Generate monthly salary slips", None),
        NavSection::Employee => (
            "users",
            "Staff records and bank details",
            visibility
                .allows(ActionId::EmployeeAdd)
                .then_some((EMPLOYEE_NEW, "Add employee")),
        ),
        NavSection::UserAccess => (
            "key",
            "Subadmin accounts and permissions",
            Some((SUBADMIN_REGISTER, "Add subadmin")),
        ),
        NavSection::Settings => ("settings", "Company details printed on invoices", None),
        NavSection::Kpi => (
            "target",
            "Targets, punches and quality points",
            visibility.allows(ActionId::KpiAdd).then_some((KPI_NEW, "Add KPI")),
        ),
    };
    Some(Tile {
        section,
        icon,
        blurb,
        shortcut,
    })
}

fn tiles(visibility: &Visibility) -> Vec<Tile> {
    NavSection::ALL
        .into_iter()
        .filter(|s| visibility.shows(*s))
        .filter_map(|s| tile(s, visibility))
        .collect()
}

fn greeting(session: &Session) -> String {
    match session.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => format!("Welcome back, {}", name.trim()),
        None => "Welcome back".to_string(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();
    let visibility = use_visibility();
    let open = move |key: &str| ctx.open_tab(key, &tab_label_for_key(key));

    let render_tile = move |tile: Tile| {
        let section = tile.section;
        view! {
            <div class="dashboard__tile">
                <div class="dashboard__tile-title">
                    {icon(tile.icon)}
                    <span>{section.label()}</span>
                </div>
                <p class="dashboard__tile-text">{tile.blurb}</p>
                <div class="dashboard__tile-actions">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| open(section.key())>
                        "Open"
                    </Button>
                    {tile.shortcut.map(|(key, caption)| view! {
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open(key)>
                            {icon("plus")}
                            {format!(" {}", caption)}
                        </Button>
                    })}
                </div>
            </div>
        }
    };

    view! {
        <PageFrame page_id="dashboard--home" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{move || session.with(greeting)}</h1>
                </div>
                <div class="page__header-right">
                    <span class="dashboard__role">
                        {move || session.with(|s| s.role.map(|r| r.as_str()).unwrap_or("guest"))}
                    </span>
                </div>
            </div>
            <div class="page__content">
                <div class="dashboard__tiles">
                    {move || visibility.with(tiles).into_iter().map(render_tile).collect_view()}
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::access::resolve_visibility;
    use contracts::system::auth::Role;

    #[test]
    fn admin_gets_a_tile_per_section_but_dashboard() {
        let all = tiles(&Visibility::everything());
        assert_eq!(all.len(), NavSection::ALL.len() - 1);
        let kpi = all.iter().find(|t| t.section == NavSection::Kpi).unwrap();
        assert_eq!(kpi.shortcut, Some((KPI_NEW, "Add KPI")));
    }

    #[test]
    fn viewer_sees_no_add_shortcut() {
        let session = Session {
            role: Some(Role::Subadmin),
            permissions: [("View Employee Details".to_string(), 1)].into_iter().collect(),
            ..Session::anonymous()
        };
        let shown = tiles(&resolve_visibility(&session));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].section, NavSection::Employee);
        assert_eq!(shown[0].shortcut, None);
    }

    #[test]
    fn greeting_uses_name_when_known() {
        let mut session = Session::anonymous();
        assert_eq!(greeting(&session), "Welcome back");
        session.display_name = Some(" Asha ".into());
        assert_eq!(greeting(&session), "Welcome back, Asha");
    }
}
