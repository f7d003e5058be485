//! Sidebar with collapsible section groups, filtered by what the session may see.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::{
    invoice_generate_key, invoice_list_key, EMPLOYEE_NEW, KPI_NEW, SUBADMIN_REGISTER,
};
use crate::shared::icons::icon;
use crate::system::auth::context::use_visibility;
use contracts::domain::a002_invoice::aggregate::Company;
use contracts::system::access::{ActionId, NavSection, Visibility};
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuItem {
    key: String,
    label: String,
    icon: &'static str,
}

impl MenuItem {
    fn new(key: impl Into<String>, icon: &'static str) -> Self {
        let key = key.into();
        Self {
            label: tab_label_for_key(&key),
            key,
            icon,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    section: NavSection,
    icon: &'static str,
    /// Empty for a leaf that opens the section directly.
    items: Vec<MenuItem>,
}

fn section_icon(section: NavSection) -> &'static str {
    match section {
        NavSection::Dashboard => "dashboard",
        NavSection::Invoice => "file-text",
        NavSection::Payslip => "receipt",
        NavSection::Employee => "users",
        NavSection::UserAccess => "key",
        NavSection::Settings => "settings",
        NavSection::Kpi => "target",
    }
}

fn menu_groups(visibility: &Visibility) -> Vec<MenuGroup> {
    NavSection::ALL
        .into_iter()
        .filter(|section| visibility.shows(*section))
        .map(|section| {
            let mut items = Vec::new();
            match section {
                NavSection::Invoice => {
                    for company in Company::ALL {
                        if visibility.allows(ActionId::InvoiceView) {
                            items.push(MenuItem::new(invoice_list_key(company), "file-text"));
                        }
                        if visibility.allows(ActionId::InvoiceGenerate) {
                            items.push(MenuItem::new(invoice_generate_key(company), "plus"));
                        }
                    }
                }
                NavSection::Employee => {
                    items.push(MenuItem::new(section.key(), "users"));
                    if visibility.allows(ActionId::EmployeeAdd) {
                        items.push(MenuItem::new(EMPLOYEE_NEW, "plus"));
                    }
                }
                NavSection::Kpi => {
                    items.push(MenuItem::new(section.key(), "target"));
                    if visibility.allows(ActionId::KpiAdd) {
                        items.push(MenuItem::new(KPI_NEW, "plus"));
                    }
                }
                NavSection::UserAccess => {
                    items.push(MenuItem::new(section.key(), "key"));
                    items.push(MenuItem::new(SUBADMIN_REGISTER, "plus"));
                }
                _ => {}
            }
            MenuGroup {
                section,
                icon: section_icon(section),
                items,
            }
        })
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let visibility = use_visibility();
    let expanded_groups = RwSignal::new(Vec::<NavSection>::new());

    let is_active = move |key: &str| ctx.active.with(|a| a.as_deref() == Some(key));

    let render_group = move |group: MenuGroup| {
        let section = group.section;
        let has_children = !group.items.is_empty();
        let is_expanded = move || expanded_groups.with(|g| g.contains(&section));

        let children = has_children.then(|| {
            let items = group.items.clone();
            view! {
                <Show when=is_expanded>
                    <div class="app-sidebar__children">
                        {items.clone().into_iter().map(|item| {
                            let key = StoredValue::new(item.key.clone());
                            let label = item.label.clone();
                            view! {
                                <div
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || key.with_value(|k| is_active(k))
                                    style:padding-left="10px"
                                    on:click=move |_| key.with_value(|k| ctx.open_tab(k, &tab_label_for_key(k)))
                                >
                                    <div class="app-sidebar__item-content">
                                        {icon(item.icon)}
                                        <span>{label}</span>
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                </Show>
            }
        });

        view! {
            <div>
                <div
                    class="app-sidebar__item"
                    class:app-sidebar__item--active=move || !has_children && is_active(section.key())
                    style:padding-left="12px"
                    on:click=move |_| {
                        if has_children {
                            expanded_groups.update(|groups| {
                                if let Some(pos) = groups.iter().position(|s| *s == section) {
                                    groups.remove(pos);
                                } else {
                                    groups.push(section);
                                }
                            });
                        } else {
                            ctx.open_tab(section.key(), section.label());
                        }
                    }
                >
                    <div class="app-sidebar__item-content">
                        {icon(group.icon)}
                        <span>{section.label()}</span>
                    </div>
                    {has_children.then(|| view! {
                        <div
                            class="app-sidebar__chevron"
                            class:app-sidebar__chevron--expanded=is_expanded
                        >
                            {icon("chevron-right")}
                        </div>
                    })}
                </div>
                {children}
            </div>
        }
    };

    view! {
        <div class="app-sidebar__content">
            {move || visibility.with(menu_groups).into_iter().map(render_group).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::access::resolve_visibility;
    use contracts::system::auth::{Role, Session};

    fn subadmin(granted: &[&str]) -> Visibility {
        let session = Session {
            role: Some(Role::Subadmin),
            permissions: granted.iter().map(|c| (c.to_string(), 1)).collect(),
            ..Session::anonymous()
        };
        resolve_visibility(&session)
    }

    #[test]
    fn admin_sees_every_section() {
        let groups = menu_groups(&Visibility::everything());
        assert_eq!(groups.len(), NavSection::ALL.len());
        let invoice = groups.iter().find(|g| g.section == NavSection::Invoice).unwrap();
        assert_eq!(invoice.items.len(), Company::ALL.len() * 2);
    }

    #[test]
    fn view_only_invoice_has_no_generate_entries() {
        let groups = menu_groups(&subadmin(&["View Invoice details"]));
        let sections: Vec<_> = groups.iter().map(|g| g.section).collect();
        assert_eq!(sections, vec![NavSection::Dashboard, NavSection::Invoice]);
        assert!(groups[1].items.iter().all(|i| i.key.starts_with("invoice_") && !i.key.contains("generate")));
    }
}
