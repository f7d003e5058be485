use contracts::domain::a001_employee::aggregate::Employee;
use contracts::shared::list::ListQuery;
use contracts::system::access::ActionId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

use crate::domain::a001_employee::api::{self, EmployeeSource};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{employee_edit_key, EMPLOYEE_NEW};
use crate::layout::tabs::tab_label_for_key;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::dialogs::confirm;
use crate::shared::icons::icon;
use crate::shared::list_controller::{use_list, ServerPaged};
use crate::shared::list_utils::{format_amount, SortLabel};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::guard::RequireAction;

const STORAGE_KEY: &str = "employee_list_state_v1";

fn salary_cell(e: &Employee) -> String {
    e.annual_salary
        .or(e.base_salary)
        .map(format_amount)
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn EmployeeList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let list = use_list(
        STORAGE_KEY,
        ListQuery::new("name", true, 10),
        Rc::new(ServerPaged::new(Rc::new(EmployeeSource))),
    );
    let controller = list.controller;
    let toasts = list.toasts;
    let loading = list.is_loading();

    let search_signal = RwSignal::new(controller.with_untracked(|c| c.query().search.clone()));

    let open_new = move || ctx.open_tab(EMPLOYEE_NEW, &tab_label_for_key(EMPLOYEE_NEW));
    let open_edit = move |id: &str| {
        let key = employee_edit_key(id);
        ctx.open_tab(&key, &tab_label_for_key(&key));
    };

    let delete = move |employee: Employee| {
        if !confirm(&format!("Delete employee {}?", employee.name)) {
            return;
        }
        spawn_local(async move {
            match api::delete_employee(&employee.employee_id).await {
                Ok(message) => {
                    toasts.success(message.unwrap_or_else(|| "Employee deleted".into()));
                    list.refresh();
                }
                Err(e) => toasts.error(e.user_message("Failed to delete employee")),
            }
        });
    };

    let toggle_sort = move |field: &'static str| move |_| list.sort_by(field);

    view! {
        <PageFrame page_id="employee--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Employees"</h1>
                    <Badge>
                        {move || controller.with(|c| c.result().total_count.to_string())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <RequireAction action=ActionId::EmployeeAdd>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_new()>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequireAction>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| list.refresh()
                        disabled=loading
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Loading..." } else { " Refresh" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Search"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || controller.with(|c| c.query().page))
                                total_pages=Signal::derive(move || controller.with(|c| c.result().total_pages))
                                total_count=Signal::derive(move || controller.with(|c| c.result().total_count))
                                page_size=Signal::derive(move || controller.with(|c| c.query().page_size))
                                on_page_change=Callback::new(move |page| list.go_to_page(page))
                                on_page_size_change=Callback::new(move |size| list.set_page_size(size))
                                disabled=loading
                            />
                        </div>
                        <div class="filter-panel-header__right"></div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <Input value=search_signal placeholder="Name, email or phone..." />
                            </div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| list.search(&search_signal.get_untracked())
                                disabled=loading
                            >
                                "Search"
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| {
                                    search_signal.set(String::new());
                                    list.search("");
                                }
                            >
                                "Reset"
                            </Button>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=80.0>"ID"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=160.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort("name")>
                                        <SortLabel controller=controller field="name" label="Name" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=180.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort("email")>
                                        <SortLabel controller=controller field="email" label="Email" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Phone"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort("department")>
                                        <SortLabel controller=controller field="department" label="Department" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Designation"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Joined"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Salary"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=90.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || list.rows()
                                key=|e| e.employee_id.clone()
                                children=move |employee| {
                                    let id = StoredValue::new(employee.employee_id.clone());
                                    let salary = salary_cell(&employee);
                                    let employee_id = employee.employee_id.clone();
                                    let name = employee.name.clone();
                                    let email = employee.email.clone();
                                    let phone = employee.phone.clone();
                                    let department = employee.department.clone();
                                    let designation = employee.designation.clone();
                                    let joined = employee.date_of_joining.clone();
                                    let row = StoredValue::new(employee);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{employee_id}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{name}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{email}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{phone}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{department}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{designation}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{joined}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{salary}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <div style="display: flex; gap: 4px;">
                                                        <RequireAction action=ActionId::EmployeeEdit>
                                                            <Button
                                                                size=ButtonSize::Small
                                                                appearance=ButtonAppearance::Subtle
                                                                on_click=move |_| id.with_value(|id| open_edit(id))
                                                            >
                                                                {icon("edit")}
                                                            </Button>
                                                        </RequireAction>
                                                        <RequireAction action=ActionId::EmployeeDelete>
                                                            <Button
                                                                size=ButtonSize::Small
                                                                appearance=ButtonAppearance::Subtle
                                                                on_click=move |_| delete(row.get_value())
                                                            >
                                                                {icon("trash")}
                                                            </Button>
                                                        </RequireAction>
                                                    </div>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || controller.with(|c| c.is_loaded() && c.rows().is_empty())>
                        <div class="table__empty">"No employees found"</div>
                    </Show>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_prefers_annual() {
        let mut e = Employee {
            base_salary: Some(30000.0),
            ..Employee::default()
        };
        assert_eq!(salary_cell(&e), "30 000.00");
        e.annual_salary = Some(360000.0);
        assert_eq!(salary_cell(&e), "360 000.00");
        assert_eq!(salary_cell(&Employee::default()), "-");
    }
}
