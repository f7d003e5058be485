//! KPI list: managers see everyone's KPIs with filters, quality rating and
//! CSV export; everyone else sees their own and punches them.

use contracts::domain::a003_kpi::aggregate::{ExportScope, Kpi, Punch, DEADLINE, START_DATE};
use contracts::shared::dates::{date_sort_key, format_dmy, UNPARSABLE_DATE_KEY};
use contracts::shared::list::{DateRange, ListQuery};
use contracts::system::access::ActionId;
use leptos::children::ToChildren;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

use crate::domain::a001_employee::ui::picker::EmployeeMultiSelect;
use crate::domain::a003_kpi::api::{self, KpiScope, KpiSource};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::{kpi_edit_key, KPI_NEW};
use crate::shared::components::{DateInput, FilterPanel, FilterTag, PaginationControls};
use crate::shared::dialogs::{alert, confirm, prompt};
use crate::shared::icons::icon;
use crate::shared::list_controller::{use_list, ListHandle, ServerPaged};
use crate::shared::list_utils::SortLabel;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::{can, use_session};
use crate::system::auth::guard::RequireAction;

const STORAGE_KEY: &str = "kpi_list_state_v1";

/// Both ends or neither; the start may not follow the end.
fn date_filter(start: &str, end: &str) -> Result<Option<DateRange>, &'static str> {
    let (start, end) = (start.trim(), end.trim());
    match (start.is_empty(), end.is_empty()) {
        (true, true) => Ok(None),
        (false, false) => {
            let (from, to) = (date_sort_key(start), date_sort_key(end));
            if from == UNPARSABLE_DATE_KEY || to == UNPARSABLE_DATE_KEY {
                Err("Dates must be valid")
            } else if from > to {
                Err("Start date cannot be after the end date")
            } else {
                Ok(Some(DateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                }))
            }
        }
        _ => Err("Pick both a start and an end date"),
    }
}

fn active_filter_count(query: &ListQuery) -> usize {
    usize::from(!query.search.trim().is_empty())
        + usize::from(query.date_range.is_some())
        + usize::from(!query.employee_ids.is_empty())
}

fn punch_summary(punch: &Punch) -> String {
    let mut lines = vec![format!("Date: {}", format_dmy(&punch.punch_date))];
    if !punch.remark.is_empty() {
        lines.push(format!("Remark: {}", punch.remark));
    }
    if let Some(status) = punch.status.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Status: {}", status));
    }
    lines.join("\n")
}

fn date_cell(value: &Option<String>) -> String {
    value.as_deref().map(format_dmy).unwrap_or_else(|| "-".to_string())
}

fn points_cell(points: Option<f64>) -> String {
    match points {
        Some(p) if p.fract() == 0.0 => format!("{}", p as i64),
        Some(p) => format!("{:.1}", p),
        None => "-".to_string(),
    }
}

/// Runs a row action and refetches on success.
fn run_row_action<F>(list: ListHandle<Kpi>, fallback: &'static str, done: &'static str, action: F)
where
    F: std::future::Future<Output = Result<Option<String>, crate::shared::api_utils::ApiError>>
        + 'static,
{
    let toasts = list.toasts;
    spawn_local(async move {
        match action.await {
            Ok(message) => {
                toasts.success(message.unwrap_or_else(|| done.to_string()));
                list.refresh();
            }
            Err(e) => toasts.error(e.user_message(fallback)),
        }
    });
}

#[component]
pub fn KpiList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let session = use_session();
    let manages = can(ActionId::KpiManage).get_untracked();
    let own_employee = session.with_untracked(|s| s.employee_id.clone());

    let scope = if manages {
        KpiScope::Everyone
    } else {
        KpiScope::Own(own_employee.clone())
    };
    let list = use_list(
        STORAGE_KEY,
        ListQuery::new(START_DATE, false, 10),
        Rc::new(ServerPaged::new(Rc::new(KpiSource::new(scope)))),
    );
    let controller = list.controller;
    let toasts = list.toasts;
    let loading = list.is_loading();

    let initial = controller.with_untracked(|c| c.query().clone());
    let search_signal = RwSignal::new(initial.search.clone());
    let start_draft = RwSignal::new(initial.date_range.as_ref().map(|r| r.start.clone()).unwrap_or_default());
    let end_draft = RwSignal::new(initial.date_range.as_ref().map(|r| r.end.clone()).unwrap_or_default());
    let is_expanded = RwSignal::new(false);
    let export_scope = RwSignal::new(if manages { ExportScope::All } else { ExportScope::Mine });
    let exporting = RwSignal::new(false);
    let own_employee = StoredValue::new(own_employee);

    let active_filters_count =
        Signal::derive(move || controller.with(|c| active_filter_count(c.query())));

    let apply_filters = move || match date_filter(&start_draft.get_untracked(), &end_draft.get_untracked()) {
        Ok(range) => {
            let text = search_signal.get_untracked();
            list.apply(|c| {
                c.set_search(&text);
                c.set_date_range(range);
            });
        }
        Err(message) => toasts.warning(message),
    };

    let reset_filters = move || {
        search_signal.set(String::new());
        start_draft.set(String::new());
        end_draft.set(String::new());
        list.apply(|c| {
            c.set_search("");
            c.set_date_range(None);
            c.set_employee_filter(Vec::new());
        });
    };

    let export = move || {
        let scope = export_scope.get_untracked();
        let (query, selected) = controller.with_untracked(|c| (c.query().clone(), c.query().employee_ids.clone()));
        let request = match own_employee.with_value(|own| {
            api::export_request(scope, &query, &selected, own.as_deref())
        }) {
            Ok(request) => request,
            Err(e) => {
                toasts.warning(e.user_message());
                return;
            }
        };
        exporting.set(true);
        spawn_local(async move {
            let outcome = api::export_kpis(request).await;
            let _ = exporting.try_set(false);
            match outcome {
                Ok(file_name) => toasts.success(format!("Saved {}", file_name)),
                Err(e) => toasts.error(e.user_message()),
            }
        });
    };

    let open_new = move || ctx.open_tab(KPI_NEW, &tab_label_for_key(KPI_NEW));
    let open_edit = move |kpi_id: &str| {
        let key = kpi_edit_key(kpi_id);
        ctx.open_tab(&key, &tab_label_for_key(&key));
    };

    let punch_in = move |kpi: Kpi| {
        let Some(remark) = prompt(&format!("Remark for \"{}\"", kpi.project_name)) else {
            return;
        };
        if remark.is_empty() {
            toasts.warning("A remark is required to punch in");
            return;
        }
        run_row_action(list, "Failed to punch", "Punched in", async move {
            api::punch(&kpi.kpi_id, &remark).await
        });
    };

    let rate = move |kpi_id: String, up: bool| {
        run_row_action(list, "Failed to set quality point", "Quality point saved", async move {
            api::set_quality_point(&kpi_id, up).await
        });
    };

    let delete = move |kpi: Kpi| {
        if !confirm(&format!("Delete KPI \"{}\"?", kpi.project_name)) {
            return;
        }
        run_row_action(list, "Failed to delete KPI", "KPI deleted", async move {
            api::delete_kpi(&kpi.kpi_id).await
        });
    };

    let toggle_sort = move |field: &'static str| move |_| list.sort_by(field);

    let scope_options: Vec<ExportScope> = ExportScope::ALL
        .into_iter()
        .filter(|s| manages || *s == ExportScope::Mine)
        .collect();

    view! {
        <PageFrame page_id="kpi--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{if manages { "KPIs" } else { "My KPIs" }}</h1>
                    <Badge>
                        {move || controller.with(|c| c.result().total_count.to_string())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <RequireAction action=ActionId::KpiAdd>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_new()>
                            {icon("plus")}
                            " New"
                        </Button>
                    </RequireAction>
                    <RequireAction action=ActionId::KpiExport>
                        <div class="export-control">
                            <select
                                class="form__select"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    if let Some(scope) = ExportScope::ALL.into_iter().find(|s| s.label() == value) {
                                        export_scope.set(scope);
                                    }
                                }
                            >
                                {scope_options
                                    .iter()
                                    .map(|s| {
                                        let scope = *s;
                                        view! {
                                            <option
                                                value=scope.label()
                                                selected=move || export_scope.get() == scope
                                            >
                                                {scope.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| export()
                                disabled=exporting
                            >
                                {icon("download")}
                                {move || if exporting.get() { " Exporting..." } else { " Export CSV" }}
                            </Button>
                        </div>
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
                <FilterPanel
                    is_expanded=is_expanded
                    active_filters_count=active_filters_count
                    pagination_controls=ChildrenFn::to_children(move || view! {
                        <PaginationControls
                            current_page=Signal::derive(move || controller.with(|c| c.query().page))
                            total_pages=Signal::derive(move || controller.with(|c| c.result().total_pages))
                            total_count=Signal::derive(move || controller.with(|c| c.result().total_count))
                            page_size=Signal::derive(move || controller.with(|c| c.query().page_size))
                            on_page_change=Callback::new(move |page| list.go_to_page(page))
                            on_page_size_change=Callback::new(move |size| list.set_page_size(size))
                            disabled=loading
                        />
                    })
                    filter_content=ChildrenFn::to_children(move || view! {
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 280px;">
                                <Input value=search_signal placeholder="Project or remark..." />
                            </div>
                            <div class="form__group">
                                <label class="form__label" for="kpi-filter-from">"From"</label>
                                <DateInput
                                    id="kpi-filter-from"
                                    value=start_draft
                                    on_change=move |v| start_draft.set(v)
                                />
                            </div>
                            <div class="form__group">
                                <label class="form__label" for="kpi-filter-to">"To"</label>
                                <DateInput
                                    id="kpi-filter-to"
                                    value=end_draft
                                    on_change=move |v| end_draft.set(v)
                                />
                            </div>
                            {manages.then(|| view! {
                                <div class="form__group">
                                    <label class="form__label">"Employees"</label>
                                    <EmployeeMultiSelect
                                        selected=Signal::derive(move || controller.with(|c| c.query().employee_ids.clone()))
                                        on_change=Callback::new(move |ids: Vec<String>| {
                                            list.apply(|c| c.set_employee_filter(ids));
                                        })
                                    />
                                </div>
                            })}
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=move |_| apply_filters()
                                disabled=loading
                            >
                                "Apply"
                            </Button>
                            <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_filters()>
                                "Reset"
                            </Button>
                        </Flex>
                    })
                    filter_tags=ChildrenFn::to_children(move || view! {
                        {move || controller.with(|c| c.query().date_range.clone()).map(|range| view! {
                            <FilterTag
                                label=format!("{} – {}", format_dmy(&range.start), format_dmy(&range.end))
                                on_remove=Callback::new(move |_| {
                                    start_draft.set(String::new());
                                    end_draft.set(String::new());
                                    list.apply(|c| c.set_date_range(None));
                                })
                            />
                        })}
                        {move || {
                            let count = controller.with(|c| c.query().employee_ids.len());
                            (count > 0).then(|| view! {
                                <FilterTag
                                    label=format!("{} employee(s)", count)
                                    on_remove=Callback::new(move |_| list.apply(|c| c.set_employee_filter(Vec::new())))
                                />
                            })
                        }}
                    })
                />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell resizable=false min_width=160.0>"Project"</TableHeaderCell>
                                {manages.then(|| view! {
                                    <TableHeaderCell resizable=false min_width=140.0>"Employee"</TableHeaderCell>
                                })}
                                <TableHeaderCell resizable=false min_width=110.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(START_DATE)>
                                        <SortLabel controller=controller field=START_DATE label="Start" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(DEADLINE)>
                                        <SortLabel controller=controller field=DEADLINE label="Deadline" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=160.0>"Remark"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=70.0>"Points"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Quality"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>"Punch"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=90.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || list.rows()
                                key=|k| (k.kpi_id.clone(), k.punches.len(), k.quality_points())
                                children=move |kpi| {
                                    let kpi_id = StoredValue::new(kpi.kpi_id.clone());
                                    let quality = kpi.quality_points();
                                    let last_punch = kpi.last_punch().cloned();
                                    let project = kpi.project_name.clone();
                                    let employee = kpi.employee_name.clone();
                                    let start = date_cell(&kpi.startdate);
                                    let deadline = date_cell(&kpi.deadline);
                                    let remark = kpi.remark().to_string();
                                    let points = points_cell(kpi.points);
                                    let row = StoredValue::new(kpi);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{project}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            {manages.then(move || view! {
                                                <TableCell>
                                                    <TableCellLayout truncate=true>{employee}</TableCellLayout>
                                                </TableCell>
                                            })}
                                            <TableCell>
                                                <TableCellLayout>{start}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{deadline}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{remark}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{points}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if manages {
                                                        view! {
                                                            <div style="display: flex; gap: 4px;">
                                                                <Button
                                                                    size=ButtonSize::Small
                                                                    appearance=if quality == Some(-1) { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                                                                    on_click=move |_| rate(kpi_id.get_value(), false)
                                                                >
                                                                    {icon("minus")}
                                                                </Button>
                                                                <Button
                                                                    size=ButtonSize::Small
                                                                    appearance=if quality == Some(1) { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                                                                    on_click=move |_| rate(kpi_id.get_value(), true)
                                                                >
                                                                    {icon("plus")}
                                                                </Button>
                                                            </div>
                                                        }.into_any()
                                                    } else {
                                                        view! {
                                                            <span>{match quality {
                                                                Some(q) if q > 0 => "+1",
                                                                Some(_) => "-1",
                                                                None => "-",
                                                            }}</span>
                                                        }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {match last_punch {
                                                        Some(punch) => view! {
                                                            <Button
                                                                size=ButtonSize::Small
                                                                appearance=ButtonAppearance::Secondary
                                                                on_click=move |_| alert(&punch_summary(&punch))
                                                            >
                                                                {icon("eye")}
                                                                " View Punch"
                                                            </Button>
                                                        }.into_any(),
                                                        None => view! {
                                                            <RequireAction action=ActionId::KpiPunch>
                                                                <Button
                                                                    size=ButtonSize::Small
                                                                    appearance=ButtonAppearance::Primary
                                                                    on_click=move |_| punch_in(row.get_value())
                                                                >
                                                                    {icon("check")}
                                                                    " Punch In"
                                                                </Button>
                                                            </RequireAction>
                                                        }.into_any(),
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <div style="display: flex; gap: 4px;">
                                                        <RequireAction action=ActionId::KpiAdd>
                                                            <Button
                                                                size=ButtonSize::Small
                                                                appearance=ButtonAppearance::Subtle
                                                                on_click=move |_| kpi_id.with_value(|id| open_edit(id))
                                                            >
                                                                {icon("edit")}
                                                            </Button>
                                                        </RequireAction>
                                                        <RequireAction action=ActionId::KpiDelete>
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
                        <div class="table__empty">"No KPIs found"</div>
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
    fn date_filter_needs_both_ends_in_order() {
        assert_eq!(date_filter("", " "), Ok(None));
        assert!(date_filter("2025-01-01", "").is_err());
        assert!(date_filter("2025-02-01", "2025-01-01").is_err());
        assert_eq!(
            date_filter("2025-01-01", "2025-01-31"),
            Ok(Some(DateRange {
                start: "2025-01-01".into(),
                end: "2025-01-31".into(),
            }))
        );
    }

    #[test]
    fn filter_count_tracks_query() {
        let mut q = ListQuery::default();
        assert_eq!(active_filter_count(&q), 0);
        q.search = "apollo".into();
        q.employee_ids = vec!["E1".into()];
        assert_eq!(active_filter_count(&q), 2);
    }

    #[test]
    fn punch_summary_skips_blank_parts() {
        let punch = Punch {
            punch_date: "2025-05-20".into(),
            remark: String::new(),
            status: Some("On time".into()),
        };
        assert_eq!(punch_summary(&punch), "Date: 20-05-2025\nStatus: On time");
    }

    #[test]
    fn cells() {
        assert_eq!(points_cell(Some(3.0)), "3");
        assert_eq!(points_cell(Some(2.5)), "2.5");
        assert_eq!(points_cell(None), "-");
        assert_eq!(date_cell(&None), "-");
    }
}
