use contracts::domain::a002_invoice::aggregate::{
    Company, GenerateInvoiceRequest, Invoice, DUE_DATE, INVOICE_DATE,
};
use contracts::shared::dates::format_dmy;
use contracts::shared::list::ListQuery;
use contracts::system::access::ActionId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_invoice::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::invoice_generate_key;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::list_controller::use_list;
use crate::shared::list_utils::{format_amount, SortLabel};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::guard::RequireAction;

fn storage_key(company: Company) -> &'static str {
    match company {
        Company::MhdTech => "invoice_mhd_tech_list_state_v1",
        Company::EnoylityStudio => "invoice_enoylity_studio_list_state_v1",
        Company::EnoylityTech => "invoice_enoylity_tech_list_state_v1",
    }
}

/// Issued invoices of one company.
#[component]
pub fn InvoiceList(company: Company) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let list = use_list(
        storage_key(company),
        ListQuery::new(INVOICE_DATE, false, 10),
        api::invoice_strategy(company),
    );
    let controller = list.controller;
    let toasts = list.toasts;
    let loading = list.is_loading();
    let copying = RwSignal::new(false);

    let search_signal = RwSignal::new(controller.with_untracked(|c| c.query().search.clone()));

    let open_generate = move |prefill: Option<GenerateInvoiceRequest>| {
        let key = invoice_generate_key(company);
        if let Some(request) = prefill {
            match serde_json::to_value(&request) {
                Ok(state) => ctx.set_form_state(key.clone(), state),
                Err(e) => log::error!("invoice prefill not serializable: {}", e),
            }
        }
        ctx.open_tab(&key, &tab_label_for_key(&key));
    };

    let copy_invoice = move |row: Invoice| {
        copying.set(true);
        spawn_local(async move {
            let source = match api::fetch_invoice(company, &row.id).await {
                Ok(full) => full,
                Err(e) => {
                    log::warn!("invoice {} reload failed, copying the list row: {}", row.id, e);
                    row
                }
            };
            let _ = copying.try_set(false);
            open_generate(Some(GenerateInvoiceRequest::copy_of(&source)));
            toasts.info("Invoice copied into a new form");
        });
    };

    let toggle_sort = move |field: &'static str| move |_| list.sort_by(field);

    view! {
        <PageFrame page_id="invoice--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{format!("{} invoices", company.label())}</h1>
                    <Badge>
                        {move || controller.with(|c| c.result().total_count.to_string())}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <RequireAction action=ActionId::InvoiceGenerate>
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| open_generate(None)>
                            {icon("plus")}
                            " Generate"
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
                                <Input value=search_signal placeholder="Client or invoice number..." />
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
                                <TableHeaderCell resizable=false min_width=110.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort("invoice_number")>
                                        <SortLabel controller=controller field="invoice_number" label="Number" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=180.0>"Client"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(INVOICE_DATE)>
                                        <SortLabel controller=controller field=INVOICE_DATE label="Invoice date" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=120.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort(DUE_DATE)>
                                        <SortLabel controller=controller field=DUE_DATE label="Due date" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>"Payment"</TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=110.0>
                                    <div class="table__sortable-header" style="cursor:pointer;" on:click=toggle_sort("total_amount")>
                                        <SortLabel controller=controller field="total_amount" label="Total" />
                                    </div>
                                </TableHeaderCell>
                                <TableHeaderCell resizable=false min_width=70.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || list.rows()
                                key=|inv| inv.id.clone()
                                children=move |invoice| {
                                    let number = invoice.invoice_number.clone();
                                    let client = invoice.bill_to.name.clone();
                                    let invoice_date = format_dmy(&invoice.invoice_date);
                                    let due_date = format_dmy(&invoice.due_date);
                                    let payment = invoice.payment().label();
                                    let total = format_amount(invoice.total());
                                    let row = StoredValue::new(invoice);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{number}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">{client}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{invoice_date}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{due_date}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{payment}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{total}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <RequireAction action=ActionId::InvoiceGenerate>
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Subtle
                                                            disabled=copying
                                                            on_click=move |_| copy_invoice(row.get_value())
                                                        >
                                                            {icon("copy")}
                                                        </Button>
                                                    </RequireAction>
                                                </TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || controller.with(|c| c.is_loaded() && c.rows().is_empty())>
                        <div class="table__empty">"No invoices yet"</div>
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
    fn each_company_persists_separately() {
        let keys: std::collections::HashSet<_> = Company::ALL.into_iter().map(storage_key).collect();
        assert_eq!(keys.len(), Company::ALL.len());
        assert!(keys.iter().all(|k| k.ends_with("_list_state_v1")));
    }
}
