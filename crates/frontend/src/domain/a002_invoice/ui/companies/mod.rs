use contracts::domain::a002_invoice::aggregate::Company;
use contracts::system::access::ActionId;
use leptos::prelude::*;
use thaw::*;

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::layout::tabs::tab_labels::{invoice_generate_key, invoice_list_key};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::system::auth::guard::RequireAction;

/// Landing page of the invoice section: one card per company.
#[component]
pub fn InvoiceCompanies() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let open = move |key: String| ctx.open_tab(&key, &tab_label_for_key(&key));

    view! {
        <PageFrame page_id="invoice--companies" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Invoices"</h1>
                </div>
            </div>
            <div class="page__content">
                <div class="dashboard__tiles">
                    {Company::ALL
                        .into_iter()
                        .map(|company| {
                            view! {
                                <div class="dashboard__tile">
                                    <div class="dashboard__tile-title">
                                        {icon("file-text")}
                                        <span>{company.label()}</span>
                                    </div>
                                    <Flex gap=FlexGap::Small>
                                        <RequireAction action=ActionId::InvoiceView>
                                            <Button
                                                appearance=ButtonAppearance::Secondary
                                                on_click=move |_| open(invoice_list_key(company))
                                            >
                                                "History"
                                            </Button>
                                        </RequireAction>
                                        <RequireAction action=ActionId::InvoiceGenerate>
                                            <Button
                                                appearance=ButtonAppearance::Primary
                                                on_click=move |_| open(invoice_generate_key(company))
                                            >
                                                {icon("plus")}
                                                " Generate"
                                            </Button>
                                        </RequireAction>
                                    </Flex>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </PageFrame>
    }
}
