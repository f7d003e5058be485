//! Invoice generation form. Dates are edited as `YYYY-MM-DD` and sent as
//! `DD-MM-YYYY`.

use contracts::domain::a002_invoice::aggregate::{
    Company, GenerateInvoiceRequest, LineItem, PaymentMethod,
};
use contracts::shared::dates::{format_dmy, format_iso};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_invoice::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::invoice_generate_key;
use crate::shared::components::{DateInput, NumberField, SelectField, TextAreaField, TextField};
use crate::shared::date_utils::today_iso;
use crate::shared::export::{open_file, save_file, PDF};
use crate::shared::icons::icon;
use crate::shared::list_utils::format_amount;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;

fn blank_item() -> LineItem {
    LineItem {
        description: String::new(),
        quantity: 1.0,
        price: 0.0,
    }
}

fn blank_form() -> GenerateInvoiceRequest {
    let today = today_iso();
    GenerateInvoiceRequest {
        invoice_date: today.clone(),
        due_date: today,
        items: vec![blank_item()],
        ..GenerateInvoiceRequest::default()
    }
}

/// A handed-over request with its dates converted for the date inputs.
fn from_prefill(state: serde_json::Value) -> Option<GenerateInvoiceRequest> {
    let mut request: GenerateInvoiceRequest = serde_json::from_value(state).ok()?;
    for date in [&mut request.invoice_date, &mut request.due_date] {
        if let Some(iso) = format_iso(date) {
            *date = iso;
        }
    }
    if request.items.is_empty() {
        request.items.push(blank_item());
    }
    Some(request)
}

/// The form as the endpoint wants it.
fn to_wire(form: &GenerateInvoiceRequest) -> GenerateInvoiceRequest {
    let mut request = form.clone();
    request.invoice_date = format_dmy(&form.invoice_date);
    request.due_date = format_dmy(&form.due_date);
    if request.payment_method != PaymentMethod::BankTransfer.code() {
        request.bank_note.clear();
    }
    request
}

#[derive(Clone, Copy, PartialEq)]
enum Delivery {
    Download,
    Preview,
}

#[component]
pub fn InvoiceGenerate(company: Company, on_close: Callback<()>) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let toasts = use_toasts();
    let form = RwSignal::new(blank_form());
    let error = RwSignal::new(None::<String>);
    let generating = RwSignal::new(false);

    // A copy from the history list may arrive while this tab is already open.
    let state_key = invoice_generate_key(company);
    Effect::new(move |_| {
        let pending = ctx.form_states.with(|s| s.contains_key(&state_key));
        if !pending {
            return;
        }
        if let Some(request) = ctx.take_form_state(&state_key).and_then(from_prefill) {
            form.set(request);
            error.set(None);
        }
    });

    let generate = move |delivery: Delivery| {
        let request = to_wire(&form.get_untracked());
        if let Err(message) = request.validate() {
            error.set(Some(message));
            return;
        }
        error.set(None);
        generating.set(true);
        spawn_local(async move {
            let outcome = api::generate_invoice(company, &request).await;
            let _ = generating.try_set(false);
            let delivered = match outcome {
                Ok(binary) => match delivery {
                    Delivery::Download => save_file(&binary, PDF, &request.file_name()),
                    Delivery::Preview => open_file(&binary, PDF),
                },
                Err(e) => {
                    toasts.error(e.user_message("Failed to generate invoice"));
                    return;
                }
            };
            match delivered {
                Ok(()) => toasts.success("Invoice generated"),
                Err(e) => {
                    log::error!("invoice delivery failed: {}", e);
                    toasts.error("Invoice was generated but could not be opened");
                }
            }
        });
    };

    let payment_options = Signal::derive(|| {
        [PaymentMethod::PayPal, PaymentMethod::BankTransfer]
            .into_iter()
            .map(|m| (m.code().to_string(), m.label().to_string()))
            .collect::<Vec<_>>()
    });
    let is_bank_transfer =
        move || form.with(|f| f.payment_method == PaymentMethod::BankTransfer.code());

    let item_count = Memo::new(move |_| form.with(|f| f.items.len()));

    let text = move |get: fn(&GenerateInvoiceRequest) -> &String| {
        Signal::derive(move || form.with(|f| get(f).clone()))
    };

    view! {
        <PageFrame page_id="invoice--generate" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{format!("New {} invoice", company.label())}</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| generate(Delivery::Download)
                        disabled=generating
                    >
                        {icon("download")}
                        {move || if generating.get() { " Generating..." } else { " Download PDF" }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| generate(Delivery::Preview)
                        disabled=generating
                    >
                        {icon("eye")}
                        " Preview"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            form.set(blank_form());
                            error.set(None);
                        }
                    >
                        {icon("refresh")}
                        " Clear"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Close"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="details-form">
                    <h3 class="form__section-title">"Bill to"</h3>
                    <div class="form__grid">
                        <TextField
                            label="Client name"
                            id="invoice-client"
                            required=true
                            value=text(|f| &f.bill_to_name)
                            on_input=move |v| form.update(|f| f.bill_to_name = v)
                        />
                        <TextField
                            label="Email"
                            id="invoice-email"
                            input_type="email"
                            value=text(|f| &f.bill_to_email)
                            on_input=move |v| form.update(|f| f.bill_to_email = v)
                        />
                        <TextField
                            label="Phone"
                            id="invoice-phone"
                            input_type="tel"
                            value=text(|f| &f.bill_to_phone)
                            on_input=move |v| form.update(|f| f.bill_to_phone = v)
                        />
                        <TextField
                            label="City"
                            id="invoice-city"
                            value=text(|f| &f.bill_to_city)
                            on_input=move |v| form.update(|f| f.bill_to_city = v)
                        />
                    </div>
                    <TextAreaField
                        label="Address"
                        id="invoice-address"
                        rows=2
                        value=text(|f| &f.bill_to_address)
                        on_input=move |v| form.update(|f| f.bill_to_address = v)
                    />

                    <h3 class="form__section-title">"Terms"</h3>
                    <div class="form__grid">
                        <div class="form__group">
                            <label class="form__label" for="invoice-date">"Invoice date"</label>
                            <DateInput
                                id="invoice-date"
                                value=text(|f| &f.invoice_date)
                                on_change=move |v| form.update(|f| f.invoice_date = v)
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="invoice-due">"Due date"</label>
                            <DateInput
                                id="invoice-due"
                                value=text(|f| &f.due_date)
                                on_change=move |v| form.update(|f| f.due_date = v)
                            />
                        </div>
                        <SelectField
                            label="Payment method"
                            id="invoice-payment"
                            options=payment_options
                            value=Signal::derive(move || form.with(|f| f.payment_method.to_string()))
                            on_change=move |v: String| {
                                let code = v.parse::<f64>().ok();
                                form.update(|f| f.payment_method = PaymentMethod::from_code(code).code());
                            }
                        />
                    </div>
                    <Show when=is_bank_transfer>
                        <TextAreaField
                            label="Bank note"
                            id="invoice-bank-note"
                            rows=2
                            placeholder="Account details printed on the invoice"
                            value=text(|f| &f.bank_note)
                            on_input=move |v| form.update(|f| f.bank_note = v)
                        />
                    </Show>

                    <h3 class="form__section-title">"Items"</h3>
                    <div class="invoice-items">
                        {move || {
                            (0..item_count.get())
                                .map(|index| view! { <LineItemRow form=form index=index /> })
                                .collect_view()
                        }}
                        <div class="invoice-items__footer">
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| form.update(|f| f.items.push(blank_item()))
                            >
                                {icon("plus")}
                                " Add item"
                            </Button>
                            <span class="invoice-items__total">
                                "Total: "
                                {move || format_amount(form.with(|f| f.total()))}
                            </span>
                        </div>
                    </div>

                    <TextAreaField
                        label="Notes"
                        id="invoice-notes"
                        value=text(|f| &f.notes)
                        on_input=move |v| form.update(|f| f.notes = v)
                    />
                </div>
            </div>
        </PageFrame>
    }
}

#[component]
fn LineItemRow(form: RwSignal<GenerateInvoiceRequest>, index: usize) -> impl IntoView {
    let item = move || form.with(|f| f.items.get(index).cloned().unwrap_or_default());
    let update = move |change: &dyn Fn(&mut LineItem)| {
        form.update(|f| {
            if let Some(item) = f.items.get_mut(index) {
                change(item);
            }
        })
    };

    view! {
        <div class="invoice-items__row">
            <div class="invoice-items__description">
                <TextField
                    label="Description"
                    value=Signal::derive(move || item().description)
                    on_input=move |v| update(&|i| i.description = v.clone())
                />
            </div>
            <NumberField
                label="Qty"
                value=Signal::derive(move || item().quantity)
                on_input=move |v| update(&|i| i.quantity = v)
            />
            <NumberField
                label="Price"
                value=Signal::derive(move || item().price)
                on_input=move |v| update(&|i| i.price = v)
            />
            <div class="invoice-items__amount">{move || format_amount(item().amount())}</div>
            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Subtle
                disabled=Signal::derive(move || form.with(|f| f.items.len() <= 1))
                on_click=move |_| {
                    form.update(|f| {
                        if f.items.len() > 1 && index < f.items.len() {
                            f.items.remove(index);
                        }
                    })
                }
            >
                {icon("trash")}
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefill_converts_dates_for_inputs() {
        let state = json!({
            "bill_to_name": "Acme",
            "bill_to_address": "1 Road",
            "bill_to_city": "",
            "bill_to_email": "",
            "bill_to_phone": "",
            "invoice_date": "30-05-2025",
            "due_date": "14-06-2025",
            "payment_method": 1,
            "bank_Note": "",
            "items": [],
            "notes": ""
        });
        let form = from_prefill(state).unwrap();
        assert_eq!(form.invoice_date, "2025-05-30");
        assert_eq!(form.due_date, "2025-06-14");
        assert_eq!(form.items, vec![blank_item()]);
        assert!(from_prefill(json!("garbage")).is_none());
    }

    #[test]
    fn wire_form_uses_day_first_dates_and_drops_unused_note() {
        let form = GenerateInvoiceRequest {
            invoice_date: "2025-05-30".into(),
            due_date: "2025-06-14".into(),
            payment_method: PaymentMethod::PayPal.code(),
            bank_note: "IBAN ...".into(),
            ..GenerateInvoiceRequest::default()
        };
        let wire = to_wire(&form);
        assert_eq!(wire.invoice_date, "30-05-2025");
        assert_eq!(wire.due_date, "14-06-2025");
        assert!(wire.bank_note.is_empty());

        let bank = GenerateInvoiceRequest {
            payment_method: PaymentMethod::BankTransfer.code(),
            ..form
        };
        assert_eq!(to_wire(&bank).bank_note, "IBAN ...");
    }
}
