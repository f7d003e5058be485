//! Salary slip generation for one employee and month.

use contracts::domain::a004_payslip::aggregate::{slip_file_name, PayslipForm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_employee::ui::picker::EmployeeSelect;
use crate::domain::a004_payslip::api;
use crate::shared::components::{SelectField, TextField};
use crate::shared::date_utils::{previous_month, today, MONTH_NAMES};
use crate::shared::export::{save_file, PDF};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;

/// Years offered in the picker, newest first.
const YEAR_SPAN: i32 = 5;

/// Slips are usually issued for the month that just ended.
fn default_form(today: chrono::NaiveDate) -> PayslipForm {
    let (month, year) = previous_month(today);
    PayslipForm {
        month: format!("{month:02}"),
        year: year.to_string(),
        ..PayslipForm::default()
    }
}

fn month_options() -> Vec<(String, String)> {
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (format!("{:02}", i + 1), name.to_string()))
        .collect()
}

fn year_options(current: i32) -> Vec<(String, String)> {
    (0..YEAR_SPAN)
        .map(|offset| {
            let year = (current - offset).to_string();
            (year.clone(), year)
        })
        .collect()
}

type Getter = fn(&PayslipForm) -> &String;
type Setter = fn(&mut PayslipForm, String);

fn text_of(form: RwSignal<PayslipForm>, get: Getter) -> Signal<String> {
    Signal::derive(move || form.with(|f| get(f).clone()))
}

fn set_text(form: RwSignal<PayslipForm>, set: Setter) -> impl Fn(String) + Copy {
    move |value| form.update(|f| set(f, value))
}

#[component]
pub fn PayslipGenerate() -> impl IntoView {
    let toasts = use_toasts();
    let issued_on = today();
    let form = RwSignal::new(default_form(issued_on));
    let error = RwSignal::new(None::<String>);
    let generating = RwSignal::new(false);

    let generate = move || {
        if generating.get_untracked() {
            return;
        }
        let current = form.get_untracked();
        let request = match current.to_request(today()) {
            Ok(request) => request,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        error.set(None);
        generating.set(true);
        spawn_local(async move {
            let outcome = api::generate_slip(&request).await;
            let _ = generating.try_set(false);
            match outcome {
                Ok(binary) => {
                    let file_name = slip_file_name(&request.employee_id);
                    match save_file(&binary, PDF, &file_name) {
                        Ok(()) => toasts.success(format!("Saved {}", file_name)),
                        Err(e) => {
                            log::warn!("payslip download failed: {}", e);
                            toasts.error("The payslip could not be saved");
                        }
                    }
                }
                Err(e) => {
                    let _ = error.try_set(Some(e.user_message("Failed to generate payslip")));
                }
            }
        });
    };

    let allowance = move |label: &'static str, id: &'static str, get: Getter, set: Setter| {
        view! {
            <TextField
                label=label
                id=id
                input_type="number"
                placeholder="0"
                value=text_of(form, get)
                on_input=set_text(form, set)
                disabled=generating
            />
        }
    };

    view! {
        <PageFrame page_id="payslip--generate" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Salary slip"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| generate()
                        disabled=generating
                    >
                        {icon("download")}
                        {move || if generating.get() { " Generating..." } else { " Generate PDF" }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            form.set(default_form(today()));
                            error.set(None);
                        }
                    >
                        {icon("x")}
                        " Clear"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="details-form">
                    <h3 class="form__section-title">"Period"</h3>
                    <div class="form__grid">
                        <EmployeeSelect
                            id="payslip-employee"
                            value=text_of(form, |f| &f.employee_id)
                            on_change=set_text(form, |f, v| f.employee_id = v)
                            disabled=generating
                        />
                        <SelectField
                            label="Month"
                            id="payslip-month"
                            options=Signal::stored(month_options())
                            value=text_of(form, |f| &f.month)
                            on_change=set_text(form, |f, v| f.month = v)
                            disabled=generating
                        />
                        <SelectField
                            label="Year"
                            id="payslip-year"
                            options=Signal::stored(year_options(chrono::Datelike::year(&issued_on)))
                            value=text_of(form, |f| &f.year)
                            on_change=set_text(form, |f, v| f.year = v)
                            disabled=generating
                        />
                    </div>

                    <h3 class="form__section-title">"Allowances"</h3>
                    <div class="form__grid">
                        {allowance("House rent", "payslip-hra", |f| &f.hra, |f, v| f.hra = v)}
                        {allowance("Transport", "payslip-transport", |f| &f.transport, |f, v| f.transport = v)}
                        {allowance("Medical", "payslip-medical", |f| &f.medical, |f, v| f.medical = v)}
                        {allowance("Overtime", "payslip-overtime", |f| &f.overtime, |f, v| f.overtime = v)}
                        {allowance("Bonus", "payslip-bonus", |f| &f.bonus, |f, v| f.bonus = v)}
                        {allowance("Others", "payslip-others", |f| &f.others, |f, v| f.others = v)}
                    </div>

                    <h3 class="form__section-title">"Attendance"</h3>
                    <div class="form__grid">
                        {allowance("Loss of pay", "payslip-lop", |f| &f.lop, |f, v| f.lop = v)}
                        {allowance("Paid days", "payslip-paid-days", |f| &f.paid_days, |f, v| f.paid_days = v)}
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn defaults_to_previous_month() {
        let form = default_form(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!((form.month.as_str(), form.year.as_str()), ("12", "2024"));
    }

    #[test]
    fn pickers_cover_the_calendar() {
        let months = month_options();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], ("01".to_string(), "January".to_string()));
        let years = year_options(2025);
        assert_eq!(years.first().map(|y| y.0.as_str()), Some("2025"));
        assert_eq!(years.len(), YEAR_SPAN as usize);
    }
}
