use super::view_model::{initial_form, KpiDetailsViewModel};
use contracts::domain::a003_kpi::aggregate::KpiForm;
use contracts::system::access::ActionId;
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_employee::ui::picker::EmployeeSelect;
use crate::shared::components::{DateInput, TextAreaField, TextField};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::{can, use_session};

type Getter = fn(&KpiForm) -> &String;
type Setter = fn(&mut KpiForm, String);

fn text_of(vm: KpiDetailsViewModel, get: Getter) -> Signal<String> {
    Signal::derive(move || vm.form.with(|f| get(f).clone()))
}

fn set_text(vm: KpiDetailsViewModel, set: Setter) -> impl Fn(String) + Copy {
    move |value| vm.form.update(|f| set(f, value))
}

#[component]
pub fn KpiDetails(kpi_id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let manages = can(ActionId::KpiManage).get_untracked();
    let own_employee = use_session().with_untracked(|s| s.employee_id.clone());

    let vm = KpiDetailsViewModel::new(initial_form(own_employee.as_deref(), manages));
    vm.load_if_needed(kpi_id);

    let busy = Signal::derive(move || vm.loading.get() || vm.submitting.get());
    // Only the project name and remark can change once a KPI exists.
    let locked = Signal::derive(move || busy.get() || vm.is_edit_mode());

    view! {
        <PageFrame page_id="kpi--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if vm.is_edit_mode() { "Edit KPI" } else { "New KPI" }}
                    </h1>
                    {move || vm.loading.get().then(|| view! { <Badge>"Loading..."</Badge> })}
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.submit_command(toasts, on_close)
                        disabled=Signal::derive(move || busy.get() || !vm.is_form_valid())
                    >
                        {icon("save")}
                        {move || match (vm.submitting.get(), vm.is_edit_mode()) {
                            (true, _) => " Saving...",
                            (false, true) => " Save",
                            (false, false) => " Add KPI",
                        }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Cancel"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {(!manages && own_employee.is_none()).then(|| view! {
                    <div class="alert alert--warning">
                        "Your account is not linked to an employee record, so new KPIs cannot be filed."
                    </div>
                })}

                <div class="details-form">
                    <h3 class="form__section-title">"Assignment"</h3>
                    <div class="form__grid">
                        {if manages {
                            view! {
                                <EmployeeSelect
                                    id="kpi-employee"
                                    value=text_of(vm, |f| &f.employee_id)
                                    on_change=set_text(vm, |f, v| f.employee_id = v)
                                    disabled=locked
                                />
                            }.into_any()
                        } else {
                            view! {
                                <TextField
                                    label="Employee"
                                    id="kpi-employee"
                                    value=text_of(vm, |f| &f.employee_id)
                                    on_input=|_| {}
                                    disabled=true
                                />
                            }.into_any()
                        }}
                        <TextField
                            label="Project"
                            id="kpi-project"
                            required=true
                            value=text_of(vm, |f| &f.project_name)
                            on_input=set_text(vm, |f, v| f.project_name = v)
                            disabled=busy
                        />
                    </div>

                    <h3 class="form__section-title">"Schedule"</h3>
                    <div class="form__grid">
                        <div class="form__group">
                            <label class="form__label" for="kpi-start">"Start date"</label>
                            <DateInput
                                id="kpi-start"
                                value=text_of(vm, |f| &f.startdate)
                                on_change=set_text(vm, |f, v| f.startdate = v)
                                disabled=locked
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="kpi-deadline">"Deadline"</label>
                            <DateInput
                                id="kpi-deadline"
                                value=text_of(vm, |f| &f.deadline)
                                on_change=set_text(vm, |f, v| f.deadline = v)
                                disabled=locked
                            />
                        </div>
                    </div>

                    <h3 class="form__section-title">"Notes"</h3>
                    <TextAreaField
                        label="Remark"
                        id="kpi-remark"
                        value=text_of(vm, |f| &f.remark)
                        on_input=set_text(vm, |f, v| f.remark = v)
                    />
                </div>
            </div>
        </PageFrame>
    }
}
