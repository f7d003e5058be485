use super::view_model::EmployeeDetailsViewModel;
use contracts::domain::a001_employee::aggregate::EmployeeForm;
use leptos::prelude::*;
use thaw::*;

use crate::shared::components::{DateInput, NumberField, TextAreaField, TextField};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::toast::use_toasts;

type Getter = fn(&EmployeeForm) -> &String;
type Setter = fn(&mut EmployeeForm, String);

fn text_of(vm: EmployeeDetailsViewModel, get: Getter) -> Signal<String> {
    Signal::derive(move || vm.form.with(|f| get(f).clone()))
}

fn set_text(vm: EmployeeDetailsViewModel, set: Setter) -> impl Fn(String) + Copy {
    move |value| vm.form.update(|f| set(f, value))
}

#[component]
pub fn EmployeeDetails(employee_id: Option<String>, on_close: Callback<()>) -> impl IntoView {
    let vm = EmployeeDetailsViewModel::new();
    let toasts = use_toasts();
    vm.load_if_needed(employee_id);

    let busy = Signal::derive(move || vm.loading.get() || vm.saving.get());

    view! {
        <PageFrame page_id="employee--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">
                        {move || if vm.is_edit_mode() { "Edit employee" } else { "New employee" }}
                    </h1>
                    {move || vm.loading.get().then(|| view! { <Badge>"Loading..."</Badge> })}
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| vm.save_command(toasts, on_close)
                        disabled=Signal::derive(move || busy.get() || !vm.is_form_valid())
                    >
                        {icon("save")}
                        {move || if vm.is_edit_mode() { " Save" } else { " Create" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        {icon("x")}
                        " Cancel"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="details-form">
                    <h3 class="form__section-title">"Personal"</h3>
                    <div class="form__grid">
                        <TextField
                            label="Name"
                            id="employee-name"
                            required=true
                            value=text_of(vm, |f| &f.name)
                            on_input=set_text(vm, |f, v| f.name = v)
                            disabled=busy
                        />
                        <TextField
                            label="Email"
                            id="employee-email"
                            input_type="email"
                            required=true
                            value=text_of(vm, |f| &f.email)
                            on_input=set_text(vm, |f, v| f.email = v)
                            disabled=busy
                        />
                        <TextField
                            label="Phone"
                            id="employee-phone"
                            input_type="tel"
                            value=text_of(vm, |f| &f.phone)
                            on_input=set_text(vm, |f, v| f.phone = v)
                            disabled=busy
                        />
                        <div class="form__group">
                            <label class="form__label" for="employee-dob">"Date of birth"</label>
                            <DateInput
                                id="employee-dob"
                                value=text_of(vm, |f| &f.dob)
                                on_change=set_text(vm, |f, v| f.dob = v)
                                disabled=busy
                            />
                        </div>
                        <TextField
                            label="Aadhaar number"
                            id="employee-aadhaar"
                            value=text_of(vm, |f| &f.adharnumber)
                            on_input=set_text(vm, |f, v| f.adharnumber = v)
                            disabled=busy
                        />
                        <TextField
                            label="PAN"
                            id="employee-pan"
                            value=text_of(vm, |f| &f.pan_number)
                            on_input=set_text(vm, |f, v| f.pan_number = v.to_uppercase())
                            disabled=busy
                        />
                    </div>

                    <h3 class="form__section-title">"Employment"</h3>
                    <div class="form__grid">
                        <TextField
                            label="Department"
                            id="employee-department"
                            value=text_of(vm, |f| &f.department)
                            on_input=set_text(vm, |f, v| f.department = v)
                            disabled=busy
                        />
                        <TextField
                            label="Designation"
                            id="employee-designation"
                            value=text_of(vm, |f| &f.designation)
                            on_input=set_text(vm, |f, v| f.designation = v)
                            disabled=busy
                        />
                        <div class="form__group">
                            <label class="form__label" for="employee-joined">"Date of joining"</label>
                            <DateInput
                                id="employee-joined"
                                value=text_of(vm, |f| &f.date_of_joining)
                                on_change=set_text(vm, |f, v| f.date_of_joining = v)
                                disabled=busy
                            />
                        </div>
                        <NumberField
                            label="Annual salary"
                            id="employee-annual"
                            value=Signal::derive(move || vm.form.with(|f| f.annual_salary))
                            on_input=move |v| vm.form.update(|f| f.annual_salary = v)
                            disabled=busy
                        />
                        <NumberField
                            label="Base salary (monthly)"
                            id="employee-base"
                            value=Signal::derive(move || vm.form.with(|f| f.base_salary))
                            on_input=move |v| vm.form.update(|f| f.base_salary = v)
                            disabled=busy
                        />
                    </div>

                    <h3 class="form__section-title">"Bank details"</h3>
                    <div class="form__grid">
                        <TextField
                            label="Account number"
                            id="employee-account"
                            value=text_of(vm, |f| &f.bank_details.account_number)
                            on_input=set_text(vm, |f, v| f.bank_details.account_number = v)
                            disabled=busy
                        />
                        <TextField
                            label="IFSC"
                            id="employee-ifsc"
                            value=text_of(vm, |f| &f.bank_details.ifsc)
                            on_input=set_text(vm, |f, v| f.bank_details.ifsc = v.to_uppercase())
                            disabled=busy
                        />
                        <TextField
                            label="Bank name"
                            id="employee-bank"
                            value=text_of(vm, |f| &f.bank_details.bank_name)
                            on_input=set_text(vm, |f, v| f.bank_details.bank_name = v)
                            disabled=busy
                        />
                    </div>

                    <h3 class="form__section-title">"Address"</h3>
                    <TextAreaField
                        label="Street"
                        id="employee-line1"
                        rows=2
                        value=text_of(vm, |f| &f.address.line1)
                        on_input=set_text(vm, |f, v| f.address.line1 = v)
                    />
                    <div class="form__grid">
                        <TextField
                            label="City"
                            id="employee-city"
                            value=text_of(vm, |f| &f.address.city)
                            on_input=set_text(vm, |f, v| f.address.city = v)
                            disabled=busy
                        />
                        <TextField
                            label="State"
                            id="employee-state"
                            value=text_of(vm, |f| &f.address.state)
                            on_input=set_text(vm, |f, v| f.address.state = v)
                            disabled=busy
                        />
                        <TextField
                            label="PIN"
                            id="employee-pin"
                            value=text_of(vm, |f| &f.address.pin)
                            on_input=set_text(vm, |f, v| f.address.pin = v)
                            disabled=busy
                        />
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
