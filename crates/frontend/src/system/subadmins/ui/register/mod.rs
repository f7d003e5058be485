//! Creates a subadmin account bound to an employee, with chosen capabilities.

use contracts::system::access::capability;
use contracts::system::subadmins::SubadminForm;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_employee::ui::picker::EmployeeSelect;
use crate::shared::components::TextField;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_session;
use crate::system::subadmins::api;

#[component]
pub fn SubadminRegister(on_close: Callback<()>) -> impl IntoView {
    let toasts = use_toasts();
    let session = use_session();
    let form = RwSignal::new(SubadminForm::default());
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let submit = move || {
        if submitting.get_untracked() {
            return;
        }
        let admin_id = session.with_untracked(|s| s.admin_id.clone().unwrap_or_default());
        let request = match form.with_untracked(|f| f.to_request(&admin_id)) {
            Ok(request) => request,
            Err(message) => {
                error.set(Some(message));
                return;
            }
        };
        error.set(None);
        submitting.set(true);
        spawn_local(async move {
            let outcome = api::register_subadmin(&request).await;
            let _ = submitting.try_set(false);
            match outcome {
                Ok(()) => {
                    toasts.success(format!("Subadmin \"{}\" registered", request.username));
                    let _ = form.try_set(SubadminForm::default());
                }
                Err(e) => {
                    let _ = error.try_set(Some(e.user_message("Failed to register subadmin")));
                }
            }
        });
    };

    view! {
        <PageFrame page_id="subadmin--register" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"New subadmin"</h1>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| submit()
                        disabled=submitting
                    >
                        {icon("save")}
                        {move || if submitting.get() { " Registering..." } else { " Register" }}
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
                    <h3 class="form__section-title">"Account"</h3>
                    <div class="form__grid">
                        <EmployeeSelect
                            id="subadmin-employee"
                            value=Signal::derive(move || form.with(|f| f.employee_id.clone()))
                            on_change=move |v| form.update(|f| f.employee_id = v)
                            disabled=submitting
                        />
                        <TextField
                            label="Username"
                            id="subadmin-username"
                            required=true
                            value=Signal::derive(move || form.with(|f| f.username.clone()))
                            on_input=move |v| form.update(|f| f.username = v)
                            disabled=submitting
                        />
                        <TextField
                            label="Password"
                            id="subadmin-password"
                            input_type="password"
                            required=true
                            value=Signal::derive(move || form.with(|f| f.password.clone()))
                            on_input=move |v| form.update(|f| f.password = v)
                            disabled=submitting
                        />
                    </div>

                    <h3 class="form__section-title">"Permissions"</h3>
                    <div class="permission-grid">
                        {capability::ALL
                            .into_iter()
                            .map(|name| {
                                view! {
                                    <label class="permission-grid__item">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || form.with(|f| f.granted.contains(name))
                                            disabled=move || submitting.get()
                                            on:change=move |ev| {
                                                let on = event_target_checked(&ev);
                                                form.update(|f| f.toggle(name, on));
                                            }
                                        />
                                        <span>{name}</span>
                                    </label>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
