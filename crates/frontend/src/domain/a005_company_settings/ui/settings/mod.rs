//! Per-company invoice header settings and logo.

use contracts::domain::a002_invoice::aggregate::Company;
use contracts::domain::a005_company_settings::aggregate::CompanySettings;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen::JsCast;

use crate::domain::a005_company_settings::api;
use crate::shared::components::{SelectField, TextAreaField, TextField};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toasts;

fn company_options() -> Vec<(String, String)> {
    Company::ALL
        .into_iter()
        .map(|c| (c.key().to_string(), c.label().to_string()))
        .collect()
}

type Getter = fn(&CompanySettings) -> &String;
type Setter = fn(&mut CompanySettings, String);

fn text_of(settings: RwSignal<CompanySettings>, get: Getter) -> Signal<String> {
    Signal::derive(move || settings.with(|s| get(s).clone()))
}

fn set_text(settings: RwSignal<CompanySettings>, set: Setter) -> impl Fn(String) + Copy {
    move |value| settings.update(|s| set(s, value))
}

fn selected_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
}

#[component]
pub fn CompanySettingsPage() -> impl IntoView {
    let toasts = use_toasts();
    let company = RwSignal::new(Company::ALL[0]);
    let settings = RwSignal::new(CompanySettings::default());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let uploading = RwSignal::new(false);
    // Replies for a company that is no longer selected are dropped.
    let generation = StoredValue::new(0u64);

    Effect::new(move |_| {
        let selected = company.get();
        let ticket = generation.with_value(|g| g + 1);
        generation.set_value(ticket);
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            let outcome = api::fetch_settings(selected).await;
            if generation.try_get_value() != Some(ticket) {
                return;
            }
            match outcome {
                Ok(loaded) => {
                    let _ = settings.try_set(loaded);
                }
                Err(e) => {
                    log::warn!("settings load for {} failed: {}", selected.key(), e);
                    let _ = settings.try_set(CompanySettings::default());
                    let _ = error.try_set(Some(e.user_message("Failed to load settings")));
                }
            }
            let _ = loading.try_set(false);
        });
    });

    let save = move || {
        let current = settings.get_untracked();
        if let Err(message) = current.validate() {
            error.set(Some(message));
            return;
        }
        let selected = company.get_untracked();
        error.set(None);
        saving.set(true);
        spawn_local(async move {
            let outcome = api::save_settings(selected, &current).await;
            let _ = saving.try_set(false);
            match outcome {
                Ok(()) => toasts.success(format!("Settings saved for {}", selected.label())),
                Err(e) => {
                    let _ = error.try_set(Some(e.user_message("Failed to save settings")));
                }
            }
        });
    };

    let upload = move |ev: web_sys::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        let selected = company.get_untracked();
        uploading.set(true);
        spawn_local(async move {
            let outcome = api::upload_logo(selected, file).await;
            let _ = uploading.try_set(false);
            match outcome {
                Ok(url) => {
                    if company.try_get_untracked() == Some(selected) {
                        let _ = settings.try_update(|s| s.logo_url = url);
                    }
                    toasts.success("Logo uploaded");
                }
                Err(e) => toasts.error(e.user_message("Failed to upload logo")),
            }
        });
    };

    let busy = Signal::derive(move || loading.get() || saving.get() || uploading.get());

    view! {
        <PageFrame page_id="settings--company" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Company settings"</h1>
                    {move || loading.get().then(|| view! { <Badge>"Loading..."</Badge> })}
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| save()
                        disabled=busy
                    >
                        {icon("save")}
                        {move || if saving.get() { " Saving..." } else { " Save" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="details-form">
                    <div class="form__grid">
                        <SelectField
                            label="Company"
                            id="settings-company"
                            options=Signal::stored(company_options())
                            value=Signal::derive(move || company.get().key().to_string())
                            on_change=move |key: String| {
                                if let Some(next) = Company::from_key(&key) {
                                    company.set(next);
                                }
                            }
                            disabled=Signal::derive(move || saving.get() || uploading.get())
                        />
                    </div>

                    <h3 class="form__section-title">"Invoice header"</h3>
                    <div class="form__grid">
                        <TextField
                            label="Company name"
                            id="settings-name"
                            required=true
                            value=text_of(settings, |s| &s.company_name)
                            on_input=set_text(settings, |s, v| s.company_name = v)
                            disabled=busy
                        />
                        <TextField
                            label="Tagline"
                            id="settings-tagline"
                            value=text_of(settings, |s| &s.tagline)
                            on_input=set_text(settings, |s, v| s.tagline = v)
                            disabled=busy
                        />
                        <TextField
                            label="Email"
                            id="settings-email"
                            input_type="email"
                            value=text_of(settings, |s| &s.email)
                            on_input=set_text(settings, |s, v| s.email = v)
                            disabled=busy
                        />
                        <TextField
                            label="Phone"
                            id="settings-phone"
                            value=text_of(settings, |s| &s.phone)
                            on_input=set_text(settings, |s, v| s.phone = v)
                            disabled=busy
                        />
                        <TextField
                            label="Website"
                            id="settings-website"
                            value=text_of(settings, |s| &s.website)
                            on_input=set_text(settings, |s, v| s.website = v)
                            disabled=busy
                        />
                    </div>
                    <TextAreaField
                        label="Address"
                        id="settings-address"
                        value=text_of(settings, |s| &s.address)
                        on_input=set_text(settings, |s, v| s.address = v)
                    />

                    <h3 class="form__section-title">"Logo"</h3>
                    <div class="form__group">
                        <label class="form__label" for="settings-logo">
                            {move || if uploading.get() { "Uploading..." } else { "Upload image" }}
                        </label>
                        <input
                            id="settings-logo"
                            type="file"
                            accept="image/*"
                            class="form__input"
                            disabled=move || busy.get()
                            on:change=upload
                        />
                    </div>
                    {move || {
                        let url = settings.with(|s| s.logo_url.clone());
                        (!url.is_empty()).then(|| view! {
                            <img class="settings__logo-preview" src=url alt="Logo preview" style="max-height: 96px;" />
                        })
                    }}
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_every_company_once() {
        let options = company_options();
        assert_eq!(options.len(), Company::ALL.len());
        assert!(options.iter().all(|(key, _)| Company::from_key(key).is_some()));
    }
}
