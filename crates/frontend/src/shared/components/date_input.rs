use leptos::prelude::*;

/// Native date picker; the value is `YYYY-MM-DD` both ways.
#[component]
pub fn DateInput(
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(optional)] id: &'static str,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="form__input form__input--date"
            id=id
            prop:value=value
            disabled=move || disabled.get()
            on:input=move |ev| on_change(event_target_value(&ev))
        />
    }
}
