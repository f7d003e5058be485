use leptos::prelude::*;

/// Labelled text input bound to a form signal.
#[component]
pub fn TextField(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_input: impl Fn(String) + 'static,
    #[prop(optional)] id: &'static str,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label" for=id>
                {label}
                {required.then_some(" *")}
            </label>
            <input
                class="form__input"
                type=input_type.unwrap_or("text")
                id=id
                placeholder=placeholder
                prop:value=value
                disabled=move || disabled.get()
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </div>
    }
}

/// Labelled multi-line input.
#[component]
pub fn TextAreaField(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_input: impl Fn(String) + 'static,
    #[prop(optional)] id: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(default = 3)] rows: u32,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label" for=id>{label}</label>
            <textarea
                class="form__input"
                id=id
                rows=rows.to_string()
                placeholder=placeholder
                prop:value=value
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </div>
    }
}

/// Text the number input should show for `value`, keeping what the user typed
/// while it still means the same number ("12." stays "12.").
pub fn number_text(typed: &str, value: f64) -> Option<String> {
    let same = typed.trim().parse::<f64>().map(|t| t == value).unwrap_or(false)
        || (typed.trim().is_empty() && value == 0.0);
    (!same).then(|| {
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            value.to_string()
        }
    })
}

/// Labelled numeric input; blank or unparsable text counts as zero.
#[component]
pub fn NumberField(
    label: &'static str,
    #[prop(into)] value: Signal<f64>,
    on_input: impl Fn(f64) + 'static,
    #[prop(optional)] id: &'static str,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let text = RwSignal::new(String::new());
    Effect::new(move |_| {
        let current = value.get();
        if let Some(shown) = text.with_untracked(|t| number_text(t, current)) {
            text.set(shown);
        }
    });

    view! {
        <div class="form__group">
            <label class="form__label" for=id>{label}</label>
            <input
                class="form__input"
                type="number"
                step="any"
                id=id
                prop:value=move || text.get()
                disabled=move || disabled.get()
                on:input=move |ev| {
                    let raw = event_target_value(&ev);
                    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
                    text.set(raw);
                    on_input(parsed);
                }
            />
        </div>
    }
}

/// Labelled `<select>` over `(value, label)` pairs.
#[component]
pub fn SelectField(
    label: &'static str,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
    #[prop(optional)] id: &'static str,
    /// Shown as an empty first option when set.
    #[prop(optional)]
    placeholder: Option<&'static str>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label" for=id>{label}</label>
            <select
                class="form__select"
                id=id
                prop:value=value
                disabled=move || disabled.get()
                on:change=move |ev| on_change(event_target_value(&ev))
            >
                {placeholder.map(|p| view! { <option value="">{p}</option> })}
                {move || {
                    let selected = value.get();
                    options
                        .get()
                        .into_iter()
                        .map(|(v, l)| {
                            let is_selected = v == selected;
                            view! { <option value=v selected=is_selected>{l}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_text_keeps_equivalent_typing() {
        assert_eq!(number_text("12.", 12.0), None);
        assert_eq!(number_text("", 0.0), None);
        assert_eq!(number_text("0.50", 0.5), None);
        assert_eq!(number_text("", 1500.0), Some("1500".into()));
        assert_eq!(number_text("3", 2.25), Some("2.25".into()));
    }
}
