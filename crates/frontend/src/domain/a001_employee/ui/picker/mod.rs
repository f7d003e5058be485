//! Employee pickers for forms and filters.

use contracts::domain::a001_employee::aggregate::Employee;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_employee::api;
use crate::shared::components::SelectField;
use crate::shared::icons::icon;

/// `(employee_id, "Name (id)")`, sorted by name.
pub fn employee_options(employees: &[Employee]) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = employees
        .iter()
        .filter(|e| !e.employee_id.is_empty())
        .map(|e| {
            let label = if e.name.trim().is_empty() {
                e.employee_id.clone()
            } else {
                format!("{} ({})", e.name.trim(), e.employee_id)
            };
            (e.employee_id.clone(), label)
        })
        .collect();
    options.sort_by_key(|(_, label)| label.to_lowercase());
    options
}

/// Loads every employee once; empty until the request completes.
pub fn use_employee_options() -> RwSignal<Vec<(String, String)>> {
    let options = RwSignal::new(Vec::new());
    spawn_local(async move {
        match api::fetch_all_employees().await {
            Ok(employees) => {
                let _ = options.try_set(employee_options(&employees));
            }
            Err(e) => log::warn!("employee options failed: {}", e),
        }
    });
    options
}

#[component]
pub fn EmployeeSelect(
    #[prop(default = "Employee")] label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
    #[prop(optional)] id: &'static str,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let options = use_employee_options();
    view! {
        <SelectField
            label=label
            id=id
            options=options
            value=value
            on_change=on_change
            placeholder="Select employee"
            disabled=disabled
        />
    }
}

/// Toggles one id in a selection, keeping insertion order.
pub fn toggle_id(selected: &mut Vec<String>, id: &str, checked: bool) {
    let present = selected.iter().position(|s| s == id);
    match (checked, present) {
        (true, None) => selected.push(id.to_string()),
        (false, Some(pos)) => {
            selected.remove(pos);
        }
        _ => {}
    }
}

/// Dropdown of checkboxes; reports the full selection on every change.
#[component]
pub fn EmployeeMultiSelect(
    #[prop(into)] selected: Signal<Vec<String>>,
    on_change: Callback<Vec<String>>,
) -> impl IntoView {
    let options = use_employee_options();
    let open = RwSignal::new(false);

    let caption = move || match selected.with(|s| s.len()) {
        0 => "All employees".to_string(),
        1 => {
            let id = selected.with(|s| s[0].clone());
            options
                .with(|o| o.iter().find(|(v, _)| *v == id).map(|(_, l)| l.clone()))
                .unwrap_or(id)
        }
        n => format!("{} employees", n),
    };

    view! {
        <div class="multi-select">
            <button class="multi-select__toggle" on:click=move |_| open.update(|o| *o = !*o)>
                <span>{caption}</span>
                {icon("chevron-down")}
            </button>
            <Show when=move || open.get()>
                <div class="multi-select__menu">
                    <button
                        class="multi-select__clear"
                        on:click=move |_| on_change.run(Vec::new())
                    >
                        "Clear"
                    </button>
                    <For
                        each=move || options.get()
                        key=|(id, _)| id.clone()
                        children=move |(id, label)| {
                            let id = StoredValue::new(id);
                            let checked = move || id.with_value(|id| selected.with(|s| s.contains(id)));
                            view! {
                                <label class="multi-select__option">
                                    <input
                                        type="checkbox"
                                        prop:checked=checked
                                        on:change=move |ev| {
                                            let on = event_target_checked(&ev);
                                            let mut next = selected.get_untracked();
                                            id.with_value(|id| toggle_id(&mut next, id, on));
                                            on_change.run(next);
                                        }
                                    />
                                    <span>{label}</span>
                                </label>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            employee_id: id.into(),
            name: name.into(),
            ..Employee::default()
        }
    }

    #[test]
    fn options_are_sorted_and_skip_missing_ids() {
        let options = employee_options(&[
            employee("E2", "meera"),
            employee("", "Ghost"),
            employee("E1", "Arjun"),
            employee("E3", " "),
        ]);
        assert_eq!(
            options,
            vec![
                ("E1".to_string(), "Arjun (E1)".to_string()),
                ("E3".to_string(), "E3".to_string()),
                ("E2".to_string(), "meera (E2)".to_string()),
            ]
        );
    }

    #[test]
    fn toggle_keeps_order_and_ignores_repeats() {
        let mut selected = vec!["E1".to_string()];
        toggle_id(&mut selected, "E2", true);
        toggle_id(&mut selected, "E2", true);
        assert_eq!(selected, vec!["E1", "E2"]);
        toggle_id(&mut selected, "E1", false);
        toggle_id(&mut selected, "E9", false);
        assert_eq!(selected, vec!["E2"]);
    }
}
