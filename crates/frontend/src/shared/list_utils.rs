/// Table header helpers shared by the list pages.
use leptos::prelude::*;

use crate::shared::list_controller::ListController;

/// Sort arrow for a column header.
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Header label with a live sort indicator for a controller-driven table.
#[component]
pub fn SortLabel<T>(
    controller: RwSignal<ListController<T>>,
    field: &'static str,
    label: &'static str,
) -> impl IntoView
where
    T: Send + Sync + 'static,
{
    view! {
        {label}
        <span class=move || controller.with(|c| get_sort_class(&c.query().sort_field, field))>
            {move || controller.with(|c| {
                get_sort_indicator(&c.query().sort_field, field, c.query().sort_ascending)
            })}
        </span>
    }
}

/// `12 345.50`
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_indicator() {
        assert_eq!(get_sort_indicator("name", "name", true), " ▲");
        assert_eq!(get_sort_indicator("name", "name", false), " ▼");
        assert_eq!(get_sort_indicator("email", "name", true), " ⇅");
        assert!(get_sort_class("name", "name").ends_with("--active"));
    }

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(12345.5), "12 345.50");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-1000.0), "-1 000.00");
        assert_eq!(format_amount(999.999), "1 000.00");
    }
}
