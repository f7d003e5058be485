use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

use crate::layout::tabs::tab_label_for_key;

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    pub form_states: RwSignal<HashMap<String, serde_json::Value>>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
            form_states: RwSignal::new(HashMap::new()),
        }
    }

    /// Takes the state handed to a tab by whoever opened it.
    pub fn take_form_state(&self, form_key: &str) -> Option<serde_json::Value> {
        let mut taken = None;
        self.form_states.update(|states| taken = states.remove(form_key));
        taken
    }

    pub fn set_form_state(&self, form_key: String, state: serde_json::Value) {
        self.form_states.update(|states| {
            states.insert(form_key, state);
        });
    }

    /// Restores `?active=` on load and mirrors the active tab back into the URL.
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        if let Some(active_key) = params.get("active").cloned() {
            self.open_tab(&active_key, &tab_label_for_key(&active_key));
        } else {
            self.open_tab("dashboard", &tab_label_for_key("dashboard"));
        }

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let query_string =
                serde_qs::to_string(&HashMap::from([("active".to_string(), active_key)]))
                    .unwrap_or_default();
            let new_url = format!("?{}", query_string);

            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search != new_url {
                if let Some(w) = window() {
                    if let Ok(history) = w.history() {
                        let _ = history.replace_state_with_url(
                            &wasm_bindgen::JsValue::NULL,
                            "",
                            Some(&new_url),
                        );
                    }
                }
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        log::debug!("open_tab: key='{}', title='{}'", key, title);
        self.opened.update(|tabs| {
            insert_tab(tabs, key, title);
        });
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn close_tab(&self, key: &str) {
        log::debug!("close_tab: key='{}'", key);
        let mut next = None;
        let active = self.active.get_untracked();
        self.opened.update(|tabs| {
            next = remove_tab(tabs, key, active.as_deref());
        });
        if let Some(next_active) = next {
            self.active.set(next_active);
        }
    }

    /// Drops every tab; used at logout.
    pub fn reset(&self) {
        self.opened.set(vec![]);
        self.active.set(None);
        self.form_states.set(HashMap::new());
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Appends the tab unless a tab with that key is already open.
fn insert_tab(tabs: &mut Vec<Tab>, key: &str, title: &str) -> bool {
    if tabs.iter().any(|tab| tab.key == key) {
        return false;
    }
    tabs.push(Tab {
        key: key.to_string(),
        title: title.to_string(),
    });
    true
}

/// Removes the tab; when it was the active one, returns the new active key
/// (the last remaining tab, or none).
fn remove_tab(tabs: &mut Vec<Tab>, key: &str, active: Option<&str>) -> Option<Option<String>> {
    tabs.retain(|tab| tab.key != key);
    (active == Some(key)).then(|| tabs.last().map(|t| t.key.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_are_unique_by_key() {
        let mut tabs = Vec::new();
        assert!(insert_tab(&mut tabs, "kpi", "KPI"));
        assert!(!insert_tab(&mut tabs, "kpi", "KPI again"));
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].title, "KPI");
    }

    #[test]
    fn closing_active_tab_activates_last() {
        let mut tabs = Vec::new();
        insert_tab(&mut tabs, "dashboard", "Dashboard");
        insert_tab(&mut tabs, "employee", "Employees");
        insert_tab(&mut tabs, "kpi", "KPI");

        assert_eq!(remove_tab(&mut tabs, "employee", Some("kpi")), None);
        assert_eq!(
            remove_tab(&mut tabs, "kpi", Some("kpi")),
            Some(Some("dashboard".to_string()))
        );
        assert_eq!(remove_tab(&mut tabs, "dashboard", Some("dashboard")), Some(None));
    }
}
