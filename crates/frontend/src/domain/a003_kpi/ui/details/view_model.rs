use contracts::domain::a003_kpi::aggregate::{KpiForm, KpiSubmission};
use contracts::shared::dates::format_iso;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_kpi::api;
use crate::shared::toast::ToastService;

#[derive(Clone, Copy)]
pub struct KpiDetailsViewModel {
    pub form: RwSignal<KpiForm>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    /// Held from click to response so a double click cannot add twice.
    pub submitting: RwSignal<bool>,
}

/// Employees without the manage capability may only file KPIs for themselves.
pub fn initial_form(own_employee_id: Option<&str>, manages: bool) -> KpiForm {
    KpiForm {
        employee_id: if manages {
            String::new()
        } else {
            own_employee_id.unwrap_or_default().to_string()
        },
        ..KpiForm::default()
    }
}

fn success_fallback(submission: &KpiSubmission) -> &'static str {
    match submission {
        KpiSubmission::Add(_) => "KPI added",
        KpiSubmission::Update(_) => "KPI updated",
    }
}

impl KpiDetailsViewModel {
    pub fn new(initial: KpiForm) -> Self {
        Self {
            form: RwSignal::new(initial),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            submitting: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.is_edit())
    }

    pub fn is_form_valid(&self) -> bool {
        self.form.with(|f| f.submission().is_ok())
    }

    pub fn load_if_needed(&self, kpi_id: Option<String>) {
        let Some(id) = kpi_id else {
            return;
        };
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_kpi(&id).await {
                Ok(kpi) => {
                    let mut form = KpiForm::from_kpi(&kpi);
                    if form.kpi_id.as_deref().map_or(true, str::is_empty) {
                        form.kpi_id = Some(id);
                    }
                    for date in [&mut form.startdate, &mut form.deadline] {
                        if let Some(iso) = format_iso(date) {
                            *date = iso;
                        }
                    }
                    let _ = vm.form.try_set(form);
                }
                Err(e) => {
                    log::warn!("kpi {} load failed: {}", id, e);
                    let _ = vm.error.try_set(Some(e.user_message("Failed to load KPI")));
                }
            }
            let _ = vm.loading.try_set(false);
        });
    }

    pub fn submit_command(&self, toasts: ToastService, on_saved: Callback<()>) {
        if self.submitting.get_untracked() {
            return;
        }
        let submission = match self.form.with_untracked(|f| f.submission()) {
            Ok(submission) => submission,
            Err(message) => {
                self.error.set(Some(message));
                return;
            }
        };

        let vm = *self;
        vm.error.set(None);
        vm.submitting.set(true);
        spawn_local(async move {
            let outcome = api::submit_kpi(&submission).await;
            let _ = vm.submitting.try_set(false);
            match outcome {
                Ok(message) => {
                    toasts.success(message.unwrap_or_else(|| success_fallback(&submission).to_string()));
                    on_saved.run(());
                }
                Err(e) => {
                    let _ = vm.error.try_set(Some(e.user_message("Failed to save KPI")));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_managers_are_pinned_to_themselves() {
        assert_eq!(initial_form(Some("E7"), false).employee_id, "E7");
        assert_eq!(initial_form(Some("E7"), true).employee_id, "");
        assert_eq!(initial_form(None, false).employee_id, "");
    }

    #[test]
    fn blank_form_is_not_submittable() {
        let form = initial_form(Some("E7"), false);
        assert!(!form.is_edit());
        assert!(form.submission().is_err());
    }
}
