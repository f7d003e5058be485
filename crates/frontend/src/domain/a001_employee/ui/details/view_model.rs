use contracts::domain::a001_employee::aggregate::EmployeeForm;
use contracts::shared::dates::format_iso;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_employee::api;
use crate::shared::toast::ToastService;

#[derive(Clone, Copy)]
pub struct EmployeeDetailsViewModel {
    pub form: RwSignal<EmployeeForm>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
}

impl EmployeeDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(EmployeeForm::default()),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.is_update())
    }

    pub fn is_form_valid(&self) -> bool {
        self.form.with(|f| f.validate().is_ok())
    }

    pub fn load_if_needed(&self, employee_id: Option<String>) {
        let Some(id) = employee_id else {
            return;
        };
        let vm = *self;
        vm.loading.set(true);
        spawn_local(async move {
            match api::fetch_employee(&id).await {
                Ok(employee) => {
                    let mut form = EmployeeForm::from_employee(&employee);
                    // getrecord may omit the id it was asked for
                    form.employee_id.get_or_insert(id);
                    for date in [&mut form.dob, &mut form.date_of_joining] {
                        if let Some(iso) = format_iso(date) {
                            *date = iso;
                        }
                    }
                    let _ = vm.form.try_set(form);
                }
                Err(e) => {
                    log::warn!("employee {} load failed: {}", id, e);
                    let _ = vm
                        .error
                        .try_set(Some(e.user_message("Failed to load employee")));
                }
            }
            let _ = vm.loading.try_set(false);
        });
    }

    pub fn save_command(&self, toasts: ToastService, on_saved: Callback<()>) {
        let current = self.form.get_untracked();
        if let Err(message) = current.validate() {
            self.error.set(Some(message));
            return;
        }

        let vm = *self;
        vm.error.set(None);
        vm.saving.set(true);
        spawn_local(async move {
            match api::save_employee(&current).await {
                Ok(message) => {
                    let fallback = if current.is_update() {
                        "Employee updated"
                    } else {
                        "Employee added"
                    };
                    toasts.success(message.unwrap_or_else(|| fallback.to_string()));
                    let _ = vm.saving.try_set(false);
                    on_saved.run(());
                }
                Err(e) => {
                    let _ = vm.saving.try_set(false);
                    let _ = vm
                        .error
                        .try_set(Some(e.user_message("Failed to save employee")));
                }
            }
        });
    }
}
