//! Employee add/edit form.
//!
//! - view_model.rs: form state, load and save commands
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::EmployeeDetails;
pub use view_model::EmployeeDetailsViewModel;
