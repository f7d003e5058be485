//! KPI add/edit form.
//!
//! - view_model.rs: form state, load and submit commands
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::KpiDetails;
pub use view_model::KpiDetailsViewModel;
