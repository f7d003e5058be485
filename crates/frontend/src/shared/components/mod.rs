pub mod date_input;
pub mod filter_panel;
pub mod form_field;
pub mod pagination_controls;

pub use date_input::DateInput;
pub use filter_panel::{FilterPanel, FilterTag};
pub use form_field::{NumberField, SelectField, TextAreaField, TextField};
pub use pagination_controls::PaginationControls;
