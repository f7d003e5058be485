pub mod api;
pub mod dates;
pub mod lenient;
pub mod list;
