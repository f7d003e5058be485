pub mod list;
pub mod register;
