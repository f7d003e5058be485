pub mod companies;
pub mod generate;
pub mod list;
