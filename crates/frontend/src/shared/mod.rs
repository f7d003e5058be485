pub mod api_utils;
pub mod components;
pub mod date_utils;
pub mod dialogs;
pub mod export;
pub mod icons;
pub mod list_controller;
pub mod list_utils;
pub mod page_frame;
pub mod page_standard;
pub mod toast;
