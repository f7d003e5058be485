//! Page kinds used by [`PageFrame`](super::page_frame::PageFrame).
//!
//! Every tab page carries an id `{entity}--{kind}` (e.g. `"kpi--list"`) and a
//! `data-page-category` attribute with one of the values below.

/// Table with filters and pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// Form for one record (add, edit, generate).
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Overview tiles.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Administration pages: user access, settings.
pub const PAGE_CAT_SYSTEM: &str = "system";

pub const ALL_CATEGORIES: &[&str] = &[
    PAGE_CAT_LIST,
    PAGE_CAT_DETAIL,
    PAGE_CAT_DASHBOARD,
    PAGE_CAT_SYSTEM,
];

/// `{entity}--{kind}` with both halves non-empty.
pub fn is_valid_page_id(id: &str) -> bool {
    match id.split_once("--") {
        Some((entity, kind)) => !entity.is_empty() && !kind.is_empty(),
        None => false,
    }
}

pub fn is_known_category(cat: &str) -> bool {
    ALL_CATEGORIES.contains(&cat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids() {
        assert!(is_valid_page_id("kpi--list"));
        assert!(!is_valid_page_id("kpi-list"));
        assert!(!is_valid_page_id("--list"));
        assert!(is_known_category(PAGE_CAT_SYSTEM));
        assert!(!is_known_category("legacy"));
    }
}
