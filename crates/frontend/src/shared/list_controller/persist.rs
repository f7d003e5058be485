//! List query persistence in localStorage.
//!
//! Keys follow `<entity>_list_state_v1`. Only the query is stored, never rows.

use contracts::shared::list::ListQuery;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Merges a stored query over the page's defaults.
///
/// Unreadable state falls back to the defaults; the restored page size is
/// kept only if the page offers it.
pub fn restore_query(raw: Option<&str>, default: ListQuery, page_sizes: &[usize]) -> ListQuery {
    let Some(stored) = raw.and_then(|r| serde_json::from_str::<ListQuery>(r).ok()) else {
        return default;
    };
    let page_size = if page_sizes.contains(&stored.page_size) {
        stored.page_size
    } else {
        default.page_size
    };
    ListQuery {
        page: stored.page.max(1),
        page_size,
        ..stored
    }
}

pub fn load_query(storage_key: &str, default: ListQuery, page_sizes: &[usize]) -> ListQuery {
    let raw = storage().and_then(|s| s.get_item(storage_key).ok().flatten());
    restore_query(raw.as_deref(), default, page_sizes)
}

pub fn save_query(storage_key: &str, query: &ListQuery) {
    let Some(storage) = storage() else { return };
    let Ok(raw) = serde_json::to_string(query) else {
        return;
    };
    let _ = storage.set_item(storage_key, &raw);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: [usize; 3] = [10, 25, 50];

    #[test]
    fn falls_back_on_missing_or_broken_state() {
        let default = ListQuery::new("name", true, 10);
        assert_eq!(restore_query(None, default.clone(), &SIZES), default);
        assert_eq!(restore_query(Some("{oops"), default.clone(), &SIZES), default);
    }

    #[test]
    fn restores_stored_query() {
        let mut stored = ListQuery::new("email", false, 25);
        stored.search = "ann".into();
        stored.page = 3;
        let raw = serde_json::to_string(&stored).unwrap();
        let restored = restore_query(Some(&raw), ListQuery::new("name", true, 10), &SIZES);
        assert_eq!(restored, stored);
    }

    #[test]
    fn normalizes_page_and_size() {
        let mut stored = ListQuery::new("email", false, 7);
        stored.page = 0;
        let raw = serde_json::to_string(&stored).unwrap();
        let restored = restore_query(Some(&raw), ListQuery::new("name", true, 10), &SIZES);
        assert_eq!(restored.page, 1);
        assert_eq!(restored.page_size, 10);
        assert_eq!(restored.sort_field, "email");
    }
}
