use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Query state of a remote list. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub date_range: Option<DateRange>,
    pub employee_ids: Vec<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: String::new(),
            sort_ascending: true,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            date_range: None,
            employee_ids: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn new(sort_field: &str, sort_ascending: bool, page_size: usize) -> Self {
        Self {
            sort_field: sort_field.to_string(),
            sort_ascending,
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn sort_order(&self) -> &'static str {
        if self.sort_ascending {
            "asc"
        } else {
            "desc"
        }
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.page_size
    }

    /// The same query without its pagination, for cache keys.
    pub fn without_paging(&self) -> ListQuery {
        ListQuery {
            page: 1,
            page_size: 0,
            ..self.clone()
        }
    }
}

/// One materialized page of a remote list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub rows: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
            total_pages: 1,
        }
    }
}

impl<T> ListResult<T> {
    /// Builds a result from whatever totals the server reported.
    ///
    /// `total` wins; a bare `total_pages` is scaled by the page size; with
    /// neither, the row count stands in.
    pub fn from_counts(
        rows: Vec<T>,
        total: Option<usize>,
        total_pages_hint: Option<usize>,
        page_size: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        let (total_count, total_pages) = match (total, total_pages_hint) {
            (Some(total), _) => (total, total_pages(total, page_size)),
            (None, Some(pages)) => (pages * page_size, pages.max(1)),
            (None, None) => (rows.len(), total_pages(rows.len(), page_size)),
        };
        Self {
            rows,
            total_count,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// Generic list request body for endpoints that take `pageSize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    pub search: String,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "sortField", skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(rename = "sortOrder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(rename = "employeeIds", skip_serializing_if = "Vec::is_empty", default)]
    pub employee_ids: Vec<String>,
}

impl From<&ListQuery> for ListRequest {
    fn from(query: &ListQuery) -> Self {
        let sort_field = (!query.sort_field.is_empty()).then(|| query.sort_field.clone());
        Self {
            search: query.search.trim().to_string(),
            page: query.page.max(1),
            page_size: query.page_size.max(1),
            sort_order: sort_field.as_ref().map(|_| query.sort_order().to_string()),
            sort_field,
            start_date: query.date_range.as_ref().map(|r| r.start.clone()),
            end_date: query.date_range.as_ref().map(|r| r.end.clone()),
            employee_ids: query.employee_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_pages_rounds_up_and_floors_at_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 5), 5);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn from_counts_prefers_total() {
        let r = ListResult::from_counts(vec![1, 2], Some(23), Some(99), 5);
        assert_eq!((r.total_count, r.total_pages), (23, 5));

        let r = ListResult::from_counts(vec![1, 2], None, Some(4), 10);
        assert_eq!((r.total_count, r.total_pages), (40, 4));

        let r = ListResult::from_counts(vec![1, 2, 3], None, None, 10);
        assert_eq!((r.total_count, r.total_pages), (3, 1));
    }

    #[test]
    fn offset_is_zero_based() {
        let mut q = ListQuery::new("name", true, 5);
        assert_eq!(q.offset(), 0);
        q.page = 3;
        assert_eq!(q.offset(), 10);
    }

    #[test]
    fn request_wire_shape() {
        let mut q = ListQuery::new("deadline", false, 10);
        q.search = "  apollo ".into();
        q.page = 2;
        q.date_range = Some(DateRange {
            start: "2025-01-01".into(),
            end: "2025-01-31".into(),
        });
        let body = serde_json::to_value(ListRequest::from(&q)).unwrap();
        assert_eq!(
            body,
            json!({
                "search": "apollo",
                "page": 2,
                "pageSize": 10,
                "sortField": "deadline",
                "sortOrder": "desc",
                "startDate": "2025-01-01",
                "endDate": "2025-01-31"
            })
        );
    }

    #[test]
    fn unsorted_request_omits_sort_keys() {
        let body = serde_json::to_value(ListRequest::from(&ListQuery::default())).unwrap();
        assert!(body.get("sortField").is_none());
        assert!(body.get("sortOrder").is_none());
        assert!(body.get("employeeIds").is_none());
    }

    #[test]
    fn without_paging_ignores_page_and_size() {
        let mut a = ListQuery::new("invoice_date", false, 5);
        let mut b = a.clone();
        a.page = 4;
        b.page_size = 50;
        assert_eq!(a.without_paging(), b.without_paging());
        b.search = "x".into();
        assert_ne!(a.without_paging(), b.without_paging());
    }
}
