//! Client-side date ordering for endpoints that cannot sort by date.
//!
//! The whole filtered set is pulled in batches, ordered once by a date key
//! and cached for the query; page and page-size changes then slice the cache
//! without touching the network.

use async_trait::async_trait;
use contracts::shared::list::{total_pages, ListQuery, ListResult};
use std::cell::RefCell;
use std::rc::Rc;

use super::strategy::{ListSource, ListStrategy};
use crate::shared::api_utils::ApiError;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Sort key of a row for a date field; unparsable dates map to the lowest key.
pub type DateKeyFn<T> = fn(&T, &str) -> i64;

struct SortedSet<T> {
    query: ListQuery,
    rows: Vec<T>,
}

pub struct DateSortFallback<T, S> {
    source: Rc<S>,
    batch_size: usize,
    key_of: DateKeyFn<T>,
    cache: RefCell<Option<SortedSet<T>>>,
}

impl<T: Clone, S: ListSource<T>> DateSortFallback<T, S> {
    pub fn new(source: Rc<S>, key_of: DateKeyFn<T>) -> Self {
        Self::with_batch_size(source, key_of, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(source: Rc<S>, key_of: DateKeyFn<T>, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
            key_of,
            cache: RefCell::new(None),
        }
    }

    async fn fetch_all(&self, query: &ListQuery) -> Result<Vec<T>, ApiError> {
        let mut batch_query = query.clone();
        batch_query.page = 1;
        batch_query.page_size = self.batch_size;

        let mut rows = Vec::new();
        loop {
            let batch = self.source.fetch_page(&batch_query).await?;
            let received = batch.rows.len();
            let total = batch.total_count;
            rows.extend(batch.rows);
            log::debug!(
                "date sort batch {}: {} rows ({} of {})",
                batch_query.page,
                received,
                rows.len(),
                total
            );
            if received == 0 || rows.len() >= total {
                break;
            }
            // A server that caps the page size pages by its own size.
            if batch_query.page == 1 && received < batch_query.page_size {
                batch_query.page_size = received;
            }
            batch_query.page += 1;
        }
        Ok(rows)
    }

    fn sort(&self, rows: Vec<T>, field: &str, ascending: bool) -> Vec<T> {
        let mut keyed: Vec<(i64, T)> = rows
            .into_iter()
            .map(|row| ((self.key_of)(&row, field), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| {
            let ord = a.cmp(b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        keyed.into_iter().map(|(_, row)| row).collect()
    }
}

fn slice<T: Clone>(rows: &[T], query: &ListQuery) -> ListResult<T> {
    let page_size = query.page_size.max(1);
    let start = query.offset().min(rows.len());
    let end = (start + page_size).min(rows.len());
    ListResult {
        rows: rows[start..end].to_vec(),
        total_count: rows.len(),
        total_pages: total_pages(rows.len(), page_size),
    }
}

#[async_trait(?Send)]
impl<T, S> ListStrategy<T> for DateSortFallback<T, S>
where
    T: Clone + 'static,
    S: ListSource<T> + 'static,
{
    async fn fetch(&self, query: &ListQuery) -> Result<ListResult<T>, ApiError> {
        let key = query.without_paging();
        let cached = self
            .cache
            .borrow()
            .as_ref()
            .filter(|set| set.query == key)
            .map(|set| slice(&set.rows, query));
        if let Some(page) = cached {
            return Ok(page);
        }

        self.cache.borrow_mut().take();
        let rows = self.fetch_all(query).await?;
        let rows = self.sort(rows, &query.sort_field, query.sort_ascending);
        let page = slice(&rows, query);
        *self.cache.borrow_mut() = Some(SortedSet { query: key, rows });
        Ok(page)
    }

    fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: usize,
        date: String,
    }

    fn key_of(row: &Row, _field: &str) -> i64 {
        contracts::shared::dates::date_sort_key(&row.date)
    }

    /// Serves rows in id order, like an endpoint that ignores date sorting.
    struct Endpoint {
        rows: Vec<Row>,
        calls: Cell<usize>,
        fail_on_page: Option<usize>,
        max_page_size: usize,
    }

    impl Endpoint {
        fn with(count: usize) -> Rc<Self> {
            let rows = (0..count)
                .map(|id| Row {
                    id,
                    date: format!("{:02}-{:02}-2025", (id * 7) % 28 + 1, id % 12 + 1),
                })
                .collect();
            Rc::new(Self {
                rows,
                calls: Cell::new(0),
                fail_on_page: None,
                max_page_size: usize::MAX,
            })
        }

        fn capped(count: usize, max_page_size: usize) -> Rc<Self> {
            let mut endpoint = Self::with(count);
            if let Some(e) = Rc::get_mut(&mut endpoint) {
                e.max_page_size = max_page_size;
            }
            endpoint
        }
    }

    #[async_trait(?Send)]
    impl ListSource<Row> for Endpoint {
        async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<Row>, ApiError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_on_page == Some(query.page) {
                return Err(ApiError::Transport("connection reset".into()));
            }
            let page_size = query.page_size.min(self.max_page_size);
            let rows = self
                .rows
                .iter()
                .skip(query.page.saturating_sub(1) * page_size)
                .take(page_size)
                .cloned()
                .collect();
            Ok(ListResult::from_counts(
                rows,
                Some(self.rows.len()),
                None,
                page_size,
            ))
        }
    }

    fn query(page: usize, page_size: usize) -> ListQuery {
        let mut q = ListQuery::new("due_date", false, page_size);
        q.page = page;
        q
    }

    fn expected_desc(endpoint: &Endpoint) -> Vec<Row> {
        let mut rows = endpoint.rows.clone();
        rows.sort_by(|a, b| key_of(b, "").cmp(&key_of(a, "")));
        rows
    }

    #[test]
    fn batches_until_total_and_returns_sorted_first_page() {
        let endpoint = Endpoint::with(23);
        let strategy = DateSortFallback::with_batch_size(endpoint.clone(), key_of, 10);

        let page = block_on(strategy.fetch(&query(1, 5))).unwrap();
        assert_eq!(endpoint.calls.get(), 3);
        assert_eq!(page.total_count, 23);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.rows, expected_desc(&endpoint)[..5].to_vec());
        assert!(page
            .rows
            .windows(2)
            .all(|w| key_of(&w[0], "") >= key_of(&w[1], "")));
    }

    #[test]
    fn server_page_cap_still_collects_every_row() {
        let endpoint = Endpoint::capped(23, 10);
        let strategy = DateSortFallback::new(endpoint.clone(), key_of);

        let page = block_on(strategy.fetch(&query(1, 5))).unwrap();
        assert_eq!(endpoint.calls.get(), 3);
        assert_eq!(page.total_count, 23);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.rows, expected_desc(&endpoint)[..5].to_vec());

        let last = block_on(strategy.fetch(&query(5, 5))).unwrap();
        assert_eq!(last.rows, expected_desc(&endpoint)[20..].to_vec());
    }

    #[test]
    fn partial_last_batch_reaches_total() {
        let endpoint = Endpoint::capped(7, 5);
        let strategy = DateSortFallback::with_batch_size(endpoint.clone(), key_of, 5);
        let page = block_on(strategy.fetch(&query(1, 10))).unwrap();
        assert_eq!(page.total_count, 7);
        assert_eq!(endpoint.calls.get(), 2);
    }

    #[test]
    fn page_and_size_changes_are_served_from_cache() {
        let endpoint = Endpoint::with(23);
        let strategy = DateSortFallback::with_batch_size(endpoint.clone(), key_of, 10);
        block_on(strategy.fetch(&query(1, 5))).unwrap();
        let calls = endpoint.calls.get();

        let last = block_on(strategy.fetch(&query(5, 5))).unwrap();
        assert_eq!(last.rows, expected_desc(&endpoint)[20..].to_vec());
        let wide = block_on(strategy.fetch(&query(2, 20))).unwrap();
        assert_eq!(wide.rows.len(), 3);
        assert_eq!(endpoint.calls.get(), calls);

        let mut flipped = query(1, 5);
        flipped.sort_ascending = true;
        block_on(strategy.fetch(&flipped)).unwrap();
        assert!(endpoint.calls.get() > calls);
    }

    #[test]
    fn ties_keep_server_order() {
        let endpoint = Rc::new(Endpoint {
            rows: (0..6)
                .map(|id| Row {
                    id,
                    date: if id % 2 == 0 { "01-02-2025" } else { "not a date" }.into(),
                })
                .collect(),
            calls: Cell::new(0),
            fail_on_page: None,
            max_page_size: usize::MAX,
        });
        let strategy = DateSortFallback::with_batch_size(endpoint, key_of, 4);
        let page = block_on(strategy.fetch(&query(1, 10))).unwrap();
        let ids: Vec<usize> = page.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn batch_failure_aborts_and_leaves_no_cache() {
        let mut endpoint = Endpoint::with(23);
        if let Some(e) = Rc::get_mut(&mut endpoint) {
            e.fail_on_page = Some(2);
        }
        let strategy = DateSortFallback::with_batch_size(endpoint.clone(), key_of, 10);
        let err = block_on(strategy.fetch(&query(1, 5))).unwrap_err();
        assert_eq!(err, ApiError::Transport("connection reset".into()));
        assert!(strategy.cache.borrow().is_none());
    }

    #[test]
    fn complete_first_batch_stops_and_invalidate_refetches() {
        let endpoint = Endpoint::with(4);
        let strategy = DateSortFallback::with_batch_size(endpoint.clone(), key_of, 10);
        let page = block_on(strategy.fetch(&query(1, 5))).unwrap();
        assert_eq!(page.rows.len(), 4);
        assert_eq!(endpoint.calls.get(), 1);

        strategy.invalidate();
        block_on(strategy.fetch(&query(1, 5))).unwrap();
        assert_eq!(endpoint.calls.get(), 2);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let endpoint = Endpoint::with(3);
        let strategy = DateSortFallback::with_batch_size(endpoint, key_of, 10);
        let page = block_on(strategy.fetch(&query(4, 5))).unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
