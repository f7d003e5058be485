//! Remote list controller
//!
//! Owns the query of a server-backed table (search, sort, page, filters) and
//! the last page materialized for it. Fetching goes through a
//! [`ListStrategy`]; every fetch is stamped with a generation so a response
//! that arrives after a newer request was issued is dropped.

pub mod date_sort;
pub mod persist;
pub mod strategy;

pub use date_sort::DateSortFallback;
pub use strategy::{ListSource, ListStrategy, ServerPaged, SortRouted};

use contracts::shared::list::{DateRange, ListQuery, ListResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

use crate::shared::api_utils::ApiError;
use crate::shared::components::pagination_controls::PAGE_SIZE_OPTIONS;
use crate::shared::toast::{use_toasts, ToastService};

pub const FETCH_FAILED: &str = "Failed to load data";

/// Issued by [`ListController::begin_fetch`]; hand it back on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started; the response was dropped.
    Stale,
    /// The page came back empty; the controller moved one page back and
    /// expects another fetch.
    SteppedBack,
    /// Rows are kept as they were; the message is ready for a toast.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListController<T> {
    query: ListQuery,
    result: ListResult<T>,
    generation: u64,
    loading: bool,
    loaded: bool,
}

impl<T> ListController<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            result: ListResult::default(),
            generation: 0,
            loading: false,
            loaded: false,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn result(&self) -> &ListResult<T> {
        &self.result
    }

    pub fn rows(&self) -> &[T] {
        &self.result.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
        self.query.page = 1;
    }

    /// Same field flips the direction; a new field starts ascending.
    pub fn set_sort(&mut self, field: &str) {
        if self.query.sort_field == field {
            self.query.sort_ascending = !self.query.sort_ascending;
        } else {
            self.query.sort_field = field.to_string();
            self.query.sort_ascending = true;
        }
        self.query.page = 1;
    }

    /// Clamped to `[1, total_pages]` of the last applied result.
    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.clamp(1, self.result.total_pages.max(1));
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.query.page_size = size.max(1);
        self.query.page = 1;
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.query.date_range = range;
        self.query.page = 1;
    }

    pub fn set_employee_filter(&mut self, employee_ids: Vec<String>) {
        self.query.employee_ids = employee_ids;
        self.query.page = 1;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub fn complete_fetch(
        &mut self,
        generation: u64,
        outcome: Result<ListResult<T>, ApiError>,
    ) -> FetchOutcome {
        if generation != self.generation {
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match outcome {
            Ok(result) if result.rows.is_empty() && self.query.page > 1 => {
                self.query.page -= 1;
                FetchOutcome::SteppedBack
            }
            Ok(result) => {
                self.result = result;
                self.loaded = true;
                FetchOutcome::Applied
            }
            Err(e) => {
                log::warn!("list fetch failed: {}", e);
                FetchOutcome::Failed(e.user_message(FETCH_FAILED))
            }
        }
    }

    /// Fetches the current page, stepping back past empty trailing pages.
    pub async fn fetch_page(&mut self, strategy: &dyn ListStrategy<T>) -> FetchOutcome {
        loop {
            let ticket = self.begin_fetch();
            let outcome = strategy.fetch(&ticket.query).await;
            match self.complete_fetch(ticket.generation, outcome) {
                FetchOutcome::SteppedBack => continue,
                other => return other,
            }
        }
    }
}

/// Strategy handle shared by a page's closures.
pub type SharedStrategy<T> = StoredValue<Rc<dyn ListStrategy<T>>, LocalStorage>;

pub fn share_strategy<T: 'static>(strategy: Rc<dyn ListStrategy<T>>) -> SharedStrategy<T> {
    StoredValue::new_local(strategy)
}

/// Runs one fetch for a controller living in a signal.
///
/// The completion is a no-op once the owning page has been disposed.
pub fn spawn_fetch<T>(
    controller: RwSignal<ListController<T>>,
    strategy: SharedStrategy<T>,
    toasts: ToastService,
) where
    T: Clone + Send + Sync + 'static,
{
    let Some(ticket) = controller.try_update(|c| c.begin_fetch()) else {
        return;
    };
    let Some(current) = strategy.try_get_value() else {
        return;
    };
    spawn_local(async move {
        let outcome = current.fetch(&ticket.query).await;
        match controller.try_update(|c| c.complete_fetch(ticket.generation, outcome)) {
            Some(FetchOutcome::SteppedBack) => spawn_fetch(controller, strategy, toasts),
            Some(FetchOutcome::Failed(message)) => toasts.error(message),
            Some(FetchOutcome::Stale) => {
                log::debug!("dropped stale list response #{}", ticket.generation)
            }
            Some(FetchOutcome::Applied) | None => {}
        }
    });
}

/// Refetch after a mutation: cached rows are stale, so drop them first.
pub fn spawn_refetch<T>(
    controller: RwSignal<ListController<T>>,
    strategy: SharedStrategy<T>,
    toasts: ToastService,
) where
    T: Clone + Send + Sync + 'static,
{
    let _ = strategy.try_with_value(|s| s.invalidate());
    spawn_fetch(controller, strategy, toasts);
}

/// Everything a list page's closures need, in one `Copy` value.
pub struct ListHandle<T: 'static> {
    pub controller: RwSignal<ListController<T>>,
    pub strategy: SharedStrategy<T>,
    pub toasts: ToastService,
}

impl<T: 'static> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ListHandle<T> {}

impl<T> ListHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn fetch(&self) {
        spawn_fetch(self.controller, self.strategy, self.toasts);
    }

    /// After a mutation on the server.
    pub fn refresh(&self) {
        spawn_refetch(self.controller, self.strategy, self.toasts);
    }

    /// Applies a query change and fetches.
    pub fn apply(&self, change: impl FnOnce(&mut ListController<T>)) {
        self.controller.update(change);
        self.fetch();
    }

    pub fn sort_by(&self, field: &str) {
        self.apply(|c| c.set_sort(field));
    }

    pub fn go_to_page(&self, page: usize) {
        self.apply(|c| c.set_page(page));
    }

    pub fn set_page_size(&self, size: usize) {
        self.apply(|c| c.set_page_size(size));
    }

    pub fn search(&self, text: &str) {
        self.apply(|c| c.set_search(text));
    }

    pub fn is_loading(&self) -> Signal<bool> {
        let controller = self.controller;
        Signal::derive(move || controller.with(|c| c.is_loading()))
    }

    pub fn rows(&self) -> Vec<T> {
        self.controller.with(|c| c.rows().to_vec())
    }
}

/// Sets up a list page: restores the saved query, loads the first page once
/// mounted and saves the query whenever it changes.
pub fn use_list<T>(
    storage_key: &'static str,
    default_query: ListQuery,
    strategy: Rc<dyn ListStrategy<T>>,
) -> ListHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    let restored = persist::load_query(storage_key, default_query, &PAGE_SIZE_OPTIONS);
    let handle = ListHandle {
        controller: RwSignal::new(ListController::new(restored)),
        strategy: share_strategy(strategy),
        toasts: use_toasts(),
    };

    let controller = handle.controller;
    let query = Memo::new(move |_| controller.with(|c| c.query().clone()));
    Effect::new(move |_| query.with(|q| persist::save_query(storage_key, q)));

    Effect::new(move |_| {
        if !controller.with_untracked(|c| c.is_loaded()) {
            handle.fetch();
        }
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct Pages {
        total: usize,
        calls: RefCell<Vec<ListQuery>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl ListStrategy<usize> for Pages {
        async fn fetch(&self, query: &ListQuery) -> Result<ListResult<usize>, ApiError> {
            self.calls.borrow_mut().push(query.clone());
            if self.fail {
                return Err(ApiError::Application {
                    message: Some("Database offline".into()),
                });
            }
            let rows: Vec<usize> = (query.offset()..self.total)
                .take(query.page_size)
                .collect();
            Ok(ListResult::from_counts(
                rows,
                Some(self.total),
                None,
                query.page_size,
            ))
        }
    }

    fn controller() -> ListController<usize> {
        ListController::new(ListQuery::new("name", true, 5))
    }

    fn page_of(rows: Vec<usize>, total: usize) -> ListResult<usize> {
        ListResult::from_counts(rows, Some(total), None, 5)
    }

    #[test]
    fn query_mutations_reset_page() {
        let mut c = controller();
        c.result = page_of(vec![], 50);
        c.set_page(4);
        assert_eq!(c.query().page, 4);
        c.set_search("ann");
        assert_eq!(c.query().page, 1);
        assert_eq!(c.query().search, "ann");

        c.set_page(3);
        c.set_date_range(Some(DateRange {
            start: "2025-01-01".into(),
            end: "2025-01-31".into(),
        }));
        assert_eq!(c.query().page, 1);

        c.set_page(3);
        c.set_employee_filter(vec!["E1".into()]);
        assert_eq!(c.query().page, 1);

        c.set_page(3);
        c.set_page_size(20);
        assert_eq!((c.query().page, c.query().page_size), (1, 20));
    }

    #[test]
    fn set_sort_toggles_same_field_and_resets_new_one() {
        let mut c = controller();
        c.set_sort("name");
        assert!(!c.query().sort_ascending);
        c.set_sort("name");
        assert!(c.query().sort_ascending);
        c.set_sort("name");
        c.set_sort("email");
        assert_eq!(c.query().sort_field, "email");
        assert!(c.query().sort_ascending);
    }

    #[test]
    fn set_page_is_clamped() {
        let mut c = controller();
        c.set_page(7);
        assert_eq!(c.query().page, 1);
        c.result = page_of(vec![1, 2, 3, 4, 5], 12);
        c.set_page(0);
        assert_eq!(c.query().page, 1);
        c.set_page(9);
        assert_eq!(c.query().page, 3);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut c = controller();
        let first = c.begin_fetch();
        let second = c.begin_fetch();
        assert_eq!(
            c.complete_fetch(first.generation, Ok(page_of(vec![9], 1))),
            FetchOutcome::Stale
        );
        assert!(c.is_loading());
        assert!(c.rows().is_empty());
        assert_eq!(
            c.complete_fetch(second.generation, Ok(page_of(vec![1, 2], 2))),
            FetchOutcome::Applied
        );
        assert_eq!(c.rows(), &[1, 2]);
        assert!(!c.is_loading());
        assert!(c.is_loaded());
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut c = controller();
        let t = c.begin_fetch();
        c.complete_fetch(t.generation, Ok(page_of(vec![1, 2, 3], 3)));
        let t = c.begin_fetch();
        let outcome = c.complete_fetch(t.generation, Err(ApiError::Transport("down".into())));
        assert_eq!(outcome, FetchOutcome::Failed(FETCH_FAILED.to_string()));
        assert_eq!(c.rows(), &[1, 2, 3]);
        assert!(!c.is_loading());
    }

    #[test]
    fn empty_page_steps_back() {
        let mut c = controller();
        c.result = page_of(vec![], 11);
        c.set_page(3);
        let t = c.begin_fetch();
        assert_eq!(
            c.complete_fetch(t.generation, Ok(page_of(vec![], 10))),
            FetchOutcome::SteppedBack
        );
        assert_eq!(c.query().page, 2);

        let mut first = controller();
        let t = first.begin_fetch();
        assert_eq!(
            first.complete_fetch(t.generation, Ok(page_of(vec![], 0))),
            FetchOutcome::Applied
        );
        assert_eq!(first.result().total_pages, 1);
    }

    #[test]
    fn fetch_page_walks_back_to_last_non_empty_page() {
        let source = Pages {
            total: 12,
            calls: RefCell::new(Vec::new()),
            fail: false,
        };
        let mut c = controller();
        c.result = page_of(vec![], 40);
        c.set_page(6);

        let outcome = block_on(c.fetch_page(&source));
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(c.query().page, 3);
        assert_eq!(c.rows(), &[10, 11]);
        let pages: Vec<usize> = source.calls.borrow().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![6, 5, 4, 3]);
    }

    #[test]
    fn fetch_page_surfaces_server_message() {
        let source = Pages {
            total: 0,
            calls: RefCell::new(Vec::new()),
            fail: true,
        };
        let mut c = controller();
        let outcome = block_on(c.fetch_page(&source));
        assert_eq!(outcome, FetchOutcome::Failed("Database offline".into()));
        assert!(!c.is_loaded());
    }
}
