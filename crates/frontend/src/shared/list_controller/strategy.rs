use async_trait::async_trait;
use contracts::shared::list::{ListQuery, ListResult};
use std::rc::Rc;

use crate::shared::api_utils::ApiError;

/// One page of rows straight from an endpoint.
#[async_trait(?Send)]
pub trait ListSource<T> {
    async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<T>, ApiError>;
}

/// How a list turns its query into a page of rows.
#[async_trait(?Send)]
pub trait ListStrategy<T> {
    async fn fetch(&self, query: &ListQuery) -> Result<ListResult<T>, ApiError>;

    /// Drops anything cached for the current query.
    fn invalidate(&self) {}
}

/// The server sorts and pages.
pub struct ServerPaged<S> {
    source: Rc<S>,
}

impl<S> ServerPaged<S> {
    pub fn new(source: Rc<S>) -> Self {
        Self { source }
    }
}

#[async_trait(?Send)]
impl<T, S> ListStrategy<T> for ServerPaged<S>
where
    T: 'static,
    S: ListSource<T> + 'static,
{
    async fn fetch(&self, query: &ListQuery) -> Result<ListResult<T>, ApiError> {
        self.source.fetch_page(query).await
    }
}

/// Picks a strategy by the active sort field.
pub struct SortRouted<T> {
    default: Rc<dyn ListStrategy<T>>,
    routes: Vec<(String, Rc<dyn ListStrategy<T>>)>,
}

impl<T> SortRouted<T> {
    pub fn new(default: Rc<dyn ListStrategy<T>>) -> Self {
        Self {
            default,
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, field: &str, strategy: Rc<dyn ListStrategy<T>>) -> Self {
        self.routes.push((field.to_string(), strategy));
        self
    }

    fn pick(&self, field: &str) -> &Rc<dyn ListStrategy<T>> {
        self.routes
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, s)| s)
            .unwrap_or(&self.default)
    }
}

#[async_trait(?Send)]
impl<T: 'static> ListStrategy<T> for SortRouted<T> {
    async fn fetch(&self, query: &ListQuery) -> Result<ListResult<T>, ApiError> {
        self.pick(&query.sort_field).fetch(query).await
    }

    fn invalidate(&self) {
        self.default.invalidate();
        for (_, strategy) in &self.routes {
            strategy.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::Cell;

    struct Tagged {
        tag: usize,
        hits: Cell<usize>,
        invalidated: Cell<bool>,
    }

    impl Tagged {
        fn new(tag: usize) -> Rc<Self> {
            Rc::new(Self {
                tag,
                hits: Cell::new(0),
                invalidated: Cell::new(false),
            })
        }
    }

    #[async_trait(?Send)]
    impl ListSource<usize> for Tagged {
        async fn fetch_page(&self, query: &ListQuery) -> Result<ListResult<usize>, ApiError> {
            self.hits.set(self.hits.get() + 1);
            Ok(ListResult::from_counts(vec![self.tag], Some(1), None, query.page_size))
        }
    }

    #[async_trait(?Send)]
    impl ListStrategy<usize> for Tagged {
        async fn fetch(&self, query: &ListQuery) -> Result<ListResult<usize>, ApiError> {
            self.fetch_page(query).await
        }

        fn invalidate(&self) {
            self.invalidated.set(true);
        }
    }

    #[test]
    fn server_paged_forwards_to_source() {
        let source = Tagged::new(7);
        let strategy = ServerPaged::new(source.clone());
        let page: ListResult<usize> = block_on(strategy.fetch(&ListQuery::default())).unwrap();
        assert_eq!(page.rows, vec![7]);
        assert_eq!(source.hits.get(), 1);
    }

    #[test]
    fn sort_routed_dispatches_by_field() {
        let server = Tagged::new(1);
        let dates = Tagged::new(2);
        let routed = SortRouted::new(server.clone() as Rc<dyn ListStrategy<usize>>)
            .route("due_date", dates.clone());

        let by_name = ListQuery::new("name", true, 10);
        let by_due = ListQuery::new("due_date", false, 10);
        assert_eq!(block_on(routed.fetch(&by_name)).unwrap().rows, vec![1]);
        assert_eq!(block_on(routed.fetch(&by_due)).unwrap().rows, vec![2]);
        assert_eq!((server.hits.get(), dates.hits.get()), (1, 1));

        routed.invalidate();
        assert!(server.invalidated.get() && dates.invalidated.get());
    }
}
