use std::fmt;

use crate::error::DexError;
use crate::fetcher::PageFetcher;
use crate::types::{DetailRecord, Page, PageRequest};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Everything the pagination loop owns.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    /// Append-only, in listing order
    pub collection: Vec<DetailRecord>,
    /// Offset of the next page to request
    pub cursor: usize,
    pub loading: bool,
    pub selection: Option<usize>,
    /// Upstream said there is nothing after the last page
    pub exhausted: bool,
    /// Catalog size from the most recent listing
    pub total: Option<u64>,
    pub last_error: Option<String>,
}

/// Outcome of a committed or discarded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Appended(usize),
    Stale,
}

#[derive(Debug)]
pub struct Controller {
    state: ControllerState,
    page_size: usize,
}

impl Controller {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: ControllerState::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn collection(&self) -> &[DetailRecord] {
        &self.state.collection
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted
    }

    /// Start a page cycle. Refused while one is in flight or the catalog is
    /// exhausted.
    pub fn begin_page(&mut self) -> Option<PageRequest> {
        if self.state.loading {
            tracing::debug!(cursor = self.state.cursor, "page already in flight");
            return None;
        }
        if self.state.exhausted {
            return None;
        }

        self.state.loading = true;
        let request = PageRequest {
            offset: self.state.cursor,
            limit: self.page_size,
        };
        tracing::debug!(%request, "page cycle started");
        Some(request)
    }

    /// Append a resolved page. A result for any offset but the cursor is a
    /// leftover and gets dropped.
    pub fn commit_page(&mut self, offset: usize, page: Page) -> Commit {
        self.state.loading = false;

        if offset != self.state.cursor {
            tracing::warn!(offset, cursor = self.state.cursor, "discarding stale page");
            return Commit::Stale;
        }

        let appended = page.records.len();
        self.state.collection.extend(page.records);
        self.state.cursor += self.page_size;
        self.state.exhausted = !page.has_more;
        if page.total.is_some() {
            self.state.total = page.total;
        }
        self.state.last_error = None;

        tracing::debug!(
            offset,
            appended,
            total = self.state.collection.len(),
            exhausted = self.state.exhausted,
            "page committed"
        );
        Commit::Appended(appended)
    }

    /// Record a failed page cycle. Collection and cursor stay as they were.
    pub fn fail_page(&mut self, offset: usize, error: impl fmt::Display) {
        self.state.loading = false;
        tracing::warn!(offset, %error, "page fetch failed");
        self.state.last_error = Some(error.to_string());
    }

    /// Run one full page cycle against `fetcher`.
    ///
    /// Returns `Ok(None)` if no cycle could start.
    pub async fn load_next(&mut self, fetcher: &PageFetcher) -> Result<Option<Commit>, DexError> {
        let Some(request) = self.begin_page() else {
            return Ok(None);
        };

        match fetcher.fetch_page(request.offset, request.limit).await {
            Ok(page) => Ok(Some(self.commit_page(request.offset, page))),
            Err(e) => {
                self.fail_page(request.offset, &e);
                Err(e)
            }
        }
    }

    pub fn select(&mut self, index: usize) -> Option<&DetailRecord> {
        if index >= self.state.collection.len() {
            return None;
        }
        self.state.selection = Some(index);
        self.state.collection.get(index)
    }

    pub fn dismiss(&mut self) {
        self.state.selection = None;
    }

    pub fn selection(&self) -> Option<&DetailRecord> {
        self.state
            .selection
            .and_then(|i| self.state.collection.get(i))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::catalog::mock::MockCatalog;
    use crate::catalog::Catalog;

    fn setup(total: usize) -> (Controller, PageFetcher, Arc<MockCatalog>) {
        let catalog = Arc::new(MockCatalog::new(total));
        let fetcher = PageFetcher::new(Arc::clone(&catalog) as Arc<dyn Catalog>);
        (Controller::new(DEFAULT_PAGE_SIZE), fetcher, catalog)
    }

    fn names(controller: &Controller) -> Vec<String> {
        controller.collection().iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn starts_empty() {
        let controller = Controller::new(20);
        let state = controller.state();
        assert!(state.collection.is_empty());
        assert_eq!(state.cursor, 0);
        assert!(!state.loading);
        assert!(state.selection.is_none());
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Controller::new(0).page_size(), 1);
    }

    #[tokio::test]
    async fn two_cycles_join_pages_in_order() {
        let (mut controller, fetcher, _) = setup(1000);

        controller.load_next(&fetcher).await.unwrap();
        controller.load_next(&fetcher).await.unwrap();

        let collection = controller.collection();
        assert_eq!(collection.len(), 40);
        assert_eq!(collection[19].name, "mon-19");
        assert_eq!(collection[20].name, "mon-20");
        assert_eq!(controller.state().cursor, 40);
        assert!(!controller.is_loading());
    }

    #[test]
    fn begin_refused_while_in_flight() {
        let mut controller = Controller::new(20);
        let first = controller.begin_page();
        assert_eq!(
            first,
            Some(PageRequest {
                offset: 0,
                limit: 20
            })
        );
        assert!(controller.is_loading());
        assert_eq!(controller.begin_page(), None);
        assert_eq!(controller.begin_page(), None);
    }

    #[tokio::test]
    async fn load_next_while_in_flight_issues_no_request() {
        let (mut controller, fetcher, catalog) = setup(1000);
        controller.begin_page();

        let outcome = controller.load_next(&fetcher).await.unwrap();
        assert_eq!(outcome, None);
        assert_eq!(catalog.listing_calls(), 0);
    }

    #[tokio::test]
    async fn failed_detail_leaves_collection_untouched() {
        let (mut controller, fetcher, catalog) = setup(1000);
        controller.load_next(&fetcher).await.unwrap();
        let before = names(&controller);

        catalog.fail_detail("mon-27");
        let result = controller.load_next(&fetcher).await;

        assert!(result.is_err());
        assert_eq!(names(&controller), before);
        assert_eq!(controller.state().cursor, 20);
        assert!(!controller.is_loading());
        assert!(controller.state().last_error.is_some());
    }

    #[tokio::test]
    async fn failed_page_is_requested_again() {
        let (mut controller, fetcher, catalog) = setup(1000);
        catalog.fail_listing();
        assert!(controller.load_next(&fetcher).await.is_err());

        catalog.heal();
        controller.load_next(&fetcher).await.unwrap();
        assert_eq!(controller.collection()[0].name, "mon-0");
        assert!(controller.state().last_error.is_none());
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut controller = Controller::new(20);
        controller.begin_page();
        let page = Page {
            has_more: true,
            ..Page::default()
        };
        assert_eq!(controller.commit_page(40, page), Commit::Stale);
        assert!(!controller.is_loading());
        assert_eq!(controller.state().cursor, 0);
    }

    #[tokio::test]
    async fn stops_after_last_page() {
        let (mut controller, fetcher, catalog) = setup(30);
        controller.load_next(&fetcher).await.unwrap();
        controller.load_next(&fetcher).await.unwrap();
        assert!(controller.is_exhausted());
        assert_eq!(controller.collection().len(), 30);
        assert_eq!(controller.state().total, Some(30));

        assert_eq!(controller.load_next(&fetcher).await.unwrap(), None);
        assert_eq!(catalog.listing_calls(), 2);
    }

    #[tokio::test]
    async fn select_dismiss_select() {
        let (mut controller, fetcher, _) = setup(1000);
        controller.load_next(&fetcher).await.unwrap();

        let picked = controller.select(5).cloned();
        assert_eq!(picked.as_ref().map(|r| r.name.as_str()), Some("mon-5"));
        assert_eq!(controller.selection(), Some(&controller.collection()[5]));

        controller.dismiss();
        assert!(controller.selection().is_none());

        controller.select(5);
        assert_eq!(controller.selection(), picked.as_ref());

        controller.select(6);
        assert_eq!(controller.selection().unwrap().name, "mon-6");
    }

    #[test]
    fn select_out_of_range_keeps_selection() {
        let mut controller = Controller::new(20);
        assert!(controller.select(0).is_none());
        assert!(controller.selection().is_none());
    }

    #[tokio::test]
    async fn selection_survives_appends() {
        let (mut controller, fetcher, _) = setup(1000);
        controller.load_next(&fetcher).await.unwrap();
        controller.select(3);
        controller.load_next(&fetcher).await.unwrap();
        assert_eq!(controller.selection().unwrap().name, "mon-3");
    }

    proptest! {
        #[test]
        fn growth_and_cursor_are_monotonic(pages in 1usize..8, page_size in 1usize..30) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let catalog = Arc::new(MockCatalog::new(usize::MAX / 2));
            let fetcher = PageFetcher::new(Arc::clone(&catalog) as Arc<dyn Catalog>);
            let mut controller = Controller::new(page_size);

            let mut previous: Vec<String> = Vec::new();
            for n in 1..=pages {
                rt.block_on(controller.load_next(&fetcher)).unwrap();
                let current = names(&controller);

                prop_assert_eq!(current.len(), n * page_size);
                prop_assert_eq!(controller.state().cursor, n * page_size);
                prop_assert_eq!(&current[..previous.len()], &previous[..]);
                prop_assert!(!controller.is_loading());
                previous = current;
            }
            for (i, name) in previous.iter().enumerate() {
                prop_assert_eq!(name, &format!("mon-{}", i));
            }
        }
    }
}
