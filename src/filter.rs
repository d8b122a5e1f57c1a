use tokio::sync::watch;

use crate::{
    ArcStr,
    api::{Category, FeedRequest, Id, Platform},
};

/// The constraints currently applied to the product feed.
///
/// `None` means "no constraint". Search text is stored trimmed and never
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    pub search: Option<ArcStr>,
    pub category_id: Option<Id>,
    pub platform_id: Option<Id>,
}

impl FilterSnapshot {
    /// The feed query for `page` under these constraints.
    pub fn request(&self, page: u32) -> FeedRequest {
        FeedRequest {
            page,
            search: self.search.clone(),
            category_id: self.category_id,
            platform_id: self.platform_id,
        }
    }
}

/// Filter selections plus the option lists they are picked from.
///
/// Subscribers are notified only when a setter actually changes the
/// selection.
#[derive(Debug)]
pub struct FilterState {
    tx: watch::Sender<FilterSnapshot>,
    categories: Vec<Category>,
    platforms: Vec<Platform>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(FilterSnapshot::default());
        Self {
            tx,
            categories: Vec::new(),
            platforms: Vec::new(),
        }
    }

    /// Sets the search text. Blank text clears the constraint.
    ///
    /// Returns whether the selection changed.
    pub fn set_search(&mut self, text: &str) -> bool {
        let text = text.trim();
        let search = (!text.is_empty()).then(|| ArcStr::from(text));
        self.tx.send_if_modified(|filter| {
            let changed = filter.search != search;
            filter.search = search;
            changed
        })
    }

    pub fn set_category(&mut self, id: Option<Id>) -> bool {
        self.tx.send_if_modified(|filter| {
            let changed = filter.category_id != id;
            filter.category_id = id;
            changed
        })
    }

    pub fn set_platform(&mut self, id: Option<Id>) -> bool {
        self.tx.send_if_modified(|filter| {
            let changed = filter.platform_id != id;
            filter.platform_id = id;
            changed
        })
    }

    pub fn current(&self) -> FilterSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.tx.subscribe()
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn set_platforms(&mut self, platforms: Vec<Platform>) {
        self.platforms = platforms;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }
}
