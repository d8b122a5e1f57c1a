use std::collections::HashMap;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use super::{
    FeedController,
    data::{FeedError, FeedOutcome, FeedSnapshot, LoadMode, OptionsReport, PageCursor},
    message::{Message, Resolved},
};
use crate::{
    api::{ApiError, ApiGateway, Category, Platform, Product},
    filter::FilterState,
    log::Log,
};

const SCOPE: &str = "feed";

/// A fetch that has been issued but not resolved yet.
#[derive(Debug)]
struct Pending {
    mode: LoadMode,
    page: u32,
    tx: oneshot::Sender<FeedOutcome>,
}

/// Core of the feed controller actor.
///
/// Owns the filter state, the page cursor and the loaded items. Every fetch
/// is tagged with a fresh generation and runs in its own task; its result is
/// applied only if no fetch or filter change happened since it was issued.
#[derive(Debug)]
pub struct Core {
    api: ApiGateway,
    log: Log,
    filter: FilterState,
    cursor: PageCursor,
    generation: u64,
    items: Vec<Product>,
    error: Option<FeedError>,
    pending: HashMap<u64, Pending>,
    snapshot: watch::Sender<FeedSnapshot>,
    done: mpsc::UnboundedSender<Resolved>,
}

impl Core {
    pub fn spawn(api: ApiGateway, log: Log) -> (FeedController, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let (done, mut done_rx) = mpsc::unbounded_channel();
        let (snapshot, _) = watch::channel(FeedSnapshot::default());

        let mut core = Self {
            api: api.clone(),
            log,
            filter: FilterState::new(),
            cursor: PageCursor::default(),
            generation: 0,
            items: Vec::new(),
            error: None,
            pending: HashMap::new(),
            snapshot,
            done,
        };

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    message = rx.recv() => match message {
                        Some(message) => core.handle(message),
                        None => break,
                    },
                    Some(resolved) = done_rx.recv() => core.resolve(resolved),
                }
            }
        });

        (FeedController { sender: tx, api }, handle)
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::LoadPage { mode, tx } => self.load_page(mode, tx),
            Message::SetSearch { text, tx } => {
                self.filter.set_search(&text);
                self.filter_changed();
                let _ = tx.send(());
            }
            Message::SetCategory { id, tx } => {
                self.filter.set_category(id);
                self.filter_changed();
                let _ = tx.send(());
            }
            Message::SetPlatform { id, tx } => {
                self.filter.set_platform(id);
                self.filter_changed();
                let _ = tx.send(());
            }
            Message::Filters { tx } => {
                let _ = tx.send(self.filter.current());
            }
            Message::SubscribeFilters { tx } => {
                let _ = tx.send(self.filter.subscribe());
            }
            Message::SetOptions {
                categories,
                platforms,
                tx,
            } => {
                let _ = tx.send(self.set_options(categories, platforms));
            }
            Message::Options { tx } => {
                let _ = tx.send((
                    self.filter.categories().to_vec(),
                    self.filter.platforms().to_vec(),
                ));
            }
            Message::Snapshot { tx } => {
                let _ = tx.send(self.snapshot.borrow().clone());
            }
            Message::Subscribe { tx } => {
                let _ = tx.send(self.snapshot.subscribe());
            }
        }
    }

    /// Whether a fetch for the current generation is in flight.
    fn loading(&self) -> bool {
        self.pending.contains_key(&self.generation)
    }

    fn load_page(&mut self, mode: LoadMode, tx: oneshot::Sender<FeedOutcome>) {
        let page = match mode {
            LoadMode::Replace => {
                self.cursor = PageCursor::default();
                1
            }
            LoadMode::Append => {
                if self.loading() {
                    let _ = tx.send(FeedOutcome::Busy);
                    return;
                }
                if !self.cursor.has_next {
                    let _ = tx.send(FeedOutcome::Exhausted);
                    return;
                }
                self.cursor.page + 1
            }
        };

        self.generation += 1;
        let generation = self.generation;
        let request = self.filter.current().request(page);
        self.log.info(
            SCOPE,
            format!("Fetching page {} ({:?}, generation {})", page, mode, generation),
        );

        self.pending.insert(generation, Pending { mode, page, tx });
        let api = self.api.clone();
        let done = self.done.clone();
        tokio::spawn(async move {
            let result = api.products(request).await;
            let _ = done.send(Resolved { generation, result });
        });

        self.publish();
    }

    fn resolve(&mut self, resolved: Resolved) {
        let Some(pending) = self.pending.remove(&resolved.generation) else {
            return;
        };

        if resolved.generation != self.generation {
            self.log.info(
                SCOPE,
                format!(
                    "Dropping stale page {} of generation {} (current {})",
                    pending.page, resolved.generation, self.generation
                ),
            );
            let _ = pending.tx.send(FeedOutcome::Superseded);
            self.publish();
            return;
        }

        let outcome = match resolved.result {
            Ok(page) => {
                let added = page.items.len();
                match pending.mode {
                    LoadMode::Replace => self.items = page.items,
                    LoadMode::Append => self.items.extend(page.items),
                }
                self.cursor = PageCursor {
                    page: pending.page,
                    has_next: page.has_next,
                };
                self.error = None;
                FeedOutcome::Loaded {
                    generation: resolved.generation,
                    page: pending.page,
                    added,
                    has_next: page.has_next,
                }
            }
            Err(err) => {
                let err = FeedError::from(err);
                self.log.warn(
                    SCOPE,
                    format!("Loading page {} failed: {}", pending.page, err),
                );
                if pending.mode == LoadMode::Replace {
                    self.items.clear();
                    self.cursor = PageCursor::default();
                }
                self.error = Some(err.clone());
                FeedOutcome::Failed(err)
            }
        };

        let _ = pending.tx.send(outcome);
        self.publish();
    }

    /// Restarts pagination, drops the items of the previous selection and
    /// invalidates in-flight fetches.
    fn filter_changed(&mut self) {
        self.items.clear();
        self.error = None;
        self.cursor = PageCursor::default();
        self.generation += 1;
        self.publish();
    }

    fn set_options(
        &mut self,
        categories: Result<Vec<Category>, ApiError>,
        platforms: Result<Vec<Platform>, ApiError>,
    ) -> OptionsReport {
        let mut report = OptionsReport::default();

        match categories {
            Ok(categories) => {
                report.categories = categories.len();
                self.filter.set_categories(categories);
            }
            Err(err) => {
                self.log
                    .warn(SCOPE, format!("Loading categories failed: {}", err));
                self.filter.set_categories(Vec::new());
                report.errors.push(err.into());
            }
        }
        match platforms {
            Ok(platforms) => {
                report.platforms = platforms.len();
                self.filter.set_platforms(platforms);
            }
            Err(err) => {
                self.log
                    .warn(SCOPE, format!("Loading platforms failed: {}", err));
                self.filter.set_platforms(Vec::new());
                report.errors.push(err.into());
            }
        }

        report
    }

    fn publish(&self) {
        let snapshot = FeedSnapshot {
            items: self.items.clone().into(),
            cursor: self.cursor,
            generation: self.generation,
            error: self.error.clone(),
            loading: self.loading(),
        };
        self.snapshot.send_replace(snapshot);
    }
}
