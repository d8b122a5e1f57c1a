use tokio::sync::{oneshot::Sender, watch};

use super::data::{FeedOutcome, FeedSnapshot, LoadMode, OptionsReport};
use crate::{
    ArcStr,
    api::{ApiError, Category, Id, Platform, ProductPage},
    filter::FilterSnapshot,
};

/// Messages that can be sent to a feed [`Core`](super::core::Core) actor.
#[derive(Debug)]
pub enum Message {
    LoadPage {
        mode: LoadMode,
        tx: Sender<FeedOutcome>,
    },
    SetSearch {
        text: ArcStr,
        tx: Sender<()>,
    },
    SetCategory {
        id: Option<Id>,
        tx: Sender<()>,
    },
    SetPlatform {
        id: Option<Id>,
        tx: Sender<()>,
    },
    Filters {
        tx: Sender<FilterSnapshot>,
    },
    SubscribeFilters {
        tx: Sender<watch::Receiver<FilterSnapshot>>,
    },
    /// Installs freshly fetched option lists
    SetOptions {
        categories: Result<Vec<Category>, ApiError>,
        platforms: Result<Vec<Platform>, ApiError>,
        tx: Sender<OptionsReport>,
    },
    Options {
        tx: Sender<(Vec<Category>, Vec<Platform>)>,
    },
    Snapshot {
        tx: Sender<FeedSnapshot>,
    },
    Subscribe {
        tx: Sender<watch::Receiver<FeedSnapshot>>,
    },
}

/// Completion of a fetch task, reported back to the actor.
#[derive(Debug)]
pub struct Resolved {
    pub generation: u64,
    pub result: Result<ProductPage, ApiError>,
}
