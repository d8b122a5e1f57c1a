use std::sync::Arc;

use thiserror::Error;

use crate::{
    ArcStr,
    api::{ApiError, ApiFailure, Product},
    cache::RequestKey,
};

/// How a loaded page is merged into the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Start over from page 1 and discard previous items on success
    Replace,
    /// Fetch the page after the cursor and concatenate it
    Append,
}

/// Position of the feed in the server's pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Last page applied to the feed, starting at 1
    pub page: u32,
    pub has_next: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            has_next: true,
        }
    }
}

/// Why a page could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error(transparent)]
    Transport(ApiFailure),
    #[error("malformed response from {endpoint}: {message}")]
    Malformed {
        endpoint: RequestKey,
        message: ArcStr,
    },
    #[error("feed controller stopped")]
    Stopped,
}

impl From<ApiError> for FeedError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Failure(failure) => Self::Transport(failure),
            ApiError::Malformed { endpoint, message } => Self::Malformed { endpoint, message },
        }
    }
}

/// Result of a [`load_page`](super::FeedController::load_page) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The page was applied to the feed
    Loaded {
        generation: u64,
        page: u32,
        added: usize,
        has_next: bool,
    },
    /// A newer fetch or a filter change made this result stale; it was dropped
    Superseded,
    /// Append was requested but the server has no further page
    Exhausted,
    /// Append was requested while a fetch for the current filter is in flight
    Busy,
    Failed(FeedError),
}

/// What a renderer needs to draw the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub items: Arc<[Product]>,
    pub cursor: PageCursor,
    pub generation: u64,
    /// Error of the last failed fetch, cleared by the next success
    pub error: Option<FeedError>,
    pub loading: bool,
}

/// Outcome of loading the category and platform option lists.
///
/// A failed list stays empty and its error is kept here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsReport {
    pub categories: usize,
    pub platforms: usize,
    pub errors: Vec<FeedError>,
}
