use tokio::sync::{mpsc::Sender, oneshot, watch};

use crate::{
    ArcStr,
    api::{ApiGateway, Category, Id, Platform},
    filter::FilterSnapshot,
    log::Log,
};
pub use data::{FeedError, FeedOutcome, FeedSnapshot, LoadMode, OptionsReport, PageCursor};
use message::Message;

mod core;
mod data;
mod message;
#[cfg(test)]
mod tests;

/// Controller of the incremental product feed.
///
/// Merges the filter selection into feed queries, loads pages in
/// [`LoadMode::Replace`] or [`LoadMode::Append`] mode and publishes the
/// resulting [`FeedSnapshot`] to subscribers. Results of fetches overtaken by
/// a newer fetch or by a filter change are never applied.
///
/// # Examples
/// ```ignore
/// let feed = FeedController::spawn(api, log);
/// feed.set_search("phone").await;
/// feed.load_page(LoadMode::Replace).await;
/// feed.load_page(LoadMode::Append).await;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender.
#[derive(Debug, Clone)]
pub struct FeedController {
    sender: Sender<Message>,
    api: ApiGateway,
}

impl FeedController {
    pub fn spawn(api: ApiGateway, log: Log) -> Self {
        let (feed, _) = core::Core::spawn(api, log);
        feed
    }

    /// Sends a message built around a fresh reply channel and awaits the reply.
    async fn ask<T>(&self, message: impl FnOnce(oneshot::Sender<T>) -> Message) -> Option<T> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(message(tx)).await.ok()?;
        rx.await.ok()
    }

    /// Loads a page and reports how it was merged into the feed.
    pub async fn load_page(&self, mode: LoadMode) -> FeedOutcome {
        self.ask(|tx| Message::LoadPage { mode, tx })
            .await
            .unwrap_or(FeedOutcome::Failed(FeedError::Stopped))
    }

    /// Sets the search text and restarts pagination. Blank text clears it.
    pub async fn set_search(&self, text: &str) {
        let text = ArcStr::from(text);
        self.ask(|tx| Message::SetSearch { text, tx }).await;
    }

    pub async fn set_category(&self, id: Option<Id>) {
        self.ask(|tx| Message::SetCategory { id, tx }).await;
    }

    pub async fn set_platform(&self, id: Option<Id>) {
        self.ask(|tx| Message::SetPlatform { id, tx }).await;
    }

    pub async fn filters(&self) -> FilterSnapshot {
        self.ask(|tx| Message::Filters { tx })
            .await
            .unwrap_or_default()
    }

    /// Notifies on every change of the filter selection.
    pub async fn subscribe_filters(&self) -> Option<watch::Receiver<FilterSnapshot>> {
        self.ask(|tx| Message::SubscribeFilters { tx }).await
    }

    /// Fetches the category and platform option lists concurrently.
    ///
    /// A list whose fetch fails is left empty and its error reported; this
    /// never prevents the feed itself from loading.
    pub async fn load_filter_options(&self) -> OptionsReport {
        let (categories, platforms) =
            tokio::join!(self.api.categories(), self.api.platforms());
        self.ask(|tx| Message::SetOptions {
            categories,
            platforms,
            tx,
        })
        .await
        .unwrap_or_else(|| OptionsReport {
            errors: vec![FeedError::Stopped],
            ..Default::default()
        })
    }

    pub async fn options(&self) -> (Vec<Category>, Vec<Platform>) {
        self.ask(|tx| Message::Options { tx })
            .await
            .unwrap_or_default()
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.ask(|tx| Message::Snapshot { tx })
            .await
            .unwrap_or_default()
    }

    /// Receives a new [`FeedSnapshot`] whenever the feed changes.
    pub async fn subscribe(&self) -> Option<watch::Receiver<FeedSnapshot>> {
        self.ask(|tx| Message::Subscribe { tx }).await
    }
}
