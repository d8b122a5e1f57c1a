use tokio::sync::oneshot::Sender;

use crate::ArcStr;

/// Messages that can be sent to a net [`Core`](super::core::Core) actor.
#[derive(Debug)]
pub enum Message {
    /// Performs an HTTP GET request and replies with the response body
    Get {
        url: ArcStr,
        tx: Sender<anyhow::Result<ArcStr>>,
    },
}
