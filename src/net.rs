use std::{collections::HashMap, time::Duration};

use anyhow::Context;
use tokio::sync::mpsc::Sender;

use crate::{
    ArcStr,
    config::{Config, USizeOpt},
    log::Log,
    net::{core::Core, message::Message},
};

mod core;
pub mod message;
mod mock;
#[cfg(test)]
mod tests;

pub use mock::MockResponse;

/// The networking actor that provides a thread-safe interface for HTTP requests.
///
/// This enum represents either a real networking actor or a mock implementation
/// for testing purposes.
///
/// # Examples
/// ```ignore
/// let net = Net::spawn(config, log).await?;
/// let body = net.get(ArcStr::from("http://localhost:5000/api/v1/stats")).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum Net {
    /// A real networking actor that performs HTTP requests
    Actual(Sender<Message>),
    /// A mock implementation for testing
    Mock(mock::Mock),
}

impl Net {
    /// Creates a new networking instance and spawns its actor.
    ///
    /// The request timeout is read from [`USizeOpt::Timeout`].
    pub async fn spawn(config: Config, log: Log) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.usize(USizeOpt::Timeout).await.max(1) as u64);
        let (net, _) = Core::new(log, timeout)?.spawn();
        Ok(net)
    }

    /// Creates a mock serving `responses`, keyed by full URL.
    pub fn mock(responses: HashMap<ArcStr, MockResponse>) -> Self {
        Self::Mock(mock::Mock::new(responses))
    }

    /// Creates a mock that answers every request with `404`.
    pub fn mock_empty() -> Self {
        Self::Mock(mock::Mock::default())
    }

    /// Performs an HTTP GET request to the specified URL.
    ///
    /// # Returns
    /// The response body, or an error for transport failures, timeouts and
    /// non-success status codes.
    pub async fn get(&self, url: ArcStr) -> anyhow::Result<ArcStr> {
        match self {
            Net::Actual(sender) => {
                let (tx, rx) = tokio::sync::oneshot::channel();
                sender
                    .send(Message::Get { url, tx })
                    .await
                    .context("Sending message to Net actor")?;
                rx.await.context("Awaiting response from Net actor")?
            }
            Net::Mock(mock) => mock.get(url).await,
        }
    }

    /// Registers or replaces a canned response on a mock. No-op otherwise.
    pub fn mock_insert(&self, url: ArcStr, response: MockResponse) {
        if let Net::Mock(mock) = self {
            mock.insert(url, response);
        }
    }

    /// URLs requested from a mock so far, `None` for a real actor.
    pub fn recorded_requests(&self) -> Option<Vec<ArcStr>> {
        match self {
            Net::Mock(mock) => Some(mock.requests()),
            Net::Actual(_) => None,
        }
    }
}
