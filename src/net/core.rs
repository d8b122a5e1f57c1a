use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use tokio::task::JoinHandle;

use crate::{
    ArcStr,
    log::Log,
    net::{Net, message::Message},
};

const SCOPE: &str = "net";

/// The core of the networking system that handles HTTP requests.
///
/// Wraps a pooled `reqwest` client configured with a per-request timeout.
/// Each request runs in its own task, so a slow response never holds back
/// the ones issued after it.
#[derive(Debug)]
pub struct Core {
    /// Logging interface for operation logging
    log: Log,
    /// HTTP client for making requests
    client: Client,
}

impl Core {
    /// Creates a new networking core whose requests time out after `timeout`.
    pub fn new(log: Log, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Building HTTP client")?;

        Ok(Self { log, client })
    }

    /// Transforms the networking core instance into an actor.
    pub fn spawn(self) -> (Net, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Get { url, tx } => {
                        let client = self.client.clone();
                        let log = self.log.clone();
                        tokio::spawn(async move {
                            let response = Self::handle_get_request(&client, &url)
                                .await
                                .with_context(|| format!("GET request failed for URL: {}", url));
                            let _ = tx.send(log.warn_on_error(SCOPE, response));
                        });
                    }
                }
            }
        });

        (Net::Actual(tx), handle)
    }

    /// Performs a GET request, treating any non-success status as an error.
    async fn handle_get_request(client: &Client, url: &str) -> anyhow::Result<ArcStr> {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("Sending GET request")?
            .error_for_status()
            .context("Server answered with an error status")?;
        let text = response.text().await.context("Reading response body")?;
        Ok(ArcStr::from(text))
    }
}
