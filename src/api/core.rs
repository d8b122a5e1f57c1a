use serde_json::Value;
use tokio::task::JoinHandle;

use super::{ApiGateway, endpoint::Endpoint, error::ApiFailure, message::Message};
use crate::{ArcStr, cache::SessionCache, log::Log, net::Net};

const SCOPE: &str = "api";

/// The core of the API gateway.
///
/// Resolves endpoints against the versioned API root, answers from the
/// session cache when it can and otherwise goes through the networking actor.
/// Each request is served by its own task so responses may complete in any
/// order.
#[derive(Debug, Clone)]
pub struct Core {
    net: Net,
    cache: SessionCache,
    log: Log,
    /// Version-namespaced API root without a trailing slash
    root: ArcStr,
}

impl Core {
    pub fn new(net: Net, cache: SessionCache, log: Log, root: ArcStr) -> Self {
        let root = ArcStr::from(root.trim_end_matches('/'));
        Self {
            net,
            cache,
            log,
            root,
        }
    }

    pub fn spawn(self) -> (ApiGateway, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Request { endpoint, tx } => {
                        let core = self.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(core.handle_request(endpoint).await);
                        });
                    }
                }
            }
        });

        (ApiGateway::Actual(tx), handle)
    }

    async fn handle_request(&self, endpoint: Endpoint) -> Result<Value, ApiFailure> {
        let key = endpoint.key();

        if let Some(value) = self.cache.get(key.clone()).await {
            self.log.info(SCOPE, format!("Cache hit for {}", key));
            return Ok(value);
        }

        let url = ArcStr::from(format!("{}/{}", self.root, key));
        let result = async {
            let body = self
                .net
                .get(url)
                .await
                .map_err(|e| ApiFailure::new(key.clone(), format!("{:#}", e)))?;
            serde_json::from_str::<Value>(&body)
                .map_err(|e| ApiFailure::new(key.clone(), format!("invalid JSON: {}", e)))
        }
        .await;

        let value = self.log.warn_on_error(SCOPE, result)?;
        self.cache.put(key, value.clone()).await;
        Ok(value)
    }
}
