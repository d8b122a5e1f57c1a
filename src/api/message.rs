use serde_json::Value;
use tokio::sync::oneshot::Sender;

use super::{endpoint::Endpoint, error::ApiFailure};

/// Messages that can be sent to an API gateway [`Core`](super::core::Core) actor.
#[derive(Debug)]
pub enum Message {
    Request {
        endpoint: Endpoint,
        tx: Sender<Result<Value, ApiFailure>>,
    },
}
