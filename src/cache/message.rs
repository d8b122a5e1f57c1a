use serde_json::Value;
use tokio::sync::oneshot::Sender;

use super::key::RequestKey;

/// Messages that can be sent to a session cache [`Core`](super::core::Core) actor.
#[derive(Debug)]
pub enum Message {
    Get {
        key: RequestKey,
        tx: Sender<Option<Value>>,
    },
    /// Stores a value and writes the session file through
    Put {
        key: RequestKey,
        value: Value,
        tx: Sender<()>,
    },
    Len {
        tx: Sender<usize>,
    },
    /// Drops every entry, keeping the session open
    Clear {
        tx: Sender<()>,
    },
    /// Drops every entry and deletes the session file
    EndSession {
        tx: Sender<anyhow::Result<()>>,
    },
}
