use std::sync::{Arc, Mutex, PoisonError};

use crate::log::{LogLevel, LogMessage};

/// Mock implementation of the Log actor for testing purposes.
///
/// Messages are stored in memory in the order they were logged, so tests can
/// assert on what a component reported.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl Mock {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogMessage {
                level,
                scope,
                message,
            });
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
