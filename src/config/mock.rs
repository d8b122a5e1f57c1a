use std::sync::Arc;

use tokio::sync::Mutex;

use super::data::Data;

/// Mock implementation of the Config actor for testing purposes.
///
/// Stores configuration data in memory; load and save are no-ops.
#[derive(Debug, Clone)]
pub struct Mock {
    data: Arc<Mutex<Data>>,
}

impl Mock {
    pub fn new(data: Data) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `f` against the stored data.
    pub async fn with<T>(&self, f: impl FnOnce(&mut Data) -> T) -> T {
        let mut data = self.data.lock().await;
        f(&mut data)
    }
}
