use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::ArcStr;

/// A canned HTTP response served by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: ArcStr,
    pub delay: Duration,
}

impl MockResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<ArcStr>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// An empty response with the given status code.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: ArcStr::from(""),
            delay: Duration::ZERO,
        }
    }

    /// Delays the response by `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock implementation of the Net actor for testing purposes.
///
/// Serves predefined responses keyed by URL and records every URL requested,
/// allowing tests to run without network access and to count round trips.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    responses: Arc<Mutex<HashMap<ArcStr, MockResponse>>>,
    requests: Arc<Mutex<Vec<ArcStr>>>,
}

impl Mock {
    pub fn new(responses: HashMap<ArcStr, MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::default(),
        }
    }

    pub fn insert(&self, url: ArcStr, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url, response);
    }

    pub fn requests(&self) -> Vec<ArcStr> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn get(&self, url: ArcStr) -> anyhow::Result<ArcStr> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&url)
            .cloned()
            .unwrap_or_else(|| MockResponse::status(404));

        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        if !(200..300).contains(&response.status) {
            anyhow::bail!("HTTP status {} for URL: {}", response.status, url);
        }
        Ok(response.body)
    }
}
