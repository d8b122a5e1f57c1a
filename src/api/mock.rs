use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;

use super::{endpoint::Endpoint, error::ApiFailure};
use crate::{ArcStr, cache::RequestKey};

#[derive(Debug, Clone)]
struct Route {
    response: Result<Value, ArcStr>,
    delay: Duration,
}

/// Mock implementation of the API gateway for testing purposes.
///
/// Serves canned JSON per [`RequestKey`], optionally after a delay, and
/// counts how often each key was requested. Unknown keys fail.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    routes: Arc<Mutex<HashMap<RequestKey, Route>>>,
    hits: Arc<Mutex<HashMap<RequestKey, usize>>>,
}

impl Mock {
    pub fn route(&self, key: RequestKey, response: Result<Value, ArcStr>, delay: Duration) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Route { response, delay });
    }

    pub fn hits(&self, key: &RequestKey) -> usize {
        self.hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    pub async fn request(&self, endpoint: Endpoint) -> Result<Value, ApiFailure> {
        let key = endpoint.key();
        *self
            .hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default() += 1;

        let route = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        let Some(route) = route else {
            return Err(ApiFailure::new(key, "no canned response"));
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        route
            .response
            .map_err(|message| ApiFailure { endpoint: key, message })
    }
}
