use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{
    ArcStr,
    cache::{RequestKey, SessionCache},
    log::Log,
    net::Net,
};
pub use data::{
    Category, Id, PLACEHOLDER_IMAGE, Platform, PlatformStats, PricePoint, Product, ProductDetail,
    ProductPage, Stats, parse_price,
};
pub use endpoint::{Endpoint, FeedRequest};
pub use error::{ApiError, ApiFailure};
use message::Message;

mod core;
mod data;
mod endpoint;
mod error;
mod message;
mod mock;

/// Gateway to the price tracker's versioned REST API.
///
/// Every request is first looked up in the [`SessionCache`]; only misses reach
/// the network, and successful responses are cached before being returned.
/// All failures collapse into a single [`ApiFailure`]. Nothing is retried.
///
/// # Examples
/// ```ignore
/// let api = ApiGateway::spawn(net, cache, log, ArcStr::from("http://localhost:5000/api/v1"));
/// let page = api.products(FeedRequest::default()).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or mock reference.
#[derive(Debug, Clone)]
pub enum ApiGateway {
    Actual(Sender<Message>),
    Mock(mock::Mock),
}

impl ApiGateway {
    /// Spawns a gateway rooted at `root`, e.g. `http://localhost:5000/api/v1`.
    pub fn spawn(net: Net, cache: SessionCache, log: Log, root: ArcStr) -> Self {
        let (api, _) = core::Core::new(net, cache, log, root).spawn();
        api
    }

    /// Creates a mock gateway with no canned responses.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::default())
    }

    /// Cans `value` as the response to `endpoint` on a mock. No-op otherwise.
    pub fn mock_respond(&self, endpoint: &Endpoint, value: Value) {
        self.mock_route(endpoint, Ok(value), Duration::ZERO);
    }

    /// Like [`ApiGateway::mock_respond`], answering only after `delay`.
    pub fn mock_respond_after(&self, endpoint: &Endpoint, value: Value, delay: Duration) {
        self.mock_route(endpoint, Ok(value), delay);
    }

    /// Makes requests to `endpoint` fail on a mock. No-op otherwise.
    pub fn mock_fail(&self, endpoint: &Endpoint, message: &str) {
        self.mock_route(endpoint, Err(ArcStr::from(message)), Duration::ZERO);
    }

    fn mock_route(&self, endpoint: &Endpoint, response: Result<Value, ArcStr>, delay: Duration) {
        if let Self::Mock(mock) = self {
            mock.route(endpoint.key(), response, delay);
        }
    }

    /// Number of requests a mock received for `endpoint`, always 0 otherwise.
    pub fn mock_hits(&self, endpoint: &Endpoint) -> usize {
        match self {
            Self::Mock(mock) => mock.hits(&endpoint.key()),
            Self::Actual(_) => 0,
        }
    }

    /// Issues a request and returns the raw JSON response.
    pub async fn request(&self, endpoint: Endpoint) -> Result<Value, ApiFailure> {
        match self {
            Self::Actual(sender) => {
                let key = endpoint.key();
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Request { endpoint, tx })
                    .await
                    .map_err(|_| ApiFailure::new(key.clone(), "API gateway actor died"))?;
                rx.await
                    .map_err(|_| ApiFailure::new(key, "API gateway actor died"))?
            }
            Self::Mock(mock) => mock.request(endpoint).await,
        }
    }

    /// Issues a request and decodes the response into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let key: RequestKey = endpoint.key();
        let value = self.request(endpoint).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Malformed {
            endpoint: key,
            message: ArcStr::from(e.to_string()),
        })
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch(Endpoint::Categories).await
    }

    pub async fn platforms(&self) -> Result<Vec<Platform>, ApiError> {
        self.fetch(Endpoint::Platforms).await
    }

    pub async fn products(&self, request: FeedRequest) -> Result<ProductPage, ApiError> {
        self.fetch(Endpoint::Products(request)).await
    }

    pub async fn product(&self, id: Id) -> Result<ProductDetail, ApiError> {
        self.fetch(Endpoint::Product(id)).await
    }

    pub async fn product_prices(&self, id: Id) -> Result<Vec<PricePoint>, ApiError> {
        self.fetch(Endpoint::ProductPrices(id)).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.fetch(Endpoint::Stats).await
    }
}
