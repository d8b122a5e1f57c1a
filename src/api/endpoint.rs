use crate::{ArcStr, cache::RequestKey};

use super::data::Id;

/// Query of one product feed page. Unset constraints are never sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedRequest {
    pub page: u32,
    pub search: Option<ArcStr>,
    pub category_id: Option<Id>,
    pub platform_id: Option<Id>,
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            category_id: None,
            platform_id: None,
        }
    }
}

impl FeedRequest {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.to_string()));
        }
        if let Some(id) = self.category_id {
            params.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.platform_id {
            params.push(("platform_id", id.to_string()));
        }
        params
    }
}

/// REST resources exposed under the API root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Categories,
    Platforms,
    Products(FeedRequest),
    Product(Id),
    ProductPrices(Id),
    Stats,
}

impl Endpoint {
    pub fn key(&self) -> RequestKey {
        const NONE: [(&str, String); 0] = [];
        match self {
            Self::Categories => RequestKey::new("categories", NONE),
            Self::Platforms => RequestKey::new("platforms", NONE),
            Self::Products(req) => RequestKey::new("products", req.params()),
            Self::Product(id) => RequestKey::new(&format!("products/{id}"), NONE),
            Self::ProductPrices(id) => RequestKey::new(&format!("products/{id}/prices"), NONE),
            Self::Stats => RequestKey::new("stats", NONE),
        }
    }
}
