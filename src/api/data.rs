use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error};

use crate::ArcStr;

/// Server-side identifier of categories, platforms and products.
pub type Id = u64;

/// Image shown for products the server has no picture of.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: ArcStr,
    #[serde(default)]
    pub product_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: Id,
    pub name: ArcStr,
    #[serde(default)]
    pub url: Option<ArcStr>,
    #[serde(default)]
    pub product_count: Option<u64>,
}

/// A product as listed in the feed.
///
/// The server may send `current_price` either as a number or preformatted
/// (`"KES 1,234.00"`), and may name the platform field `platform_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: ArcStr,
    #[serde(deserialize_with = "deserialize_price")]
    pub current_price: f64,
    #[serde(alias = "platform_name")]
    pub platform: ArcStr,
    pub url: ArcStr,
    #[serde(default)]
    pub image_url: Option<ArcStr>,
    #[serde(default)]
    pub category: Option<ArcStr>,
}

impl Product {
    /// The product image, or [`PLACEHOLDER_IMAGE`] when there is none.
    pub fn image(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

/// A single observation in a product's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

/// A product together with its description and price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub description: Option<ArcStr>,
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
}

/// One page of the product feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPage")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub has_next: bool,
    pub total: Option<u64>,
}

/// Wire shape of a page: either `{items, has_next}` or the paginator form
/// `{items, current_page, pages, total}`.
#[derive(Deserialize)]
struct RawPage {
    items: Vec<Product>,
    has_next: Option<bool>,
    current_page: Option<u64>,
    pages: Option<u64>,
    total: Option<u64>,
}

impl TryFrom<RawPage> for ProductPage {
    type Error = String;

    fn try_from(raw: RawPage) -> Result<Self, Self::Error> {
        let has_next = match (raw.has_next, raw.current_page, raw.pages) {
            (Some(has_next), _, _) => has_next,
            (None, Some(current), Some(pages)) => current < pages,
            _ => return Err("page carries neither has_next nor current_page/pages".into()),
        };
        Ok(Self {
            items: raw.items,
            has_next,
            total: raw.total,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStats {
    pub name: ArcStr,
    pub url: Option<ArcStr>,
    pub total_products: u64,
}

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_products: u64,
    pub platforms: u64,
    pub categories: u64,
    pub platform_stats: BTreeMap<ArcStr, PlatformStats>,
    /// Products whose price rose during the last day
    pub price_increases: u64,
    /// Products whose price fell during the last day
    pub price_decreases: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

/// Parses `"KES 1,234.00"`-style strings by dropping everything that is not
/// part of the number.
pub fn parse_price(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().ok()
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => Ok(n),
        RawPrice::Text(text) => {
            parse_price(&text).ok_or_else(|| D::Error::custom(format!("invalid price {text:?}")))
        }
    }
}

/// Accepts RFC 3339 and the naive ISO 8601 form the server emits, which is
/// taken to be UTC.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let text = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&text) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| D::Error::custom(format!("invalid timestamp {text:?}: {e}")))
}
