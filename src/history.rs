use chrono::{DateTime, Utc};

use crate::{
    ArcStr,
    api::{ApiError, ApiGateway, Id, ProductDetail},
};

/// Currency every price is quoted in.
pub const CURRENCY: &str = "KES";

/// Formats an amount as `KES 1,234.00`.
pub fn format_price(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{CURRENCY} {sign}{grouped}.{cents}")
}

/// Summary of a product's price history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub current: f64,
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
}

impl PriceStats {
    /// Computes the statistics over the recorded history. Without history
    /// every figure is the current price.
    pub fn from_detail(detail: &ProductDetail) -> Self {
        let current = detail.product.current_price;
        let prices: Vec<f64> = detail.price_history.iter().map(|p| p.price).collect();
        if prices.is_empty() {
            return Self {
                current,
                lowest: current,
                highest: current,
                average: current,
            };
        }

        Self {
            current,
            lowest: prices.iter().copied().fold(f64::INFINITY, f64::min),
            highest: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            average: prices.iter().sum::<f64>() / prices.len() as f64,
        }
    }
}

/// One line of a price chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: ArcStr,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl Series {
    pub fn of(detail: &ProductDetail) -> Self {
        Self {
            name: detail.product.name.clone(),
            points: detail
                .price_history
                .iter()
                .map(|p| (p.timestamp, p.price))
                .collect(),
        }
    }
}

/// Two products side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub first: ProductDetail,
    pub second: ProductDetail,
}

impl Comparison {
    /// Fetches both products concurrently. Fails if either fetch fails.
    pub async fn load(api: &ApiGateway, first: Id, second: Id) -> Result<Self, ApiError> {
        let (first, second) = tokio::try_join!(api.product(first), api.product(second))?;
        Ok(Self { first, second })
    }

    pub fn series(&self) -> [Series; 2] {
        [Series::of(&self.first), Series::of(&self.second)]
    }

    pub fn stats(&self) -> [PriceStats; 2] {
        [
            PriceStats::from_detail(&self.first),
            PriceStats::from_detail(&self.second),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::api::Endpoint;

    fn detail_json(id: u64, history: &[f64]) -> Value {
        let history: Vec<Value> = history
            .iter()
            .enumerate()
            .map(|(day, price)| {
                json!({"timestamp": format!("2024-05-{:02}T08:00:00", day + 1), "price": price})
            })
            .collect();
        json!({
            "id": id,
            "name": format!("Phone {id}"),
            "current_price": "KES 1,100.00",
            "platform": "Kilimall",
            "url": "https://shop.test",
            "price_history": history,
        })
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1234.0), "KES 1,234.00");
        assert_eq!(format_price(999.5), "KES 999.50");
        assert_eq!(format_price(1_234_567.891), "KES 1,234,567.89");
        assert_eq!(format_price(0.0), "KES 0.00");
        assert_eq!(format_price(-1500.0), "KES -1,500.00");
    }

    #[test]
    fn test_stats_over_history() {
        let detail: ProductDetail =
            serde_json::from_value(detail_json(1, &[1000.0, 1200.0, 800.0])).unwrap();
        let stats = PriceStats::from_detail(&detail);
        assert_eq!(stats.current, 1100.0);
        assert_eq!(stats.lowest, 800.0);
        assert_eq!(stats.highest, 1200.0);
        assert_eq!(stats.average, 1000.0);
    }

    #[test]
    fn test_stats_without_history_use_current_price() {
        let detail: ProductDetail = serde_json::from_value(detail_json(1, &[])).unwrap();
        let stats = PriceStats::from_detail(&detail);
        assert_eq!(stats.lowest, 1100.0);
        assert_eq!(stats.highest, 1100.0);
        assert_eq!(stats.average, 1100.0);
    }

    #[tokio::test]
    async fn test_comparison_loads_both_products() {
        let api = ApiGateway::mock();
        api.mock_respond(&Endpoint::Product(1), detail_json(1, &[10.0, 12.0]));
        api.mock_respond(&Endpoint::Product(2), detail_json(2, &[20.0]));

        let comparison = Comparison::load(&api, 1, 2).await.unwrap();
        let [a, b] = comparison.series();
        assert_eq!(&*a.name, "Phone 1");
        assert_eq!(a.points.len(), 2);
        assert_eq!(b.points[0].1, 20.0);
        assert_eq!(comparison.stats()[1].highest, 20.0);
    }

    #[tokio::test]
    async fn test_comparison_fails_when_either_product_fails() {
        let api = ApiGateway::mock();
        api.mock_respond(&Endpoint::Product(1), detail_json(1, &[10.0]));
        api.mock_fail(&Endpoint::Product(2), "404 Not Found");

        assert!(Comparison::load(&api, 1, 2).await.is_err());
    }
}
