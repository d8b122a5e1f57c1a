use std::collections::HashMap;
use std::time::Duration;

use super::*;
use crate::config::Data;

#[tokio::test]
async fn test_mock_serves_canned_responses() {
    let url = ArcStr::from("http://api.test/api/v1/stats");
    let net = Net::mock(HashMap::from([(
        url.clone(),
        MockResponse::ok(r#"{"total_products": 3}"#),
    )]));

    let body = net.get(url.clone()).await.unwrap();
    assert_eq!(&*body, r#"{"total_products": 3}"#);
    assert_eq!(net.recorded_requests().unwrap(), vec![url]);
}

#[tokio::test]
async fn test_mock_unknown_url_and_error_status_fail() {
    let net = Net::mock_empty();
    let missing = net.get(ArcStr::from("http://api.test/missing")).await;
    assert!(missing.unwrap_err().to_string().contains("404"));

    let url = ArcStr::from("http://api.test/boom");
    net.mock_insert(url.clone(), MockResponse::status(500));
    assert!(net.get(url).await.unwrap_err().to_string().contains("500"));
}

#[tokio::test(start_paused = true)]
async fn test_mock_delay_orders_completions() {
    let slow = ArcStr::from("http://api.test/slow");
    let fast = ArcStr::from("http://api.test/fast");
    let net = Net::mock(HashMap::from([
        (
            slow.clone(),
            MockResponse::ok("slow").delayed(Duration::from_millis(200)),
        ),
        (fast.clone(), MockResponse::ok("fast")),
    ]));

    let (a, b) = tokio::join!(net.get(slow), net.get(fast));
    assert_eq!(&*a.unwrap(), "slow");
    assert_eq!(&*b.unwrap(), "fast");
}

#[tokio::test]
async fn test_actual_net_reports_unreachable_host() {
    let config = Config::mock(Data::default());
    config.set_usize(USizeOpt::Timeout, 1).await;
    let net = Net::spawn(config, Log::mock()).await.unwrap();
    assert!(matches!(net, Net::Actual(_)));
    assert_eq!(net.recorded_requests(), None);

    // Port 9 (discard) on localhost is not expected to speak HTTP
    let result = net.get(ArcStr::from("http://127.0.0.1:9/api/v1/stats")).await;
    assert!(result.is_err());
}
