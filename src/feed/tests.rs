use std::time::Duration;

use serde_json::{Value, json};

use super::*;
use crate::api::{Endpoint, FeedRequest};

fn products(
    page: u32,
    search: Option<&str>,
    category: Option<u64>,
    platform: Option<u64>,
) -> Endpoint {
    Endpoint::Products(FeedRequest {
        page,
        search: search.map(ArcStr::from),
        category_id: category,
        platform_id: platform,
    })
}

fn page_json(ids: &[u64], has_next: bool) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Product {id}"),
                "current_price": 100 * id,
                "platform": "Jumia",
                "url": format!("https://shop.test/{id}"),
            })
        })
        .collect();
    json!({"items": items, "has_next": has_next})
}

fn ids(snapshot: &FeedSnapshot) -> Vec<u64> {
    snapshot.items.iter().map(|p| p.id).collect()
}

/// Lets every actor and task run until only timers are left.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test]
async fn test_append_advances_cursor_two_then_three() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1, 2], true));
    api.mock_respond(&products(2, None, None, None), page_json(&[3, 4], true));
    api.mock_respond(&products(3, None, None, None), page_json(&[5], false));
    let feed = FeedController::spawn(api.clone(), Log::mock());

    assert!(matches!(
        feed.load_page(LoadMode::Replace).await,
        FeedOutcome::Loaded { page: 1, added: 2, .. }
    ));
    assert!(matches!(
        feed.load_page(LoadMode::Append).await,
        FeedOutcome::Loaded { page: 2, added: 2, has_next: true, .. }
    ));
    assert!(matches!(
        feed.load_page(LoadMode::Append).await,
        FeedOutcome::Loaded { page: 3, added: 1, has_next: false, .. }
    ));

    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot), vec![1, 2, 3, 4, 5]);
    assert_eq!(snapshot.cursor, PageCursor { page: 3, has_next: false });
    assert_eq!(snapshot.error, None);

    // No request goes out once the server said there is nothing more
    assert_eq!(feed.load_page(LoadMode::Append).await, FeedOutcome::Exhausted);
    assert_eq!(api.mock_hits(&products(4, None, None, None)), 0);
}

#[tokio::test]
async fn test_search_and_platform_request_omits_category() {
    let api = ApiGateway::mock();
    let endpoint = products(1, Some("phone"), None, Some(2));
    assert_eq!(
        endpoint.key().as_str(),
        "products?page=1&platform_id=2&search=phone"
    );
    api.mock_respond(&endpoint, page_json(&[7], false));
    let feed = FeedController::spawn(api.clone(), Log::mock());

    feed.set_search("phone").await;
    feed.set_platform(Some(2)).await;
    let outcome = feed.load_page(LoadMode::Replace).await;

    assert!(matches!(outcome, FeedOutcome::Loaded { .. }));
    assert_eq!(api.mock_hits(&endpoint), 1);
    assert_eq!(ids(&feed.snapshot().await), vec![7]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let api = ApiGateway::mock();
    api.mock_respond_after(
        &products(1, None, None, None),
        page_json(&[1, 2, 3], true),
        Duration::from_millis(500),
    );
    api.mock_respond_after(
        &products(1, Some("tv"), None, None),
        page_json(&[9], false),
        Duration::from_millis(10),
    );
    let feed = FeedController::spawn(api, Log::mock());

    let slow = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_page(LoadMode::Replace).await }
    });
    settle().await;
    assert!(feed.snapshot().await.loading);

    feed.set_search("tv").await;
    let fresh = feed.load_page(LoadMode::Replace).await;
    assert!(matches!(fresh, FeedOutcome::Loaded { generation: 3, .. }));

    // The older fetch resolves last and must not overwrite the newer result
    assert_eq!(slow.await.unwrap(), FeedOutcome::Superseded);
    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot), vec![9]);
    assert_eq!(snapshot.generation, 3);
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_discards_in_flight_fetch() {
    let api = ApiGateway::mock();
    api.mock_respond_after(
        &products(1, None, None, None),
        page_json(&[1], true),
        Duration::from_millis(200),
    );
    let feed = FeedController::spawn(api, Log::mock());

    let in_flight = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_page(LoadMode::Replace).await }
    });
    settle().await;
    feed.set_category(Some(4)).await;

    assert_eq!(in_flight.await.unwrap(), FeedOutcome::Superseded);
    let snapshot = feed.snapshot().await;
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_filter_change_resets_pagination() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1], true));
    api.mock_respond(&products(2, None, None, None), page_json(&[2], true));
    api.mock_respond(&products(2, None, Some(3), None), page_json(&[30], true));
    let feed = FeedController::spawn(api.clone(), Log::mock());

    feed.load_page(LoadMode::Replace).await;
    feed.load_page(LoadMode::Append).await;
    assert_eq!(feed.snapshot().await.cursor.page, 2);

    assert_eq!(ids(&feed.snapshot().await), vec![1, 2]);

    feed.set_category(Some(3)).await;
    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.cursor, PageCursor::default());
    assert!(snapshot.items.is_empty());
    assert_eq!(feed.filters().await.category_id, Some(3));

    // Counting restarts from page 1, so the next Append asks for page 2
    let outcome = feed.load_page(LoadMode::Append).await;
    assert!(matches!(outcome, FeedOutcome::Loaded { page: 2, .. }));
    assert_eq!(ids(&feed.snapshot().await), vec![30]);
    assert_eq!(api.mock_hits(&products(2, None, Some(3), None)), 1);
    assert_eq!(api.mock_hits(&products(3, None, None, None)), 0);
}

#[tokio::test]
async fn test_failing_categories_leave_list_empty_and_feed_loads() {
    let api = ApiGateway::mock();
    api.mock_fail(&Endpoint::Categories, "500 Internal Server Error");
    api.mock_respond(&Endpoint::Platforms, json!([{"id": 2, "name": "Jumia"}]));
    api.mock_respond(&products(1, None, None, None), page_json(&[1], false));
    let feed = FeedController::spawn(api, Log::mock());

    let report = feed.load_filter_options().await;
    assert_eq!(report.categories, 0);
    assert_eq!(report.platforms, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(report.errors[0], FeedError::Transport(_)));

    let (categories, platforms) = feed.options().await;
    assert!(categories.is_empty());
    assert_eq!(&*platforms[0].name, "Jumia");

    assert!(matches!(
        feed.load_page(LoadMode::Replace).await,
        FeedOutcome::Loaded { .. }
    ));
    assert_eq!(ids(&feed.snapshot().await), vec![1]);
}

#[tokio::test]
async fn test_replace_failure_clears_items() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1, 2], true));
    let log = Log::mock();
    let feed = FeedController::spawn(api.clone(), log.clone());

    feed.load_page(LoadMode::Replace).await;
    assert_eq!(ids(&feed.snapshot().await), vec![1, 2]);

    api.mock_fail(&products(1, None, None, None), "timed out");
    let outcome = feed.load_page(LoadMode::Replace).await;

    assert!(matches!(outcome, FeedOutcome::Failed(FeedError::Transport(_))));
    let snapshot = feed.snapshot().await;
    assert!(snapshot.items.is_empty());
    assert!(snapshot.error.is_some());
    assert!(
        log.get_messages()
            .unwrap()
            .iter()
            .any(|m| m.scope == "feed" && m.message.contains("failed"))
    );

    // A new selection starts from a clean slate
    feed.set_search("x").await;
    assert_eq!(feed.snapshot().await.error, None);
}

#[tokio::test]
async fn test_filter_change_hides_previous_items() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1, 2], true));
    api.mock_respond(&products(1, Some("tv"), None, None), page_json(&[9], false));
    let feed = FeedController::spawn(api, Log::mock());
    let mut rx = feed.subscribe().await.unwrap();

    feed.load_page(LoadMode::Replace).await;
    assert_eq!(ids(&rx.borrow_and_update()), vec![1, 2]);

    feed.set_search("tv").await;
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().items.is_empty());

    feed.load_page(LoadMode::Replace).await;
    assert_eq!(ids(&rx.borrow_and_update()), vec![9]);
}

#[tokio::test]
async fn test_append_failure_keeps_items_and_cursor() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1, 2], true));
    api.mock_fail(&products(2, None, None, None), "connection reset");
    let feed = FeedController::spawn(api, Log::mock());

    feed.load_page(LoadMode::Replace).await;
    let outcome = feed.load_page(LoadMode::Append).await;
    assert!(matches!(outcome, FeedOutcome::Failed(_)));

    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot), vec![1, 2]);
    assert_eq!(snapshot.cursor, PageCursor { page: 1, has_next: true });
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn test_malformed_page_is_reported() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), json!({"items": []}));
    let feed = FeedController::spawn(api, Log::mock());

    assert!(matches!(
        feed.load_page(LoadMode::Replace).await,
        FeedOutcome::Failed(FeedError::Malformed { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_append_while_loading_is_busy() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1], true));
    api.mock_respond_after(
        &products(2, None, None, None),
        page_json(&[2], true),
        Duration::from_millis(300),
    );
    let feed = FeedController::spawn(api.clone(), Log::mock());
    feed.load_page(LoadMode::Replace).await;

    let first = tokio::spawn({
        let feed = feed.clone();
        async move { feed.load_page(LoadMode::Append).await }
    });
    settle().await;

    assert_eq!(feed.load_page(LoadMode::Append).await, FeedOutcome::Busy);
    assert!(matches!(
        first.await.unwrap(),
        FeedOutcome::Loaded { page: 2, .. }
    ));
    assert_eq!(api.mock_hits(&products(2, None, None, None)), 1);
}

#[tokio::test]
async fn test_subscribers_receive_snapshots() {
    let api = ApiGateway::mock();
    api.mock_respond(&products(1, None, None, None), page_json(&[1, 2], false));
    let feed = FeedController::spawn(api, Log::mock());
    let mut rx = feed.subscribe().await.unwrap();
    let mut filters = feed.subscribe_filters().await.unwrap();

    feed.load_page(LoadMode::Replace).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(ids(&rx.borrow_and_update()), vec![1, 2]);

    feed.set_search("lamp").await;
    assert!(filters.has_changed().unwrap());
    assert_eq!(filters.borrow_and_update().search.as_deref(), Some("lamp"));
}
