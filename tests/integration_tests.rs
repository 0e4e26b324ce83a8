//! Integration tests using mock HTTP server
//!
//! Tests the full flow: YAML config → HTTP requests → merged, filtered results

use gallery_feed::download::AssetDownloader;
use gallery_feed::filter::{DisplayState, FilterView};
use gallery_feed::pagination::{LoadOutcome, LoadPhase, SkipReason};
use gallery_feed::{ErrorKind, FeedConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer, extra: &str) -> FeedConfig {
    let yaml = format!("base_url: {}\npage_size: 2\n{extra}", server.uri());
    FeedConfig::from_yaml_str(&yaml).unwrap()
}

fn character(id: u64, name: &str, rating: Option<&str>) -> Value {
    let mut record = json!({
        "mal_id": id,
        "name": name,
        "images": {"jpg": {"image_url": format!("https://cdn.example.com/{id}.jpg")}},
    });
    if let Some(rating) = rating {
        record["rating"] = json!(rating);
    }
    record
}

fn page_body(items: Vec<Value>, has_next: bool) -> Value {
    json!({
        "data": items,
        "pagination": {"has_next_page": has_next, "current_page": 1},
    })
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_search_and_load_more_dedups_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("q", "naruto"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                character(1, "Naruto Uzumaki", None),
                character(2, "Naruto (Nine Tails)", None),
            ],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("q", "naruto"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                character(2, "Duplicate", None),
                character(3, "Naruto (Boruto)", None),
            ],
            false,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let controller = config.controller(config.http_client().unwrap());

    let outcome = controller.on_search_submit("  naruto  ").await;
    assert_eq!(outcome, LoadOutcome::Applied { added: 2 });

    let outcome = controller.load_more().await;
    assert_eq!(outcome, LoadOutcome::Applied { added: 1 });

    let state = controller.snapshot();
    assert_eq!(state.store.ids(), vec![1, 2, 3]);
    assert_eq!(
        state.store.get(2).and_then(|item| item.field_str("name")),
        Some("Naruto (Nine Tails)")
    );
    assert_eq!(state.current_page, 2);
    assert!(!state.has_more);
    assert_eq!(state.phase(), LoadPhase::Exhausted);

    // Exhausted: no further request is made
    assert_eq!(
        controller.load_more().await,
        LoadOutcome::Skipped(SkipReason::NoMorePages)
    );
}

#[tokio::test]
async fn test_empty_term_sends_no_search_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(10, "Luffy", None)],
            false,
        )))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let controller = config.controller(config.http_client().unwrap());

    assert!(controller.on_search_submit("   ").await.is_applied());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "q"));
}

#[tokio::test]
async fn test_superseded_search_response_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("q", "naruto"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![character(1, "Naruto Uzumaki", None)], true))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("q", "sasuke"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(13, "Sasuke Uchiha", None)],
            false,
        )))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let controller = config.controller(config.http_client().unwrap());

    let (naruto, sasuke) = tokio::join!(controller.on_search_submit("naruto"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.on_search_submit("sasuke").await
    });

    assert_eq!(naruto, LoadOutcome::Stale);
    assert_eq!(sasuke, LoadOutcome::Applied { added: 1 });

    let state = controller.snapshot();
    assert_eq!(state.active_search_term, "sasuke");
    assert_eq!(state.store.ids(), vec![13]);
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_failed_load_more_retries_same_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(1, "A", None), character(2, "B", None)],
            true,
        )))
        .mount(&mock_server)
        .await;

    // First page-2 request fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(3, "C", None)],
            false,
        )))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let controller = config.controller(config.http_client().unwrap());

    assert!(controller.on_search_submit("abc").await.is_applied());

    let outcome = controller.load_more().await;
    assert_eq!(outcome, LoadOutcome::Failed(ErrorKind::Network));

    let state = controller.snapshot();
    assert_eq!(state.current_page, 1);
    assert!(state.has_more);
    assert_eq!(state.store.len(), 2);
    let error = state.last_error.unwrap();
    assert_eq!(error.page, 2);
    assert!(error.message.contains("503"));

    let outcome = controller.load_more().await;
    assert_eq!(outcome, LoadOutcome::Applied { added: 1 });

    let state = controller.snapshot();
    assert_eq!(state.current_page, 2);
    assert!(state.last_error.is_none());
    assert_eq!(state.store.ids(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let controller = config.controller(config.http_client().unwrap());

    let outcome = controller.on_search_submit("x").await;
    assert_eq!(outcome, LoadOutcome::Failed(ErrorKind::Decode));

    let state = controller.snapshot();
    assert!(!state.has_more);
    assert!(state.store.is_empty());
    assert!(matches!(
        config.filter_view().display_state(&state),
        DisplayState::Failed(_)
    ));
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_category_filter_over_loaded_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![
                character(1, "Safe", Some("safe")),
                character(2, "Racy", Some("borderline")),
                character(3, "Unrated", None),
                character(4, "Suggestive", Some("suggestive")),
            ],
            false,
        )))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "filter:\n  include_uncategorized: false\n");
    let controller = config.controller(config.http_client().unwrap());
    controller.on_search_submit("").await;

    let state = controller.snapshot();
    let view = config.filter_view();
    let ids: Vec<u64> = view.visible(&state.store).iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(
        view.display_state(&state),
        DisplayState::Items {
            visible: 2,
            hidden: 2
        }
    );

    // Filtering never touches the store
    assert_eq!(state.store.len(), 4);
    assert_eq!(FilterView::allow_all().visible(&state.store).len(), 4);
}

// ============================================================================
// Detail and download
// ============================================================================

#[tokio::test]
async fn test_detail_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "mal_id": 17,
                "name": "Naruto Uzumaki",
                "name_kanji": "うずまき ナルト",
                "nicknames": ["Hokage"],
                "favorites": 70000,
                "images": {"jpg": {"image_url": "https://cdn.example.com/17.jpg"}}
            }
        })))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server, "");
    let client = config.detail_client(config.http_client().unwrap());

    let detail = client.fetch_param(" 17 ").await.unwrap();
    assert_eq!(detail.name, "Naruto Uzumaki");
    assert_eq!(detail.favorites, 70000);
    assert_eq!(
        detail.image_url.as_deref(),
        Some("https://cdn.example.com/17.jpg")
    );
}

#[tokio::test]
async fn test_download_is_independent_of_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(1, "A", None)],
            true,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let extra = format!("download:\n  directory: {}\n", dir.path().display());
    let config = config_for(&mock_server, &extra);
    let controller = config.controller(config.http_client().unwrap());
    let downloader = config.downloader().unwrap();

    controller.on_search_submit("a").await;
    let before = controller.snapshot();

    let saved = downloader
        .download(&format!("{}/assets/1.png", mock_server.uri()), "Character A")
        .await
        .unwrap();
    assert_eq!(saved.file_name().unwrap(), "Character_A.png");
    assert_eq!(std::fs::read(&saved).unwrap(), vec![1u8, 2, 3, 4]);

    let err = downloader
        .download(&format!("{}/assets/missing.png", mock_server.uri()), "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Download);

    assert_eq!(controller.snapshot(), before);
}

#[tokio::test]
async fn test_download_does_not_send_api_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/characters"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![character(1, "A", None)],
            false,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8]))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let extra = format!(
        "http:\n  headers:\n    X-Api-Key: secret\ndownload:\n  directory: {}\n",
        dir.path().display()
    );
    let config = config_for(&mock_server, &extra);

    let controller = config.controller(config.http_client().unwrap());
    assert!(controller.on_search_submit("a").await.is_applied());

    config
        .downloader()
        .unwrap()
        .download(&format!("{}/assets/1.png", mock_server.uri()), "a")
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let asset = requests
        .iter()
        .find(|request| request.url.path() == "/assets/1.png")
        .unwrap();
    assert!(!asset.headers.contains_key("x-api-key"));
}
