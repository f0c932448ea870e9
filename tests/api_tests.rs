//! Router tests: status mapping, detail messages and caching through the HTTP surface.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use parts_scraper::api::{create_app, AppState};
use parts_scraper::model::{ItemRecord, ScrapeRequest, ScraperError};
use parts_scraper::parser::SourceProfile;
use parts_scraper::scraper::Scraper;
use parts_scraper::storage::{CacheStore, MemoryCache};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt; // for `oneshot`

const TWO_CARDS: &str = r#"
<html><body>
  <div class="bull-item__content-wrapper">
    <div class="bull-image-container"><img src="https://s.drom.ru/1.jpg"></div>
    <div class="bull-item__subject-container"><a class="bulletinLink" href="/p/1.html">Бампер передний</a></div>
    <div class="bull-item__annotation-row manufacturer">Toyota</div>
    <div class="price-block__price" data-price="4500"></div>
    <span class="bull-delivery__city">Хабаровск</span>
    <div class="date">сегодня</div>
  </div>
  <div class="bull-item__content-wrapper">
    <div class="bull-item__subject-container"><a class="bulletinLink">Фара левая</a></div>
  </div>
</body></html>"#;

/// Upstream stand-in that records every request it sees.
struct RecordingScraper {
    body: Result<String, u16>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, ScrapeRequest)>>,
}

impl RecordingScraper {
    fn ok(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Ok(body.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            body: Err(status),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Scraper for RecordingScraper {
    async fn fetch(&self, profile: &SourceProfile, req: &ScrapeRequest) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((profile.id.clone(), req.clone()));
        match &self.body {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(ScraperError::Status(*status)),
        }
    }
}

fn app(scraper: Arc<RecordingScraper>, store: Arc<MemoryCache>) -> Router {
    let state = AppState::from_profiles(SourceProfile::builtin(), scraper, store).unwrap();
    create_app(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn drom_empty_result_is_404_with_detail() {
    let scraper = RecordingScraper::ok("<html><body></body></html>");
    let (status, body) = get(
        app(scraper, Arc::new(MemoryCache::new())),
        "/drom/toyota/corolla?page=1",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Запчасти не найдены");
}

#[tokio::test]
async fn drom_returns_items_in_document_order() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let (status, body) = get(
        app(scraper, Arc::new(MemoryCache::new())),
        "/drom/toyota/corolla?page=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items: Vec<ItemRecord> = serde_json::from_value(body).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Бампер передний");
    assert_eq!(items[0].link, "https://baza.drom.ru/p/1.html");
    assert_eq!(items[0].price, "4500 ₽");
    assert_eq!(items[0].location, "Хабаровск");
    assert_eq!(items[1].title, "Фара левая");
    assert_eq!(items[1].link, "#");
    assert_eq!(items[1].price, "0 ₽");
    assert_eq!(items[1].image_url, "https://via.placeholder.com/150");
}

#[tokio::test]
async fn drom_page_defaults_to_first() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let store = Arc::new(MemoryCache::new());
    let (status, _) = get(app(scraper.clone(), store.clone()), "/drom/toyota/corolla").await;

    assert_eq!(status, StatusCode::OK);
    let seen = scraper.seen.lock().unwrap();
    assert_eq!(seen[0].0, "drom");
    assert_eq!(seen[0].1, ScrapeRequest::new("toyota", "corolla", 1));
    assert!(store.get("drom:toyota:corolla:1").await.unwrap().is_some());
}

#[tokio::test]
async fn repeated_request_hits_upstream_once() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let store = Arc::new(MemoryCache::new());

    let (first, _) = get(app(scraper.clone(), store.clone()), "/drom/toyota/corolla?page=2").await;
    let (second, _) = get(app(scraper.clone(), store.clone()), "/drom/toyota/corolla?page=2").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(scraper.calls(), 1);
}

#[tokio::test]
async fn cached_empty_result_stays_404_without_refetch() {
    let scraper = RecordingScraper::ok("<html></html>");
    let store = Arc::new(MemoryCache::new());

    get(app(scraper.clone(), store.clone()), "/drom/toyta/corolla").await;
    let (status, _) = get(app(scraper.clone(), store.clone()), "/drom/toyta/corolla").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(scraper.calls(), 1);
}

#[tokio::test]
async fn upstream_failure_is_500_with_message() {
    let scraper = RecordingScraper::failing(502);
    let store = Arc::new(MemoryCache::new());
    let (status, body) = get(app(scraper, store.clone()), "/drom/toyota/corolla?page=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "upstream returned status 502");
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn cyrillic_path_segments_reach_the_fetcher_decoded() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let store = Arc::new(MemoryCache::new());
    let (status, _) = get(
        app(scraper.clone(), store.clone()),
        "/drom/%D0%B1%D0%B0%D0%BC%D0%BF%D0%B5%D1%80/corolla?page=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(scraper.seen.lock().unwrap()[0].1.search, "бампер");
    assert!(store.get("drom:бампер:corolla:1").await.unwrap().is_some());
}

#[tokio::test]
async fn page_zero_is_rejected_before_fetch() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let store = Arc::new(MemoryCache::new());

    let (status, body) = get(app(scraper.clone(), store.clone()), "/drom/toyota/corolla?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Номер страницы должен быть не меньше 1");

    let (status, _) = get(app(scraper.clone(), store.clone()), "/sources/exist/oil/camry?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(scraper.calls(), 0);
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn reserved_characters_in_search_are_cached_under_the_decoded_query() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let store = Arc::new(MemoryCache::new());
    let (status, _) = get(
        app(scraper.clone(), store.clone()),
        "/drom/bumper%23x/a%26b?page=3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let seen = scraper.seen.lock().unwrap()[0].1.clone();
    assert_eq!(seen, ScrapeRequest::new("bumper#x", "a&b", 3));
    assert_eq!(
        SourceProfile::drom().search_url(&seen),
        "https://baza.drom.ru/sell_spare_parts/+/bumper%23x/a%26b/?page=3"
    );
    assert!(store.get("drom:bumper#x:a&b:3").await.unwrap().is_some());
}

#[tokio::test]
async fn sources_lists_builtin_profiles() {
    let (status, body) = get(
        app(RecordingScraper::ok(""), Arc::new(MemoryCache::new())),
        "/sources",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(["amry", "autodoc", "drom", "exist"]));
}

#[tokio::test]
async fn generic_source_route_uses_that_profile() {
    let scraper = RecordingScraper::ok(
        r#"<div class="catalog-item-class"><a href="/p/9"><span class="item-title-class">Колодки</span></a><span class="price-class">2 100</span></div>"#,
    );
    let store = Arc::new(MemoryCache::new());
    let (status, body) = get(
        app(scraper.clone(), store.clone()),
        "/sources/exist/kolodki/camry?page=3",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Колодки");
    assert_eq!(body[0]["link"], "https://exist.ru/p/9");
    assert_eq!(body[0]["price"], "2 100 ₽");
    assert_eq!(scraper.seen.lock().unwrap()[0].0, "exist");
    assert!(store.get("exist:kolodki:camry:3").await.unwrap().is_some());
}

#[tokio::test]
async fn unknown_source_is_404() {
    let scraper = RecordingScraper::ok(TWO_CARDS);
    let (status, body) = get(
        app(scraper.clone(), Arc::new(MemoryCache::new())),
        "/sources/avito/toyota/corolla",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Источник не найден");
    assert_eq!(scraper.calls(), 0);
}

#[tokio::test]
async fn parts_stub_is_404() {
    let (status, body) = get(
        app(RecordingScraper::ok(""), Arc::new(MemoryCache::new())),
        "/parts/toyota/corolla",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Запчасти не найдены");
}

#[tokio::test]
async fn brands_stub_is_404() {
    let (status, body) = get(
        app(RecordingScraper::ok(""), Arc::new(MemoryCache::new())),
        "/brands",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Марки не найдены");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/brands")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app(RecordingScraper::ok(""), Arc::new(MemoryCache::new()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
