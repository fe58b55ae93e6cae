//! End-to-end runs against a local stand-in for the Amadeus API.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use amadeus_mcp::config::Credentials;
use amadeus_mcp::errors::Error;
use amadeus_mcp::provider::{Provider, ProviderRequest, RetryPolicy, endpoints};
use amadeus_mcp::service::args::LocationSearchArgs;
use amadeus_mcp::types::CallToolParams;
use amadeus_mcp::{
    Dispatcher, HttpProviderClient, ServerConfig, ToolRegistry, TravelOrchestrator, TravelService,
    build_service,
};
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

const SECRET: &str = "stub-secret";

/// Path prefix the stand-in API is mounted under, as behind a gateway
const PREFIX: &str = "/amadeus";

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("grant_type").map(String::as_str) != Some("client_credentials")
        || form.get("client_secret").map(String::as_str) != Some(SECRET)
    {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" }))).into_response();
    }
    Json(json!({ "access_token": "stub-token", "expires_in": 1799 })).into_response()
}

async fn flight_offers(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer stub-token") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if query.get("originLocationCode").map(String::as_str) == Some("ERR") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    Json(json!({
        "meta": { "count": 1 },
        "data": [{
            "id": "1",
            "price": { "total": "199.00", "currency": query.get("currencyCode") },
            "itineraries": [{ "duration": "PT6H", "segments": [{ "carrierCode": "AA" }] }],
            "adults": query.get("adults"),
        }]
    }))
    .into_response()
}

/// City search is always throttled; every hit is counted
async fn cities(State(hits): State<Arc<AtomicUsize>>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response()
}

struct Stub {
    base_url: String,
    city_hits: Arc<AtomicUsize>,
}

async fn spawn_stub() -> Stub {
    let city_hits = Arc::new(AtomicUsize::new(0));
    let api = Router::new()
        .route(endpoints::TOKEN, post(token))
        .route(endpoints::FLIGHT_OFFERS, get(flight_offers))
        .route(endpoints::CITIES, get(cities))
        .with_state(city_hits.clone());
    let app = Router::new().nest(PREFIX, api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Stub {
        base_url: format!("http://{}{}", address, PREFIX),
        city_hits,
    }
}

fn credentials(secret: &str) -> Credentials {
    Credentials {
        client_id: "stub-id".to_string(),
        client_secret: secret.to_string(),
    }
}

async fn dispatcher(base_url: &str) -> Dispatcher {
    let config = ServerConfig::default()
        .with_credentials("stub-id", SECRET)
        .with_base_url(base_url);
    let service = build_service(&config).unwrap();
    Dispatcher::new(Arc::new(ToolRegistry::with_travel_tools(service).unwrap()))
}

fn call(name: &str, arguments: Value) -> CallToolParams {
    serde_json::from_value(json!({ "name": name, "arguments": arguments })).unwrap()
}

#[tokio::test]
async fn test_token_exchange() {
    let base_url = spawn_stub().await.base_url;
    let client = HttpProviderClient::new(&base_url, credentials(SECRET)).unwrap();

    let token = client.authenticate().await.unwrap();
    assert_eq!(token.bearer(), "Bearer stub-token");
}

#[tokio::test]
async fn test_rejected_credentials() {
    let base_url = spawn_stub().await.base_url;
    let client = HttpProviderClient::new(&base_url, credentials("wrong")).unwrap();

    match client.authenticate().await {
        Err(Error::Authentication(message)) => {
            assert!(message.starts_with("Failed to get access token: 401 Unauthorized"), "{message}")
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upstream_failure_keeps_status() {
    let base_url = spawn_stub().await.base_url;
    let client = HttpProviderClient::new(&base_url, credentials(SECRET)).unwrap();
    let token = client.authenticate().await.unwrap();
    let request = ProviderRequest::get(endpoints::FLIGHT_OFFERS).query("originLocationCode", "ERR");

    match client.call(&request, &token).await {
        Err(Error::Upstream { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected upstream failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_flight_search_end_to_end() {
    let base_url = spawn_stub().await.base_url;
    let dispatcher = dispatcher(&base_url).await;

    let result = dispatcher
        .call_tool(call(
            "search_flights",
            json!({ "origin": "JFK", "destination": "LAX", "departureDate": "2026-12-01" }),
        ))
        .await;
    assert!(!result.is_error);

    let envelope: Value = serde_json::from_str(&result.content[0].text).unwrap();
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"][0]["price"]["currency"], "USD");
    assert_eq!(envelope["data"][0]["adults"], "1");
    assert_eq!(envelope["meta"]["count"], 1);
}

#[tokio::test]
async fn test_flight_search_failure_is_error_content() {
    let base_url = spawn_stub().await.base_url;
    let dispatcher = dispatcher(&base_url).await;

    let result = dispatcher
        .call_tool(call(
            "search_flights",
            json!({ "origin": "ERR", "destination": "LAX", "departureDate": "2026-12-01" }),
        ))
        .await;

    assert!(result.is_error);
    assert!(result.content[0].text.starts_with("Error: Flight search failed"));
}

#[tokio::test]
async fn test_recommendations_need_no_provider() {
    let base_url = spawn_stub().await.base_url;
    let dispatcher = dispatcher(&base_url).await;

    let result = dispatcher
        .call_tool(call("get_travel_recommendations", json!({ "destination": "Atlantis" })))
        .await;

    assert!(result.content[0].text.starts_with("Travel recommendations for Atlantis:"));
}

#[tokio::test]
async fn test_throttled_call_is_rate_limited() {
    let stub = spawn_stub().await;
    let client = HttpProviderClient::new(&stub.base_url, credentials(SECRET)).unwrap();
    let token = client.authenticate().await.unwrap();
    let request = ProviderRequest::get(endpoints::CITIES).query("keyword", "Paris");

    match client.call(&request, &token).await {
        Err(Error::RateLimited(message)) => assert!(message.contains("slow down"), "{message}"),
        other => panic!("expected rate limit, got {other:?}"),
    }
    assert_eq!(stub.city_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_city_search_gives_up_after_retry_budget() {
    let stub = spawn_stub().await;
    let client = HttpProviderClient::new(&stub.base_url, credentials(SECRET)).unwrap();
    let service =
        TravelOrchestrator::new(client).with_city_retry(RetryPolicy::new(3, Duration::from_millis(1)));

    let err = service
        .search_cities(LocationSearchArgs {
            keyword: "Paris".to_string(),
            country_code: None,
            max: "10".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err.root_cause(), Error::MaxRetriesExceeded(_)), "{err:?}");
    assert_eq!(stub.city_hits.load(Ordering::SeqCst), 3);
}
