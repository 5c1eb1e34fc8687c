//! End-to-end behavior of the one-shot refresh-and-retry flow, driven
//! against a loopback HTTP server standing in for the backend.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use souqly_client::products::ProductFilters;
use souqly_client::{ApiClient, ApiConfig, Environment, MemoryTokenStore, Session, TokenStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const GOOD_ACCESS: &str = "good-access-token";
const STALE_ACCESS: &str = "stale-access-token";
const FRESH_ACCESS: &str = "fresh-access-token";
const GOOD_REFRESH: &str = "good-refresh-token";
const BAD_REFRESH: &str = "bad-refresh-token";

/// Counters observed by the assertions, shared with every handler.
struct Backend {
    refresh_calls: AtomicUsize,
    favorites_calls: AtomicUsize,
    /// When set, the favorites endpoint rejects every token, so a retry
    /// with a freshly minted token still comes back 401.
    reject_all: bool,
}

impl Backend {
    fn new() -> Arc<Self> {
        Arc::new(Backend {
            refresh_calls: AtomicUsize::new(0),
            favorites_calls: AtomicUsize::new(0),
            reject_all: false,
        })
    }

    fn rejecting_all() -> Arc<Self> {
        Arc::new(Backend {
            refresh_calls: AtomicUsize::new(0),
            favorites_calls: AtomicUsize::new(0),
            reject_all: true,
        })
    }
}

fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "iPhone 13 Pro",
        "description": "Lightly used",
        "price": 650.0,
        "condition": "good",
        "status": "ACTIVE",
        "favoriteCount": 3,
        "viewCount": 57,
        "createdAt": "2025-05-01T10:00:00Z",
        "updatedAt": "2025-05-02T10:00:00Z",
        "sellerId": 12,
        "categoryId": 4
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn favorites(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.favorites_calls.fetch_add(1, Ordering::SeqCst);
    let ok = !backend.reject_all && matches!(bearer(&headers), Some(GOOD_ACCESS) | Some(FRESH_ACCESS));
    if ok {
        (StatusCode::OK, Json(json!([product_json(1)])))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        )
    }
}

async fn refresh(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body["refreshToken"] == GOOD_REFRESH {
        (
            StatusCode::OK,
            Json(json!({ "token": FRESH_ACCESS, "expiresIn": 3_600_000 })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
    }
}

/// Anonymous catalog listing; fails the test if credentials leak onto it.
async fn public_products(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.contains_key("authorization") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Unexpected Authorization header" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "content": [product_json(1)],
            "totalElements": 1,
            "totalPages": 1,
            "currentPage": 0,
            "size": 20
        })),
    )
}

async fn get_product(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 404 {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Product not found" })),
        )
    } else {
        (StatusCode::OK, Json(product_json(id)))
    }
}

async fn delete_product(headers: HeaderMap) -> StatusCode {
    if bearer(&headers) == Some(GOOD_ACCESS) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "token": GOOD_ACCESS,
                "refreshToken": GOOD_REFRESH,
                "expiresIn": 3_600_000,
                "user": { "id": 7, "role": "USER", "email": body["email"].clone() }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Bad credentials" })),
        )
    }
}

async fn logout() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({})))
}

async fn spawn_backend(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/api/products/favorites", get(favorites))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/products", get(public_products))
        .route("/api/products/:id", get(get_product).delete(delete_product))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: String, store: Arc<MemoryTokenStore>) -> ApiClient {
    let config = ApiConfig {
        environment: Environment::Development,
        base_url,
        api_path: "/api".into(),
        http_timeout_ms: 5_000,
        token_db: ":memory:".into(),
    };
    ApiClient::new(config, store).unwrap()
}

fn session(access: &str, refresh: &str, expires_in_minutes: i64) -> Session {
    Session {
        access_token: access.into(),
        refresh_token: refresh.into(),
        expires_at: Utc::now() + Duration::minutes(expires_in_minutes),
        user_id: "7".into(),
        user_role: "user".into(),
    }
}

#[tokio::test]
async fn valid_token_is_attached_and_no_refresh_happens() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(GOOD_ACCESS, GOOD_REFRESH, 60)).await.unwrap();
    let client = client_for(base, store);

    let favorites = client.products().favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.favorites_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_token_refreshes_once_and_retries_with_the_new_token() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(STALE_ACCESS, GOOD_REFRESH, -60)).await.unwrap();
    let client = client_for(base, store.clone());

    // Transparent to the caller: the eventual 200 comes back as a success.
    let favorites = client.products().favorites().await.unwrap();
    assert_eq!(favorites.len(), 1);

    // Exactly one refresh, exactly one retry.
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.favorites_calls.load(Ordering::SeqCst), 2);

    // The new token was persisted before the retry went out; the server
    // only accepts the fresh token, so the retry proves it was used.
    let persisted = store.load().await.unwrap().unwrap();
    assert_eq!(persisted.access_token, FRESH_ACCESS);
    assert_eq!(persisted.refresh_token, GOOD_REFRESH);
    assert!(persisted.expires_at > Utc::now());
}

#[tokio::test]
async fn failed_refresh_surfaces_the_original_401_and_clears_the_store() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(STALE_ACCESS, BAD_REFRESH, -60)).await.unwrap();
    let client = client_for(base, store.clone());

    let err = client.products().favorites().await.unwrap_err();
    assert!(err.is_unauthorized(), "expected 401, got: {err}");

    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.favorites_calls.load(Ordering::SeqCst), 1);
    assert!(store.load().await.unwrap().is_none(), "store must be empty");
}

#[tokio::test]
async fn a_second_401_after_the_retry_is_not_retried_again() {
    let backend = Backend::rejecting_all();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(STALE_ACCESS, GOOD_REFRESH, -60)).await.unwrap();
    let client = client_for(base, store);

    let err = client.products().favorites().await.unwrap_err();
    assert!(err.is_unauthorized());

    // One refresh, one retry, then give up.
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.favorites_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn public_requests_never_carry_credentials() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(GOOD_ACCESS, GOOD_REFRESH, 60)).await.unwrap();
    let client = client_for(base, store);

    let listing = client.products().list(&ProductFilters::default()).await.unwrap();
    assert_eq!(listing.total_elements, 1);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn login_persists_the_session_and_logout_clears_it() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(base, store.clone());

    let auth = client.login("buyer@example.com", "secret").await.unwrap();
    assert_eq!(auth.user.id, 7);

    let session = store.load().await.unwrap().unwrap();
    assert_eq!(session.access_token, GOOD_ACCESS);
    assert_eq!(session.refresh_token, GOOD_REFRESH);
    assert_eq!(session.user_id, "7");
    assert_eq!(session.user_role, "user");
    assert!(client.is_authenticated().await.unwrap());

    client.logout().await.unwrap();
    assert!(store.load().await.unwrap().is_none());
    assert!(!client.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn bad_login_does_not_touch_the_store() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = client_for(base, store.clone());

    let err = client.login("buyer@example.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "http 401: Bad credentials");
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn http_errors_carry_the_server_message() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let client = client_for(base, Arc::new(MemoryTokenStore::new()));

    let err = client.products().get(404).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "http 404: Product not found");
}

#[tokio::test]
async fn empty_bodies_are_tolerated() {
    let backend = Backend::new();
    let base = spawn_backend(backend.clone()).await;
    let store = Arc::new(MemoryTokenStore::new());
    store.save(session(GOOD_ACCESS, GOOD_REFRESH, 60)).await.unwrap();
    let client = client_for(base, store);

    // 204 with no body decodes cleanly.
    client.products().delete(9).await.unwrap();
}
