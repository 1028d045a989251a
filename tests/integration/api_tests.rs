//! API integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

/// Build a router against a fully live stack (Postgres + Redis + R2).
/// Search/graph stay `None` when unconfigured — `/api/feed` and
/// `/api/search` degrade to an internal error, everything else works.
async fn create_test_router() -> axum::Router {
    use vclip_api::{create_router, metrics, ApiConfig, AppState};
    use vclip_db::DbConfig;
    use vclip_queue::{JobQueue, QueueConfig};
    use vclip_storage::R2Client;

    let config = ApiConfig::from_env();
    let pool = DbConfig::from_env()
        .expect("DATABASE_URL is not set")
        .connect()
        .await
        .expect("failed to connect to postgres");
    let storage = R2Client::from_env().await.expect("failed to configure object store client");
    let queue_config = QueueConfig::from_env();
    let queue = JobQueue::connect(&queue_config.redis_url)
        .await
        .expect("failed to connect to redis");

    let state = AppState::new(config, pool, storage, queue, None, None);
    let metrics_handle = Some(metrics::init_metrics());
    create_router(state, metrics_handle)
}

/// Test health endpoint.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_health_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test readiness endpoint reflects a healthy database and queue.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_ready_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test metrics endpoint.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_metrics_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test rate limiting on the `/api` prefix.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_rate_limiting() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    for i in 0..20 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=test")
                    .header("X-Forwarded-For", "192.168.1.100")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            println!("rate limited after {} requests", i + 1);
            return;
        }
    }
}

/// Test CORS preflight headers.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_cors_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/search")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT);
}

/// Test security headers are present on every response.
#[tokio::test]
#[ignore = "requires a live database, object store, and redis"]
async fn test_security_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("X-Content-Type-Options"));
    assert!(headers.contains_key("X-Frame-Options"));
    assert!(headers.contains_key("X-Request-ID"));
}
