//! Axum API server binary.

use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_api::{create_router, metrics, ApiConfig, AppState};
use vclip_db::DbConfig;
use vclip_graph::{GraphClient, GraphConfig};
use vclip_queue::JobQueue;
use vclip_search::{SearchClient, SearchConfig};
use vclip_storage::R2Client;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("vclip=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("starting vclip-api");

    let config = ApiConfig::from_env();
    info!(host = %config.host, port = config.port, "api config loaded");

    let db_config = match DbConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load database config");
            std::process::exit(1);
        }
    };
    let pool = match db_config.connect().await {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    let storage = match R2Client::from_env().await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to configure object store client");
            std::process::exit(1);
        }
    };

    let queue_config = vclip_queue::QueueConfig::from_env();
    let queue = match JobQueue::connect(&queue_config.redis_url).await {
        Ok(q) => q,
        Err(e) => {
            error!(error = %e, "failed to connect to redis");
            std::process::exit(1);
        }
    };

    // Search and graph are best-effort collaborators: if unconfigured, the
    // affected routes (search/feed) return an internal error rather than
    // refusing to start the whole process.
    let search = match SearchConfig::from_env() {
        Ok(c) => match SearchClient::new(c) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "search index client failed to initialize, disabling");
                None
            }
        },
        Err(_) => {
            warn!("OPENSEARCH_URL not set, search and feed routes will be unavailable");
            None
        }
    };
    let graph = match GraphConfig::from_env() {
        Ok(c) => Some(GraphClient::new(c)),
        Err(_) => {
            warn!("NEO4J_URL not set, feed route will be unavailable");
            None
        }
    };

    let state = AppState::new(config.clone(), pool, storage, queue, search, graph);

    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let metrics_handle = if metrics_enabled {
        info!("prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics())
    } else {
        None
    };

    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("invalid bind address");

    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();

    info!("server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl+c handler");
    info!("received shutdown signal");
}
