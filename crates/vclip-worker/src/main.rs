//! Job Worker binary.

use redis::aio::ConnectionManager;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_db::{AssetRepository, CatalogRepository, DbConfig, VideoRepository};
use vclip_enrich::{ContentEnricher, GeminiClient};
use vclip_graph::GraphClient;
use vclip_media::{NullTranscriber, SubprocessTranscriber, Transcriber};
use vclip_queue::{lock_ttl_from_env, JobQueue, LockService, QueueConfig, RetryTracker};
use vclip_search::SearchClient;
use vclip_storage::R2Client;
use vclip_worker::{JobExecutor, Pipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("vclip=info".parse().unwrap()))
        .init();

    info!("starting vclip-worker");

    let config = WorkerConfig::from_env();

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
    if let Err(e) = vclip_db::migrate(&pool).await {
        error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let storage = match R2Client::from_env().await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to create object store client");
            std::process::exit(1);
        }
    };

    let redis_config = QueueConfig::from_env();
    let redis_client = match redis::Client::open(redis_config.redis_url.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to open redis client");
            std::process::exit(1);
        }
    };
    let conn: ConnectionManager = match ConnectionManager::new(redis_client).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to connect to redis");
            std::process::exit(1);
        }
    };
    let queue = JobQueue::new(conn.clone());
    let locks = LockService::new(conn.clone(), lock_ttl_from_env());
    let retry_tracker = RetryTracker::new(conn.clone());

    let search = match SearchClient::from_env().await {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "search index adapter unavailable, metadata/transcript writes are disabled");
            None
        }
    };
    let graph = match GraphClient::from_env() {
        Ok(g) => Some(g),
        Err(e) => {
            warn!(error = %e, "graph store adapter unavailable, enrichment mirroring is disabled");
            None
        }
    };

    let llm = GeminiClient::from_env().expect("gemini client config is infallible");
    let catalog = CatalogRepository::new(pool.clone());
    let enricher = ContentEnricher::new(llm, catalog, graph, search.clone());

    let transcriber: Box<dyn Transcriber> = if config.transcription_enabled {
        Box::new(SubprocessTranscriber::new(
            config.transcription_binary.clone(),
            config.transcribe_timeout_secs,
        ))
    } else {
        Box::new(NullTranscriber)
    };

    let pipeline = Pipeline {
        videos: VideoRepository::new(pool.clone()),
        assets: AssetRepository::new(pool.clone()),
        storage,
        queue: queue.clone(),
        search,
        enricher: Some(enricher),
        transcriber,
        config: config.clone(),
    };

    let executor = JobExecutor::new(queue, locks, retry_tracker, pipeline, config.max_concurrent_jobs);

    let shutdown_signal = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal");
    });

    executor.run().await;
    shutdown_signal.await.ok();

    info!("vclip-worker shutdown complete");
}
