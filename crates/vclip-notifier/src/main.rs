//! Notifier Worker binary.

use redis::aio::ConnectionManager;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_db::{DbConfig, UserRepository, VideoRepository};
use vclip_queue::{lock_ttl_from_env, JobQueue, LockService, QueueConfig, RetryTracker};
use vclip_notifier::{Mailer, NotifierConfig, NotifyExecutor, NotifyPipeline};

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

    info!("starting vclip-notifier");

    let config = NotifierConfig::from_env();

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

    let mailer = match Mailer::new(&config) {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "failed to build smtp transport");
            std::process::exit(1);
        }
    };

    let pipeline = NotifyPipeline {
        videos: VideoRepository::new(pool.clone()),
        users: UserRepository::new(pool.clone()),
        mailer,
        config: config.clone(),
    };

    let executor = NotifyExecutor::new(queue, locks, retry_tracker, pipeline, config.max_concurrent_jobs);

    let shutdown_signal = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal");
    });

    executor.run().await;
    shutdown_signal.await.ok();

    info!("vclip-notifier shutdown complete");
}
