//! Job Worker configuration: concurrency bound and the per-step timeouts
//! from the spec's concurrency & resource model.

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Caps in-flight pipelines via a `tokio::sync::Semaphore`.
    pub max_concurrent_jobs: usize,
    /// Scoped temp directory root; a per-job subdirectory is created and
    /// purged under it on every exit path.
    pub work_dir: String,
    pub probe_timeout_secs: u64,
    pub rung_720p_timeout_secs: u64,
    pub rung_480p_timeout_secs: u64,
    pub poster_timeout_secs: u64,
    pub transcribe_timeout_secs: u64,
    /// Transcription is an optional step; disabled deployments never shell
    /// out to a transcription binary.
    pub transcription_enabled: bool,
    pub transcription_binary: String,
    pub caption_language: String,
    /// Used to render the Notifier Worker's video link; read here too so a
    /// single `.env` drives both binaries.
    pub public_base_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            work_dir: "/tmp/vclip-worker".to_string(),
            probe_timeout_secs: 30,
            rung_720p_timeout_secs: 1200,
            rung_480p_timeout_secs: 900,
            poster_timeout_secs: 30,
            transcribe_timeout_secs: 600,
            transcription_enabled: true,
            transcription_binary: "whisper-cli".to_string(),
            caption_language: "en".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_jobs: env_usize("WORKER_MAX_CONCURRENT_JOBS", default.max_concurrent_jobs),
            work_dir: std::env::var("WORKER_WORK_DIR").unwrap_or(default.work_dir),
            probe_timeout_secs: env_u64("WORKER_PROBE_TIMEOUT_SECS", default.probe_timeout_secs),
            rung_720p_timeout_secs: env_u64(
                "WORKER_720P_TIMEOUT_SECS",
                default.rung_720p_timeout_secs,
            ),
            rung_480p_timeout_secs: env_u64(
                "WORKER_480P_TIMEOUT_SECS",
                default.rung_480p_timeout_secs,
            ),
            poster_timeout_secs: env_u64("WORKER_POSTER_TIMEOUT_SECS", default.poster_timeout_secs),
            transcribe_timeout_secs: env_u64(
                "WORKER_TRANSCRIBE_TIMEOUT_SECS",
                default.transcribe_timeout_secs,
            ),
            transcription_enabled: std::env::var("WORKER_TRANSCRIPTION_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.transcription_enabled),
            transcription_binary: std::env::var("WORKER_TRANSCRIPTION_BINARY")
                .unwrap_or(default.transcription_binary),
            caption_language: std::env::var("WORKER_CAPTION_LANGUAGE")
                .unwrap_or(default.caption_language),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(default.public_base_url),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}
