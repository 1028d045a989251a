//! Notifier Worker configuration: SMTP transport and the link/base-url
//! shared with the Job Worker for rendering the video link.

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    /// Used to render `{public_base}/videos/{id}`.
    pub public_base_url: String,
    pub max_concurrent_jobs: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@example.com".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            max_concurrent_jobs: 4,
        }
    }
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or(default.smtp_host),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.smtp_port),
            smtp_username: std::env::var("SMTP_USERNAME").unwrap_or(default.smtp_username),
            smtp_password: std::env::var("SMTP_PASSWORD").unwrap_or(default.smtp_password),
            from_address: std::env::var("SMTP_FROM_ADDRESS").unwrap_or(default.from_address),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(default.public_base_url),
            max_concurrent_jobs: std::env::var("NOTIFIER_MAX_CONCURRENT_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_concurrent_jobs),
        }
    }
}
