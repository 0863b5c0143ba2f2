//! Configuration module
//!
//! Settings are read from the environment (and an optional `.env` file) once at
//! startup. Missing optional values fall back to the defaults below.

use std::env;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server-level settings shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub http_concurrency_limit: usize,
    pub environment: String,
}

/// Site configuration
#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub app_name: String,
    pub app_url: String,
    pub timezone: Tz,
    // Blob storage
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub max_upload_size_bytes: usize,
    pub allowed_image_extensions: Vec<String>,
    pub allowed_image_content_types: Vec<String>,
    // Staff notifications
    pub email_notifications_enabled: bool,
    pub staff_mailbox: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    // Job queue
    pub job_queue_max_workers: usize,
    pub job_queue_poll_interval_ms: u64,
    pub job_queue_timeout_seconds: i32,
    pub job_queue_max_retries: i32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SiteConfig>);

impl Config {
    fn as_site(&self) -> &SiteConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config(Box::new(SiteConfig::from_env()?)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_site().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_site().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Current calendar date in the site's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.as_site().timezone).date_naive()
    }

    pub fn server_port(&self) -> u16 {
        self.as_site().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_site().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_site().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_site().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_site().base.db_timeout_seconds
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_site().base.http_concurrency_limit
    }

    pub fn database_url(&self) -> &str {
        &self.as_site().database_url
    }

    pub fn app_name(&self) -> &str {
        &self.as_site().app_name
    }

    pub fn app_url(&self) -> &str {
        &self.as_site().app_url
    }

    pub fn timezone(&self) -> Tz {
        self.as_site().timezone
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_site().local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.as_site().local_storage_base_url
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_site().max_upload_size_bytes
    }

    pub fn allowed_image_extensions(&self) -> &[String] {
        &self.as_site().allowed_image_extensions
    }

    pub fn allowed_image_content_types(&self) -> &[String] {
        &self.as_site().allowed_image_content_types
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.as_site().email_notifications_enabled
    }

    pub fn staff_mailbox(&self) -> Option<&str> {
        self.as_site().staff_mailbox.as_deref()
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.as_site().smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> Option<u16> {
        self.as_site().smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.as_site().smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.as_site().smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.as_site().smtp_from.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.as_site().smtp_tls
    }

    pub fn job_queue_max_workers(&self) -> usize {
        self.as_site().job_queue_max_workers
    }

    pub fn job_queue_poll_interval_ms(&self) -> u64 {
        self.as_site().job_queue_poll_interval_ms
    }

    pub fn job_queue_timeout_seconds(&self) -> i32 {
        self.as_site().job_queue_timeout_seconds
    }

    pub fn job_queue_max_retries(&self) -> i32 {
        self.as_site().job_queue_max_retries
    }
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            environment: "development".to_string(),
        }
    }
}

/// Development defaults with a local database URL. Used by tests and tools
/// that build configuration without reading the environment.
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            database_url: "postgresql://localhost/hearth".to_string(),
            app_name: "Hearth".to_string(),
            app_url: "http://localhost:4000".to_string(),
            timezone: chrono_tz::UTC,
            local_storage_path: "./storage".to_string(),
            local_storage_base_url: "http://localhost:4000/storage".to_string(),
            max_upload_size_bytes: 5 * 1024 * 1024,
            allowed_image_extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_image_content_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            email_notifications_enabled: false,
            staff_mailbox: None,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
            job_queue_max_workers: 4,
            job_queue_poll_interval_ms: 1000,
            job_queue_timeout_seconds: 60,
            job_queue_max_retries: 3,
        }
    }
}

impl From<SiteConfig> for Config {
    fn from(site: SiteConfig) -> Self {
        Config(Box::new(site))
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_UPLOAD_SIZE_MB: usize = 5;
        const JOB_QUEUE_MAX_WORKERS: usize = 4;
        const JOB_QUEUE_POLL_INTERVAL_MS: u64 = 1000;
        const JOB_QUEUE_TIMEOUT_SECS: i32 = 60;
        const JOB_QUEUE_MAX_RETRIES: i32 = 3;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let timezone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| anyhow::anyhow!("APP_TIMEZONE '{}' is not a valid IANA timezone", timezone_name))?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            environment,
        };

        let config = SiteConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "Hearth".to_string()),
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string())
                .trim_end_matches('/')
                .to_string(),
            timezone,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./storage".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/storage".to_string()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_image_extensions: env_list(
                "ALLOWED_IMAGE_EXTENSIONS",
                "jpg,jpeg,png,gif,webp",
            ),
            allowed_image_content_types: env_list(
                "ALLOWED_IMAGE_CONTENT_TYPES",
                "image/jpeg,image/png,image/gif,image/webp",
            ),
            email_notifications_enabled: env_flag("EMAIL_NOTIFICATIONS_ENABLED", false),
            staff_mailbox: env_opt("STAFF_MAILBOX"),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_from: env_opt("SMTP_FROM"),
            smtp_tls: env_flag("SMTP_TLS", true),
            job_queue_max_workers: env::var("JOB_QUEUE_MAX_WORKERS")
                .unwrap_or_else(|_| JOB_QUEUE_MAX_WORKERS.to_string())
                .parse()
                .unwrap_or(JOB_QUEUE_MAX_WORKERS),
            job_queue_poll_interval_ms: env::var("JOB_QUEUE_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| JOB_QUEUE_POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(JOB_QUEUE_POLL_INTERVAL_MS),
            job_queue_timeout_seconds: env::var("JOB_QUEUE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| JOB_QUEUE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(JOB_QUEUE_TIMEOUT_SECS),
            job_queue_max_retries: env::var("JOB_QUEUE_MAX_RETRIES")
                .unwrap_or_else(|_| JOB_QUEUE_MAX_RETRIES.to_string())
                .parse()
                .unwrap_or(JOB_QUEUE_MAX_RETRIES),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.email_notifications_enabled {
            if self.smtp_host.is_none() || self.smtp_from.is_none() {
                return Err(anyhow::anyhow!(
                    "EMAIL_NOTIFICATIONS_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
                ));
            }
            if self.staff_mailbox.is_none() {
                return Err(anyhow::anyhow!(
                    "EMAIL_NOTIFICATIONS_ENABLED=true requires STAFF_MAILBOX to be set"
                ));
            }
        }

        if self.job_queue_max_workers == 0 {
            return Err(anyhow::anyhow!("JOB_QUEUE_MAX_WORKERS must be at least 1"));
        }

        Ok(())
    }
}
