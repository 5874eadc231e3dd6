use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Outbound SMTP settings. When the whole section is missing the server
/// falls back to a sender that only logs.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

fn default_smtp_port() -> u16 { 587 }
fn default_starttls() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_allowed_origins() }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise everything from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // URL may come from DATABASE_URL when the file leaves it out
        self.database.normalize_from_env();
        self.database.validate()?;
        if self.mail.is_none() {
            self.mail = MailConfig::from_env();
        }
        if let Some(mail) = &self.mail {
            mail.validate()?;
        }
        self.cors.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Defaults for everything but the URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        if self.max_connections == 0 && self.min_connections == 0 {
            *self = Self::with_url(std::mem::take(&mut self.url));
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || self.is_sqlite()) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl MailConfig {
    /// Builds the section from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD`, `SMTP_FROM` and `SMTP_STARTTLS`; `None` without a host.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_smtp_port);
        let username = std::env::var("SMTP_USERNAME").ok();
        let password = std::env::var("SMTP_PASSWORD").ok();
        let from = std::env::var("SMTP_FROM")
            .ok()
            .or_else(|| username.clone())
            .unwrap_or_default();
        let starttls = std::env::var("SMTP_STARTTLS")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);
        Some(Self { host, port, username, password, from, starttls })
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("mail.host is empty"));
        }
        if self.from.trim().is_empty() {
            return Err(anyhow!("mail.from is empty; set it or provide SMTP_FROM"));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(anyhow!("mail.username and mail.password must be set together"));
        }
        Ok(())
    }
}

impl CorsConfig {
    fn normalize(&mut self) {
        self.allowed_origins.retain(|o| !o.trim().is_empty());
        if self.allowed_origins.is_empty() {
            self.allowed_origins = default_allowed_origins();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://kg:kg@localhost/kindergarten"

            [mail]
            host = "smtp.example.com"
            username = "billing@example.com"
            password = "secret"
            from = "billing@example.com"

            [cors]
            allowed_origins = ["https://admin.example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        let mail = cfg.mail.as_ref().unwrap();
        assert_eq!(mail.port, 587);
        assert!(mail.starttls);
        assert_eq!(cfg.cors.allowed_origins, vec!["https://admin.example.com".to_string()]);
    }

    #[test]
    fn cors_defaults_to_local_frontend() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.cors.allowed_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn rejects_unknown_scheme() {
        let db = DatabaseConfig::with_url("mysql://localhost/db");
        assert!(db.validate().is_err());
    }

    #[test]
    fn accepts_sqlite_and_postgres() {
        assert!(DatabaseConfig::with_url("sqlite::memory:").validate().is_ok());
        assert!(DatabaseConfig::with_url("postgresql://u:p@h/db").validate().is_ok());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut db = DatabaseConfig::with_url("postgres://h/db");
        db.min_connections = 5;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }

    #[test]
    fn mail_credentials_must_pair() {
        let mail = MailConfig {
            host: "smtp".into(),
            port: 25,
            username: Some("u".into()),
            password: None,
            from: "a@b".into(),
            starttls: false,
        };
        assert!(mail.validate().is_err());
    }
}
