use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use gradebook_core::GuardConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub login_guard: LoginGuardConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginGuardConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_lockout_window_secs")]
    pub lockout_window_secs: u64,
    /// Idle records are swept after this many lockout windows.
    #[serde(default = "default_stale_after_windows")]
    pub stale_after_windows: u32,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin is accepted.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// Take the client address from `X-Forwarded-For` instead of the socket.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_db_host() -> String { "localhost".to_string() }
fn default_db_port() -> u16 { 5432 }
fn default_db_user() -> String { "postgres".to_string() }
fn default_db_password() -> String { "password".to_string() }
fn default_db_name() -> String { "student_system".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_acquire_timeout_secs() -> u64 { 5 }
fn default_max_attempts() -> u32 { 3 }
fn default_lockout_window_secs() -> u64 { 15 * 60 }
fn default_stale_after_windows() -> u32 { 4 }
fn default_sweep_interval_secs() -> u64 { 60 }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            name: default_db_name(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl Default for LoginGuardConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            lockout_window_secs: default_lockout_window_secs(),
            stale_after_windows: default_stale_after_windows(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl LoginGuardConfig {
    pub fn guard_config(&self) -> GuardConfig {
        let lockout_window = Duration::from_secs(self.lockout_window_secs);
        GuardConfig {
            max_attempts: self.max_attempts,
            lockout_window,
            stale_after: lockout_window
                .checked_mul(self.stale_after_windows.max(1))
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self { public_dir: default_public_dir() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database: DatabaseConfig::default(),
            login_guard: LoginGuardConfig::default(),
            cors: CorsConfig::default(),
            static_files: StaticFilesConfig::default(),
            proxy: ProxyConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn tls_enabled(&self) -> bool {
        self.tls.cert_path.is_some() && self.tls.key_path.is_some()
    }

    /// Loads the optional TOML file named by `GRADEBOOK_CONFIG`, then applies
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("GRADEBOOK_CONFIG") {
            Ok(path) => Self::from_file(&PathBuf::from(path))?,
            Err(_) => ServerConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(port) = lookup("PORT") {
            self.bind_addr.set_port(port.parse()?);
        }
        if let Some(addr) = lookup("GRADEBOOK_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.database.port = port.parse()?;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            self.database.max_connections = max.parse()?;
        }

        if let Some(max) = lookup("LOGIN_MAX_ATTEMPTS") {
            self.login_guard.max_attempts = max.parse()?;
        }
        if let Some(secs) = lookup("LOGIN_LOCKOUT_SECS") {
            self.login_guard.lockout_window_secs = secs.parse()?;
        }

        if let Some(val) = lookup("GRADEBOOK_TRUST_FORWARDED_FOR") {
            self.proxy.trust_forwarded_for = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Some(dir) = lookup("GRADEBOOK_PUBLIC_DIR") {
            self.static_files.public_dir = PathBuf::from(dir);
        }
        if let Some(origins) = lookup("GRADEBOOK_CORS_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(cert) = lookup("GRADEBOOK_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = lookup("GRADEBOOK_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.login_guard.max_attempts == 0 {
            anyhow::bail!("login_guard.max_attempts must be at least 1");
        }
        if self.login_guard.lockout_window_secs == 0 {
            anyhow::bail!("login_guard.lockout_window_secs must be greater than zero");
        }
        if self.tls.cert_path.is_some() != self.tls.key_path.is_some() {
            tracing::warn!("TLS needs both a certificate and a key; serving plain HTTP");
        }
        Ok(())
    }
}
