use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub photos: PhotoConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Relational backend. An empty `url` means the embedded SQLite file at
/// `embedded_path` is used instead.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_embedded_path")]
    pub embedded_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: String::new(), embedded_path: default_embedded_path() }
    }
}

/// HTTP table-store backend (PostgREST-style). Active only when both
/// `url` and `key` are present.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RestConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
}

impl RestConfig {
    pub fn enabled(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoConfig {
    #[serde(default = "default_photos_dir")]
    pub dir: String,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self { dir: default_photos_dir() }
    }
}

/// Optional retention policy. Off unless `purge_after_days` is set.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RetentionConfig {
    #[serde(default)]
    pub purge_after_days: Option<u32>,
}

fn default_embedded_path() -> String { "detail_log.db".to_string() }
fn default_photos_dir() -> String { "photos".to_string() }

/// Which storage backend the configuration resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Rest,
    Relational,
    Embedded,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    // The config file is optional; environment variables alone are enough.
    if std::path::Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
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

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_from_env();
        self.validate()?;
        Ok(())
    }

    /// Fill anything the TOML left empty from the process environment.
    pub fn normalize_from_env(&mut self) {
        if self.database.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.database.url = url;
            }
        }
        if self.rest.url.trim().is_empty() {
            if let Ok(url) = std::env::var("SUPABASE_URL") {
                self.rest.url = url;
            }
        }
        if self.rest.key.trim().is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
                self.rest.key = key;
            }
        }
        if let Ok(dir) = std::env::var("PHOTOS_DIR") {
            if !dir.trim().is_empty() {
                self.photos.dir = dir;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rest.enabled() {
            let lower = self.rest.url.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("rest.url must start with http:// or https://"));
            }
        }
        if !self.database.url.trim().is_empty() {
            let lower = self.database.url.to_lowercase();
            if !(lower.starts_with("postgresql://")
                || lower.starts_with("postgres://")
                || lower.starts_with("sqlite:"))
            {
                return Err(anyhow!(
                    "database.url must start with postgresql://, postgres:// or sqlite:"
                ));
            }
        }
        if self.database.embedded_path.trim().is_empty() {
            return Err(anyhow!("database.embedded_path must not be empty"));
        }
        if self.photos.dir.trim().is_empty() {
            return Err(anyhow!("photos.dir must not be empty"));
        }
        if let Some(days) = self.retention.purge_after_days {
            if days == 0 {
                return Err(anyhow!("retention.purge_after_days must be >= 1"));
            }
        }
        Ok(())
    }

    /// Backend precedence: REST credentials win, then a relational URL,
    /// then the embedded SQLite file.
    pub fn backend(&self) -> BackendKind {
        if self.rest.enabled() {
            BackendKind::Rest
        } else if !self.database.url.trim().is_empty() {
            BackendKind::Relational
        } else {
            BackendKind::Embedded
        }
    }

    /// Connection URL for the relational/embedded backends.
    pub fn database_url(&self) -> String {
        if !self.database.url.trim().is_empty() {
            self.database.url.clone()
        } else {
            format!("sqlite://{}?mode=rwc", self.database.embedded_path)
        }
    }
}
