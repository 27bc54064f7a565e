// Configuration loading and parsing (config/dashboard.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Datelike;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::dataset::LoadOptions;
use crate::photo::{PhotoResolver, DEFAULT_PLACEHOLDER_URL};

pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Assembled configuration. Relative data paths resolve against `base_dir`.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub data: DataConfig,
    pub filters: FilterConfig,
    pub photos: PhotoConfig,
    pub logging: LoggingConfig,
}

/// Raw deserialization target for dashboard.toml.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    data: DataConfig,
    #[serde(default)]
    filters: FilterConfig,
    #[serde(default)]
    photos: PhotoConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Current-season export.
    pub current_season: String,
    /// Prior-season export, joined for the value/wage deltas.
    pub prior_season: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Drop players whose contract ended before the reference year.
    #[serde(default)]
    pub exclude_expired_contracts: bool,
    /// Reference year for the contract filter; the current calendar year
    /// when omitted.
    #[serde(default)]
    pub contract_reference_year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoConfig {
    #[serde(default = "default_photo_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_placeholder")]
    pub placeholder_url: String,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_photo_timeout(),
            placeholder_url: default_placeholder(),
        }
    }
}

fn default_photo_timeout() -> u64 {
    5
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_filter() -> String {
    "pitchside=info,warn".to_string()
}

impl Config {
    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn current_season_path(&self) -> PathBuf {
        self.resolve(&self.data.current_season)
    }

    pub fn prior_season_path(&self) -> PathBuf {
        self.resolve(&self.data.prior_season)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.directory)
    }

    /// Loader options derived from the `[filters]` section.
    pub fn load_options(&self) -> LoadOptions {
        let min_contract_year = self.filters.exclude_expired_contracts.then(|| {
            self.filters
                .contract_reference_year
                .unwrap_or_else(|| chrono::Local::now().year())
        });
        LoadOptions { min_contract_year }
    }

    pub fn photo_resolver(&self) -> PhotoResolver {
        PhotoResolver::new(
            Duration::from_secs(self.photos.timeout_secs),
            self.photos.placeholder_url.clone(),
        )
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: DashboardFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        data: file.data,
        filters: file.filters,
        photos: file.photos,
        logging: file.logging,
    };

    validate(&config)?;

    Ok(config)
}

/// Make sure `config/dashboard.toml` exists under `base_dir`, seeding it
/// from `defaults/dashboard.toml` on first run. Returns the path written,
/// or `None` when a config was already in place.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }
    let seed = base_dir.join("defaults").join(CONFIG_FILE);
    let copy_err = |what: &str, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{what}: {e}"),
    };

    let content = std::fs::read(&seed).map_err(|e| {
        copy_err(
            &format!(
                "no {} and no {} to seed it from",
                target.display(),
                seed.display()
            ),
            e,
        )
    })?;
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| copy_err("cannot create config/", e))?;
    }

    // create_new: a config written concurrently is never clobbered.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(copy_err(&format!("cannot create {}", target.display()), e)),
    };
    std::io::Write::write_all(&mut dest, &content)
        .map_err(|e| copy_err(&format!("cannot write {}", target.display()), e))?;
    info!(path = %target.display(), "seeded config from defaults");
    Ok(Some(target))
}

/// Loads config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let paths: &[(&str, &str)] = &[
        ("data.current_season", config.data.current_season.as_str()),
        ("data.prior_season", config.data.prior_season.as_str()),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.photos.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "photos.timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    if let Some(year) = config.filters.contract_reference_year {
        if !(1900..=2100).contains(&year) {
            return Err(ConfigError::ValidationError {
                field: "filters.contract_reference_year".into(),
                message: format!("must be between 1900 and 2100, got {year}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
