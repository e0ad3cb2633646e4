// Configuration loading and parsing (config/analysis.toml).

use crate::classify::differentials::{DifferentialParams, PriceRange};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "analysis.toml";

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data_paths: DataPaths,
    pub classifier: ClassifierConfig,
    pub differentials: DifferentialParams,
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire analysis.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    data: DataPaths,
    #[serde(default)]
    classifier: ClassifierConfig,
    #[serde(default)]
    differentials: DifferentialsSection,
}

/// Snapshot file locations, relative to the base directory unless absolute.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub bootstrap: String,
    pub fixtures: String,
}

impl DataPaths {
    /// Resolve both paths against `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> (PathBuf, PathBuf) {
        (base_dir.join(&self.bootstrap), base_dir.join(&self.fixtures))
    }
}

/// Tunables shared by the ranking rules.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Form gap within which the secondary (momentum) key decides.
    pub tie_window: f64,
    /// Fixture horizon (matches) for the main difficulty checks.
    pub long_horizon: usize,
    /// Fixture horizon for the near-term turnaround check.
    pub short_horizon: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            tie_window: 0.5,
            long_horizon: 5,
            short_horizon: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DifferentialsSection {
    ownership_threshold: u8,
    price_range: String,
    good_fixtures_only: bool,
    positive_momentum_only: bool,
}

impl Default for DifferentialsSection {
    fn default() -> Self {
        let params = DifferentialParams::default();
        DifferentialsSection {
            ownership_threshold: params.ownership_threshold(),
            price_range: params.price_range().label().to_string(),
            good_fixtures_only: params.good_fixtures_only(),
            positive_momentum_only: params.positive_momentum_only(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analysis.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config` does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::ParseError {
            path: path.clone(),
            source,
        },
        ParseFailure::Invalid(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let file: AnalysisFile = toml::from_str(text).map_err(ParseFailure::Toml)?;

    validate_classifier(&file.classifier).map_err(ParseFailure::Invalid)?;
    let differentials = build_differentials(&file.differentials).map_err(ParseFailure::Invalid)?;

    Ok(Config {
        data_paths: file.data,
        classifier: file.classifier,
        differentials,
    })
}

/// Seed `config/analysis.toml` from `defaults/analysis.toml` on first run.
///
/// Returns the path written, or `None` when a config file is already in
/// place. An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "no config/{CONFIG_FILE} and cannot read {} ({e}); \
             run from the project root or pass --base-dir",
            source.display()
        ),
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        // another run seeded it first
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    info!("Seeded {} from defaults", target.display());
    Ok(Some(target))
}

/// Copy defaults if needed, then load config from `base_dir`.
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

fn validate_classifier(c: &ClassifierConfig) -> Result<(), ConfigError> {
    if !c.tie_window.is_finite() || c.tie_window < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "classifier.tie_window".into(),
            message: format!("must be a finite value >= 0, got {}", c.tie_window),
        });
    }

    let horizons: &[(&str, usize)] = &[
        ("classifier.long_horizon", c.long_horizon),
        ("classifier.short_horizon", c.short_horizon),
    ];
    for (name, val) in horizons {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if c.short_horizon > c.long_horizon {
        return Err(ConfigError::ValidationError {
            field: "classifier.short_horizon".into(),
            message: format!(
                "must not exceed long_horizon ({}), got {}",
                c.long_horizon, c.short_horizon
            ),
        });
    }

    Ok(())
}

fn build_differentials(section: &DifferentialsSection) -> Result<DifferentialParams, ConfigError> {
    let price_range =
        PriceRange::from_label(&section.price_range).ok_or_else(|| ConfigError::ValidationError {
            field: "differentials.price_range".into(),
            message: format!(
                "must be one of all, budget, mid, premium; got `{}`",
                section.price_range
            ),
        })?;

    let params = DifferentialParams::new(section.ownership_threshold).map_err(|e| {
        ConfigError::ValidationError {
            field: "differentials.ownership_threshold".into(),
            message: e.to_string(),
        }
    })?;

    Ok(params
        .with_price_range(price_range)
        .with_good_fixtures_only(section.good_fixtures_only)
        .with_positive_momentum_only(section.positive_momentum_only))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
