// Draft configuration: config/draft.toml, seeded from defaults/ on first run.

use std::path::{Path, PathBuf};

use allyselect_core::{DraftRules, ScoringWeights};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// File name of the draft configuration inside `config/` and `defaults/`.
const DRAFT_FILE: &str = "draft.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no draft config at {path}")]
    Missing { path: PathBuf },

    #[error("{path} is not a valid draft config: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("draft setting `{field}` is invalid: {message}")]
    Invalid { field: String, message: String },

    #[error("could not seed config/ from defaults/: {message}")]
    Seed { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for draft.toml.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    #[serde(default)]
    draft: DraftRules,
    #[serde(default)]
    weights: ScoringWeights,
    data: DataSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    catalog: String,
}

/// Fully assembled and validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub rules: DraftRules,
    pub weights: ScoringWeights,
    /// Team catalog file (`.csv` or `.json`), relative to the working
    /// directory unless absolute.
    pub catalog_path: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draft.toml` under `base_dir`. Does not seed
/// from defaults; see `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(DRAFT_FILE);
    let text =
        std::fs::read_to_string(&path).map_err(|_| ConfigError::Missing { path: path.clone() })?;
    parse_config(&text).map_err(|e| match e {
        ParseFailure::Toml(source) => ConfigError::Parse { path, source },
        ParseFailure::Invalid(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_config(text: &str) -> Result<Config, ParseFailure> {
    let file: DraftFile = toml::from_str(text).map_err(ParseFailure::Toml)?;
    let config = Config {
        rules: file.draft,
        weights: file.weights,
        catalog_path: file.data.catalog,
    };
    validate(&config).map_err(ParseFailure::Invalid)?;
    Ok(config)
}

/// Seed `config/` with every `.toml` file from `defaults/` that the operator
/// has not created yet. Existing files are never overwritten. Returns the
/// files written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let seed_err = |message: String| ConfigError::Seed { message };

    if !defaults_dir.is_dir() {
        return if config_dir.join(DRAFT_FILE).is_file() {
            Ok(vec![])
        } else {
            Err(seed_err(format!(
                "{} has neither defaults/{DRAFT_FILE} nor config/{DRAFT_FILE}",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_err(format!("cannot create {}: {e}", config_dir.display())))?;

    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| seed_err(format!("cannot list {}: {e}", defaults_dir.display())))?;

    let mut seeded = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| seed_err(format!("cannot list {}: {e}", defaults_dir.display())))?
            .path();
        let is_toml = source.extension().is_some_and(|ext| ext == "toml");
        let Some(file_name) = source.file_name().filter(|_| is_toml && source.is_file()) else {
            continue;
        };
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            seed_err(format!("{} -> {}: {e}", source.display(), target.display()))
        })?;
        info!("seeded {} from {}", target.display(), source.display());
        seeded.push(target);
    }

    Ok(seeded)
}

/// Load config relative to the current working directory, seeding it from
/// defaults first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::Missing {
        path: PathBuf::from("config").join(DRAFT_FILE),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message,
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let rules = &config.rules;
    rules
        .validate()
        .map_err(|e| invalid("draft.teams_per_alliance", e.to_string()))?;
    if rules.max_alliances == 0 {
        return Err(invalid("draft.max_alliances", "at least one alliance is required".into()));
    }

    for (name, val) in config.weights.named() {
        if !val.is_finite() || val < 0.0 {
            return Err(invalid(
                &format!("weights.{name}"),
                format!("must be a finite value >= 0, got {val}"),
            ));
        }
    }

    if config.catalog_path.trim().is_empty() {
        return Err(invalid("data.catalog", "a team catalog path is required".into()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
