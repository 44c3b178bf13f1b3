// Team catalog loading from CSV or JSON files.
//
// The scouting pipeline hands over one row per team with the metrics the
// scorer needs. Blank cells are treated as unreported (zero); rows that cannot
// be parsed at all are skipped with a warning.

use std::io::Read;
use std::path::Path;

use allyselect_core::{TeamId, TeamMetrics, TeamRecord};
use serde::Deserialize;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One CSV row. Every metric is optional so that blank cells do not reject
/// the row; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawTeamRow {
    #[serde(alias = "team", alias = "num")]
    id: u32,
    rank: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    total_score: Option<f64>,
    #[serde(default)]
    auto_score: Option<f64>,
    #[serde(default)]
    teleop_score: Option<f64>,
    #[serde(default)]
    endgame_score: Option<f64>,
    #[serde(default)]
    defense: Option<String>,
    #[serde(default)]
    valuation: Option<f64>,
    #[serde(default)]
    consistency: Option<f64>,
    #[serde(default)]
    clutch: Option<f64>,
    #[serde(default)]
    defense_rate: Option<f64>,
    #[serde(default)]
    specialty_score: Option<f64>,
    #[serde(default)]
    failure_rate: Option<f64>,
}

impl RawTeamRow {
    fn into_record(self) -> TeamRecord {
        let metrics = TeamMetrics {
            total_score: self.total_score.unwrap_or(0.0),
            auto_score: self.auto_score.unwrap_or(0.0),
            teleop_score: self.teleop_score.unwrap_or(0.0),
            endgame_score: self.endgame_score.unwrap_or(0.0),
            defense: self.defense.as_deref().is_some_and(parse_flag),
            valuation: self.valuation.unwrap_or(0.0),
            consistency: self.consistency.unwrap_or(0.0),
            clutch: self.clutch.unwrap_or(0.0),
            defense_rate: self.defense_rate.unwrap_or(0.0),
            specialty_score: self.specialty_score.unwrap_or(0.0),
            failure_rate: self.failure_rate.unwrap_or(0.0),
        };
        TeamRecord {
            id: TeamId(self.id),
            rank: self.rank,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            metrics,
        }
    }
}

/// Spreadsheet-style truthy values: `true`, `yes`, `y`, `x`, `1`.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "x" | "1"
    )
}

fn all_finite(metrics: &TeamMetrics) -> bool {
    [
        metrics.total_score,
        metrics.auto_score,
        metrics.teleop_score,
        metrics.endgame_score,
        metrics.valuation,
        metrics.consistency,
        metrics.clutch,
        metrics.defense_rate,
        metrics.specialty_score,
        metrics.failure_rate,
    ]
    .iter()
    .all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawTeamRow>() {
        match result {
            Ok(raw) => {
                let record = raw.into_record();
                if !all_finite(&record.metrics) {
                    warn!("skipping team {}: non-finite metric value", record.id);
                    continue;
                }
                records.push(record);
            }
            Err(e) => {
                warn!("skipping malformed team row: {}", e);
            }
        }
    }
    Ok(records)
}

fn load_json_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamRecord>, serde_json::Error> {
    serde_json::from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load catalog records from `path`. Files ending in `.json` are read as a
/// JSON array of records; anything else is read as CSV.
pub fn load_catalog(path: &Path) -> Result<Vec<TeamRecord>, CatalogError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: display.clone(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let records = if is_json {
        load_json_from_reader(file).map_err(|e| CatalogError::Json {
            path: display.clone(),
            source: e,
        })?
    } else {
        load_csv_from_reader(file).map_err(|e| CatalogError::Csv {
            path: display.clone(),
            source: e,
        })?
    };

    if records.is_empty() {
        return Err(CatalogError::Validation(format!(
            "{display} produced zero valid team rows"
        )));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
