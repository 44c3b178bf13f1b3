// Draftable teams and the immutable catalog snapshot they live in.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::scoring::{composite_score, ScoringWeights};

// ---------------------------------------------------------------------------
// Identifiers and records
// ---------------------------------------------------------------------------

/// Stable team identifier (the competition team number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TeamId {
    fn from(n: u32) -> Self {
        TeamId(n)
    }
}

/// Performance metrics reported for a team. Anything not reported is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMetrics {
    pub total_score: f64,
    pub auto_score: f64,
    pub teleop_score: f64,
    pub endgame_score: f64,
    /// Team is known to play defense.
    pub defense: bool,
    /// Robot quality estimate used as a score multiplier.
    pub valuation: f64,
    /// 0-100.
    pub consistency: f64,
    /// 0-100.
    pub clutch: f64,
    /// Fraction of matches spent defending.
    pub defense_rate: f64,
    /// Season-specific secondary scoring (e.g. game piece specialists).
    pub specialty_score: f64,
    /// Fraction of matches the robot died or broke down.
    pub failure_rate: f64,
}

/// One catalog entry as supplied by the scouting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    #[serde(alias = "team", alias = "num")]
    pub id: TeamId,
    /// 1-based competition ranking, smaller is better.
    pub rank: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub metrics: TeamMetrics,
}

// ---------------------------------------------------------------------------
// Scored teams
// ---------------------------------------------------------------------------

/// A catalog team with its composite score computed under the catalog's
/// weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub id: TeamId,
    pub rank: u32,
    pub name: String,
    pub metrics: TeamMetrics,
    pub score: f64,
}

impl Team {
    fn from_record(record: TeamRecord, weights: &ScoringWeights) -> Self {
        let score = composite_score(&record.metrics, weights);
        Team {
            id: record.id,
            rank: record.rank,
            name: record.name.unwrap_or_else(|| record.id.to_string()),
            metrics: record.metrics,
            score,
        }
    }
}

/// Immutable snapshot of every draftable team, ordered by competition rank.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamCatalog {
    teams: Vec<Team>,
    index: HashMap<TeamId, usize>,
    weights: ScoringWeights,
}

impl TeamCatalog {
    /// Score every record and order the result by `(rank, id)`.
    ///
    /// Fails with `DuplicateTeam` if an id appears twice.
    pub fn from_records(
        records: Vec<TeamRecord>,
        weights: &ScoringWeights,
    ) -> Result<Self, DraftError> {
        let mut teams: Vec<Team> = records
            .into_iter()
            .map(|r| Team::from_record(r, weights))
            .collect();
        teams.sort_by_key(|t| (t.rank, t.id));

        let mut index = HashMap::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            if index.insert(team.id, i).is_some() {
                return Err(DraftError::DuplicateTeam(team.id));
            }
        }

        Ok(TeamCatalog {
            teams,
            index,
            weights: *weights,
        })
    }

    /// An empty catalog (no teams, no alliances).
    pub fn empty(weights: &ScoringWeights) -> Self {
        TeamCatalog {
            teams: Vec::new(),
            index: HashMap::new(),
            weights: *weights,
        }
    }

    /// The same teams scored under different weights.
    pub fn rescored(&self, weights: &ScoringWeights) -> Self {
        let teams = self
            .teams
            .iter()
            .map(|t| Team {
                score: composite_score(&t.metrics, weights),
                ..t.clone()
            })
            .collect();
        TeamCatalog {
            teams,
            index: self.index.clone(),
            weights: *weights,
        }
    }

    /// Teams in ascending rank order.
    pub fn by_rank(&self) -> &[Team] {
        &self.teams
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.index.get(&id).map(|&i| &self.teams[i])
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.index.contains_key(&id)
    }

    /// Composite score of `id`, or 0.0 for an id not in the catalog.
    pub fn score_of(&self, id: TeamId) -> f64 {
        self.get(id).map(|t| t.score).unwrap_or(0.0)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
