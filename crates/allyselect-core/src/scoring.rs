// Composite score: weighted phase contributions plus flat bonuses, scaled by
// robot valuation.

use serde::{Deserialize, Serialize};

use crate::team::TeamMetrics;

/// Consistency and clutch are reported on a 0-100 scale.
const PERCENT_DIVISOR: f64 = 100.0;

/// Valuation contributes `valuation / 1000` on top of a 1.0 multiplier.
const VALUATION_DIVISOR: f64 = 1000.0;

/// Weight configuration for the composite score. Constructed once and passed
/// by reference to every scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub auto: f64,
    pub teleop: f64,
    pub endgame: f64,
    /// Flat bonus for teams flagged as defenders.
    pub defense_bonus: f64,
    pub consistency: f64,
    pub clutch: f64,
    /// Multiply the total by `1 + valuation / 1000`.
    pub apply_valuation: bool,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            auto: 1.5,
            teleop: 1.0,
            endgame: 1.2,
            defense_bonus: 12.0,
            consistency: 5.0,
            clutch: 8.0,
            apply_valuation: true,
        }
    }
}

impl ScoringWeights {
    /// Named weight values, for validation and display.
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("auto", self.auto),
            ("teleop", self.teleop),
            ("endgame", self.endgame),
            ("defense_bonus", self.defense_bonus),
            ("consistency", self.consistency),
            ("clutch", self.clutch),
        ]
    }
}

/// Compute the composite score for one team's metrics.
///
/// Pure: the same metrics and weights always produce the same value. Metrics
/// that were never reported are zero and contribute nothing.
pub fn composite_score(metrics: &TeamMetrics, weights: &ScoringWeights) -> f64 {
    let base = weights.auto * metrics.auto_score
        + weights.teleop * metrics.teleop_score
        + weights.endgame * metrics.endgame_score;

    let defense = if metrics.defense { weights.defense_bonus } else { 0.0 };
    let consistency = metrics.consistency / PERCENT_DIVISOR * weights.consistency;
    let clutch = metrics.clutch / PERCENT_DIVISOR * weights.clutch;

    let multiplier = if weights.apply_valuation {
        1.0 + metrics.valuation / VALUATION_DIVISOR
    } else {
        1.0
    };

    (base + defense + consistency + clutch) * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(auto: f64, teleop: f64, endgame: f64) -> TeamMetrics {
        TeamMetrics {
            auto_score: auto,
            teleop_score: teleop,
            endgame_score: endgame,
            ..TeamMetrics::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn phase_weights_combine_linearly() {
        let w = ScoringWeights::default();
        let score = composite_score(&metrics(30.0, 50.0, 20.0), &w);
        // 1.5*30 + 1.0*50 + 1.2*20 = 45 + 50 + 24
        assert!(approx(score, 119.0), "got {score}");
    }

    #[test]
    fn defense_flag_adds_flat_bonus() {
        let w = ScoringWeights::default();
        let mut m = metrics(10.0, 10.0, 10.0);
        let without = composite_score(&m, &w);
        m.defense = true;
        let with = composite_score(&m, &w);
        assert!(approx(with - without, 12.0));
    }

    #[test]
    fn consistency_and_clutch_are_percent_scaled() {
        let w = ScoringWeights::default();
        let m = TeamMetrics {
            consistency: 80.0,
            clutch: 50.0,
            ..TeamMetrics::default()
        };
        // 0.8*5 + 0.5*8
        assert!(approx(composite_score(&m, &w), 8.0));
    }

    #[test]
    fn valuation_scales_total() {
        let m = TeamMetrics {
            teleop_score: 100.0,
            valuation: 250.0,
            ..TeamMetrics::default()
        };
        let w = ScoringWeights::default();
        assert!(approx(composite_score(&m, &w), 125.0));

        let flat = ScoringWeights {
            apply_valuation: false,
            ..w
        };
        assert!(approx(composite_score(&m, &flat), 100.0));
    }

    #[test]
    fn missing_metrics_score_zero() {
        let w = ScoringWeights::default();
        assert!(approx(composite_score(&TeamMetrics::default(), &w), 0.0));
    }

    #[test]
    fn scoring_is_deterministic() {
        let w = ScoringWeights::default();
        let m = TeamMetrics {
            auto_score: 12.3,
            teleop_score: 45.6,
            endgame_score: 7.8,
            defense: true,
            consistency: 91.0,
            clutch: 33.0,
            valuation: 120.0,
            ..TeamMetrics::default()
        };
        let first = composite_score(&m, &w);
        for _ in 0..10 {
            assert_eq!(composite_score(&m, &w).to_bits(), first.to_bits());
        }
    }
}
