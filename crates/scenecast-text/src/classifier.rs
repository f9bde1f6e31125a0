//! Diagram archetype classification.

use log::debug;
use scenecast_core::semantic::Archetype;
use serde::{Deserialize, Serialize};

use crate::scorer::{ArchetypeScore, ScoredText};

/// Thresholds for turning scores into a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Score that maps to full confidence before the 0.95 cap.
    pub normalizing_constant: f32,
    /// Top scores at or below this fall back to a low-confidence flow.
    pub min_score: f32,
    /// Relative gap under which the runner-up counts as tied with the winner.
    pub tie_margin: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            normalizing_constant: 40.0,
            min_score: 5.0,
            tie_margin: 0.05,
        }
    }
}

/// Confidence reported for the fallback classification.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// Confidence never exceeds this value.
pub const MAX_CONFIDENCE: f32 = 0.95;

/// The outcome of classifying one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub archetype: Archetype,
    pub confidence: f32,
    /// Total score per archetype, in declaration order.
    pub score_breakdown: Vec<(Archetype, f32)>,
    /// Structural bonus per archetype, in declaration order.
    pub structural_bonus: Vec<(Archetype, f32)>,
    /// Set when no archetype scored above the minimum.
    pub low_confidence: bool,
}

impl ClassificationResult {
    /// The total score recorded for `archetype`.
    pub fn score_of(&self, archetype: Archetype) -> f32 {
        self.score_breakdown
            .iter()
            .find(|(a, _)| *a == archetype)
            .map_or(0.0, |(_, score)| *score)
    }
}

/// Picks the best-fit archetype for a scene's text.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies `text`.
    ///
    /// The arg-max of the per-archetype scores wins; equal scores keep
    /// declaration order. When the runner-up is within `tie_margin` of the
    /// winner, the one with the larger structural bonus is chosen instead.
    /// A top score at or below `min_score` yields [`Archetype::Flow`] with
    /// [`FALLBACK_CONFIDENCE`] and `low_confidence` set.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let scored = ScoredText::new(text);
        let scores: Vec<(Archetype, ArchetypeScore)> = Archetype::ALL
            .iter()
            .map(|&archetype| (archetype, scored.score(archetype)))
            .collect();

        let score_breakdown: Vec<(Archetype, f32)> = scores
            .iter()
            .map(|(archetype, score)| (*archetype, score.total()))
            .collect();
        let structural_bonus: Vec<(Archetype, f32)> = scores
            .iter()
            .map(|(archetype, score)| (*archetype, score.structural_bonus))
            .collect();

        let mut ranked = scores.clone();
        // Stable sort keeps declaration order among equal totals
        ranked.sort_by(|(_, a), (_, b)| b.total().total_cmp(&a.total()));

        let (mut winner, mut winner_score) = ranked[0];
        let (runner_up, runner_up_score) = ranked[1];

        if winner_score.total() <= self.config.min_score {
            debug!(
                top_score = winner_score.total(),
                min_score = self.config.min_score;
                "Classification below minimum score, falling back to flow"
            );
            return ClassificationResult {
                archetype: Archetype::Flow,
                confidence: FALLBACK_CONFIDENCE,
                score_breakdown,
                structural_bonus,
                low_confidence: true,
            };
        }

        let gap = winner_score.total() - runner_up_score.total();
        if gap <= self.config.tie_margin * winner_score.total()
            && runner_up_score.structural_bonus > winner_score.structural_bonus
        {
            debug!(
                winner:? = winner,
                runner_up:? = runner_up;
                "Near tie resolved by structural bonus"
            );
            winner = runner_up;
            winner_score = runner_up_score;
        }

        let confidence =
            (winner_score.total() / self.config.normalizing_constant).min(MAX_CONFIDENCE);

        debug!(
            archetype:? = winner,
            confidence,
            score = winner_score.total();
            "Classified scene"
        );

        ClassificationResult {
            archetype: winner,
            confidence,
            score_breakdown,
            structural_bonus,
            low_confidence: false,
        }
    }
}

/// Classifies `text` with the default configuration.
pub fn classify(text: &str) -> ClassificationResult {
    Classifier::default().classify(text)
}
