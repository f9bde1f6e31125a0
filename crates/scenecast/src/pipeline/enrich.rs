//! Optional semantic enrichment.
//!
//! A [`SemanticAnalyzer`] can supply a better graph for a scene than rule
//! based extraction. The pipeline works without one; when one is attached
//! its failures degrade the scene instead of failing the job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scenecast_core::semantic::ExtractionDegraded;
use scenecast_text::GraphDraft;

/// An entity found by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedEntity {
    pub id: String,
    pub label: String,
}

/// A directed relation between two analyzed entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRelation {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The analyzer's answer for one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub entities: Vec<AnalyzedEntity>,
    pub relations: Vec<AnalyzedRelation>,
}

impl Analysis {
    /// Converts the analysis into an unvalidated draft.
    pub fn into_draft(self) -> GraphDraft {
        let mut draft = GraphDraft::new();
        for entity in self.entities {
            draft.add_node(entity.id, entity.label);
        }
        for relation in self.relations {
            draft.add_edge(relation.from, relation.to);
            if let Some(edge) = draft.edges.last_mut() {
                edge.label = relation.label;
            }
        }
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentError {
    #[error("analyzer timed out")]
    Timeout,

    #[error("analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("analyzer returned malformed output: {0}")]
    Malformed(String),
}

impl EnrichmentError {
    /// Timeouts and unavailability are transient; malformed output is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unavailable(_))
    }

    /// The degradation recorded in scene quality.
    pub fn degradation(&self) -> ExtractionDegraded {
        match self {
            Self::Timeout => ExtractionDegraded::Timeout,
            Self::Unavailable(_) => ExtractionDegraded::Unavailable,
            Self::Malformed(_) => ExtractionDegraded::Malformed,
        }
    }
}

/// External semantic analysis service.
#[async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Analysis, EnrichmentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_from_json() {
        let analysis: Analysis = serde_json::from_str(
            r#"{
                "entities": [{"id": "a", "label": "Plan"}, {"id": "b", "label": "Build"}],
                "relations": [{"from": "a", "to": "b", "label": "then"}]
            }"#,
        )
        .unwrap();
        let draft = analysis.into_draft();
        assert_eq!(draft.nodes.len(), 2);
        assert_eq!(draft.edges[0].label.as_deref(), Some("then"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_error_classification() {
        assert!(EnrichmentError::Timeout.is_retryable());
        assert!(EnrichmentError::Unavailable("503".into()).is_retryable());
        assert!(!EnrichmentError::Malformed("bad".into()).is_retryable());
        assert_eq!(
            EnrichmentError::Malformed("bad".into()).degradation(),
            ExtractionDegraded::Malformed
        );
    }
}
