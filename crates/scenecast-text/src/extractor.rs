//! Rule-based entity and relation extraction.
//!
//! [`Extractor::extract`] turns a scene's text into a [`GraphDraft`] shaped
//! for the scene's archetype. A draft supplied by an external analyzer goes
//! through [`Extractor::adopt`] instead, which validates it and applies the
//! same shaping.

mod candidates;
mod draft;
mod shape;
pub(crate) mod vocabulary;

use std::collections::HashMap;

use log::debug;
use scenecast_core::semantic::{Archetype, ExtractionSource};
use serde::{Deserialize, Serialize};

pub use draft::{DraftEdge, DraftNode, GraphDraft};

use crate::{error::TranscriptError, summary};
use candidates::normalize;
use vocabulary::capitalize;

/// Labels used when a scene yields too few significant words.
const PLACEHOLDER_LABELS: [&str; 2] = ["Overview", "Details"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Nodes beyond this count are dropped, in mention order.
    pub max_nodes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { max_nodes: 12 }
    }
}

/// A shaped draft and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub draft: GraphDraft,
    pub source: ExtractionSource,
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts a graph from `text`.
    ///
    /// Never returns an empty graph: with fewer than two candidates the
    /// result is a two-node placeholder built from the text's significant
    /// words, marked [`ExtractionSource::Placeholder`].
    pub fn extract(&self, text: &str, archetype: Archetype) -> Extraction {
        let detected = candidates::detect(text, archetype);

        if detected.entities.len() < 2 {
            debug!(
                candidates = detected.entities.len(),
                archetype:? = archetype;
                "Too few candidates, using placeholder graph"
            );
            let existing = detected
                .entities
                .values()
                .next()
                .map(|entity| entity.label.clone());
            return Extraction {
                draft: placeholder(text, existing),
                source: ExtractionSource::Placeholder,
            };
        }

        let mut draft = GraphDraft::new();
        let mut hints = HashMap::new();
        for (index, entity) in detected.entities.values().enumerate() {
            let id = node_id(index);
            if let Some(hint) = entity.order_hint {
                hints.insert(id.clone(), hint);
            }
            draft.add_node(id, entity.label.clone());
        }
        for (from, to) in &detected.relations {
            let from = detected.entities.get_index_of(from);
            let to = detected.entities.get_index_of(to);
            if let (Some(from), Some(to)) = (from, to) {
                draft.add_edge(node_id(from), node_id(to));
            }
        }

        draft.truncate_nodes(self.config.max_nodes);
        let draft = shape::shape(draft, archetype, &hints);

        debug!(
            nodes = draft.nodes.len(),
            edges = draft.edges.len(),
            archetype:? = archetype;
            "Extracted scene graph"
        );

        Extraction {
            draft,
            source: ExtractionSource::RuleBased,
        }
    }

    /// Validates an externally supplied draft and shapes it for `archetype`.
    ///
    /// # Errors
    ///
    /// Returns every validation problem when the draft has no nodes, empty
    /// or duplicate ids, dangling edges or self loops.
    pub fn adopt(
        &self,
        mut draft: GraphDraft,
        archetype: Archetype,
    ) -> Result<GraphDraft, TranscriptError> {
        draft.validate()?;
        draft.truncate_nodes(self.config.max_nodes);
        Ok(shape::shape(draft, archetype, &HashMap::new()))
    }
}

/// Extracts a graph from `text` with the default configuration.
pub fn extract(text: &str, archetype: Archetype) -> Extraction {
    Extractor::default().extract(text, archetype)
}

fn node_id(index: usize) -> String {
    format!("n{index}")
}

fn placeholder(text: &str, existing: Option<String>) -> GraphDraft {
    let mut labels: Vec<String> = existing.into_iter().collect();

    for word in summary::significant_words(text) {
        if labels.len() == 2 {
            break;
        }
        let key = normalize(&word);
        if labels.iter().all(|label| normalize(label) != key) {
            labels.push(capitalize(&word));
        }
    }
    for fallback in PLACEHOLDER_LABELS {
        if labels.len() == 2 {
            break;
        }
        if labels.iter().all(|label| label != fallback) {
            labels.push(fallback.to_string());
        }
    }

    let mut draft = GraphDraft::new();
    for (index, label) in labels.into_iter().enumerate() {
        draft.add_node(node_id(index), label);
    }
    draft.add_edge(node_id(0), node_id(1));
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn labels(draft: &GraphDraft) -> Vec<&str> {
        draft.nodes.iter().map(|node| node.label.as_str()).collect()
    }

    #[test]
    fn test_flow_extraction() {
        let extraction = extract("First do A, then B, finally C.", Archetype::Flow);
        assert_eq!(extraction.source, ExtractionSource::RuleBased);
        assert_eq!(labels(&extraction.draft), ["A", "B", "C"]);
        assert_eq!(extraction.draft.edges.len(), 2);
    }

    #[test]
    fn test_tree_extraction() {
        let extraction = extract(
            "The CEO oversees VPs who manage directors and teams.",
            Archetype::Tree,
        );
        let draft = &extraction.draft;
        assert_eq!(draft.nodes.len(), 4);
        assert_eq!(draft.edges.len(), 3);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_timeline_extraction_is_ordered() {
        let extraction = extract(
            "Google launched in 2004. It started in 1998. Alphabet formed in 2015.",
            Archetype::Timeline,
        );
        assert_eq!(labels(&extraction.draft), ["1998", "Google", "Alphabet"]);
        assert_eq!(extraction.draft.edges.len(), 2);
    }

    #[test]
    fn test_placeholder_from_significant_words() {
        let extraction = extract("we talked about budgets", Archetype::Flow);
        assert_eq!(extraction.source, ExtractionSource::Placeholder);
        assert_eq!(labels(&extraction.draft), ["Talked", "Budgets"]);
        assert_eq!(extraction.draft.edges, vec![DraftEdge::new("n0", "n1")]);
    }

    #[test]
    fn test_placeholder_keeps_single_candidate() {
        let extraction = extract("Acme is great", Archetype::Flow);
        assert_eq!(extraction.source, ExtractionSource::Placeholder);
        assert_eq!(labels(&extraction.draft), ["Acme", "Great"]);
    }

    #[test]
    fn test_placeholder_for_empty_text() {
        let extraction = extract("", Archetype::Cycle);
        assert_eq!(labels(&extraction.draft), PLACEHOLDER_LABELS);
    }

    #[test]
    fn test_max_nodes() {
        let extractor = Extractor::new(ExtractorConfig { max_nodes: 2 });
        let extraction = extractor.extract("Then A then B then C then D.", Archetype::Flow);
        assert_eq!(labels(&extraction.draft), ["A", "B"]);
    }

    #[test]
    fn test_adopt_valid_draft_is_shaped() {
        let mut draft = GraphDraft::new();
        draft.add_node("plan", "Plan");
        draft.add_node("do", "Do");
        draft.add_node("check", "Check");
        let adopted = Extractor::default()
            .adopt(draft, Archetype::Cycle)
            .expect("valid draft");
        assert_eq!(adopted.edges.len(), 3);
    }

    #[test]
    fn test_adopt_rejects_invalid_draft() {
        let mut draft = GraphDraft::new();
        draft.add_node("a", "A");
        draft.add_edge("a", "missing");
        let err = Extractor::default()
            .adopt(draft, Archetype::Flow)
            .unwrap_err();
        assert!(err.has_code(ErrorCode::E103));
    }
}
