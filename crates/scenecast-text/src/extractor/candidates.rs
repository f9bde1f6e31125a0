//! Entity and relation detection.
//!
//! Each sentence is scanned into a sequence of mentions, relational cues
//! and joins (commas and conjunctions). Adjacent mentions separated by a
//! cue become a relation; a join after a relation repeats its anchor, so
//! "X manages Y and Z" relates X to both Y and Z.

use indexmap::IndexMap;
use scenecast_core::semantic::Archetype;

use crate::{
    extractor::vocabulary::{
        ACRONYM_ROLES, CONJUNCTIONS, CRITERIA, Direction, FORWARD_CUES, ORDINALS,
        QUALIFIER_HEADS, REVERSE_CUES, ROLES, capitalize, is_first_person, is_stopword, singular,
    },
    lexer::{self, Token, TokenKind},
};

/// An entity, deduplicated by its normalized key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Entity {
    pub label: String,
    /// Year or ordinal rank of the sentence that first mentioned the entity.
    pub order_hint: Option<f64>,
}

/// Entities in first-mention order and relations between their keys.
#[derive(Debug, Clone, Default)]
pub(crate) struct Candidates {
    pub entities: IndexMap<String, Entity>,
    pub relations: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
enum Item {
    Mention { key: String, label: String },
    Year { key: String, label: String },
    Cue(Direction),
    Join,
}

/// Detects entities and relations in `text`.
///
/// Criteria vocabulary ("cost", "features") only yields entities when
/// `archetype` is [`Archetype::Matrix`].
pub(crate) fn detect(text: &str, archetype: Archetype) -> Candidates {
    let tokens = lexer::tokenize(text);
    let mut candidates = Candidates::default();

    for sentence in lexer::sentences(&tokens) {
        let hint = order_hint(sentence);
        let scanned = scan_sentence(sentence, archetype);

        // Years only stand in for entities in sentences without any other
        let has_mentions = scanned
            .iter()
            .any(|item| matches!(item, Item::Mention { .. }));
        let items: Vec<Item> = scanned
            .into_iter()
            .filter_map(|item| match item {
                Item::Year { key, label } if !has_mentions => Some(Item::Mention { key, label }),
                Item::Year { .. } => None,
                other => Some(other),
            })
            .collect();

        for item in &items {
            if let Item::Mention { key, label } = item {
                let own_hint = label.parse::<f64>().ok();
                candidates.entities.entry(key.clone()).or_insert_with(|| Entity {
                    label: label.clone(),
                    order_hint: own_hint.or(hint),
                });
            }
        }

        candidates.relations.extend(relate(&items));
    }

    candidates
}

/// Builds relations from one sentence's items.
fn relate(items: &[Item]) -> Vec<(String, String)> {
    let mut relations = Vec::new();
    let mut previous: Option<&str> = None;
    let mut pending: Option<Direction> = None;
    let mut joined = false;
    let mut anchor: Option<(&str, Direction)> = None;

    let mut push = |from: &str, to: &str, direction: Direction| {
        let (from, to) = match direction {
            Direction::Forward => (from, to),
            Direction::Reverse => (to, from),
        };
        if from != to {
            relations.push((from.to_string(), to.to_string()));
        }
    };

    for item in items {
        match item {
            Item::Cue(direction) => pending = Some(*direction),
            Item::Join => joined = true,
            Item::Mention { key, .. } => {
                if let Some(prev) = previous {
                    if let Some(direction) = pending {
                        push(prev, key, direction);
                        anchor = Some((prev, direction));
                    } else if let (true, Some((source, direction))) = (joined, anchor) {
                        push(source, key, direction);
                    }
                }
                previous = Some(key);
                pending = None;
                joined = false;
            }
            Item::Year { .. } => {}
        }
    }

    relations
}

fn scan_sentence(sentence: &[Token<'_>], archetype: Archetype) -> Vec<Item> {
    let mut items = Vec::new();
    let mut i = 0;

    while i < sentence.len() {
        let token = &sentence[i];

        if token.is_comma() {
            items.push(Item::Join);
            i += 1;
            continue;
        }
        if matches!(token.kind(), TokenKind::Punct(_)) {
            i += 1;
            continue;
        }

        let lower = token.lower();
        if CONJUNCTIONS.contains(&lower.as_str()) {
            items.push(Item::Join);
            i += 1;
            continue;
        }
        if let Some((len, direction)) = match_cue(sentence, i) {
            items.push(Item::Cue(direction));
            i += len;
            continue;
        }
        if let Some((len, label)) = match_qualifier(sentence, i) {
            items.push(mention(label));
            i += len;
            continue;
        }
        if token.is_number() {
            if year_value(token).is_some() {
                let label = token.text().to_string();
                items.push(Item::Year {
                    key: label.clone(),
                    label,
                });
            }
            i += 1;
            continue;
        }
        if token.is_capitalized() && is_proper(token, i == 0) {
            let mut end = i + 1;
            while end < sentence.len()
                && sentence[end].is_word()
                && sentence[end].is_capitalized()
                && is_proper(&sentence[end], false)
                && match_cue(sentence, end).is_none()
            {
                end += 1;
            }
            let label = sentence[i..end]
                .iter()
                .map(surface)
                .collect::<Vec<_>>()
                .join(" ");
            items.push(mention(label));
            i = end;
            continue;
        }

        let stem = singular(&lower);
        if ROLES.contains(&stem.as_str()) {
            items.push(mention(role_label(&lower, &stem)));
        } else if archetype == Archetype::Matrix && CRITERIA.contains(&stem.as_str()) {
            items.push(mention(capitalize(&lower)));
        }
        i += 1;
    }

    items
}

fn mention(label: String) -> Item {
    Item::Mention {
        key: normalize(&label),
        label,
    }
}

/// The dedup key of a label: lowercased, singular, whitespace-normalized.
pub(crate) fn normalize(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| singular(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token text without a trailing possessive.
fn surface<'a>(token: &Token<'a>) -> &'a str {
    let text = token.text();
    text.strip_suffix("'s")
        .or_else(|| text.strip_suffix("’s"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(text)
}

/// Returns true if a capitalized token can name an entity.
///
/// Sentence-initial words are capitalized by convention, so function words
/// there are not entities; mid-sentence only first-person pronouns are
/// excluded.
fn is_proper(token: &Token<'_>, sentence_initial: bool) -> bool {
    if !token.is_word() {
        return false;
    }
    let lower = token.lower();
    if is_first_person(&lower) {
        return false;
    }
    !(sentence_initial && is_stopword(&lower))
}

fn role_label(lower: &str, stem: &str) -> String {
    if ACRONYM_ROLES.contains(&stem) {
        let plural = if lower != stem { "s" } else { "" };
        format!("{}{plural}", stem.to_uppercase())
    } else {
        capitalize(lower)
    }
}

/// Matches the longest relational cue starting at `start`.
fn match_cue(sentence: &[Token<'_>], start: usize) -> Option<(usize, Direction)> {
    let cues = FORWARD_CUES
        .iter()
        .map(|cue| (*cue, Direction::Forward))
        .chain(REVERSE_CUES.iter().map(|cue| (*cue, Direction::Reverse)));

    let mut best: Option<(usize, Direction)> = None;
    for (cue, direction) in cues {
        let parts: Vec<&str> = cue.split(' ').collect();
        if start + parts.len() > sentence.len() {
            continue;
        }
        let matched = sentence[start..start + parts.len()]
            .iter()
            .zip(&parts)
            .all(|(token, part)| token.is_word() && token.lower() == *part);
        if matched && best.is_none_or(|(len, _)| parts.len() > len) {
            best = Some((parts.len(), direction));
        }
    }
    best
}

/// Matches a qualifier phrase such as "option A" or "phase 2".
fn match_qualifier(sentence: &[Token<'_>], start: usize) -> Option<(usize, String)> {
    let head = sentence.get(start)?;
    let qualifier = sentence.get(start + 1)?;

    let head_lower = head.lower();
    if !head.is_word() || !QUALIFIER_HEADS.contains(&singular(&head_lower).as_str()) {
        return None;
    }

    let text = qualifier.text();
    let is_letter = text.chars().count() == 1 && text.chars().all(char::is_uppercase);
    let is_roman = !text.is_empty() && text.chars().all(|c| matches!(c, 'I' | 'V' | 'X'));
    if !(qualifier.is_number() || is_letter || is_roman) {
        return None;
    }

    Some((2, format!("{} {}", capitalize(&head_lower), text)))
}

fn year_value(token: &Token<'_>) -> Option<u32> {
    if !token.is_number() {
        return None;
    }
    token
        .text()
        .parse::<u32>()
        .ok()
        .filter(|year| (1500..=2099).contains(year))
}

/// The first year in `tokens`, or else the rank of the first ordinal word.
pub(crate) fn order_hint(tokens: &[Token<'_>]) -> Option<f64> {
    tokens
        .iter()
        .find_map(year_value)
        .map(f64::from)
        .or_else(|| {
            tokens.iter().find_map(|token| {
                let lower = token.lower();
                ORDINALS
                    .iter()
                    .find(|(word, _)| *word == lower)
                    .map(|(_, rank)| *rank)
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(candidates: &Candidates) -> Vec<&str> {
        candidates
            .entities
            .values()
            .map(|entity| entity.label.as_str())
            .collect()
    }

    fn relations(candidates: &Candidates) -> Vec<(&str, &str)> {
        candidates
            .relations
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect()
    }

    #[test]
    fn test_flow_sentence() {
        let candidates = detect("First do A, then B, finally C.", Archetype::Flow);
        assert_eq!(labels(&candidates), ["A", "B", "C"]);
        assert_eq!(relations(&candidates), [("a", "b"), ("b", "c")]);
    }

    #[test]
    fn test_hierarchy_with_coordination() {
        let candidates = detect(
            "The CEO oversees VPs who manage directors and teams.",
            Archetype::Tree,
        );
        assert_eq!(labels(&candidates), ["CEO", "VPs", "Directors", "Teams"]);
        assert_eq!(
            relations(&candidates),
            [("ceo", "vp"), ("vp", "director"), ("vp", "team")]
        );
    }

    #[test]
    fn test_reverse_cue() {
        let candidates = detect("Alice reports to Bob.", Archetype::Tree);
        assert_eq!(relations(&candidates), [("bob", "alice")]);
    }

    #[test]
    fn test_longest_cue_wins() {
        let candidates = detect("Design is managed by Carol.", Archetype::Tree);
        assert_eq!(relations(&candidates), [("carol", "design")]);
    }

    #[test]
    fn test_matrix_qualifiers_and_criteria() {
        let candidates = detect(
            "We compare option A versus option B across cost and features criteria.",
            Archetype::Matrix,
        );
        assert_eq!(labels(&candidates), ["Option A", "Option B", "Cost", "Features"]);
        assert!(candidates.relations.is_empty());
    }

    #[test]
    fn test_criteria_ignored_outside_matrix() {
        let candidates = detect("The cost goes up.", Archetype::Flow);
        assert!(candidates.entities.is_empty());
    }

    #[test]
    fn test_duplicate_mentions_collapse() {
        let candidates = detect("Acme hired a manager. The managers report to Acme.", Archetype::Tree);
        assert_eq!(labels(&candidates), ["Acme", "Manager"]);
    }

    #[test]
    fn test_multi_word_proper_noun() {
        let candidates = detect("Our team moved to New York then Paris.", Archetype::Flow);
        assert_eq!(labels(&candidates), ["Team", "New York", "Paris"]);
        assert_eq!(relations(&candidates), [("new york", "pari")]);
    }

    #[test]
    fn test_sentence_initial_stopword_skipped() {
        let candidates = detect("Then we go. I think Zed wins.", Archetype::Flow);
        assert_eq!(labels(&candidates), ["Zed"]);
    }

    #[test]
    fn test_years_only_when_sentence_has_no_entity() {
        let candidates = detect(
            "It started in 1998. Google launched in 2004.",
            Archetype::Timeline,
        );
        assert_eq!(labels(&candidates), ["1998", "Google"]);
        assert_eq!(candidates.entities["1998"].order_hint, Some(1998.0));
        assert_eq!(candidates.entities["google"].order_hint, Some(2004.0));
    }

    #[test]
    fn test_ordinal_hint() {
        let tokens = lexer::tokenize("the second release");
        assert_eq!(order_hint(&tokens), Some(2.0));
        assert_eq!(order_hint(&lexer::tokenize("nothing here")), None);
    }

    #[test]
    fn test_qualifier_with_number() {
        let candidates = detect("In phase 2 we ship.", Archetype::Flow);
        assert_eq!(labels(&candidates), ["Phase 2"]);
    }
}
