//! Weighted keyword and pattern scoring.
//!
//! Every [`Archetype`] owns a constant [`KeywordTable`] of four tiers. A
//! text's score for an archetype is the weighted count of keyword matches
//! plus a structural bonus from regular patterns, clamped at zero.
//!
//! Matching works on lowercased words from the tokenizer. A single-word
//! keyword matches a word equal to it or to its plural (`+s`, `+es`); a
//! multi-word keyword matches a consecutive run of words, with the plural
//! allowance on the last word only.

use once_cell::sync::Lazy;
use regex::Regex;
use scenecast_core::semantic::Archetype;

use crate::lexer;

pub const PRIMARY_WEIGHT: f32 = 10.0;
pub const SECONDARY_WEIGHT: f32 = 6.0;
pub const CONTEXT_WEIGHT: f32 = 3.0;
pub const NEGATIVE_WEIGHT: f32 = -10.0;

/// Upper bound of the structural bonus of any archetype.
pub const MAX_STRUCTURAL_BONUS: f32 = 50.0;

const RELATIONAL_BONUS: f32 = 15.0;
const YEAR_BONUS: f32 = 10.0;
const MONTH_BONUS: f32 = 8.0;
const RELATIVE_TIME_BONUS: f32 = 10.0;

/// The keyword tiers of one archetype.
#[derive(Debug)]
pub struct KeywordTable {
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
    pub context: &'static [&'static str],
    pub negative: &'static [&'static str],
}

impl KeywordTable {
    fn tiers(&self) -> [(&'static [&'static str], f32); 4] {
        [
            (self.primary, PRIMARY_WEIGHT),
            (self.secondary, SECONDARY_WEIGHT),
            (self.context, CONTEXT_WEIGHT),
            (self.negative, NEGATIVE_WEIGHT),
        ]
    }
}

const FLOW_KEYWORDS: KeywordTable = KeywordTable {
    primary: &[
        "then",
        "next",
        "finally",
        "step",
        "process",
        "workflow",
        "procedure",
        "pipeline",
    ],
    secondary: &[
        "first",
        "second",
        "third",
        "after that",
        "afterwards",
        "followed by",
        "leads to",
        "results in",
        "start",
        "begin",
        "stage",
    ],
    context: &[
        "do", "go", "move", "continue", "complete", "task", "input", "output", "phase",
    ],
    negative: &[
        "versus",
        "vs",
        "compare",
        "comparison",
        "criteria",
        "hierarchy",
        "reports to",
        "cycle",
        "repeat",
        "loop",
        "year",
        "century",
        "decade",
    ],
};

const TREE_KEYWORDS: KeywordTable = KeywordTable {
    primary: &[
        "hierarchy",
        "hierarchical",
        "org chart",
        "organization",
        "ceo",
        "oversee",
        "reports to",
        "subordinate",
        "parent",
        "child",
        "children",
        "tree",
        "branch",
    ],
    secondary: &[
        "manage",
        "manager",
        "director",
        "vp",
        "team",
        "department",
        "leads",
        "supervise",
        "under",
        "belongs to",
        "contains",
        "consists of",
        "category",
    ],
    context: &[
        "level", "top", "bottom", "staff", "employee", "division", "group", "role",
    ],
    negative: &["then", "finally", "next", "versus", "cycle", "year"],
};

const TIMELINE_KEYWORDS: KeywordTable = KeywordTable {
    primary: &[
        "year", "century", "decade", "timeline", "history", "era", "date", "month",
    ],
    secondary: &[
        "began", "founded", "later", "earlier", "since", "until", "during", "period",
    ],
    context: &["before", "after", "when", "eventually", "today", "ago"],
    negative: &["versus", "compare", "manage", "reports to", "cycle", "repeat"],
};

const MATRIX_KEYWORDS: KeywordTable = KeywordTable {
    primary: &[
        "versus",
        "vs",
        "compare",
        "comparison",
        "matrix",
        "criteria",
        "trade-off",
        "tradeoff",
        "pros and cons",
        "quadrant",
    ],
    secondary: &[
        "option",
        "alternative",
        "cost",
        "feature",
        "advantage",
        "disadvantage",
        "benefit",
        "against",
        "across",
        "grid",
        "table",
    ],
    context: &[
        "better", "worse", "higher", "lower", "cheaper", "rate", "score", "evaluate", "whereas",
    ],
    negative: &["then", "finally", "next", "step", "cycle", "reports to", "year"],
};

const CYCLE_KEYWORDS: KeywordTable = KeywordTable {
    primary: &[
        "cycle",
        "cyclical",
        "loop",
        "repeat",
        "recurring",
        "circular",
        "iteration",
        "feedback",
    ],
    secondary: &[
        "again",
        "back to",
        "returns to",
        "restart",
        "continuous",
        "ongoing",
        "round",
        "revolves",
        "periodic",
    ],
    context: &["each time", "every", "phase", "season", "renew", "refresh"],
    negative: &["hierarchy", "versus", "compare", "finally", "ceo"],
};

/// Returns the constant keyword table of `archetype`.
pub fn keyword_table(archetype: Archetype) -> &'static KeywordTable {
    match archetype {
        Archetype::Flow => &FLOW_KEYWORDS,
        Archetype::Tree => &TREE_KEYWORDS,
        Archetype::Timeline => &TIMELINE_KEYWORDS,
        Archetype::Matrix => &MATRIX_KEYWORDS,
        Archetype::Cycle => &CYCLE_KEYWORDS,
    }
}

static RELATIONAL_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[a-z0-9'’]+\s+(?:reports?\s+to|manages?|oversees?|supervises?|belongs?\s+to|(?:is|are)\s+part\s+of)\s+[a-z0-9'’]+",
    )
    .unwrap()
});
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:1[5-9]\d{2}|20\d{2})\b").unwrap());
// "march" and "may" only count next to a number; alone they are usually verbs.
static MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:january|february|april|june|july|august|september|october|november|december)\b|\b(?:march|may)\s+\d",
    )
    .unwrap()
});
static RELATIVE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+\s+(?:years?|months?|decades?)\s+(?:ago|later)\b").unwrap()
});

/// Score components of one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArchetypeScore {
    /// Weighted keyword sum, possibly negative.
    pub keyword: f32,
    /// Structural pattern bonus in `[0, MAX_STRUCTURAL_BONUS]`.
    pub structural_bonus: f32,
}

impl ArchetypeScore {
    /// Keyword sum plus structural bonus, clamped at zero.
    pub fn total(&self) -> f32 {
        (self.keyword + self.structural_bonus).max(0.0)
    }
}

/// Text prepared once for scoring against every archetype.
#[derive(Debug, Clone)]
pub struct ScoredText {
    words: Vec<String>,
    lowered: String,
}

impl ScoredText {
    pub fn new(text: &str) -> Self {
        Self {
            words: lexer::lowercase_words(text),
            lowered: text.to_lowercase(),
        }
    }

    /// Scores the text for `archetype`.
    pub fn score(&self, archetype: Archetype) -> ArchetypeScore {
        let keyword = keyword_table(archetype)
            .tiers()
            .iter()
            .map(|(keywords, weight)| {
                keywords
                    .iter()
                    .map(|keyword| count_occurrences(&self.words, keyword) as f32 * weight)
                    .sum::<f32>()
            })
            .sum();

        ArchetypeScore {
            keyword,
            structural_bonus: self.structural_bonus(archetype),
        }
    }

    fn structural_bonus(&self, archetype: Archetype) -> f32 {
        let count = |re: &Regex| re.find_iter(&self.lowered).count() as f32;
        let bonus = match archetype {
            Archetype::Tree => count(&RELATIONAL_PHRASE) * RELATIONAL_BONUS,
            Archetype::Timeline => {
                count(&YEAR) * YEAR_BONUS
                    + count(&MONTH) * MONTH_BONUS
                    + count(&RELATIVE_TIME) * RELATIVE_TIME_BONUS
            }
            Archetype::Flow | Archetype::Matrix | Archetype::Cycle => 0.0,
        };
        bonus.min(MAX_STRUCTURAL_BONUS)
    }
}

/// Scores `text` for `archetype`.
///
/// # Examples
///
/// ```
/// # use scenecast_core::semantic::Archetype;
/// # use scenecast_text::scorer::score;
/// // "then" and "finally" are primary (+10 each), "first" secondary (+6),
/// // "do" context (+3).
/// assert_eq!(score("First do A, then B, finally C.", Archetype::Flow), 29.0);
/// // The same words are negative for trees.
/// assert_eq!(score("First do A, then B, finally C.", Archetype::Tree), 0.0);
/// ```
pub fn score(text: &str, archetype: Archetype) -> f32 {
    ScoredText::new(text).score(archetype).total()
}

fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword
        || word.strip_suffix('s') == Some(keyword)
        || word.strip_suffix("es") == Some(keyword)
}

fn count_occurrences(words: &[String], keyword: &str) -> usize {
    let parts: Vec<&str> = keyword.split(' ').collect();
    let Some((last, leading)) = parts.split_last() else {
        return 0;
    };
    if parts.len() > words.len() {
        return 0;
    }

    words
        .windows(parts.len())
        .filter(|window| {
            leading
                .iter()
                .zip(window.iter())
                .all(|(part, word)| word == part)
                && window.last().is_some_and(|word| word_matches(word, last))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        lexer::lowercase_words(text)
    }

    #[test]
    fn test_plural_matching() {
        assert_eq!(count_occurrences(&words("teams and team"), "team"), 2);
        assert_eq!(count_occurrences(&words("processes"), "process"), 1);
        assert_eq!(count_occurrences(&words("teamwork"), "team"), 0);
    }

    #[test]
    fn test_multi_word_keyword() {
        let w = words("Alice reports to Bob, who reports to Carol.");
        assert_eq!(count_occurrences(&w, "reports to"), 2);
        assert_eq!(count_occurrences(&w, "to bob"), 1);
        assert_eq!(count_occurrences(&words("pros and cons"), "pros and cons"), 1);
    }

    #[test]
    fn test_hyphenated_keyword() {
        assert_eq!(count_occurrences(&words("the trade-offs"), "trade-off"), 1);
    }

    #[test]
    fn test_score_flow_scenario() {
        let text = ScoredText::new("First do A, then B, finally C.");
        let flow = text.score(Archetype::Flow);
        assert_eq!(flow.keyword, 29.0);
        assert_eq!(flow.structural_bonus, 0.0);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let text = ScoredText::new("then next finally");
        let tree = text.score(Archetype::Tree);
        assert_eq!(tree.keyword, -30.0);
        assert_eq!(tree.total(), 0.0);
    }

    #[test]
    fn test_tree_relational_bonus() {
        let text = ScoredText::new("The CEO oversees VPs who manage directors and teams.");
        let tree = text.score(Archetype::Tree);
        // ceo 10, oversees 10, vps 6, manage 6, directors 6, teams 6
        assert_eq!(tree.keyword, 44.0);
        assert_eq!(tree.structural_bonus, 30.0);
    }

    #[test]
    fn test_timeline_bonus() {
        let text = ScoredText::new("Founded in 1998, it went public in June 2004, then 5 years later it merged.");
        let timeline = text.score(Archetype::Timeline);
        // 1998 + 2004 + june + "5 years later"
        assert_eq!(timeline.structural_bonus, 10.0 + 10.0 + 8.0 + 10.0);
    }

    #[test]
    fn test_month_verbs_ignored() {
        let text = ScoredText::new("We may march on.");
        assert_eq!(text.score(Archetype::Timeline).structural_bonus, 0.0);

        let text = ScoredText::new("It shipped on May 4.");
        assert_eq!(text.score(Archetype::Timeline).structural_bonus, MONTH_BONUS);
    }

    #[test]
    fn test_structural_bonus_capped() {
        let text = ScoredText::new("1901 1902 1903 1904 1905 1906 1907");
        assert_eq!(
            text.score(Archetype::Timeline).structural_bonus,
            MAX_STRUCTURAL_BONUS
        );
    }

    #[test]
    fn test_bonus_only_for_tree_and_timeline() {
        let text = ScoredText::new("In 1990 Alice manages Bob.");
        assert_eq!(text.score(Archetype::Flow).structural_bonus, 0.0);
        assert_eq!(text.score(Archetype::Matrix).structural_bonus, 0.0);
        assert_eq!(text.score(Archetype::Cycle).structural_bonus, 0.0);
        assert!(text.score(Archetype::Tree).structural_bonus > 0.0);
        assert!(text.score(Archetype::Timeline).structural_bonus > 0.0);
    }

    #[test]
    fn test_every_archetype_has_a_table() {
        for archetype in Archetype::ALL {
            let table = keyword_table(archetype);
            assert!(!table.primary.is_empty());
            assert!(!table.negative.is_empty());
        }
    }
}
