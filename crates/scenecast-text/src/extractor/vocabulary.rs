//! Word lists used by candidate and relation detection.

/// Direction of a relational cue between the mention before it and the
/// mention after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// `A manages B` gives `A -> B`.
    Forward,
    /// `A reports to B` gives `B -> A`.
    Reverse,
}

pub(crate) const FORWARD_CUES: &[&str] = &[
    "leads to",
    "lead to",
    "leading to",
    "results in",
    "result in",
    "resulting in",
    "followed by",
    "feeds into",
    "flows into",
    "goes to",
    "turns into",
    "gives way to",
    "after that",
    "afterwards",
    "then",
    "before",
    "next",
    "finally",
    "causes",
    "cause",
    "caused",
    "triggers",
    "trigger",
    "produces",
    "produce",
    "becomes",
    "become",
    "manages",
    "manage",
    "managed",
    "oversees",
    "oversee",
    "supervises",
    "supervise",
    "leads",
    "directs",
    "heads",
    "runs",
    "owns",
    "contains",
    "contain",
    "includes",
    "include",
    "employs",
    "enables",
    "precedes",
    "precede",
    "feeds",
    "sends",
    "passes",
    "creates",
];

pub(crate) const REVERSE_CUES: &[&str] = &[
    "is managed by",
    "are managed by",
    "is led by",
    "are led by",
    "is owned by",
    "is caused by",
    "is preceded by",
    "is part of",
    "are part of",
    "reports to",
    "report to",
    "reporting to",
    "belongs to",
    "belong to",
    "depends on",
    "depend on",
    "depending on",
    "works for",
    "work for",
    "works under",
    "managed by",
    "led by",
    "owned by",
    "caused by",
    "preceded by",
    "comes after",
    "came after",
    "part of",
    "follows",
    "follow",
    "after",
    "under",
    "within",
];

pub(crate) const CONJUNCTIONS: &[&str] = &["and", "or", "plus", "also"];

/// Roles recognized without capitalization, by singular lowercase form.
pub(crate) const ROLES: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "coo",
    "vp",
    "president",
    "director",
    "manager",
    "team",
    "engineer",
    "staff",
    "employee",
    "department",
    "board",
    "founder",
    "executive",
    "supervisor",
    "intern",
    "analyst",
    "designer",
    "developer",
    "officer",
    "division",
    "worker",
];

/// Roles written in capitals regardless of how they were transcribed.
pub(crate) const ACRONYM_ROLES: &[&str] = &["ceo", "cto", "cfo", "coo", "vp"];

/// Comparison criteria, recognized in matrix scenes only.
pub(crate) const CRITERIA: &[&str] = &[
    "cost",
    "price",
    "feature",
    "performance",
    "speed",
    "quality",
    "security",
    "scalability",
    "reliability",
    "usability",
    "risk",
    "benefit",
    "effort",
    "value",
    "support",
    "maintenance",
    "flexibility",
];

/// Nouns that form a candidate together with a following letter or number
/// ("option A", "phase 2").
pub(crate) const QUALIFIER_HEADS: &[&str] = &[
    "option", "phase", "step", "stage", "plan", "version", "level", "tier", "approach",
    "scenario", "model", "product", "vendor", "tool",
];

/// Ordinal words and their rank, used to order timeline nodes.
pub(crate) const ORDINALS: &[(&str, f64)] = &[
    ("first", 1.0),
    ("firstly", 1.0),
    ("second", 2.0),
    ("secondly", 2.0),
    ("third", 3.0),
    ("thirdly", 3.0),
    ("fourth", 4.0),
    ("fifth", 5.0),
    ("sixth", 6.0),
    ("finally", 1_000.0),
    ("lastly", 1_000.0),
];

/// Function words and discourse fillers.
///
/// A capitalized word is not a candidate at the start of a sentence if it
/// is listed here, and summaries skip these words entirely.
pub(crate) const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "another", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "both", "but", "by", "can", "could", "do",
    "does", "doing", "during", "each", "either", "every", "finally", "first", "firstly", "for",
    "from", "get", "go", "had", "has", "have", "he", "her", "here", "his", "how", "however", "i",
    "if", "in", "into", "is", "it", "its", "just", "lastly", "let", "let's", "like", "many",
    "may", "me", "might", "more", "most", "moving", "much", "must", "my", "next", "no", "not",
    "now", "of", "ok", "okay", "on", "once", "one", "only", "or", "other", "our", "over", "really",
    "second", "secondly", "she", "should", "since", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "third", "thirdly", "this", "those",
    "through", "to", "today", "too", "two", "under", "up", "us", "very", "was", "we", "well",
    "were", "what", "when", "where", "whereas", "which", "while", "who", "why", "will", "with",
    "would", "yes", "you", "your",
];

pub(crate) fn is_stopword(lower: &str) -> bool {
    STOPWORDS.contains(&lower)
}

/// First-person pronoun forms that are capitalized mid-sentence.
pub(crate) fn is_first_person(lower: &str) -> bool {
    matches!(lower, "i" | "i'm" | "i've" | "i'll" | "i'd" | "i’m" | "i’ve" | "i’ll" | "i’d")
}

/// Reduces an English plural to its singular form.
///
/// This is a stemming heuristic, not a dictionary lookup; it only needs to
/// map a singular and its plural to the same key.
pub(crate) fn singular(word: &str) -> String {
    if word.len() > 3 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["ses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 2 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Uppercases the first character of `word`.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
