use std::fmt;

/// Default interest set: anything about AI.
pub const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "ml",
    "искусственный интеллект",
    "chatgpt",
    "gpt",
];

const TOPIC_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "llm",
    "gpt",
    "chatgpt",
    "saas",
    "startup",
];

const MONETIZATION_KEYWORDS: &[&str] = &[
    "revenue",
    "mrr",
    "arr",
    "profit",
    "monetiz",
    "income",
    "pricing",
    "paying customers",
    "$",
];

const SOLO_OPERATOR_KEYWORDS: &[&str] = &[
    "solo",
    "indie",
    "bootstrap",
    "one-person",
    "one person",
    "solopreneur",
    "side project",
    "single founder",
];

/// A named group of keywords. Keywords are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// True when any keyword occurs as a substring of the already lower-cased text.
    pub fn matches(&self, lowered_text: &str) -> bool {
        self.keywords.iter().any(|kw| lowered_text.contains(kw.as_str()))
    }
}

/// How keyword sets combine into a relevance decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelevanceCriteria {
    /// A single category; one matching keyword is enough.
    AnyOf(KeywordSet),
    /// Every category must contribute at least one match somewhere in the text.
    AllOf(Vec<KeywordSet>),
}

impl RelevanceCriteria {
    pub fn ai() -> Self {
        Self::AnyOf(KeywordSet::new("ai", AI_KEYWORDS))
    }

    pub fn solo_founder() -> Self {
        Self::AllOf(vec![
            KeywordSet::new("topic", TOPIC_KEYWORDS),
            KeywordSet::new("monetization", MONETIZATION_KEYWORDS),
            KeywordSet::new("solo-operator", SOLO_OPERATOR_KEYWORDS),
        ])
    }

    pub fn from_preset(preset: CriteriaPreset) -> Self {
        match preset {
            CriteriaPreset::Ai => Self::ai(),
            CriteriaPreset::SoloFounder => Self::solo_founder(),
        }
    }

    fn matches(&self, lowered_text: &str) -> bool {
        match self {
            Self::AnyOf(set) => set.matches(lowered_text),
            // An empty conjunction would accept everything; treat it as matching nothing.
            Self::AllOf(sets) => !sets.is_empty() && sets.iter().all(|set| set.matches(lowered_text)),
        }
    }
}

/// Decides whether an entry is worth publishing.
///
/// Matching is case-insensitive substring search over the title, joined with
/// the summary when one is supplied. A missing or blank summary simply leaves
/// the title as the only text to search.
pub fn is_relevant(title: &str, summary: Option<&str>, criteria: &RelevanceCriteria) -> bool {
    let mut text = title.to_lowercase();
    if let Some(summary) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        text.push(' ');
        text.push_str(&summary.to_lowercase());
    }
    criteria.matches(&text)
}

/// Built-in criteria selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CriteriaPreset {
    Ai,
    SoloFounder,
}

impl fmt::Display for CriteriaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => write!(f, "ai"),
            Self::SoloFounder => write!(f, "solo-founder"),
        }
    }
}
