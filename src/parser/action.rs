//! Intent detection over normalized command text
//!
//! Every pattern for every action is attempted and the highest-scoring
//! match wins; declaration order breaks ties deterministically.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::vocabulary;

/// High-level intent of a household command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add,
    Update,
    Delete,
    Remove,
    List,
    Search,
    Check,
    Increment,
    Decrement,
    Use,
    SetQuantity,
}

impl Action {
    /// Identifier used on the wire (matches the serde rename)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Remove => "remove",
            Self::List => "list",
            Self::Search => "search",
            Self::Check => "check",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Use => "use",
            Self::SetQuantity => "set_quantity",
        }
    }
}

/// Confidence assigned to any structural pattern match
const MATCH_CONFIDENCE: f32 = 0.9;
/// Bonus for patterns with long, specific matcher text
const SPECIFICITY_BONUS: f32 = 0.05;
/// Matcher-text length at which a pattern counts as specific
const SPECIFIC_PATTERN_LEN: usize = 40;
/// Fallback confidence when only the food vocabulary signals intent
const FOOD_FALLBACK_CONFIDENCE: f32 = 0.6;
/// Fallback confidence when nothing signals intent
const LIST_FALLBACK_CONFIDENCE: f32 = 0.3;

/// Intent table rows in declaration order. Capture groups hold the item
/// text handed to entity extraction; rows without groups capture nothing
/// (bare listing queries). Ties between equal scores keep the earlier row,
/// so enumeration order is part of the contract.
const PATTERN_TABLE: &[(Action, &str)] = &[
    (Action::Add, r"^(?:add|put|store|place)\s+(.+?)[.!?]*$"),
    (
        Action::Add,
        r"^i\s+(?:just\s+)?(?:bought|got|purchased|picked\s+up)\s+(.+?)[.!?]*$",
    ),
    (Action::Update, r"^(?:update|change|modify)\s+(.+?)[.!?]*$"),
    (Action::Delete, r"^(?:delete|discard|toss)\s+(.+?)[.!?]*$"),
    (Action::Delete, r"^throw\s+(?:out|away)\s+(.+?)[.!?]*$"),
    (Action::Delete, r"^get\s+rid\s+of\s+(.+?)[.!?]*$"),
    (Action::Remove, r"^(?:remove|take\s+out)\s+(.+?)[.!?]*$"),
    (
        Action::List,
        r"^what(?:'s|\s+is)\s+in\s+(?:my|the|our)\s+\w+[.!?]*$",
    ),
    (Action::List, r"^(?:list|show)(?:\s+me)?\b.*$"),
    (Action::List, r"^what\s+do\s+(?:we|i)\s+have\b.*$"),
    (
        Action::Search,
        r"^(?:search(?:\s+for)?|find|look\s+for)\s+(.+?)[.!?]*$",
    ),
    (
        Action::Search,
        r"^where(?:'s|\s+is|\s+are)\s+(?:my\s+|the\s+)?(.+?)[.!?]*$",
    ),
    (
        Action::Check,
        r"^check\s+(?:if\s+(?:we|i)\s+have\s+)?(.+?)[.!?]*$",
    ),
    (
        Action::Check,
        r"^do\s+(?:we|i)\s+have\s+(?:any\s+)?(.+?)[.!?]*$",
    ),
    (
        Action::Increment,
        r"^(?:add|get|grab)\s+(?:some\s+)?more\s+(.+?)[.!?]*$",
    ),
    (
        Action::Decrement,
        r"^(?:decrease|reduce|lower)\s+(?:the\s+)?(.+?)[.!?]*$",
    ),
    (Action::Use, r"^use\s+(?:up\s+)?(?:the\s+)?(.+?)[.!?]*$"),
    (
        Action::Use,
        r"^(?:i|we)\s+(?:used|ate|drank|finished)\s+(?:the\s+)?(.+?)[.!?]*$",
    ),
    (
        Action::SetQuantity,
        r"^set\s+(?:the\s+)?(?:quantity\s+of\s+)?(.+?)[.!?]*$",
    ),
    (
        Action::SetQuantity,
        r"^there\s+(?:are|is)\s+(?:now\s+)?(.+?)\s+left[.!?]*$",
    ),
];

/// One row of the compiled intent table
pub struct ActionPattern {
    /// Intent this row votes for
    pub action: Action,
    /// Compiled matcher; capture groups are the item fragments
    pub regex: Regex,
}

impl ActionPattern {
    /// Score this row earns when it matches
    #[must_use]
    pub fn confidence(&self) -> f32 {
        if self.regex.as_str().len() >= SPECIFIC_PATTERN_LEN {
            MATCH_CONFIDENCE + SPECIFICITY_BONUS
        } else {
            MATCH_CONFIDENCE
        }
    }
}

static PATTERNS: LazyLock<Vec<ActionPattern>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|&(action, source)| ActionPattern {
            action,
            regex: Regex::new(source).expect("intent pattern"),
        })
        .collect()
});

/// Result of intent detection
#[derive(Debug, Clone)]
pub struct Detection {
    /// Best-matching action; `None` only for empty input
    pub action: Option<Action>,
    /// Match confidence in [0, 1]
    pub confidence: f32,
    /// Captured item text, in order of mention
    pub fragments: Vec<String>,
    /// Matcher text of the winning row, for diagnostics
    pub pattern: Option<String>,
}

/// Matches command text against the intent table
pub struct ActionDetector {
    patterns: &'static [ActionPattern],
}

impl ActionDetector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: PATTERNS.as_slice(),
        }
    }

    /// The compiled intent table, in declaration (tie-break) order.
    #[must_use]
    pub fn patterns(&self) -> &[ActionPattern] {
        self.patterns
    }

    /// Detect the intent of `text`.
    ///
    /// Empty input yields no action. Otherwise some action always comes
    /// back: when no row matches, a food-vocabulary hit falls back to
    /// [`Action::Add`] over the whole text, and anything else falls back to
    /// a low-confidence [`Action::List`].
    #[must_use]
    pub fn detect(&self, text: &str) -> Detection {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return Detection {
                action: None,
                confidence: 0.0,
                fragments: Vec::new(),
                pattern: None,
            };
        }

        let mut best: Option<(&ActionPattern, f32, Vec<String>)> = None;
        for pattern in self.patterns {
            if let Some(captures) = pattern.regex.captures(&normalized) {
                let confidence = pattern.confidence();
                // strictly-greater keeps the earliest row on ties
                if best.as_ref().is_none_or(|&(_, c, _)| confidence > c) {
                    let fragments = captures
                        .iter()
                        .skip(1)
                        .flatten()
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|fragment| !fragment.is_empty())
                        .collect();
                    best = Some((pattern, confidence, fragments));
                }
            }
        }

        if let Some((pattern, confidence, fragments)) = best {
            tracing::debug!(
                action = pattern.action.as_str(),
                confidence,
                "intent matched"
            );
            return Detection {
                action: Some(pattern.action),
                confidence,
                fragments,
                pattern: Some(pattern.regex.as_str().to_string()),
            };
        }

        if vocabulary::mentions_food(&normalized) {
            tracing::debug!("no intent pattern matched, food vocabulary fallback");
            return Detection {
                action: Some(Action::Add),
                confidence: FOOD_FALLBACK_CONFIDENCE,
                fragments: vec![normalized],
                pattern: None,
            };
        }

        tracing::debug!("no intent pattern matched, defaulting to listing");
        Detection {
            action: Some(Action::List),
            confidence: LIST_FALLBACK_CONFIDENCE,
            fragments: Vec::new(),
            pattern: None,
        }
    }
}

impl Default for ActionDetector {
    fn default() -> Self {
        Self::new()
    }
}
