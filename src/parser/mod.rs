//! Free-form command text to structured household instruction
//!
//! Parsing never throws for malformed language: ambiguous input comes back
//! as a low-confidence result with entries in `errors`, and the caller
//! decides via [`CommandParser::validate`] whether to act on it.

mod action;
mod entity;
mod lexicon;
pub mod vocabulary;

pub use action::{Action, ActionDetector, ActionPattern, Detection};
pub use entity::{EntityExtractor, ParsedEntity};
pub use lexicon::{
    canonical_unit, variants_of, Location, Unit, LOCATION_KEYWORDS, UNIT_VARIANTS,
};

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Confidence below which a parsed command should not be acted on
const MIN_ACTIONABLE_CONFIDENCE: f32 = 0.3;
/// Neutral prior when a command carries no entities
const NEUTRAL_ENTITY_CONFIDENCE: f32 = 0.5;
/// Penalty factor for a mutating action that arrived without items
const MISSING_ITEMS_PENALTY: f32 = 0.5;

/// Splits a captured fragment into per-item pieces
static FRAGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:,|;|\band\b)\s*").expect("fragment split pattern"));

/// Structured result of parsing one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Detected intent
    pub action: Action,
    /// Items in order of mention; may be empty for listing queries
    pub entities: Vec<ParsedEntity>,
    /// The normalized input text
    pub raw_text: String,
    /// Aggregate of action-match and mean entity confidence, in [0, 1]
    pub confidence: f32,
    /// Non-fatal parse warnings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Diagnostics: captured fragments and sub-scores
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// Parses utterances into [`CommandResult`]s
pub struct CommandParser {
    detector: ActionDetector,
    extractor: EntityExtractor,
}

impl CommandParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            detector: ActionDetector::new(),
            extractor: EntityExtractor::new(),
        }
    }

    /// Parse one utterance.
    ///
    /// Never fails: empty or unintelligible input yields a low-confidence
    /// result with `errors` populated.
    #[must_use]
    pub fn parse(&self, text: &str) -> CommandResult {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return CommandResult {
                action: Action::List,
                entities: Vec::new(),
                raw_text: normalized,
                confidence: 0.0,
                errors: vec!["Empty command text".to_string()],
                metadata: Map::new(),
            };
        }

        let detection = self.detector.detect(&normalized);
        // detect() always resolves non-empty input to some action
        let action = detection.action.unwrap_or(Action::List);

        let mut entities = Vec::new();
        for fragment in &detection.fragments {
            for piece in FRAGMENT_SPLIT.split(fragment) {
                if let Some(entity) = self.extractor.extract(piece) {
                    entities.push(entity);
                }
            }
        }

        let entity_confidence = if entities.is_empty() {
            NEUTRAL_ENTITY_CONFIDENCE
        } else {
            entities.iter().map(|e| e.confidence).sum::<f32>() / entities.len() as f32
        };
        let mut confidence = (detection.confidence + entity_confidence) / 2.0;

        let mut errors = Vec::new();
        if requires_items(action) && entities.is_empty() {
            errors.push("no items identified".to_string());
            confidence *= MISSING_ITEMS_PENALTY;
        }

        let mut metadata = Map::new();
        metadata.insert("fragments".to_string(), json!(detection.fragments));
        metadata.insert(
            "action_confidence".to_string(),
            json!(detection.confidence),
        );
        metadata.insert(
            "entity_confidence".to_string(),
            json!(entity_confidence),
        );
        if let Some(pattern) = detection.pattern {
            metadata.insert("pattern".to_string(), json!(pattern));
        }

        tracing::debug!(
            action = action.as_str(),
            entities = entities.len(),
            confidence,
            "parsed command"
        );

        CommandResult {
            action,
            entities,
            raw_text: normalized,
            confidence: confidence.clamp(0.0, 1.0),
            errors,
            metadata,
        }
    }

    /// Whether a result is trustworthy enough to act on: confident overall,
    /// and carrying named items when the action mutates the inventory.
    #[must_use]
    pub fn validate(&self, result: &CommandResult) -> bool {
        if result.confidence < MIN_ACTIONABLE_CONFIDENCE {
            return false;
        }
        if requires_items(result.action) {
            if result.entities.is_empty() {
                return false;
            }
            if result.entities.iter().any(|e| e.name.trim().is_empty()) {
                return false;
            }
        }
        true
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions that mutate the inventory and therefore need at least one item
const fn requires_items(action: Action) -> bool {
    matches!(action, Action::Add | Action::Update | Action::Delete)
}
