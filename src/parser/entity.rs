//! Field-level extraction from item fragments
//!
//! A fragment is a slice of the utterance believed to describe one item,
//! e.g. "2 pounds of chicken to the fridge". Extraction peels fields off a
//! shrinking residual in a fixed order (quantity/unit, expiration date,
//! location, then name cleanup) so later steps never re-match text an
//! earlier step already consumed.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexicon::{self, Location, Unit, LOCATION_KEYWORDS, UNIT_VARIANTS};
use super::vocabulary;

/// Score for a fragment that yields a usable item name
const BASE_CONFIDENCE: f32 = 0.7;
/// Bonus for an explicit quantity, a recognized unit, and a known food name
const FIELD_BONUS: f32 = 0.1;

/// Tokens dropped from the residual when cleaning the item name
const STOP_WORDS: &[&str] = &["the", "a", "an", "some", "of", "to", "in", "for", "with", "by"];

/// Date formats tried in order; the first clean parse wins
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%m-%d-%y"];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// One extracted item reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntity {
    /// Cleaned item name, never empty
    pub name: String,
    /// Explicit amount, if the fragment carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Canonical unit, only set when the quantity was unit-qualified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    /// Storage location mentioned in the fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Expiration date mentioned in the fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    /// Heuristic extraction score in [0, 1]
    pub confidence: f32,
}

/// Extracts item fields from one fragment of a command
pub struct EntityExtractor {
    quantity_with_unit: Regex,
    bare_quantity: Regex,
    expires_on: Regex,
    expires_in: Regex,
    best_by: Regex,
    bare_date: Regex,
    locations: Vec<(Regex, Location)>,
}

impl EntityExtractor {
    /// Compile the extraction patterns. The unit matcher is built from the
    /// lexicon's spelling table, longest spellings first so "fluid ounces"
    /// is never read as "ounces".
    #[must_use]
    pub fn new() -> Self {
        let mut spellings: Vec<&str> = UNIT_VARIANTS.iter().map(|&(s, _)| s).collect();
        spellings.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let alternation = spellings.join("|");

        // the matcher swallows the keyword's preposition so "on the counter"
        // does not leave a dangling "on" in the item name
        let locations = LOCATION_KEYWORDS
            .iter()
            .map(|&(keyword, location)| {
                let pattern = Regex::new(&format!(
                    r"(?:\b(?:in|into|inside|on|at|from)\s+)?(?:the\s+)?\b{keyword}\b"
                ))
                .expect("location pattern");
                (pattern, location)
            })
            .collect();

        Self {
            quantity_with_unit: Regex::new(&format!(r"(\d+(?:\.\d+)?)\s*({alternation})\b"))
                .expect("quantity pattern"),
            bare_quantity: Regex::new(r"(?:^|\s)(\d+(?:\.\d+)?)(?:$|\s)")
                .expect("bare quantity pattern"),
            expires_on: Regex::new(
                r"(?:expires?|expiring|expiration)\s+(?:on\s+)?(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            )
            .expect("expiration date pattern"),
            expires_in: Regex::new(r"(?:expires?|expiring)\s+in\s+(\d+)\s+days?")
                .expect("expiration offset pattern"),
            best_by: Regex::new(
                r"(?:best\s+by|use\s+by|good\s+until)\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            )
            .expect("best-by pattern"),
            bare_date: Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b")
                .expect("bare date pattern"),
            locations,
        }
    }

    /// Extract an item reference from `fragment`.
    ///
    /// Returns `None` when nothing identifiable remains after field
    /// extraction and stop-word cleanup — the fragment described no item.
    #[must_use]
    pub fn extract(&self, fragment: &str) -> Option<ParsedEntity> {
        self.extract_with_today(fragment, Local::now().date_naive())
    }

    pub(crate) fn extract_with_today(
        &self,
        fragment: &str,
        today: NaiveDate,
    ) -> Option<ParsedEntity> {
        let mut residual = fragment.trim().to_lowercase();

        let (quantity, unit) = self.take_quantity(&mut residual);
        let expiration_date = self.take_expiration(&mut residual, today);
        let location = self.take_location(&mut residual);

        let name = clean_name(&residual);
        if name.is_empty() {
            tracing::trace!(fragment, "fragment yielded no item name");
            return None;
        }

        let mut confidence = BASE_CONFIDENCE;
        if quantity.is_some() {
            confidence += FIELD_BONUS;
        }
        if unit.is_some() {
            confidence += FIELD_BONUS;
        }
        if vocabulary::is_known_food(&name) {
            confidence += FIELD_BONUS;
        }

        Some(ParsedEntity {
            name,
            quantity,
            unit,
            location,
            expiration_date,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }

    /// Step 1: a unit-qualified number wins; otherwise the first standalone
    /// number becomes a unitless quantity. A number that heads a duration
    /// phrase ("in 5 days") belongs to the date step and is skipped.
    fn take_quantity(&self, residual: &mut String) -> (Option<f64>, Option<Unit>) {
        if let Some(caps) = self.quantity_with_unit.captures(residual) {
            let quantity = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
            let unit = caps.get(2).and_then(|m| lexicon::canonical_unit(m.as_str()));
            if let Some(whole) = caps.get(0) {
                remove_span(residual, whole.range());
            }
            return (quantity, unit);
        }

        let snapshot = residual.clone();
        for caps in self.bare_quantity.captures_iter(&snapshot) {
            let Some(number) = caps.get(1) else { continue };
            let after = snapshot[number.end()..].trim_start();
            if after.starts_with("day") {
                continue;
            }
            let quantity = number.as_str().parse::<f64>().ok();
            remove_span(residual, number.range());
            return (quantity, None);
        }

        (None, None)
    }

    /// Step 2: expiration phrases tried in order; the first rule whose date
    /// parses cleanly wins and its whole phrase is consumed.
    fn take_expiration(&self, residual: &mut String, today: NaiveDate) -> Option<NaiveDate> {
        if let Some(caps) = self.expires_on.captures(residual) {
            if let Some(date) = caps.get(1).and_then(|m| parse_date(m.as_str())) {
                if let Some(whole) = caps.get(0) {
                    remove_span(residual, whole.range());
                }
                return Some(date);
            }
        }

        if let Some(caps) = self.expires_in.captures(residual) {
            if let Some(days) = caps.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
                if let Some(date) = today.checked_add_days(Days::new(days)) {
                    if let Some(whole) = caps.get(0) {
                        remove_span(residual, whole.range());
                    }
                    return Some(date);
                }
            }
        }

        if let Some(caps) = self.best_by.captures(residual) {
            if let Some(date) = caps.get(1).and_then(|m| parse_date(m.as_str())) {
                if let Some(whole) = caps.get(0) {
                    remove_span(residual, whole.range());
                }
                return Some(date);
            }
        }

        if let Some(caps) = self.bare_date.captures(residual) {
            if let Some(date) = caps.get(1).and_then(|m| parse_date(m.as_str())) {
                if let Some(whole) = caps.get(0) {
                    remove_span(residual, whole.range());
                }
                return Some(date);
            }
        }

        None
    }

    /// Step 3: first location keyword present wins, in table order.
    fn take_location(&self, residual: &mut String) -> Option<Location> {
        for (pattern, location) in &self.locations {
            if let Some(found) = pattern.find(residual) {
                let range = found.range();
                remove_span(residual, range);
                return Some(*location);
            }
        }
        None
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_span(residual: &mut String, range: Range<usize>) {
    residual.replace_range(range, " ");
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Step 4: drop stop words, trim token punctuation, collapse whitespace.
fn clean_name(residual: &str) -> String {
    let tokens: Vec<&str> = WHITESPACE
        .split(residual)
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
        .collect();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new()
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_quantity_with_unit() {
        let entity = extractor().extract("2 pounds of chicken").unwrap();
        assert_eq!(entity.quantity, Some(2.0));
        assert_eq!(entity.unit, Some(Unit::Pound));
        assert_eq!(entity.name, "chicken");
        assert!((entity.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bare_quantity_without_unit() {
        let entity = extractor().extract("3 apples").unwrap();
        assert_eq!(entity.quantity, Some(3.0));
        assert_eq!(entity.unit, None);
        assert_eq!(entity.name, "apples");
    }

    #[test]
    fn test_fractional_quantity() {
        let entity = extractor().extract("1.5 liters of milk").unwrap();
        assert_eq!(entity.quantity, Some(1.5));
        assert_eq!(entity.unit, Some(Unit::Liter));
        assert_eq!(entity.name, "milk");
    }

    #[test]
    fn test_no_quantity() {
        let entity = extractor().extract("butter").unwrap();
        assert_eq!(entity.quantity, None);
        assert_eq!(entity.unit, None);
        assert!((entity.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_expiration_date() {
        let entity = extractor()
            .extract_with_today("milk expires on 12/31/2026", fixed_today())
            .unwrap();
        assert_eq!(
            entity.expiration_date,
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert_eq!(entity.name, "milk");
        assert_eq!(entity.quantity, None);
    }

    #[test]
    fn test_expires_in_days_is_relative() {
        let entity = extractor()
            .extract_with_today("yogurt expires in 5 days", fixed_today())
            .unwrap();
        assert_eq!(
            entity.expiration_date,
            NaiveDate::from_ymd_opt(2026, 8, 10)
        );
        assert_eq!(entity.name, "yogurt");
        // the 5 belongs to the duration phrase, not the quantity
        assert_eq!(entity.quantity, None);
    }

    #[test]
    fn test_best_by_and_two_digit_year() {
        let entity = extractor()
            .extract_with_today("cream best by 01-15-27", fixed_today())
            .unwrap();
        assert_eq!(entity.expiration_date, NaiveDate::from_ymd_opt(2027, 1, 15));
    }

    #[test]
    fn test_bare_date_anywhere() {
        let entity = extractor()
            .extract_with_today("ham 12-24-2026", fixed_today())
            .unwrap();
        assert_eq!(
            entity.expiration_date,
            NaiveDate::from_ymd_opt(2026, 12, 24)
        );
        // date digits are not mistaken for a quantity
        assert_eq!(entity.quantity, None);
        assert_eq!(entity.name, "ham");
    }

    #[test]
    fn test_unparseable_date_is_ignored() {
        let entity = extractor()
            .extract_with_today("milk expires on 13/45/2026", fixed_today())
            .unwrap();
        assert_eq!(entity.expiration_date, None);
    }

    #[test]
    fn test_location_keywords() {
        let entity = extractor().extract("chicken in the freezer").unwrap();
        assert_eq!(entity.location, Some(Location::Freezer));
        assert_eq!(entity.name, "chicken");

        let entity = extractor().extract("frozen peppers").unwrap();
        assert_eq!(entity.location, Some(Location::Freezer));
        assert_eq!(entity.name, "peppers");

        let entity = extractor().extract("crackers in the cupboard").unwrap();
        assert_eq!(entity.location, Some(Location::Pantry));
    }

    #[test]
    fn test_name_only_stop_words_fails() {
        assert!(extractor().extract("of the some").is_none());
        assert!(extractor().extract("").is_none());
        assert!(extractor().extract("   ").is_none());
    }

    #[test]
    fn test_confidence_accumulates_per_field() {
        // name only, not in the vocabulary
        let entity = extractor().extract("paper towels").unwrap();
        assert!((entity.confidence - 0.7).abs() < 1e-6);

        // quantity, no unit, known food
        let entity = extractor().extract("2 eggs").unwrap();
        assert!((entity.confidence - 0.9).abs() < 1e-6);

        // everything
        let entity = extractor().extract("2 dozen eggs").unwrap();
        assert!((entity.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_consumed_text_never_rematches() {
        let entity = extractor()
            .extract_with_today("2 jars of jam expires 01/01/2027 in the pantry", fixed_today())
            .unwrap();
        assert_eq!(entity.quantity, Some(2.0));
        assert_eq!(entity.unit, Some(Unit::Jar));
        assert_eq!(entity.expiration_date, NaiveDate::from_ymd_opt(2027, 1, 1));
        assert_eq!(entity.location, Some(Location::Pantry));
        assert_eq!(entity.name, "jam");
    }
}
