//! Canonical units and storage locations
//!
//! Spelling variants map onto closed enums so an unhandled unit or location
//! is a compile error rather than a stringly-typed fallthrough.

use serde::{Deserialize, Serialize};

/// Canonical measurement unit for a household item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Cup,
    Tablespoon,
    Teaspoon,
    Liter,
    Milliliter,
    Gallon,
    Quart,
    Pint,
    FluidOunce,
    Pound,
    Ounce,
    Gram,
    Kilogram,
    Piece,
    Dozen,
    Pack,
    Box,
    Can,
    Jar,
    Bottle,
}

impl Unit {
    /// Every canonical unit, in display order
    pub const ALL: [Self; 20] = [
        Self::Cup,
        Self::Tablespoon,
        Self::Teaspoon,
        Self::Liter,
        Self::Milliliter,
        Self::Gallon,
        Self::Quart,
        Self::Pint,
        Self::FluidOunce,
        Self::Pound,
        Self::Ounce,
        Self::Gram,
        Self::Kilogram,
        Self::Piece,
        Self::Dozen,
        Self::Pack,
        Self::Box,
        Self::Can,
        Self::Jar,
        Self::Bottle,
    ];

    /// Identifier used on the wire (matches the serde rename)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cup => "cup",
            Self::Tablespoon => "tablespoon",
            Self::Teaspoon => "teaspoon",
            Self::Liter => "liter",
            Self::Milliliter => "milliliter",
            Self::Gallon => "gallon",
            Self::Quart => "quart",
            Self::Pint => "pint",
            Self::FluidOunce => "fluid_ounce",
            Self::Pound => "pound",
            Self::Ounce => "ounce",
            Self::Gram => "gram",
            Self::Kilogram => "kilogram",
            Self::Piece => "piece",
            Self::Dozen => "dozen",
            Self::Pack => "pack",
            Self::Box => "box",
            Self::Can => "can",
            Self::Jar => "jar",
            Self::Bottle => "bottle",
        }
    }
}

/// Storage location inside the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Pantry,
    Fridge,
    Freezer,
    Counter,
}

impl Location {
    /// Identifier used on the wire (matches the serde rename)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pantry => "pantry",
            Self::Fridge => "fridge",
            Self::Freezer => "freezer",
            Self::Counter => "counter",
        }
    }
}

/// Accepted spellings for each canonical unit.
///
/// Multi-word spellings are allowed; the extractor builds its matcher from
/// this table with longer spellings tried first.
pub const UNIT_VARIANTS: &[(&str, Unit)] = &[
    ("cup", Unit::Cup),
    ("cups", Unit::Cup),
    ("tablespoon", Unit::Tablespoon),
    ("tablespoons", Unit::Tablespoon),
    ("tbsp", Unit::Tablespoon),
    ("tbs", Unit::Tablespoon),
    ("teaspoon", Unit::Teaspoon),
    ("teaspoons", Unit::Teaspoon),
    ("tsp", Unit::Teaspoon),
    ("liter", Unit::Liter),
    ("liters", Unit::Liter),
    ("litre", Unit::Liter),
    ("litres", Unit::Liter),
    ("l", Unit::Liter),
    ("milliliter", Unit::Milliliter),
    ("milliliters", Unit::Milliliter),
    ("millilitre", Unit::Milliliter),
    ("millilitres", Unit::Milliliter),
    ("ml", Unit::Milliliter),
    ("gallon", Unit::Gallon),
    ("gallons", Unit::Gallon),
    ("gal", Unit::Gallon),
    ("quart", Unit::Quart),
    ("quarts", Unit::Quart),
    ("qt", Unit::Quart),
    ("pint", Unit::Pint),
    ("pints", Unit::Pint),
    ("pt", Unit::Pint),
    ("fluid ounce", Unit::FluidOunce),
    ("fluid ounces", Unit::FluidOunce),
    ("fl oz", Unit::FluidOunce),
    ("floz", Unit::FluidOunce),
    ("pound", Unit::Pound),
    ("pounds", Unit::Pound),
    ("lb", Unit::Pound),
    ("lbs", Unit::Pound),
    ("ounce", Unit::Ounce),
    ("ounces", Unit::Ounce),
    ("oz", Unit::Ounce),
    ("gram", Unit::Gram),
    ("grams", Unit::Gram),
    ("g", Unit::Gram),
    ("kilogram", Unit::Kilogram),
    ("kilograms", Unit::Kilogram),
    ("kg", Unit::Kilogram),
    ("kilo", Unit::Kilogram),
    ("kilos", Unit::Kilogram),
    ("piece", Unit::Piece),
    ("pieces", Unit::Piece),
    ("pc", Unit::Piece),
    ("pcs", Unit::Piece),
    ("dozen", Unit::Dozen),
    ("dozens", Unit::Dozen),
    ("pack", Unit::Pack),
    ("packs", Unit::Pack),
    ("package", Unit::Pack),
    ("packages", Unit::Pack),
    ("box", Unit::Box),
    ("boxes", Unit::Box),
    ("can", Unit::Can),
    ("cans", Unit::Can),
    ("jar", Unit::Jar),
    ("jars", Unit::Jar),
    ("bottle", Unit::Bottle),
    ("bottles", Unit::Bottle),
];

/// Location keywords in match-priority order; the first keyword present in a
/// fragment wins.
pub const LOCATION_KEYWORDS: &[(&str, Location)] = &[
    ("pantry", Location::Pantry),
    ("cupboard", Location::Pantry),
    ("cabinet", Location::Pantry),
    ("fridge", Location::Fridge),
    ("refrigerator", Location::Fridge),
    ("cooler", Location::Fridge),
    ("freezer", Location::Freezer),
    ("frozen", Location::Freezer),
    ("counter", Location::Counter),
    ("countertop", Location::Counter),
];

/// Look up a unit spelling (already lowercased).
#[must_use]
pub fn canonical_unit(spelling: &str) -> Option<Unit> {
    UNIT_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == spelling)
        .map(|&(_, unit)| unit)
}

/// Spellings accepted for one canonical unit, in table order.
#[must_use]
pub fn variants_of(unit: Unit) -> Vec<&'static str> {
    UNIT_VARIANTS
        .iter()
        .filter(|&&(_, u)| u == unit)
        .map(|&(variant, _)| variant)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_unit_lookup() {
        assert_eq!(canonical_unit("tbsp"), Some(Unit::Tablespoon));
        assert_eq!(canonical_unit("pounds"), Some(Unit::Pound));
        assert_eq!(canonical_unit("fl oz"), Some(Unit::FluidOunce));
        assert_eq!(canonical_unit("grams"), Some(Unit::Gram));
        assert_eq!(canonical_unit("furlong"), None);
    }

    #[test]
    fn test_every_canonical_unit_has_a_spelling() {
        for unit in Unit::ALL {
            assert!(
                !variants_of(unit).is_empty(),
                "no spelling maps to {}",
                unit.as_str()
            );
        }
    }

    #[test]
    fn test_wire_identifiers() {
        assert_eq!(
            serde_json::to_string(&Unit::FluidOunce).unwrap(),
            "\"fluid_ounce\""
        );
        assert_eq!(
            serde_json::to_string(&Location::Freezer).unwrap(),
            "\"freezer\""
        );
        for unit in Unit::ALL {
            assert_eq!(
                serde_json::to_string(&unit).unwrap(),
                format!("\"{}\"", unit.as_str())
            );
        }
    }

    #[test]
    fn test_location_keywords_cover_every_location() {
        for location in [
            Location::Pantry,
            Location::Fridge,
            Location::Freezer,
            Location::Counter,
        ] {
            assert!(
                LOCATION_KEYWORDS.iter().any(|&(_, l)| l == location),
                "no keyword maps to {}",
                location.as_str()
            );
        }
    }
}
