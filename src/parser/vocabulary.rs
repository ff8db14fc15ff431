//! Food vocabulary word lists
//!
//! A weak signal only: biases intent detection when no pattern matches and
//! nudges confidence scores. Nothing here is authoritative about what a
//! household may actually store.

/// Dairy and eggs
pub const DAIRY: &[&str] = &[
    "milk",
    "cheese",
    "yogurt",
    "butter",
    "cream",
    "sour cream",
    "eggs",
    "egg",
];

/// Meat and seafood
pub const MEAT: &[&str] = &[
    "chicken",
    "beef",
    "pork",
    "turkey",
    "bacon",
    "ham",
    "sausage",
    "fish",
    "salmon",
    "tuna",
    "shrimp",
];

/// Vegetables
pub const VEGETABLES: &[&str] = &[
    "carrot",
    "carrots",
    "onion",
    "onions",
    "garlic",
    "potato",
    "potatoes",
    "tomato",
    "tomatoes",
    "lettuce",
    "spinach",
    "broccoli",
    "celery",
    "cucumber",
    "peppers",
    "mushrooms",
    "corn",
];

/// Fruits
pub const FRUITS: &[&str] = &[
    "apple",
    "apples",
    "banana",
    "bananas",
    "orange",
    "oranges",
    "orange juice",
    "grapes",
    "strawberries",
    "blueberries",
    "lemon",
    "lime",
    "pear",
    "peach",
    "mango",
    "avocado",
];

/// Grains and baked goods
pub const GRAINS: &[&str] = &[
    "bread",
    "rice",
    "pasta",
    "flour",
    "oats",
    "oatmeal",
    "cereal",
    "tortillas",
    "quinoa",
    "noodles",
    "crackers",
];

/// Shelf-stable staples
pub const PANTRY_STAPLES: &[&str] = &[
    "sugar",
    "salt",
    "pepper",
    "oil",
    "olive oil",
    "vinegar",
    "honey",
    "ketchup",
    "mustard",
    "mayonnaise",
    "beans",
    "soup",
    "broth",
    "coffee",
    "tea",
    "cocoa",
    "peanut butter",
    "jam",
    "cookies",
];

const CATEGORIES: &[&[&str]] = &[DAIRY, MEAT, VEGETABLES, FRUITS, GRAINS, PANTRY_STAPLES];

/// True if `name` (lowercased, whitespace-collapsed) is exactly a known
/// food term. Multi-word terms like "peanut butter" match whole.
#[must_use]
pub fn is_known_food(name: &str) -> bool {
    CATEGORIES
        .iter()
        .any(|category| category.contains(&name))
}

/// True if any whitespace-delimited token of `text` is a known food term.
#[must_use]
pub fn mentions_food(text: &str) -> bool {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(is_known_food)
}

/// Number of distinct known food terms appearing as tokens in `text`.
#[must_use]
pub fn count_food_terms(text: &str) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        if is_known_food(token) && !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen.len()
}
