//! Product type normalization.

/// One ordered product rule: the first rule whose predicate matches the
/// lower-cased text decides the category.
pub struct ProductRule {
    pub category: &'static str,
    pub matches: fn(&str) -> bool,
}

fn is_saw_variant(text: &str) -> bool {
    ["sawtimber", "sawlog", "saw log"]
        .iter()
        .any(|needle| text.contains(needle))
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Rule order matters: sawtimber variants precede generic logs, fuel
/// precedes fiber, and the generic stumpage and total rules come last.
pub const PRODUCT_RULES: &[ProductRule] = &[
    ProductRule {
        category: "sawtimber_large",
        matches: |text| is_saw_variant(text) && text.contains("large"),
    },
    ProductRule {
        category: "sawtimber_small",
        matches: |text| is_saw_variant(text) && text.contains("small"),
    },
    ProductRule {
        category: "sawtimber",
        matches: is_saw_variant,
    },
    ProductRule {
        category: "sawtimber",
        matches: |text| {
            matches!(text, "log" | "logs")
                || contains_any(text, &["hardwood_sawlog", "softwood_sawlog"])
        },
    },
    ProductRule {
        category: "sawtimber",
        matches: |text| text == "mbf",
    },
    ProductRule {
        category: "pulpwood",
        matches: |text| text.contains("pulp"),
    },
    ProductRule {
        category: "chip-n-saw",
        matches: |text| text.contains("chip") && text.contains("saw"),
    },
    ProductRule {
        category: "veneer",
        matches: |text| text.contains("veneer"),
    },
    ProductRule {
        category: "poles",
        matches: |text| text.contains("pole"),
    },
    ProductRule {
        category: "firewood",
        matches: |text| {
            contains_any(text, &["firewood", "fuelwood"])
                || (text.contains("fuel") && !text.contains("chip"))
        },
    },
    ProductRule {
        category: "fiber_fuel",
        matches: |text| text.contains("fiber"),
    },
    ProductRule {
        category: "biomass",
        matches: |text| text.contains("biomass"),
    },
    ProductRule {
        category: "boltwood",
        matches: |text| text.contains("bolt"),
    },
    ProductRule {
        category: "studwood",
        matches: |text| text.contains("stud"),
    },
    ProductRule {
        category: "cordwood",
        matches: |text| text.contains("cordwood") || text == "cord",
    },
    ProductRule {
        category: "posts",
        matches: |text| text.contains("post"),
    },
    ProductRule {
        category: "crossties",
        matches: |text| contains_any(text, &["crosstie", "tie"]),
    },
    ProductRule {
        category: "plylogs",
        matches: |text| text.contains("plylog"),
    },
    ProductRule {
        category: "topwood",
        matches: |text| contains_any(text, &["t-wood", "topwood"]),
    },
    ProductRule {
        category: "fuelchips",
        matches: |text| text.contains("fuelchip"),
    },
    ProductRule {
        category: "sawtimber",
        matches: |text| text.contains("stumpage"),
    },
    ProductRule {
        category: "total_index",
        matches: |text| contains_any(text, &["total", "index"]),
    },
];

/// Whether `text` is already one of the rule categories.
pub fn is_canonical_product(text: &str) -> bool {
    PRODUCT_RULES.iter().any(|rule| rule.category == text)
}

/// Maps free product text onto a canonical category.
///
/// Canonical categories map to themselves; unmatched text is returned
/// trimmed but otherwise unchanged. Blank input yields `None`.
pub fn standardize_product_type(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical_product(trimmed) {
        return Some(trimmed.to_string());
    }
    let lowered = trimmed.to_lowercase();
    let category = PRODUCT_RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .map_or(trimmed, |rule| rule.category);
    Some(category.to_string())
}
