use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::dto::NutritionFacts;

const NUM: &str = r"(\d+(?:\.\d+)?)";
const RANGE_TAIL: &str = r"(?:[ \t]*[-\u{2013}\u{2014}][ \t]*(\d+(?:\.\d+)?))?";

// Gaps are `[ \t]*` so a match never spans two lines.
fn label_first(label: &str, unit: &str) -> Regex {
    let pattern = format!(r"(?i)\b(?:{label})[ \t]*:?[ \t]*{NUM}{RANGE_TAIL}[ \t]*{unit}");
    Regex::new(&pattern).expect("static nutrient pattern")
}

fn value_first(label: &str, unit: &str) -> Regex {
    let pattern = format!(r"(?i)\b{NUM}{RANGE_TAIL}[ \t]*{unit}[ \t]*(?:of[ \t]+)?(?:{label})\b");
    Regex::new(&pattern).expect("static nutrient pattern")
}

fn labelled(label: &str) -> Regex {
    let pattern = format!(r"(?i)\b(?:{label})[ \t]*:");
    Regex::new(&pattern).expect("static nutrient pattern")
}

struct Nutrient {
    primary: Regex,
    fallback: Regex,
    /// `Protein:` with no readable number after it.
    labelled: Regex,
}

impl Nutrient {
    /// `unit` is optional after a label; `fallback_unit` must appear when the
    /// number comes first.
    fn new(label: &str, unit: &str, fallback_unit: &str) -> Self {
        Self {
            primary: label_first(label, unit),
            fallback: value_first(label, fallback_unit),
            labelled: labelled(label),
        }
    }

    fn find(&self, text: &str) -> Option<u32> {
        if let Some(caps) = self.primary.captures(text) {
            return value_of(&caps);
        }
        if self.labelled.is_match(text) {
            return None;
        }
        self.fallback.captures(text).and_then(|caps| value_of(&caps))
    }
}

lazy_static! {
    static ref CALORIES: Nutrient = Nutrient::new("calories", r"(?:kcal)?", r"(?:kcal)?");
    static ref PROTEIN: Nutrient = Nutrient::new("protein", r"(?:g\b)?", r"g\b");
    static ref CARBS: Nutrient = Nutrient::new("carbohydrates|carbs", r"(?:g\b)?", r"g\b");
    static ref FAT: Nutrient = Nutrient::new("fat", r"(?:g\b)?", r"g\b");
}

/// A single number is taken as-is, a range becomes its midpoint.
/// Rounding is half away from zero.
fn value_of(caps: &Captures<'_>) -> Option<u32> {
    let low = parse_number(caps.get(1)?.as_str())?;
    let value = match caps.get(2) {
        Some(high) => (low + parse_number(high.as_str())?) / 2.0,
        None => low,
    };
    to_whole(value)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn to_whole(value: f64) -> Option<u32> {
    let rounded = value.round();
    if rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return None;
    }
    Some(rounded as u32)
}

/// Best-effort extraction of calories and macros from an AI description.
/// Never fails: anything that cannot be read is left as `None`.
pub fn parse_nutrition(text: &str) -> NutritionFacts {
    NutritionFacts {
        calories: CALORIES.find(text),
        protein: PROTEIN.find(text),
        carbs: CARBS.find(text),
        fat: FAT.find(text),
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    fn facts(c: u32, p: u32, cb: u32, f: u32) -> NutritionFacts {
        NutritionFacts {
            calories: Some(c),
            protein: Some(p),
            carbs: Some(cb),
            fat: Some(f),
        }
    }

    #[test]
    fn parses_labelled_values_with_calorie_range() {
        let got = parse_nutrition("Calories: 300-400, Protein: 20g, Carbs: 50g, Fat: 10g");
        assert_eq!(got, facts(350, 20, 50, 10));
    }

    #[test]
    fn unparseable_text_leaves_every_field_absent() {
        let got = parse_nutrition("Tasty and healthy!");
        assert_eq!(got, NutritionFacts::default());
        assert!(got.is_empty());
    }

    #[test]
    fn ranges_accept_en_and_em_dashes() {
        let got = parse_nutrition("calories 500\u{2013}600; protein 30\u{2014}35 g; carbohydrates: 40 - 45g; FAT 12g");
        assert_eq!(got, facts(550, 33, 43, 12));
    }

    #[test]
    fn midpoint_rounds_half_away_from_zero() {
        let got = parse_nutrition("Protein: 20-21g");
        assert_eq!(got.protein, Some(21));
        let got = parse_nutrition("Fat: 2-3g");
        assert_eq!(got.fat, Some(3));
    }

    #[test]
    fn label_matching_is_case_insensitive() {
        let got = parse_nutrition("CALORIES: 420 PROTEIN: 18G CARBS: 60G");
        assert_eq!(got.calories, Some(420));
        assert_eq!(got.protein, Some(18));
        assert_eq!(got.carbs, Some(60));
        assert_eq!(got.fat, None);
    }

    #[test]
    fn value_before_label_is_understood() {
        let got = parse_nutrition("About 350 calories, 20g protein, 50 g carbs and 10g of fat.");
        assert_eq!(got, facts(350, 20, 50, 10));
    }

    #[test]
    fn label_first_wins_over_value_first() {
        let got = parse_nutrition("Calories: 200. A side adds 100 calories.");
        assert_eq!(got.calories, Some(200));
    }

    #[test]
    fn decimals_are_rounded() {
        let got = parse_nutrition("Protein: 12.5g, Fat: 7.4g");
        assert_eq!(got.protein, Some(13));
        assert_eq!(got.fat, Some(7));
    }

    #[test]
    fn absurdly_large_numbers_are_dropped() {
        let got = parse_nutrition("Calories: 99999999999999999999");
        assert_eq!(got.calories, None);
    }

    #[test]
    fn label_without_number_is_a_miss() {
        let got = parse_nutrition("Calories: unknown, Protein: high");
        assert!(got.is_empty());
    }

    #[test]
    fn label_without_number_never_borrows_a_neighbour() {
        let got = parse_nutrition("Calories: 300 Protein: n/a, Carbs: 50g");
        assert_eq!(got.calories, Some(300));
        assert_eq!(got.protein, None);
        assert_eq!(got.carbs, Some(50));

        let got = parse_nutrition("Protein: 12 g\nFat: trace amounts");
        assert_eq!(got.protein, Some(12));
        assert_eq!(got.fat, None);

        let got = parse_nutrition("Calories: 300\nProtein: high");
        assert_eq!(got.calories, Some(300));
        assert_eq!(got.protein, None);
    }

    #[test]
    fn value_first_needs_grams_for_macros() {
        let got = parse_nutrition("Serves 2 protein-rich portions");
        assert_eq!(got.protein, None);
        let got = parse_nutrition("Roughly 15 g protein");
        assert_eq!(got.protein, Some(15));
    }

    #[test]
    fn matches_do_not_cross_lines() {
        let got = parse_nutrition("Portion 2\ncarbs are moderate");
        assert_eq!(got.carbs, None);
        let got = parse_nutrition("Protein\n25g");
        assert_eq!(got.protein, None);
    }
}
