//! Property-based tests for calorie extraction

use super::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_no_digits_is_zero(text in "[^0-9]{0,80}") {
        prop_assert_eq!(extract_calories(&text), 0);
    }

    #[test]
    fn prop_extraction_is_deterministic(text in ".{0,80}") {
        prop_assert_eq!(extract_calories(&text), extract_calories(&text));
    }

    #[test]
    fn prop_plain_number_round_trips(n in 0u64..1_000_000_000) {
        prop_assert_eq!(extract_calories(&format!("about {n} kcal")), n);
    }

    #[test]
    fn prop_report_without_marker_not_found(
        lines in proptest::collection::vec("[a-zA-Z0-9 :]{0,30}", 0..6)
    ) {
        let report = lines.join("\n");
        prop_assume!(!report.contains(CALORIE_MARKER));
        prop_assert!(!parse_meal_report(&report).found());
    }

    #[test]
    fn prop_marker_line_is_found(desc in "[a-zA-Z ]{1,30}", kcal in 0u64..5000) {
        let report = format!("Meal: {desc}\nEstimated Calories: {kcal} kcal\nBreakdown:");
        let parsed = parse_meal_report(&report);
        prop_assert_eq!(parsed.calories, Some(kcal));
        prop_assert_eq!(parsed.description, desc);
    }

    #[test]
    fn prop_workout_parse_never_panics(text in ".{0,80}") {
        let entry = WorkoutEntry::parse(&text);
        prop_assert_eq!(entry.calories, extract_calories(&text));
        prop_assert_eq!(entry.description.trim(), entry.description.as_str());
    }
}
