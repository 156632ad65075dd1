//! Calorie extraction from free text
//!
//! Turns model output and user-typed workout notes into numbers and
//! descriptions that can be written to the log.

#[cfg(test)]
mod proptests;

/// Marker line the meal analysis is expected to contain
pub const CALORIE_MARKER: &str = "Estimated Calories";

const MEAL_PREFIX: &str = "Meal: ";
const UNKNOWN_MEAL: &str = "Unknown meal";

/// Extract a calorie count from free text.
///
/// Every ASCII digit in the string is concatenated in order and read as one
/// number, so "60 mins, 420 kcal" yields 60420. Text without digits yields 0.
/// Values too large for `u64` saturate.
pub fn extract_calories(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

/// Parsed form of a meal photo analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealReport {
    pub description: String,
    /// `None` when no line carried the calorie marker
    pub calories: Option<u64>,
}

impl MealReport {
    pub fn found(&self) -> bool {
        self.calories.is_some()
    }
}

/// Parse the free-text analysis of a meal photo.
///
/// The first line is the meal description (with a leading `Meal: ` removed;
/// the same text elsewhere in the line is kept).
/// The first line containing [`CALORIE_MARKER`] supplies the calorie count.
pub fn parse_meal_report(report: &str) -> MealReport {
    let mut lines = report.lines();

    let description = lines.next().map_or_else(
        || UNKNOWN_MEAL.to_string(),
        |first| first.strip_prefix(MEAL_PREFIX).unwrap_or(first).to_string(),
    );

    let calories = report
        .lines()
        .find(|line| line.contains(CALORIE_MARKER))
        .map(extract_calories);

    MealReport {
        description,
        calories,
    }
}

/// A workout as typed by the user after choosing "log workout"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEntry {
    pub description: String,
    pub calories: u64,
}

impl WorkoutEntry {
    /// Parse a workout note.
    ///
    /// Never fails: calories default to 0, and the description is whatever is
    /// left after removing the extracted number and the `kcal` token.
    pub fn parse(text: &str) -> Self {
        let calories = extract_calories(text);
        let description = text
            .replace(&calories.to_string(), "")
            .replace("kcal", "")
            .trim()
            .to_string();

        Self {
            description,
            calories,
        }
    }
}
