//! Database schema for the log table

/// SQL schema for initialization.
///
/// Column order matches the tracking sheet: timestamp, meal description,
/// meal calories, workout description, workout calories.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS data_log (
    row_id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    meal_description TEXT NOT NULL DEFAULT '',
    meal_calories INTEGER,
    workout_description TEXT NOT NULL DEFAULT '',
    workout_calories INTEGER,

    CHECK ((meal_calories IS NULL) != (workout_calories IS NULL))
);
";

pub const INSERT_ROW: &str = "INSERT INTO data_log
    (timestamp, meal_description, meal_calories, workout_description, workout_calories)
    VALUES (?1, ?2, ?3, ?4, ?5)";

pub const SELECT_ALL: &str = "SELECT timestamp, meal_description, meal_calories,
    workout_description, workout_calories
    FROM data_log ORDER BY row_id ASC";
