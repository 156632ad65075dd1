//! User-visible reply texts

pub const TEXT_ACK: &str = "🛠️";
pub const MENU_PROMPT: &str = "Hey! What do you want to do?";
pub const WORKOUT_PROMPT: &str =
    "🏋️ What did you do today and how many calories did it burn?\n(e.g. 60 mins gym, 420 kcal)";
pub const DIET_STATUS_STUB: &str = "📉 Diet summary coming soon!";
pub const CHAT_STARTED: &str = "💡";
pub const COACH_THINKING: &str = "💭";

pub const PHOTO_RECEIVED: &str = "📸 Got your meal photo!\nAnalyzing it now...";
pub const MEAL_LOGGED: &str = "📊 Logged to your sheet!";
pub const PHOTO_DONE: &str = "✅ All done!";

pub fn workout_logged(description: &str, calories: u64) -> String {
    format!("✅ Logged workout: {description} | 🔥 {calories} kcal")
}

pub fn analysis_report(report: &str) -> String {
    format!("🧠 Gemini says:\n\n{report}")
}
