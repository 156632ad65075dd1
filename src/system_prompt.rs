//! Prompt construction for the meal analysis and the coach chat

use crate::llm::{ContentBlock, LlmRequest};
use std::fmt::Write;

/// Instruction sent alongside every meal photo.
///
/// The reply layout is what `calories::parse_meal_report` reads back.
pub const MEAL_ANALYSIS_PROMPT: &str = "You are a calorie estimation assistant. The user has sent a photo of their meal. \
Look at the image and estimate the total calories and the name of each item if possible. \
Be specific. Reply with:\nMeal: [description]\nEstimated Calories: [number] kcal\nBreakdown:\n- Item: kcal";

/// Output cap for the meal breakdown
const MEAL_MAX_TOKENS: u32 = 1024;

/// Coach replies are meant to be short
const COACH_MAX_TOKENS: u32 = 512;

/// Coach persona
const COACH_PERSONA: &str = "You are a tough, no-nonsense personal fitness trainer. \
Be short, direct, funny. If the user is slacking, roast them. If they're in a deficit and doing well, give praise.\n\
Show breakdowns clearly like:\n- apple: 52 kcal\n- chicken: 220 kcal\n";

/// Build the coach system instruction around the rendered log context
pub fn build_coach_prompt(log_context: &str) -> String {
    let mut prompt = String::from(COACH_PERSONA);
    let _ = write!(prompt, "\nUser's log:\n{log_context}");
    prompt
}

/// One chat turn for the coach model
pub fn coach_request(log_context: &str, user_message: &str) -> LlmRequest {
    LlmRequest::user(vec![ContentBlock::text(format!("User: {user_message}"))])
        .with_system(build_coach_prompt(log_context))
        .with_max_tokens(COACH_MAX_TOKENS)
}

/// Vision request for a JPEG meal photo
pub fn meal_request(image: &[u8]) -> LlmRequest {
    LlmRequest::user(vec![
        ContentBlock::text(MEAL_ANALYSIS_PROMPT),
        ContentBlock::jpeg(image),
    ])
    .with_max_tokens(MEAL_MAX_TOKENS)
}
