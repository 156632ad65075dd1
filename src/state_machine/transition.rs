//! Pure state transition function

use super::{Effect, Event, MenuAction, SessionMode};
use crate::calories::WorkoutEntry;
use crate::replies;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: SessionMode,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionMode) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function.
///
/// Every event is accepted in every mode. Only workout text leaves
/// `AwaitingWorkout`, and only menu/command events enter a mode.
pub fn transition(state: SessionMode, event: Event) -> TransitionResult {
    match (state, event) {
        // Greetings show the menu without touching the mode
        (mode, Event::Greeting) => TransitionResult::new(mode).with_effect(Effect::ShowMenu),

        (_, Event::Button(MenuAction::LogWorkout)) => {
            TransitionResult::new(SessionMode::AwaitingWorkout)
                .with_effect(Effect::reply(replies::WORKOUT_PROMPT))
        }

        (mode, Event::Button(MenuAction::DietStatus)) => {
            TransitionResult::new(mode).with_effect(Effect::reply(replies::DIET_STATUS_STUB))
        }

        // Entering chat abandons a pending workout entry
        (_, Event::Button(MenuAction::Chat) | Event::ChatCommand) => {
            TransitionResult::new(SessionMode::Chatting)
                .with_effect(Effect::reply(replies::CHAT_STARTED))
        }

        // Workout entry takes precedence over chat
        (SessionMode::AwaitingWorkout, Event::Text { text }) => {
            TransitionResult::new(SessionMode::Idle)
                .with_effect(Effect::reply(replies::TEXT_ACK))
                .with_effect(Effect::LogWorkout {
                    entry: WorkoutEntry::parse(&text),
                })
        }

        (SessionMode::Chatting, Event::Text { text }) => {
            TransitionResult::new(SessionMode::Chatting)
                .with_effect(Effect::reply(replies::TEXT_ACK))
                .with_effect(Effect::CoachReply { message: text })
        }

        (SessionMode::Idle, Event::Text { .. }) => {
            TransitionResult::new(SessionMode::Idle).with_effect(Effect::reply(replies::TEXT_ACK))
        }

        (mode, Event::Photo { file_id }) => {
            TransitionResult::new(mode).with_effect(Effect::AnalyzeMeal { file_id })
        }
    }
}
