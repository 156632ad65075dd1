//! Effects produced by state transitions

use crate::calories::WorkoutEntry;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a plain text reply
    Reply { text: String },

    /// Send the action menu
    ShowMenu,

    /// Append a workout row and confirm it
    LogWorkout { entry: WorkoutEntry },

    /// Answer the message with the coach model, grounded in the log
    CoachReply { message: String },

    /// Download, analyse and log a meal photo
    AnalyzeMeal { file_id: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply { text: text.into() }
    }

    /// Whether executing this effect writes to the log
    #[allow(dead_code)] // Used in tests
    pub fn writes_log(&self) -> bool {
        matches!(self, Effect::LogWorkout { .. } | Effect::AnalyzeMeal { .. })
    }
}
