//! Session state

use std::fmt;

/// What the next plain-text message from a user means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionMode {
    /// No pending action; plain text is acknowledged and ignored
    #[default]
    Idle,

    /// The next plain text is a workout entry
    AwaitingWorkout,

    /// Plain text goes to the coach
    Chatting,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Idle => "idle",
            SessionMode::AwaitingWorkout => "awaiting_workout",
            SessionMode::Chatting => "chatting",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
