//! Events that can occur in a user session

/// Actions offered by the inline menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    LogWorkout,
    DietStatus,
    Chat,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [
        MenuAction::LogWorkout,
        MenuAction::DietStatus,
        MenuAction::Chat,
    ];

    /// Opaque identifier carried by the button
    pub fn callback_data(self) -> &'static str {
        match self {
            MenuAction::LogWorkout => "log_workout",
            MenuAction::DietStatus => "diet_status",
            MenuAction::Chat => "chat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::LogWorkout => "✅ Log Workout",
            MenuAction::DietStatus => "📊 How is your diet going?",
            MenuAction::Chat => "💬 Chat",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.callback_data() == data)
    }
}

/// Events that trigger session transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Text matching one of the greeting keywords
    Greeting,
    /// Inline menu button pressed
    Button(MenuAction),
    /// Explicit `/chat` command
    ChatCommand,
    /// Any other non-command text
    Text { text: String },
    /// Meal photo, by transport file id
    Photo { file_id: String },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Greeting => "greeting",
            Event::Button(_) => "button",
            Event::ChatCommand => "chat_command",
            Event::Text { .. } => "text",
            Event::Photo { .. } => "photo",
        }
    }
}
