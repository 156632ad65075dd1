//! Event routing: Telegram updates to session events

use crate::runtime::{ChatId, Inbound, Messenger, SessionManager, UserId};
use crate::state_machine::{Event, MenuAction};
use crate::telegram::types::{CallbackQuery, Message, Update};
use regex::Regex;
use std::sync::{Arc, OnceLock};

static GREETING_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn is_greeting(text: &str) -> bool {
    GREETING_RE
        .get_or_init(|| Regex::new(r"(?i)^(hi|hello|yo|sup|hey)$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// An update reduced to what the session layer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub user_id: UserId,
    pub chat_id: ChatId,
    /// Button presses must be acknowledged even when ignored
    pub callback_id: Option<String>,
    /// `None` when the update carries nothing a session acts on
    pub event: Option<Event>,
}

/// Classify one update. Returns `None` for updates with no human sender.
pub fn classify(update: &Update) -> Option<Routed> {
    if let Some(callback) = &update.callback_query {
        return classify_callback(callback);
    }
    update.message.as_ref().and_then(classify_message)
}

fn classify_callback(callback: &CallbackQuery) -> Option<Routed> {
    if callback.from.is_bot {
        return None;
    }
    let chat_id = callback
        .message
        .as_ref()
        .map_or(callback.from.id, |m| m.chat.id);
    let event = callback
        .data
        .as_deref()
        .and_then(MenuAction::from_callback_data)
        .map(Event::Button);

    Some(Routed {
        user_id: callback.from.id,
        chat_id,
        callback_id: Some(callback.id.clone()),
        event,
    })
}

fn classify_message(message: &Message) -> Option<Routed> {
    let user_id = match &message.from {
        Some(user) if user.is_bot => return None,
        Some(user) => user.id,
        // Channel posts have no sender
        None => return None,
    };

    Some(Routed {
        user_id,
        chat_id: message.chat.id,
        callback_id: None,
        event: message_event(message),
    })
}

fn message_event(message: &Message) -> Option<Event> {
    if let Some(photo) = message
        .photo
        .as_ref()
        .and_then(|sizes| sizes.iter().max_by_key(|p| u64::from(p.width) * u64::from(p.height)))
    {
        return Some(Event::Photo {
            file_id: photo.file_id.clone(),
        });
    }

    let text = message.text.as_deref()?;
    let trimmed = text.trim();

    if let Some(command) = trimmed.strip_prefix('/') {
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default();
        return (name == "chat").then_some(Event::ChatCommand);
    }

    if is_greeting(trimmed) {
        return Some(Event::Greeting);
    }

    Some(Event::Text {
        text: text.to_string(),
    })
}

/// Turns updates into session events and queues them
pub struct EventRouter {
    sessions: Arc<SessionManager>,
    messenger: Arc<dyn Messenger>,
}

impl EventRouter {
    pub fn new(sessions: Arc<SessionManager>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            sessions,
            messenger,
        }
    }

    pub async fn dispatch(&self, update: &Update) {
        let Some(routed) = classify(update) else {
            tracing::debug!(update_id = update.update_id, "Ignoring update without sender");
            return;
        };

        if let Some(callback_id) = &routed.callback_id {
            if let Err(e) = self.messenger.answer_callback(callback_id).await {
                tracing::warn!(user_id = routed.user_id, error = %e, "Failed to answer callback");
            }
        }

        let Some(event) = routed.event else {
            tracing::debug!(
                update_id = update.update_id,
                user_id = routed.user_id,
                "No session event for update"
            );
            return;
        };

        tracing::debug!(user_id = routed.user_id, event = event.kind(), "Routing event");
        let inbound = Inbound {
            chat_id: routed.chat_id,
            event,
        };
        if let Err(e) = self.sessions.send_event(routed.user_id, inbound).await {
            tracing::error!(user_id = routed.user_id, error = %e, "Failed to queue event");
        }
    }
}
