//! Session runtime executor

use super::{meal, ChatId, HandlerError, Inbound, MenuButton, SessionServices, UserId};
use crate::calories::WorkoutEntry;
use crate::logbook::now_timestamp;
use crate::replies;
use crate::state_machine::{transition, Effect, MenuAction, SessionMode};
use crate::system_prompt::coach_request;
use tokio::sync::mpsc;

/// Owns one user's mode and executes the effects of each transition
pub struct SessionRuntime {
    user_id: UserId,
    mode: SessionMode,
    services: SessionServices,
    event_rx: mpsc::UnboundedReceiver<Inbound>,
}

impl SessionRuntime {
    pub fn new(
        user_id: UserId,
        services: SessionServices,
        event_rx: mpsc::UnboundedReceiver<Inbound>,
    ) -> Self {
        Self {
            user_id,
            mode: SessionMode::default(),
            services,
            event_rx,
        }
    }

    #[cfg(test)]
    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    #[cfg(test)]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub async fn run(mut self) {
        tracing::info!(user_id = self.user_id, "Starting session runtime");

        while let Some(inbound) = self.event_rx.recv().await {
            self.handle(inbound).await;
        }

        tracing::info!(user_id = self.user_id, "Session runtime stopped");
    }

    /// Apply one event: transition, then run every effect in order
    pub async fn handle(&mut self, inbound: Inbound) {
        let Inbound { chat_id, event } = inbound;
        let kind = event.kind();
        let result = transition(self.mode, event);

        if result.new_state != self.mode {
            tracing::info!(
                user_id = self.user_id,
                event = kind,
                from = %self.mode,
                to = %result.new_state,
                "Mode changed"
            );
        } else {
            tracing::debug!(user_id = self.user_id, event = kind, mode = %self.mode, "Event handled");
        }
        self.mode = result.new_state;

        for effect in result.effects {
            self.execute_effect(chat_id, effect).await;
        }
    }

    async fn execute_effect(&self, chat_id: ChatId, effect: Effect) {
        match effect {
            Effect::Reply { text } => self.send(chat_id, &text).await,

            Effect::ShowMenu => {
                let buttons: Vec<MenuButton> = MenuAction::ALL
                    .into_iter()
                    .map(|action| MenuButton::new(action.label(), action.callback_data()))
                    .collect();
                if let Err(e) = self
                    .services
                    .messenger
                    .send_menu(chat_id, replies::MENU_PROMPT, &buttons)
                    .await
                {
                    tracing::warn!(user_id = self.user_id, error = %e, "Failed to send menu");
                }
            }

            Effect::LogWorkout { entry } => {
                let reply = match self.log_workout(&entry).await {
                    Ok(()) => replies::workout_logged(&entry.description, entry.calories),
                    Err(e) => {
                        tracing::error!(user_id = self.user_id, kind = e.kind(), error = %e, "Workout not logged");
                        e.user_message().to_string()
                    }
                };
                self.send(chat_id, &reply).await;
            }

            Effect::CoachReply { message } => {
                self.send(chat_id, replies::COACH_THINKING).await;
                let reply = match self.coach_reply(&message).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(user_id = self.user_id, kind = e.kind(), error = %e, "Coach reply failed");
                        e.user_message().to_string()
                    }
                };
                self.send(chat_id, &reply).await;
            }

            Effect::AnalyzeMeal { file_id } => {
                meal::handle_photo(&self.services, chat_id, &file_id).await;
            }
        }
    }

    async fn log_workout(&self, entry: &WorkoutEntry) -> Result<(), HandlerError> {
        self.services
            .logbook
            .log_workout(&now_timestamp(), &entry.description, entry.calories)
            .await
            .map(|_| ())
            .map_err(HandlerError::LogWrite)
    }

    async fn coach_reply(&self, message: &str) -> Result<String, HandlerError> {
        // An unreadable log still gets an answer, just without history
        let context = match self.services.logbook.context().await {
            Ok(context) => context,
            Err(e) => {
                let e = HandlerError::LogRead(e);
                tracing::warn!(user_id = self.user_id, kind = e.kind(), error = %e, "Coach reply without log context");
                String::new()
            }
        };

        let response = self
            .services
            .coach
            .complete(&coach_request(&context, message))
            .await
            .map_err(HandlerError::Coach)?;
        Ok(response.text().trim().to_string())
    }

    async fn send(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.services.messenger.send_text(chat_id, text).await {
            tracing::warn!(user_id = self.user_id, error = %e, "Failed to send reply");
        }
    }
}
