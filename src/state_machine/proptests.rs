//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_mode() -> impl Strategy<Value = SessionMode> {
    prop_oneof![
        Just(SessionMode::Idle),
        Just(SessionMode::AwaitingWorkout),
        Just(SessionMode::Chatting),
    ]
}

fn arb_action() -> impl Strategy<Value = MenuAction> {
    prop_oneof![
        Just(MenuAction::LogWorkout),
        Just(MenuAction::DietStatus),
        Just(MenuAction::Chat),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof!["[a-zA-Z ,]{0,40}", "[0-9a-z ,]{1,40}", ".{0,40}"]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Greeting),
        Just(Event::ChatCommand),
        arb_action().prop_map(Event::Button),
        arb_text().prop_map(|text| Event::Text { text }),
        "[A-Za-z0-9_-]{5,20}".prop_map(|file_id| Event::Photo { file_id }),
    ]
}

fn count_workout_logs(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::LogWorkout { .. }))
        .count()
}

proptest! {
    // Chat turns never write to the log
    #[test]
    fn prop_chat_text_never_logs(text in arb_text()) {
        let result = transition(SessionMode::Chatting, Event::Text { text });
        prop_assert_eq!(result.new_state, SessionMode::Chatting);
        prop_assert!(!result.effects.iter().any(Effect::writes_log));
    }

    // Awaiting workout + text logs exactly once and returns to idle
    #[test]
    fn prop_workout_entry_logs_once(text in arb_text()) {
        let result = transition(SessionMode::AwaitingWorkout, Event::Text { text });
        prop_assert_eq!(result.new_state, SessionMode::Idle);
        prop_assert_eq!(count_workout_logs(&result.effects), 1);
    }

    // Workout rows only come out of AwaitingWorkout
    #[test]
    fn prop_only_awaiting_logs_workouts(mode in arb_mode(), event in arb_event()) {
        let result = transition(mode, event);
        if count_workout_logs(&result.effects) > 0 {
            prop_assert_eq!(mode, SessionMode::AwaitingWorkout);
        }
    }

    // Every event produces at least one user-visible effect
    #[test]
    fn prop_every_event_answers(mode in arb_mode(), event in arb_event()) {
        let result = transition(mode, event);
        prop_assert!(!result.effects.is_empty());
    }

    // Greetings, photos and diet status never change the mode
    #[test]
    fn prop_mode_preserving_events(mode in arb_mode(), file_id in "[a-z]{5}") {
        for event in [
            Event::Greeting,
            Event::Photo { file_id: file_id.clone() },
            Event::Button(MenuAction::DietStatus),
        ] {
            prop_assert_eq!(transition(mode, event).new_state, mode);
        }
    }

    // Any sequence of events keeps the machine total and deterministic
    #[test]
    fn prop_sequences_are_deterministic(
        events in proptest::collection::vec(arb_event(), 0..20)
    ) {
        let run = |events: &[Event]| {
            events.iter().cloned().fold(SessionMode::Idle, |mode, event| {
                transition(mode, event).new_state
            })
        };
        prop_assert_eq!(run(&events), run(&events));
    }
}
