//! Conversation state machine.
//!
//! [`transition`] is a pure function from `(state, event)` to the next state
//! plus the side effects the caller must run. The only side effect is text
//! generation; its result comes back as [`Event::Generated`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::fields::{FIELDS, FieldKey};
use super::prompts::{
    GREETING_PROMPT, SYSTEM_CONTEXT, completion_message, invalid_input_message,
    tech_question_prompt,
};
use super::state::{COMPLETE_STEP, ConversationState, FIELD_COUNT, Phase, TECH_QUESTION_STEP};
use super::validate::validate;

/// What a generation request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Greeting,
    TechQuestion,
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The conversation is opened.
    Start,
    /// The candidate submitted an answer. `country_code` is the currently
    /// selected dial prefix, used on the phone step.
    Submit {
        text: String,
        country_code: Option<String>,
    },
    /// Generated (or fallback) text for an earlier [`Effect::Generate`].
    Generated { purpose: Purpose, text: String },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Self::Submit {
            text: text.into(),
            country_code: None,
        }
    }

    pub fn submit_with_code(text: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self::Submit {
            text: text.into(),
            country_code: Some(country_code.into()),
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Generate {
        purpose: Purpose,
        prompt: String,
        system: Option<String>,
    },
}

/// What a transition did, for logging and callers that render feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event had no effect.
    Ignored,
    /// Generation of the opening greeting was requested.
    Started,
    /// Generated text was added to the transcript.
    Appended(Purpose),
    /// The answer was accepted and the step advanced.
    Advanced { from: Phase, to: Phase },
    /// The answer failed validation; step unchanged.
    Rejected {
        field: FieldKey,
        error: ValidationError,
    },
}

/// Result of one transition.
#[derive(Debug)]
pub struct Transition {
    pub state: ConversationState,
    pub effects: Vec<Effect>,
    pub outcome: Outcome,
}

impl Transition {
    fn ignored(state: ConversationState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            outcome: Outcome::Ignored,
        }
    }
}

/// Apply `event` to `state`.
pub fn transition(state: ConversationState, event: Event) -> Transition {
    if state.completed {
        return Transition::ignored(state);
    }

    match event {
        Event::Start => start(state),
        Event::Generated { purpose, text } => generated(state, purpose, text),
        Event::Submit { text, country_code } => submit(state, text, country_code),
    }
}

fn start(state: ConversationState) -> Transition {
    if state.step != 0 || !state.transcript.is_empty() {
        return Transition::ignored(state);
    }
    Transition {
        state,
        effects: vec![Effect::Generate {
            purpose: Purpose::Greeting,
            prompt: GREETING_PROMPT.to_string(),
            system: Some(SYSTEM_CONTEXT.to_string()),
        }],
        outcome: Outcome::Started,
    }
}

fn generated(mut state: ConversationState, purpose: Purpose, text: String) -> Transition {
    let applies = match purpose {
        Purpose::Greeting => state.step == 0 && state.transcript.is_empty(),
        Purpose::TechQuestion => state.step == TECH_QUESTION_STEP && !state.tech_question_asked,
    };
    if !applies {
        return Transition::ignored(state);
    }

    state.push_assistant(text);
    if purpose == Purpose::TechQuestion {
        state.tech_question_asked = true;
    }
    Transition {
        state,
        effects: Vec::new(),
        outcome: Outcome::Appended(purpose),
    }
}

fn submit(mut state: ConversationState, text: String, country_code: Option<String>) -> Transition {
    let from = state.phase();
    match from {
        Phase::Greeting => {
            state.push_user(text);
            state.step = 1;
            state.push_assistant(FIELDS[0].prompt());
            advanced(state, from, Vec::new())
        }
        Phase::Collecting(field) => collect(state, field, text, country_code),
        Phase::TechQuestion => {
            state.push_user(text);
            state.step = COMPLETE_STEP;
            let email = state.record.get(FieldKey::Email).unwrap_or_default().to_string();
            let phone = state.record.get(FieldKey::Phone).unwrap_or_default().to_string();
            state.push_assistant(completion_message(&email, &phone));
            state.completed = true;
            advanced(state, from, Vec::new())
        }
        Phase::Complete => Transition::ignored(state),
    }
}

fn collect(
    mut state: ConversationState,
    field: FieldKey,
    text: String,
    country_code: Option<String>,
) -> Transition {
    let from = state.phase();

    // The phone answer is the local number; the stored value carries the
    // selected dial prefix.
    let (display, value) = match (field, country_code.as_deref()) {
        (FieldKey::Phone, Some(code)) => (
            format!("{code} {text}"),
            format!("{}{}", code.trim(), text.trim()),
        ),
        _ => (text.clone(), text.trim().to_string()),
    };

    state.push_user(display);

    if let Err(error) = validate(field, &value, country_code.as_deref()) {
        state.push_assistant(invalid_input_message(&error.to_string()));
        return Transition {
            state,
            effects: Vec::new(),
            outcome: Outcome::Rejected { field, error },
        };
    }

    state.record.insert_once(field, value);
    state.step += 1;

    if state.step <= FIELD_COUNT {
        state.push_assistant(FIELDS[state.step - 1].prompt());
        return advanced(state, from, Vec::new());
    }

    let tech_stack = state.record.get(FieldKey::TechStack).unwrap_or_default();
    let effects = vec![Effect::Generate {
        purpose: Purpose::TechQuestion,
        prompt: tech_question_prompt(tech_stack),
        system: Some(SYSTEM_CONTEXT.to_string()),
    }];
    advanced(state, from, effects)
}

fn advanced(state: ConversationState, from: Phase, effects: Vec<Effect>) -> Transition {
    let to = state.phase();
    Transition {
        state,
        effects,
        outcome: Outcome::Advanced { from, to },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::state::Speaker;

    const VALID: [(&str, Option<&str>); 7] = [
        ("Jane Doe", None),
        ("jane.doe@gmail.com", None),
        ("9876543210", Some("+91")),
        ("5.5", None),
        ("Backend Engineer", None),
        ("Bengaluru", None),
        ("Rust, Tokio, PostgreSQL", None),
    ];

    fn apply(state: ConversationState, event: Event) -> Transition {
        transition(state, event)
    }

    fn step(state: ConversationState, event: Event) -> ConversationState {
        transition(state, event).state
    }

    fn submit_valid(state: ConversationState, index: usize) -> Transition {
        let (text, code) = VALID[index];
        let event = match code {
            Some(code) => Event::submit_with_code(text, code),
            None => Event::submit(text),
        };
        apply(state, event)
    }

    /// Greeted and answered the greeting: step 1.
    fn at_first_field() -> ConversationState {
        let t = apply(ConversationState::default(), Event::Start);
        let state = step(
            t.state,
            Event::Generated {
                purpose: Purpose::Greeting,
                text: "Welcome!".into(),
            },
        );
        step(state, Event::submit("hi"))
    }

    fn at_tech_question() -> (ConversationState, Vec<Effect>) {
        let mut state = at_first_field();
        let mut effects = Vec::new();
        for index in 0..VALID.len() {
            let t = submit_valid(state, index);
            state = t.state;
            effects = t.effects;
        }
        (state, effects)
    }

    fn assert_no_repeated_assistant_turns(state: &ConversationState) {
        for pair in state.transcript().windows(2) {
            assert!(
                !(pair[0].speaker == Speaker::Assistant
                    && pair[1].speaker == Speaker::Assistant
                    && pair[0].text == pair[1].text),
                "assistant turn repeated: {}",
                pair[1].text
            );
        }
    }

    #[test]
    fn start_requests_greeting_once() {
        let t = apply(ConversationState::default(), Event::Start);
        assert_eq!(t.outcome, Outcome::Started);
        assert!(matches!(
            &t.effects[..],
            [Effect::Generate { purpose: Purpose::Greeting, prompt, system: Some(_) }]
                if prompt == GREETING_PROMPT
        ));

        let state = step(
            t.state,
            Event::Generated {
                purpose: Purpose::Greeting,
                text: "Welcome!".into(),
            },
        );
        assert_eq!(state.transcript().len(), 1);

        // Re-entering with a non-empty transcript does nothing.
        let again = apply(state, Event::Start);
        assert_eq!(again.outcome, Outcome::Ignored);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn greeting_reply_prompts_for_full_name() {
        let state = at_first_field();
        assert_eq!(state.step(), 1);
        assert_eq!(state.phase(), Phase::Collecting(FieldKey::FullName));
        assert_eq!(state.last_assistant_message(), Some("Please provide your full name:"));
        assert!(state.record().is_empty());
    }

    #[test]
    fn greeting_reply_accepts_any_text() {
        let state = step(ConversationState::default(), Event::submit(""));
        assert_eq!(state.step(), 1);
        assert_eq!(state.transcript()[0].speaker, Speaker::User);
    }

    #[test]
    fn invalid_answer_keeps_step_and_reprompts() {
        let state = at_first_field();
        let t = apply(state, Event::submit("J4ne"));
        assert_eq!(t.state.step(), 1);
        assert!(t.state.record().is_empty());
        assert!(matches!(
            t.outcome,
            Outcome::Rejected { field: FieldKey::FullName, error: ValidationError::FormatInvalid(_) }
        ));
        assert_eq!(
            t.state.last_assistant_message(),
            Some("Invalid input: Name should only contain letters and spaces. Please try again.")
        );
        let last_user = &t.state.transcript()[t.state.transcript().len() - 2];
        assert_eq!(last_user.text, "J4ne");
    }

    #[test]
    fn empty_answer_is_rejected() {
        let t = apply(at_first_field(), Event::submit("   "));
        assert_eq!(t.state.step(), 1);
        assert_eq!(
            t.state.last_assistant_message(),
            Some("Invalid input: empty field. Please try again.")
        );
    }

    #[test]
    fn repeated_identical_rejections_are_both_shown() {
        let state = step(at_first_field(), Event::submit("1"));
        let before = state.transcript().len();
        let state = step(state, Event::submit("1"));
        // user turn + re-prompt, the user turn breaks the dedup window
        assert_eq!(state.transcript().len(), before + 2);
        assert_no_repeated_assistant_turns(&state);
    }

    #[test]
    fn values_are_stored_trimmed() {
        let state = step(at_first_field(), Event::submit("  Jane Doe  "));
        assert_eq!(state.record().get(FieldKey::FullName), Some("Jane Doe"));
        assert_eq!(state.transcript()[state.transcript().len() - 2].text, "  Jane Doe  ");
    }

    #[test]
    fn phone_combines_prefix() {
        let mut state = at_first_field();
        for index in 0..2 {
            state = submit_valid(state, index).state;
        }
        assert_eq!(state.phase(), Phase::Collecting(FieldKey::Phone));
        assert_eq!(
            state.last_assistant_message(),
            Some("Please select your country code and enter your phone number:")
        );

        let t = apply(state, Event::submit_with_code("98765", "+91"));
        assert_eq!(t.state.step(), 3);
        match &t.outcome {
            Outcome::Rejected { error, .. } => assert!(error.to_string().contains("10 digits")),
            other => panic!("expected rejection, got {other:?}"),
        }
        let user_turn = &t.state.transcript()[t.state.transcript().len() - 2];
        assert_eq!(user_turn.text, "+91 98765");

        let state = step(t.state, Event::submit_with_code("9876543210", "+91"));
        assert_eq!(state.step(), 4);
        assert_eq!(state.record().get(FieldKey::Phone), Some("+919876543210"));
    }

    #[test]
    fn phone_without_country_code_is_rejected() {
        let mut state = at_first_field();
        for index in 0..2 {
            state = submit_valid(state, index).state;
        }
        let t = apply(state, Event::submit("9876543210"));
        assert!(matches!(
            t.outcome,
            Outcome::Rejected { field: FieldKey::Phone, error: ValidationError::LookupFailed(_) }
        ));
        assert_eq!(t.state.step(), 3);
    }

    #[test]
    fn country_code_is_ignored_off_the_phone_step() {
        let state = step(at_first_field(), Event::submit_with_code("Jane Doe", "+91"));
        assert_eq!(state.record().get(FieldKey::FullName), Some("Jane Doe"));
    }

    #[test]
    fn last_field_requests_tech_question() {
        let (state, effects) = at_tech_question();
        assert_eq!(state.step(), TECH_QUESTION_STEP);
        assert_eq!(state.phase(), Phase::TechQuestion);
        assert_eq!(state.record().len(), FIELD_COUNT);
        match &effects[..] {
            [Effect::Generate { purpose: Purpose::TechQuestion, prompt, system }] => {
                assert!(prompt.contains("Rust, Tokio, PostgreSQL"));
                assert_eq!(system.as_deref(), Some(SYSTEM_CONTEXT));
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn tech_question_is_appended_once() {
        let (state, _) = at_tech_question();
        let t = apply(
            state,
            Event::Generated {
                purpose: Purpose::TechQuestion,
                text: "How would you design a rate limiter?".into(),
            },
        );
        assert_eq!(t.outcome, Outcome::Appended(Purpose::TechQuestion));
        let len = t.state.transcript().len();

        let t = apply(
            t.state,
            Event::Generated {
                purpose: Purpose::TechQuestion,
                text: "A different question".into(),
            },
        );
        assert_eq!(t.outcome, Outcome::Ignored);
        assert_eq!(t.state.transcript().len(), len);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let state = at_first_field();
        let t = apply(
            state,
            Event::Generated {
                purpose: Purpose::Greeting,
                text: "late greeting".into(),
            },
        );
        assert_eq!(t.outcome, Outcome::Ignored);
        assert!(!t.state.transcript().iter().any(|turn| turn.text == "late greeting"));
    }

    #[test]
    fn full_flow_completes_with_contact_details() {
        let (state, _) = at_tech_question();
        let state = step(
            state,
            Event::Generated {
                purpose: Purpose::TechQuestion,
                text: "Explain ownership in a concurrent cache.".into(),
            },
        );
        let state = step(state, Event::submit("skip"));

        assert_eq!(state.step(), COMPLETE_STEP);
        assert!(state.is_completed());
        assert_eq!(state.phase(), Phase::Complete);
        assert_eq!(
            state.last_assistant_message(),
            Some(
                "Thanks for your interest and time. Our team will get back to you on your mail id \
                 jane.doe@gmail.com or phone +919876543210."
            )
        );
        assert_no_repeated_assistant_turns(&state);
    }

    #[test]
    fn completed_conversation_discards_everything() {
        let (state, _) = at_tech_question();
        let state = step(state, Event::submit("my answer"));
        assert!(state.is_completed());

        let transcript_len = state.transcript().len();
        let record = state.record().clone();
        let events = [
            Event::submit("more"),
            Event::submit_with_code("9876543210", "+91"),
            Event::Start,
            Event::Generated {
                purpose: Purpose::TechQuestion,
                text: "q".into(),
            },
        ];
        let mut state = state;
        for event in events {
            let t = apply(state, event);
            assert_eq!(t.outcome, Outcome::Ignored);
            assert!(t.effects.is_empty());
            state = t.state;
            assert_eq!(state.step(), COMPLETE_STEP);
            assert_eq!(state.transcript().len(), transcript_len);
            assert_eq!(state.record(), &record);
        }
    }

    #[test]
    fn step_never_decreases_and_moves_at_most_one() {
        let inputs = [
            ("hello", None),
            ("", None),
            ("J", None),
            ("Jane Doe", None),
            ("bad@", None),
            ("a+b@gmail.com", None),
            ("a+b@yahoo.com", None),
            ("123", Some("+999")),
            ("123", Some("+44")),
            ("7911123456", Some("+44")),
            ("sixty", None),
            ("60", None),
            ("12", None),
            ("SRE", None),
            ("Berlin", None),
            ("x", None),
            ("Go", None),
            ("skip", None),
            ("after the end", None),
        ];

        let mut state = ConversationState::default();
        for (text, code) in inputs {
            let before = state.step();
            let event = match code {
                Some(code) => Event::submit_with_code(text, code),
                None => Event::submit(text),
            };
            state = step(state, event);
            assert!(state.step() >= before);
            assert!(state.step() - before <= 1);
        }
        assert!(state.is_completed());
        assert_eq!(state.record().get(FieldKey::Email), Some("a+b@yahoo.com"));
        assert_eq!(state.record().get(FieldKey::Phone), Some("+447911123456"));
        assert_eq!(state.record().get(FieldKey::TechStack), Some("Go"));
        assert_no_repeated_assistant_turns(&state);
    }

    #[test]
    fn each_record_entry_matches_its_step() {
        let mut state = at_first_field();
        for index in 0..VALID.len() {
            assert_eq!(state.record().len(), index);
            state = submit_valid(state, index).state;
            let key = FIELDS[index].key;
            assert!(state.record().get(key).is_some(), "{key} missing");
        }
    }
}
