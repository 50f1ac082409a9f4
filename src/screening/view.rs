//! Serializable snapshot of a session for presentation adapters.

use serde::Serialize;
use uuid::Uuid;

use super::countries::{self, COUNTRIES};
use super::fields::FieldKey;
use super::prompts::SKIP_TOKEN;
use super::state::{ChatTurn, ConversationState, Phase};

/// One entry of the country selector.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CountryOption {
    pub dial_code: &'static str,
    /// e.g. `+91 (India)`
    pub label: String,
}

/// Country selector entries, one per distinct dial code.
pub fn country_options() -> Vec<CountryOption> {
    countries::dial_codes()
        .into_iter()
        .map(|code| {
            let name = COUNTRIES
                .iter()
                .find(|c| c.dial_code == code)
                .map(|c| c.name)
                .unwrap_or_default();
            CountryOption {
                dial_code: code,
                label: format!("{code} ({name})"),
            }
        })
        .collect()
}

/// The control the adapter should render for the next answer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputControl {
    Text {
        label: String,
        placeholder: String,
    },
    Phone {
        label: String,
        placeholder: String,
        countries: Vec<CountryOption>,
        selected: String,
    },
    AnswerOrSkip {
        label: String,
        placeholder: String,
        skip_token: &'static str,
    },
    None,
}

impl InputControl {
    pub fn for_phase(phase: Phase, selected_country: &str) -> Self {
        match phase {
            Phase::Collecting(FieldKey::Phone) => Self::Phone {
                label: "Phone Number (without country code)".to_string(),
                placeholder: "Enter your phone number and press Enter...".to_string(),
                countries: country_options(),
                selected: selected_country.to_string(),
            },
            Phase::Greeting | Phase::Collecting(_) => Self::Text {
                label: "Your response:".to_string(),
                placeholder: "Type your message and press Enter...".to_string(),
            },
            Phase::TechQuestion => Self::AnswerOrSkip {
                label: "Your answer (press Enter to submit, or type 'skip' to skip):".to_string(),
                placeholder: "Type your answer or 'skip'...".to_string(),
                skip_token: SKIP_TOKEN,
            },
            Phase::Complete => Self::None,
        }
    }
}

/// Contact details echoed back once the conversation is complete.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Confirmation {
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl Confirmation {
    pub fn from_state(state: &ConversationState) -> Option<Self> {
        if !state.is_completed() {
            return None;
        }
        let email = state.record().get(FieldKey::Email).unwrap_or_default().to_string();
        let phone = state.record().get(FieldKey::Phone).unwrap_or_default().to_string();
        let message = format!(
            "Screening complete! Thanks for your interest and time. Our team will get back to you \
             soon at {email} or {phone}. You may close this window."
        );
        Some(Self {
            email,
            phone,
            message,
        })
    }
}

/// Everything an adapter needs to render a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: usize,
    pub phase: Phase,
    pub completed: bool,
    pub transcript: Vec<ChatTurn>,
    pub input: InputControl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
}
