//! Session — drives one conversation through the state machine and runs the
//! generation effects it asks for.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::llm::TextGenerator;

use super::countries;
use super::machine::{Effect, Event, Outcome, transition};
use super::state::ConversationState;
use super::view::{Confirmation, InputControl, SessionView};

/// One candidate's conversation.
pub struct Session {
    id: Uuid,
    state: ConversationState,
    /// Dial prefix currently selected for the phone step.
    country_code: String,
    generator: Arc<TextGenerator>,
}

impl Session {
    pub fn new(generator: Arc<TextGenerator>, default_country_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ConversationState::default(),
            country_code: default_country_code.into(),
            generator,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Change the selected dial prefix. Unknown codes are refused.
    pub fn select_country(&mut self, dial_code: &str) -> Result<(), ValidationError> {
        let country = countries::lookup(dial_code)
            .ok_or_else(|| ValidationError::LookupFailed("Invalid country code".to_string()))?;
        self.country_code = country.dial_code.to_string();
        Ok(())
    }

    /// Open the conversation: generates the greeting if nothing has been
    /// said yet.
    pub async fn start(&mut self) -> Outcome {
        self.dispatch(Event::Start).await
    }

    /// Submit one answer. A `country_code` also updates the selection, the
    /// way picking from the selector would.
    pub async fn submit(&mut self, text: &str, country_code: Option<&str>) -> Outcome {
        if let Some(code) = country_code {
            if let Err(e) = self.select_country(code) {
                // Let the machine report it as a validation failure.
                debug!(session_id = %self.id, code, error = %e, "Unknown country code submitted");
                return self
                    .dispatch(Event::Submit {
                        text: text.to_string(),
                        country_code: Some(code.to_string()),
                    })
                    .await;
            }
        }

        self.dispatch(Event::Submit {
            text: text.to_string(),
            country_code: Some(self.country_code.clone()),
        })
        .await
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            step: self.state.step(),
            phase: self.state.phase(),
            completed: self.state.is_completed(),
            transcript: self.state.transcript().to_vec(),
            input: InputControl::for_phase(self.state.phase(), &self.country_code),
            confirmation: Confirmation::from_state(&self.state),
        }
    }

    /// Feed `event` through the machine, running effects until none are
    /// left. Returns the outcome of the first event.
    async fn dispatch(&mut self, event: Event) -> Outcome {
        let mut pending = VecDeque::from([event]);
        let mut first = None;

        while let Some(event) = pending.pop_front() {
            let t = transition(std::mem::take(&mut self.state), event);
            self.state = t.state;
            self.log_outcome(&t.outcome);

            for effect in t.effects {
                match effect {
                    Effect::Generate {
                        purpose,
                        prompt,
                        system,
                    } => {
                        let generation = self.generator.generate(&prompt, system.as_deref()).await;
                        if let crate::llm::Generation::Fallback { reason, .. } = &generation {
                            warn!(session_id = %self.id, ?purpose, reason, "Using fallback text");
                        }
                        pending.push_back(Event::Generated {
                            purpose,
                            text: generation.into_text(),
                        });
                    }
                }
            }

            first.get_or_insert(t.outcome);
        }

        first.unwrap_or(Outcome::Ignored)
    }

    fn log_outcome(&self, outcome: &Outcome) {
        let step = self.state.step();
        match outcome {
            Outcome::Ignored => debug!(session_id = %self.id, step, "Event ignored"),
            Outcome::Started => info!(session_id = %self.id, "Conversation started"),
            Outcome::Appended(purpose) => {
                debug!(session_id = %self.id, step, ?purpose, "Generated message appended")
            }
            Outcome::Advanced { from, to } => {
                info!(session_id = %self.id, step, %from, %to, "Answer accepted");
                if to.is_terminal() {
                    info!(session_id = %self.id, "Screening complete");
                }
            }
            Outcome::Rejected { field, error } => info!(
                session_id = %self.id,
                step,
                %field,
                kind = error.kind(),
                "Answer rejected"
            ),
        }
    }
}
