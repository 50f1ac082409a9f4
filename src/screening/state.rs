//! Conversation state — step cursor, candidate record, and transcript.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{FIELDS, FieldKey};

/// Number of collected fields.
pub const FIELD_COUNT: usize = FIELDS.len();
/// Step at which the generated technical question is pending.
pub const TECH_QUESTION_STEP: usize = FIELD_COUNT + 1;
/// Terminal step.
pub const COMPLETE_STEP: usize = FIELD_COUNT + 2;

/// Phase of the conversation, derived from the step cursor.
///
/// Progresses linearly: Greeting → Collecting(full_name) → … →
/// Collecting(tech_stack) → TechQuestion → Complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "field", rename_all = "snake_case")]
pub enum Phase {
    Greeting,
    Collecting(FieldKey),
    TechQuestion,
    Complete,
}

impl Phase {
    pub fn from_step(step: usize) -> Self {
        match step {
            0 => Self::Greeting,
            s if s <= FIELD_COUNT => Self::Collecting(FIELDS[s - 1].key),
            TECH_QUESTION_STEP => Self::TechQuestion,
            _ => Self::Complete,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greeting => write!(f, "greeting"),
            Self::Collecting(field) => write!(f, "collecting:{field}"),
            Self::TechQuestion => write!(f, "tech_question"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Validated answers keyed by field. Each key is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord(BTreeMap<FieldKey, String>);

impl CandidateRecord {
    /// Store `value` under `key`. Returns `false` (and changes nothing) if
    /// the key is already set.
    pub fn insert_once(&mut self, key: FieldKey, value: impl Into<String>) -> bool {
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// State of one conversation. Owned by a single session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub(super) step: usize,
    pub(super) record: CandidateRecord,
    pub(super) transcript: Vec<ChatTurn>,
    pub(super) completed: bool,
    pub(super) tech_question_asked: bool,
}

impl ConversationState {
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> Phase {
        Phase::from_step(self.step)
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.record
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|t| t.speaker == Speaker::Assistant)
            .map(|t| t.text.as_str())
    }

    /// Append an assistant message unless the last entry is an assistant
    /// turn with the same text. Returns whether it was appended.
    pub(super) fn push_assistant(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if let Some(last) = self.transcript.last() {
            if last.speaker == Speaker::Assistant && last.text == text {
                return false;
            }
        }
        self.transcript.push(ChatTurn::assistant(text));
        true
    }

    pub(super) fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatTurn::user(text));
    }
}
