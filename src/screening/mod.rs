//! Candidate screening — a fixed, step-by-step conversational form.
//!
//! The assistant greets the candidate, collects seven validated fields in
//! order, asks one generated technical question about the declared tech
//! stack, and closes with a confirmation. The state machine in `machine` is
//! pure; `session` runs the generation effects it requests, and `registry`
//! keeps concurrent sessions apart.

pub mod countries;
pub mod fields;
pub mod machine;
pub mod prompts;
pub mod registry;
pub mod routes;
pub mod session;
pub mod state;
pub mod validate;
pub mod view;

pub use countries::{COUNTRIES, Country};
pub use fields::{FIELDS, FieldKey, FieldSpec};
pub use machine::{Effect, Event, Outcome, Purpose, Transition, transition};
pub use registry::{SessionHandle, SessionRegistry};
pub use routes::{ScreeningRouteState, screening_routes};
pub use session::Session;
pub use state::{CandidateRecord, ChatTurn, ConversationState, Phase, Speaker};
pub use validate::validate;
pub use view::{Confirmation, InputControl, SessionView};
