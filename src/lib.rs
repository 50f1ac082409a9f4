//! TalentScout — conversational candidate screening.

pub mod channels;
pub mod config;
pub mod error;
pub mod llm;
pub mod screening;
