//! Business logic and port definitions for the interview coach.
//!
//! This crate defines the "ports" (provider and dictation traits) that the
//! infrastructure layer implements, along with the interview session client,
//! the chat controller state machine, and the markdown formatter. It depends
//! only on `coach-types` -- never on `coach-infra` or any network crate.

pub mod dictation;
pub mod interview;
pub mod llm;
pub mod markdown;
