//! Shared domain types for the interview coach.
//!
//! This crate contains the types used across the workspace: the interview
//! configuration, chat messages and reports, LLM wire types, the config file
//! model, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod interview;
pub mod llm;
