//! Infrastructure layer for the interview coach.
//!
//! Contains implementations of the ports defined in `coach-core`: hosted
//! model providers (Gemini, OpenAI-compatible), the command-backed
//! dictation backend, and config file loading.

pub mod config;
pub mod dictation;
pub mod llm;
