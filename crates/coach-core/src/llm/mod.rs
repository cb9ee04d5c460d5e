//! LLM provider abstractions.
//!
//! Concrete backends implement [`provider::LlmProvider`]; the interview
//! client holds whichever one config selected as a
//! [`box_provider::BoxLlmProvider`].

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;
