//! How each chat message is presented.
//!
//! Candidate input and local notices are shown verbatim, whitespace and all.
//! Interviewer replies go through the markdown formatter.

use coach_types::chat::{ChatMessage, ChatRole};

use crate::markdown::{Block, format_markdown};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDisplay<'a> {
    Plain(&'a str),
    Formatted(Vec<Block>),
}

pub fn display(message: &ChatMessage) -> MessageDisplay<'_> {
    match message.role {
        ChatRole::Model => MessageDisplay::Formatted(format_markdown(&message.text)),
        ChatRole::User | ChatRole::System => MessageDisplay::Plain(&message.text),
    }
}
