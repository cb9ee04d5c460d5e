//! Chat message, session status, and report types.
//!
//! These types model the visible conversation between the candidate and the
//! interviewer. They are distinct from the LLM wire types in [`crate::llm`]:
//! a chat message carries identity and a timestamp, and includes local
//! system notices that are never sent to the model.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*10\b").expect("valid rating regex")
});

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
    /// Local notices (errors, status). Never sent to the model.
    System,
}

impl ChatRole {
    /// Upper-case label used when flattening a conversation into a transcript.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            ChatRole::User => "USER",
            ChatRole::Model => "MODEL",
            ChatRole::System => "SYSTEM",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Model => write!(f, "model"),
            ChatRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            "model" => Ok(ChatRole::Model),
            "system" => Ok(ChatRole::System),
            other => Err(format!("invalid chat role: '{other}'")),
        }
    }
}

/// A single entry in the visible conversation.
///
/// Text is only ever mutated for the in-flight model message while its
/// reply is streaming in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(ChatRole::System, text)
    }
}

/// Flatten messages into the transcript format sent to the report request:
/// one `ROLE: text` entry per message, joined by newlines.
pub fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.transcript_label(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lifecycle status of an interview session.
///
/// `Active -> Completed` happens only through the end-interview action and
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Markdown feedback report generated at the end of an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub text: String,
}

impl Report {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// First `N/10` rating found in the report, if any (1 to 10).
    /// Decimal ratings such as `7.5/10` are rounded to the nearest whole
    /// number.
    pub fn estimated_rating(&self) -> Option<u8> {
        RATING_RE.captures_iter(&self.text).find_map(|caps| {
            let value = caps[1].parse::<f64>().ok()?;
            (1.0..=10.0)
                .contains(&value)
                .then(|| value.round() as u8)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Model, ChatRole::System] {
            let s = role.to_string();
            let parsed: ChatRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_chat_role_serde() {
        let json = serde_json::to_string(&ChatRole::Model).unwrap();
        assert_eq!(json, "\"model\"");
    }

    #[test]
    fn test_session_status_roundtrip() {
        for status in [SessionStatus::Active, SessionStatus::Completed] {
            let parsed: SessionStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_transcript_format() {
        let messages = vec![
            ChatMessage::model("Hello, tell me about yourself."),
            ChatMessage::user("I build web apps."),
            ChatMessage::system("An error occurred while getting the response."),
        ];
        assert_eq!(
            transcript(&messages),
            "MODEL: Hello, tell me about yourself.\nUSER: I build web apps.\nSYSTEM: An error occurred while getting the response."
        );
    }

    #[test]
    fn test_transcript_empty() {
        assert_eq!(transcript(&[]), "");
    }

    #[test]
    fn test_report_rating_found() {
        let report = Report::new("## Estimated Rating\n**7/10** - solid fundamentals");
        assert_eq!(report.estimated_rating(), Some(7));
    }

    #[test]
    fn test_report_rating_ten() {
        let report = Report::new("Rating: 10/10");
        assert_eq!(report.estimated_rating(), Some(10));
    }

    #[test]
    fn test_report_rating_skips_out_of_range() {
        let report = Report::new("Scored 85/100 on the quiz, overall 6/10.");
        assert_eq!(report.estimated_rating(), Some(6));
    }

    #[test]
    fn test_report_rating_decimal_is_rounded() {
        let report = Report::new("**7.5/10** overall, communication 9 / 10");
        assert_eq!(report.estimated_rating(), Some(8));
        assert_eq!(Report::new("Rating: 6.2 / 10").estimated_rating(), Some(6));
        assert_eq!(Report::new("0.5/10, then 4/10").estimated_rating(), Some(4));
    }

    #[test]
    fn test_report_rating_missing() {
        assert_eq!(Report::new("No score here.").estimated_rating(), None);
        assert_eq!(Report::new("0/10").estimated_rating(), None);
    }
}
