//! Interview persona types.
//!
//! An `InterviewConfiguration` fixes who the interviewer is talking to and
//! what kind of round is being run. It is built once by the setup wizard (or
//! CLI flags) and handed to the session client by value.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Role used when the user does not pick one.
pub const DEFAULT_ROLE: &str = "Frontend Engineer";

/// Kind of interview round being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewRound {
    #[default]
    Screening,
    Coding,
    SystemDesign,
    Managerial,
    Hr,
    BarRaiser,
}

impl InterviewRound {
    /// All rounds in the order they are offered to the user.
    pub const ALL: [InterviewRound; 6] = [
        InterviewRound::Screening,
        InterviewRound::Coding,
        InterviewRound::SystemDesign,
        InterviewRound::Managerial,
        InterviewRound::Hr,
        InterviewRound::BarRaiser,
    ];

    /// Short machine name, accepted back by `FromStr`.
    pub fn slug(&self) -> &'static str {
        match self {
            InterviewRound::Screening => "screening",
            InterviewRound::Coding => "coding",
            InterviewRound::SystemDesign => "system-design",
            InterviewRound::Managerial => "managerial",
            InterviewRound::Hr => "hr",
            InterviewRound::BarRaiser => "bar-raiser",
        }
    }
}

impl fmt::Display for InterviewRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterviewRound::Screening => write!(f, "Screening Round"),
            InterviewRound::Coding => write!(f, "Coding/DSA Round"),
            InterviewRound::SystemDesign => write!(f, "System Design Round"),
            InterviewRound::Managerial => write!(f, "Managerial Round"),
            InterviewRound::Hr => write!(f, "HR Round"),
            InterviewRound::BarRaiser => write!(f, "Bar Raiser Round"),
        }
    }
}

impl FromStr for InterviewRound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_lowercase()
            .trim_end_matches(" round")
            .replace(['_', ' '], "-");
        match normalized.as_str() {
            "screening" => Ok(InterviewRound::Screening),
            "coding" | "coding/dsa" | "dsa" => Ok(InterviewRound::Coding),
            "system-design" | "systemdesign" => Ok(InterviewRound::SystemDesign),
            "managerial" => Ok(InterviewRound::Managerial),
            "hr" => Ok(InterviewRound::Hr),
            "bar-raiser" | "barraiser" => Ok(InterviewRound::BarRaiser),
            other => Err(format!("invalid interview round: '{other}'")),
        }
    }
}

/// Seniority of the candidate being interviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Intern,
    Junior,
    #[default]
    MidLevel,
    Senior,
    StaffPrincipal,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Intern,
        ExperienceLevel::Junior,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
        ExperienceLevel::StaffPrincipal,
    ];

    /// Label shown in the setup wizard, with the years-of-experience hint.
    pub fn picker_label(&self) -> String {
        match self.years_hint() {
            Some(hint) => format!("{self} ({hint})"),
            None => self.to_string(),
        }
    }

    fn years_hint(&self) -> Option<&'static str> {
        match self {
            ExperienceLevel::Junior => Some("0-2 yrs"),
            ExperienceLevel::MidLevel => Some("3-5 yrs"),
            ExperienceLevel::Senior => Some("5+ yrs"),
            ExperienceLevel::Intern | ExperienceLevel::StaffPrincipal => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Intern => write!(f, "Intern"),
            ExperienceLevel::Junior => write!(f, "Junior"),
            ExperienceLevel::MidLevel => write!(f, "Mid-Level"),
            ExperienceLevel::Senior => write!(f, "Senior"),
            ExperienceLevel::StaffPrincipal => write!(f, "Staff/Principal"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "intern" => Ok(ExperienceLevel::Intern),
            "junior" => Ok(ExperienceLevel::Junior),
            "mid" | "mid-level" | "midlevel" => Ok(ExperienceLevel::MidLevel),
            "senior" => Ok(ExperienceLevel::Senior),
            "staff" | "principal" | "staff/principal" | "staff-principal" => {
                Ok(ExperienceLevel::StaffPrincipal)
            }
            other => Err(format!("invalid experience level: '{other}'")),
        }
    }
}

/// The persona an interview session is run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfiguration {
    pub role: String,
    pub round: InterviewRound,
    pub experience_level: ExperienceLevel,
    /// Optional topic to steer questions toward (e.g. "React performance").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

impl InterviewConfiguration {
    /// Build a configuration, trimming inputs. A blank focus area becomes
    /// `None`; a blank role is rejected.
    pub fn new(
        role: impl Into<String>,
        round: InterviewRound,
        experience_level: ExperienceLevel,
        focus_area: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let role = role.into().trim().to_string();
        if role.is_empty() {
            return Err(ConfigurationError::EmptyRole);
        }
        let focus_area = focus_area
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(Self {
            role,
            round,
            experience_level,
            focus_area,
        })
    }

    /// One-line subtitle used in chat headers: "role • level".
    pub fn subtitle(&self) -> String {
        format!("{} \u{2022} {}", self.role, self.experience_level)
    }
}

impl Default for InterviewConfiguration {
    fn default() -> Self {
        Self {
            role: DEFAULT_ROLE.to_string(),
            round: InterviewRound::default(),
            experience_level: ExperienceLevel::default(),
            focus_area: None,
        }
    }
}
