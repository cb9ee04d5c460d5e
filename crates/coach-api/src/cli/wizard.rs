//! Interview setup: flags first, dialoguer prompts for whatever is missing.

use dialoguer::{Input, Select};

use coach_types::error::ConfigurationError;
use coach_types::interview::{
    DEFAULT_ROLE, ExperienceLevel, InterviewConfiguration, InterviewRound,
};

use super::StartArgs;

pub fn parse_round(value: &str) -> Result<InterviewRound, ConfigurationError> {
    value
        .parse()
        .map_err(|_| ConfigurationError::InvalidRound(value.trim().to_string()))
}

pub fn parse_level(value: &str) -> Result<ExperienceLevel, ConfigurationError> {
    value
        .parse()
        .map_err(|_| ConfigurationError::InvalidLevel(value.trim().to_string()))
}

/// Build a configuration from flags alone. `Ok(None)` when something
/// required is missing; invalid values are rejected even then.
pub fn configuration_from_flags(
    args: &StartArgs,
) -> Result<Option<InterviewConfiguration>, ConfigurationError> {
    let round = args.round.as_deref().map(parse_round).transpose()?;
    let level = args.level.as_deref().map(parse_level).transpose()?;

    match (&args.role, round, level) {
        (Some(role), Some(round), Some(level)) => {
            InterviewConfiguration::new(role.as_str(), round, level, args.focus.clone()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Resolve the interview configuration, prompting for missing settings.
pub fn resolve_configuration(args: &StartArgs) -> anyhow::Result<InterviewConfiguration> {
    if let Some(config) = configuration_from_flags(args)? {
        return Ok(config);
    }

    println!();
    println!(
        "  {} Set up your mock interview",
        console::style("*").cyan().bold()
    );
    println!();

    let role: String = match &args.role {
        Some(role) => role.clone(),
        None => Input::new()
            .with_prompt("Target role")
            .default(DEFAULT_ROLE.to_string())
            .interact_text()?,
    };

    let level = match args.level.as_deref() {
        Some(level) => parse_level(level)?,
        None => {
            let labels: Vec<String> = ExperienceLevel::ALL
                .iter()
                .map(ExperienceLevel::picker_label)
                .collect();
            let default = ExperienceLevel::ALL
                .iter()
                .position(|l| *l == ExperienceLevel::default())
                .unwrap_or(0);
            let selection = Select::new()
                .with_prompt("Experience level")
                .items(&labels)
                .default(default)
                .interact()?;
            ExperienceLevel::ALL[selection]
        }
    };

    let round = match args.round.as_deref() {
        Some(round) => parse_round(round)?,
        None => {
            let labels: Vec<String> = InterviewRound::ALL.iter().map(|r| r.to_string()).collect();
            let selection = Select::new()
                .with_prompt("Interview round")
                .items(&labels)
                .default(0)
                .interact()?;
            InterviewRound::ALL[selection]
        }
    };

    let focus = match &args.focus {
        Some(focus) => Some(focus.clone()),
        None => Some(
            Input::<String>::new()
                .with_prompt("Focus area (optional, Enter to skip)")
                .allow_empty(true)
                .interact_text()?,
        ),
    };

    Ok(InterviewConfiguration::new(role, round, level, focus)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(role: Option<&str>, round: Option<&str>, level: Option<&str>) -> StartArgs {
        StartArgs {
            role: role.map(String::from),
            round: round.map(String::from),
            level: level.map(String::from),
            ..StartArgs::default()
        }
    }

    #[test]
    fn test_complete_flags_build_configuration() {
        let mut start = args(Some(" Backend Engineer "), Some("coding"), Some("senior"));
        start.focus = Some("  ".to_string());
        let config = configuration_from_flags(&start).unwrap().unwrap();
        assert_eq!(config.role, "Backend Engineer");
        assert_eq!(config.round, InterviewRound::Coding);
        assert_eq!(config.experience_level, ExperienceLevel::Senior);
        assert!(config.focus_area.is_none());
    }

    #[test]
    fn test_missing_flags_need_the_wizard() {
        let config = configuration_from_flags(&args(Some("SRE"), None, Some("junior"))).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_invalid_round_is_rejected_before_prompting() {
        let err = configuration_from_flags(&args(None, Some("lunch"), None)).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidRound(r) if r == "lunch"));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = parse_level("wizard").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidLevel(_)));
    }

    #[test]
    fn test_blank_role_flag_is_rejected() {
        let err =
            configuration_from_flags(&args(Some("   "), Some("hr"), Some("intern"))).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyRole));
    }

    #[test]
    fn test_round_display_names_parse_back() {
        for round in InterviewRound::ALL {
            assert_eq!(parse_round(&round.to_string()).unwrap(), round);
        }
    }
}
