//! Prompt templates for the interviewer persona and the feedback report.

use coach_types::interview::{InterviewConfiguration, InterviewRound};

/// First user turn sent to kick off the interview.
pub const KICKOFF_MESSAGE: &str =
    "Start the interview now. Introduce yourself and ask the first question.";

/// How the interviewer should behave in a given round.
pub fn round_guidance(round: InterviewRound) -> &'static str {
    match round {
        InterviewRound::Screening => "Breadth over depth, quick checks on fundamentals.",
        InterviewRound::Coding => {
            "Ask for approach first, then code structure. If they provide code, review it for edge cases and efficiency."
        }
        InterviewRound::SystemDesign => {
            "Focus on requirements, scale, trade-offs, and component choices."
        }
        InterviewRound::Managerial => {
            "Focus on situational questions (STAR method), conflict resolution, and leadership."
        }
        InterviewRound::Hr => "Focus on culture fit, career goals, and soft skills.",
        InterviewRound::BarRaiser => {
            "Ask challenging questions, test limits, and look for \"Amazon Leadership Principles\" or equivalent high standards."
        }
    }
}

/// Short name of a round as used in the behaviour list ("Screening", "HR").
fn round_heading(round: InterviewRound) -> &'static str {
    match round {
        InterviewRound::Screening => "Screening",
        InterviewRound::Coding => "Coding",
        InterviewRound::SystemDesign => "System Design",
        InterviewRound::Managerial => "Managerial",
        InterviewRound::Hr => "HR",
        InterviewRound::BarRaiser => "Bar Raiser",
    }
}

/// Build the system instruction that sets up the interviewer persona.
pub fn system_instruction(config: &InterviewConfiguration) -> String {
    let mut details = format!(
        "- Role: {}\n- Experience Level: {}\n- Round Type: {}",
        config.role, config.experience_level, config.round
    );
    if let Some(focus) = &config.focus_area {
        details.push_str(&format!("\n- Specific Focus: {focus}"));
    }

    let behaviour = InterviewRound::ALL
        .iter()
        .map(|round| format!("- {}: {}", round_heading(*round), round_guidance(*round)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert technical interviewer conducting a mock interview.
Your persona is professional, observant, and constructive.

Interview Details:
{details}

Guidelines:
1. Start by introducing yourself briefly and asking the first relevant question.
2. Ask ONE question at a time. Do not overwhelm the candidate.
3. Wait for the user's response.
4. After the user responds, provide brief, specific feedback on their answer (correctness, clarity, depth).
5. If the answer is vague, ask a follow-up or clarifying question.
6. If the answer is good, acknowledge it and move to the next distinct topic/question.
7. Maintain the difficulty level appropriate for a {level} {role}.

Specific Round Behavior:
{behaviour}

Output Formatting:
- Use Markdown for code snippets or structured lists.
- Keep your conversational turns concise (under 150 words usually), unless explaining a complex solution.",
        level = config.experience_level,
        role = config.role,
    )
}

/// Build the one-shot prompt asking for a feedback report on a transcript.
pub fn report_prompt(transcript: &str, role: &str) -> String {
    format!(
        "Based on the following interview transcript, generate a structured feedback report.

Transcript:
{transcript}

Please provide:
1. Key Strengths (bullet points)
2. Areas for Improvement (bullet points)
3. Estimated Rating (1-10) with justification
4. A concluding summary regarding readiness for the role of {role}.

Format the output in clear Markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_types::interview::ExperienceLevel;

    fn config(focus: Option<&str>) -> InterviewConfiguration {
        InterviewConfiguration::new(
            "Backend Engineer",
            InterviewRound::Coding,
            ExperienceLevel::Senior,
            focus.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_system_instruction_interpolates_details() {
        let prompt = system_instruction(&config(None));
        assert!(prompt.contains("- Role: Backend Engineer"));
        assert!(prompt.contains("- Experience Level: Senior"));
        assert!(prompt.contains("- Round Type: Coding/DSA Round"));
        assert!(prompt.contains("appropriate for a Senior Backend Engineer."));
        assert!(!prompt.contains("Specific Focus"));
    }

    #[test]
    fn test_system_instruction_includes_focus() {
        let prompt = system_instruction(&config(Some("Concurrency")));
        assert!(prompt.contains("- Specific Focus: Concurrency"));
    }

    #[test]
    fn test_system_instruction_lists_every_round() {
        let prompt = system_instruction(&config(None));
        for round in InterviewRound::ALL {
            assert!(prompt.contains(round_guidance(round)));
        }
        assert!(prompt.contains("- Managerial: Focus on situational questions (STAR method)"));
    }

    #[test]
    fn test_report_prompt_embeds_transcript_and_role() {
        let prompt = report_prompt("USER: hi\nMODEL: hello", "Data Engineer");
        assert!(prompt.contains("Transcript:\nUSER: hi\nMODEL: hello"));
        assert!(prompt.contains("readiness for the role of Data Engineer."));
        assert!(prompt.contains("Estimated Rating (1-10)"));
    }
}
