//! Slash command parsing for the interview loop.
//!
//! Known commands start with `/`; anything else is an answer for the
//! interviewer. `//` sends a literal leading slash.

use console::style;

/// Available slash commands.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Finish the interview and generate the feedback report.
    End,
    /// Record one spoken answer into the draft.
    Dictate,
    /// Show the pending draft.
    Draft,
    /// Clear the terminal screen.
    Clear,
    /// Leave without a report.
    Exit,
    Unknown(String),
}

/// What a submitted line turned out to be.
#[derive(Debug, PartialEq)]
pub enum Submission<'a> {
    Command(ChatCommand),
    /// Text for the interviewer.
    Answer(&'a str),
}

/// Classify a submitted line as a command or an answer.
///
/// Only a known command word (optionally followed by arguments) or a lone
/// `/word` is a command. Answers that merely start with a slash, such as
/// `/api/users returns 404`, are passed through. A leading `//` escapes
/// the slash: one is stripped and the rest is an answer.
pub fn parse(input: &str) -> Submission<'_> {
    let trimmed = input.trim();
    if trimmed.starts_with("//") {
        return Submission::Answer(&trimmed[1..]);
    }
    if !trimmed.starts_with('/') {
        return Submission::Answer(trimmed);
    }

    let mut words = trimmed.split_whitespace();
    let word = words.next().unwrap_or(trimmed);
    if let Some(command) = known_command(&word.to_lowercase()) {
        return Submission::Command(command);
    }

    // A lone "/word" is most likely a mistyped command.
    let lone_word = words.next().is_none()
        && word[1..].chars().all(|c| c.is_ascii_alphabetic())
        && word.len() > 1;
    if lone_word {
        Submission::Command(ChatCommand::Unknown(word.to_lowercase()))
    } else {
        Submission::Answer(trimmed)
    }
}

fn known_command(word: &str) -> Option<ChatCommand> {
    match word {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/end" | "/finish" | "/report" => Some(ChatCommand::End),
        "/dictate" | "/mic" => Some(ChatCommand::Dictate),
        "/draft" => Some(ChatCommand::Draft),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        _ => None,
    }
}

/// Combine a dictated draft with what was just typed.
pub fn compose_answer(draft: &str, typed: &str) -> String {
    match (draft.trim(), typed.trim()) {
        ("", typed) => typed.to_string(),
        (draft, "") => draft.to_string(),
        (draft, typed) => format!("{draft} {typed}"),
    }
}

/// Print the help text listing all available commands.
pub fn print_help(dictation: bool) {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     Show this help message", style("/help").cyan());
    println!("  {}      End the interview and get your feedback report", style("/end").cyan());
    if dictation {
        println!(
            "  {}      Dictate an answer (also /dictate); Enter or Ctrl+C stops",
            style("/mic").cyan()
        );
    } else {
        println!(
            "  {}      {}",
            style("/mic").cyan(),
            style("Dictation (not configured)").dim()
        );
    }
    println!("  {}    Show the dictated draft", style("/draft").cyan());
    println!("  {}    Clear the screen", style("/clear").cyan());
    println!("  {}     Quit without a report", style("/exit").cyan());
    println!();
    println!(
        "  {}",
        style("Press Enter on an empty line to send a dictated draft. Ctrl+D quits.").dim()
    );
    println!(
        "  {}",
        style("Start an answer with // to send a literal leading slash.").dim()
    );
    println!();
}
