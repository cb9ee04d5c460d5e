//! Welcome banner printed when an interview starts.

use console::style;

use coach_types::interview::InterviewConfiguration;

/// Print the interview header: round, role and level, focus, model.
pub fn print_welcome_banner(config: &InterviewConfiguration, model: &str, dictation: bool) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style(config.round).cyan().bold());
    println!("  {}", style(config.subtitle()).dim());
    println!();
    if let Some(focus) = &config.focus_area {
        println!("  {}  {}", style("Focus:").bold(), style(focus).dim());
    }
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!();
    let mut hint = String::from("Type /help for commands, /end for your report");
    if dictation {
        hint.push_str(", /mic to dictate");
    }
    println!("  {}", style(hint).dim());
    println!("  {}", style("---").dim());
    println!();
}
