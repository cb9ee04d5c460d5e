//! Terminal rendering of chat messages.
//!
//! Interviewer replies arrive as formatter blocks: prose lines with bold
//! spans go through `console` styling, code blocks through `syntect`
//! highlighting. Candidate and system messages are printed verbatim.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;

use coach_core::interview::display::{MessageDisplay, display};
use coach_core::markdown::{Block, Line, Span};
use coach_types::chat::{ChatMessage, ChatRole, Report};

const THEME: &str = "base16-ocean.dark";
const INDENT: &str = "  ";

/// Renders messages to ANSI-styled strings.
pub struct ChatRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render one chat message with its speaker label.
    pub fn render_message(&self, message: &ChatMessage) -> String {
        match (message.role, display(message)) {
            (ChatRole::Model, MessageDisplay::Formatted(blocks)) => format!(
                "\n{INDENT}{}\n{}",
                console::style("Interviewer").cyan().bold(),
                self.render_blocks(&blocks)
            ),
            (ChatRole::System, MessageDisplay::Plain(text)) => format!(
                "\n{INDENT}{} {}\n",
                console::style("!").red().bold(),
                console::style(text).yellow()
            ),
            (_, MessageDisplay::Plain(text)) => indent_verbatim(text),
            (_, MessageDisplay::Formatted(blocks)) => self.render_blocks(&blocks),
        }
    }

    /// Render the final feedback report.
    pub fn render_report(&self, report: &Report) -> String {
        let mut output = format!(
            "\n{INDENT}{}\n",
            console::style("Interview Feedback").magenta().bold()
        );
        output.push_str(&self.render_blocks(&coach_core::markdown::format_markdown(&report.text)));
        if let Some(rating) = report.estimated_rating() {
            output.push_str(&format!(
                "\n{INDENT}{} {}\n",
                console::style("Estimated rating:").bold(),
                console::style(format!("{rating}/10")).green().bold()
            ));
        }
        output
    }

    /// Render formatter blocks.
    pub fn render_blocks(&self, blocks: &[Block]) -> String {
        let mut output = String::new();
        for block in blocks {
            match block {
                Block::Code { language, code } => {
                    output.push_str(&self.highlight_code(code, language.as_deref()));
                }
                Block::Text(lines) => {
                    for line in lines {
                        output.push_str(&render_line(line));
                        output.push('\n');
                    }
                }
            }
        }
        output
    }

    fn highlight_code(&self, code: &str, language: Option<&str>) -> String {
        let syntax = language
            .and_then(|lang| self.syntax_set.find_syntax_by_token(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut output = format!(
            "{INDENT}{}\n",
            console::style(format!("--- {} ---", language.unwrap_or("code"))).dim()
        );

        let Some(theme) = self.theme_set.themes.get(THEME) else {
            for line in code.lines() {
                output.push_str(&format!("{INDENT}{line}\n"));
            }
            return output;
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("{INDENT}{escaped}\x1b[0m\n"));
        }
        output
    }
}

fn render_line(line: &Line) -> String {
    match line {
        Line::Blank => String::new(),
        Line::Paragraph(spans) => {
            let mut rendered = String::from(INDENT);
            for span in spans {
                match span {
                    Span::Plain(text) => rendered.push_str(text),
                    Span::Bold(text) => {
                        rendered.push_str(&console::style(text).bold().to_string());
                    }
                }
            }
            rendered
        }
    }
}

fn indent_verbatim(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Last line of a partial reply, shortened for the spinner preview.
pub fn preview(text: &str, max_chars: usize) -> String {
    let last = text
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();
    let count = last.chars().count();
    if count <= max_chars {
        return last.to_string();
    }
    let tail: String = last.chars().skip(count - max_chars.saturating_sub(3)).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    #[test]
    fn test_bold_markers_are_removed() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_message(&ChatMessage::model("Explain **closures** please")));
        assert!(out.contains("Interviewer"));
        assert!(out.contains("Explain closures please"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn test_code_block_is_rendered_without_fences() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_message(&ChatMessage::model(
            "Look at this:\n```rust\nfn main() {}\n```\nThoughts?",
        )));
        assert!(out.contains("--- rust ---"));
        assert!(out.contains("fn main() {}"));
        assert!(!out.contains("```"));
        assert!(out.contains("Thoughts?"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_blocks(&[Block::Code {
            language: Some("nosuchlang".to_string()),
            code: "x := 1\n".to_string(),
        }]));
        assert!(out.contains("x := 1"));
    }

    #[test]
    fn test_user_text_is_verbatim() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_message(&ChatMessage::user("**not bold**\n  keep")));
        assert_eq!(out, "  **not bold**\n    keep");
    }

    #[test]
    fn test_system_notice_is_marked() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_message(&ChatMessage::system("Something failed.")));
        assert!(out.contains("! Something failed."));
    }

    #[test]
    fn test_report_shows_rating() {
        let renderer = ChatRenderer::new();
        let out = plain(&renderer.render_report(&Report::new("## Summary\nGood.\n**8/10**")));
        assert!(out.contains("Interview Feedback"));
        assert!(out.contains("Estimated rating: 8/10"));
    }

    #[test]
    fn test_preview_takes_last_nonblank_line() {
        assert_eq!(preview("first\nsecond\n\n", 40), "second");
        assert_eq!(preview("", 40), "");
        assert_eq!(preview("abcdefghij", 8), "...fghij");
    }
}
