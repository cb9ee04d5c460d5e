//! Lightweight markdown formatter for interviewer replies.
//!
//! Recognizes only what the interviewer is asked to produce: fenced code
//! blocks, blank-line spacing, and `**bold**` spans. Everything else is
//! plain text. The formatter is pure and total, so the chat view can call
//! it on every streamed update of a partially received message; an
//! unterminated fence or bold marker is shown literally until its closing
//! half arrives.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fence regex"));

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(\w*)\n?").expect("valid opening fence regex"));

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));

/// A top-level piece of formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Verbatim code from a fenced region.
    Code {
        language: Option<String>,
        code: String,
    },
    /// Prose, one entry per input line.
    Text(Vec<Line>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A whitespace-only line, rendered as vertical spacing.
    Blank,
    Paragraph(Vec<Span>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Bold(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Bold(text) => text,
        }
    }
}

impl Line {
    pub fn plain_text(&self) -> String {
        match self {
            Line::Blank => String::new(),
            Line::Paragraph(spans) => spans.iter().map(Span::text).collect(),
        }
    }
}

impl Block {
    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code { .. })
    }

    /// Text content with all markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Code { code, .. } => code.clone(),
            Block::Text(lines) => lines
                .iter()
                .map(Line::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Format raw reply text into displayable blocks.
///
/// Fenced regions become [`Block::Code`]; the text between them is split
/// into lines with bold spans extracted.
pub fn format_markdown(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for fence in FENCED_BLOCK.find_iter(text) {
        push_text(&mut blocks, &text[cursor..fence.start()]);
        blocks.push(code_block(fence.as_str()));
        cursor = fence.end();
    }
    push_text(&mut blocks, &text[cursor..]);

    blocks
}

fn push_text(blocks: &mut Vec<Block>, segment: &str) {
    if segment.is_empty() {
        return;
    }
    let lines = segment
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                Line::Blank
            } else {
                Line::Paragraph(spans(line))
            }
        })
        .collect();
    blocks.push(Block::Text(lines));
}

fn code_block(fenced: &str) -> Block {
    let (language, body_start) = match OPENING_FENCE.captures(fenced) {
        Some(caps) => {
            let tag = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let end = caps.get(0).map_or(3, |m| m.end());
            ((!tag.is_empty()).then(|| tag.to_string()), end)
        }
        None => (None, 3),
    };
    let body = &fenced[body_start..];
    let code = body.strip_suffix("```").unwrap_or(body);

    Block::Code {
        language,
        code: code.to_string(),
    }
}

fn spans(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in BOLD_SPAN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span::Plain(line[cursor..whole.start()].to_string()));
        }
        spans.push(Span::Bold(inner.as_str().to_string()));
        cursor = whole.end();
    }
    if cursor < line.len() {
        spans.push(Span::Plain(line[cursor..].to_string()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_count(blocks: &[Block]) -> usize {
        blocks.iter().filter(|b| b.is_code()).count()
    }

    fn plain(blocks: &[Block]) -> String {
        blocks.iter().map(Block::plain_text).collect::<Vec<_>>().join("")
    }

    #[test]
    fn test_plain_sentence() {
        let blocks = format_markdown("Tell me about yourself.");
        assert_eq!(
            blocks,
            vec![Block::Text(vec![Line::Paragraph(vec![Span::Plain(
                "Tell me about yourself.".to_string()
            )])])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(format_markdown("").is_empty());
    }

    #[test]
    fn test_code_block_with_language() {
        let blocks = format_markdown("Consider:\n```rust\nfn main() {}\n```\nThoughts?");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1],
            Block::Code {
                language: Some("rust".to_string()),
                code: "fn main() {}\n".to_string(),
            }
        );
        assert_eq!(blocks[2].plain_text(), "\nThoughts?");
    }

    #[test]
    fn test_code_block_without_language() {
        let blocks = format_markdown("```\nSELECT 1;```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: None,
                code: "SELECT 1;".to_string(),
            }]
        );
    }

    #[test]
    fn test_code_content_is_verbatim() {
        let blocks = format_markdown("```py\n  x = '**not bold**'\n\n  y = 2\n```");
        assert_eq!(blocks[0].plain_text(), "  x = '**not bold**'\n\n  y = 2\n");
    }

    #[test]
    fn test_code_block_count_matches_complete_pairs() {
        let text = "a\n```js\n1\n```\nb\n```\n2\n```\nc";
        assert_eq!(code_count(&format_markdown(text)), 2);
    }

    #[test]
    fn test_unterminated_fence_is_literal() {
        let text = "Here:\n```python\ndef f(";
        let blocks = format_markdown(text);
        assert_eq!(code_count(&blocks), 0);
        assert_eq!(plain(&blocks), text);
    }

    #[test]
    fn test_odd_fence_count_leaves_trailing_fence_literal() {
        let blocks = format_markdown("```a``` then ```");
        assert_eq!(code_count(&blocks), 1);
        assert_eq!(blocks[1].plain_text(), " then ```");
    }

    #[test]
    fn test_bold_span() {
        let blocks = format_markdown("**Correct** answer");
        assert_eq!(
            blocks,
            vec![Block::Text(vec![Line::Paragraph(vec![
                Span::Bold("Correct".to_string()),
                Span::Plain(" answer".to_string()),
            ])])]
        );
    }

    #[test]
    fn test_bold_markup_strips_to_inner_text() {
        let blocks = format_markdown("a **b** c **d**");
        assert_eq!(plain(&blocks), "a b c d");
    }

    #[test]
    fn test_empty_bold_span_is_consumed() {
        let blocks = format_markdown("before **** after");
        assert_eq!(
            blocks,
            vec![Block::Text(vec![Line::Paragraph(vec![
                Span::Plain("before ".to_string()),
                Span::Bold(String::new()),
                Span::Plain(" after".to_string()),
            ])])]
        );
        assert_eq!(plain(&blocks), "before  after");
    }

    #[test]
    fn test_unterminated_bold_is_literal() {
        let blocks = format_markdown("so **partial");
        assert_eq!(
            blocks,
            vec![Block::Text(vec![Line::Paragraph(vec![Span::Plain(
                "so **partial".to_string()
            )])])]
        );
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        let blocks = format_markdown("**start\nend**");
        let Block::Text(lines) = &blocks[0] else {
            panic!("expected text block");
        };
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| match line {
            Line::Paragraph(spans) => spans.iter().all(|s| matches!(s, Span::Plain(_))),
            Line::Blank => false,
        }));
    }

    #[test]
    fn test_blank_lines_become_spacing() {
        let blocks = format_markdown("First\n\n   \nSecond");
        let Block::Text(lines) = &blocks[0] else {
            panic!("expected text block");
        };
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], Line::Blank);
        assert_eq!(lines[2], Line::Blank);
    }

    #[test]
    fn test_formatting_is_idempotent_on_plain_output() {
        let once = format_markdown("Line one\n\nLine **two**");
        let twice = format_markdown(&plain(&once));
        assert_eq!(plain(&once), plain(&twice));
        assert_eq!(
            twice,
            vec![Block::Text(vec![
                Line::Paragraph(vec![Span::Plain("Line one".to_string())]),
                Line::Blank,
                Line::Paragraph(vec![Span::Plain("Line two".to_string())]),
            ])]
        );
    }

    #[test]
    fn test_growing_prefix_never_panics() {
        let full = "Try this:\n```ts\nconst x = **y**;\n```\n**Why** does it work?";
        let mut end = 0;
        while end <= full.len() {
            let _ = format_markdown(&full[..end]);
            end += 1;
        }
    }
}
