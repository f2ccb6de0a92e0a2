//! # Message Formatting
//!
//! Turns raw message text into the HTML fragment the chat view renders.
//!
//! The transform is an ordered pipeline. The span-level passes (emoji,
//! fenced code, emphasis) run over the whole string; everything after the
//! line split runs over a `Vec<Line>`, one stage at a time:
//!
//! ```text
//! text ─► strip emoji ─► extract ``` ─► **bold** / *italic* ─► split lines
//!                                                                 │
//!          ┌──────────────────────────────────────────────────────┘
//!          ▼   (bot only)
//!     dot runs ─► header ─► sections ─► callouts ─► list headers ─► bullets
//!                                                                 │
//!          ┌──────────────────────────────────────────────────────┘
//!          ▼
//!     render lines ─► restore code blocks ─► strip stray markers ─► join <br/>
//! ```
//!
//! HTML already present in the input is passed through untouched. Backend
//! replies are trusted content; user text only gets the emphasis, code and
//! line-break passes.
//!
//! Formatting already-formatted output is not supported: the pipeline is
//! not idempotent.

use std::borrow::Cow;
use std::sync::LazyLock;

use log::warn;
use regex::{Captures, Regex};

/// Line separator in the rendered output.
pub const LINE_BREAK: &str = "<br/>";
/// Glyph used for bullets and list headers.
pub const BULLET: char = '•';

/// Every styled span emitted for bot messages starts with this.
const BOT_SPAN_PREFIX: &str = "<span class='bot-";

static EMOJI: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // ASCII digits, '#' and '*' carry the Emoji property too; keep them.
    Regex::new(r"[\p{Emoji_Presentation}\p{Emoji}\p{Emoji_Component}&&[^\x00-\x7F]]")
        .or_else(|e| {
            warn!("Unicode emoji properties unavailable ({e}), using fixed ranges");
            Regex::new(r"[\x{1F300}-\x{1F6FF}\x{1F900}-\x{1F9FF}]")
        })
        .ok()
});

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^\r\n]*?)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^\r\n]*?)\*").expect("italic pattern is valid"));
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{CODEBLOCK_(\d+)\}\}").expect("placeholder pattern is valid")
});
static PLAIN_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));
static BOT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n|<br/?>").expect("line break pattern is valid"));

/// One logical line of a message after the line split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Inline HTML, rendered as-is.
    Text(String),
    /// First line of a bot message.
    Header(String),
    /// `## Title` / `. Title` lines.
    Section(String),
    /// `Note:`, `Catatan:` and `>` lines.
    Callout(String),
    /// `- Label: tail` lines. `label` keeps its colon.
    ListHeader { label: String, tail: String },
    /// `- item` lines.
    Bullet(String),
}

impl Line {
    fn to_html(&self) -> String {
        match self {
            Line::Text(text) => text.clone(),
            Line::Header(text) => format!("<span class='bot-header'>{text}</span>"),
            Line::Section(text) => format!("<span class='bot-section-header'>{text}</span>"),
            Line::Callout(text) => format!("<div class='bot-callout'>{text}</div>"),
            Line::ListHeader { label, tail } => {
                format!("<span class='bot-list-header'>{BULLET} {label}</span>{tail}")
            }
            Line::Bullet(text) => format!("{BULLET} {text}"),
        }
    }
}

/// A line-level pass over a bot message.
pub type Stage = fn(&mut Vec<Line>);

/// Bot-only line stages, in application order.
pub const BOT_STAGES: [Stage; 6] = [
    strip_dot_runs,
    promote_header,
    section_headers,
    callouts,
    list_headers,
    bullets,
];

/// A message split into lines, with fenced code held aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Line>,
    pub code_blocks: Vec<String>,
    pub is_bot: bool,
}

impl Document {
    /// Run the string passes and the line split, but no line stages.
    pub fn split(text: &str, is_bot: bool) -> Self {
        let text: Cow<'_, str> = if is_bot { strip_emoji(text) } else { Cow::Borrowed(text) };
        let (text, code_blocks) = extract_code_blocks(&text);
        let text = emphasize(&text);
        let breaks = if is_bot { &*BOT_BREAK } else { &*PLAIN_BREAK };
        let lines = breaks
            .split(&text)
            .map(|line| Line::Text(line.to_string()))
            .collect();

        Self {
            lines,
            code_blocks,
            is_bot,
        }
    }

    /// Split and, for bot messages, run every line stage.
    pub fn parse(text: &str, is_bot: bool) -> Self {
        let mut doc = Self::split(text, is_bot);
        if is_bot {
            for stage in BOT_STAGES {
                stage(&mut doc.lines);
            }
        }
        doc
    }

    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                let html = restore_code_blocks(&line.to_html(), &self.code_blocks);
                if self.is_bot {
                    strip_stray_marker(&html).to_string()
                } else {
                    html
                }
            })
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    }
}

/// Format raw message text as HTML. `is_bot` enables the bot-only stages.
pub fn format(text: &str, is_bot: bool) -> String {
    Document::parse(text, is_bot).to_html()
}

// ── String passes ──────────────────────────────────────────────────────────

pub fn strip_emoji(text: &str) -> Cow<'_, str> {
    match EMOJI.as_ref() {
        Some(re) => re.replace_all(text, ""),
        None => Cow::Borrowed(text),
    }
}

/// Swap each fenced block for a positional placeholder. Returns the new
/// text and the trimmed code, indexed by placeholder number.
pub fn extract_code_blocks(text: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let replaced = FENCE.replace_all(text, |caps: &Captures<'_>| {
        blocks.push(caps[1].trim().to_string());
        format!("{{{{CODEBLOCK_{}}}}}", blocks.len() - 1)
    });
    (replaced.into_owned(), blocks)
}

/// `**X**` then `*X*`. Bold goes first so `**` is never read as two italics.
pub fn emphasize(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}

fn restore_code_blocks(html: &str, blocks: &[String]) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &Captures<'_>| {
            let code = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| blocks.get(idx))
                .map(String::as_str)
                .unwrap_or("");
            format!("<pre><code>{code}</code></pre>")
        })
        .into_owned()
}

fn strip_stray_marker(html: &str) -> &str {
    let Some(rest) = html.trim_start().strip_prefix(['.', BULLET]) else {
        return html;
    };
    let rest = rest.trim_start();
    if rest.starts_with(BOT_SPAN_PREFIX) { rest } else { html }
}

// ── Line stages ────────────────────────────────────────────────────────────

/// Apply `rule` to every `Text` line; `Some` replaces the line.
fn rewrite_text_lines(lines: &mut [Line], rule: impl Fn(&str) -> Option<Line>) {
    for line in lines.iter_mut() {
        if let Line::Text(text) = line
            && let Some(new_line) = rule(text)
        {
            *line = new_line;
        }
    }
}

/// Trimmed remainder of a prefixed line, if there is any plain text after
/// the prefix. Whitespace alone counts and yields an empty element.
fn plain_remainder(rest: &str) -> Option<String> {
    (!rest.is_empty() && !rest.contains('<')).then(|| rest.trim().to_string())
}

/// Leading `...` runs are upstream artifacts, not content.
pub fn strip_dot_runs(lines: &mut Vec<Line>) {
    rewrite_text_lines(lines, |text| {
        let trimmed = text.trim_start();
        let after_dots = trimmed.trim_start_matches('.');
        (after_dots.len() < trimmed.len())
            .then(|| Line::Text(after_dots.trim_start().to_string()))
    });
}

pub fn promote_header(lines: &mut Vec<Line>) {
    let Some(Line::Text(first)) = lines.first() else {
        return;
    };
    let first = first.trim();
    let header = first
        .strip_prefix("##")
        .map(str::trim_start)
        .unwrap_or(first)
        .to_string();

    let mut rest = lines.split_off(1);
    if let Some(Line::Text(text)) = rest.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Line::Text(text)) = rest.last_mut() {
        *text = text.trim_end().to_string();
    }
    if matches!(rest.as_slice(), [Line::Text(text)] if text.is_empty()) {
        rest.clear();
    }

    lines[0] = Line::Header(header);
    lines.extend(rest);
}

pub fn section_headers(lines: &mut Vec<Line>) {
    rewrite_text_lines(lines, |text| {
        let trimmed = text.trim_start();
        let rest = trimmed
            .strip_prefix("##")
            .or_else(|| trimmed.strip_prefix('.'))?;
        plain_remainder(rest).map(Line::Section)
    });
}

pub fn callouts(lines: &mut Vec<Line>) {
    rewrite_text_lines(lines, |text| {
        let trimmed = text.trim_start();
        let rest = trimmed
            .strip_prefix("Note:")
            .or_else(|| trimmed.strip_prefix("Catatan:"))
            .or_else(|| trimmed.strip_prefix('>'))?;
        plain_remainder(rest).map(Line::Callout)
    });
}

pub fn list_headers(lines: &mut Vec<Line>) {
    rewrite_text_lines(lines, |text| {
        let body = text.trim_start().strip_prefix('-')?;
        let colon = body.find(':').filter(|&idx| idx > 0)?;
        Some(Line::ListHeader {
            label: body[..=colon].trim().to_string(),
            tail: body[colon + 1..].to_string(),
        })
    });
}

pub fn bullets(lines: &mut Vec<Line>) {
    rewrite_text_lines(lines, |text| {
        let body = text.trim_start().strip_prefix('-')?;
        body.starts_with(char::is_whitespace)
            .then(|| Line::Bullet(body.trim_start().to_string()))
    });
}
