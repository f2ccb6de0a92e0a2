//! Formatted message HTML → ratatui `Text` renderer.
//!
//! Reads the small HTML vocabulary produced by [`crate::core::format`]:
//! `<br/>`, `<strong>`, `<em>`, `<span class='bot-*'>`,
//! `<div class='bot-callout'>` and `<pre><code>`. Any other tag is dropped
//! and its text kept. Code blocks get the bordered box and, when the first
//! line names a known language, syntect highlighting.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
/// Header and section color.
pub const ACCENT: Color = Color::LightBlue;

/// Render formatted message HTML as styled text.
pub fn render(html: &str, base_fg: Color) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    for token in tokenize(html) {
        w.handle(token);
    }
    w.finish()
}

// ── Tokenizer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Open { name: String, class: Option<String> },
    Close(String),
    Break,
    CodeBlock(String),
}

const CODE_OPEN: &str = "<pre><code>";
const CODE_CLOSE: &str = "</code></pre>";

fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        // Code is raw: no tags or entities inside.
        if let Some(after) = rest.strip_prefix(CODE_OPEN) {
            let (code, tail) = match after.find(CODE_CLOSE) {
                Some(end) => (&after[..end], &after[end + CODE_CLOSE.len()..]),
                None => (after, ""),
            };
            tokens.push(Token::CodeBlock(code.to_string()));
            rest = tail;
            continue;
        }

        if rest.starts_with('<')
            && let Some(end) = rest.find('>')
            && let Some(token) = parse_tag(&rest[1..end])
        {
            tokens.push(token);
            rest = &rest[end + 1..];
            continue;
        }

        // Literal text up to the next tag; a '<' that isn't a tag is text.
        let skip = usize::from(rest.starts_with('<'));
        let next = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        let text = decode_entities(&rest[..next]);
        match tokens.last_mut() {
            Some(Token::Text(prev)) => prev.push_str(&text),
            _ => tokens.push(Token::Text(text)),
        }
        rest = &rest[next..];
    }
    tokens
}

fn parse_tag(tag: &str) -> Option<Token> {
    if tag.starts_with(char::is_whitespace) {
        return None;
    }
    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, tag),
    };
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if !name.starts_with(|c: char| c.is_ascii_alphabetic())
        || !name.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    let name = name.to_ascii_lowercase();

    Some(match (closing, name.as_str()) {
        (_, "br") => Token::Break,
        (true, _) => Token::Close(name),
        (false, _) => Token::Open {
            class: class_attr(&body[name_end..]),
            name,
        },
    })
}

fn class_attr(attrs: &str) -> Option<String> {
    let value = &attrs[attrs.find("class=")? + "class=".len()..];
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let value = &value[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_string())
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack. Styles compose via `patch`.
    styles: Vec<Style>,
    /// Open elements and whether each pushed a style.
    open: Vec<(String, bool)>,
    /// The current line is the blank one left after a code block.
    after_block: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            open: vec![],
            after_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn push_line(&mut self, line: Line<'static>) {
        self.text.lines.push(line);
    }

    fn push_span(&mut self, span: Span<'static>) {
        self.after_block = false;
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.push_line(Line::from(vec![span])),
        }
    }

    fn handle(&mut self, token: Token) {
        match token {
            Token::Text(text) => {
                let style = self.style();
                self.push_span(Span::styled(text.replace('\t', "    "), style));
            }
            Token::Break => {
                if self.after_block {
                    self.after_block = false;
                    return;
                }
                if self.text.lines.is_empty() {
                    self.push_line(Line::default());
                }
                self.push_line(Line::default());
            }
            Token::Open { name, class } => self.open(name, class.as_deref()),
            Token::Close(name) => self.close(&name),
            Token::CodeBlock(code) => self.code_block(&code),
        }
    }

    fn open(&mut self, name: String, class: Option<&str>) {
        let overlay = match (name.as_str(), class) {
            ("strong" | "b", _) => Some(Style::default().add_modifier(Modifier::BOLD)),
            ("em" | "i", _) => Some(Style::default().add_modifier(Modifier::ITALIC)),
            ("span", Some("bot-header")) => Some(
                Style::default()
                    .fg(ACCENT)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            ("span", Some("bot-section-header")) => {
                Some(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            }
            ("span", Some("bot-list-header")) => {
                Some(Style::default().add_modifier(Modifier::BOLD))
            }
            ("span", Some("bot-suggest-label")) => Some(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            ("div", Some("bot-callout")) => {
                self.push_span(Span::styled("▎ ", Style::default().fg(ACCENT)));
                Some(Style::default().add_modifier(Modifier::ITALIC))
            }
            _ => None,
        };
        if let Some(overlay) = overlay {
            self.push_style(overlay);
        }
        self.open.push((name, overlay.is_some()));
    }

    fn close(&mut self, name: &str) {
        let Some(idx) = self.open.iter().rposition(|(open, _)| open == name) else {
            return;
        };
        for (_, pushed) in self.open.drain(idx..) {
            if pushed {
                self.styles.pop();
            }
        }
    }

    fn code_block(&mut self, code: &str) {
        if self.text.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.text.lines.pop();
        }

        let bs = Style::default().fg(Color::DarkGray);
        let (lang, body) = split_language(code);
        let top = match lang {
            Some((name, _)) => Line::from(vec![
                Span::styled("╭── ", bs),
                Span::styled(name.to_owned(), bs.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", bs),
            ]),
            None => Line::from(Span::styled("╭──", bs)),
        };
        self.push_line(top);

        let highlighter = lang
            .and_then(|(_, syntax)| code_theme().map(|theme| HighlightLines::new(syntax, theme)));
        match highlighter {
            Some(mut hl) => {
                for line in LinesWithEndings::from(body) {
                    let mut spans = vec![Span::styled("│ ", bs)];
                    match hl.highlight_line(line, &SYNTAX_SET) {
                        Ok(ranges) => spans.extend(ranges.into_iter().filter_map(
                            |(hl_style, frag)| {
                                let content =
                                    frag.trim_end_matches('\n').replace('\t', "    ");
                                (!content.is_empty()).then(|| {
                                    let fg = Color::Rgb(
                                        hl_style.foreground.r,
                                        hl_style.foreground.g,
                                        hl_style.foreground.b,
                                    );
                                    Span::styled(content, Style::default().fg(fg))
                                })
                            },
                        )),
                        Err(_) => spans.push(plain_code_span(line)),
                    }
                    self.push_line(Line::from(spans));
                }
            }
            None => {
                for line in body.lines() {
                    self.push_line(Line::from(vec![
                        Span::styled("│ ", bs),
                        plain_code_span(line),
                    ]));
                }
            }
        }

        self.push_line(Line::from(Span::styled("╰──", bs)));
        self.push_line(Line::default());
        self.after_block = true;
    }

    fn finish(mut self) -> Text<'static> {
        if self.after_block && self.text.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.text.lines.pop();
        }
        self.text
    }
}

fn plain_code_span(line: &str) -> Span<'static> {
    Span::styled(
        line.trim_end_matches('\n').replace('\t', "    "),
        Style::default().fg(Color::White),
    )
}

fn code_theme() -> Option<&'static Theme> {
    THEME_SET.themes.get(CODE_THEME)
}

/// A fence's first line is a language tag when it is a single known token
/// and more lines follow.
fn split_language(code: &str) -> (Option<(&str, &'static SyntaxReference)>, &str) {
    let Some((first, rest)) = code.split_once('\n') else {
        return (None, code);
    };
    let token = first.trim();
    let looks_like_tag = !token.is_empty()
        && token.len() <= 20
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'));
    match looks_like_tag
        .then(|| SYNTAX_SET.find_syntax_by_token(token))
        .flatten()
    {
        Some(syntax) => (Some((token, syntax)), rest),
        None => (None, code),
    }
}
