//! Token representation for a parsed screenplay

use serde::{Deserialize, Serialize};

/// Kind of a parsed screenplay element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    SceneHeading,
    Action,
    Dialogue,
    /// Character cue preceding a dialogue block
    Character,
    Parenthetical,
    Transition,
    Centered,
    Section,
    Synopsis,
    Note,
    Lyrics,
    PageBreak,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::SceneHeading => "scene_heading",
            TokenKind::Action => "action",
            TokenKind::Dialogue => "dialogue",
            TokenKind::Character => "character",
            TokenKind::Parenthetical => "parenthetical",
            TokenKind::Transition => "transition",
            TokenKind::Centered => "centered",
            TokenKind::Section => "section",
            TokenKind::Synopsis => "synopsis",
            TokenKind::Note => "note",
            TokenKind::Lyrics => "lyrics",
            TokenKind::PageBreak => "page_break",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column of a dual dialogue block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dual {
    Left,
    Right,
}

/// One printed line of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    /// Source line number
    pub number: usize,
}

impl Line {
    pub fn new(text: impl Into<String>, number: usize) -> Self {
        Self {
            text: text.into(),
            number,
        }
    }
}

/// A parsed screenplay element.
///
/// Tokens are produced by an external parser and never mutated by queries.
/// Kind-specific metadata lives in optional fields; accessors such as
/// [`Token::location`] and [`Token::time_slot`] fall back to the heading
/// text when the parser did not fill them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default)]
    pub text: String,
    /// Source line the token starts on
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Nesting level (sections only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual: Option<Dual>,
    /// Right column paired with a left dual dialogue token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_column: Option<Box<Token>>,
}

impl Token {
    /// Create a token whose text is split into lines numbered from `line`.
    pub fn new(kind: TokenKind, line: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text
            .lines()
            .enumerate()
            .map(|(offset, l)| Line::new(l, line + offset))
            .collect();
        Self {
            kind,
            text,
            line,
            lines,
            location: None,
            time_of_day: None,
            level: None,
            dual: None,
            right_column: None,
        }
    }

    /// Create a scene heading, deriving location and time of day from
    /// headings shaped like `INT. KITCHEN - NIGHT`.
    pub fn scene_heading(line: usize, text: impl Into<String>) -> Self {
        let mut token = Self::new(TokenKind::SceneHeading, line, text);
        let (location, time) = split_heading(&token.text);
        token.location = (!location.is_empty()).then(|| location.to_string());
        token.time_of_day = time.map(str::to_string);
        token
    }

    pub fn action(line: usize, text: impl Into<String>) -> Self {
        Self::new(TokenKind::Action, line, text)
    }

    pub fn character(line: usize, name: impl Into<String>) -> Self {
        Self::new(TokenKind::Character, line, name)
    }

    pub fn dialogue(line: usize, text: impl Into<String>) -> Self {
        Self::new(TokenKind::Dialogue, line, text)
    }

    pub fn page_break(line: usize) -> Self {
        Self::new(TokenKind::PageBreak, line, "")
    }

    pub fn section(line: usize, level: u8, text: impl Into<String>) -> Self {
        Self::new(TokenKind::Section, line, text).with_level(level)
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_dual(mut self, dual: Dual) -> Self {
        self.dual = Some(dual);
        self
    }

    pub fn with_right_column(mut self, right: Token) -> Self {
        self.right_column = Some(Box::new(right));
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_time_of_day(mut self, time: impl Into<String>) -> Self {
        self.time_of_day = Some(time.into());
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Location of a scene heading; `None` for other kinds or when the
    /// heading carries no location.
    pub fn location(&self) -> Option<&str> {
        if self.kind != TokenKind::SceneHeading {
            return None;
        }
        match self.location.as_deref() {
            Some(location) => Some(location.trim()).filter(|l| !l.is_empty()),
            None => Some(split_heading(&self.text).0).filter(|l| !l.is_empty()),
        }
    }

    /// The time-of-day slot of a scene heading: the explicit metadata when
    /// present, otherwise everything after the last ` - ` of the heading.
    pub fn time_slot(&self) -> Option<&str> {
        if self.kind != TokenKind::SceneHeading {
            return None;
        }
        match self.time_of_day.as_deref() {
            Some(time) => Some(time),
            None => split_heading(&self.text).1,
        }
    }

    /// Speaker name of a character cue, without extensions such as
    /// `(V.O.)` or the dual dialogue caret.
    pub fn character_name(&self) -> Option<&str> {
        if self.kind != TokenKind::Character {
            return None;
        }
        let cue = self.text.trim().trim_end_matches('^').trim_end();
        let name = match cue.find('(') {
            Some(at) => &cue[..at],
            None => cue,
        }
        .trim();
        (!name.is_empty()).then_some(name)
    }
}

const HEADING_PREFIXES: &[&str] = &["INT./EXT.", "INT/EXT", "EXT./INT.", "I/E", "INT.", "EXT.", "EST."];

/// Split `INT. HOUSE - KITCHEN - NIGHT` into (`HOUSE - KITCHEN`, `NIGHT`).
fn split_heading(text: &str) -> (&str, Option<&str>) {
    let mut rest = text.trim();
    let upper = rest.to_ascii_uppercase();
    if let Some(prefix) = HEADING_PREFIXES.iter().find(|p| upper.starts_with(*p)) {
        rest = rest[prefix.len()..].trim_start();
    }
    match rest.rfind(" - ") {
        Some(at) => (rest[..at].trim(), Some(rest[at + 3..].trim())),
        None => (rest.trim(), None),
    }
}
