//! Common test utilities for screenstats integration tests
//!
//! Provides a fluent screenplay builder, a seeded random document
//! generator, and fixture loading.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenstats::{Token, TokenKind};
use std::path::PathBuf;

/// Builds token sequences with consecutive source line numbers.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    tokens: Vec<Token>,
    line: usize,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            line: 1,
        }
    }

    fn push(mut self, token: Token) -> Self {
        self.line += token.line_count().max(1);
        self.tokens.push(token);
        self
    }

    pub fn scene(self, heading: &str) -> Self {
        let line = self.line;
        self.push(Token::scene_heading(line, heading))
    }

    pub fn action(self, text: &str) -> Self {
        let line = self.line;
        self.push(Token::action(line, text))
    }

    /// Character cue followed by its dialogue.
    pub fn speech(self, name: &str, text: &str) -> Self {
        let line = self.line;
        let builder = self.push(Token::character(line, name));
        let line = builder.line;
        builder.push(Token::dialogue(line, text))
    }

    pub fn token(self, kind: TokenKind, text: &str) -> Self {
        let line = self.line;
        self.push(Token::new(kind, line, text))
    }

    pub fn page_break(self) -> Self {
        let line = self.line;
        self.push(Token::page_break(line))
    }

    pub fn build(self) -> Vec<Token> {
        self.tokens
    }
}

const NAMES: &[&str] = &["ANNA", "BORIS", "CLARA", "DMITRI", "EVA", "FELIX"];
const PLACES: &[&str] = &["KITCHEN", "HALL", "ROAD", "OFFICE", "ROOF"];
const TIMES: &[&str] = &["DAY", "NIGHT", "DUSK", "DAWN", "CONTINUOUS", "LATER"];

fn text(rng: &mut StdRng, prefix: &str) -> String {
    let lines = rng.gen_range(1..=4);
    (0..lines)
        .map(|i| format!("{} line {}.", prefix, i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Random but well-formed document of about `size` tokens, paginated so
/// that no page holds more than `lines_per_page` lines.
pub fn random_script(seed: u64, size: usize, lines_per_page: usize) -> Vec<Token> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = ScriptBuilder::new();
    for _ in 0..size {
        builder = match rng.gen_range(0..10) {
            0 | 1 => {
                let place = PLACES[rng.gen_range(0..PLACES.len())];
                let heading = if rng.gen_bool(0.25) {
                    format!("INT. {}", place)
                } else {
                    format!("EXT. {} - {}", place, TIMES[rng.gen_range(0..TIMES.len())])
                };
                builder.scene(&heading)
            }
            2..=4 => builder.action(&text(&mut rng, "Action")),
            5..=8 => {
                let name = NAMES[rng.gen_range(0..NAMES.len())];
                builder.speech(name, &text(&mut rng, name))
            }
            _ => builder.token(TokenKind::Transition, "CUT TO:"),
        };
    }
    paginate(builder.build(), lines_per_page)
}

/// Insert page breaks so no page exceeds `lines_per_page` lines.
pub fn paginate(tokens: Vec<Token>, lines_per_page: usize) -> Vec<Token> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut on_page = 0;
    for token in tokens {
        let lines = token.line_count();
        if on_page > 0 && on_page + lines > lines_per_page {
            result.push(Token::page_break(token.line));
            on_page = 0;
        }
        on_page += lines;
        result.push(token);
    }
    result
}

/// Lines of every token except page breaks.
pub fn total_lines(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .filter(|t| !t.is(TokenKind::PageBreak))
        .map(Token::line_count)
        .sum()
}

pub fn count_kind(tokens: &[Token], kind: TokenKind) -> usize {
    tokens.iter().filter(|t| t.is(kind)).count()
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_fixture(name: &str) -> Vec<Token> {
    let json = std::fs::read_to_string(fixture_path(name)).expect("fixture readable");
    serde_json::from_str(&json).expect("fixture parses")
}
