//! Screenplay token model consumed by queries

mod token;


pub use token::{Dual, Line, Token, TokenKind};
