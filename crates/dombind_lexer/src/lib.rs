//! Tokenizer and depth-aware scanning for declaration text.

pub mod scan;
pub mod token;
pub mod tokenizer;

pub use scan::{
    Segment, blank_comments, contains_top_level, depth_after, find_top_level, matching_close,
    split_statements, split_top_level,
};
pub use token::{Span, Token, TokenKind};
pub use tokenizer::{LexResult, LexerError, line_col, tokenize};
