use crate::lexer::{LexicalError, Span, TokenKind};
use crate::world::error::WorldError;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected a section but got token {0}.")]
    NonSection(TokenKind),
    #[error("Expected a block but got token {0}.")]
    NonBlock(TokenKind),
    #[error("Expected a number but got token {0}.")]
    NonNumber(TokenKind),
    #[error("Unknown condition {0}.")]
    UnknownCondition(CompactString),
    #[error("Unknown direction {0}.")]
    UnknownDirection(CompactString),
    #[error("Can only turn left or right but got {0}.")]
    UnknownTurn(CompactString),
    #[error("The number {0} is too large.")]
    NumberTooLarge(CompactString),
    #[error("The {0} section appears more than once.")]
    DuplicateSection(TokenKind),
    #[error("The {0} section is missing.")]
    MissingSection(TokenKind),
    #[error("No goal section and the grid does not have exactly one goal cell.")]
    MissingGoal,
    #[error("Invalid world: {0}")]
    InvalidWorld(#[from] WorldError),
    #[error("Encountered a lexer error {0}.")]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonSection(_) => "PA002",
            ParserErrorKind::NonBlock(_) => "PA003",
            ParserErrorKind::NonNumber(_) => "PA004",
            ParserErrorKind::UnknownCondition(_) => "PA005",
            ParserErrorKind::UnknownDirection(_) => "PA006",
            ParserErrorKind::UnknownTurn(_) => "PA007",
            ParserErrorKind::NumberTooLarge(_) => "PA008",
            ParserErrorKind::DuplicateSection(_) => "PA009",
            ParserErrorKind::MissingSection(_) => "PA010",
            ParserErrorKind::MissingGoal => "PA011",
            ParserErrorKind::InvalidWorld(_) => "PA012",
            ParserErrorKind::LexicalError(ref e) => e.code(),
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(value: LexicalError) -> Self {
        Self {
            span: value.span,
            kind: ParserErrorKind::LexicalError(value),
        }
    }
}
