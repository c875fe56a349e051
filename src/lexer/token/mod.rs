mod span;

pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("attack", TokenKind::KeywordAttack);
    map.insert("break", TokenKind::KeywordBreak);
    map.insert("continue", TokenKind::KeywordContinue);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("forever", TokenKind::KeywordForever);
    map.insert("goal", TokenKind::KeywordGoal);
    map.insert("grid", TokenKind::KeywordGrid);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("move", TokenKind::KeywordMove);
    map.insert("program", TokenKind::KeywordProgram);
    map.insert("repeat", TokenKind::KeywordRepeat);
    map.insert("start", TokenKind::KeywordStart);
    map.insert("turn", TokenKind::KeywordTurn);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn between(start: SpanIndex, end: SpanIndex) -> Self {
        Self {
            start,
            length: end - start,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.into()..(self.start + self.length).into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }

    pub fn merge(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Span::between(start, end)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Braces
    LeftBrace,
    RightBrace,
    // Brackets
    LeftBracket,
    RightBracket,

    // Literals
    NumericLiteral,
    StringLiteral,
    Ident,

    // Sections
    KeywordGrid,
    KeywordStart,
    KeywordGoal,
    KeywordProgram,
    // Blocks
    KeywordMove,
    KeywordTurn,
    KeywordAttack,
    KeywordRepeat,
    KeywordForever,
    KeywordIf,
    KeywordElse,
    KeywordBreak,
    KeywordContinue,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::LeftBracket => write!(f, "LEFT_BRACKET"),
            TokenKind::RightBracket => write!(f, "RIGHT_BRACKET"),
            TokenKind::NumericLiteral => write!(f, "NUMBER"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordGrid => write!(f, "GRID"),
            TokenKind::KeywordStart => write!(f, "START"),
            TokenKind::KeywordGoal => write!(f, "GOAL"),
            TokenKind::KeywordProgram => write!(f, "PROGRAM"),
            TokenKind::KeywordMove => write!(f, "MOVE"),
            TokenKind::KeywordTurn => write!(f, "TURN"),
            TokenKind::KeywordAttack => write!(f, "ATTACK"),
            TokenKind::KeywordRepeat => write!(f, "REPEAT"),
            TokenKind::KeywordForever => write!(f, "FOREVER"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordBreak => write!(f, "BREAK"),
            TokenKind::KeywordContinue => write!(f, "CONTINUE"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
