use super::token::{Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};
use super::{LexicalError, LexicalErrorKind};

/// A character of the source together with the byte offset it starts at.
#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: SpanIndex,
}

impl SourceChar {
    fn next_offset(&self) -> SpanIndex {
        self.offset + self.value.len_utf8()
    }
}

pub enum LexerStateTransition {
    Stay,
    ChangeState(LexerState),
    ChangeStateAndEmit {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
    },
    ChangeStateAndEmitAndPutBack {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: SourceChar,
    },
}

trait LexerStateExecutor {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition;
}

#[derive(Debug, Clone, Default)]
pub enum LexerState {
    #[default]
    Normal,
    Comment,
    Ident(WordState),
    Number(WordState),
    String(WordState),
}

impl LexerState {
    pub fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        match self {
            LexerState::Normal => NormalState.execute(source, next_char),
            LexerState::Comment => CommentState.execute(source, next_char),
            LexerState::Ident(s) => IdentState(s).execute(source, next_char),
            LexerState::Number(s) => NumberState(s).execute(source, next_char),
            LexerState::String(s) => StringState(s).execute(source, next_char),
        }
    }
}

/// Where a multi-character token began.
#[derive(Debug, Clone)]
pub struct WordState {
    start: SpanIndex,
}

fn end_of_file(source: &str) -> Token {
    Token {
        kind: TokenKind::Eof,
        span: Span::between(source.len().into(), source.len().into()),
    }
}

struct NormalState;

impl LexerStateExecutor for NormalState {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let Some(c) = next_char else {
            return LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(end_of_file(source)),
            };
        };

        let just = |kind: TokenKind| LexerStateTransition::ChangeStateAndEmit {
            new_state: LexerState::Normal,
            token_or_error: Ok(Token {
                kind,
                span: Span::between(c.offset, c.next_offset()),
            }),
        };
        let word = WordState { start: c.offset };

        match c.value {
            '{' => just(TokenKind::LeftBrace),
            '}' => just(TokenKind::RightBrace),
            '[' => just(TokenKind::LeftBracket),
            ']' => just(TokenKind::RightBracket),
            '#' => LexerStateTransition::ChangeState(LexerState::Comment),
            '"' => LexerStateTransition::ChangeState(LexerState::String(word)),
            '0'..='9' => LexerStateTransition::ChangeState(LexerState::Number(word)),
            'a'..='z' | 'A'..='Z' | '_' => LexerStateTransition::ChangeState(LexerState::Ident(word)),
            v if v.is_whitespace() => LexerStateTransition::Stay,
            v => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Err(LexicalError {
                    kind: LexicalErrorKind::Unrecognized(v),
                    span: Span::between(c.offset, c.next_offset()),
                }),
            },
        }
    }
}

struct CommentState;

impl LexerStateExecutor for CommentState {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        match next_char {
            Some(SourceChar { value: '\n', .. }) => LexerStateTransition::ChangeState(LexerState::Normal),
            Some(_) => LexerStateTransition::Stay,
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(end_of_file(source)),
            },
        }
    }
}

struct IdentState<'a>(&'a WordState);

impl<'a> IdentState<'a> {
    fn lex_ident_or_keyword(&self, source: &str, end: SpanIndex) -> Token {
        let span = Span::between(self.0.start, end);
        let lexeme = &source[span.range()];
        Token {
            kind: KEYWORD_HASHMAP
                .get(lexeme)
                .copied()
                .unwrap_or(TokenKind::Ident),
            span,
        }
    }
}

impl<'a> LexerStateExecutor for IdentState<'a> {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let Some(c) = next_char else {
            return LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(self.lex_ident_or_keyword(source, source.len().into())),
            };
        };

        if c.value.is_ascii_alphanumeric() || c.value == '_' {
            LexerStateTransition::Stay
        } else {
            LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error: Ok(self.lex_ident_or_keyword(source, c.offset)),
                put_back: *c,
            }
        }
    }
}

struct NumberState<'a>(&'a WordState);

impl<'a> LexerStateExecutor for NumberState<'a> {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let number = |end: SpanIndex| {
            Ok(Token {
                kind: TokenKind::NumericLiteral,
                span: Span::between(self.0.start, end),
            })
        };

        match next_char {
            Some(c) if c.value.is_ascii_digit() => LexerStateTransition::Stay,
            Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error: number(c.offset),
                put_back: *c,
            },
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: number(source.len().into()),
            },
        }
    }
}

struct StringState<'a>(&'a WordState);

impl<'a> LexerStateExecutor for StringState<'a> {
    fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let unclosed = |end: SpanIndex| LexerStateTransition::ChangeStateAndEmit {
            new_state: LexerState::Normal,
            token_or_error: Err(LexicalError {
                kind: LexicalErrorKind::UnclosedString,
                span: Span::between(self.0.start, end),
            }),
        };

        match next_char {
            Some(c) if c.value == '"' => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(Token {
                    kind: TokenKind::StringLiteral,
                    span: Span::between(self.0.start, c.next_offset()),
                }),
            },
            // Strings never span lines.
            Some(c) if c.value == '\n' => unclosed(c.offset),
            Some(_) => LexerStateTransition::Stay,
            None => unclosed(source.len().into()),
        }
    }
}
