mod error;
pub mod formatter;
mod state;
mod token;

pub use error::{LexicalError, LexicalErrorKind};
use state::{LexerState, LexerStateTransition, SourceChar};
use std::{rc::Rc, str::Chars};
pub use token::{Span, SpanIndex, SpanLength, Token, TokenKind};

/// Offsets at which each line of a source text begins, for mapping spans to line numbers.
#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_starts: Rc<[SpanIndex]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_starts: Vec<SpanIndex> = std::iter::once(0)
            .chain(
                text.bytes()
                    .enumerate()
                    .filter(|&(_, byte)| byte == b'\n')
                    .map(|(offset, _)| offset + 1),
            )
            .map(SpanIndex::from)
            .collect();
        Self {
            line_starts: line_starts.into(),
        }
    }

    /// Lines are numbered from 1. Offsets past the end belong to the last line.
    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_starts.partition_point(|&start| start <= offset) as u32
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    state: LexerState,
    offset: SpanIndex,
    lookahead: Option<SourceChar>,
    line_breaks: LineBreaks,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            state: LexerState::default(),
            offset: 0.into(),
            lookahead: None,
            line_breaks: LineBreaks::new(source),
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        self.line_breaks.clone()
    }

    pub fn get_lexeme(&self, span: &Span) -> Option<&'src str> {
        self.source.get(span.range())
    }

    fn next_char(&mut self) -> Option<SourceChar> {
        if let Some(lookahead) = self.lookahead.take() {
            return Some(lookahead);
        }
        let value = self.chars.next()?;
        let offset = self.offset;
        self.offset = self.offset + value.len_utf8();
        Some(SourceChar { value, offset })
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let next_char = self.next_char();
            match self.state.execute(self.source, &next_char) {
                LexerStateTransition::Stay => {}
                LexerStateTransition::ChangeState(new_state) => {
                    self.state = new_state;
                }
                LexerStateTransition::ChangeStateAndEmit {
                    new_state,
                    token_or_error,
                } => {
                    self.state = new_state;
                    return token_or_error;
                }
                LexerStateTransition::ChangeStateAndEmitAndPutBack {
                    new_state,
                    token_or_error,
                    put_back,
                } => {
                    self.state = new_state;
                    self.lookahead = Some(put_back);
                    return token_or_error;
                }
            }
        }
    }
}
