mod error;
pub mod formatter;
mod level;

use crate::{
    block::{Block, BlockId, BlockKind, BlockTree, Branch, Condition},
    lexer::{Lexer, Span, Token, TokenKind},
    world::{error::WorldError, Direction, GridWorld, Position},
};
use compact_str::CompactString;
pub use error::{ParserError, ParserErrorKind};
pub use level::{Level, SourceMap};

const ADD_MSG: &'static str = "Freshly parsed blocks only own their own children.";

/// Sections seen so far while parsing a level, with the span they were declared at.
#[derive(Debug, Default)]
struct Sections {
    grid: Option<(Vec<Vec<u8>>, Vec<Span>, Span)>,
    start: Option<(Position, Direction, Span)>,
    goal: Option<(Position, Span)>,
    program: Option<(Vec<BlockId>, Span)>,
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Result<Token, ParserError>>,
    tree: BlockTree,
    source_map: SourceMap,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
            tree: BlockTree::new(),
            source_map: SourceMap::new(),
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(ParserError {
                span: next_token.span,
                kind: ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
            })
        } else {
            Ok(next_token)
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != next {
            Ok(None)
        } else {
            let _ = self.next_token().expect("Just peeked.");
            Ok(Some(next_token))
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        self.lexer
            .get_lexeme(&token.span)
            .expect("Lexed token has a valid span")
    }
}

// Sections
impl<'src> Parser<'src> {
    /// Parses a complete level: a grid, a start, an optional goal and a program.
    pub fn parse_level(mut self) -> Result<Level, ParserError> {
        let mut sections = Sections::default();
        let eof = loop {
            let token = self.next_token()?;
            let duplicate = ParserError {
                kind: ParserErrorKind::DuplicateSection(token.kind),
                span: token.span,
            };
            match token.kind {
                TokenKind::Eof => break token,
                TokenKind::KeywordGrid if sections.grid.is_some() => return Err(duplicate),
                TokenKind::KeywordStart if sections.start.is_some() => return Err(duplicate),
                TokenKind::KeywordGoal if sections.goal.is_some() => return Err(duplicate),
                TokenKind::KeywordProgram if sections.program.is_some() => return Err(duplicate),
                TokenKind::KeywordGrid => {
                    let (rows, row_spans, end) = self.parse_grid()?;
                    sections.grid = Some((rows, row_spans, token.span.merge(&end)));
                }
                TokenKind::KeywordStart => {
                    let (position, end) = self.parse_position()?;
                    let direction = self.parse_direction()?;
                    sections.start = Some((position, direction, token.span.merge(&end)));
                }
                TokenKind::KeywordGoal => {
                    let (position, end) = self.parse_position()?;
                    sections.goal = Some((position, token.span.merge(&end)));
                }
                TokenKind::KeywordProgram => {
                    let (body, end) = self.parse_body()?;
                    sections.program = Some((body, token.span.merge(&end)));
                }
                kind => {
                    return Err(ParserError {
                        kind: ParserErrorKind::NonSection(kind),
                        span: token.span,
                    })
                }
            }
        };

        let missing = |kind: TokenKind| ParserError {
            kind: ParserErrorKind::MissingSection(kind),
            span: eof.span,
        };
        let (rows, row_spans, grid_span) = sections.grid.ok_or(missing(TokenKind::KeywordGrid))?;
        let (start, direction, start_span) =
            sections.start.ok_or(missing(TokenKind::KeywordStart))?;
        let (body, _) = sections.program.ok_or(missing(TokenKind::KeywordProgram))?;
        let (goal, goal_span) = match sections.goal {
            Some(goal) => goal,
            None => (
                GridWorld::find_goal(&rows).ok_or(ParserError {
                    kind: ParserErrorKind::MissingGoal,
                    span: grid_span,
                })?,
                grid_span,
            ),
        };

        let world = GridWorld::new(&rows, start, direction, goal).map_err(|error| {
            let span = match error {
                WorldError::Empty => grid_span,
                WorldError::Ragged { row, .. } => row_spans[row],
                WorldError::InvalidCell { position, .. } => row_spans[position.row],
                WorldError::StartOutOfBounds(_) => start_span,
                WorldError::GoalOutOfBounds(_) => goal_span,
            };
            ParserError {
                kind: error.into(),
                span,
            }
        })?;

        let root = self.tree.root();
        for id in body {
            self.tree.push(root, Branch::Then, id).expect(ADD_MSG);
        }
        Ok(Level {
            world,
            program: self.tree,
            source_map: self.source_map,
        })
    }

    /// Parses a bare sequence of blocks up to the end of the source.
    pub fn parse_program(mut self) -> Result<(BlockTree, SourceMap), ParserError> {
        let mut body = Vec::new();
        while self.eat_if(TokenKind::Eof)?.is_none() {
            body.push(self.parse_block()?);
        }
        let root = self.tree.root();
        for id in body {
            self.tree.push(root, Branch::Then, id).expect(ADD_MSG);
        }
        Ok((self.tree, self.source_map))
    }

    fn parse_grid(&mut self) -> Result<(Vec<Vec<u8>>, Vec<Span>, Span), ParserError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut rows = Vec::new();
        let mut row_spans = Vec::new();
        loop {
            if let Some(close) = self.eat_if(TokenKind::RightBrace)? {
                return Ok((rows, row_spans, close.span));
            }
            let open = self.expect(TokenKind::LeftBracket)?;
            let mut row = Vec::new();
            let close = loop {
                if let Some(close) = self.eat_if(TokenKind::RightBracket)? {
                    break close;
                }
                let (code, _) = self.parse_number::<u8>()?;
                row.push(code);
            };
            rows.push(row);
            row_spans.push(open.span.merge(&close.span));
        }
    }

    fn parse_number<T: std::str::FromStr>(&mut self) -> Result<(T, Span), ParserError> {
        let token = self.next_token()?;
        if token.kind != TokenKind::NumericLiteral {
            return Err(ParserError {
                kind: ParserErrorKind::NonNumber(token.kind),
                span: token.span,
            });
        }
        let lexeme = self.lexeme(&token);
        // Numeric literals are all digits, so only overflow can fail here.
        let value = lexeme.parse().map_err(|_| ParserError {
            kind: ParserErrorKind::NumberTooLarge(lexeme.into()),
            span: token.span,
        })?;
        Ok((value, token.span))
    }

    fn parse_position(&mut self) -> Result<(Position, Span), ParserError> {
        let (row, _) = self.parse_number()?;
        let (col, span) = self.parse_number()?;
        Ok((Position::new(row, col), span))
    }

    fn parse_direction(&mut self) -> Result<Direction, ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        let name = self.lexeme(&token);
        Direction::from_name(name).ok_or(ParserError {
            kind: ParserErrorKind::UnknownDirection(name.into()),
            span: token.span,
        })
    }
}

// Blocks
impl<'src> Parser<'src> {
    fn parse_body(&mut self) -> Result<(Vec<BlockId>, Span), ParserError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        loop {
            if let Some(close) = self.eat_if(TokenKind::RightBrace)? {
                return Ok((body, close.span));
            }
            body.push(self.parse_block()?);
        }
    }

    fn parse_block(&mut self) -> Result<BlockId, ParserError> {
        let token = self.next_token()?;
        let (block, end) = match token.kind {
            TokenKind::KeywordMove => (Block::new(BlockKind::MoveForward), token.span),
            TokenKind::KeywordAttack => (Block::new(BlockKind::Attack), token.span),
            TokenKind::KeywordBreak => (Block::new(BlockKind::BreakLoop), token.span),
            TokenKind::KeywordContinue => (Block::new(BlockKind::ContinueLoop), token.span),
            TokenKind::KeywordTurn => {
                let side = self.expect(TokenKind::Ident)?;
                let kind = match self.lexeme(&side) {
                    "left" => BlockKind::TurnLeft,
                    "right" => BlockKind::TurnRight,
                    other => {
                        return Err(ParserError {
                            kind: ParserErrorKind::UnknownTurn(other.into()),
                            span: side.span,
                        })
                    }
                };
                (Block::new(kind), side.span)
            }
            TokenKind::KeywordRepeat => {
                let value = self.parse_repeat_count()?;
                let (children, end) = self.parse_body()?;
                let mut block = Block::new(BlockKind::RepeatCount).with_children(children);
                if let Some(value) = value {
                    block = block.with_value(value);
                }
                (block, end)
            }
            TokenKind::KeywordForever => {
                let (children, end) = self.parse_body()?;
                (
                    Block::new(BlockKind::RepeatForever).with_children(children),
                    end,
                )
            }
            TokenKind::KeywordIf => {
                let condition = self.parse_condition()?;
                let (children, end) = self.parse_body()?;
                if self.eat_if(TokenKind::KeywordElse)?.is_some() {
                    let (else_children, end) = self.parse_body()?;
                    let block = Block::new(BlockKind::IfElse)
                        .with_condition(condition)
                        .with_children(children)
                        .with_else_children(else_children);
                    (block, end)
                } else {
                    let block = Block::new(BlockKind::If)
                        .with_condition(condition)
                        .with_children(children);
                    (block, end)
                }
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonBlock(kind),
                    span: token.span,
                })
            }
        };

        let id = self.tree.add(block).expect(ADD_MSG);
        self.source_map.insert(id, token.span.merge(&end));
        Ok(id)
    }

    /// The loop count is kept as written; it is only interpreted when the loop runs.
    fn parse_repeat_count(&mut self) -> Result<Option<CompactString>, ParserError> {
        let token = self.peek()?;
        let value = match token.kind {
            TokenKind::NumericLiteral | TokenKind::Ident => self.lexeme(&token),
            TokenKind::StringLiteral => {
                let lexeme = self.lexeme(&token);
                &lexeme[1..lexeme.len() - 1]
            }
            _ => return Ok(None),
        };
        let _ = self.next_token().expect("Just peeked.");
        Ok(Some(value.into()))
    }

    fn parse_condition(&mut self) -> Result<Condition, ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        let name = self.lexeme(&token);
        Condition::from_keyword(name).ok_or(ParserError {
            kind: ParserErrorKind::UnknownCondition(name.into()),
            span: token.span,
        })
    }
}
