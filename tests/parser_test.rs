use std::path::Path;

use blockmaze::{
    block::{
        formatter::{BlockFormatter, SExpressionFormatter, ScriptFormatter},
        BlockKind, Branch,
    },
    lexer::{LexicalErrorKind, TokenKind},
    parser::{
        formatter::{BasicFormatter, ParserFormatter, PrettyFormatter},
        Parser, ParserError, ParserErrorKind,
    },
    world::{error::WorldError, Cell, Direction, Position},
};
use color_eyre::Result;

const LEVEL: &str = r#"
# A small level touching every block.
grid {
  [1 1]
  [0 2]
}
start 0 0 right
program {
    move
    repeat 2 { turn left }
    forever { if front_clear { move } else { break } }
    if at_flag { attack }
    repeat "x" { }
    repeat { continue }
    turn right
}
"#;

const LEVEL_SEXPR: &str = concat!(
    "(start (moveForward) (repeatCount \"2\" (turnLeft))",
    " (repeatForever (ifElse frontIsClear (then (moveForward)) (else (breakLoop))))",
    " (if atFlag (attack)) (repeatCount \"x\") (repeatCount nil (continueLoop)) (turnRight))",
);

fn parse_error(source: &str) -> ParserError {
    match Parser::new(source).parse_level() {
        Ok(_) => panic!("Expected {source:?} to fail to parse"),
        Err(error) => error,
    }
}

#[test]
fn test_parse_level() -> Result<()> {
    let level = Parser::new(LEVEL).parse_level()?;

    assert_eq!(level.world.rows(), 2);
    assert_eq!(level.world.cols(), 2);
    assert_eq!(level.world.start(), Position::new(0, 0));
    assert_eq!(level.world.start_direction(), Direction::Right);
    assert_eq!(level.world.goal(), Position::new(1, 1));
    assert_eq!(level.world.cell(Position::new(1, 0)), Some(Cell::Blocked));
    assert_eq!(SExpressionFormatter.format(&level.program), LEVEL_SEXPR);
    Ok(())
}

#[test]
fn test_goal_section_overrides_grid() -> Result<()> {
    let level = Parser::new("grid { [1 1 1] } goal 0 2 start 0 0 right program { }").parse_level()?;
    assert_eq!(level.world.goal(), Position::new(0, 2));
    assert!(level.program.is_empty());
    Ok(())
}

#[test]
fn test_parse_program() -> Result<()> {
    let (tree, _) = Parser::new("move if always { turn right }").parse_program()?;
    assert_eq!(
        SExpressionFormatter.format(&tree),
        "(start (moveForward) (if always (turnRight)))"
    );
    Ok(())
}

#[test]
fn test_block_spans() -> Result<()> {
    let source = "move\n  turn left\nrepeat 2 {\n  attack\n}";
    let (tree, source_map) = Parser::new(source).parse_program()?;
    let body = tree.body(tree.root(), Branch::Then);
    assert_eq!(body.len(), 3);

    let span_text = |index: usize| {
        source_map
            .span(body[index])
            .map(|span| &source[span.range()])
    };
    assert_eq!(span_text(0), Some("move"));
    assert_eq!(span_text(1), Some("turn left"));
    assert_eq!(span_text(2), Some("repeat 2 {\n  attack\n}"));
    assert_eq!(source_map.span(tree.root()), None);
    Ok(())
}

#[test]
fn test_script_round_trip() -> Result<()> {
    let level = Parser::new(LEVEL).parse_level()?;
    let script = ScriptFormatter.format(&level.program);
    assert!(script.starts_with("program {\n    move\n    repeat 2 {\n        turn left\n    }\n"));

    let reparsed = Parser::new(&format!("grid {{ [2] }}\nstart 0 0 up\n{script}")).parse_level()?;
    assert_eq!(SExpressionFormatter.format(&reparsed.program), LEVEL_SEXPR);
    Ok(())
}

#[test]
fn test_block_kinds() -> Result<()> {
    let (tree, _) = Parser::new("if at_flag { } else { } forever { } break").parse_program()?;
    let kinds: Vec<BlockKind> = tree
        .body(tree.root(), Branch::Then)
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|block| block.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![BlockKind::IfElse, BlockKind::RepeatForever, BlockKind::BreakLoop]
    );
    Ok(())
}

#[test]
fn test_unknown_names() {
    let error = parse_error("grid { [1 2] } start 0 0 sideways program { }");
    assert_eq!(error.kind, ParserErrorKind::UnknownDirection("sideways".into()));
    assert_eq!(error.code(), "PA006");

    let error = parse_error("grid { [1 2] } start 0 0 up program { turn around }");
    assert_eq!(error.kind, ParserErrorKind::UnknownTurn("around".into()));
    assert_eq!(error.code(), "PA007");

    let error = parse_error("grid { [1 2] } start 0 0 up program { if maybe { } }");
    assert_eq!(error.kind, ParserErrorKind::UnknownCondition("maybe".into()));
    assert_eq!(error.code(), "PA005");
}

#[test]
fn test_unexpected_tokens() {
    let error = parse_error("move");
    assert_eq!(error.kind, ParserErrorKind::NonSection(TokenKind::KeywordMove));

    let error = parse_error("grid { [1 2] } start 0 0 up program { grid }");
    assert_eq!(error.kind, ParserErrorKind::NonBlock(TokenKind::KeywordGrid));

    let error = parse_error("grid { [1 x] } start 0 0 up program { }");
    assert_eq!(error.kind, ParserErrorKind::NonNumber(TokenKind::Ident));
    assert_eq!(error.code(), "PA004");

    let error = parse_error("grid { [1 2] } start 0 0 up program { repeat 2 move }");
    assert_eq!(
        error.kind,
        ParserErrorKind::UnexpectedToken {
            actual: TokenKind::KeywordMove,
            expected: TokenKind::LeftBrace
        }
    );
    assert_eq!(error.code(), "PA001");
}

#[test]
fn test_sections() {
    let error = parse_error("grid { [1 2] } grid { [2] } start 0 0 up program { }");
    assert_eq!(
        error.kind,
        ParserErrorKind::DuplicateSection(TokenKind::KeywordGrid)
    );

    let error = parse_error("grid { [1 2] } start 0 0 up");
    assert_eq!(
        error.kind,
        ParserErrorKind::MissingSection(TokenKind::KeywordProgram)
    );
    assert_eq!(error.code(), "PA010");

    let error = parse_error("grid { [1 1] } start 0 0 up program { }");
    assert_eq!(error.kind, ParserErrorKind::MissingGoal);
    assert_eq!(error.code(), "PA011");
}

#[test]
fn test_number_too_large() {
    let error = parse_error("grid { [1 300] } start 0 0 up program { }");
    assert_eq!(error.kind, ParserErrorKind::NumberTooLarge("300".into()));
}

#[test]
fn test_invalid_worlds() {
    let error = parse_error("grid { [1 3] } start 0 0 up goal 0 0 program { }");
    assert_eq!(
        error.kind,
        ParserErrorKind::InvalidWorld(WorldError::InvalidCell {
            position: Position::new(0, 1),
            code: 3
        })
    );
    assert_eq!(error.code(), "PA012");

    let error = parse_error("grid { [1 2] } start 5 5 up program { }");
    assert_eq!(
        error.kind,
        ParserErrorKind::InvalidWorld(WorldError::StartOutOfBounds(Position::new(5, 5)))
    );

    let error = parse_error("grid { [1 1] } start 0 0 up goal 3 0 program { }");
    assert_eq!(
        error.kind,
        ParserErrorKind::InvalidWorld(WorldError::GoalOutOfBounds(Position::new(3, 0)))
    );

    let error = parse_error("grid { } start 0 0 up goal 0 0 program { }");
    assert_eq!(error.kind, ParserErrorKind::InvalidWorld(WorldError::Empty));
}

#[test]
fn test_lexical_errors() {
    let error = parse_error("grid { [1 2] } start 0 0 up program { move $ }");
    let ParserErrorKind::LexicalError(ref lexical) = error.kind else {
        panic!("Expected a lexical error but got {:?}", error.kind);
    };
    assert_eq!(lexical.kind, LexicalErrorKind::Unrecognized('$'));
    assert_eq!(error.code(), "LX001");
}

#[test]
fn test_basic_error_format() {
    let source = "grid { [1 2] }\nstart 0 0 right\nprogram {\n  if sometimes { move }\n}\n";
    let error = parse_error(source);
    assert_eq!(
        BasicFormatter::new(source).format_error(&error),
        "[line 4] Error: Unknown condition sometimes."
    );
}

#[test]
fn test_pretty_error_format() {
    let source = "grid { [1 2] }\nstart 0 0 right\nprogram {\n  if sometimes { move }\n}\n";
    let error = parse_error(source);
    let report = PrettyFormatter::new(source, Path::new("level.maze")).format_error(&error);
    assert!(report.contains("Unknown condition"));
    assert!(report.contains("level.maze"));
}
