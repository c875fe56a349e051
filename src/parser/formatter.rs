use super::{ParserError, ParserErrorKind};
use crate::lexer::{LexicalErrorKind, LineBreaks};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &'static str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &'static str = "Write into buffer should not fail.";

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugFormatter;

impl ParserFormatter for DebugFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// One line per error, prefixed with the line it occurred on.
pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ParserFormatter for BasicFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] Error: {}", error.kind)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    fn describe(kind: &ParserErrorKind) -> (&'static str, String) {
        match kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token",
                format!(
                    "Expected {} but got {}",
                    expected.fg(Color::BrightCyan),
                    actual.fg(Color::BrightRed)
                ),
            ),
            ParserErrorKind::NonSection(actual) => (
                "Expected a section",
                format!(
                    "{} does not start a grid, start, goal or program section",
                    actual.fg(Color::BrightRed)
                ),
            ),
            ParserErrorKind::NonBlock(actual) => (
                "Expected a block",
                format!("{} is not a block", actual.fg(Color::BrightRed)),
            ),
            ParserErrorKind::NonNumber(actual) => (
                "Expected a number",
                format!("{} is not a number", actual.fg(Color::BrightRed)),
            ),
            ParserErrorKind::UnknownCondition(name) => (
                "Unknown condition",
                format!(
                    "`{}` is not one of front_clear, front_blocked, at_flag or always",
                    name.fg(Color::BrightYellow)
                ),
            ),
            ParserErrorKind::UnknownDirection(name) => (
                "Unknown direction",
                format!(
                    "`{}` is not one of up, down, left or right",
                    name.fg(Color::BrightYellow)
                ),
            ),
            ParserErrorKind::UnknownTurn(name) => (
                "Unknown turn",
                format!("Can not turn `{}`", name.fg(Color::BrightYellow)),
            ),
            ParserErrorKind::NumberTooLarge(value) => (
                "Number out of range",
                format!("{} is too large", value.fg(Color::BrightRed)),
            ),
            ParserErrorKind::DuplicateSection(kind) => (
                "Duplicate section",
                format!("{} was already given", kind.fg(Color::BrightYellow)),
            ),
            ParserErrorKind::MissingSection(kind) => (
                "Missing section",
                format!("Level ends without a {} section", kind.fg(Color::BrightYellow)),
            ),
            ParserErrorKind::MissingGoal => (
                "Missing goal",
                "Add a goal section or mark exactly one cell with 2".into(),
            ),
            ParserErrorKind::InvalidWorld(error) => ("Invalid world", format!("{error}")),
            ParserErrorKind::LexicalError(error) => match error.kind {
                LexicalErrorKind::Unrecognized(c) => (
                    "Unexpected character",
                    format!("{} is not valid here", c.fg(Color::BrightRed)),
                ),
                LexicalErrorKind::UnclosedString => (
                    "Unterminated string",
                    "String starts here but is never closed".into(),
                ),
            },
        }
    }
}

impl<'src> ParserFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        let span = error.span;
        let (message, label) = Self::describe(&error.kind);
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
