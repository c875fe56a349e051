use super::error::{Failure, FailureKind};
use super::RunOutcome;
use crate::lexer::LineBreaks;
use crate::parser::SourceMap;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &'static str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &'static str = "Write into buffer should not fail.";

pub trait OutcomeFormatter {
    fn format(&self, outcome: &RunOutcome) -> String;
}

pub struct DebugFormatter;

impl OutcomeFormatter for DebugFormatter {
    fn format(&self, outcome: &RunOutcome) -> String {
        format!("{outcome:?}")
    }
}

pub struct BasicFormatter<'src> {
    source_map: &'src SourceMap,
    line_breaks: LineBreaks,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &str, source_map: &'src SourceMap) -> Self {
        Self {
            source_map,
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl<'src> OutcomeFormatter for BasicFormatter<'src> {
    fn format(&self, outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::Success { position } => format!("Success: reached the goal at {position}"),
            RunOutcome::Failure(failure) => {
                let span = failure.block.and_then(|block| self.source_map.span(block));
                match span {
                    Some(span) => {
                        let line = self.line_breaks.get_line_from_span(span);
                        format!("[line {line}] Failure: {failure}")
                    }
                    None => format!("Failure: {failure}"),
                }
            }
            RunOutcome::Cancelled(reason) => format!("Cancelled: {reason}"),
        }
    }
}

/// Renders failures as a report pointing at the block that caused them.
pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
    source_map: &'src SourceMap,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path, source_map: &'src SourceMap) -> Self {
        Self {
            text,
            path,
            source_map,
        }
    }

    fn format_failure(&self, failure: &Failure) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let range = match failure.block.and_then(|block| self.source_map.span(block)) {
            Some(span) => span.range(),
            None => self.text.len()..self.text.len(),
        };
        let (message, label) = match failure.kind {
            FailureKind::OutOfBounds { from, direction } => (
                "Walked off the grid",
                format!(
                    "Moving {} from {} leaves the grid",
                    direction.fg(Color::BrightYellow),
                    from.fg(Color::BrightCyan)
                ),
            ),
            FailureKind::Blocked { at } => (
                "Walked into a wall",
                format!("The cell at {} is blocked", at.fg(Color::BrightRed)),
            ),
            FailureKind::GoalNotReached { position, goal } => (
                "Program ended before reaching the goal",
                format!(
                    "Stopped at {} but the goal is at {}",
                    position.fg(Color::BrightRed),
                    goal.fg(Color::BrightCyan)
                ),
            ),
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(failure.code())
            .with_message(message)
            .with_label(
                Label::new((path, range))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

impl<'src> OutcomeFormatter for PrettyFormatter<'src> {
    fn format(&self, outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::Success { position } => {
                format!("Reached the goal at {}", position.fg(Color::BrightGreen))
            }
            RunOutcome::Failure(failure) => self.format_failure(failure),
            RunOutcome::Cancelled(reason) => {
                format!("Run cancelled: {}", reason.fg(Color::BrightYellow))
            }
        }
    }
}
