use super::{BlockId, BlockKind, BlockTree, Branch};
use std::fmt::Write;

const WRITE_FMT_MSG: &'static str =
    "Encountered an error while attempting to write format string to buffer.";
const INDENT: &'static str = "    ";

pub trait BlockFormatter {
    fn format(&self, tree: &BlockTree) -> String;
}

pub struct DebugFormatter;

impl BlockFormatter for DebugFormatter {
    fn format(&self, tree: &BlockTree) -> String {
        format!("{tree:?}")
    }
}

/// Writes a tree as nested s-expressions, one list per block.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_node(tree: &BlockTree, node: BlockId, buffer: &mut String) {
        let Some(block) = tree.get(node) else {
            buffer.push_str("(?)");
            return;
        };

        write!(buffer, "({}", block.kind()).expect(WRITE_FMT_MSG);
        match block.kind() {
            BlockKind::RepeatCount => match block.value() {
                Some(value) => write!(buffer, " {value:?}").expect(WRITE_FMT_MSG),
                None => buffer.push_str(" nil"),
            },
            BlockKind::If | BlockKind::IfElse => {
                write!(buffer, " {}", block.condition()).expect(WRITE_FMT_MSG)
            }
            _ => {}
        }

        if block.kind() == BlockKind::IfElse {
            for branch in [Branch::Then, Branch::Else] {
                write!(buffer, " ({branch}").expect(WRITE_FMT_MSG);
                for &child in block.body(branch) {
                    buffer.push(' ');
                    Self::format_node(tree, child, buffer);
                }
                buffer.push(')');
            }
        } else {
            for &child in block.children() {
                buffer.push(' ');
                Self::format_node(tree, child, buffer);
            }
        }
        buffer.push(')');
    }
}

impl BlockFormatter for SExpressionFormatter {
    fn format(&self, tree: &BlockTree) -> String {
        let mut buffer = String::new();
        Self::format_node(tree, tree.root(), &mut buffer);
        buffer
    }
}

/// Writes a tree back out as the `program` section of a level file.
pub struct ScriptFormatter;

impl ScriptFormatter {
    fn format_body(tree: &BlockTree, body: &[BlockId], depth: usize, buffer: &mut String) {
        buffer.push_str("{\n");
        for &child in body {
            Self::format_node(tree, child, depth + 1, buffer);
        }
        buffer.push_str(&INDENT.repeat(depth));
        buffer.push('}');
    }

    fn format_node(tree: &BlockTree, node: BlockId, depth: usize, buffer: &mut String) {
        let Some(block) = tree.get(node) else {
            return;
        };
        buffer.push_str(&INDENT.repeat(depth));
        match block.kind() {
            BlockKind::Start => {
                buffer.push_str("program ");
                Self::format_body(tree, block.children(), depth, buffer);
            }
            BlockKind::MoveForward => buffer.push_str("move"),
            BlockKind::TurnLeft => buffer.push_str("turn left"),
            BlockKind::TurnRight => buffer.push_str("turn right"),
            BlockKind::Attack => buffer.push_str("attack"),
            BlockKind::BreakLoop => buffer.push_str("break"),
            BlockKind::ContinueLoop => buffer.push_str("continue"),
            BlockKind::RepeatCount => {
                buffer.push_str("repeat ");
                match block.value() {
                    Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                        write!(buffer, "{value} ").expect(WRITE_FMT_MSG)
                    }
                    Some(value) => write!(buffer, "\"{value}\" ").expect(WRITE_FMT_MSG),
                    None => {}
                }
                Self::format_body(tree, block.children(), depth, buffer);
            }
            BlockKind::RepeatForever => {
                buffer.push_str("forever ");
                Self::format_body(tree, block.children(), depth, buffer);
            }
            BlockKind::If | BlockKind::IfElse => {
                write!(buffer, "if {} ", block.condition().keyword()).expect(WRITE_FMT_MSG);
                Self::format_body(tree, block.children(), depth, buffer);
                if block.kind() == BlockKind::IfElse {
                    buffer.push_str(" else ");
                    Self::format_body(tree, block.else_children(), depth, buffer);
                }
            }
        }
        buffer.push('\n');
    }
}

impl BlockFormatter for ScriptFormatter {
    fn format(&self, tree: &BlockTree) -> String {
        let mut buffer = String::new();
        Self::format_node(tree, tree.root(), 0, &mut buffer);
        buffer
    }
}
