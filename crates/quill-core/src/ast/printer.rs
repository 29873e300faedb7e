//! Depth-first indentation printer for syntax trees.
//!
//! Each node prints its kind tag on its own line, then its children one
//! level deeper. Sequence children flatten into the current level, literal
//! children print verbatim and absent children print nothing. One level is
//! two spaces.

use std::fmt::Write as _;

use super::{Child, Node};

const INDENT: &str = "  ";

/// Render `node` and its subtree, one line per entry.
pub(super) fn render(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

fn write_node(out: &mut String, node: &Node, level: usize) {
    write_line(out, node.kind().as_str(), level);
    for child in node.children() {
        write_child(out, child, level + 1);
    }
}

fn write_child(out: &mut String, child: &Child, level: usize) {
    match child {
        Child::Node(node) => write_node(out, node, level),
        Child::Literal(text) => write_line(out, text, level),
        Child::Sequence(items) => {
            for item in items {
                write_child(out, item, level);
            }
        }
        Child::Absent => {}
    }
}

fn write_line(out: &mut String, text: &str, level: usize) {
    writeln!(out, "{}{}", INDENT.repeat(level), text)
        .expect("Writing to String buffer is infallible");
}
