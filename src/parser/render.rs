//! Indented text rendering of AST nodes
//!
//! Every node renders as a header line (`<node type>` or `<node type>: <value>`)
//! followed by its sub-nodes one level deeper. Named fields come out in
//! declared order, then any children attached with [`Ast::add_child`].
//! Rendering is a pure walk over the arena and never prints.

use super::ast::{Ast, Node, NodeId, Operand};
use super::lexer::Token;
use std::fmt;

/// Indentation added per tree level
pub const INDENT: &str = "  ";

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pending output of the renderer, popped from an explicit stack
enum Step<'a> {
    Node(NodeId, usize),
    Operand(&'a Operand, usize),
    Line(String),
}

impl Ast {
    /// Render the subtree rooted at `id`, indented by `level` steps.
    ///
    /// Unknown ids render as no lines. The walk keeps its pending work on the
    /// heap, so tree depth is not bounded by the call stack.
    pub fn render(&self, id: NodeId, level: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![Step::Node(id, level)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Node(id, level) => {
                    let mut pending = Vec::new();
                    self.expand(id, level, &mut out, &mut pending);
                    stack.extend(pending.into_iter().rev());
                }
                Step::Operand(Operand::Node(id), level) => stack.push(Step::Node(*id, level)),
                Step::Operand(Operand::Raw(text), level) => {
                    out.push(format!("{}Operand: {}", INDENT.repeat(level), text))
                }
                Step::Line(line) => out.push(line),
            }
        }
        out
    }

    /// The rendering of `id` as one newline-separated string.
    pub fn to_text(&self, id: NodeId) -> String {
        self.render(id, 0).join("\n")
    }

    /// Emit the header line of `id` and queue its contents, in output order.
    fn expand<'a>(
        &'a self,
        id: NodeId,
        level: usize,
        out: &mut Vec<String>,
        pending: &mut Vec<Step<'a>>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        let indent = INDENT.repeat(level);
        match node.value() {
            Some(value) => out.push(format!("{}{}: {}", indent, node.node_type(), value)),
            None => out.push(format!("{}{}", indent, node.node_type())),
        }

        let inner = level + 1;
        let line = |label: &str, tokens: &[Token]| {
            Step::Line(format!("{}{}{}: {}", indent, INDENT, label, join_tokens(tokens)))
        };
        match node {
            Node::Program | Node::Variable { .. } => {}
            Node::Assignment { left, right } | Node::BinaryOperator { left, right, .. } => {
                pending.push(Step::Operand(left, inner));
                pending.push(Step::Operand(right, inner));
            }
            Node::LoopCondition { left, right, .. } => {
                pending.push(line("Left", left));
                pending.push(line("Right", right));
            }
            Node::ForLoop {
                initialization,
                condition,
                update,
                body,
            } => {
                pending.push(Step::Node(*initialization, inner));
                pending.push(Step::Node(*condition, inner));
                pending.push(Step::Node(*update, inner));
                pending.push(line("Body", body));
            }
            Node::Array { elements, .. } => {
                pending.extend(elements.iter().map(|e| Step::Operand(e, inner)));
            }
            Node::Struct { fields, .. } => {
                pending.extend(fields.iter().map(|&f| Step::Node(f, inner)));
            }
            Node::Macro { body, .. } => {
                pending.push(line("Body", body));
            }
            Node::IfStatement {
                condition,
                body,
                else_body,
            } => {
                pending.push(Step::Node(*condition, inner));
                block("Then", body, inner, pending);
                if let Some(else_body) = else_body {
                    block("Else", else_body, inner, pending);
                }
            }
            Node::WhileLoop { condition, body } => {
                pending.push(Step::Node(*condition, inner));
                block("Body", body, inner, pending);
            }
            Node::FunctionDeclaration {
                parameters, body, ..
            } => {
                block("Parameters", parameters, inner, pending);
                block("Body", body, inner, pending);
            }
            Node::FunctionCall { arguments, .. } => {
                pending.extend(arguments.iter().map(|a| Step::Operand(a, inner)));
            }
        }

        pending.extend(self.children(id).iter().map(|&c| Step::Node(c, inner)));
    }
}

/// A labelled line followed by the listed nodes one level deeper.
fn block(label: &str, ids: &[NodeId], level: usize, pending: &mut Vec<Step<'_>>) {
    pending.push(Step::Line(format!("{}{}:", INDENT.repeat(level), label)));
    pending.extend(ids.iter().map(|&id| Step::Node(id, level + 1)));
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(self.root()))
    }
}
