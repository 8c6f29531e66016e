//! Sub-parsers for the clauses of a loop header
//!
//! Each parser takes a bounded token slice and returns the id of the node it
//! allocated, or an error naming the shape it could not handle. Shapes:
//!
//! - variable: `[type, name]` (declaration) or `[name]` (reference)
//! - assignment: `[type?, name, =, value]`
//! - condition: `<left...> <comparator> <right...>`
//! - update: `[name++]`, `[name--]`, `[name, ++]`, `[name, --]` or
//!   `[name, op=, value]`

use super::ast::{Node, NodeId, Operand};
use super::comparator::ComparatorError;
use super::lexer::{SourceLocation, Token};
use super::parse::{ParseError, Parser};

/// Compound assignment operators accepted in an update clause
pub const COMPOUND_ASSIGNMENTS: &[&str] = &["+=", "-=", "*=", "/=", "%=", "&=", "|=", "^="];

/// Arithmetic operator behind a compound assignment (`+=` gives `+`).
fn compound_operator(text: &str) -> Option<&str> {
    if COMPOUND_ASSIGNMENTS.contains(&text) {
        Some(&text[..1])
    } else {
        None
    }
}

/// Split `i++` / `i--` into the identifier and the arithmetic operator.
fn postfix_step(text: &str) -> Option<(&str, &'static str)> {
    let (name, operator) = if let Some(name) = text.strip_suffix("++") {
        (name, "+")
    } else {
        (text.strip_suffix("--")?, "-")
    };
    (!name.is_empty()).then_some((name, operator))
}

impl Parser {
    /// Variable declaration (`int i`) or reference to an existing one (`i`).
    pub fn parse_var(&mut self, tokens: &[Token]) -> Result<NodeId, ParseError> {
        match tokens {
            [var_type, name] => self.add_node(
                Node::Variable {
                    name: name.value.clone(),
                    var_type: Some(var_type.value.clone()),
                },
                var_type.location,
            ),
            [name] => self.add_node(
                Node::Variable {
                    name: name.value.clone(),
                    var_type: None,
                },
                name.location,
            ),
            _ => Err(self.unsupported("variable", tokens)),
        }
    }

    /// Initialization clause. The last token is the value and the one before
    /// it is taken to be `=`; everything ahead of them is the target variable.
    pub fn parse_assign(&mut self, tokens: &[Token]) -> Result<NodeId, ParseError> {
        let Some((value, rest)) = tokens.split_last() else {
            return Err(self.unsupported("assignment", tokens));
        };
        let Some((_, target)) = rest.split_last() else {
            return Err(self.unsupported("assignment", tokens));
        };

        let left = self.parse_var(target)?;
        self.add_node(
            Node::Assignment {
                left: Operand::Node(left),
                right: Operand::raw(value.value.clone()),
            },
            tokens[0].location,
        )
    }

    /// Loop condition split around the comparator found by the configured
    /// [`ComparatorLookup`](super::comparator::ComparatorLookup).
    pub fn parse_condition(&mut self, tokens: &[Token]) -> Result<NodeId, ParseError> {
        let location = self.anchor(tokens);
        let index = self
            .comparators
            .comparator_index(tokens)
            .map_err(|source| ParseError::InvalidCondition { source, location })?;
        let Some(comparator) = tokens.get(index) else {
            return Err(ParseError::InvalidCondition {
                source: ComparatorError::OutOfRange {
                    index,
                    len: tokens.len(),
                },
                location,
            });
        };

        self.add_node(
            Node::LoopCondition {
                left: tokens[..index].to_vec(),
                comparator: comparator.value.clone(),
                right: tokens[index + 1..].to_vec(),
            },
            location,
        )
    }

    /// Update clause, normalised to `name = name <op> value`.
    pub fn parse_operation(&mut self, tokens: &[Token]) -> Result<NodeId, ParseError> {
        match tokens {
            [single] => match postfix_step(&single.value) {
                Some((name, operator)) => self.step_assignment(name, operator, "1", single.location),
                None => Err(self.unsupported("update", tokens)),
            },
            [target, step] if step.is("++") || step.is("--") => {
                let operator = if step.is("++") { "+" } else { "-" };
                self.step_assignment(&target.value, operator, "1", target.location)
            }
            [target, assign, value] => match compound_operator(&assign.value) {
                Some(operator) => {
                    self.step_assignment(&target.value, operator, &value.value, target.location)
                }
                None => Err(self.unsupported("update", tokens)),
            },
            _ => Err(self.unsupported("update", tokens)),
        }
    }

    fn step_assignment(
        &mut self,
        target: &str,
        operator: &str,
        value: &str,
        location: SourceLocation,
    ) -> Result<NodeId, ParseError> {
        let step = self.add_node(
            Node::BinaryOperator {
                operator: operator.to_string(),
                left: Operand::raw(target),
                right: Operand::raw(value),
            },
            location,
        )?;
        self.add_node(
            Node::Assignment {
                left: Operand::raw(target),
                right: Operand::Node(step),
            },
            location,
        )
    }

    /// Location of the first token. An empty slice falls back to the opener
    /// of the clause being parsed, then to the last consumed token.
    fn anchor(&self, tokens: &[Token]) -> SourceLocation {
        tokens
            .first()
            .map(|t| t.location)
            .or(self.clause_start)
            .unwrap_or_else(|| self.previous_location())
    }

    fn unsupported(&self, expression: &'static str, tokens: &[Token]) -> ParseError {
        let found = if tokens.is_empty() {
            "no tokens".to_string()
        } else {
            let text: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
            format!("{} token(s) '{}'", tokens.len(), text.join(" "))
        };
        ParseError::UnsupportedExpressionShape {
            expression,
            found,
            location: self.anchor(tokens),
        }
    }
}
