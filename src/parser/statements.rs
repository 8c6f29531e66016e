//! `for` loop assembly
//!
//! The scanner hands over the header (starting at its `(`) and the raw body.
//! The header is split into its three `;`-separated clauses, each clause goes
//! to its sub-parser, and the results become the fields of a
//! [`Node::ForLoop`]. The body is kept as tokens and not parsed further.

use super::ast::{Node, NodeId};
use super::lexer::{SourceLocation, Token};
use super::parse::{ParseError, Parser};

/// One `;`-separated clause of a loop header
#[derive(Debug, Clone, Copy)]
pub struct Clause<'a> {
    /// The `(` or `;` right before the clause; locates errors in empty clauses.
    pub opener: &'a Token,
    pub tokens: &'a [Token],
}

/// Split the header tokens following `open` on `;`. Leading and inner empty
/// clauses are kept; an empty clause after the final `;` is dropped.
pub fn split_clauses<'a>(open: &'a Token, tokens: &'a [Token]) -> Vec<Clause<'a>> {
    let mut clauses = Vec::new();
    let mut opener = open;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.is(";") {
            clauses.push(Clause {
                opener,
                tokens: &tokens[start..i],
            });
            opener = token;
            start = i + 1;
        }
    }

    let rest = &tokens[start..];
    if !rest.is_empty() {
        clauses.push(Clause {
            opener,
            tokens: rest,
        });
    }
    clauses
}

impl Parser {
    /// Build a for-loop node from its header and body.
    ///
    /// `header` must start with the opening `(`; the closing `)` is not part
    /// of it. `location` is where the loop keyword appeared.
    pub fn parse_for_loop(
        &mut self,
        header: &[Token],
        body: Vec<Token>,
        location: SourceLocation,
    ) -> Result<NodeId, ParseError> {
        let Some((open, clauses)) = header.split_first() else {
            return Err(ParseError::MalformedForHeader {
                reason: "empty header".to_string(),
                location,
            });
        };
        if !open.is("(") {
            return Err(ParseError::MalformedForHeader {
                reason: format!("expected '(' after 'for', found {}", open),
                location: open.location,
            });
        }

        let groups = split_clauses(open, clauses);
        let [init, condition, update] = groups.as_slice() else {
            return Err(ParseError::MalformedForHeader {
                reason: format!(
                    "expected 3 ';'-separated clauses, found {}",
                    groups.len()
                ),
                location: open.location,
            });
        };

        let initialization = self.parse_clause(init, Self::parse_assign)?;
        let condition = self.parse_clause(condition, Self::parse_condition)?;
        let update = self.parse_clause(update, Self::parse_operation)?;

        self.add_node(
            Node::ForLoop {
                initialization,
                condition,
                update,
                body,
            },
            location,
        )
    }

    /// Run a sub-parser on one clause, anchoring empty-clause errors at the
    /// clause's opening delimiter.
    fn parse_clause(
        &mut self,
        clause: &Clause<'_>,
        sub_parser: fn(&mut Self, &[Token]) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        self.clause_start = Some(clause.opener.location);
        let result = sub_parser(self, clause.tokens);
        self.clause_start = None;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    fn clause_lengths(header: &str) -> Vec<usize> {
        let tokens = lex(header);
        let (open, rest) = tokens.split_first().unwrap();
        split_clauses(open, rest)
            .iter()
            .map(|c| c.tokens.len())
            .collect()
    }

    #[test]
    fn test_split_clauses() {
        assert_eq!(clause_lengths("(int i = 0; i < 10; i++"), vec![4, 3, 2]);
        assert_eq!(clause_lengths("(; i < 3; i++"), vec![0, 3, 2]);
        assert_eq!(clause_lengths("(;;"), vec![0, 0]);
        assert_eq!(clause_lengths("(a; b; c;"), vec![1, 1, 1]);
        assert_eq!(clause_lengths("(int i = 0; i < 10;"), vec![4, 3]);
        assert!(clause_lengths("(").is_empty());
    }

    #[test]
    fn test_clause_openers() {
        let tokens = lex("(; i < 3; i++");
        let (open, rest) = tokens.split_first().unwrap();
        let clauses = split_clauses(open, rest);

        assert!(clauses[0].opener.is("("));
        assert_eq!(clauses[1].opener.location, SourceLocation::new(1, 2));
        assert_eq!(clauses[2].opener.location, SourceLocation::new(1, 9));
    }

    #[test]
    fn test_empty_clause_error_points_into_header() {
        let mut parser = Parser::from_tokens(Vec::new());
        let err = parser
            .parse_for_loop(&lex("(; i < 3; i++"), lex("{ x; }"), SourceLocation::new(1, 1))
            .unwrap_err();

        assert!(matches!(
            err,
            ParseError::UnsupportedExpressionShape {
                expression: "assignment",
                ..
            }
        ));
        assert_eq!(err.location(), SourceLocation::new(1, 1));

        let err = parser
            .parse_for_loop(&lex("(i = 0;; i++"), Vec::new(), SourceLocation::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidCondition { .. }));
        assert_eq!(err.location(), SourceLocation::new(1, 7));
    }

    #[test]
    fn test_trailing_semicolon_in_header() {
        let mut parser = Parser::from_tokens(Vec::new());
        let id = parser
            .parse_for_loop(&lex("(int i = 0; i < 10; i++;"), Vec::new(), SourceLocation::new(1, 1))
            .unwrap();
        assert!(matches!(parser.ast().node(id), Some(Node::ForLoop { .. })));

        let err = parser
            .parse_for_loop(&lex("(int i = 0; i < 10;"), Vec::new(), SourceLocation::new(1, 1))
            .unwrap_err();
        assert!(
            matches!(err, ParseError::MalformedForHeader { ref reason, .. } if reason.contains("found 2"))
        );
    }

    #[test]
    fn test_parse_for_loop_fields() {
        let mut parser = Parser::from_tokens(Vec::new());
        let header = lex("(int i = 0; i < 10; i++");
        let body = lex("{ x; }");
        let id = parser
            .parse_for_loop(&header, body.clone(), SourceLocation::new(3, 5))
            .unwrap();

        let ast = parser.ast();
        assert_eq!(ast.location(id), Some(SourceLocation::new(3, 5)));
        let Some(Node::ForLoop {
            initialization,
            condition,
            update,
            body: kept,
        }) = ast.node(id)
        else {
            panic!("Expected for loop");
        };
        assert_eq!(kept, &body);
        for field in [*initialization, *condition, *update] {
            assert_eq!(ast.parent(field), Some(id));
        }
        assert!(matches!(ast.node(*condition), Some(Node::LoopCondition { .. })));
    }

    #[test]
    fn test_wrong_clause_count() {
        let mut parser = Parser::from_tokens(Vec::new());
        let loc = SourceLocation::new(1, 1);

        let err = parser
            .parse_for_loop(&lex("(int i = 0; i < 10"), Vec::new(), loc)
            .unwrap_err();
        assert!(
            matches!(err, ParseError::MalformedForHeader { ref reason, .. } if reason.contains("found 2"))
        );

        let err = parser
            .parse_for_loop(&lex("(a; b; c; d"), Vec::new(), loc)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedForHeader { .. }));
    }

    #[test]
    fn test_header_must_open_with_paren() {
        let mut parser = Parser::from_tokens(Vec::new());
        let err = parser
            .parse_for_loop(&lex("int i = 0; i < 1; i++"), Vec::new(), SourceLocation::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedForHeader { .. }));

        let err = parser
            .parse_for_loop(&[], Vec::new(), SourceLocation::new(4, 2))
            .unwrap_err();
        assert_eq!(err.location(), SourceLocation::new(4, 2));
    }
}
