//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its error and option types, and
//! the top-level scanner that walks the token stream once looking for loops.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, delimiter matching and the scan loop
//! - `statements`: splitting a `for` header and assembling the loop node
//! - `expressions`: sub-parsers for variables, assignments, conditions and
//!   update operations
//!
//! Parser methods are split across these files using `impl Parser` blocks, so
//! each one can allocate into the shared [`Ast`] arena.

use super::ast::{Ast, AstError, Node, NodeId};
use super::comparator::{ComparatorError, ComparatorLookup, RelationalOperators};
use super::lexer::{LexError, Lexer, SourceLocation, Token};
use tracing::{debug, trace};

/// Parser error type
///
/// Every variant carries the location of the offending token so callers can
/// report where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A `for` header or body ran past the end of the token stream. The
    /// location is the last token consumed before giving up.
    #[error("Unterminated {construct} at {location}: expected '{expected}'")]
    UnterminatedConstruct {
        construct: &'static str,
        expected: &'static str,
        location: SourceLocation,
    },

    #[error("Malformed for header at {location}: {reason}")]
    MalformedForHeader {
        reason: String,
        location: SourceLocation,
    },

    #[error("Unsupported {expression} shape at {location}: {found}")]
    UnsupportedExpressionShape {
        expression: &'static str,
        found: String,
        location: SourceLocation,
    },

    #[error("Invalid condition at {location}: {source}")]
    InvalidCondition {
        #[source]
        source: ComparatorError,
        location: SourceLocation,
    },

    #[error("Invalid tree at {location}: {source}")]
    Tree {
        #[source]
        source: AstError,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lex(err) => err.location,
            ParseError::UnterminatedConstruct { location, .. }
            | ParseError::MalformedForHeader { location, .. }
            | ParseError::UnsupportedExpressionShape { location, .. }
            | ParseError::InvalidCondition { location, .. }
            | ParseError::Tree { location, .. } => *location,
        }
    }
}

/// How closing delimiters of a loop header and body are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterMode {
    /// Track nesting depth; stop at the delimiter that closes the opener.
    #[default]
    Balanced,
    /// Stop at the first `)` / `}` regardless of nesting. Nested parentheses
    /// in a header or nested braces in a body cut the construct short.
    Lexical,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiters: DelimiterMode,
    /// Keyword text that starts a loop construct
    pub loop_keyword: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiters: DelimiterMode::default(),
            loop_keyword: "for".to_string(),
        }
    }
}

impl ParseOptions {
    pub fn with_delimiters(mut self, delimiters: DelimiterMode) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_loop_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.loop_keyword = keyword.into();
        self
    }
}

/// Scanner and parser for `for` loops in a C-like token stream
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) ast: Ast,
    pub(crate) options: ParseOptions,
    pub(crate) comparators: Box<dyn ComparatorLookup>,
    /// Opening delimiter of the header clause being parsed
    pub(crate) clause_start: Option<SourceLocation>,
}

impl Parser {
    /// Tokenize `source` with the reference [`Lexer`] and prepare to parse it.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Parse tokens produced by an external lexer.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            ast: Ast::new(),
            options: ParseOptions::default(),
            comparators: Box::new(RelationalOperators),
            clause_start: None,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_comparator_lookup(mut self, lookup: impl ComparatorLookup + 'static) -> Self {
        self.comparators = Box::new(lookup);
        self
    }

    /// Scan the whole token stream and attach one node per recognised loop to
    /// the Program root, in source order.
    ///
    /// Parsing stops at the first error. Loops parsed before it stay attached
    /// and remain visible through [`Parser::ast`]; nothing of the failing loop
    /// is kept.
    pub fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let root = self.ast.root();

        while !self.is_at_end() {
            if self.peek().is(&self.options.loop_keyword) {
                let mark = self.ast.node_count();
                match self.parse_loop_construct() {
                    Ok(node) => {
                        let location = self.ast.location(node).unwrap_or_default();
                        self.ast
                            .add_child(root, node)
                            .map_err(|source| ParseError::Tree { source, location })?;
                    }
                    Err(err) => {
                        self.ast.truncate(mark);
                        return Err(err);
                    }
                }
            } else {
                self.advance();
            }
        }

        Ok(root)
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Delimit header and body of the loop at the cursor and parse them.
    fn parse_loop_construct(&mut self) -> Result<NodeId, ParseError> {
        let keyword = self.advance().location;
        debug!(line = keyword.line, column = keyword.column, "found for loop");

        let header = self.collect_header()?;
        let body = self.collect_body()?;
        trace!(
            header = header.len(),
            body = body.len(),
            "delimited for loop"
        );

        let node = self.parse_for_loop(&header, body, keyword)?;
        debug!(node, "parsed for loop");
        Ok(node)
    }

    /// Tokens from the opening `(` up to, but excluding, the closing `)`.
    /// The closing token is consumed.
    fn collect_header(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut header = Vec::new();
        let mut depth = 0usize;

        loop {
            let token = self.next_or_unterminated("for header", ")")?;
            match self.options.delimiters {
                DelimiterMode::Lexical if token.is(")") => break,
                DelimiterMode::Balanced if token.is("(") => depth += 1,
                DelimiterMode::Balanced if token.is(")") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            header.push(token);
        }

        Ok(header)
    }

    /// Tokens starting right after the header up to and including the `}`
    /// that ends the body.
    fn collect_body(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut body = Vec::new();
        let mut depth = 0usize;

        loop {
            let token = self.next_or_unterminated("for body", "}")?;
            let done = match self.options.delimiters {
                DelimiterMode::Lexical => token.is("}"),
                DelimiterMode::Balanced if token.is("{") => {
                    depth += 1;
                    false
                }
                DelimiterMode::Balanced if token.is("}") => {
                    depth = depth.saturating_sub(1);
                    depth == 0
                }
                DelimiterMode::Balanced => false,
            };
            body.push(token);
            if done {
                break;
            }
        }

        Ok(body)
    }

    fn next_or_unterminated(
        &mut self,
        construct: &'static str,
        expected: &'static str,
    ) -> Result<Token, ParseError> {
        if self.is_at_end() {
            return Err(ParseError::UnterminatedConstruct {
                construct,
                expected,
                location: self.previous_location(),
            });
        }
        Ok(self.advance().clone())
    }

    // ===== Helper methods =====

    pub(crate) fn add_node(
        &mut self,
        node: Node,
        location: SourceLocation,
    ) -> Result<NodeId, ParseError> {
        self.ast
            .add(node, location)
            .map_err(|source| ParseError::Tree { source, location })
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Current token; callers check [`Parser::is_at_end`] first.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.position];
        self.position += 1;
        token
    }

    /// Location of the last consumed token, or of the start of input.
    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.location)
            .unwrap_or_else(|| SourceLocation::new(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Ast, ParseError> {
        let mut parser = Parser::new(source)?;
        parser.parse_program()?;
        Ok(parser.into_ast())
    }

    #[test]
    fn test_no_loop_yields_empty_program() {
        let ast = parse("int main() { int x = 1; return x; }").unwrap();
        assert!(ast.children(ast.root()).is_empty());
    }

    #[test]
    fn test_loops_attached_in_source_order() {
        let ast = parse(
            "for(int i = 0; i < 3; i++){ a; } x = 1; for(j = 9; j > 0; j -= 2){ b; }",
        )
        .unwrap();

        let loops: Vec<NodeId> = ast.for_loops().collect();
        assert_eq!(loops.len(), 2);
        assert_eq!(ast.children(ast.root()), loops.as_slice());
        assert_eq!(ast.location(loops[0]), Some(SourceLocation::new(1, 1)));
        for &id in &loops {
            assert_eq!(ast.parent(id), Some(ast.root()));
        }
    }

    #[test]
    fn test_body_includes_braces() {
        let ast = parse("for(int i = 0; i < 10; i++){ sum += i; }").unwrap();
        let id = ast.for_loops().next().unwrap();
        match ast.node(id) {
            Some(Node::ForLoop { body, .. }) => {
                let text: Vec<&str> = body.iter().map(|t| t.value.as_str()).collect();
                assert_eq!(text, vec!["{", "sum", "+=", "i", ";", "}"]);
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_header() {
        let err = parse("for(int i = 0; i < 10; i++").unwrap_err();
        match err {
            ParseError::UnterminatedConstruct {
                construct,
                location,
                ..
            } => {
                assert_eq!(construct, "for header");
                assert_eq!(location, SourceLocation::new(1, 25));
            }
            other => panic!("Expected unterminated header, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_body() {
        let err = parse("for(int i = 0; i < 10; i++){ x;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnterminatedConstruct {
                construct: "for body",
                ..
            }
        ));
        assert_eq!(err.location(), SourceLocation::new(1, 31));
    }

    #[test]
    fn test_failure_keeps_earlier_loops_only() {
        let mut parser =
            Parser::new("for(int i = 0; i < 2; i++){ a; } for(int j = 0; j < 2){ b; }").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(err, ParseError::MalformedForHeader { .. }));

        let ast = parser.ast();
        assert_eq!(ast.for_loops().count(), 1);
        let rendered = ast.to_string();
        assert!(rendered.contains("Body: { a ; }"));
        assert!(!rendered.contains("Variable: j"));
        assert_eq!(ast.node_count(), 1 + 6);
    }

    #[test]
    fn test_custom_loop_keyword_and_comparator() {
        let options = ParseOptions::default().with_loop_keyword("loop");
        let first = |_: &[Token]| -> Result<usize, ComparatorError> { Ok(0) };
        let mut parser = Parser::new("loop(i = 0; < i; i++){ }")
            .unwrap()
            .with_options(options)
            .with_comparator_lookup(first);
        parser.parse_program().unwrap();

        let ast = parser.ast();
        let id = ast.for_loops().next().unwrap();
        let Some(Node::ForLoop { condition, .. }) = ast.node(id) else {
            panic!("Expected for loop");
        };
        assert_eq!(
            ast.render(*condition, 0),
            vec!["Loop Condition: <", "  Left: ", "  Right: i"]
        );
    }
}
