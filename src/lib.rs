//! # Introduction
//!
//! cforge is the front-end core of a small C-like language processor. It scans
//! a token stream for `for` loops, decomposes each loop header into
//! initialization, condition and update nodes, and renders the resulting tree
//! as indented text.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Ast (arena) → Renderer
//! ```
//!
//! 1. [`parser::lexer`] — the [`Token`] boundary type, plus a reference lexer
//!    for callers that do not bring their own.
//! 2. [`parser::parse`] — the [`Parser`]: delimits each loop and collects
//!    the results under a single Program root.
//! 3. [`parser::ast`] — the [`Ast`] arena; nodes refer to each other by
//!    [`NodeId`] so the tree cannot contain cycles.
//! 4. [`parser::render`] — `Ast::render` / `Ast::to_text`.
//!
//! ```
//! use cforge::Parser;
//!
//! let mut parser = Parser::new("for(int i = 0; i < 10; i++){ sum += i; }")?;
//! parser.parse_program()?;
//! assert_eq!(parser.ast().for_loops().count(), 1);
//! # Ok::<(), cforge::ParseError>(())
//! ```
//!
//! Parsing emits `tracing` events at debug and trace level; installing a
//! subscriber is up to the caller.

pub mod parser;

pub use parser::ast::{Ast, AstError, Node, NodeId, Operand};
pub use parser::comparator::{ComparatorError, ComparatorLookup, RelationalOperators};
pub use parser::lexer::{Lexer, SourceLocation, Token, TokenKind};
pub use parser::parse::{DelimiterMode, ParseError, ParseOptions, Parser};
