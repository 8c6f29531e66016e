//! C-like source parser front end
//!
//! This module turns a flat token stream into an arena-backed AST:
//! - [`lexer`]: token model and a reference tokenizer (source text → tokens)
//! - [`parse`]: the [`parse::Parser`] and its top-level scanner
//! - [`statements`]: `for` loop assembly from header and body tokens
//! - [`expressions`]: sub-parsers for the clauses of a loop header
//! - [`comparator`]: pluggable relational operator lookup
//! - [`ast`]: node definitions and the [`ast::Ast`] arena
//! - [`render`]: indented text rendering of a tree
//!
//! # Supported constructs
//!
//! Only `for (init; condition; update) { body }` is recognised. The clauses
//! are decomposed; the body is kept as raw tokens. Node variants for arrays,
//! structs, macros, `if`, `while`, function declarations and calls exist in
//! the data model but nothing produces them yet.

pub mod ast;
pub mod comparator;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod render;
pub mod statements;
