//! Token model and reference lexer for C-like source code
//!
//! The parser consumes a flat [`Token`] sequence. Tokens normally come from an
//! external lexer; [`Lexer`] is a small reference implementation that produces
//! the same shape from source text. `#include` and other preprocessor lines
//! are skipped rather than tokenized.

use rustc_hash::FxHashSet;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Punctuation,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Literal => "literal",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
        };
        f.write_str(name)
    }
}

/// A single lexical unit.
///
/// Delimiters and keywords are recognised by comparing [`Token::value`], so a
/// token built by hand only needs the right text to be matched by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    /// True when the token's text is exactly `text`.
    pub fn is(&self, text: &str) -> bool {
        self.value == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.value)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

const KEYWORDS: &[&str] = &[
    "int", "char", "void", "float", "double", "long", "short", "unsigned", "signed", "struct",
    "const", "if", "else", "while", "do", "for", "switch", "case", "default", "break",
    "continue", "return", "goto", "sizeof", "typedef", "NULL",
];

/// Operators made of two characters, longest-match first.
const TWO_CHAR_OPERATORS: &[&str] = &[
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "==", "!=", "<=", ">=", "&&",
    "||", "<<", ">>", "->",
];

/// Reference lexer for C-like source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashSet<&'static str>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: KEYWORDS.iter().copied().collect(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                break;
            }

            if self.peek() == Some('#') {
                self.skip_preprocessor_directive();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' => self.quoted_literal('"', loc),
            '\'' => self.quoted_literal('\'', loc),
            '0'..='9' => Ok(self.number_literal(ch, loc)),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),
            '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' => {
                Ok(Token::new(TokenKind::Punctuation, ch.to_string(), loc))
            }
            '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~' | '.'
            | '?' | ':' => Ok(self.operator(ch, loc)),
            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    fn operator(&mut self, first: char, loc: SourceLocation) -> Token {
        if let Some(next) = self.peek() {
            let pair: String = [first, next].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.advance();
                return Token::new(TokenKind::Operator, pair, loc);
            }
        }
        Token::new(TokenKind::Operator, first.to_string(), loc)
    }

    /// String or character literal; the lexeme is kept verbatim, quotes included.
    fn quoted_literal(&mut self, quote: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut lexeme = String::new();
        lexeme.push(quote);

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
            lexeme.push(ch);

            if ch == '\\' {
                match self.advance() {
                    Some(escaped) => lexeme.push(escaped),
                    None => break,
                }
            } else if ch == quote {
                return Ok(Token::new(TokenKind::Literal, lexeme, loc));
            }
        }

        let what = if quote == '"' { "string" } else { "character" };
        Err(LexError {
            message: format!("Unterminated {} literal", what),
            location: loc,
        })
    }

    /// Numeric literal (digits, with an optional fractional part)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            let fraction = ch == '.'
                && !num_str.contains('.')
                && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());
            if ch.is_ascii_digit() || fraction {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Literal, num_str, loc)
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if self.keywords.contains(ident.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, ident, loc)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn skip_preprocessor_directive(&mut self) {
        self.skip_line_comment();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
