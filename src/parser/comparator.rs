//! Relational operator lookup
//!
//! Locating the comparator of a loop condition is delegated through
//! [`ComparatorLookup`] so callers can plug in their own rules. The default,
//! [`RelationalOperators`], accepts exactly one of `<`, `<=`, `>`, `>=`, `==`
//! or `!=` per condition.

use super::lexer::Token;

pub const RELATIONAL_OPERATORS: &[&str] = &["<", "<=", ">", ">=", "==", "!="];

/// Why a comparator could not be located
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparatorError {
    #[error("no relational operator in condition")]
    Missing,

    #[error("{count} relational operators in condition, expected one")]
    Ambiguous { count: usize },

    #[error("comparator index {index} is outside a condition of {len} tokens")]
    OutOfRange { index: usize, len: usize },
}

/// Finds the index of the comparator token within a condition
pub trait ComparatorLookup {
    fn comparator_index(&self, tokens: &[Token]) -> Result<usize, ComparatorError>;
}

/// Default lookup over [`RELATIONAL_OPERATORS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationalOperators;

impl ComparatorLookup for RelationalOperators {
    fn comparator_index(&self, tokens: &[Token]) -> Result<usize, ComparatorError> {
        let mut found = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| RELATIONAL_OPERATORS.contains(&t.value.as_str()))
            .map(|(i, _)| i);

        match (found.next(), found.count()) {
            (None, _) => Err(ComparatorError::Missing),
            (Some(index), 0) => Ok(index),
            (Some(_), rest) => Err(ComparatorError::Ambiguous { count: rest + 1 }),
        }
    }
}

impl<F> ComparatorLookup for F
where
    F: Fn(&[Token]) -> Result<usize, ComparatorError>,
{
    fn comparator_index(&self, tokens: &[Token]) -> Result<usize, ComparatorError> {
        self(tokens)
    }
}
