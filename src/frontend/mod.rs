//! Expression front end
//!
//! This module tokenizes an infix expression and converts it to a postfix
//! instruction stream, optionally fusing same-operator runs into batch
//! reductions on the way out.

use thiserror::Error;
use tracing::debug;

use crate::vm::Instruction;

pub mod scanner;
pub mod table;

mod compactor;
mod shunting;

/// Conversion error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty scan window")]
    EmptySpan,

    #[error("incorrect number '{0}'")]
    IncorrectNumber(String),

    #[error("double separator in number '{0}'")]
    DoubleSeparator(String),

    #[error("unexpected end of number '{0}'")]
    UnexpectedEndOfNumber(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("the operator stack is empty")]
    OperatorStackEmpty,

    #[error("mismatched parentheses: no matching '('")]
    MismatchedParentheses,

    #[error("mismatched parentheses: unclosed '(' at end of input")]
    UnbalancedParentheses,

    #[error("unrecognized token '{0}'")]
    UnrecognizedToken(char),

    /// Compaction accumulator left in an invalid state; an implementation
    /// defect, not a user input error.
    #[error("invalid compaction sequence: {0}")]
    InvalidSequence(&'static str),
}

/// Convert an infix expression to plain scalar postfix.
pub fn to_postfix(expr: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut out = Vec::new();
    let mut sink = shunting::Direct;
    shunting::convert(expr, &mut sink, &mut out)?;
    debug!("converted {} bytes into {} instructions", expr.len(), out.len());
    Ok(out)
}

/// Convert an infix expression to postfix with same-kind operator runs
/// fused into batch reductions.
pub fn to_postfix_compact(expr: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut out = Vec::new();
    let mut sink = compactor::Compactor::new();
    shunting::convert(expr, &mut sink, &mut out)?;
    debug!(
        "converted {} bytes into {} compacted instructions",
        expr.len(),
        out.len()
    );
    Ok(out)
}
