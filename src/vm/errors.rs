//! Evaluation errors

use thiserror::Error;

/// Evaluation result
pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("not enough operands for '{0}'")]
    NotEnoughOperands(&'static str),

    #[error("empty expression")]
    EmptyExpression,

    #[error("reduction over an empty operand sequence")]
    EmptyReduction,
}
