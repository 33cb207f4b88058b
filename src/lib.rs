//! MathEngine
//!
//! Compiles a textual arithmetic expression into a postfix instruction
//! stream and evaluates it to a single `f32`. Runs of the same operator can
//! be fused into batch-reduction instructions folded by vectorized kernels.
//!
//! # Example
//!
//! ```
//! use mathengine::calculate;
//!
//! let result = calculate("3 + 4 * 2 / (1 - 5)").unwrap();
//! assert_eq!(result, 1.0);
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod frontend;
pub mod vm;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};

pub use frontend::{to_postfix, to_postfix_compact, ParseError};
pub use vm::{evaluate, render_postfix, EvalError, Instruction};

use tracing::debug;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name
pub const NAME: &str = "MathEngine";

/// Top-level calculation error
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Expression engine
///
/// Holds no cross-call state; every [`Engine::calculate`] call builds and
/// drops its own scratch stacks, on the error path too.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    compact: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with run compaction enabled
    pub fn new() -> Self {
        Self { compact: true }
    }

    /// Engine that emits plain scalar postfix, without batch fusion
    pub fn plain() -> Self {
        Self { compact: false }
    }

    /// Compile `expr` to its postfix instruction stream.
    pub fn to_postfix(&self, expr: &str) -> Result<Vec<Instruction>, ParseError> {
        if self.compact {
            frontend::to_postfix_compact(expr)
        } else {
            frontend::to_postfix(expr)
        }
    }

    /// Compile and evaluate `expr`.
    pub fn calculate(&self, expr: &str) -> Result<f32, CalcError> {
        debug!("calculating expression ({} bytes)", expr.len());
        let program = self.to_postfix(expr)?;
        debug!("evaluating {} instructions", program.len());
        let result = vm::evaluate(&program)?;
        Ok(result)
    }
}

/// Calculate an expression with the default (compacting) engine.
///
/// # Example
///
/// ```
/// use mathengine::calculate;
///
/// assert_eq!(calculate("2 + 3 * 4 / 2").unwrap(), 8.0);
/// ```
pub fn calculate(expr: &str) -> Result<f32, CalcError> {
    Engine::new().calculate(expr)
}
