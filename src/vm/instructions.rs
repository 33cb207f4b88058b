//! Postfix instruction stream
//!
//! Closed instruction sum type plus the textual rendering used for
//! diagnostics and tests.

use smallvec::SmallVec;

use super::kernels::ReductionOp;
use crate::frontend::table::{Function, Operator};

/// Literal tail of a batch reduction, inline up to four operands.
pub type BatchValues = SmallVec<[f32; 4]>;

/// A fused run of one foldable operator.
///
/// `values` holds the literal operands in source order; the remaining
/// `operand_count - values.len()` operands are popped from the operand stack
/// at evaluation time and come first in the fold.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReduction {
    pub op: ReductionOp,
    pub operand_count: usize,
    pub values: BatchValues,
}

/// Postfix stream element
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Push a literal
    Number(f32),
    /// Pop two operands, apply, push the result
    Operator(&'static Operator),
    /// Pop `arity` operands, apply, push the result
    Function(&'static Function),
    /// Fold a fused operand run with a reduction kernel
    Reduce(BatchReduction),
}

/// Render a postfix stream as space-separated tokens.
///
/// Numbers print as their value, operators and functions as their pattern
/// text, and a batch reduction as its literal values in left-to-right order
/// followed by `S<pattern>(<count>)` carrying the total operand count.
pub fn render_postfix(program: &[Instruction]) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for instruction in program {
        match instruction {
            Instruction::Number(value) => tokens.push(value.to_string()),
            Instruction::Operator(op) => tokens.push(op.pattern.to_string()),
            Instruction::Function(func) => tokens.push(func.pattern.to_string()),
            Instruction::Reduce(batch) => {
                for value in &batch.values {
                    tokens.push(value.to_string());
                }
                tokens.push(format!("S{}({})", batch.op.pattern(), batch.operand_count));
            }
        }
    }
    tokens.join(" ")
}
