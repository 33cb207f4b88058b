//! Postfix evaluation
//!
//! Stack machine over the instruction stream. Batch reductions reconstruct
//! the exact left-to-right operand order before handing off to a kernel.

use smallvec::SmallVec;
use tracing::debug;

use super::errors::{EvalError, EvalResult};
use super::instructions::Instruction;
use crate::frontend::table::FnKind;

/// Evaluate a postfix program to a single value.
///
/// The operand stack lives for this call only; every exit path drops it.
pub fn evaluate(program: &[Instruction]) -> EvalResult<f32> {
    let mut stack: SmallVec<[f32; 16]> = SmallVec::new();

    for instruction in program {
        match instruction {
            Instruction::Number(value) => stack.push(*value),

            Instruction::Operator(op) => {
                let (b, a) = match (stack.pop(), stack.pop()) {
                    (Some(b), Some(a)) => (b, a),
                    _ => return Err(EvalError::NotEnoughOperands(op.pattern)),
                };
                stack.push(op.kind.apply(a, b));
            }

            Instruction::Function(func) => {
                if stack.len() < func.arity {
                    return Err(EvalError::NotEnoughOperands(func.pattern));
                }
                let result = match func.kind {
                    FnKind::Sin => {
                        let a = stack
                            .pop()
                            .ok_or(EvalError::NotEnoughOperands(func.pattern))?;
                        a.sin()
                    }
                };
                stack.push(result);
            }

            Instruction::Reduce(batch) => {
                let needed = batch.operand_count.saturating_sub(batch.values.len());
                if stack.len() < needed {
                    return Err(EvalError::NotEnoughOperands(batch.op.pattern()));
                }
                let split = stack.len() - needed;
                let mut operands: SmallVec<[f32; 8]> =
                    SmallVec::with_capacity(batch.operand_count);
                // drain preserves push order, so the stack-sourced head is
                // already left-to-right
                operands.extend(stack.drain(split..));
                operands.extend_from_slice(&batch.values);
                let result = batch
                    .op
                    .reduce(&operands)
                    .ok_or(EvalError::EmptyReduction)?;
                stack.push(result);
            }
        }
    }

    let result = stack.pop().ok_or(EvalError::EmptyExpression)?;
    debug!(
        "evaluated {} instructions, {} operands left",
        program.len(),
        stack.len()
    );
    Ok(result)
}
