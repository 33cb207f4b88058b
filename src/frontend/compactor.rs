//! Streaming sequence compaction
//!
//! Fuses runs of the same foldable binary operator over plain numbers into a
//! single batch-reduction instruction while the converter is still emitting.
//! The accumulator is bounded by the longest current run; nothing else is
//! buffered.

use smallvec::SmallVec;

use super::shunting::Sink;
use super::table::{Function, OpKind, Operator};
use super::ParseError;
use crate::vm::{BatchReduction, BatchValues, Instruction};

/// Accumulator state.
///
/// `Chain` tracks one run of a single operator kind: `values` is the literal
/// tail in source order, `stack_operands` counts operands the evaluator will
/// pop ahead of the tail, and `pending` holds a number that is not yet
/// committed to the run (it either becomes the next tail value or seeds the
/// next run).
#[derive(Debug)]
enum State {
    Empty,
    Holding(f32),
    Chain {
        kind: OpKind,
        values: BatchValues,
        stack_operands: usize,
        pending: Option<f32>,
    },
}

/// Streaming compactor, sitting between converter and output.
#[derive(Debug)]
pub(crate) struct Compactor {
    state: State,
}

impl Compactor {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Empty,
        }
    }

    fn take(&mut self) -> State {
        std::mem::replace(&mut self.state, State::Empty)
    }

    /// Write a finished run out as a batch instruction, or as the scalar
    /// operator when both operands of a bare binary operation are already on
    /// the evaluator stack.
    fn flush_chain(
        kind: OpKind,
        values: BatchValues,
        stack_operands: usize,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError> {
        let Some(op) = kind.reduction() else {
            return Err(ParseError::InvalidSequence("run over a non-foldable operator"));
        };
        let operand_count = stack_operands + values.len();
        if operand_count < 2 {
            return Err(ParseError::InvalidSequence("run shorter than two operands"));
        }
        if values.is_empty() && operand_count == 2 {
            out.push(Instruction::Operator(kind.operator()));
            return Ok(());
        }
        out.push(Instruction::Reduce(BatchReduction {
            op,
            operand_count,
            values,
        }));
        Ok(())
    }
}

impl Sink for Compactor {
    fn number(&mut self, value: f32, out: &mut Vec<Instruction>) -> Result<(), ParseError> {
        self.state = match self.take() {
            State::Empty => State::Holding(value),
            State::Holding(prev) => {
                out.push(Instruction::Number(prev));
                State::Holding(value)
            }
            State::Chain {
                kind,
                values,
                stack_operands,
                pending: None,
            } => State::Chain {
                kind,
                values,
                stack_operands,
                pending: Some(value),
            },
            State::Chain {
                kind,
                values,
                stack_operands,
                pending: Some(prev),
            } => {
                // two uncommitted numbers in a row: a nested subexpression
                // starts, the run is over
                Self::flush_chain(kind, values, stack_operands, out)?;
                out.push(Instruction::Number(prev));
                State::Holding(value)
            }
        };
        Ok(())
    }

    fn operator(
        &mut self,
        op: &'static Operator,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError> {
        let foldable = op.kind.reduction().is_some();
        self.state = match self.take() {
            State::Empty => {
                if foldable {
                    // both operands are earlier results on the evaluator stack
                    State::Chain {
                        kind: op.kind,
                        values: SmallVec::new(),
                        stack_operands: 2,
                        pending: None,
                    }
                } else {
                    out.push(Instruction::Operator(op));
                    State::Empty
                }
            }
            State::Holding(prev) => {
                if foldable {
                    let mut values = SmallVec::new();
                    values.push(prev);
                    State::Chain {
                        kind: op.kind,
                        values,
                        stack_operands: 1,
                        pending: None,
                    }
                } else {
                    out.push(Instruction::Number(prev));
                    out.push(Instruction::Operator(op));
                    State::Empty
                }
            }
            State::Chain {
                kind,
                mut values,
                stack_operands,
                pending,
            } => {
                if foldable && op.kind == kind {
                    match pending {
                        Some(p) => {
                            // the uncommitted number is this operator's right
                            // operand; the run keeps growing
                            values.push(p);
                            State::Chain {
                                kind,
                                values,
                                stack_operands,
                                pending: None,
                            }
                        }
                        None if kind != OpKind::Subtraction => {
                            // a subexpression result joins the run from the
                            // stack; valid for + and * under associativity
                            State::Chain {
                                kind,
                                values,
                                stack_operands: stack_operands + 1,
                                pending: None,
                            }
                        }
                        None => {
                            // folding a-(b-c) as (a-b)-c changes the result;
                            // subtraction keeps its scalar grouping here
                            Self::flush_chain(kind, values, stack_operands, out)?;
                            out.push(Instruction::Operator(op));
                            State::Empty
                        }
                    }
                } else if foldable {
                    match pending {
                        Some(p) => {
                            Self::flush_chain(kind, values, stack_operands, out)?;
                            let mut values = SmallVec::new();
                            values.push(p);
                            State::Chain {
                                kind: op.kind,
                                values,
                                stack_operands: 1,
                                pending: None,
                            }
                        }
                        None => {
                            Self::flush_chain(kind, values, stack_operands, out)?;
                            out.push(Instruction::Operator(op));
                            State::Empty
                        }
                    }
                } else {
                    Self::flush_chain(kind, values, stack_operands, out)?;
                    if let Some(p) = pending {
                        out.push(Instruction::Number(p));
                    }
                    out.push(Instruction::Operator(op));
                    State::Empty
                }
            }
        };
        Ok(())
    }

    fn function(
        &mut self,
        func: &'static Function,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError> {
        match self.take() {
            State::Empty => {}
            State::Holding(prev) => out.push(Instruction::Number(prev)),
            State::Chain {
                kind,
                values,
                stack_operands,
                pending,
            } => {
                Self::flush_chain(kind, values, stack_operands, out)?;
                if let Some(p) = pending {
                    out.push(Instruction::Number(p));
                }
            }
        }
        out.push(Instruction::Function(func));
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<Instruction>) -> Result<(), ParseError> {
        match self.take() {
            State::Empty => Ok(()),
            State::Holding(value) => {
                out.push(Instruction::Number(value));
                Ok(())
            }
            State::Chain {
                pending: Some(_), ..
            } => Err(ParseError::InvalidSequence("run ended on a dangling operand")),
            State::Chain {
                kind,
                values,
                stack_operands,
                pending: None,
            } => Self::flush_chain(kind, values, stack_operands, out),
        }
    }
}
