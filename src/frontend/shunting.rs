//! Infix to postfix conversion
//!
//! Precedence-driven shunting yard over a converter-local operator stack.
//! The scan is generic over an emission sink so the plain and compacting
//! pipelines share one pass.

use super::scanner::scan_number;
use super::table::{Associativity, Function, Operator, FUNCTIONS, OPERATORS};
use super::ParseError;
use crate::vm::Instruction;

/// Where converter emissions go.
///
/// The plain sink forwards instructions untouched; the compacting sink fuses
/// same-kind operator runs before forwarding.
pub(crate) trait Sink {
    fn number(&mut self, value: f32, out: &mut Vec<Instruction>) -> Result<(), ParseError>;
    fn operator(
        &mut self,
        op: &'static Operator,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError>;
    fn function(
        &mut self,
        func: &'static Function,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError>;
    /// End of input: flush whatever is still pending.
    fn finish(&mut self, out: &mut Vec<Instruction>) -> Result<(), ParseError>;
}

/// Pass-through sink
#[derive(Debug, Default)]
pub(crate) struct Direct;

impl Sink for Direct {
    fn number(&mut self, value: f32, out: &mut Vec<Instruction>) -> Result<(), ParseError> {
        out.push(Instruction::Number(value));
        Ok(())
    }

    fn operator(
        &mut self,
        op: &'static Operator,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError> {
        out.push(Instruction::Operator(op));
        Ok(())
    }

    fn function(
        &mut self,
        func: &'static Function,
        out: &mut Vec<Instruction>,
    ) -> Result<(), ParseError> {
        out.push(Instruction::Function(func));
        Ok(())
    }

    fn finish(&mut self, _out: &mut Vec<Instruction>) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Operator stack entry; `Number` never appears here.
#[derive(Debug)]
enum StackEntry {
    LeftBracket,
    Op(&'static Operator),
    Func(&'static Function),
}

/// Convert `expr` left to right, emitting postfix through `sink` into `out`.
pub(crate) fn convert<S: Sink>(
    expr: &str,
    sink: &mut S,
    out: &mut Vec<Instruction>,
) -> Result<(), ParseError> {
    let bytes = expr.as_bytes();
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b' ' => i += 1,
            b'(' => {
                stack.push(StackEntry::LeftBracket);
                i += 1;
            }
            b')' => {
                if stack.is_empty() {
                    return Err(ParseError::OperatorStackEmpty);
                }
                loop {
                    match stack.pop() {
                        Some(StackEntry::LeftBracket) => break,
                        Some(StackEntry::Op(op)) => sink.operator(op, out)?,
                        Some(StackEntry::Func(func)) => sink.function(func, out)?,
                        None => return Err(ParseError::MismatchedParentheses),
                    }
                }
                // the discarded bracket closed a function argument; the
                // function resolves here
                if let Some(StackEntry::Func(func)) = stack.last() {
                    let func = *func;
                    stack.pop();
                    sink.function(func, out)?;
                }
                i += 1;
            }
            _ => {
                let window = &expr[i..];

                if let Some(len) = scan_number(window)? {
                    sink.number(parse_number(&window[..len])?, out)?;
                    i += len;
                    continue;
                }

                // functions win over operators; `sin` acts as a prefix
                // operator resolved by its closing bracket
                if let Some(func) = match_function(window) {
                    stack.push(StackEntry::Func(func));
                    i += func.pattern.len();
                    continue;
                }

                if let Some(op) = match_operator(window) {
                    loop {
                        let top = match stack.last() {
                            Some(StackEntry::Op(top)) => *top,
                            _ => break,
                        };
                        let pops = top.precedence > op.precedence
                            || (top.precedence == op.precedence
                                && op.associativity == Associativity::Left);
                        if !pops {
                            break;
                        }
                        stack.pop();
                        sink.operator(top, out)?;
                    }
                    stack.push(StackEntry::Op(op));
                    i += op.pattern.len();
                    continue;
                }

                let token = window.chars().next().unwrap_or(' ');
                return Err(ParseError::UnrecognizedToken(token));
            }
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::LeftBracket => return Err(ParseError::UnbalancedParentheses),
            StackEntry::Op(op) => sink.operator(op, out)?,
            StackEntry::Func(func) => sink.function(func, out)?,
        }
    }

    sink.finish(out)
}

/// Parse a scanned token, normalizing the `,` separator.
fn parse_number(token: &str) -> Result<f32, ParseError> {
    let normalized;
    let digits = if token.contains(',') {
        normalized = token.replace(',', ".");
        normalized.as_str()
    } else {
        token
    };
    digits
        .parse::<f32>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

/// Longest function pattern starting the window.
fn match_function(window: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| window.starts_with(f.pattern))
}

/// Longest operator pattern starting the window.
fn match_operator(window: &str) -> Option<&'static Operator> {
    OPERATORS.iter().find(|op| window.starts_with(op.pattern))
}

#[cfg(test)]
mod tests {
    use super::super::to_postfix;
    use super::*;
    use crate::vm::render_postfix;

    fn rendered(expr: &str) -> String {
        render_postfix(&to_postfix(expr).unwrap())
    }

    #[test]
    fn precedence_orders_the_output() {
        assert_eq!(rendered("2+3*4"), "2 3 4 * +");
        assert_eq!(rendered("2*3+4"), "2 3 * 4 +");
        assert_eq!(rendered("3 + 4 * 2 / (1 - 5)"), "3 4 2 * 1 5 - / +");
    }

    #[test]
    fn equal_precedence_folds_left() {
        assert_eq!(rendered("2-3+4"), "2 3 - 4 +");
        assert_eq!(rendered("8/2*2"), "8 2 / 2 *");
    }

    #[test]
    fn functions_resolve_at_their_bracket() {
        assert_eq!(rendered("sin(45)"), "45 sin");
        assert_eq!(rendered("1 + sin(45)"), "1 45 sin +");
        assert_eq!(rendered("sin(45) + 1"), "45 sin 1 +");
        assert_eq!(rendered("sin ( (3 + 3)  / 6   )"), "3 3 + 6 / sin");
    }

    #[test]
    fn decimal_comma_parses_like_a_point() {
        assert_eq!(rendered("1,5 + 1.5"), "1.5 1.5 +");
    }

    #[test]
    fn bracket_errors_are_distinct() {
        assert_eq!(
            to_postfix(")3 + (1 - 5)"),
            Err(ParseError::OperatorStackEmpty)
        );
        assert_eq!(
            to_postfix("3 + 1 - 5)"),
            Err(ParseError::MismatchedParentheses)
        );
        assert_eq!(
            to_postfix("3 + 1 - 5("),
            Err(ParseError::UnbalancedParentheses)
        );
    }

    #[test]
    fn foreign_characters_are_rejected() {
        assert_eq!(to_postfix("1 + x"), Err(ParseError::UnrecognizedToken('x')));
        assert_eq!(to_postfix("2 ^ 3"), Err(ParseError::UnrecognizedToken('^')));
    }
}
