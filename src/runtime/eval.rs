use crate::{
    codegen::{CompiledExpr, Instruction},
    error::{ErrorKind, PResult},
};

use super::builtin::TraceSink;

impl CompiledExpr {
    /// Runs the instruction list against `args`, where `args[i]` is the value
    /// of `variables()[i]`. `+ - *` and negation wrap; division faults on a
    /// zero divisor and on `i64::MIN / -1`.
    pub fn call<S>(&self, args: &[i64], sink: &mut S) -> PResult<i64>
    where
        S: TraceSink + ?Sized,
    {
        if let Some(id) = self.variables.get(args.len()) {
            return Err(ErrorKind::UnboundVariable(id.clone()));
        }

        let mut stack: Vec<i64> = Vec::with_capacity(self.max_stack);

        for ins in &self.instructions {
            match *ins {
                Instruction::Const(v) => stack.push(v),
                Instruction::Load(slot) => stack.push(args[slot]),
                Instruction::Neg => {
                    let v = pop(&mut stack)?;
                    stack.push(v.wrapping_neg());
                }
                Instruction::Add => binary(&mut stack, |a, b| Ok(a.wrapping_add(b)))?,
                Instruction::Sub => binary(&mut stack, |a, b| Ok(a.wrapping_sub(b)))?,
                Instruction::Mul => binary(&mut stack, |a, b| Ok(a.wrapping_mul(b)))?,
                Instruction::Div => binary(&mut stack, divide)?,
                Instruction::Trace(label) => {
                    let value = *stack.last().ok_or_else(malformed)?;
                    sink.trace(&self.labels[label], value);
                }
            }
        }

        pop(&mut stack)
    }
}

fn divide(lhs: i64, rhs: i64) -> PResult<i64> {
    match lhs.checked_div(rhs) {
        Some(v) => Ok(v),
        None if rhs == 0 => Err(ErrorKind::ArithmeticFault(format!(
            "Attempted to divide {lhs} by zero"
        ))),
        None => Err(ErrorKind::ArithmeticFault(format!(
            "Overflow in {lhs} / {rhs}"
        ))),
    }
}

fn binary<F>(stack: &mut Vec<i64>, op: F) -> PResult<()>
where
    F: FnOnce(i64, i64) -> PResult<i64>,
{
    let rhs = pop(stack)?;
    let lhs = pop(stack)?;
    stack.push(op(lhs, rhs)?);
    Ok(())
}

fn pop(stack: &mut Vec<i64>) -> PResult<i64> {
    stack.pop().ok_or_else(malformed)
}

fn malformed() -> ErrorKind {
    ErrorKind::CompileError("Instruction stream underflowed the stack".into())
}
