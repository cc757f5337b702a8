//! Integer arithmetic, comparison and logic.
//!
//! All arithmetic is checked: overflow, underflow and division by zero fault
//! the program instead of wrapping.

use crate::decode::Op;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::stack_value::StackValue;
use avm_teal::OpCode;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::Add, add);
    jump_table.register(OpCode::Sub, sub);
    jump_table.register(OpCode::Mul, mul);
    jump_table.register(OpCode::Div, div);
    jump_table.register(OpCode::Mod, modulo);

    jump_table.register(OpCode::Lt, lt);
    jump_table.register(OpCode::Gt, gt);
    jump_table.register(OpCode::Le, le);
    jump_table.register(OpCode::Ge, ge);
    jump_table.register(OpCode::Eq, eq);
    jump_table.register(OpCode::Neq, neq);

    jump_table.register(OpCode::And, and);
    jump_table.register(OpCode::Or, or);
    jump_table.register(OpCode::Not, not);
}

/// Pops B then A, so `A op B` matches TEAL operand order.
fn pop_pair(engine: &mut ExecutionEngine) -> VmResult<(u64, u64)> {
    let b = engine.pop_u64()?;
    let a = engine.pop_u64()?;
    Ok((a, b))
}

fn add(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    let result = a.checked_add(b).ok_or(VmError::Overflow { op: "+" })?;
    engine.push(result.into())
}

fn sub(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    let result = a.checked_sub(b).ok_or(VmError::Underflow { op: "-" })?;
    engine.push(result.into())
}

fn mul(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    let result = a.checked_mul(b).ok_or(VmError::Overflow { op: "*" })?;
    engine.push(result.into())
}

fn div(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    let result = a.checked_div(b).ok_or(VmError::DivisionByZero { op: "/" })?;
    engine.push(result.into())
}

fn modulo(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    let result = a.checked_rem(b).ok_or(VmError::DivisionByZero { op: "%" })?;
    engine.push(result.into())
}

fn lt(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a < b).into())
}

fn gt(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a > b).into())
}

fn le(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a <= b).into())
}

fn ge(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a >= b).into())
}

/// Both operands must have the same type.
fn equal_operands(engine: &mut ExecutionEngine) -> VmResult<bool> {
    let b = engine.pop()?;
    let a = engine.pop()?;
    match (&a, &b) {
        (StackValue::Uint64(x), StackValue::Uint64(y)) => Ok(x == y),
        (StackValue::Bytes(x), StackValue::Bytes(y)) => Ok(x == y),
        _ => Err(VmError::type_mismatch(a.type_name(), b.type_name())),
    }
}

fn eq(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let equal = equal_operands(engine)?;
    engine.push(equal.into())
}

fn neq(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let equal = equal_operands(engine)?;
    engine.push((!equal).into())
}

fn and(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a != 0 && b != 0).into())
}

fn or(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let (a, b) = pop_pair(engine)?;
    engine.push((a != 0 || b != 0).into())
}

fn not(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let a = engine.pop_u64()?;
    engine.push((a == 0).into())
}

#[cfg(test)]
mod tests {
    use crate::context::ExecutionContext;
    use crate::error::VmError;
    use crate::execution_engine::ExecutionEngine;
    use crate::vm_state::VmState;
    use avm_teal::{assemble, OpCode, ProgramBuilder};

    fn binary(a: u64, b: u64, op: OpCode) -> ExecutionEngine {
        let mut builder = ProgramBuilder::new();
        builder
            .emit_int(a)
            .emit_int(b)
            .emit_opcode(op)
            .emit_store(0)
            .emit_int(1);
        let bytes = assemble(&builder.build(6)).unwrap();
        let mut engine = ExecutionEngine::new(&bytes, ExecutionContext::default());
        engine.execute();
        engine
    }

    fn result(a: u64, b: u64, op: OpCode) -> u64 {
        let engine = binary(a, b, op);
        assert_eq!(engine.state(), VmState::Approved, "{:?}", engine.fault());
        engine.scratch(0).as_u64().unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(result(2, 3, OpCode::Add), 5);
        assert_eq!(result(10, 4, OpCode::Sub), 6);
        assert_eq!(result(6, 7, OpCode::Mul), 42);
        assert_eq!(result(7, 2, OpCode::Div), 3);
        assert_eq!(result(7, 2, OpCode::Mod), 1);
    }

    #[test]
    fn test_arithmetic_faults() {
        let cases = [
            (u64::MAX, 1, OpCode::Add, VmError::Overflow { op: "+" }),
            (3, 5, OpCode::Sub, VmError::Underflow { op: "-" }),
            (u64::MAX, 2, OpCode::Mul, VmError::Overflow { op: "*" }),
            (1, 0, OpCode::Div, VmError::DivisionByZero { op: "/" }),
            (1, 0, OpCode::Mod, VmError::DivisionByZero { op: "%" }),
        ];
        for (a, b, op, expected) in cases {
            let engine = binary(a, b, op);
            assert_eq!(engine.state(), VmState::Fault);
            assert_eq!(engine.fault(), Some(&expected));
        }
    }

    #[test]
    fn test_comparisons_and_logic() {
        assert_eq!(result(1, 2, OpCode::Lt), 1);
        assert_eq!(result(1, 2, OpCode::Ge), 0);
        assert_eq!(result(2, 2, OpCode::Le), 1);
        assert_eq!(result(3, 2, OpCode::Gt), 1);
        assert_eq!(result(4, 4, OpCode::Eq), 1);
        assert_eq!(result(4, 5, OpCode::Neq), 1);
        assert_eq!(result(1, 0, OpCode::And), 0);
        assert_eq!(result(1, 0, OpCode::Or), 1);
    }
}
