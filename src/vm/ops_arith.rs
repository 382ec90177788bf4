//! # Inline Arithmetic & Comparison Operations
//!
//! `ADD`, `SUB`, `MUL`, `DIV`, `CMP_EQ`, `CMP_LT`, `CMP_GT` pop two
//! operands, coerce both to `Int`, and push an `Int` (arithmetic) or
//! `Bool` (comparison) result. These opcodes exist alongside the
//! primitive-call path (`CALL` dispatching to a `PRIMITIVE_ENTRY`
//! procedure, see [`super::primitives`]) — both are reachable from
//! bytecode and must agree on two-integer results.
//!
//! Operand order is left then right: pop `b` (pushed last), then `a`, so
//! `a op b` matches the source-level infix expression.

use crate::error::RuntimeError;
use crate::value::Value;
use crate::vm::Vm;

pub(super) fn add(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Int(a + b))
}

pub(super) fn sub(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Int(a - b))
}

pub(super) fn mul(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Int(a * b))
}

pub(super) fn div(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    vm.push(Value::Int(a / b))
}

pub(super) fn cmp_eq(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Bool(a == b))
}

pub(super) fn cmp_lt(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Bool(a < b))
}

pub(super) fn cmp_gt(vm: &mut Vm) -> Result<(), RuntimeError> {
    let b = vm.pop()?.as_int()?;
    let a = vm.pop()?.as_int()?;
    vm.push(Value::Bool(a > b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Program;

    fn vm_with(values: &[Value]) -> Vm<'static> {
        let program: &'static Program = Box::leak(Box::new(Program::default()));
        let mut vm = Vm::new(program).unwrap();
        for v in values {
            vm.push(v.clone()).unwrap();
        }
        vm
    }

    #[test]
    fn add_pushes_sum() {
        let mut vm = vm_with(&[Value::Int(2), Value::Int(3)]);
        add(&mut vm).unwrap();
        assert_eq!(vm.pop().unwrap(), Value::Int(5));
    }

    #[test]
    fn div_by_zero_errors() {
        let mut vm = vm_with(&[Value::Int(1), Value::Int(0)]);
        assert_eq!(div(&mut vm).unwrap_err(), RuntimeError::DivisionByZero);
    }

    #[test]
    fn cmp_lt_is_strict() {
        let mut vm = vm_with(&[Value::Int(3), Value::Int(3)]);
        cmp_lt(&mut vm).unwrap();
        assert_eq!(vm.pop().unwrap(), Value::Bool(false));
    }
}
