//! # Value Representation for the BRKT VM
//!
//! [`Value`] is the runtime tagged union carried on the operand stack, in
//! environment slots, and inside closures.
//!
//! - `Int(i64)` / `Float(f64)` / `Bool(bool)` / `Nil` — scalars.
//! - `Sym(u32)` / `Ident(u32)` — interned symbol/identifier ids.
//! - `Str(Rc<Vec<u8>>)` — owned byte string, reference-counted so cloning a
//!   stack slot is cheap.
//! - `Pair(Rc<(Value, Value)>)` — reserved: no opcode in this instruction
//!   set constructs one, but the representation exists so a future opcode
//!   could without changing `Value`'s shape.
//! - `Proc { proc_idx, env_idx }` — a closure: a procedure table index plus
//!   the environment it closes over (`env_idx = NO_ENV` for primitives,
//!   which capture nothing).

use std::rc::Rc;

use crate::datum::Constant;
use crate::error::RuntimeError;

/// Sentinel `env_idx` marking a closure that captures no environment (the
/// eight built-in primitives).
pub const NO_ENV: u32 = u32::MAX;

/// Runtime value carried on the stack and in environment slots.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Sym(u32),
    Ident(u32),
    Str(Rc<Vec<u8>>),
    Pair(Rc<(Value, Value)>),
    Proc { proc_idx: u32, env_idx: u32 },
}

impl Value {
    /// Construct the runtime value for a decoded constant pool entry.
    pub fn from_constant(c: &Constant) -> Value {
        match c {
            Constant::Int(i) => Value::Int(*i as i64),
            Constant::Float(f) => Value::Float(*f),
            Constant::Sym(id) => Value::Sym(*id),
            Constant::Ident(id) => Value::Ident(*id),
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Nil => Value::Nil,
            Constant::Str(bytes) => Value::Str(Rc::new(bytes.clone())),
        }
    }

    /// Coerce this value to an `i64` for the integer-only opcodes (inline
    /// arithmetic/comparison and the eight primitives). Only `Int` is a
    /// valid integer operand; everything else is a `TypeError`.
    pub fn as_int(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(RuntimeError::TypeError(format!(
                "expected integer operand, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Coerce this value to a `bool`, for `JMP_TRUE`/`JMP_FALSE` conditions.
    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(RuntimeError::TypeError(format!(
                "expected boolean condition, found {}",
                other.kind_name()
            ))),
        }
    }

    /// Short, stable name for diagnostics; not a `Display` impl since no
    /// opcode needs to print a `Value` to program output.
    fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Sym(_) => "sym",
            Value::Ident(_) => "ident",
            Value::Str(_) => "str",
            Value::Pair(_) => "pair",
            Value::Proc { .. } => "proc",
        }
    }
}
