//! # Built-in Primitives
//!
//! The eight built-in procedures bound into the global environment at VM
//! startup (see [`crate::vm::Vm::bind_primitives`]). Each is identified by
//! its procedure table index — a fixed convention the binary format
//! itself encodes, per the index-to-name mapping below — rather than by
//! name at the call site.
//!
//! All eight operate on `Int` arguments only; `+ - * /` return `Int`,
//! `= < >` return `Bool`, and `not` returns the `Bool` negation of its
//! single argument's integer truthiness (zero is falsy).

use crate::error::RuntimeError;
use crate::value::Value;

const NAMES: [&str; 8] = ["+", "-", "*", "/", "=", "<", ">", "not"];

/// Procedure-table index to primitive name, per the binary format's fixed
/// `index -> name` convention. Returns `None` for any index outside the
/// eight known primitives.
pub fn name_for_index(idx: usize) -> Option<&'static str> {
    NAMES.get(idx).copied()
}

fn expect_arity(args: &[Value], expected: u16) -> Result<(), RuntimeError> {
    if args.len() != expected as usize {
        return Err(RuntimeError::ArityMismatch {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Apply the primitive at procedure-table index `proc_idx` to `args`.
pub fn apply(proc_idx: usize, args: &[Value]) -> Result<Value, RuntimeError> {
    let name = name_for_index(proc_idx)
        .ok_or_else(|| RuntimeError::TypeError(format!("procedure {} is not a primitive", proc_idx)))?;

    match name {
        "+" => {
            expect_arity(args, 2)?;
            Ok(Value::Int(args[0].as_int()? + args[1].as_int()?))
        }
        "-" => {
            expect_arity(args, 2)?;
            Ok(Value::Int(args[0].as_int()? - args[1].as_int()?))
        }
        "*" => {
            expect_arity(args, 2)?;
            Ok(Value::Int(args[0].as_int()? * args[1].as_int()?))
        }
        "/" => {
            expect_arity(args, 2)?;
            let a = args[0].as_int()?;
            let b = args[1].as_int()?;
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Int(a / b))
        }
        "=" => {
            expect_arity(args, 2)?;
            Ok(Value::Bool(args[0].as_int()? == args[1].as_int()?))
        }
        "<" => {
            expect_arity(args, 2)?;
            Ok(Value::Bool(args[0].as_int()? < args[1].as_int()?))
        }
        ">" => {
            expect_arity(args, 2)?;
            Ok(Value::Bool(args[0].as_int()? > args[1].as_int()?))
        }
        "not" => {
            expect_arity(args, 1)?;
            Ok(Value::Bool(args[0].as_int()? == 0))
        }
        _ => unreachable!("NAMES and this match must stay in sync"),
    }
}
