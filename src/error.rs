//! # Error Handling for the BRKT VM
//!
//! This module defines the error types produced by the two phases of the
//! VM: [`LoadError`] for failures while decoding a binary program image,
//! and [`RuntimeError`] for failures raised by the dispatch loop while
//! executing an already-loaded [`crate::loader::Program`].
//!
//! Both enums are `thiserror`-derived so each variant gets a `Display`
//! impl from its `#[error(...)]` message and the pair integrates with
//! `std::error::Error` for free. Each also exposes `exit_code`, used by
//! `main.rs` to translate a failure into the process exit status
//! documented in the binary format's external interface.

use thiserror::Error;

/// Errors raised while parsing a binary program image into a `Program`.
///
/// Load errors are unrecoverable: decoding aborts at the first failure,
/// there is no partial `Program` to resume from.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    /// A read would advance the cursor past the end of the buffer.
    #[error("attempted to read out of bounds at offset {offset}")]
    OutOfBounds { offset: usize },

    /// The 32-bit magic number did not match `BRKT`'s canonical encoding.
    #[error("malformed binary; incorrect magic bytes (found {found:#010x})")]
    InvalidMagic { found: u32 },

    /// A constant pool entry or inline operand used an unrecognized tag.
    #[error("invalid constant tag: {tag}")]
    MalformedConstant { tag: u8 },
}

impl LoadError {
    /// Process exit status for this failure, per the binary format's
    /// external interface (`0` success is never returned from here).
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::OutOfBounds { .. } => 3,
            LoadError::InvalidMagic { .. } => 4,
            LoadError::MalformedConstant { .. } => 1,
        }
    }
}

/// Errors raised by the dispatch loop while executing a loaded `Program`.
///
/// Once raised, the VM sets its internal error flag and the dispatch loop
/// terminates; there is no local recovery.
#[derive(Debug, Error, PartialEq)]
pub enum RuntimeError {
    /// An opcode outside the known instruction set was dispatched.
    #[error("unknown opcode: {opcode}")]
    UnknownOpcode { opcode: u8 },

    /// A `LABEL` pseudo-instruction reached the dispatch loop.
    #[error("unexpected LABEL operator in bytecode")]
    UnexpectedLabel,

    /// Popped an empty operand stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// Pushed past the operand stack's capacity.
    #[error("stack overflow")]
    StackOverflow,

    /// A value was used in a context requiring a different shape (e.g. a
    /// `CALL` on a non-`PROC` value, or a non-integer arithmetic operand).
    #[error("type error: {0}")]
    TypeError(String),

    /// `CALL n` supplied a different argument count than the callee's arity.
    #[error("arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch { expected: u16, got: usize },

    /// `LOAD_VAR`/`STORE_VAR` referenced a slot outside the current
    /// environment's bounds.
    #[error("symbol id {slot} out of range (environment has {size} slots)")]
    SymbolOutOfRange { slot: u32, size: u16 },

    /// `LOAD_CLOSURE`/`STORE_CLOSURE` used outside of a closure's body
    /// (the current environment has no parent).
    #[error("LOAD_CLOSURE/STORE_CLOSURE used outside a closure")]
    ClosureOutsideClosure,

    /// The program counter fell outside `[0, instruction_count)`.
    #[error("program counter out of bounds")]
    PcOutOfBounds,

    /// Integer division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl RuntimeError {
    /// Process exit status for this failure. Every runtime error maps to
    /// the same generic fatal-error code; `LoadError` is where the
    /// exit-code table differentiates.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
