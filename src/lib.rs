//! A compact, stack-based bytecode virtual machine: binary loader and
//! interpreter.
//!
//! The crate is split into a load phase and an execute phase, mirroring
//! the two halves of the binary format itself:
//!
//! - [`reader`] — a bounds-checked byte cursor.
//! - [`datum`] — the tag-prefixed literal decoder shared by the constant
//!   pool and inline opcode operands.
//! - [`loader`] — header/section parsing into a [`loader::Program`].
//! - [`value`] — the runtime [`value::Value`] tagged union.
//! - [`vm`] — the dispatch loop, stack, frame stack, and environment
//!   store.
//! - [`error`] — [`error::LoadError`] and [`error::RuntimeError`], each
//!   with an `exit_code`.

pub mod datum;
pub mod error;
pub mod loader;
pub mod reader;
pub mod value;
pub mod vm;

pub use error::{LoadError, RuntimeError};
pub use loader::Program;
pub use vm::Vm;

/// Load a binary program image and run it to completion.
///
/// A thin convenience wrapper over [`Program::parse`] and [`Vm::run`] for
/// callers that don't need to inspect VM state between the two phases.
pub fn run(data: &[u8]) -> Result<(), RunError> {
    let program = Program::parse(data).map_err(RunError::Load)?;
    let mut vm = Vm::new(&program).map_err(RunError::Runtime)?;
    vm.run().map_err(RunError::Runtime)
}

/// Either phase's failure, for callers that just want one `exit_code`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl RunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Load(e) => e.exit_code(),
            RunError::Runtime(e) => e.exit_code(),
        }
    }
}
