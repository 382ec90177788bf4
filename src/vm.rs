//! # Stack-Based Bytecode Virtual Machine (Runtime)
//!
//! This module implements the execution engine: a fetch-decode-dispatch
//! loop over a loaded [`Program`](crate::loader::Program), driving a value
//! stack, a call-frame stack, and a parent-linked environment store.
//!
//! ## High-level model
//! - **Value stack (`stack`)**: holds [`Value`]s consumed/produced by ops.
//! - **Environment store (`envs`)**: an append-only array of [`Env`],
//!   addressed by stable index rather than pointer; `envs[0]` is the
//!   global environment. Closures capture an environment by index, never
//!   by reference.
//! - **Frame stack (`frames`)**: call frames recording where to resume the
//!   caller. The entry frame's `return_pc = FRAME_SENTINEL` marks "return
//!   from here halts the VM".
//! - **Program counter (`pc`)**: index into `program.instructions`.
//!
//! The dispatch loop is split across sibling modules the way this crate's
//! teacher splits its own interpreter: [`ops_arith`] covers the inline
//! arithmetic/comparison opcodes, [`ops_control`] covers jumps, calls,
//! returns, and closures, and [`primitives`] implements the eight built-in
//! procedures bound into the global environment at startup.
//!
//! The machine fails fast: the first `RuntimeError` raised by any opcode
//! terminates the dispatch loop and is returned to the caller. There is no
//! local recovery or exception handling.

use tracing::trace;

use crate::error::RuntimeError;
use crate::loader::{Opcode, Program, PRIMITIVE_ENTRY};
use crate::value::{Value, NO_ENV};

mod ops_arith;
mod ops_control;
pub mod primitives;

/// Sentinel `return_pc` marking the entry frame: returning through it
/// halts the VM rather than resuming a caller.
pub const FRAME_SENTINEL: u32 = u32::MAX;
/// Sentinel `parent` marking an environment with no enclosing scope (the
/// global environment).
pub const NO_PARENT: u32 = u32::MAX;

const INITIAL_STACK_CAPACITY: usize = 256;
const INITIAL_ENV_CAPACITY: usize = 64;
const INITIAL_FRAME_CAPACITY: usize = 64;

/// A lexical environment: a slot array plus a link to its enclosing
/// environment. Environments are addressed by index into [`Vm::envs`],
/// never by pointer, so a closure can capture one without entangling
/// Rust's borrow checker in a self-referential structure.
#[derive(Clone, Debug)]
pub struct Env {
    pub parent: u32,
    pub slots: Vec<Value>,
}

/// A call frame: where to resume the caller, which environment was
/// current when the call was made, and the stack height to restore on
/// return.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub return_pc: u32,
    pub env_idx: u32,
    pub stack_base: u16,
}

/// Execution engine state for one run of a loaded [`Program`].
pub struct Vm<'p> {
    program: &'p Program,
    pub stack: Vec<Value>,
    pub envs: Vec<Env>,
    pub frames: Vec<Frame>,
    pub current_env: u32,
    pub pc: usize,
    pub halted: bool,
}

impl<'p> Vm<'p> {
    /// Build a fresh VM over `program`: global environment at index 0,
    /// the entry frame on the frame stack, and the eight primitives bound
    /// into the global environment by name.
    pub fn new(program: &'p Program) -> Result<Vm<'p>, RuntimeError> {
        let mut envs = Vec::with_capacity(INITIAL_ENV_CAPACITY);
        envs.push(Env {
            parent: NO_PARENT,
            slots: vec![Value::Nil; program.symbol_count() as usize],
        });

        let mut frames = Vec::with_capacity(INITIAL_FRAME_CAPACITY);
        frames.push(Frame {
            return_pc: FRAME_SENTINEL,
            env_idx: 0,
            stack_base: 0,
        });

        let mut vm = Vm {
            program,
            stack: Vec::with_capacity(INITIAL_STACK_CAPACITY),
            envs,
            frames,
            current_env: 0,
            pc: 0,
            halted: false,
        };
        vm.bind_primitives()?;
        Ok(vm)
    }

    /// Install a `PROC{proc_idx, env_idx = NO_ENV}` into the global
    /// environment slot named by each primitive procedure's well-known
    /// name, per the fixed `index -> name` convention in
    /// [`primitives::name_for_index`].
    fn bind_primitives(&mut self) -> Result<(), RuntimeError> {
        for (proc_idx, proc) in self.program.procedures.iter().enumerate() {
            if proc.entry_pc != PRIMITIVE_ENTRY {
                continue;
            }
            let name = primitives::name_for_index(proc_idx);
            let Some(name) = name else { continue };
            let slot = self
                .program
                .symbols
                .iter()
                .find(|s| s.name == name.as_bytes())
                .map(|s| s.id as usize);
            if let Some(slot) = slot {
                self.envs[0].slots[slot] = Value::Proc {
                    proc_idx: proc_idx as u32,
                    env_idx: NO_ENV,
                };
            }
        }
        Ok(())
    }

    /// Run the fetch-decode-dispatch loop until the program halts or an
    /// opcode raises a [`RuntimeError`].
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    fn current_instruction_count(&self) -> usize {
        self.program.instructions.len()
    }

    /// Execute one instruction, bounds-checking `pc` first.
    fn step(&mut self) -> Result<(), RuntimeError> {
        if self.pc >= self.current_instruction_count() {
            return Err(RuntimeError::PcOutOfBounds);
        }
        let instr = &self.program.instructions[self.pc];
        trace!(pc = self.pc, opcode = ?instr.opcode, "dispatch");

        match instr.opcode {
            Opcode::LoadConst => ops_control::load_const(self, &instr.operands)?,
            Opcode::LoadVar => ops_control::load_var(self, &instr.operands)?,
            Opcode::StoreVar => ops_control::store_var(self, &instr.operands)?,
            Opcode::LoadClosure => ops_control::load_closure(self, &instr.operands)?,
            Opcode::StoreClosure => ops_control::store_closure(self, &instr.operands)?,
            Opcode::Pop => ops_control::pop_op(self)?,
            Opcode::Jmp => {
                ops_control::jmp(self, &instr.operands)?;
                return Ok(());
            }
            Opcode::JmpTrue => {
                ops_control::jmp_true(self, &instr.operands)?;
                return Ok(());
            }
            Opcode::JmpFalse => {
                ops_control::jmp_false(self, &instr.operands)?;
                return Ok(());
            }
            Opcode::MakeClosure => ops_control::make_closure(self, &instr.operands)?,
            Opcode::Call => {
                ops_control::call(self, &instr.operands)?;
                return Ok(());
            }
            Opcode::Return => {
                ops_control::op_return(self)?;
                return Ok(());
            }
            Opcode::Halt => {
                self.halted = true;
                return Ok(());
            }
            Opcode::Label => return Err(RuntimeError::UnexpectedLabel),
            Opcode::Add => ops_arith::add(self)?,
            Opcode::Sub => ops_arith::sub(self)?,
            Opcode::Mul => ops_arith::mul(self)?,
            Opcode::Div => ops_arith::div(self)?,
            Opcode::CmpEq => ops_arith::cmp_eq(self)?,
            Opcode::CmpLt => ops_arith::cmp_lt(self)?,
            Opcode::CmpGt => ops_arith::cmp_gt(self)?,
            Opcode::TailCall
            | Opcode::Neg
            | Opcode::And
            | Opcode::Or
            | Opcode::Not
            | Opcode::Xor
            | Opcode::Unknown(_) => {
                return Err(RuntimeError::UnknownOpcode {
                    opcode: instr.opcode.as_byte(),
                })
            }
        }
        self.pc += 1;
        Ok(())
    }

    /// Pop a single [`Value`] from the operand stack.
    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Push a value, failing if the stack is already at its fixed
    /// capacity. The value stack does not grow past
    /// `INITIAL_STACK_CAPACITY` — a fixed cap rather than the doubling
    /// policy used by the environment and frame stores.
    pub(crate) fn push(&mut self, v: Value) -> Result<(), RuntimeError> {
        if self.stack.len() >= INITIAL_STACK_CAPACITY {
            return Err(RuntimeError::StackOverflow);
        }
        self.stack.push(v);
        Ok(())
    }

    pub(crate) fn env(&self) -> &Env {
        &self.envs[self.current_env as usize]
    }

    pub(crate) fn program(&self) -> &Program {
        self.program
    }
}
