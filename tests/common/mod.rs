//! Shared binary-image assembly helpers for integration tests. Not a
//! crate module — `tests/*.rs` each `mod common;` this file directly.

use brkt_vm::datum::{TAG_BOOL_FALSE, TAG_BOOL_TRUE, TAG_INT, TAG_STR};
use brkt_vm::loader::Opcode;

pub const MAGIC: u32 = 0x544B_5242;
pub const SEC_SYMBOL_TABLE: u8 = 0x01;
pub const SEC_CONSTANT_POOL: u8 = 0x02;
pub const SEC_PROCEDURE_TABLE: u8 = 0x03;
pub const SEC_BYTECODE: u8 = 0x04;
pub const PRIMITIVE_ENTRY: u32 = u32::MAX;

/// Inline-operand encoding (no outer size envelope): used for a bytecode
/// instruction's own operand datums, e.g. `LoadConst`'s constant index.
pub fn int_datum(v: i32) -> Vec<u8> {
    let mut b = vec![TAG_INT];
    b.extend_from_slice(&v.to_le_bytes());
    b
}

/// Inline-operand encoding, see [`int_datum`].
pub fn bool_datum(v: bool) -> Vec<u8> {
    vec![if v { TAG_BOOL_TRUE } else { TAG_BOOL_FALSE }]
}

pub fn symbol_table(symbols: &[(u32, &str)]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(symbols.len() as u32).to_le_bytes());
    for (id, name) in symbols {
        b.extend_from_slice(&id.to_le_bytes());
        b.extend_from_slice(&(name.len() as u16).to_le_bytes());
        b.extend_from_slice(name.as_bytes());
    }
    b
}

/// Constant-pool entry encoding: `tag` followed by an outer `u16 size` then
/// `size` raw bytes, for every kind except `BOOL`/`NIL` (no payload at
/// all). This differs from the envelope-free inline-operand encoding
/// ([`int_datum`]/[`bool_datum`]) — the two tables use different on-disk
/// shapes for the same tag set.
pub fn pool_int(v: i32) -> Vec<u8> {
    let mut b = vec![TAG_INT];
    b.extend_from_slice(&4u16.to_le_bytes());
    b.extend_from_slice(&v.to_le_bytes());
    b
}

pub fn pool_bool(v: bool) -> Vec<u8> {
    vec![if v { TAG_BOOL_TRUE } else { TAG_BOOL_FALSE }]
}

pub fn pool_str(bytes: &[u8]) -> Vec<u8> {
    let mut b = vec![TAG_STR];
    b.extend_from_slice(&((bytes.len() + 2) as u16).to_le_bytes());
    b.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
    b.extend_from_slice(bytes);
    b
}

pub fn constant_pool(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for e in entries {
        b.extend_from_slice(e);
    }
    b
}

pub struct ProcSpec {
    pub entry_pc: u32,
    pub arity: u16,
    pub local_count: u16,
    pub free_vars: Vec<u32>,
}

pub fn procedure_table(procs: &[ProcSpec]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(procs.len() as u32).to_le_bytes());
    for p in procs {
        b.extend_from_slice(&p.entry_pc.to_le_bytes());
        b.extend_from_slice(&p.arity.to_le_bytes());
        b.extend_from_slice(&p.local_count.to_le_bytes());
        b.extend_from_slice(&(p.free_vars.len() as u16).to_le_bytes());
        for fv in &p.free_vars {
            b.extend_from_slice(&fv.to_le_bytes());
        }
    }
    b
}

pub fn bytecode(instrs: &[(Opcode, Vec<Vec<u8>>)]) -> Vec<u8> {
    let mut b = Vec::new();
    for (op, operands) in instrs {
        b.push(op.as_byte());
        for o in operands {
            b.extend_from_slice(o);
        }
    }
    b
}

/// Assemble a full binary image from a set of `(tag, payload)` sections,
/// computing the section table's offsets automatically.
pub fn build_image(sections: Vec<(u8, Vec<u8>)>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.push(8);
    out.push(0);
    out.extend_from_slice(&[0u8; 16]);
    out.push(sections.len() as u8);

    let header_len = out.len() + sections.len() * 9;
    let mut offset = header_len as u32;
    let mut table = Vec::new();
    let mut payloads = Vec::new();
    for (tag, payload) in &sections {
        table.push(*tag);
        table.extend_from_slice(&offset.to_le_bytes());
        table.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        offset += payload.len() as u32;
        payloads.extend_from_slice(payload);
    }
    out.extend_from_slice(&table);
    out.extend_from_slice(&payloads);
    out
}
