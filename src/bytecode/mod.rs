//! # Bytecode codec
//!
//! Serializes and deserializes a [`Program`]'s IR to the little-endian
//! binary container `original_source/hbcht.py`'s `_hbcht_compile`/
//! `_extract_commands` define: a 10-byte header, a 3-offset entry table,
//! then a flat `(opcode, argument)` stream to end of file.


use crate::error::LoadError;
use crate::ir::{EntryTable, Instruction, Opcode, Program};

const SUPPORTED_VERSION: u8 = 1;

/// Encode `program` into its bytecode container.
pub fn encode(program: &Program) -> Vec<u8> {
    let mut out = Vec::with_capacity(10 + 12 + program.instructions.len() * 8);
    out.push(0x01);
    out.extend_from_slice(b"hbcht");
    out.push(SUPPORTED_VERSION);
    out.push(0x02);
    out.push(if program.input_as_text { 0x01 } else { 0x02 });
    out.push(if program.output_as_text { 0x01 } else { 0x02 });

    out.extend_from_slice(&program.entries.right.to_le_bytes());
    out.extend_from_slice(&program.entries.down.to_le_bytes());
    out.extend_from_slice(&program.entries.left.to_le_bytes());

    for inst in &program.instructions {
        out.extend_from_slice(&inst.op.wire_code().to_le_bytes());
        out.extend_from_slice(&inst.arg.to_le_bytes());
    }
    out
}

/// Decode a bytecode container into a [`Program`].
///
/// `in_text`/`out_text` are the caller's own override for the two text-mode
/// flags; the header's bits only take effect when the caller left the
/// corresponding flag unset (same precedence as the board loader's
/// directives).
pub fn decode(
    bytes: &[u8],
    in_text: Option<bool>,
    out_text: Option<bool>,
) -> Result<Program, LoadError> {
    if bytes.len() < 10 {
        return Err(LoadError::CorruptBytecode("header truncated"));
    }
    if bytes[0] != 0x01 || &bytes[1..6] != b"hbcht" || bytes[7] != 0x02 {
        return Err(LoadError::CorruptBytecode("bad magic"));
    }

    let version = bytes[6];
    if version != SUPPORTED_VERSION {
        return Err(LoadError::UnsupportedBytecodeVersion(version));
    }

    let mut input_as_text = in_text.unwrap_or(false);
    let mut output_as_text = out_text.unwrap_or(false);
    if bytes[8] == 0x01 && in_text.is_none() {
        input_as_text = true;
    }
    if bytes[9] == 0x01 && out_text.is_none() {
        output_as_text = true;
    }

    let body = &bytes[10..];
    if body.len() % 4 != 0 {
        return Err(LoadError::CorruptBytecode("trailing bytes"));
    }
    let words: Vec<u32> = body
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    if words.len() < 3 {
        return Err(LoadError::CorruptBytecode("entry table truncated"));
    }

    let entries = EntryTable {
        right: words[0],
        down: words[1],
        left: words[2],
    };

    let stream = &words[3..];
    if stream.len() % 2 != 0 {
        return Err(LoadError::CorruptBytecode("dangling instruction word"));
    }
    let mut instructions = Vec::with_capacity(stream.len() / 2);
    for pair in stream.chunks_exact(2) {
        let op = Opcode::from_wire_code(pair[0])
            .ok_or(LoadError::CorruptBytecode("unknown opcode"))?;
        instructions.push(Instruction::new(op, pair[1]));
    }

    let count = instructions.len();
    let in_range = |target: u32| (target as usize) < count;
    for inst in &instructions {
        if inst.op.is_jump() && !in_range(inst.arg) {
            return Err(LoadError::TargetOutOfRange {
                target: inst.arg,
                count,
            });
        }
    }
    for &offset in &[entries.right, entries.down, entries.left] {
        if !in_range(offset) {
            return Err(LoadError::TargetOutOfRange {
                target: offset,
                count,
            });
        }
    }

    Ok(Program {
        instructions,
        entries,
        input_as_text,
        output_as_text,
    })
}
