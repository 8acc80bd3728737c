//! # Program facade
//!
//! Ties the board loader, walker, interpreter, bytecode codec, and target
//! emitters together behind a single [`Program`] type, so callers never
//! touch [`crate::ir::Program`] or the individual pipeline stages directly.

use rand::Rng;

use crate::emit::{self, EmitTarget};
use crate::error::{LoadError, RunError};
use crate::ir::{Direction, Program as Ir};
use crate::interpreter;
use crate::{board, bytecode, walker};

/// A loaded hbcht program: a board's (or bytecode container's) lowered IR,
/// ready to run or re-emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    ir: Ir,
}

/// Load a program from board source text (a `.hb`/`.hbcht` file's bytes).
///
/// `in_text`/`out_text` override the board's `@intext`/`@outtext`
/// directives; see [`board::load`].
pub fn load_source(
    bytes: &[u8],
    in_text: Option<bool>,
    out_text: Option<bool>,
) -> Result<Program, LoadError> {
    let loaded = board::load(bytes, in_text, out_text)?;
    let lowered = walker::lower(&loaded.board)?;
    Ok(Program {
        ir: Ir {
            instructions: lowered.instructions,
            entries: lowered.entries,
            input_as_text: loaded.input_as_text,
            output_as_text: loaded.output_as_text,
        },
    })
}

/// Load a program from a compiled bytecode container.
///
/// `in_text`/`out_text` override the container header's text-mode flags;
/// see [`bytecode::decode`].
pub fn load_bytecode(
    bytes: &[u8],
    in_text: Option<bool>,
    out_text: Option<bool>,
) -> Result<Program, LoadError> {
    let ir = bytecode::decode(bytes, in_text, out_text)?;
    Ok(Program { ir })
}

impl Program {
    /// Whether this program's source (or bytecode header) requested that
    /// its positional inputs be read as text rather than numbers.
    pub fn input_as_text(&self) -> bool {
        self.ir.input_as_text
    }

    /// Whether this program's source (or bytecode header) requested that
    /// its result cells be rendered as text rather than `index: value` lines.
    pub fn output_as_text(&self) -> bool {
        self.ir.output_as_text
    }

    /// Run the program with the OS-seeded RNG, starting from `direction`
    /// (or a uniformly random one if `None`).
    pub fn run(
        &self,
        inputs: &[i64],
        direction: Option<Direction>,
    ) -> Result<Vec<(i64, i64)>, RunError> {
        interpreter::run(&self.ir, inputs, direction)
    }

    /// Run the program, drawing its random starting direction (when
    /// `direction` is `None`) from `rng` instead of a hidden global.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        inputs: &[i64],
        direction: Option<Direction>,
        rng: &mut R,
    ) -> Result<Vec<(i64, i64)>, RunError> {
        interpreter::run_with_rng(&self.ir, inputs, direction, rng)
    }

    /// Run all four initial directions in order Up, Right, Down, Left.
    pub fn run_all(&self, inputs: &[i64]) -> Result<[Vec<(i64, i64)>; 4], RunError> {
        interpreter::run_all(&self.ir, inputs)
    }

    /// Serialize this program to its bytecode container.
    pub fn emit_bytecode(&self) -> Vec<u8> {
        bytecode::encode(&self.ir)
    }

    /// Lower this program into `target`'s portable source text.
    pub fn emit(&self, target: EmitTarget, function_only: bool) -> String {
        emit::emit(&self.ir, target, function_only)
    }
}
