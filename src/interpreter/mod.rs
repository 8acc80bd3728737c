//! # Interpreter
//!
//! Executes a lowered [`Program`](crate::ir::Program)'s IR over a two-sided
//! sparse integer tape, exactly reproducing `original_source/hbcht.py`'s
//! `_run_commands` loop.


use std::collections::HashMap;

use rand::Rng;

use crate::error::RunError;
use crate::ir::{Direction, Opcode, Program};

/// The sparse, two-sided integer tape a program runs over. Absent indices
/// read as 0; only entries ever written are stored.
#[derive(Debug, Default)]
struct Tape {
    cells: HashMap<i64, i64>,
}

impl Tape {
    fn get(&self, index: i64) -> i64 {
        self.cells.get(&index).copied().unwrap_or(0)
    }

    fn add(&mut self, index: i64, delta: i64) {
        let entry = self.cells.entry(index).or_insert(0);
        *entry += delta;
        if *entry == 0 {
            self.cells.remove(&index);
        }
    }

    /// The sorted `(index, value)` pairs for nonzero cells, negatives first.
    fn into_sorted_pairs(self) -> Vec<(i64, i64)> {
        let mut pairs: Vec<(i64, i64)> = self.cells.into_iter().collect();
        pairs.sort_by_key(|&(index, _)| index);
        pairs
    }
}

/// Run `program` starting from `direction` (or a uniformly random one if
/// `None`), using the default OS-seeded RNG. See [`run_with_rng`] for a
/// version that takes an injected RNG.
pub fn run(
    program: &Program,
    inputs: &[i64],
    direction: Option<Direction>,
) -> Result<Vec<(i64, i64)>, RunError> {
    run_with_rng(program, inputs, direction, &mut rand::thread_rng())
}

/// Run `program` starting from `direction`, drawing the random starting
/// direction (when `direction` is `None`) from `rng` rather than a hidden
/// global, so callers and tests can pin the outcome.
pub fn run_with_rng<R: Rng + ?Sized>(
    program: &Program,
    inputs: &[i64],
    direction: Option<Direction>,
    rng: &mut R,
) -> Result<Vec<(i64, i64)>, RunError> {
    if inputs.iter().any(|&v| v < 0) {
        return Err(RunError::NegativeInput);
    }

    let direction = direction.unwrap_or_else(|| Direction::ALL[rng.gen_range(0..4)]);
    let mut j = program.entries.offset(direction);
    let n = program.instructions.len();
    if j >= n {
        return Err(RunError::InvalidDirection);
    }

    let mut tape = Tape::default();
    for (index, &value) in inputs.iter().enumerate() {
        tape.add(index as i64, value);
    }

    log::debug!("running from {direction:?}, entry at instruction {j}");
    let mut i: i64 = 0;
    let mut steps: u64 = 0;
    loop {
        let inst = program
            .instructions
            .get(j)
            .expect("a validated IR never indexes past its own end");
        steps += 1;
        log::trace!("step {steps}: j={j} i={i} {:?}({})", inst.op, inst.arg);
        match inst.op {
            Opcode::Dec => {
                tape.add(i, -(inst.arg as i64));
                j += 1;
            }
            Opcode::Inc => {
                tape.add(i, inst.arg as i64);
                j += 1;
            }
            Opcode::PrevCell => {
                i -= inst.arg as i64;
                j += 1;
            }
            Opcode::NextCell => {
                i += inst.arg as i64;
                j += 1;
            }
            Opcode::If => {
                if tape.get(i) != tape.get(i - 1) {
                    j = inst.arg as usize;
                } else {
                    j += 1;
                }
            }
            Opcode::Goto => j = inst.arg as usize,
            Opcode::Exit => {
                log::debug!("exited after {steps} steps");
                return Ok(tape.into_sorted_pairs());
            }
        }
    }
}

/// Run all four initial directions in order Up, Right, Down, Left and
/// return their four result lists.
pub fn run_all(program: &Program, inputs: &[i64]) -> Result<[Vec<(i64, i64)>; 4], RunError> {
    let mut results = Vec::with_capacity(4);
    for &direction in &Direction::ALL {
        results.push(run(program, inputs, Some(direction))?);
    }
    Ok(results
        .try_into()
        .expect("exactly one result is pushed per Direction::ALL entry"))
}
