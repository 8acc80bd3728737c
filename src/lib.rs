//! # hbcht
//!
//! A toolchain for hbcht ("Half-Broken Car in Heavy Traffic"), a 2D
//! esoteric language where a car wanders a grid of redirecting tiles,
//! mutating a sparse integer tape as it goes.
//!
//! ## Pipeline
//!
//! 1. **Board loader** ([`board`]) - decodes source text into a grid of tiles.
//! 2. **Walker / lowering** ([`walker`]) - simulates the car to produce flat IR.
//! 3. **Interpreter** ([`interpreter`]) - executes IR over a sparse tape.
//! 4. **Bytecode codec** ([`bytecode`]) - serializes IR to a binary container.
//! 5. **Target emitters** ([`emit`]) - lower IR to portable Python or C source.
//!
//! [`program`] ties all five stages together behind a single [`Program`]
//! facade; most callers only need [`load_source`]/[`load_bytecode`] and
//! [`Program`]'s methods.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hbcht::{load_source, emit::EmitTarget};
//!
//! let source = std::fs::read("board.hb").unwrap();
//! let program = load_source(&source, None, None).unwrap();
//! let result = program.run(&[3, 5, 0], None).unwrap();
//! println!("{:?}", result);
//! println!("{}", program.emit(EmitTarget::Dynamic, false));
//! ```

pub mod board;
pub mod bytecode;
pub mod emit;
pub mod error;
pub mod interpreter;
pub mod ir;
pub mod program;
pub mod tile;
pub mod walker;

pub use program::{load_bytecode, load_source, Program};
