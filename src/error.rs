//! # Error types
//!
//! Each phase of the pipeline (source/bytecode load, interpretation, target
//! emission) has its own error enum. Keeping them distinct lets callers match
//! on exactly the kinds of failure that phase can produce instead of a single
//! flat, stringly-typed error.

use thiserror::Error;

/// Errors that can occur while loading a program, either from board source
/// text or from a compiled bytecode container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no program data")]
    NoProgramData,
    #[error("no source code")]
    NoSourceCode,
    #[error("program must have one car")]
    NoCar,
    #[error("program must have one exit")]
    NoExit,
    #[error("program can only have one car")]
    MultipleCars,
    #[error("program can only have one exit")]
    MultipleExits,
    #[error("infinite loop present")]
    InfiniteLoop,
    #[error("only bytecode version 1 is supported, found version {0}")]
    UnsupportedBytecodeVersion(u8),
    #[error("corrupt bytecode: {0}")]
    CorruptBytecode(&'static str),
    #[error("jump target {target} out of range for {count} instructions")]
    TargetOutOfRange { target: u32, count: usize },
}

/// Errors that can occur while running a loaded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("invalid direction")]
    InvalidDirection,
    #[error("input values must be non-negative")]
    NegativeInput,
}

/// Errors that can occur while emitting a program to a target language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("no support for language {0:?}")]
    UnknownLanguage(String),
    #[error("output file already exists")]
    OutputFileExists,
}
