//! # Command-line argument surface
//!
//! The `hbcht` binary's flag set, defined with `clap`'s derive API since
//! the option set is large and several flags are mutually exclusive.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::emit::EmitTarget;
use crate::ir::Direction;

/// The three on-disk artifacts `-l`/output-suffix inference can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetLang {
    /// A dynamic scripting language (Python).
    #[value(name = "py")]
    Python,
    /// A statically compiled language (C).
    #[value(name = "c")]
    C,
    /// The crate's own compiled bytecode container.
    #[value(name = "hbc")]
    Bytecode,
}

impl From<TargetLang> for EmitTarget {
    fn from(lang: TargetLang) -> EmitTarget {
        match lang {
            TargetLang::Python => EmitTarget::Dynamic,
            TargetLang::C => EmitTarget::Static,
            TargetLang::Bytecode => {
                unreachable!("Bytecode is handled separately from EmitTarget by the CLI")
            }
        }
    }
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse_first_letter(s)
        .ok_or_else(|| format!("'{s}' is not a direction (expected up/right/down/left)"))
}

/// `hbcht` runs a board (or bytecode container) against inputs, or
/// compiles it to a portable artifact with `-c`.
#[derive(Debug, Parser)]
#[command(name = "hbcht", version, about)]
pub struct Cli {
    /// The board source or bytecode file to load.
    pub infile: PathBuf,

    /// Run mode: the program's inputs. Compile mode (`-c`): the single
    /// output file to write.
    pub args: Vec<String>,

    /// Run all four entries and print all four result lists.
    #[arg(short = 'b')]
    pub brute: bool,

    /// Run only the given entry direction(s); repeatable.
    #[arg(short = 'd', value_parser = parse_direction)]
    pub directions: Vec<Direction>,

    /// Target to compile to; inferred from the output suffix when omitted.
    #[arg(short = 'l', value_enum)]
    pub lang: Option<TargetLang>,

    /// Compile the program to `args[0]` instead of running it.
    #[arg(short = 'c')]
    pub compile: bool,

    /// Compile mode only: emit a bare callable artifact, no entry point.
    #[arg(short = 'f')]
    pub function_only: bool,

    /// Force input-as-text on, overriding the source's own directive.
    #[arg(short = 't', conflicts_with = "force_input_numbers")]
    pub force_input_text: bool,

    /// Force input-as-text off, overriding the source's own directive.
    #[arg(short = 'T')]
    pub force_input_numbers: bool,

    /// Force output-as-text on, overriding the source's own directive.
    #[arg(short = 's', conflicts_with = "force_output_numbers")]
    pub force_output_text: bool,

    /// Force output-as-text off, overriding the source's own directive.
    #[arg(short = 'S')]
    pub force_output_numbers: bool,

    /// Allow overwriting an existing output file in compile mode.
    #[arg(short = 'y')]
    pub overwrite: bool,
}

impl Cli {
    /// The caller's override for the input-as-text flag, from `-t`/`-T`.
    pub fn in_text_override(&self) -> Option<bool> {
        if self.force_input_text {
            Some(true)
        } else if self.force_input_numbers {
            Some(false)
        } else {
            None
        }
    }

    /// The caller's override for the output-as-text flag, from `-s`/`-S`.
    pub fn out_text_override(&self) -> Option<bool> {
        if self.force_output_text {
            Some(true)
        } else if self.force_output_numbers {
            Some(false)
        } else {
            None
        }
    }

    /// Infer the compile target from `-l`, or else from `outfile`'s suffix.
    pub fn target_lang(&self, outfile: &std::path::Path) -> Option<TargetLang> {
        if let Some(lang) = self.lang {
            return Some(lang);
        }
        match outfile.extension().and_then(|e| e.to_str()) {
            Some("hbc") => Some(TargetLang::Bytecode),
            Some("py") => Some(TargetLang::Python),
            Some("c") => Some(TargetLang::C),
            _ => None,
        }
    }
}
