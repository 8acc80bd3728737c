//! `hbcht` — run or compile a board program from the command line.

mod cli;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use cli::{Cli, TargetLang};
use hbcht::emit::EmitTarget;
use hbcht::error::{EmitError, LoadError, RunError};
use hbcht::ir::Direction;

/// The CLI's own top-level error, wrapping every library error plus I/O
/// failures the binary itself can hit.
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Run(#[from] RunError),
    #[error("{0}")]
    Emit(#[from] EmitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hbcht: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let bytes = fs::read(&cli.infile)?;
    let in_text = cli.in_text_override();
    let out_text = cli.out_text_override();

    let looks_like_bytecode = cli
        .infile
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("hbc"))
        .unwrap_or(false);

    let program = if looks_like_bytecode {
        hbcht::load_bytecode(&bytes, in_text, out_text)?
    } else {
        hbcht::load_source(&bytes, in_text, out_text)?
    };

    if cli.compile {
        compile(cli, &program)
    } else {
        execute(cli, &program)
    }
}

fn compile(cli: &Cli, program: &hbcht::Program) -> Result<(), CliError> {
    let outfile = cli.args.first().map(Path::new).ok_or_else(|| {
        CliError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "compile mode needs an output file",
        ))
    })?;

    if outfile.exists() && !cli.overwrite {
        return Err(CliError::Emit(EmitError::OutputFileExists));
    }

    let lang = cli
        .target_lang(outfile)
        .ok_or_else(|| EmitError::UnknownLanguage(outfile.display().to_string()))?;

    match lang {
        TargetLang::Bytecode => fs::write(outfile, program.emit_bytecode())?,
        TargetLang::Python | TargetLang::C => {
            let target: EmitTarget = lang.into();
            fs::write(outfile, program.emit(target, cli.function_only))?;
        }
    }
    Ok(())
}

fn execute(cli: &Cli, program: &hbcht::Program) -> Result<(), CliError> {
    let input_as_text = cli.in_text_override().unwrap_or_else(|| program.input_as_text());
    let output_as_text = cli
        .out_text_override()
        .unwrap_or_else(|| program.output_as_text());
    let inputs = convert_inputs(&cli.args, input_as_text);

    if cli.brute {
        for (direction, result) in Direction::ALL.iter().zip(program.run_all(&inputs)?) {
            print!("{direction:?}:\n{}", format_result(&result, output_as_text));
        }
        return Ok(());
    }

    if !cli.directions.is_empty() {
        for &direction in &cli.directions {
            let result = program.run(&inputs, Some(direction))?;
            print!("{direction:?}:\n{}", format_result(&result, output_as_text));
        }
        return Ok(());
    }

    let result = program.run(&inputs, None)?;
    print!("{}", format_result(&result, output_as_text));
    Ok(())
}

/// Text mode flattens every positional argument's UTF-8 code points into
/// one combined cell sequence; number mode parses each argument as an
/// integer, falling back to its own code points when it isn't one —
/// matching `original_source/hbcht.py`'s `run()` input conversion.
fn convert_inputs(args: &[String], input_as_text: bool) -> Vec<i64> {
    if input_as_text {
        return args.iter().flat_map(|a| a.chars()).map(|c| c as i64).collect();
    }
    let mut out = Vec::new();
    for a in args {
        match a.parse::<i64>() {
            Ok(n) => out.push(n),
            Err(_) => out.extend(a.chars().map(|c| c as i64)),
        }
    }
    out
}

/// Render a result tape the way the CLI's `format_output=True` mode does:
/// concatenated characters in text mode, else padded `index: value` lines
/// (or `(empty)` for a program with no nonzero cells).
fn format_result(cells: &[(i64, i64)], output_as_text: bool) -> String {
    if output_as_text {
        let text: String = cells.iter().map(|&(_, v)| (v as u8) as char).collect();
        return text + "\n";
    }
    if cells.is_empty() {
        return "(empty)\n".to_string();
    }
    let width = cells
        .iter()
        .map(|(index, _)| index.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for (index, value) in cells {
        out.push_str(&format!("{index:width$}: {value}\n"));
    }
    out
}
