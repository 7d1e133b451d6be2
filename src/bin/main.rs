//! Thin CLI: read a source file, run it, print the outcome.

use std::env;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "cminor".to_string());
    let Some(path) = args.next() else {
        eprintln!("usage: {program_name} <source-file>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cminor: couldn't read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };

    match cminor::run(&source) {
        Ok(status) => {
            println!("Process terminated with status {status}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("cminor: {err}");
            ExitCode::FAILURE
        }
    }
}
