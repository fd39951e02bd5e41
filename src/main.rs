use std::process::ExitCode;
use std::rc::Rc;

use rpal::{run_source, standardize_source, parse_source, Source};

/// `<program> <input_file>` — parse, standardize, evaluate, and print
/// the result on a line prefixed `Result : ` (spec.md §6.2). `-ast`
/// dumps the parse tree and exits without standardizing or running;
/// `-st` dumps the standardized tree and exits without running.
pub fn main() -> ExitCode {
    let mut ast_flag = false;
    let mut st_flag = false;
    let mut path = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-ast" => ast_flag = true,
            "-st" => st_flag = true,
            other => path = Some(other.to_string()),
        }
    }

    let path = match path {
        Some(p) => p,
        None => {
            eprintln!("Usage: rpal [-ast | -st] <input_file>");
            return ExitCode::FAILURE;
        }
    };

    let source = match Source::path(path.as_ref()) {
        Ok(s) => Rc::new(s),
        Err(_) => {
            eprintln!("Error: file '{}' could not be read", path);
            return ExitCode::FAILURE;
        }
    };

    if ast_flag {
        return match parse_source(source) {
            Ok(tree) => {
                print!("{}", tree.dump());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    if st_flag {
        return match standardize_source(source) {
            Ok(tree) => {
                print!("{}", tree.dump());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut out = std::io::stdout();
    match run_source(source, &mut out) {
        Ok(value) => {
            println!("Result : {}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
