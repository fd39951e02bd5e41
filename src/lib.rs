//! # RPAL
//! This crate is an interpreter for RPAL (Right-reference Pedagogic
//! Algorithmic Language), a small functional language with `let`/
//! `where`/`fn`/`rec`/`within`/`and` bindings, tuples, conditionals,
//! and the standard arithmetic/relational/logical operators. Given
//! RPAL source text, it produces a single printed value.
//!
//! ## Overview of the interpretation pipeline
//! Source code is represented as a `Source`: some text, plus
//! (optionally) the path it was read from. Regions of source are
//! marked with `Span`s, which carry a reference-counted handle back
//! to the `Source` they came from; compiler datastructures are
//! `Spanned` to indicate where they originated, and `Span`s are used
//! throughout the compiler when reporting errors.
//!
//! Compilation steps can raise `Err(CompileError)`, indicating a
//! lexical, syntactic, or standardization fault; the CSE machine can
//! raise `Err(RuntimeError)` once a program actually runs.
//!
//! The first phase is lexing: `compiler::lex::lex` reads through a
//! `Source` and produces a stream of `Spanned<Token>`s, greedily
//! matching the longest token at each position.
//!
//! The next phase is parsing: `compiler::parse::parse` takes the
//! token stream and builds the parse tree (AST-1), a recursive-descent
//! walk over the RPAL grammar.
//!
//! The parse tree is then standardized: `compiler::standardize::standardize`
//! rewrites `let`/`where`/`fcn_form`/`within`/`and`/`rec`/`@` away,
//! leaving a tree built only from `gamma`, `lambda`, `=`, `,`, `tau`,
//! `->`, `aug`, `Y*`, operators, and atoms (AST-2).
//!
//! `compiler::flatten::flatten` turns the standardized tree into a
//! forest of `Delta` blocks — linear control-symbol sequences the CSE
//! machine can run directly, with one block per lambda body and per
//! conditional branch.
//!
//! Finally, `vm::machine::run` drives the Control-Stack-Environment
//! machine to completion over those blocks and returns the program's
//! final `Data` value.
//!
//! ## Embedding RPAL in Rust
//! ```
//! use rpal::{run_source, Source};
//! use std::rc::Rc;
//!
//! let mut sink = std::io::sink();
//! let result = run_source(Rc::new(Source::source("let x = 5 in x + 3")), &mut sink).unwrap();
//! assert_eq!(format!("{}", result), "8");
//! ```

pub mod common;
pub mod compiler;
pub mod vm;

use std::rc::Rc;

pub use common::{data::Data, source::Source, span::{Span, Spanned}};
pub use compiler::syntax::CompileError;
pub use vm::trace::RuntimeError;

/// Any failure that can occur while running a complete RPAL program,
/// from lexing through the CSE machine.
#[derive(Debug)]
pub enum Error {
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{}", e),
            Error::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Error {
        Error::Compile(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Error {
        Error::Runtime(e)
    }
}

/// Lexes and parses a `Source`, producing the parse tree (AST-1).
/// Exposed on its own so the `-ast` debug flag can dump it without
/// standardizing or running anything.
pub fn parse_source(source: Rc<Source>) -> Result<compiler::ast::Node, CompileError> {
    let tokens = compiler::lex::lex(source)?;
    compiler::parse::parse(tokens)
}

/// Parses and standardizes a `Source`, producing the standardized
/// tree (AST-2). Exposed on its own so the `-st` debug flag can dump
/// it without flattening or running anything.
pub fn standardize_source(source: Rc<Source>) -> Result<compiler::ast::Node, CompileError> {
    compiler::standardize::standardize(parse_source(source)?)
}

/// Runs the full pipeline — lex, parse, standardize, flatten, execute
/// — over a `Source`, returning the program's final value. `out`
/// receives anything `Print` writes during the run.
pub fn run_source(source: Rc<Source>, out: &mut dyn std::io::Write) -> Result<Data, Error> {
    let standardized = standardize_source(source)?;
    let program = compiler::flatten::flatten(&standardized)?;
    Ok(vm::machine::run(&program, out)?)
}
