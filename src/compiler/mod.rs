// Each step in the compiler pipeline turns one datatype into another.
// loosely:
// ~> Source (string)
// -> Tokens          : lex.rs
// -> AST-1           : parse.rs
// -> AST-2           : standardize.rs
// -> Control structs : flatten.rs
// ~> Run (result)    : vm::machine

pub mod lex;
pub mod parse;
pub mod standardize;
pub mod flatten;

pub mod token;
pub mod ast;

pub mod syntax;
