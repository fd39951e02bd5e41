//! The Control-Stack-Environment machine: the datatypes it pushes
//! around (`control`), the environment table (`env`), the dispatch
//! loop itself (`machine`), built-in functions (`primitives`), and the
//! runtime error type (`trace`).

pub mod control;
pub mod env;
pub mod machine;
pub mod primitives;
pub mod trace;
