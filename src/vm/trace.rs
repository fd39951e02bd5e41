use std::fmt;

use crate::common::span::Span;

/// A fault raised while the CSE machine is running (spec.md §7): type
/// mismatches, division by zero, tuple indices out of range, applying
/// `Gamma` to something that isn't a function, an unbound identifier
/// used where a concrete value was required, or I/O failure from
/// `Print`. Unlike `CompileError`, these can only be discovered by
/// actually executing the program.
#[derive(Debug, PartialEq, Eq)]
pub struct RuntimeError {
    kind: String,
    message: String,
    spans: Vec<Span>,
}

impl RuntimeError {
    pub fn error(kind: &str, message: &str, spans: Vec<Span>) -> RuntimeError {
        RuntimeError { kind: kind.to_string(), message: message.to_string(), spans }
    }

    pub fn type_error(message: &str) -> RuntimeError {
        RuntimeError::error("Type Error", message, vec![])
    }

    pub fn division_by_zero() -> RuntimeError {
        RuntimeError::error("Arithmetic Error", "division by zero", vec![])
    }

    pub fn tuple_index_out_of_range(index: i64, len: usize) -> RuntimeError {
        RuntimeError::error(
            "Index Error",
            &format!("tuple index {} out of range for a tuple of length {}", index, len),
            vec![],
        )
    }

    pub fn not_applicable(type_name: &str) -> RuntimeError {
        RuntimeError::error("Type Error", &format!("cannot apply gamma to a {}", type_name), vec![])
    }

    pub fn unbound_identifier(name: &str) -> RuntimeError {
        RuntimeError::error("Name Error", &format!("'{}' is unbound and cannot be used as an operand", name), vec![])
    }

    pub fn undefined_primitive(name: &str) -> RuntimeError {
        RuntimeError::error("Name Error", &format!("no such primitive '{}'", name), vec![])
    }

    pub fn io(message: String) -> RuntimeError {
        RuntimeError::error("IO Error", &message, vec![])
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.spans.is_empty() {
            writeln!(f, "Traceback, most recent call last:")?;
            for span in self.spans.iter() {
                fmt::Display::fmt(span, f)?;
            }
        }
        write!(f, "Runtime {}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RuntimeError {}
