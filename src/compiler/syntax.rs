use std::fmt;

use crate::common::span::Span;

/// A static error, i.e. one caught before the CSE machine ever runs:
/// lexical (bad character), syntactic (token mismatch against the
/// grammar), or a standardization-stage arity failure (spec.md §7 —
/// "programmer error in the parser; should not occur for syntactically
/// valid input", kept as its own kind so it's never confused with a
/// genuine syntax error while debugging).
#[derive(Debug, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntactic,
    Standardization,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CompileError {
    pub stage: Stage,
    pub reason: String,
    pub span: Span,
}

impl CompileError {
    pub fn lexical(reason: String, span: Span) -> CompileError {
        CompileError { stage: Stage::Lexical, reason, span }
    }

    pub fn syntactic(reason: String, span: Span) -> CompileError {
        CompileError { stage: Stage::Syntactic, reason, span }
    }

    pub fn standardization(reason: String, span: Span) -> CompileError {
        CompileError { stage: Stage::Standardization, reason, span }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.span.is_empty() {
            fmt::Display::fmt(&self.span, f)?;
        }

        let label = match self.stage {
            Stage::Lexical => "Lexical Error",
            Stage::Syntactic => "Syntax Error",
            Stage::Standardization => "Standardization Error",
        };

        write!(f, "{}: {}", label, self.reason)
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use std::rc::Rc;

    #[test]
    fn displays_reason() {
        let source = Rc::new(Source::source("x + `"));
        let error = CompileError::lexical("Unexpected character '`'".to_string(), Span::new(&source, 4, 1));
        let rendered = format!("{}", error);
        assert!(rendered.contains("Lexical Error: Unexpected character '`'"));
    }
}
