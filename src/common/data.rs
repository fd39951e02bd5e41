use std::fmt;

/// The printable, runtime-visible values RPAL programs manipulate.
///
/// `Str` stores its lexeme *with* the surrounding quotes, matching the
/// reference implementation: `eq`/`ne` compare the raw lexeme, so two
/// strings are only equal if their quoted representations match too
/// (see the Open Question in spec.md §9 about `eq`).
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Int(i64),
    Str(String),
    Bool(bool),
    /// An identifier that resolved to nothing bound in any environment.
    /// Carries the identifier's own lexeme, so it prints back as itself
    /// and can still be compared/printed, per spec.md §3.4's "opaque
    /// symbol" fallback.
    Id(String),
    Dummy,
    Tup(Vec<Data>),
}

impl Data {
    /// `nil` is the empty tuple by convention (spec.md §4.5).
    pub fn nil() -> Data {
        Data::Tup(vec![])
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Data::Tup(t) if t.is_empty())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Int(_) => "integer",
            Data::Str(_) => "string",
            Data::Bool(_) => "truthvalue",
            Data::Id(_) => "identifier",
            Data::Dummy => "dummy",
            Data::Tup(_) => "tuple",
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Int(n) => write!(f, "{}", n),
            Data::Str(s) => write!(f, "{}", s),
            Data::Bool(b) => write!(f, "{}", b),
            Data::Id(name) => write!(f, "{}", name),
            Data::Dummy => write!(f, "dummy"),
            Data::Tup(items) => {
                if items.is_empty() {
                    return write!(f, "nil");
                }
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
