use crate::common::data::Data;
use crate::vm::control::Control;
use crate::vm::trace::RuntimeError;

/// The names bound in E(0) (spec.md §5). `Conc` is the only arity-2
/// primitive; it's applied through two successive `Gamma`s, just like
/// any curried RPAL function, so its first application yields a
/// `Control::PartialPrimitive` rather than a result.
pub const PRIMITIVES: &[&str] = &[
    "Print", "Stem", "Stern", "Conc", "Order", "Isinteger", "Isstring", "Istuple", "Isdummy",
    "Istruthvalue", "Isfunction",
];

/// Applies a fully-saturated primitive to its argument, writing to
/// `out` for `Print`'s side effect. `arg` is the raw stack value so
/// `Isfunction`/`Print` can inspect non-`Data` callables too.
pub fn apply(name: &str, arg: &Control, out: &mut dyn std::io::Write) -> Result<Control, RuntimeError> {
    match name {
        "Print" => {
            match arg {
                Control::Atom(d) => write!(out, "{}", d).map_err(|e| RuntimeError::io(e.to_string()))?,
                _ => write!(out, "[function]").map_err(|e| RuntimeError::io(e.to_string()))?,
            }
            Ok(Control::Atom(Data::Dummy))
        }
        "Isfunction" => {
            let is_fn = !matches!(arg, Control::Atom(_));
            Ok(Control::Atom(Data::Bool(is_fn)))
        }
        "Stem" => {
            let s = as_string(arg)?;
            let first = s.chars().nth(1).map(|c| c.to_string()).unwrap_or_default();
            Ok(Control::Atom(Data::Str(format!("'{}'", first))))
        }
        "Stern" => {
            let s = as_string(arg)?;
            let inner: String = s.chars().skip(2).take(s.chars().count().saturating_sub(3)).collect();
            Ok(Control::Atom(Data::Str(format!("'{}'", inner))))
        }
        "Order" => {
            let tup = as_tuple(arg)?;
            Ok(Control::Atom(Data::Int(tup.len() as i64)))
        }
        "Isinteger" => Ok(Control::Atom(Data::Bool(matches!(arg, Control::Atom(Data::Int(_)))))),
        "Isstring" => Ok(Control::Atom(Data::Bool(matches!(arg, Control::Atom(Data::Str(_)))))),
        "Istuple" => Ok(Control::Atom(Data::Bool(matches!(arg, Control::Atom(Data::Tup(_)))))),
        "Isdummy" => Ok(Control::Atom(Data::Bool(matches!(arg, Control::Atom(Data::Dummy))))),
        "Istruthvalue" => Ok(Control::Atom(Data::Bool(matches!(arg, Control::Atom(Data::Bool(_)))))),
        other => Err(RuntimeError::undefined_primitive(other)),
    }
}

pub fn apply_conc(first: &Data, second: &Control) -> Result<Control, RuntimeError> {
    let a = string_contents(first)?;
    let b = as_string(second)?;
    let b_contents = string_contents(&Data::Str(b))?;
    Ok(Control::Atom(Data::Str(format!("'{}{}'", a, b_contents))))
}

fn as_string(value: &Control) -> Result<String, RuntimeError> {
    match value {
        Control::Atom(Data::Str(s)) => Ok(s.clone()),
        Control::Atom(other) => Err(RuntimeError::type_error(&format!("expected a string, found a {}", other.type_name()))),
        _ => Err(RuntimeError::type_error("expected a string, found a function")),
    }
}

fn as_tuple(value: &Control) -> Result<Vec<Data>, RuntimeError> {
    match value {
        Control::Atom(Data::Tup(items)) => Ok(items.clone()),
        Control::Atom(other) => Err(RuntimeError::type_error(&format!("expected a tuple, found a {}", other.type_name()))),
        _ => Err(RuntimeError::type_error("expected a tuple, found a function")),
    }
}

fn string_contents(value: &Data) -> Result<String, RuntimeError> {
    match value {
        Data::Str(s) => Ok(s.chars().skip(1).take(s.chars().count().saturating_sub(2)).collect()),
        other => Err(RuntimeError::type_error(&format!("expected a string, found a {}", other.type_name()))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::sink;

    #[test]
    fn stem_takes_the_first_character() {
        let result = apply("Stem", &Control::Atom(Data::Str("'hello'".to_string())), &mut sink()).unwrap();
        assert_eq!(result, wrap_str("'h'"));
    }

    #[test]
    fn stern_drops_the_first_character() {
        let result = apply("Stern", &Control::Atom(Data::Str("'hello'".to_string())), &mut sink()).unwrap();
        assert_eq!(result, wrap_str("'ello'"));
    }

    #[test]
    fn order_counts_tuple_elements() {
        let tup = Data::Tup(vec![Data::Int(1), Data::Int(2)]);
        let result = apply("Order", &Control::Atom(tup), &mut sink()).unwrap();
        assert_eq!(result, Control::Atom(Data::Int(2)));
    }

    #[test]
    fn conc_joins_string_contents() {
        let result = apply_conc(&Data::Str("'foo'".to_string()), &Control::Atom(Data::Str("'bar'".to_string()))).unwrap();
        assert_eq!(result, wrap_str("'foobar'"));
    }

    fn wrap_str(s: &str) -> Control {
        Control::Atom(Data::Str(s.to_string()))
    }
}
