use crate::vm::control::Control;

/// One binding an environment frame can hold: either an ordinary data
/// value, or a reference to a built-in from E(0). Keeping primitives
/// out of `Data` keeps tuples and printed output free of anything that
/// isn't a first-order RPAL value.
#[derive(Debug, Clone)]
pub enum Binding {
    Value(Control),
    Primitive(String),
}

/// One `E(k)` frame: a dense, never-reused index, an optional parent
/// (absent only for `E(0)`), and its bindings in declaration order.
/// Frames are never freed — only marked `removed` when the machine
/// exits them — because a closure captured while the frame was active
/// may still read through it (spec.md §3.4).
#[derive(Debug)]
pub struct Environment {
    pub index: usize,
    pub parent: Option<usize>,
    pub bindings: Vec<(String, Binding)>,
    pub removed: bool,
}

pub struct EnvTable {
    envs: Vec<Environment>,
}

impl EnvTable {
    /// Builds the table with `E(0)` pre-populated with the primitive
    /// bindings (spec.md §5).
    pub fn new(primitives: &[&str]) -> EnvTable {
        let bindings = primitives.iter().map(|name| (name.to_string(), Binding::Primitive(name.to_string()))).collect();
        EnvTable { envs: vec![Environment { index: 0, parent: None, bindings, removed: false }] }
    }

    pub fn create_child(&mut self, parent: usize) -> usize {
        let index = self.envs.len();
        self.envs.push(Environment { index, parent: Some(parent), bindings: vec![], removed: false });
        index
    }

    pub fn bind(&mut self, env: usize, name: String, value: Control) {
        self.envs[env].bindings.push((name, Binding::Value(value)));
    }

    pub fn mark_removed(&mut self, env: usize) {
        self.envs[env].removed = true;
    }

    /// Walks from `env` up through parents looking for `name`,
    /// returning the nearest binding (lexical shadowing).
    pub fn lookup(&self, env: usize, name: &str) -> Option<&Binding> {
        let mut current = Some(env);
        while let Some(idx) = current {
            let frame = &self.envs[idx];
            if let Some((_, binding)) = frame.bindings.iter().rev().find(|(n, _)| n == name) {
                return Some(binding);
            }
            current = frame.parent;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::data::Data;

    #[test]
    fn lookup_walks_up_to_parent() {
        let mut table = EnvTable::new(&["Print"]);
        let child = table.create_child(0);
        table.bind(child, "x".to_string(), Control::Atom(Data::Int(5)));

        assert!(matches!(table.lookup(child, "x"), Some(Binding::Value(_))));
        assert!(matches!(table.lookup(child, "Print"), Some(Binding::Primitive(_))));
        assert!(table.lookup(child, "nonexistent").is_none());
    }

    #[test]
    fn shadowing_prefers_the_innermost_binding() {
        let mut table = EnvTable::new(&[]);
        table.bind(0, "x".to_string(), Control::Atom(Data::Int(1)));
        let child = table.create_child(0);
        table.bind(child, "x".to_string(), Control::Atom(Data::Int(2)));

        match table.lookup(child, "x") {
            Some(Binding::Value(Control::Atom(Data::Int(n)))) => assert_eq!(*n, 2),
            _ => panic!("expected the innermost binding"),
        }
    }

    #[test]
    fn removed_frames_are_flagged_not_freed() {
        let mut table = EnvTable::new(&[]);
        let child = table.create_child(0);
        table.bind(child, "x".to_string(), Control::Atom(Data::Int(1)));
        table.mark_removed(child);

        assert!(table.envs[child].removed);
        assert!(matches!(table.lookup(child, "x"), Some(Binding::Value(_))));
    }
}
