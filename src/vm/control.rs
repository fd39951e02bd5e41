use std::rc::Rc;

use crate::common::data::Data;
use crate::compiler::ast::Node;

/// A compiled function or conditional-branch body: a flat, already
/// order-correct sequence of `Control` items plus the block id it was
/// assigned during flattening (used only for debug output).
#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    pub id: usize,
    pub body: Vec<Control>,
}

/// One item of the control list or the value stack (spec.md §3.3 — the
/// same representation flows through both). `Atom`, `Lambda`, `Eta`,
/// `Ystar`, `Primitive`, `PartialPrimitive` and `E` are values: when the
/// machine meets one on the control list it pushes a copy onto the
/// stack unchanged (`Lambda` additionally stamps in the environment
/// active at that moment — its capture). `Gamma`, `Beta`, `Tau` and the
/// operator kinds are actions: meeting one on the control list pops
/// operands off the stack and performs a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Atom(Data),
    Lambda { param: Rc<Node>, delta: Rc<Delta>, env: usize },
    Eta { param: Rc<Node>, delta: Rc<Delta>, env: usize },
    Ystar,
    /// A built-in bound in E(0), not yet applied to any argument.
    Primitive(String),
    /// `Conc` after its first argument: awaits one more `Gamma`.
    PartialPrimitive(String, Box<Data>),
    /// Marks the boundary of an environment entered by a `Gamma`
    /// application; popping it restores the caller's current
    /// environment (spec.md §3.4, §4.4 rule group 7).
    E(usize),
    /// Re-injects an already-evaluated value verbatim: unlike `Lambda`,
    /// it does not restamp the environment. Used only by the machine
    /// itself to schedule an `Eta` unrolling (spec.md §4.4 rule group
    /// 3) without disturbing a closure's captured environment.
    Push(Box<Control>),

    Gamma,
    Beta { then_block: Rc<Delta>, else_block: Rc<Delta> },
    Tau(usize),
    Uop(String),
    Bop(String),
}
