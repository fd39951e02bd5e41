use std::collections::VecDeque;

use crate::common::data::Data;
use crate::compiler::ast::{Kind, Node};
use crate::compiler::flatten::Program;
use crate::vm::control::{Control, Delta};
use crate::vm::env::{Binding, EnvTable};
use crate::vm::primitives::{self, PRIMITIVES};
use crate::vm::trace::RuntimeError;

/// Runs a flattened program to completion and returns its result
/// (spec.md §4.4). `out` receives `Print`'s output.
pub fn run(program: &Program, out: &mut dyn std::io::Write) -> Result<Data, RuntimeError> {
    let mut envs = EnvTable::new(PRIMITIVES);
    let mut control: VecDeque<Control> = VecDeque::new();
    let mut stack: Vec<Control> = vec![];
    let mut current_env = 0usize;
    // Parallels the `E(k)` markers threaded through `control`/`stack`:
    // records which environment was active just before each one was
    // entered, so exiting it (rule group 7) restores the *caller's*
    // environment rather than the closure's lexically-captured parent.
    let mut callers: Vec<usize> = vec![0];

    control.push_back(Control::E(0));
    splice(&mut control, &program.blocks[0].body);
    stack.push(Control::E(0));

    while let Some(item) = control.pop_front() {
        step(item, &mut control, &mut stack, &mut envs, &mut current_env, &mut callers, out)?;
    }

    require_data(stack.pop().expect("the machine always leaves exactly one result on the stack"))
}

fn step(
    item: Control,
    control: &mut VecDeque<Control>,
    stack: &mut Vec<Control>,
    envs: &mut EnvTable,
    current_env: &mut usize,
    callers: &mut Vec<usize>,
    out: &mut dyn std::io::Write,
) -> Result<(), RuntimeError> {
    match item {
        // Id lookup (rule group 1): an identifier reaching the front of
        // the control list is resolved against the active environment
        // right here, before it ever reaches the stack. A binding can
        // be an ordinary value or a primitive; a name unbound all the
        // way up to E(0) falls back to itself (spec.md §3.4).
        Control::Atom(Data::Id(name)) => match envs.lookup(*current_env, &name) {
            Some(Binding::Value(v)) => stack.push(v.clone()),
            Some(Binding::Primitive(p)) => stack.push(Control::Primitive(p.clone())),
            None => stack.push(Control::Atom(Data::Id(name))),
        },
        Control::Atom(d) => stack.push(Control::Atom(d)),

        Control::Lambda { param, delta, env: _ } => {
            // Lambda env-capture (rule group 2): stamp in the
            // environment active right now, not the one active when
            // this Lambda was flattened.
            stack.push(Control::Lambda { param, delta, env: *current_env });
        }
        Control::Eta { param, delta, env } => stack.push(Control::Eta { param, delta, env }),
        Control::Ystar => stack.push(Control::Ystar),
        Control::Push(value) => stack.push(*value),
        Control::Primitive(name) => stack.push(Control::Primitive(name)),
        Control::PartialPrimitive(name, arg) => stack.push(Control::PartialPrimitive(name, arg)),

        Control::E(k) => {
            let result = stack.pop().expect("E(k) exit with an empty stack");
            let marker = stack.pop().expect("E(k) exit missing its floor marker");
            debug_assert!(matches!(marker, Control::E(m) if m == k));
            envs.mark_removed(k);
            *current_env = callers.pop().unwrap_or(0);
            stack.push(result);
        }

        Control::Gamma => apply_gamma(control, stack, envs, current_env, callers, out)?,

        Control::Beta { then_block, else_block } => {
            let cond = require_operand(stack.pop().expect("beta with an empty stack"))?;
            let branch = match cond {
                Data::Bool(true) => then_block,
                Data::Bool(false) => else_block,
                other => return Err(RuntimeError::type_error(&format!("expected a truthvalue, found a {}", other.type_name()))),
            };
            splice(control, &branch.body);
        }

        Control::Tau(n) => {
            let mut items = Vec::with_capacity(n);
            for _ in 0..n {
                items.push(require_operand(stack.pop().expect("tau with too few stack operands"))?);
            }
            items.reverse();
            stack.push(Control::Atom(Data::Tup(items)));
        }

        Control::Uop(name) => {
            let operand = require_operand(stack.pop().expect("unary operator with an empty stack"))?;
            stack.push(Control::Atom(apply_uop(&name, operand)?));
        }

        Control::Bop(name) => {
            let rhs = require_operand(stack.pop().expect("binary operator missing its right operand"))?;
            let lhs = require_operand(stack.pop().expect("binary operator missing its left operand"))?;
            stack.push(Control::Atom(apply_bop(&name, lhs, rhs)?));
        }
    }
    Ok(())
}

/// Every operator and the non-function arms of `Gamma` only accept a
/// concrete `Data` value; this is where an unbound identifier (still
/// wrapped as `Data::Id` after lookup fell through to itself) becomes
/// a genuine "unbound identifier used as operand" runtime error.
fn require_data(value: Control) -> Result<Data, RuntimeError> {
    match value {
        Control::Atom(d) => Ok(d),
        _ => Err(RuntimeError::type_error("expected a data value, found a function")),
    }
}

/// Like `require_data`, but also rejects a still-unbound identifier —
/// used everywhere a value is about to be fed to an operator or a
/// tuple, as opposed to simply being the program's final answer.
fn require_operand(value: Control) -> Result<Data, RuntimeError> {
    match require_data(value)? {
        Data::Id(name) => Err(RuntimeError::unbound_identifier(&name)),
        other => Ok(other),
    }
}

fn apply_gamma(
    control: &mut VecDeque<Control>,
    stack: &mut Vec<Control>,
    envs: &mut EnvTable,
    current_env: &mut usize,
    callers: &mut Vec<usize>,
    out: &mut dyn std::io::Write,
) -> Result<(), RuntimeError> {
    let argument = stack.pop().expect("gamma missing its argument");
    let callee = stack.pop().expect("gamma missing its callee");

    match callee {
        Control::Lambda { param, delta, env } => {
            apply_closure(&param, &delta, env, argument, control, stack, envs, current_env, callers)
        }

        // Applying Eta unrolls one recursive step: it is equivalent to
        // applying the original `rec`-bound lambda to Eta itself (which
        // rebinds the recursive name to Eta again) and then applying
        // *that* result to the real argument. We schedule this as two
        // fresh Gammas rather than recursing into apply_closure
        // directly, so the intermediate closure is produced by the
        // ordinary machine loop and picks up whatever environment is
        // current when it's actually created.
        Control::Eta { param, delta, env } => {
            let self_lambda = Control::Lambda { param: param.clone(), delta: delta.clone(), env };
            let pending = [
                Control::Push(Box::new(self_lambda)),
                Control::Eta { param, delta, env },
                Control::Gamma,
                Control::Push(Box::new(argument)),
                Control::Gamma,
            ];
            splice(control, &pending);
            Ok(())
        }

        Control::Ystar => match argument {
            Control::Lambda { param, delta, env } => {
                stack.push(Control::Eta { param, delta, env });
                Ok(())
            }
            _ => Err(RuntimeError::type_error("Y* must be applied to a function")),
        },

        Control::Primitive(name) => {
            if name == "Conc" {
                let first = require_data(argument)?;
                stack.push(Control::PartialPrimitive(name, Box::new(first)));
                Ok(())
            } else {
                stack.push(primitives::apply(&name, &argument, out)?);
                Ok(())
            }
        }

        Control::PartialPrimitive(name, first) if name == "Conc" => {
            stack.push(primitives::apply_conc(&first, &argument)?);
            Ok(())
        }

        Control::Atom(Data::Tup(items)) => {
            let index = require_data(argument)?;
            match index {
                Data::Int(n) if n >= 1 && (n as usize) <= items.len() => {
                    stack.push(Control::Atom(items[(n - 1) as usize].clone()));
                    Ok(())
                }
                Data::Int(n) => Err(RuntimeError::tuple_index_out_of_range(n, items.len())),
                other => Err(RuntimeError::type_error(&format!("tuple index must be an integer, found a {}", other.type_name()))),
            }
        }

        Control::Atom(other) => Err(RuntimeError::not_applicable(other.type_name())),
        _ => Err(RuntimeError::not_applicable("function")),
    }
}

fn apply_closure(
    param: &Node,
    delta: &std::rc::Rc<Delta>,
    env: usize,
    argument: Control,
    control: &mut VecDeque<Control>,
    stack: &mut Vec<Control>,
    envs: &mut EnvTable,
    current_env: &mut usize,
    callers: &mut Vec<usize>,
) -> Result<(), RuntimeError> {
    let new_env = envs.create_child(env);
    bind_pattern(envs, new_env, param, argument)?;
    // E(new_env) must land directly after the spliced body and ahead of
    // whatever else was already queued on control, or environment
    // restoration gets delayed past sibling code that should see the
    // caller's environment again. Push the marker first, then splice the
    // body in front of it.
    control.push_front(Control::E(new_env));
    splice(control, &delta.body);
    stack.push(Control::E(new_env));
    // The call's body must run with `new_env` active, not whatever was
    // active at the call site; E(new_env)'s own exit (rule group 7)
    // restores the caller's environment once the body finishes.
    callers.push(*current_env);
    *current_env = new_env;
    Ok(())
}

/// Binds a `Gamma` argument against a parameter pattern: a plain name,
/// `()` (the argument must be the empty tuple), or a tuple pattern
/// (`comma`, destructured component-wise).
fn bind_pattern(envs: &mut EnvTable, env: usize, pattern: &Node, value: Control) -> Result<(), RuntimeError> {
    match pattern.kind {
        Kind::Identifier => {
            let name = pattern.lexeme.clone().expect("identifier patterns always carry a lexeme");
            envs.bind(env, name, value);
            Ok(())
        }
        Kind::EmptyParams => match &value {
            Control::Atom(Data::Tup(items)) if items.is_empty() => Ok(()),
            _ => Err(RuntimeError::type_error("expected no arguments, '()'")),
        },
        Kind::Comma => match value {
            Control::Atom(Data::Tup(items)) if items.len() == pattern.children.len() => {
                for (child, item) in pattern.children.iter().zip(items.into_iter()) {
                    bind_pattern(envs, env, child, Control::Atom(item))?;
                }
                Ok(())
            }
            Control::Atom(Data::Tup(items)) => Err(RuntimeError::type_error(&format!(
                "expected a {}-tuple, found one of length {}",
                pattern.children.len(),
                items.len()
            ))),
            _ => Err(RuntimeError::type_error("expected a tuple argument to destructure")),
        },
        other => unreachable!("{:?} cannot appear as a parameter pattern", other),
    }
}

/// Splices a pre-compiled body onto the front of the control list,
/// preserving its internal left-to-right order (spec.md §4.3/§4.4 rule
/// group 8).
fn splice(control: &mut VecDeque<Control>, body: &[Control]) {
    for item in body.iter().rev() {
        control.push_front(item.clone());
    }
}

fn apply_uop(name: &str, operand: Data) -> Result<Data, RuntimeError> {
    match (name, operand) {
        ("neg", Data::Int(n)) => Ok(Data::Int(-n)),
        ("not", Data::Bool(b)) => Ok(Data::Bool(!b)),
        (op, other) => Err(RuntimeError::type_error(&format!("'{}' cannot be applied to a {}", op, other.type_name()))),
    }
}

fn apply_bop(name: &str, lhs: Data, rhs: Data) -> Result<Data, RuntimeError> {
    match name {
        "eq" => return Ok(Data::Bool(lhs == rhs)),
        "ne" => return Ok(Data::Bool(lhs != rhs)),
        _ => {}
    }

    match (name, lhs, rhs) {
        ("+", Data::Int(a), Data::Int(b)) => Ok(Data::Int(a + b)),
        ("-", Data::Int(a), Data::Int(b)) => Ok(Data::Int(a - b)),
        ("*", Data::Int(a), Data::Int(b)) => Ok(Data::Int(a * b)),
        ("/", Data::Int(_), Data::Int(0)) => Err(RuntimeError::division_by_zero()),
        ("/", Data::Int(a), Data::Int(b)) => Ok(Data::Int(a / b)), // truncates toward zero, as Rust's `/` does
        ("**", Data::Int(a), Data::Int(b)) if b >= 0 => a
            .checked_pow(b as u32)
            .map(Data::Int)
            .ok_or_else(|| RuntimeError::error("Arithmetic Error", "integer overflow in '**'", vec![])),
        ("**", Data::Int(_), Data::Int(_)) => Err(RuntimeError::type_error("'**' requires a non-negative exponent")),

        ("gr", Data::Int(a), Data::Int(b)) => Ok(Data::Bool(a > b)),
        ("ge", Data::Int(a), Data::Int(b)) => Ok(Data::Bool(a >= b)),
        ("ls", Data::Int(a), Data::Int(b)) => Ok(Data::Bool(a < b)),
        ("le", Data::Int(a), Data::Int(b)) => Ok(Data::Bool(a <= b)),

        ("or", Data::Bool(a), Data::Bool(b)) => Ok(Data::Bool(a || b)),
        ("&", Data::Bool(a), Data::Bool(b)) => Ok(Data::Bool(a && b)),

        ("aug", Data::Tup(mut items), Data::Tup(more)) => {
            items.extend(more);
            Ok(Data::Tup(items))
        }
        ("aug", Data::Tup(mut items), rhs) => {
            items.push(rhs);
            Ok(Data::Tup(items))
        }

        (op, a, b) => Err(RuntimeError::type_error(&format!("'{}' cannot be applied to a {} and a {}", op, a.type_name(), b.type_name()))),
    }
}
