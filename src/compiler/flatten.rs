use std::rc::Rc;

use crate::common::data::Data;
use crate::compiler::ast::{Kind, Node};
use crate::compiler::syntax::CompileError;
use crate::vm::control::{Control, Delta};

/// The flattened program: `blocks[0]` is the top-level control
/// sequence; every `lambda` body and conditional branch gets its own
/// entry, allocated as the tree is walked (spec.md §4.3).
pub struct Program {
    pub blocks: Vec<Rc<Delta>>,
}

pub fn flatten(root: &Node) -> Result<Program, CompileError> {
    let mut blocks = vec![];
    let entry = flatten_expr(root, &mut blocks)?;
    blocks.insert(0, Rc::new(Delta { id: 0, body: entry }));
    Ok(Program { blocks })
}

fn new_block(blocks: &mut Vec<Rc<Delta>>) -> usize {
    let id = blocks.len() + 1; // +1 because block 0 is reserved for the entry point
    blocks.push(Rc::new(Delta { id, body: vec![] }));
    id
}

fn set_block(blocks: &mut Vec<Rc<Delta>>, id: usize, body: Vec<Control>) {
    blocks[id - 1] = Rc::new(Delta { id, body });
}

fn flatten_expr(node: &Node, blocks: &mut Vec<Rc<Delta>>) -> Result<Vec<Control>, CompileError> {
    match node.kind {
        Kind::Identifier => {
            let name = node.lexeme.clone().expect("identifier nodes always carry a lexeme");
            Ok(vec![Control::Atom(Data::Id(name))])
        }
        Kind::Integer => {
            let lexeme = node.lexeme.as_deref().unwrap_or("0");
            let n: i64 = lexeme.parse().map_err(|_| {
                CompileError::standardization(format!("'{}' is not a valid integer literal", lexeme), node.span.clone())
            })?;
            Ok(vec![Control::Atom(Data::Int(n))])
        }
        Kind::Str => {
            let lexeme = node.lexeme.clone().unwrap_or_default();
            Ok(vec![Control::Atom(Data::Str(lexeme))])
        }
        Kind::True => Ok(vec![Control::Atom(Data::Bool(true))]),
        Kind::False => Ok(vec![Control::Atom(Data::Bool(false))]),
        Kind::Nil => Ok(vec![Control::Atom(Data::nil())]),
        Kind::Dummy => Ok(vec![Control::Atom(Data::Dummy)]),

        Kind::Gamma => {
            let mut out = flatten_expr(&node.children[0], blocks)?;
            out.extend(flatten_expr(&node.children[1], blocks)?);
            out.push(Control::Gamma);
            Ok(out)
        }

        Kind::Tau => {
            let mut out = vec![];
            for child in &node.children {
                out.extend(flatten_expr(child, blocks)?);
            }
            out.push(Control::Tau(node.children.len()));
            Ok(out)
        }

        Kind::Aug => binary_op(node, "aug", blocks),
        Kind::OpOr => binary_op(node, "or", blocks),
        Kind::OpAnd => binary_op(node, "&", blocks),
        Kind::OpPlus => binary_op(node, "+", blocks),
        Kind::OpMinus => binary_op(node, "-", blocks),
        Kind::OpMul => binary_op(node, "*", blocks),
        Kind::OpDiv => binary_op(node, "/", blocks),
        Kind::OpPow => binary_op(node, "**", blocks),
        Kind::OpCompare => binary_op(node, node.lexeme.as_deref().unwrap_or("eq"), blocks),

        Kind::OpNot => unary_op(node, "not", blocks),
        Kind::OpNeg => unary_op(node, "neg", blocks),

        Kind::Conditional => {
            let mut out = flatten_expr(&node.children[0], blocks)?;

            let then_id = new_block(blocks);
            let then_body = flatten_expr(&node.children[1], blocks)?;
            set_block(blocks, then_id, then_body);

            let else_id = new_block(blocks);
            let else_body = flatten_expr(&node.children[2], blocks)?;
            set_block(blocks, else_id, else_body);

            out.push(Control::Beta { then_block: blocks[then_id - 1].clone(), else_block: blocks[else_id - 1].clone() });
            Ok(out)
        }

        Kind::Lambda => {
            let param = node.children[0].clone();
            let id = new_block(blocks);
            let body = flatten_expr(&node.children[1], blocks)?;
            set_block(blocks, id, body);
            Ok(vec![Control::Lambda { param: Rc::new(param), delta: blocks[id - 1].clone(), env: 0 }])
        }

        Kind::Ystar => Ok(vec![Control::Ystar]),

        other => Err(CompileError::standardization(
            format!("{:?} cannot appear in a standardized expression", other),
            node.span.clone(),
        )),
    }
}

fn binary_op(node: &Node, name: &str, blocks: &mut Vec<Rc<Delta>>) -> Result<Vec<Control>, CompileError> {
    let mut out = flatten_expr(&node.children[0], blocks)?;
    out.extend(flatten_expr(&node.children[1], blocks)?);
    out.push(Control::Bop(name.to_string()));
    Ok(out)
}

fn unary_op(node: &Node, name: &str, blocks: &mut Vec<Rc<Delta>>) -> Result<Vec<Control>, CompileError> {
    let mut out = flatten_expr(&node.children[0], blocks)?;
    out.push(Control::Uop(name.to_string()));
    Ok(out)
}
