use crate::common::span::Span;
use crate::compiler::ast::{Kind, Node};
use crate::compiler::syntax::CompileError;

/// Rewrites AST-1 into AST-2 (spec.md §4.2): a bottom-up pass that
/// reduces `let`, `where`, `fcn_form`, multi-parameter `lambda`,
/// `within`, `and`, `rec` and `@` down to `gamma`/`lambda`/`tau`/`comma`
/// combinations. Every other kind passes through unchanged once its
/// children are standardized.
pub fn standardize(node: Node) -> Result<Node, CompileError> {
    let Node { kind, lexeme, children, span } = node;
    let children = children
        .into_iter()
        .map(standardize)
        .collect::<Result<Vec<_>, _>>()?;

    match kind {
        Kind::Let => {
            let mut it = children.into_iter();
            let binding = it.next().unwrap();
            let body = it.next().unwrap();
            let (pattern, bound) = split_binding(binding, &span)?;
            let lambda_span = Span::combine(&pattern.span, &body.span);
            let lambda = Node::new(Kind::Lambda, None, vec![pattern, body], lambda_span);
            Ok(Node::new(Kind::Gamma, None, vec![lambda, bound], span))
        }

        Kind::Where => {
            let mut it = children.into_iter();
            let body = it.next().unwrap();
            let binding = it.next().unwrap();
            let (pattern, bound) = split_binding(binding, &span)?;
            let lambda_span = Span::combine(&pattern.span, &body.span);
            let lambda = Node::new(Kind::Lambda, None, vec![pattern, body], lambda_span);
            Ok(Node::new(Kind::Gamma, None, vec![lambda, bound], span))
        }

        Kind::FcnForm => {
            let mut it = children.into_iter();
            let name = it.next().unwrap();
            let rest: Vec<Node> = it.collect();
            let mut rest = rest;
            let body = rest.pop().expect("fcn_form always carries a body");
            let params = rest;
            let lambda = curry(params, body);
            Ok(Node::new(Kind::Equal, None, vec![name, lambda], span))
        }

        Kind::Lambda if children.len() > 2 => {
            let mut children = children;
            let body = children.pop().unwrap();
            let params = children;
            Ok(curry(params, body))
        }

        Kind::Within => {
            let mut it = children.into_iter();
            let outer = it.next().unwrap();
            let inner = it.next().unwrap();
            let (pattern1, bound1) = split_binding(outer, &span)?;
            let (pattern2, bound2) = split_binding(inner, &span)?;
            let lambda_span = Span::combine(&pattern1.span, &bound2.span);
            let lambda = Node::new(Kind::Lambda, None, vec![pattern1, bound2], lambda_span);
            let gamma = Node::new(Kind::Gamma, None, vec![lambda, bound1], span.clone());
            Ok(Node::new(Kind::Equal, None, vec![pattern2, gamma], span))
        }

        Kind::AndOp => {
            let mut patterns = vec![];
            let mut bounds = vec![];
            for child in children {
                let (pattern, bound) = split_binding(child, &span)?;
                patterns.push(pattern);
                bounds.push(bound);
            }
            let pattern_span = Node::span_of(&patterns);
            let bound_span = Node::span_of(&bounds);
            let pattern = Node::new(Kind::Comma, None, patterns, pattern_span);
            let bound = Node::new(Kind::Tau, None, bounds, bound_span);
            Ok(Node::new(Kind::Equal, None, vec![pattern, bound], span))
        }

        Kind::Rec => {
            let mut it = children.into_iter();
            let binding = it.next().unwrap();
            let (name, body) = split_binding(binding, &span)?;
            if name.kind != Kind::Identifier {
                return Err(CompileError::standardization(
                    "'rec' requires a single named binding".to_string(),
                    span,
                ));
            }
            let lambda_span = Span::combine(&name.span, &body.span);
            let lambda = Node::new(Kind::Lambda, None, vec![name.clone(), body], lambda_span);
            let ystar = Node::atom(Kind::Ystar, None, Span::empty());
            let gamma = Node::new(Kind::Gamma, None, vec![ystar, lambda], span.clone());
            Ok(Node::new(Kind::Equal, None, vec![name, gamma], span))
        }

        Kind::At => {
            let mut it = children.into_iter();
            let left = it.next().unwrap();
            let name = it.next().unwrap();
            let right = it.next().unwrap();
            let inner_span = Span::combine(&name.span, &left.span);
            let inner = Node::new(Kind::Gamma, None, vec![name, left], inner_span);
            Ok(Node::new(Kind::Gamma, None, vec![inner, right], span))
        }

        other => Ok(Node::new(other, lexeme, children, span)),
    }
}

/// Folds a list of parameter patterns right-to-left into nested unary
/// `lambda` nodes: `fn X1 X2 X3 . E` becomes
/// `lambda(X1, lambda(X2, lambda(X3, E)))`.
fn curry(params: Vec<Node>, body: Node) -> Node {
    let mut acc = body;
    for param in params.into_iter().rev() {
        let span = Span::combine(&param.span, &acc.span);
        acc = Node::new(Kind::Lambda, None, vec![param, acc], span);
    }
    acc
}

/// Every `D`-shaped node standardizes down to a single `Equal(pattern,
/// bound-expression)` pair; this pulls that pair out of an already
/// bottom-up-standardized binding node.
fn split_binding(node: Node, context: &Span) -> Result<(Node, Node), CompileError> {
    if node.kind != Kind::Equal {
        return Err(CompileError::standardization(
            format!("expected a fully standardized binding, found {:?}", node.kind),
            context.clone(),
        ));
    }
    let mut it = node.children.into_iter();
    let pattern = it.next().expect("Equal always carries a pattern");
    let bound = it.next().expect("Equal always carries a bound expression");
    Ok((pattern, bound))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::lex;
    use crate::compiler::parse::parse;
    use std::rc::Rc;

    fn standardize_source(src: &str) -> Node {
        let tokens = lex(Rc::new(Source::source(src))).unwrap();
        let tree = parse(tokens).unwrap();
        standardize(tree).unwrap()
    }

    fn no_forbidden_kinds(node: &Node) -> bool {
        let forbidden = matches!(
            node.kind,
            Kind::Let | Kind::Where | Kind::FcnForm | Kind::Within | Kind::AndOp | Kind::Rec | Kind::At
        ) || (node.kind == Kind::Lambda && node.children.len() > 2);
        !forbidden && node.children.iter().all(no_forbidden_kinds)
    }

    #[test]
    fn let_becomes_gamma_lambda() {
        let tree = standardize_source("let x = 5 in x + 3");
        assert_eq!(tree.kind, Kind::Gamma);
        assert_eq!(tree.children[0].kind, Kind::Lambda);
        assert!(no_forbidden_kinds(&tree));
    }

    #[test]
    fn where_reduces_like_let() {
        let tree = standardize_source("x + 1 where x = 5");
        assert_eq!(tree.kind, Kind::Gamma);
        assert!(no_forbidden_kinds(&tree));
    }

    #[test]
    fn fcn_form_curries_into_nested_lambdas() {
        let tree = standardize_source("let add x y = x + y in add 1 2");
        // gamma(lambda(add, E_in), curried-lambda-chain-for-add)
        let lambda = &tree.children[1];
        assert_eq!(lambda.kind, Kind::Lambda);
        assert_eq!(lambda.children[0].kind, Kind::Identifier);
        assert_eq!(lambda.children[1].kind, Kind::Lambda);
        assert!(no_forbidden_kinds(&tree));
    }

    #[test]
    fn rec_introduces_ystar() {
        let tree = standardize_source("let rec f n = n eq 0 -> 1 | n * f (n - 1) in f 5");
        assert!(no_forbidden_kinds(&tree));

        fn contains_ystar(node: &Node) -> bool {
            node.kind == Kind::Ystar || node.children.iter().any(contains_ystar)
        }
        assert!(contains_ystar(&tree));
    }

    #[test]
    fn and_combines_into_comma_tau() {
        let tree = standardize_source("let a = 1 and b = 2 in a + b");
        assert!(no_forbidden_kinds(&tree));
    }

    #[test]
    fn within_chains_bindings() {
        let tree = standardize_source("let a = 1 within b = a + 1 in b");
        assert!(no_forbidden_kinds(&tree));
    }

    #[test]
    fn standardization_is_idempotent() {
        let tree = standardize_source("let rec f n = n eq 0 -> 1 | n * f (n - 1) in f 5");
        let again = standardize(tree.clone()).unwrap();
        assert_eq!(tree, again);
    }
}
