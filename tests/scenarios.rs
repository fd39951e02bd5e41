//! End-to-end tests over the full lex/parse/standardize/flatten/run
//! pipeline, one per concrete scenario.

use std::rc::Rc;

use rpal::{run_source, Source};

fn result_of(src: &str) -> String {
    let mut sink = std::io::sink();
    let value = run_source(Rc::new(Source::source(src)), &mut sink)
        .unwrap_or_else(|e| panic!("'{}' failed to run: {}", src, e));
    format!("{}", value)
}

#[test]
fn let_binding_arithmetic() {
    assert_eq!(result_of("let x = 5 in x + 3"), "8");
}

#[test]
fn recursive_factorial() {
    assert_eq!(
        result_of("let rec f n = n eq 0 -> 1 | n * f (n-1) in f 5"),
        "120",
    );
}

#[test]
fn and_parallel_binding() {
    assert_eq!(result_of("let x = 1 and y = 2 in x + y"), "3");
}

#[test]
fn top_level_tuple() {
    assert_eq!(result_of("(1, 2, 3)"), "(1, 2, 3)");
}

#[test]
fn curried_two_argument_function() {
    assert_eq!(result_of("let f x y = x + y in f 2 3"), "5");
}

#[test]
fn within_chains_two_bindings() {
    assert_eq!(result_of("let x = 10 within y = x+1 in y*2"), "22");
}

#[test]
fn nested_recursion_with_mutual_tuple_and_unrolling() {
    // Exercises Y*/Eta unrolling several levels deep, plus tuple
    // construction inside the recursive body.
    assert_eq!(
        result_of("let rec sum n = n eq 0 -> 0 | n + sum (n - 1) in sum 10"),
        "55",
    );
}

#[test]
fn where_clause_is_equivalent_to_let() {
    assert_eq!(result_of("x + 1 where x = 5"), "6");
}

#[test]
fn nil_prints_as_nil() {
    assert_eq!(result_of("nil"), "nil");
}

#[test]
fn builtins_compose_through_gamma() {
    assert_eq!(result_of("Conc 'ab' 'cd'"), "'abcd'");
    assert_eq!(result_of("Stem 'hello'"), "'h'");
    assert_eq!(result_of("Stern 'hello'"), "'ello'");
    assert_eq!(result_of("Order (1, 2, 3, 4)"), "4");
}

#[test]
fn type_predicates_on_builtins() {
    assert_eq!(result_of("Isinteger 5"), "true");
    assert_eq!(result_of("Isstring 'x'"), "true");
    assert_eq!(result_of("Istuple nil"), "true");
    assert_eq!(result_of("Isdummy nil"), "false");
    assert_eq!(result_of("Isdummy dummy"), "true");
    assert_eq!(result_of("Istruthvalue true"), "true");
}

#[test]
fn division_by_zero_is_a_runtime_failure() {
    let mut sink = std::io::sink();
    assert!(run_source(Rc::new(Source::source("1 / 0")), &mut sink).is_err());
}

#[test]
fn unmatched_paren_is_a_compile_failure() {
    let mut sink = std::io::sink();
    assert!(run_source(Rc::new(Source::source("let x = 5 in (x + 3")), &mut sink).is_err());
}
