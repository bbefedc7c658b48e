/*
 * accumulate.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Applicative result combinators.
//!
//! Compilation never fails fast: assembling a node from its children
//! succeeds only if every child succeeded, and otherwise produces the
//! union of every error from every child, in order. These combinators are
//! what let a single pass report one error per bad table row instead of
//! stopping at the first.

use crate::error::CompileError;

/// The result of compiling one node: the compiled value, or every error
/// found in that subtree.
pub type Accumulate<T> = Result<T, Vec<CompileError>>;

/// Combine an ordered sequence of results, accumulating all errors.
pub fn sequence<T>(results: impl IntoIterator<Item = Accumulate<T>>) -> Accumulate<Vec<T>> {
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(mut e) => errors.append(&mut e),
        }
    }
    if errors.is_empty() { Ok(values) } else { Err(errors) }
}

/// Combine two results, accumulating errors from both sides.
pub fn combine<A, B, T>(a: Accumulate<A>, b: Accumulate<B>, f: impl FnOnce(A, B) -> T) -> Accumulate<T> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok(f(a, b)),
        (Err(a), Ok(_)) => Err(a),
        (Ok(_), Err(b)) => Err(b),
        (Err(mut a), Err(mut b)) => {
            a.append(&mut b);
            Err(a)
        }
    }
}

/// Prepend errors discovered at the node itself to the result of its
/// children; the node survives only if both are clean.
pub fn with_local_errors<T>(local: Vec<CompileError>, rest: Accumulate<T>) -> Accumulate<T> {
    if local.is_empty() {
        return rest;
    }
    let mut errors = local;
    if let Err(mut e) = rest {
        errors.append(&mut e);
    }
    Err(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use structural_ast::Lexical;

    fn err(message: &str) -> CompileError {
        CompileError::error(Lexical::default(), message)
    }

    #[test]
    fn sequence_collects_values_in_order() {
        let result: Accumulate<Vec<i32>> = sequence([Ok(1), Ok(2), Ok(3)]);
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn sequence_accumulates_every_error() {
        let result: Accumulate<Vec<i32>> =
            sequence([Ok(1), Err(vec![err("first")]), Ok(2), Err(vec![err("second")])]);
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "first");
        assert_eq!(errors[1].message, "second");
    }

    #[test]
    fn combine_unions_errors() {
        let a: Accumulate<i32> = Err(vec![err("left")]);
        let b: Accumulate<i32> = Err(vec![err("right")]);
        let errors = combine(a, b, |x, y| x + y).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "left");
        assert_eq!(errors[1].message, "right");
    }

    #[test]
    fn combine_applies_on_success() {
        let result = combine(Ok(20), Ok(3), |x: i32, y: i32| x + y);
        assert_eq!(result.unwrap(), 23);
    }

    #[test]
    fn local_errors_poison_success() {
        let result = with_local_errors(vec![err("local")], Ok(1));
        assert_eq!(result.unwrap_err().len(), 1);
    }

    #[test]
    fn local_errors_come_first() {
        let result: Accumulate<i32> =
            with_local_errors(vec![err("local")], Err(vec![err("child")]));
        let errors = result.unwrap_err();
        assert_eq!(errors[0].message, "local");
        assert_eq!(errors[1].message, "child");
    }

    #[test]
    fn empty_local_errors_pass_through() {
        let result = with_local_errors(Vec::new(), Ok(7));
        assert_eq!(result.unwrap(), 7);
    }
}
