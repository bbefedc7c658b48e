/*
 * eq.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Helpers for the hand-written content equality implementations.
//!
//! Node equality is defined over domain content fields only: the phase
//! annotation and the lexical position never participate. The standard
//! library provides cross-type `PartialEq` for `Vec` but not for `Option`
//! or through `Arc`, so the node implementations go through these helpers.

use std::sync::Arc;

pub(crate) fn option_eq<T, U>(a: &Option<T>, b: &Option<U>) -> bool
where
    T: PartialEq<U>,
{
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

pub(crate) fn slice_eq<T, U>(a: &[T], b: &[U]) -> bool
where
    T: PartialEq<U>,
{
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a == b)
}

pub(crate) fn arc_slice_eq<T, U>(a: &[Arc<T>], b: &[Arc<U>]) -> bool
where
    T: PartialEq<U>,
{
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| **a == **b)
}
