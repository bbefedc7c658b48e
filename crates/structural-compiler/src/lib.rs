/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The structural document compiler.
 *
 * Compilation is a single validating, numbering pass over a parsed tree.
 * It either produces a compiled tree — every node annotated with its
 * content number and parent, plus a global cross-reference context — or
 * the complete list of every structural error in the document. There is no
 * fail-fast path: all errors accumulate.
 */

pub mod accumulate;
pub mod context;
pub mod error;
pub mod numbering;
pub mod task;
pub mod validator;

pub use accumulate::{Accumulate, combine, sequence, with_local_errors};
pub use context::{BlockRef, CompiledDocument, CompiledLocal, GlobalContext, NodeId};
pub use error::{CompileError, LookupError, Severity};
pub use numbering::ContentNumbering;
pub use task::compile;
