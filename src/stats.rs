// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::ExprRef;
use std::sync::atomic::{AtomicU64, Ordering};

// The counters are shared by all builders in the process. They are monotonic
// and only ever observed, never read back by the builders themselves.
static EXPR_OPTS: AtomicU64 = AtomicU64::new(0);
static CONST_OPTS: AtomicU64 = AtomicU64::new(0);

/// Number of successful rewrites performed by the expression builders.
pub fn expr_opts() -> u64 {
    EXPR_OPTS.load(Ordering::Relaxed)
}

/// Number of rewrites that produced a constant value.
pub fn const_opts() -> u64 {
    CONST_OPTS.load(Ordering::Relaxed)
}

/// Marks an optimising rewrite, not a canonicalisation.
pub(crate) fn record_opt(e: ExprRef) -> ExprRef {
    EXPR_OPTS.fetch_add(1, Ordering::Relaxed);
    e
}

/// Marks a rewrite that produced a constant value.
pub(crate) fn record_const_opt(e: ExprRef) -> ExprRef {
    // expr_opts first, so that const_opts <= expr_opts holds for any observer
    let e = record_opt(e);
    CONST_OPTS.fetch_add(1, Ordering::Relaxed);
    e
}
