// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

//! The layered expression builder pipeline. Every layer implements the full
//! [`ExprBuilder`] construction interface; rewriting layers hold their base as
//! an owned handle and re-enter themselves for the right hand sides of their
//! rewrites, so that newly introduced operators are rewritten as well.

mod default;
mod dispatch;
mod folding;
mod simplify;

pub use default::DefaultExprBuilder;
pub use dispatch::{ConstantSpecializedBuilder, RewriteRules};
pub use folding::ConstantFoldingRules;
pub use simplify::SimplifyingRules;

use crate::ir::{BitVecValue, Context, ExprRef, UpdateList, WidthInt};

/// The construction interface shared by all builder layers. Operands must be
/// well typed per the width rules of the IR; violations are caller bugs and
/// are caught by debug assertions, not reported as errors.
pub trait ExprBuilder {
    fn constant(&mut self, ctx: &mut Context, value: BitVecValue) -> ExprRef;
    fn not_optimized(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef;
    fn read(&mut self, ctx: &mut Context, updates: UpdateList, index: ExprRef) -> ExprRef;
    fn select(&mut self, ctx: &mut Context, cond: ExprRef, tru: ExprRef, fals: ExprRef)
        -> ExprRef;
    fn concat(&mut self, ctx: &mut Context, hi: ExprRef, lo: ExprRef) -> ExprRef;
    fn extract(&mut self, ctx: &mut Context, e: ExprRef, offset: WidthInt, width: WidthInt)
        -> ExprRef;
    fn zext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef;
    fn sext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef;

    fn add(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn sub(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn mul(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn udiv(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn sdiv(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn urem(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn srem(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;

    fn not(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef;
    fn and(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn or(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn xor(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn shl(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn lshr(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn ashr(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;

    fn eq(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn ne(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn ult(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn ule(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn ugt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn uge(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn slt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn sle(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn sgt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;
    fn sge(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef;

    // helper functions to construct common constants
    fn zero(&mut self, ctx: &mut Context, width: WidthInt) -> ExprRef {
        self.constant(ctx, BitVecValue::zero(width))
    }
    fn one(&mut self, ctx: &mut Context, width: WidthInt) -> ExprRef {
        self.constant(ctx, BitVecValue::one(width))
    }
    fn ones(&mut self, ctx: &mut Context, width: WidthInt) -> ExprRef {
        self.constant(ctx, BitVecValue::ones(width))
    }
    fn tru(&mut self, ctx: &mut Context) -> ExprRef {
        self.constant(ctx, BitVecValue::tru())
    }
    fn fals(&mut self, ctx: &mut Context) -> ExprRef {
        self.constant(ctx, BitVecValue::fals())
    }
}

/// The constant folding and algebraic rewrite pipeline.
pub type ConstantFoldingExprBuilder<B> = ConstantSpecializedBuilder<ConstantFoldingRules, B>;

/// The canonicalisation pipeline, usually stacked on top of a constant folding
/// pipeline.
pub type SimplifyingExprBuilder<B> = ConstantSpecializedBuilder<SimplifyingRules, B>;

/// A builder that performs no rewriting at all.
pub fn default_builder() -> DefaultExprBuilder {
    DefaultExprBuilder
}

/// Wraps any base builder with constant folding and algebraic rewrites.
pub fn constant_folding_builder<B: ExprBuilder>(base: B) -> ConstantFoldingExprBuilder<B> {
    ConstantSpecializedBuilder::new(base)
}

/// Wraps any base builder with rewrites to a minimal comparator set.
pub fn simplifying_builder<B: ExprBuilder>(base: B) -> SimplifyingExprBuilder<B> {
    ConstantSpecializedBuilder::new(base)
}

/// The typical client composition: canonicalisation over constant folding over
/// the terminal allocator.
pub fn simplifying_pipeline(
) -> SimplifyingExprBuilder<ConstantFoldingExprBuilder<DefaultExprBuilder>> {
    simplifying_builder(constant_folding_builder(default_builder()))
}
