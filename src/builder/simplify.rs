// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use super::dispatch::{literal_value, ConstantSpecializedBuilder, RewriteRules};
use super::ExprBuilder;
use crate::ir::{Context, Expr, ExprRef, BOOL_WIDTH};

/// Rewrites comparisons and negated disjunctions to a minimal base set:
/// downstream consumers only ever see `Eq`, `Ult`, `Ule`, `Slt` and `Sle`.
/// Stacked on top of a constant folding pipeline which handles everything
/// arithmetic. These are canonicalisations, not optimisations, so they do not
/// touch the rewrite counters.
pub struct SimplifyingRules;

impl RewriteRules for SimplifyingRules {
    fn eq_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        if c.width() == BOOL_WIDTH {
            // true == X => X
            if c.is_tru() {
                return rhs;
            }
            // false == X => !X
            return outer.base().not(ctx, rhs);
        }
        outer.base().eq(ctx, lhs, rhs)
    }

    fn eq_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::eq_cn(outer, ctx, rhs, lhs)
    }

    fn eq_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X == X => true
        if lhs == rhs {
            return outer.tru(ctx);
        }
        outer.base().eq(ctx, lhs, rhs)
    }

    fn not_n<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        e: ExprRef,
    ) -> ExprRef {
        // !(A | B) => !A & !B
        if let Expr::Or(a, b, _) = *ctx.get(e) {
            let na = outer.not(ctx, a);
            let nb = outer.not(ctx, b);
            return outer.and(ctx, na, nb);
        }
        outer.base().not(ctx, e)
    }

    fn ne<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X != Y => !(X == Y)
        let eq = outer.eq(ctx, lhs, rhs);
        outer.not(ctx, eq)
    }

    fn ugt<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >u Y => Y <u X
        outer.ult(ctx, rhs, lhs)
    }

    fn uge<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >=u Y => Y <=u X
        outer.ule(ctx, rhs, lhs)
    }

    fn sgt<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >s Y => Y <s X
        outer.slt(ctx, rhs, lhs)
    }

    fn sge<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >=s Y => Y <=s X
        outer.sle(ctx, rhs, lhs)
    }
}
