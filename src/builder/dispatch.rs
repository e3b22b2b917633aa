// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use super::ExprBuilder;
use crate::ir::{BitVecValue, Context, Expr, ExprRef, UpdateList, WidthInt};
use std::marker::PhantomData;

/// Returns a copy of the concrete value if the expression is a literal.
pub(crate) fn literal_value(ctx: &Context, e: ExprRef) -> Option<BitVecValue> {
    e.as_literal(ctx).map(|lit| lit.get(ctx).clone())
}

macro_rules! rule_defaults {
    ($($($name:ident)+ => $op:ident),+) => {
        $($(
            fn $name<B: ExprBuilder>(
                outer: &mut ConstantSpecializedBuilder<Self, B>,
                ctx: &mut Context,
                lhs: ExprRef,
                rhs: ExprRef,
            ) -> ExprRef {
                outer.base().$op(ctx, lhs, rhs)
            }
        )+)+
    };
}

/// One rewrite hook per (constant / non-constant) operand pattern of every
/// operation. Every hook defaults to plain allocation through the base
/// builder; rule sets override the patterns they care about. The `outer`
/// parameter is the dispatcher wrapping this rule set, used to re-enter the
/// pipeline when a rewrite introduces new operators.
///
/// Suffixes encode the pattern: `_cn` constant/non-constant, `_nc`
/// non-constant/constant, `_nn` both non-constant. All-constant operations
/// never reach a rule set, they are folded by the dispatcher.
#[allow(unused_variables)]
pub trait RewriteRules: Sized {
    fn select<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        cond: ExprRef,
        tru: ExprRef,
        fals: ExprRef,
    ) -> ExprRef {
        outer.base().select(ctx, cond, tru, fals)
    }

    fn not_n<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        e: ExprRef,
    ) -> ExprRef {
        outer.base().not(ctx, e)
    }

    rule_defaults!(
        add_cn add_nc add_nn => add,
        sub_cn sub_nc sub_nn => sub,
        mul_cn mul_nc mul_nn => mul,
        udiv_cn udiv_nc udiv_nn => udiv,
        sdiv_cn sdiv_nc sdiv_nn => sdiv,
        urem_cn urem_nc urem_nn => urem,
        srem_cn srem_nc srem_nn => srem,
        and_cn and_nc and_nn => and,
        or_cn or_nc or_nn => or,
        xor_cn xor_nc xor_nn => xor,
        shl_cn shl_nc shl_nn => shl,
        lshr_cn lshr_nc lshr_nn => lshr,
        ashr_cn ashr_nc ashr_nn => ashr,
        eq_cn eq_nc eq_nn => eq,
        ult_cn ult_nc ult_nn => ult,
        ule_cn ule_nc ule_nn => ule,
        slt_cn slt_nc slt_nn => slt,
        sle_cn sle_nc sle_nn => sle,
        ne => ne,
        ugt => ugt,
        uge => uge,
        sgt => sgt,
        sge => sge
    );
}

/// Classifies each operand of every operation as constant or non-constant,
/// folds all-constant operations outright and dispatches the rest to the
/// matching overload of the rule set `R`. Also applies the rewrites that are
/// independent of the rule set: read rollback through stores with distinct
/// indices, selection on a constant condition and double negation.
pub struct ConstantSpecializedBuilder<R: RewriteRules, B: ExprBuilder> {
    base: B,
    rules: PhantomData<R>,
}

impl<R: RewriteRules, B: ExprBuilder> ConstantSpecializedBuilder<R, B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            rules: PhantomData,
        }
    }

    /// The wrapped base builder, used by rule sets when no rewrite applies.
    pub fn base(&mut self) -> &mut B {
        &mut self.base
    }
}

macro_rules! dispatch_bin_op {
    ($name:ident, $fold:ident, $cn:ident, $nc:ident, $nn:ident) => {
        fn $name(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
            match (literal_value(ctx, lhs), literal_value(ctx, rhs)) {
                (Some(a), Some(b)) => {
                    let value = a.$fold(&b);
                    self.constant(ctx, value)
                }
                (Some(_), None) => R::$cn(self, ctx, lhs, rhs),
                (None, Some(_)) => R::$nc(self, ctx, lhs, rhs),
                (None, None) => R::$nn(self, ctx, lhs, rhs),
            }
        }
    };
}

macro_rules! dispatch_div_op {
    ($name:ident, $fold:ident, $cn:ident, $nc:ident, $nn:ident) => {
        fn $name(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
            match (literal_value(ctx, lhs), literal_value(ctx, rhs)) {
                (Some(a), Some(b)) => {
                    if b.is_zero() {
                        // division by zero stays in the term for the solver
                        self.base.$name(ctx, lhs, rhs)
                    } else {
                        let value = a.$fold(&b);
                        self.constant(ctx, value)
                    }
                }
                (Some(_), None) => R::$cn(self, ctx, lhs, rhs),
                (None, Some(_)) => R::$nc(self, ctx, lhs, rhs),
                (None, None) => R::$nn(self, ctx, lhs, rhs),
            }
        }
    };
}

macro_rules! dispatch_cmp_op {
    ($name:ident, $fold:ident, $cn:ident, $nc:ident, $nn:ident) => {
        fn $name(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
            match (literal_value(ctx, lhs), literal_value(ctx, rhs)) {
                (Some(a), Some(b)) => {
                    let value = BitVecValue::from_bool(a.$fold(&b));
                    self.constant(ctx, value)
                }
                (Some(_), None) => R::$cn(self, ctx, lhs, rhs),
                (None, Some(_)) => R::$nc(self, ctx, lhs, rhs),
                (None, None) => R::$nn(self, ctx, lhs, rhs),
            }
        }
    };
}

/// Comparisons that only exist until the canonicalisation layer rewrites them
/// away share a single rule hook for all non-constant patterns.
macro_rules! dispatch_cmp_single {
    ($name:ident, $rule:ident, $fold:expr) => {
        fn $name(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
            if let (Some(a), Some(b)) = (literal_value(ctx, lhs), literal_value(ctx, rhs)) {
                let fold: fn(&BitVecValue, &BitVecValue) -> bool = $fold;
                let value = BitVecValue::from_bool(fold(&a, &b));
                return self.constant(ctx, value);
            }
            R::$rule(self, ctx, lhs, rhs)
        }
    };
}

impl<R: RewriteRules, B: ExprBuilder> ExprBuilder for ConstantSpecializedBuilder<R, B> {
    fn constant(&mut self, ctx: &mut Context, value: BitVecValue) -> ExprRef {
        self.base.constant(ctx, value)
    }

    fn not_optimized(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        self.base.not_optimized(ctx, e)
    }

    fn read(&mut self, ctx: &mut Context, updates: UpdateList, index: ExprRef) -> ExprRef {
        // Roll back through writes when possible. A store whose index is
        // demonstrably distinct from the read index cannot affect the read; a
        // store with a demonstrably equal index resolves it.
        let mut head = updates.head;
        while let Some(node_ref) = head {
            let node = *ctx.get_update(node_ref);
            let hit = self.eq(ctx, index, node.index);
            match literal_value(ctx, hit) {
                Some(v) if v.is_fals() => {
                    log::trace!("read rollback: skipping write with distinct index");
                    head = node.next;
                }
                Some(v) if v.is_tru() => return node.value,
                _ => break,
            }
        }
        self.base.read(
            ctx,
            UpdateList {
                root: updates.root,
                head,
            },
            index,
        )
    }

    fn select(
        &mut self,
        ctx: &mut Context,
        cond: ExprRef,
        tru: ExprRef,
        fals: ExprRef,
    ) -> ExprRef {
        if let Some(v) = literal_value(ctx, cond) {
            return if v.is_tru() { tru } else { fals };
        }
        R::select(self, ctx, cond, tru, fals)
    }

    fn concat(&mut self, ctx: &mut Context, hi: ExprRef, lo: ExprRef) -> ExprRef {
        if let (Some(a), Some(b)) = (literal_value(ctx, hi), literal_value(ctx, lo)) {
            let value = a.concat(&b);
            return self.constant(ctx, value);
        }
        self.base.concat(ctx, hi, lo)
    }

    fn extract(
        &mut self,
        ctx: &mut Context,
        e: ExprRef,
        offset: WidthInt,
        width: WidthInt,
    ) -> ExprRef {
        if let Some(v) = literal_value(ctx, e) {
            let value = v.extract(offset, width);
            return self.constant(ctx, value);
        }
        self.base.extract(ctx, e, offset, width)
    }

    fn zext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef {
        if let Some(v) = literal_value(ctx, e) {
            let value = v.zero_extend(width);
            return self.constant(ctx, value);
        }
        self.base.zext(ctx, e, width)
    }

    fn sext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef {
        if let Some(v) = literal_value(ctx, e) {
            let value = v.sign_extend(width);
            return self.constant(ctx, value);
        }
        self.base.sext(ctx, e, width)
    }

    fn not(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        // !!X => X
        if let Expr::Not(inner, _) = *ctx.get(e) {
            return inner;
        }
        if let Some(v) = literal_value(ctx, e) {
            let value = v.not();
            return self.constant(ctx, value);
        }
        R::not_n(self, ctx, e)
    }

    dispatch_bin_op!(add, add, add_cn, add_nc, add_nn);
    dispatch_bin_op!(sub, sub, sub_cn, sub_nc, sub_nn);
    dispatch_bin_op!(mul, mul, mul_cn, mul_nc, mul_nn);
    dispatch_div_op!(udiv, udiv, udiv_cn, udiv_nc, udiv_nn);
    dispatch_div_op!(sdiv, sdiv, sdiv_cn, sdiv_nc, sdiv_nn);
    dispatch_div_op!(urem, urem, urem_cn, urem_nc, urem_nn);
    dispatch_div_op!(srem, srem, srem_cn, srem_nc, srem_nn);
    dispatch_bin_op!(and, and, and_cn, and_nc, and_nn);
    dispatch_bin_op!(or, or, or_cn, or_nc, or_nn);
    dispatch_bin_op!(xor, xor, xor_cn, xor_nc, xor_nn);
    dispatch_bin_op!(shl, shift_left, shl_cn, shl_nc, shl_nn);
    dispatch_bin_op!(lshr, shift_right, lshr_cn, lshr_nc, lshr_nn);
    dispatch_bin_op!(ashr, arithmetic_shift_right, ashr_cn, ashr_nc, ashr_nn);

    dispatch_cmp_op!(eq, is_equal, eq_cn, eq_nc, eq_nn);
    dispatch_cmp_op!(ult, is_ult, ult_cn, ult_nc, ult_nn);
    dispatch_cmp_op!(ule, is_ule, ule_cn, ule_nc, ule_nn);
    dispatch_cmp_op!(slt, is_slt, slt_cn, slt_nc, slt_nn);
    dispatch_cmp_op!(sle, is_sle, sle_cn, sle_nc, sle_nn);

    dispatch_cmp_single!(ne, ne, |a, b| !a.is_equal(b));
    dispatch_cmp_single!(ugt, ugt, |a, b| b.is_ult(a));
    dispatch_cmp_single!(uge, uge, |a, b| b.is_ule(a));
    dispatch_cmp_single!(sgt, sgt, |a, b| b.is_slt(a));
    dispatch_cmp_single!(sge, sge, |a, b| b.is_sle(a));
}
