// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use super::dispatch::{literal_value, ConstantSpecializedBuilder, RewriteRules};
use super::ExprBuilder;
use crate::ir::{BitVecValue, Context, Expr, ExprRef, TypeCheck, WidthInt, BOOL_WIDTH};
use crate::stats::{record_const_opt, record_opt};

/// The algebraic rewrite rule set. Operates underneath a
/// [`ConstantSpecializedBuilder`], so every hook can rely on the advertised
/// constant / non-constant pattern of its operands. Rewrites re-enter the
/// dispatcher through `outer`, which subjects their right hand sides to the
/// full rule set again.
///
/// Every rule is semantics preserving at full operand width under two's
/// complement; rules about division and remainder treat a zero divisor as the
/// solver's problem and never fold it away.
pub struct ConstantFoldingRules;

/// Returns the sibling if one of the two children matches.
fn match_either_child(children: (ExprRef, ExprRef), m: ExprRef) -> Option<ExprRef> {
    if children.0 == m {
        Some(children.1)
    } else if children.1 == m {
        Some(children.0)
    } else {
        None
    }
}

/// Do two binary nodes have the same children, directly or swapped?
fn same_children(a: (ExprRef, ExprRef), b: (ExprRef, ExprRef)) -> bool {
    (a.0 == b.0 && a.1 == b.1) || (a.0 == b.1 && a.1 == b.0)
}

/// Does the constant survive a round trip through the zero extension?
fn in_zext_range(c: &BitVecValue, src_width: WidthInt) -> bool {
    c.truncate(src_width).zero_extend(c.width()).is_equal(c)
}

/// Does the constant survive a round trip through the sign extension?
fn in_sext_range(c: &BitVecValue, src_width: WidthInt) -> bool {
    c.truncate(src_width).sign_extend(c.width()).is_equal(c)
}

impl RewriteRules for ConstantFoldingRules {
    fn select<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        cond: ExprRef,
        tru: ExprRef,
        fals: ExprRef,
    ) -> ExprRef {
        // select C X X => X
        if tru == fals {
            return record_opt(tru);
        }
        outer.base().select(ctx, cond, tru, fals)
    }

    fn add_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c0 = literal_value(ctx, lhs).unwrap();
        // 0 + X => X
        if c0.is_zero() {
            return record_opt(rhs);
        }
        match *ctx.get(rhs) {
            Expr::Add(x, y, _) => {
                // C0 + (C1 + X) => (C0 + C1) + X
                if let Some(c1) = literal_value(ctx, x) {
                    let c = outer.constant(ctx, c0.add(&c1));
                    return outer.add(ctx, c, y);
                }
                // C0 + (X + C1) => (C0 + C1) + X
                if let Some(c1) = literal_value(ctx, y) {
                    let c = outer.constant(ctx, c0.add(&c1));
                    return outer.add(ctx, c, x);
                }
            }
            Expr::Sub(x, y, _) => {
                // C0 + (C1 - X) => (C0 + C1) - X
                if let Some(c1) = literal_value(ctx, x) {
                    let c = outer.constant(ctx, c0.add(&c1));
                    return outer.sub(ctx, c, y);
                }
                // C0 + (X - C1) => (C0 - C1) + X
                if let Some(c1) = literal_value(ctx, y) {
                    let c = outer.constant(ctx, c0.sub(&c1));
                    return outer.add(ctx, c, x);
                }
            }
            _ => {}
        }
        outer.base().add(ctx, lhs, rhs)
    }

    fn add_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::add_cn(outer, ctx, rhs, lhs)
    }

    fn add_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        if lhs == rhs {
            // X + X => X << 1
            let one = outer.one(ctx, lhs.width(ctx));
            let res = outer.shl(ctx, lhs, one);
            return record_opt(res);
        }
        match *ctx.get(lhs) {
            Expr::Add(x, y, _) => {
                // (X + Y) + Z => X + (Y + Z), pairing identical terms first so
                // that they can match further
                return if x == rhs {
                    let inner = outer.add(ctx, x, rhs);
                    let res = outer.add(ctx, y, inner);
                    record_opt(res)
                } else {
                    let inner = outer.add(ctx, y, rhs);
                    outer.add(ctx, x, inner)
                };
            }
            Expr::Sub(x, y, _) => {
                // (X - Y) + Z => X + (Z - Y)
                let inner = outer.sub(ctx, rhs, y);
                return outer.add(ctx, x, inner);
            }
            Expr::Not(x, _) => {
                // ~X + X => -1
                if x == rhs {
                    let ones = outer.ones(ctx, rhs.width(ctx));
                    return record_const_opt(ones);
                }
            }
            Expr::Xor(x, y, _) => {
                // (A ^ B) + (A & B) => A | B
                if let Expr::And(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.or(ctx, x, y);
                        return record_opt(res);
                    }
                }
            }
            Expr::Or(x, y, _) => {
                // (A | B) + (A & B) => A + B
                if let Expr::And(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.add(ctx, x, y);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        match *ctx.get(rhs) {
            Expr::Add(x, y, _) => {
                // X + (C + Y) => C + (X + Y)
                if x.is_literal(ctx) {
                    let inner = outer.add(ctx, lhs, y);
                    return outer.add(ctx, x, inner);
                }
                // X + (Y + C) => C + (X + Y)
                if y.is_literal(ctx) {
                    let inner = outer.add(ctx, lhs, x);
                    return outer.add(ctx, y, inner);
                }
            }
            Expr::Sub(x, y, _) => {
                if x.is_literal(ctx) {
                    // X + (C - Y) => C + (X - Y)
                    let inner = outer.sub(ctx, lhs, y);
                    return outer.add(ctx, x, inner);
                } else if y == lhs {
                    // X + (Y - X) => Y
                    return record_opt(x);
                }
                if let Some(c) = literal_value(ctx, y) {
                    // X + (Y - C) => -C + (X + Y)
                    let neg = outer.constant(ctx, c.negate());
                    let inner = outer.add(ctx, lhs, x);
                    return outer.add(ctx, neg, inner);
                }
            }
            Expr::Not(x, _) => {
                // X + ~X => -1
                if x == lhs {
                    let ones = outer.ones(ctx, lhs.width(ctx));
                    return record_const_opt(ones);
                }
            }
            Expr::Xor(rx, ry, _) => {
                // (A & B) + (A ^ B) => A | B
                if let Expr::And(lx, ly, _) = *ctx.get(lhs) {
                    if same_children((lx, ly), (rx, ry)) {
                        let res = outer.or(ctx, lx, ly);
                        return record_opt(res);
                    }
                }
            }
            Expr::Or(rx, ry, _) => {
                // (A & B) + (A | B) => A + B
                if let Expr::And(lx, ly, _) = *ctx.get(lhs) {
                    if same_children((lx, ly), (rx, ry)) {
                        let res = outer.add(ctx, lx, ly);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        outer.base().add(ctx, lhs, rhs)
    }

    fn sub_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c0 = literal_value(ctx, lhs).unwrap();
        if c0.is_ones() {
            // -1 - X => ~X
            let res = outer.not(ctx, rhs);
            return record_opt(res);
        }
        if c0.is_zero() {
            match *ctx.get(rhs) {
                Expr::Add(x, y, _) => {
                    // -(C + X) => (-C) - X
                    if let Some(c1) = literal_value(ctx, x) {
                        let neg = outer.constant(ctx, c1.negate());
                        let res = outer.sub(ctx, neg, y);
                        return record_opt(res);
                    }
                }
                Expr::Sub(x, y, _) => {
                    // 0 - (X - Y) => Y - X
                    let res = outer.sub(ctx, y, x);
                    return record_opt(res);
                }
                Expr::Mul(x, y, _) => {
                    // -(C * X) => (-C) * X
                    if let Some(c1) = literal_value(ctx, x) {
                        let neg = outer.constant(ctx, c1.negate());
                        let res = outer.mul(ctx, neg, y);
                        return record_opt(res);
                    }
                }
                Expr::SDiv(x, y, _) => {
                    // negation distributes over signed division, never over
                    // unsigned division
                    if let Some(c1) = literal_value(ctx, x) {
                        // -(C / X) => (-C) / X
                        let neg = outer.constant(ctx, c1.negate());
                        let res = outer.sdiv(ctx, neg, y);
                        return record_opt(res);
                    }
                    if let Some(c1) = literal_value(ctx, y) {
                        // -(X / C) => X / (-C), no good with a zero divisor
                        if !c1.is_zero() {
                            let neg = outer.constant(ctx, c1.negate());
                            let res = outer.sdiv(ctx, x, neg);
                            return record_opt(res);
                        }
                    }
                }
                _ => {}
            }
        }
        match *ctx.get(rhs) {
            Expr::Not(x, _) => {
                // C - ~X => (C + 1) + X
                let c1 = outer.constant(ctx, c0.add(&BitVecValue::one(c0.width())));
                let res = outer.add(ctx, c1, x);
                return record_opt(res);
            }
            Expr::Add(x, y, _) => {
                // C0 - (C1 + X) => (C0 - C1) - X
                if let Some(c1) = literal_value(ctx, x) {
                    let c = outer.constant(ctx, c0.sub(&c1));
                    let res = outer.sub(ctx, c, y);
                    return record_opt(res);
                }
                // C0 - (X + C1) => (C0 - C1) - X
                if let Some(c1) = literal_value(ctx, y) {
                    let c = outer.constant(ctx, c0.sub(&c1));
                    let res = outer.sub(ctx, c, x);
                    return record_opt(res);
                }
            }
            Expr::Sub(x, y, _) => {
                // C0 - (C1 - X) => (C0 - C1) + X
                if let Some(c1) = literal_value(ctx, x) {
                    let c = outer.constant(ctx, c0.sub(&c1));
                    let res = outer.add(ctx, c, y);
                    return record_opt(res);
                }
                // C0 - (X - C1) => (C0 + C1) - X
                if let Some(c1) = literal_value(ctx, y) {
                    let c = outer.constant(ctx, c0.add(&c1));
                    let res = outer.sub(ctx, c, x);
                    return record_opt(res);
                }
            }
            _ => {}
        }
        outer.base().sub(ctx, lhs, rhs)
    }

    fn sub_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X - C => -C + X
        let c = literal_value(ctx, rhs).unwrap();
        let neg = outer.constant(ctx, c.negate());
        let res = outer.add(ctx, neg, lhs);
        record_opt(res)
    }

    fn sub_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        if lhs == rhs {
            // X - X => 0
            let zero = outer.zero(ctx, lhs.width(ctx));
            return record_const_opt(zero);
        }
        match *ctx.get(lhs) {
            Expr::Not(x, _) => {
                // ~X - ~Y => Y - X
                if let Expr::Not(y, _) = *ctx.get(rhs) {
                    let res = outer.sub(ctx, y, x);
                    return record_opt(res);
                }
            }
            Expr::Add(x, y, _) => {
                if let Expr::Or(rx, ry, _) = *ctx.get(rhs) {
                    // (A + B) - (A | B) => A & B
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.and(ctx, x, y);
                        return record_opt(res);
                    }
                } else if let Expr::And(rx, ry, _) = *ctx.get(rhs) {
                    // (A + B) - (A & B) => A | B
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.or(ctx, x, y);
                        return record_opt(res);
                    }
                }
                // (X + Y) - Z => X + (Y - Z)
                let inner = outer.sub(ctx, y, rhs);
                return outer.add(ctx, x, inner);
            }
            Expr::Sub(x, y, _) => {
                // (X - Y) - Z => X - (Y + Z)
                let inner = outer.add(ctx, y, rhs);
                return outer.sub(ctx, x, inner);
            }
            Expr::Mul(x, y, _) => {
                // (C * X) - X => (C - 1) * X
                if let Some(c) = literal_value(ctx, x) {
                    if y == rhs {
                        let cm1 = outer.constant(ctx, c.sub(&BitVecValue::one(c.width())));
                        let res = outer.mul(ctx, cm1, rhs);
                        return record_opt(res);
                    }
                }
            }
            Expr::And(x, y, _) => {
                // (A & B) - (A | B) => 0 - (A ^ B)
                if let Expr::Or(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        let zero = outer.zero(ctx, lhs.width(ctx));
                        let xor = outer.xor(ctx, x, y);
                        let res = outer.sub(ctx, zero, xor);
                        return record_opt(res);
                    }
                }
            }
            Expr::Or(x, y, _) => {
                // (X | Y) - X => ~X & Y
                if let Some(other) = match_either_child((x, y), rhs) {
                    let not = outer.not(ctx, rhs);
                    let res = outer.and(ctx, not, other);
                    return record_opt(res);
                }
                if let Expr::And(rx, ry, _) = *ctx.get(rhs) {
                    // (A | B) - (A & B) => A ^ B
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.xor(ctx, x, y);
                        return record_opt(res);
                    }
                }
                if let Expr::Xor(rx, ry, _) = *ctx.get(rhs) {
                    // (A | B) - (A ^ B) => A & B
                    if same_children((x, y), (rx, ry)) {
                        let res = outer.and(ctx, x, y);
                        return record_opt(res);
                    }
                }
            }
            Expr::Xor(x, y, _) => {
                // (A ^ B) - (A | B) => 0 - (A & B)
                if let Expr::Or(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        let zero = outer.zero(ctx, lhs.width(ctx));
                        let and = outer.and(ctx, x, y);
                        let res = outer.sub(ctx, zero, and);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        match *ctx.get(rhs) {
            Expr::Add(x, y, _) => {
                // X - (C + Y) => -C + (X - Y)
                if let Some(c) = literal_value(ctx, x) {
                    let neg = outer.constant(ctx, c.negate());
                    let inner = outer.sub(ctx, lhs, y);
                    return outer.add(ctx, neg, inner);
                }
                // X - (Y + C) => -C + (X - Y)
                if let Some(c) = literal_value(ctx, y) {
                    let neg = outer.constant(ctx, c.negate());
                    let inner = outer.sub(ctx, lhs, x);
                    return outer.add(ctx, neg, inner);
                }
            }
            Expr::Sub(x, y, _) => {
                // X - (C - Y) => -C + (X + Y)
                if let Some(c) = literal_value(ctx, x) {
                    let neg = outer.constant(ctx, c.negate());
                    let inner = outer.add(ctx, lhs, y);
                    return outer.add(ctx, neg, inner);
                }
                // X - (Y - C) => C + (X - Y)
                if let Some(c) = literal_value(ctx, y) {
                    let c = outer.constant(ctx, c);
                    let inner = outer.sub(ctx, lhs, x);
                    return outer.add(ctx, c, inner);
                }
            }
            Expr::Mul(x, y, _) => {
                // X - (C * X) => (1 - C) * X
                if let Some(c) = literal_value(ctx, x) {
                    if y == lhs {
                        let k = outer.constant(ctx, BitVecValue::one(c.width()).sub(&c));
                        let res = outer.mul(ctx, k, lhs);
                        return record_opt(res);
                    }
                }
            }
            Expr::And(x, y, _) => {
                // X - (X & Y) => X & ~Y
                if let Some(other) = match_either_child((x, y), lhs) {
                    let not = outer.not(ctx, other);
                    let res = outer.and(ctx, lhs, not);
                    return record_opt(res);
                }
            }
            _ => {}
        }
        outer.base().sub(ctx, lhs, rhs)
    }

    fn mul_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // 0 * X => 0
        if c.is_zero() {
            return record_const_opt(lhs);
        }
        // 1 * X => X
        if c.is_one() {
            return record_opt(rhs);
        }
        outer.base().mul(ctx, lhs, rhs)
    }

    fn mul_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::mul_cn(outer, ctx, rhs, lhs)
    }

    fn udiv_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 / X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().udiv(ctx, lhs, rhs)
    }

    fn udiv_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X / 1 => X
        if literal_value(ctx, rhs).unwrap().is_one() {
            return record_opt(lhs);
        }
        outer.base().udiv(ctx, lhs, rhs)
    }

    fn sdiv_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 / X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().sdiv(ctx, lhs, rhs)
    }

    fn sdiv_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X / 1 => X
        if literal_value(ctx, rhs).unwrap().is_one() {
            return record_opt(lhs);
        }
        outer.base().sdiv(ctx, lhs, rhs)
    }

    fn urem_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 % X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().urem(ctx, lhs, rhs)
    }

    fn urem_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X % 1 => 0
        if literal_value(ctx, rhs).unwrap().is_one() {
            let zero = outer.zero(ctx, lhs.width(ctx));
            return record_const_opt(zero);
        }
        outer.base().urem(ctx, lhs, rhs)
    }

    fn srem_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 % X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().srem(ctx, lhs, rhs)
    }

    fn srem_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X % 1 => 0
        if literal_value(ctx, rhs).unwrap().is_one() {
            let zero = outer.zero(ctx, lhs.width(ctx));
            return record_const_opt(zero);
        }
        outer.base().srem(ctx, lhs, rhs)
    }

    fn and_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // 0 & X => 0
        if c.is_zero() {
            return record_const_opt(lhs);
        }
        // -1 & X => X
        if c.is_ones() {
            return record_opt(rhs);
        }
        outer.base().and(ctx, lhs, rhs)
    }

    fn and_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::and_cn(outer, ctx, rhs, lhs)
    }

    fn and_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X & X => X
        if lhs == rhs {
            return record_opt(lhs);
        }
        match *ctx.get(lhs) {
            Expr::Or(x, y, _) => {
                // (X | Y) & X => X
                if match_either_child((x, y), rhs).is_some() {
                    return record_opt(rhs);
                }
            }
            Expr::Not(x, _) => {
                // ~X & X => 0
                if x == rhs {
                    let zero = outer.zero(ctx, rhs.width(ctx));
                    return record_const_opt(zero);
                }
            }
            _ => {}
        }
        match *ctx.get(rhs) {
            Expr::Or(x, y, _) => {
                // X & (Y | X) => X
                if match_either_child((x, y), lhs).is_some() {
                    return record_opt(lhs);
                }
            }
            Expr::Not(x, _) => {
                // X & ~X => 0
                if x == lhs {
                    let zero = outer.zero(ctx, lhs.width(ctx));
                    return record_const_opt(zero);
                }
            }
            _ => {}
        }
        outer.base().and(ctx, lhs, rhs)
    }

    fn or_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // 0 | X => X
        if c.is_zero() {
            return record_opt(rhs);
        }
        // -1 | X => -1
        if c.is_ones() {
            return record_const_opt(lhs);
        }
        outer.base().or(ctx, lhs, rhs)
    }

    fn or_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::or_cn(outer, ctx, rhs, lhs)
    }

    fn or_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X | X => X
        if lhs == rhs {
            return record_opt(lhs);
        }
        match *ctx.get(lhs) {
            Expr::And(x, y, _) => {
                // (X & Y) | X => X
                if match_either_child((x, y), rhs).is_some() {
                    return record_opt(rhs);
                }
            }
            Expr::Not(nx, _) => {
                // ~X | X => -1
                if nx == rhs {
                    let ones = outer.ones(ctx, rhs.width(ctx));
                    return record_const_opt(ones);
                }
                match *ctx.get(nx) {
                    Expr::And(ax, ay, _) => {
                        // ~(X & Y) | X => -1
                        if match_either_child((ax, ay), rhs).is_some() {
                            let ones = outer.ones(ctx, rhs.width(ctx));
                            return record_const_opt(ones);
                        }
                    }
                    Expr::Xor(ax, ay, _) => {
                        // ~(A ^ B) | (A | B) => -1
                        if let Expr::Or(rx, ry, _) = *ctx.get(rhs) {
                            if same_children((ax, ay), (rx, ry)) {
                                let ones = outer.ones(ctx, lhs.width(ctx));
                                return record_const_opt(ones);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Expr::Xor(x, y, _) => {
                // (A ^ B) | (A | B) => A | B
                if let Expr::Or(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        return record_opt(rhs);
                    }
                }
            }
            Expr::Or(x, y, _) => {
                // (A | B) | (A ^ B) => A | B
                if let Expr::Xor(rx, ry, _) = *ctx.get(rhs) {
                    if same_children((x, y), (rx, ry)) {
                        return record_opt(lhs);
                    }
                }
                // (A | B) | ~(A ^ B) => -1
                if let Expr::Not(nx, _) = *ctx.get(rhs) {
                    if let Expr::Xor(rx, ry, _) = *ctx.get(nx) {
                        if same_children((x, y), (rx, ry)) {
                            let ones = outer.ones(ctx, lhs.width(ctx));
                            return record_const_opt(ones);
                        }
                    }
                }
            }
            _ => {}
        }
        match *ctx.get(rhs) {
            Expr::And(x, y, _) => {
                // X | (X & Y) => X
                if match_either_child((x, y), lhs).is_some() {
                    return record_opt(lhs);
                }
            }
            Expr::Not(nx, _) => {
                // X | ~X => -1
                if nx == lhs {
                    let ones = outer.ones(ctx, lhs.width(ctx));
                    return record_const_opt(ones);
                }
                // X | ~(X & Y) => -1
                if let Expr::And(ax, ay, _) = *ctx.get(nx) {
                    if match_either_child((ax, ay), lhs).is_some() {
                        let ones = outer.ones(ctx, lhs.width(ctx));
                        return record_const_opt(ones);
                    }
                }
            }
            _ => {}
        }
        outer.base().or(ctx, lhs, rhs)
    }

    fn xor_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 ^ X => X
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_opt(rhs);
        }
        outer.base().xor(ctx, lhs, rhs)
    }

    fn xor_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        Self::xor_cn(outer, ctx, rhs, lhs)
    }

    fn xor_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X ^ X => 0
        if lhs == rhs {
            let zero = outer.zero(ctx, lhs.width(ctx));
            return record_const_opt(zero);
        }
        // X ^ ~X => -1
        if let Expr::Not(x, _) = *ctx.get(lhs) {
            if x == rhs {
                let ones = outer.ones(ctx, rhs.width(ctx));
                return record_const_opt(ones);
            }
        }
        if let Expr::Not(x, _) = *ctx.get(rhs) {
            if x == lhs {
                let ones = outer.ones(ctx, lhs.width(ctx));
                return record_const_opt(ones);
            }
        }
        outer.base().xor(ctx, lhs, rhs)
    }

    fn shl_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 << X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().shl(ctx, lhs, rhs)
    }

    fn shl_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X << 0 => X
        if literal_value(ctx, rhs).unwrap().is_zero() {
            return record_opt(lhs);
        }
        outer.base().shl(ctx, lhs, rhs)
    }

    fn lshr_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // 0 >> X => 0
        if literal_value(ctx, lhs).unwrap().is_zero() {
            return record_const_opt(lhs);
        }
        outer.base().lshr(ctx, lhs, rhs)
    }

    fn lshr_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >> 0 => X
        if literal_value(ctx, rhs).unwrap().is_zero() {
            return record_opt(lhs);
        }
        outer.base().lshr(ctx, lhs, rhs)
    }

    fn ashr_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // 0 >> X => 0 and -1 >> X => -1, the shift only replicates the sign
        if c.is_zero() || c.is_ones() {
            return record_const_opt(lhs);
        }
        outer.base().ashr(ctx, lhs, rhs)
    }

    fn ashr_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X >> 0 => X
        if literal_value(ctx, rhs).unwrap().is_zero() {
            return record_opt(lhs);
        }
        outer.base().ashr(ctx, lhs, rhs)
    }

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
                return record_opt(rhs);
            }
            // false == X => !X
            let res = outer.base().not(ctx, rhs);
            return record_opt(res);
        }
        match *ctx.get(rhs) {
            Expr::ZExt { e, .. } => {
                let src_width = e.width(ctx);
                // ZExt X == C => X == C at the source width if C is in range
                if in_zext_range(&c, src_width) {
                    let t = outer.constant(ctx, c.truncate(src_width));
                    let res = outer.eq(ctx, t, e);
                    return record_opt(res);
                }
                // a bit is set outside the range, the values can never be equal
                let fals = outer.fals(ctx);
                return record_const_opt(fals);
            }
            Expr::SExt { e, .. } => {
                let src_width = e.width(ctx);
                // SExt X == C => X == C at the source width if C is in range
                if in_sext_range(&c, src_width) {
                    let t = outer.constant(ctx, c.truncate(src_width));
                    let res = outer.eq(ctx, t, e);
                    return record_opt(res);
                }
                let fals = outer.fals(ctx);
                return record_const_opt(fals);
            }
            _ => {}
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
            let tru = outer.tru(ctx);
            return record_const_opt(tru);
        }
        match *ctx.get(lhs) {
            Expr::Add(x, y, _) => {
                // C + X == X <=> C == 0
                if let Some(c) = literal_value(ctx, x) {
                    if y == rhs {
                        let res = outer.constant(ctx, BitVecValue::from_bool(c.is_zero()));
                        return record_const_opt(res);
                    }
                }
            }
            Expr::ZExt { e: le, .. } => {
                // ZExt X == ZExt Y => X == Y if the source widths agree
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.eq(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            Expr::SExt { e: le, .. } => {
                // SExt X == SExt Y => X == Y if the source widths agree
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.eq(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        // X == C + X <=> C == 0
        if let Expr::Add(x, y, _) = *ctx.get(rhs) {
            if let Some(c) = literal_value(ctx, x) {
                if y == lhs {
                    let res = outer.constant(ctx, BitVecValue::from_bool(c.is_zero()));
                    return record_const_opt(res);
                }
            }
        }
        // (X + Z) == (Y + Z) => X == Y over all four pairings
        if let Expr::Add(lx, ly, _) = *ctx.get(lhs) {
            if let Expr::Add(rx, ry, _) = *ctx.get(rhs) {
                if lx == rx {
                    let res = outer.eq(ctx, ly, ry);
                    return record_opt(res);
                }
                if ly == ry {
                    let res = outer.eq(ctx, lx, rx);
                    return record_opt(res);
                }
                if lx == ry {
                    let res = outer.eq(ctx, ly, rx);
                    return record_opt(res);
                }
                if ly == rx {
                    let res = outer.eq(ctx, lx, ry);
                    return record_opt(res);
                }
            }
        }
        outer.base().eq(ctx, lhs, rhs)
    }

    fn ult_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // C <u ZExt X => C <u X at the source width, or false when C is
        // beyond the largest zero-extended value
        if let Expr::ZExt { e, .. } = *ctx.get(rhs) {
            let src_width = e.width(ctx);
            if in_zext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.ult(ctx, t, e);
                return record_opt(res);
            }
            let fals = outer.fals(ctx);
            return record_const_opt(fals);
        }
        outer.base().ult(ctx, lhs, rhs)
    }

    fn ult_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, rhs).unwrap();
        // X <u 0 => false
        if c.is_zero() {
            let fals = outer.fals(ctx);
            return record_const_opt(fals);
        }
        // ZExt X <u C => X <u C at the source width, or true when C is beyond
        // the largest zero-extended value
        if let Expr::ZExt { e, .. } = *ctx.get(lhs) {
            let src_width = e.width(ctx);
            if in_zext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.ult(ctx, e, t);
                return record_opt(res);
            }
            let tru = outer.tru(ctx);
            return record_const_opt(tru);
        }
        outer.base().ult(ctx, lhs, rhs)
    }

    fn ult_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X <u X => false
        if lhs == rhs {
            let fals = outer.fals(ctx);
            return record_const_opt(fals);
        }
        match *ctx.get(lhs) {
            Expr::Or(x, y, _) => {
                // (X | Y) <u X => false
                if match_either_child((x, y), rhs).is_some() {
                    let fals = outer.fals(ctx);
                    return record_const_opt(fals);
                }
            }
            Expr::URem(_, y, _) => {
                // (X % Y) <u Y => true
                if y == rhs {
                    let tru = outer.tru(ctx);
                    return record_const_opt(tru);
                }
            }
            Expr::ZExt { e: le, .. } => {
                // ZExt X <u ZExt Y => X <u Y if the source widths agree
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ult(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            Expr::SExt { e: le, .. } => {
                // SExt X <u SExt Y => X <u Y if the source widths agree
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ult(ctx, le, re);
                        return record_opt(res);
                    }
                }
                // SExt X <u ZExt X => false
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le == re {
                        let fals = outer.fals(ctx);
                        return record_const_opt(fals);
                    }
                }
            }
            _ => {}
        }
        match *ctx.get(rhs) {
            Expr::And(x, y, _) => {
                // X <u (X & Y) => false
                if match_either_child((x, y), lhs).is_some() {
                    let fals = outer.fals(ctx);
                    return record_const_opt(fals);
                }
            }
            Expr::URem(x, _, _) => {
                // X <u (X % Y) => false
                if x == lhs {
                    let fals = outer.fals(ctx);
                    return record_const_opt(fals);
                }
            }
            Expr::UDiv(x, _, _) => {
                // X <u (X / Y) => false
                if x == lhs {
                    let fals = outer.fals(ctx);
                    return record_const_opt(fals);
                }
            }
            _ => {}
        }
        outer.base().ult(ctx, lhs, rhs)
    }

    fn ule_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // C <=u ZExt X => C <=u X at the source width, or false when C is
        // beyond the largest zero-extended value
        if let Expr::ZExt { e, .. } = *ctx.get(rhs) {
            let src_width = e.width(ctx);
            if in_zext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.ule(ctx, t, e);
                return record_opt(res);
            }
            let fals = outer.fals(ctx);
            return record_const_opt(fals);
        }
        outer.base().ule(ctx, lhs, rhs)
    }

    fn ule_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, rhs).unwrap();
        // ZExt X <=u C => X <=u C at the source width, or true when C is
        // beyond the largest zero-extended value
        if let Expr::ZExt { e, .. } = *ctx.get(lhs) {
            let src_width = e.width(ctx);
            if in_zext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.ule(ctx, e, t);
                return record_opt(res);
            }
            let tru = outer.tru(ctx);
            return record_const_opt(tru);
        }
        outer.base().ule(ctx, lhs, rhs)
    }

    fn ule_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X <=u X => true
        if lhs == rhs {
            let tru = outer.tru(ctx);
            return record_const_opt(tru);
        }
        match *ctx.get(lhs) {
            Expr::And(x, y, _) => {
                // (X & Y) <=u X => true
                if match_either_child((x, y), rhs).is_some() {
                    let tru = outer.tru(ctx);
                    return record_const_opt(tru);
                }
            }
            Expr::URem(x, _, _) => {
                // (X % Y) <=u X => true
                if x == rhs {
                    let tru = outer.tru(ctx);
                    return record_const_opt(tru);
                }
            }
            Expr::ZExt { e: le, .. } => {
                // ZExt X <=u ZExt Y => X <=u Y if the source widths agree
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ule(ctx, le, re);
                        return record_opt(res);
                    }
                }
                // ZExt X <=u SExt X => true
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le == re {
                        let tru = outer.tru(ctx);
                        return record_const_opt(tru);
                    }
                }
            }
            Expr::SExt { e: le, .. } => {
                // SExt X <=u SExt Y => X <=u Y if the source widths agree
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ule(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        // X <=u (X | Y) => true
        if let Expr::Or(x, y, _) = *ctx.get(rhs) {
            if match_either_child((x, y), lhs).is_some() {
                let tru = outer.tru(ctx);
                return record_const_opt(tru);
            }
        }
        outer.base().ule(ctx, lhs, rhs)
    }

    fn slt_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        // C <s SExt X => C <s X at the source width, or a constant decided by
        // the side of the representable range the constant falls on
        if let Expr::SExt { e, .. } = *ctx.get(rhs) {
            let src_width = e.width(ctx);
            if in_sext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.slt(ctx, t, e);
                return record_opt(res);
            }
            let res = outer.constant(ctx, BitVecValue::from_bool(c.is_negative()));
            return record_const_opt(res);
        }
        outer.base().slt(ctx, lhs, rhs)
    }

    fn slt_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, rhs).unwrap();
        // SExt X <s C => X <s C at the source width, or a constant decided by
        // the side of the representable range the constant falls on
        if let Expr::SExt { e, .. } = *ctx.get(lhs) {
            let src_width = e.width(ctx);
            if in_sext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.slt(ctx, e, t);
                return record_opt(res);
            }
            let res = outer.constant(ctx, BitVecValue::from_bool(!c.is_negative()));
            return record_const_opt(res);
        }
        outer.base().slt(ctx, lhs, rhs)
    }

    fn slt_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X <s X => false
        if lhs == rhs {
            let fals = outer.fals(ctx);
            return record_const_opt(fals);
        }
        match *ctx.get(lhs) {
            Expr::ZExt { e: le, .. } => {
                // ZExt X <s ZExt Y => X <u Y, both sides are non-negative
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ult(ctx, le, re);
                        return record_opt(res);
                    }
                }
                // ZExt X <s SExt X => false
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le == re {
                        let fals = outer.fals(ctx);
                        return record_const_opt(fals);
                    }
                }
            }
            Expr::SExt { e: le, .. } => {
                // SExt X <s SExt Y => X <s Y if the source widths agree
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.slt(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            _ => {}
        }
        outer.base().slt(ctx, lhs, rhs)
    }

    fn sle_cn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, lhs).unwrap();
        if let Expr::SExt { e, .. } = *ctx.get(rhs) {
            let src_width = e.width(ctx);
            // C <=s SExt X => C <=s X at the source width
            if in_sext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.sle(ctx, t, e);
                return record_opt(res);
            }
            let res = outer.constant(ctx, BitVecValue::from_bool(c.is_negative()));
            return record_const_opt(res);
        }
        outer.base().sle(ctx, lhs, rhs)
    }

    fn sle_nc<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        let c = literal_value(ctx, rhs).unwrap();
        if let Expr::SExt { e, .. } = *ctx.get(lhs) {
            let src_width = e.width(ctx);
            // SExt X <=s C => X <=s C at the source width
            if in_sext_range(&c, src_width) {
                let t = outer.constant(ctx, c.truncate(src_width));
                let res = outer.sle(ctx, e, t);
                return record_opt(res);
            }
            let res = outer.constant(ctx, BitVecValue::from_bool(!c.is_negative()));
            return record_const_opt(res);
        }
        outer.base().sle(ctx, lhs, rhs)
    }

    fn sle_nn<B: ExprBuilder>(
        outer: &mut ConstantSpecializedBuilder<Self, B>,
        ctx: &mut Context,
        lhs: ExprRef,
        rhs: ExprRef,
    ) -> ExprRef {
        // X <=s X => true
        if lhs == rhs {
            let tru = outer.tru(ctx);
            return record_const_opt(tru);
        }
        match *ctx.get(lhs) {
            Expr::ZExt { e: le, .. } => {
                // ZExt X <=s ZExt Y => X <=u Y, both sides are non-negative
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.ule(ctx, le, re);
                        return record_opt(res);
                    }
                }
            }
            Expr::SExt { e: le, .. } => {
                // SExt X <=s SExt Y => X <=s Y if the source widths agree
                if let Expr::SExt { e: re, .. } = *ctx.get(rhs) {
                    if le.width(ctx) == re.width(ctx) {
                        let res = outer.sle(ctx, le, re);
                        return record_opt(res);
                    }
                }
                // SExt X <=s ZExt X => true
                if let Expr::ZExt { e: re, .. } = *ctx.get(rhs) {
                    if le == re {
                        let tru = outer.tru(ctx);
                        return record_const_opt(tru);
                    }
                }
            }
            _ => {}
        }
        outer.base().sle(ctx, lhs, rhs)
    }
}
