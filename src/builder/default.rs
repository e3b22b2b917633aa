// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use super::ExprBuilder;
use crate::ir::{Context, Expr, ExprRef, TypeCheck, UpdateList, WidthInt, BOOL_WIDTH};
use crate::ir::BitVecValue;

/// Allocates every node as requested without any rewriting. This is the inner
/// fallback of all other builder layers.
pub struct DefaultExprBuilder;

fn same_width_bin(
    ctx: &mut Context,
    lhs: ExprRef,
    rhs: ExprRef,
    make: fn(ExprRef, ExprRef, WidthInt) -> Expr,
) -> ExprRef {
    let width = lhs.width(ctx);
    debug_assert_eq!(width, rhs.width(ctx));
    ctx.add_expr(make(lhs, rhs, width))
}

fn comparison(
    ctx: &mut Context,
    lhs: ExprRef,
    rhs: ExprRef,
    make: fn(ExprRef, ExprRef) -> Expr,
) -> ExprRef {
    debug_assert_eq!(lhs.width(ctx), rhs.width(ctx));
    ctx.add_expr(make(lhs, rhs))
}

impl ExprBuilder for DefaultExprBuilder {
    fn constant(&mut self, ctx: &mut Context, value: BitVecValue) -> ExprRef {
        ctx.bv_lit(value)
    }

    fn not_optimized(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        let width = e.width(ctx);
        ctx.add_expr(Expr::NotOptimized(e, width))
    }

    fn read(&mut self, ctx: &mut Context, updates: UpdateList, index: ExprRef) -> ExprRef {
        debug_assert_eq!(index.width(ctx), updates.index_width(ctx));
        let width = updates.data_width(ctx);
        ctx.add_expr(Expr::Read {
            updates,
            index,
            width,
        })
    }

    fn select(
        &mut self,
        ctx: &mut Context,
        cond: ExprRef,
        tru: ExprRef,
        fals: ExprRef,
    ) -> ExprRef {
        debug_assert_eq!(cond.width(ctx), BOOL_WIDTH);
        debug_assert_eq!(tru.width(ctx), fals.width(ctx));
        ctx.add_expr(Expr::Select { cond, tru, fals })
    }

    fn concat(&mut self, ctx: &mut Context, hi: ExprRef, lo: ExprRef) -> ExprRef {
        let width = hi.width(ctx) + lo.width(ctx);
        ctx.add_expr(Expr::Concat(hi, lo, width))
    }

    fn extract(
        &mut self,
        ctx: &mut Context,
        e: ExprRef,
        offset: WidthInt,
        width: WidthInt,
    ) -> ExprRef {
        let e_width = e.width(ctx);
        debug_assert!(offset + width <= e_width);
        if offset == 0 && width == e_width {
            e
        } else {
            ctx.add_expr(Expr::Extract { e, offset, width })
        }
    }

    fn zext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef {
        let e_width = e.width(ctx);
        debug_assert!(width >= e_width);
        if width == e_width {
            e
        } else {
            ctx.add_expr(Expr::ZExt { e, width })
        }
    }

    fn sext(&mut self, ctx: &mut Context, e: ExprRef, width: WidthInt) -> ExprRef {
        let e_width = e.width(ctx);
        debug_assert!(width >= e_width);
        if width == e_width {
            e
        } else {
            ctx.add_expr(Expr::SExt { e, width })
        }
    }

    fn add(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Add)
    }

    fn sub(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Sub)
    }

    fn mul(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Mul)
    }

    fn udiv(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::UDiv)
    }

    fn sdiv(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::SDiv)
    }

    fn urem(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::URem)
    }

    fn srem(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::SRem)
    }

    fn not(&mut self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        let width = e.width(ctx);
        ctx.add_expr(Expr::Not(e, width))
    }

    fn and(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::And)
    }

    fn or(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Or)
    }

    fn xor(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Xor)
    }

    fn shl(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::Shl)
    }

    fn lshr(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::LShr)
    }

    fn ashr(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        same_width_bin(ctx, lhs, rhs, Expr::AShr)
    }

    fn eq(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Eq)
    }

    fn ne(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Ne)
    }

    fn ult(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Ult)
    }

    fn ule(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Ule)
    }

    fn ugt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Ugt)
    }

    fn uge(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Uge)
    }

    fn slt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Slt)
    }

    fn sle(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Sle)
    }

    fn sgt(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Sgt)
    }

    fn sge(&mut self, ctx: &mut Context, lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        comparison(ctx, lhs, rhs, Expr::Sge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::default_builder;

    #[test]
    fn allocates_nodes_verbatim() {
        let mut ctx = Context::default();
        let mut b = default_builder();
        let zero = b.zero(&mut ctx, 8);
        let one = b.one(&mut ctx, 8);
        // no rewriting whatsoever
        let add = b.add(&mut ctx, zero, one);
        assert!(matches!(ctx.get(add), Expr::Add(_, _, 8)));
        let not_not = {
            let n = b.not(&mut ctx, one);
            b.not(&mut ctx, n)
        };
        assert!(matches!(ctx.get(not_not), Expr::Not(_, 8)));
        let eq = b.eq(&mut ctx, zero, one);
        assert!(matches!(ctx.get(eq), Expr::Eq(_, _)));
        assert_eq!(eq.width(&ctx), BOOL_WIDTH);
    }

    #[test]
    fn collapses_zero_width_extensions() {
        let mut ctx = Context::default();
        let mut b = default_builder();
        let mem = ctx.array_symbol("mem", 32, 32);
        let idx = ctx.zero(32);
        let x = b.read(&mut ctx, UpdateList::new(mem), idx);
        assert_eq!(b.zext(&mut ctx, x, 32), x);
        assert_eq!(b.sext(&mut ctx, x, 32), x);
        assert_eq!(b.extract(&mut ctx, x, 0, 32), x);
        let wide = b.zext(&mut ctx, x, 64);
        assert!(matches!(ctx.get(wide), Expr::ZExt { width: 64, .. }));
    }
}
