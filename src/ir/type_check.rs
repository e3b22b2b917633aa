// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::context::{Context, ExprRef};
use crate::ir::expr::Expr;
use crate::ir::value::{WidthInt, BOOL_WIDTH};

#[derive(Debug, Clone)]
pub struct TypeCheckError {
    msg: String,
}

impl TypeCheckError {
    pub fn get_msg(&self) -> &str {
        &self.msg
    }
}

fn expect_width_of(
    ctx: &Context,
    expected: WidthInt,
    op: &str,
    e: ExprRef,
) -> Result<WidthInt, TypeCheckError> {
    let width = e.width(ctx);
    if width == expected {
        Ok(width)
    } else {
        Err(TypeCheckError {
            msg: format!("{op} only works on bit-vectors of width {expected}, not {width}."),
        })
    }
}

fn expect_same_width(
    ctx: &Context,
    op: &str,
    a: ExprRef,
    b: ExprRef,
) -> Result<WidthInt, TypeCheckError> {
    let a_width = a.width(ctx);
    let b_width = b.width(ctx);
    if a_width == b_width {
        Ok(a_width)
    } else {
        Err(TypeCheckError {
            msg: format!(
                "{op} requires two bit-vectors of the same width, not {a_width} and {b_width}"
            ),
        })
    }
}

pub trait TypeCheck {
    /// Type check one expression node. Does not recurse to lower nodes.
    fn type_check(&self, ctx: &Context) -> Result<WidthInt, TypeCheckError>;
    /// Gets the result width as fast as possible without performing any checks.
    fn width(&self, ctx: &Context) -> WidthInt;
}

impl TypeCheck for Expr {
    fn type_check(&self, ctx: &Context) -> Result<WidthInt, TypeCheckError> {
        match *self {
            Expr::Literal(value) => Ok(value.width()),
            Expr::Read { updates, index, width } => {
                expect_width_of(ctx, updates.index_width(ctx), "read index", index)?;
                if updates.data_width(ctx) != width {
                    Err(TypeCheckError {
                        msg: format!(
                            "read result must have the array data width {0} not {width}",
                            updates.data_width(ctx)
                        ),
                    })
                } else {
                    Ok(width)
                }
            }
            Expr::NotOptimized(e, width) => expect_width_of(ctx, width, "not-optimized", e),
            Expr::Select { cond, tru, fals } => {
                expect_width_of(ctx, BOOL_WIDTH, "select condition", cond)?;
                expect_same_width(ctx, "select branches", tru, fals)
            }
            Expr::Concat(a, b, width) => {
                let actual = a.width(ctx) + b.width(ctx);
                if actual == width {
                    Ok(width)
                } else {
                    Err(TypeCheckError {
                        msg: format!("concat of widths {actual} does not produce {width}"),
                    })
                }
            }
            Expr::Extract { e, offset, width } => {
                let e_width = e.width(ctx);
                if offset + width > e_width {
                    Err(TypeCheckError {
                        msg: format!(
                            "extract of {width} bits at offset {offset} does not fit into {e_width} bits"
                        ),
                    })
                } else {
                    Ok(width)
                }
            }
            Expr::ZExt { e, width } => {
                let e_width = e.width(ctx);
                if width < e_width {
                    Err(TypeCheckError {
                        msg: format!("zero extend cannot shrink {e_width} bits to {width}"),
                    })
                } else {
                    Ok(width)
                }
            }
            Expr::SExt { e, width } => {
                let e_width = e.width(ctx);
                if width < e_width {
                    Err(TypeCheckError {
                        msg: format!("sign extend cannot shrink {e_width} bits to {width}"),
                    })
                } else {
                    Ok(width)
                }
            }
            Expr::Not(e, width) => expect_width_of(ctx, width, "not", e),
            Expr::Add(a, b, width) => check_binary(ctx, "add", a, b, width),
            Expr::Sub(a, b, width) => check_binary(ctx, "sub", a, b, width),
            Expr::Mul(a, b, width) => check_binary(ctx, "mul", a, b, width),
            Expr::UDiv(a, b, width) => check_binary(ctx, "unsigned div", a, b, width),
            Expr::SDiv(a, b, width) => check_binary(ctx, "signed div", a, b, width),
            Expr::URem(a, b, width) => check_binary(ctx, "unsigned rem", a, b, width),
            Expr::SRem(a, b, width) => check_binary(ctx, "signed rem", a, b, width),
            Expr::And(a, b, width) => check_binary(ctx, "and", a, b, width),
            Expr::Or(a, b, width) => check_binary(ctx, "or", a, b, width),
            Expr::Xor(a, b, width) => check_binary(ctx, "xor", a, b, width),
            Expr::Shl(a, b, width) => check_binary(ctx, "shift left", a, b, width),
            Expr::LShr(a, b, width) => check_binary(ctx, "shift right", a, b, width),
            Expr::AShr(a, b, width) => check_binary(ctx, "arithmetic shift right", a, b, width),
            Expr::Eq(a, b) => check_comparison(ctx, "equality", a, b),
            Expr::Ne(a, b) => check_comparison(ctx, "disequality", a, b),
            Expr::Ult(a, b) => check_comparison(ctx, "unsigned less", a, b),
            Expr::Ule(a, b) => check_comparison(ctx, "unsigned less or equal", a, b),
            Expr::Ugt(a, b) => check_comparison(ctx, "unsigned greater", a, b),
            Expr::Uge(a, b) => check_comparison(ctx, "unsigned greater or equal", a, b),
            Expr::Slt(a, b) => check_comparison(ctx, "signed less", a, b),
            Expr::Sle(a, b) => check_comparison(ctx, "signed less or equal", a, b),
            Expr::Sgt(a, b) => check_comparison(ctx, "signed greater", a, b),
            Expr::Sge(a, b) => check_comparison(ctx, "signed greater or equal", a, b),
        }
    }

    fn width(&self, ctx: &Context) -> WidthInt {
        match *self {
            Expr::Literal(value) => value.width(),
            Expr::Read { width, .. } => width,
            Expr::NotOptimized(_, width) => width,
            // We recourse here because adding a `width` field to Select would
            // have blown up the size of `Expr`. We assume that the `fals`
            // branch is less likely to be a nested Select.
            Expr::Select { fals, .. } => fals.width(ctx),
            Expr::Concat(_, _, width) => width,
            Expr::Extract { width, .. } => width,
            Expr::ZExt { width, .. } => width,
            Expr::SExt { width, .. } => width,
            Expr::Add(_, _, width)
            | Expr::Sub(_, _, width)
            | Expr::Mul(_, _, width)
            | Expr::UDiv(_, _, width)
            | Expr::SDiv(_, _, width)
            | Expr::URem(_, _, width)
            | Expr::SRem(_, _, width)
            | Expr::Not(_, width)
            | Expr::And(_, _, width)
            | Expr::Or(_, _, width)
            | Expr::Xor(_, _, width)
            | Expr::Shl(_, _, width)
            | Expr::LShr(_, _, width)
            | Expr::AShr(_, _, width) => width,
            Expr::Eq(_, _)
            | Expr::Ne(_, _)
            | Expr::Ult(_, _)
            | Expr::Ule(_, _)
            | Expr::Ugt(_, _)
            | Expr::Uge(_, _)
            | Expr::Slt(_, _)
            | Expr::Sle(_, _)
            | Expr::Sgt(_, _)
            | Expr::Sge(_, _) => BOOL_WIDTH,
        }
    }
}

fn check_binary(
    ctx: &Context,
    op: &str,
    a: ExprRef,
    b: ExprRef,
    width: WidthInt,
) -> Result<WidthInt, TypeCheckError> {
    let operand_width = expect_same_width(ctx, op, a, b)?;
    if operand_width == width {
        Ok(width)
    } else {
        Err(TypeCheckError {
            msg: format!("{op} over {operand_width} bits cannot produce {width} bits"),
        })
    }
}

fn check_comparison(
    ctx: &Context,
    op: &str,
    a: ExprRef,
    b: ExprRef,
) -> Result<WidthInt, TypeCheckError> {
    expect_same_width(ctx, op, a, b)?;
    Ok(BOOL_WIDTH)
}

impl TypeCheck for ExprRef {
    fn type_check(&self, ctx: &Context) -> Result<WidthInt, TypeCheckError> {
        ctx.get(*self).type_check(ctx)
    }

    fn width(&self, ctx: &Context) -> WidthInt {
        ctx.get(*self).width(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_well_typed_nodes() {
        let mut ctx = Context::default();
        let a = ctx.zero(8);
        let b = ctx.one(8);
        assert_eq!(Expr::Add(a, b, 8).type_check(&ctx).unwrap(), 8);
        assert_eq!(Expr::Eq(a, b).type_check(&ctx).unwrap(), 1);
        assert_eq!(Expr::Concat(a, b, 16).type_check(&ctx).unwrap(), 16);
        assert_eq!(Expr::Extract { e: a, offset: 4, width: 4 }.type_check(&ctx).unwrap(), 4);
        assert_eq!(Expr::ZExt { e: a, width: 32 }.type_check(&ctx).unwrap(), 32);
    }

    #[test]
    fn check_ill_typed_nodes() {
        let mut ctx = Context::default();
        let a = ctx.zero(8);
        let b = ctx.one(16);
        assert!(Expr::Add(a, b, 8).type_check(&ctx).is_err());
        assert!(Expr::Eq(a, b).type_check(&ctx).is_err());
        assert!(Expr::Extract { e: a, offset: 5, width: 4 }.type_check(&ctx).is_err());
        assert!(Expr::ZExt { e: b, width: 8 }.type_check(&ctx).is_err());
        let cond_err = Expr::Select { cond: a, tru: b, fals: b }.type_check(&ctx);
        assert!(cond_err.unwrap_err().get_msg().contains("select condition"));
    }
}
