// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::context::{ArrayRef, Context, ExprRef, StringRef, UpdateNodeRef};
use crate::ir::value::{BitVecValue, WidthInt};

/// Type wrapping an index to an interned bit-vector value.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct BVLitValue {
    index: u32,
    width: WidthInt,
}

impl BVLitValue {
    pub(crate) fn new(index: u32, width: WidthInt) -> Self {
        Self { index, width }
    }

    pub fn get<'c>(&self, ctx: &'c Context) -> &'c BitVecValue {
        ctx.get_bv_value(*self)
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    pub fn width(&self) -> WidthInt {
        self.width
    }
}

/// A named symbolic array over which update lists are layered.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ArraySymbol {
    pub name: StringRef,
    pub index_width: WidthInt,
    pub data_width: WidthInt,
}

/// One write in an update list. Nodes are interned and linked from the most
/// recent write towards the root array.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct UpdateNode {
    pub index: ExprRef,
    pub value: ExprRef,
    pub next: Option<UpdateNodeRef>,
}

/// An ordered sequence of writes over a named symbolic array. `head` is the
/// most recent write.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct UpdateList {
    pub root: ArrayRef,
    pub head: Option<UpdateNodeRef>,
}

impl UpdateList {
    /// An update list with no writes.
    pub fn new(root: ArrayRef) -> Self {
        Self { root, head: None }
    }

    pub fn index_width(&self, ctx: &Context) -> WidthInt {
        ctx.get_array(self.root).index_width
    }

    pub fn data_width(&self, ctx: &Context) -> WidthInt {
        ctx.get_array(self.root).data_width
    }
}

/// Represents a bit-vector expression.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Expr {
    // terminals
    Literal(BVLitValue),
    /// Read from an update list over a symbolic array.
    Read {
        updates: UpdateList,
        index: ExprRef,
        width: WidthInt,
    },
    /// Opaque wrapper that suppresses all rewriting of its contents.
    NotOptimized(ExprRef, WidthInt),
    // structural operations
    Select {
        cond: ExprRef,
        tru: ExprRef,
        fals: ExprRef,
        // no width to keep the node small, see `width()`
    },
    Concat(ExprRef, ExprRef, WidthInt),
    Extract {
        e: ExprRef,
        offset: WidthInt,
        width: WidthInt,
    },
    ZExt {
        e: ExprRef,
        width: WidthInt,
    },
    SExt {
        e: ExprRef,
        width: WidthInt,
    },
    // binary arithmetic
    Add(ExprRef, ExprRef, WidthInt),
    Sub(ExprRef, ExprRef, WidthInt),
    Mul(ExprRef, ExprRef, WidthInt),
    UDiv(ExprRef, ExprRef, WidthInt),
    SDiv(ExprRef, ExprRef, WidthInt),
    URem(ExprRef, ExprRef, WidthInt),
    SRem(ExprRef, ExprRef, WidthInt),
    // bitwise
    Not(ExprRef, WidthInt),
    And(ExprRef, ExprRef, WidthInt),
    Or(ExprRef, ExprRef, WidthInt),
    Xor(ExprRef, ExprRef, WidthInt),
    Shl(ExprRef, ExprRef, WidthInt),
    LShr(ExprRef, ExprRef, WidthInt),
    AShr(ExprRef, ExprRef, WidthInt),
    // comparisons, result width is always Bool
    Eq(ExprRef, ExprRef),
    Ne(ExprRef, ExprRef),
    Ult(ExprRef, ExprRef),
    Ule(ExprRef, ExprRef),
    Ugt(ExprRef, ExprRef),
    Uge(ExprRef, ExprRef),
    Slt(ExprRef, ExprRef),
    Sle(ExprRef, ExprRef),
    Sgt(ExprRef, ExprRef),
    Sge(ExprRef, ExprRef),
}

impl Expr {
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }

    /// Returns the interned literal value. `None` if the expression is not a
    /// literal.
    pub fn as_literal(&self) -> Option<BVLitValue> {
        match self {
            Expr::Literal(value) => Some(*value),
            _ => None,
        }
    }
}

impl ExprRef {
    pub fn is_literal(&self, ctx: &Context) -> bool {
        ctx.get(*self).is_literal()
    }

    pub fn as_literal(&self, ctx: &Context) -> Option<BVLitValue> {
        ctx.get(*self).as_literal()
    }
}

/// Visit all direct children of an expression node.
pub trait ForEachChild {
    fn for_each_child(&self, visitor: impl FnMut(&ExprRef));
    fn num_children(&self) -> usize {
        let mut count = 0;
        self.for_each_child(|_| count += 1);
        count
    }
}

impl ForEachChild for Expr {
    fn for_each_child(&self, mut visitor: impl FnMut(&ExprRef)) {
        match self {
            Expr::Literal(_) => {}
            // update nodes are walked explicitly by consumers
            Expr::Read { index, .. } => visitor(index),
            Expr::NotOptimized(e, _) => visitor(e),
            Expr::Select { cond, tru, fals } => {
                visitor(cond);
                visitor(tru);
                visitor(fals);
            }
            Expr::Extract { e, .. } | Expr::ZExt { e, .. } | Expr::SExt { e, .. } => visitor(e),
            Expr::Not(e, _) => visitor(e),
            Expr::Concat(a, b, _)
            | Expr::Add(a, b, _)
            | Expr::Sub(a, b, _)
            | Expr::Mul(a, b, _)
            | Expr::UDiv(a, b, _)
            | Expr::SDiv(a, b, _)
            | Expr::URem(a, b, _)
            | Expr::SRem(a, b, _)
            | Expr::And(a, b, _)
            | Expr::Or(a, b, _)
            | Expr::Xor(a, b, _)
            | Expr::Shl(a, b, _)
            | Expr::LShr(a, b, _)
            | Expr::AShr(a, b, _)
            | Expr::Eq(a, b)
            | Expr::Ne(a, b)
            | Expr::Ult(a, b)
            | Expr::Ule(a, b)
            | Expr::Ugt(a, b)
            | Expr::Uge(a, b)
            | Expr::Slt(a, b)
            | Expr::Sle(a, b)
            | Expr::Sgt(a, b)
            | Expr::Sge(a, b) => {
                visitor(a);
                visitor(b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ir_type_size() {
        // 4 bytes for the tag plus the largest payload (Read carries an
        // update list, an index and a width)
        assert!(std::mem::size_of::<Expr>() <= 24);
        assert_eq!(std::mem::size_of::<WidthInt>(), 4);
        assert_eq!(std::mem::size_of::<UpdateList>(), 8);
    }

    #[test]
    fn count_children() {
        let mut ctx = Context::default();
        let a = ctx.zero(4);
        let b = ctx.one(4);
        assert_eq!(Expr::Literal(ctx.get(a).as_literal().unwrap()).num_children(), 0);
        assert_eq!(Expr::Add(a, b, 4).num_children(), 2);
        assert_eq!(Expr::Not(a, 4).num_children(), 1);
        assert_eq!(
            Expr::Select {
                cond: ctx.one(1),
                tru: a,
                fals: b
            }
            .num_children(),
            3
        );
    }
}
