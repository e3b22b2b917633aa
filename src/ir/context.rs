// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::expr::{ArraySymbol, BVLitValue, Expr, UpdateList, UpdateNode};
use crate::ir::value::{BitVecValue, WidthInt};
use std::fmt::{Debug, Formatter};
use std::num::{NonZeroU16, NonZeroU32};

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct StringRef(NonZeroU16);

impl Debug for StringRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StringRef({})", self.index())
    }
}

impl StringRef {
    fn from_index(index: usize) -> Self {
        Self(NonZeroU16::new((index + 1) as u16).unwrap())
    }

    fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ExprRef(NonZeroU32);

impl Debug for ExprRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // we need a custom implementation in order to show the zero based index
        write!(f, "ExprRef({})", self.index())
    }
}

impl ExprRef {
    pub(crate) fn from_index(index: usize) -> Self {
        ExprRef(NonZeroU32::new((index + 1) as u32).unwrap())
    }

    pub(crate) fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct ArrayRef(NonZeroU32);

impl Debug for ArrayRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArrayRef({})", self.index())
    }
}

impl ArrayRef {
    fn from_index(index: usize) -> Self {
        ArrayRef(NonZeroU32::new((index + 1) as u32).unwrap())
    }

    fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct UpdateNodeRef(NonZeroU32);

impl Debug for UpdateNodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "UpdateNodeRef({})", self.index())
    }
}

impl UpdateNodeRef {
    fn from_index(index: usize) -> Self {
        UpdateNodeRef(NonZeroU32::new((index + 1) as u32).unwrap())
    }

    fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Context which is used to create all expressions. Expressions are interned
/// such that reference equivalence implies structural equivalence, which makes
/// the structural-equality tests of the rewrite rules a reference comparison.
#[derive(Clone, Default)]
pub struct Context {
    strings: indexmap::IndexSet<String>,
    exprs: indexmap::IndexSet<Expr>,
    values: indexmap::IndexSet<BitVecValue>,
    arrays: indexmap::IndexSet<ArraySymbol>,
    updates: indexmap::IndexSet<UpdateNode>,
}

/// Adding and removing nodes.
impl Context {
    pub fn get(&self, reference: ExprRef) -> &Expr {
        self.exprs.get_index(reference.index()).expect("Invalid ExprRef!")
    }

    pub(crate) fn add_expr(&mut self, value: Expr) -> ExprRef {
        let (index, _) = self.exprs.insert_full(value);
        ExprRef::from_index(index)
    }

    pub(crate) fn get_str(&self, reference: StringRef) -> &str {
        self.strings
            .get_index(reference.index())
            .expect("Invalid StringRef!")
    }

    pub(crate) fn string(&mut self, value: std::borrow::Cow<str>) -> StringRef {
        if let Some(index) = self.strings.get_index_of(value.as_ref()) {
            StringRef::from_index(index)
        } else {
            let (index, _) = self.strings.insert_full(value.into_owned());
            StringRef::from_index(index)
        }
    }

    pub(crate) fn get_bv_value(&self, lit: BVLitValue) -> &BitVecValue {
        self.values.get_index(lit.index()).expect("Invalid BVLitValue!")
    }

    pub fn get_array(&self, reference: ArrayRef) -> &ArraySymbol {
        self.arrays
            .get_index(reference.index())
            .expect("Invalid ArrayRef!")
    }

    pub fn get_update(&self, reference: UpdateNodeRef) -> &UpdateNode {
        self.updates
            .get_index(reference.index())
            .expect("Invalid UpdateNodeRef!")
    }
}

/// Convenience methods to construct IR nodes.
impl Context {
    pub fn bv_lit(&mut self, value: BitVecValue) -> ExprRef {
        let width = value.width();
        let (index, _) = self.values.insert_full(value);
        self.add_expr(Expr::Literal(BVLitValue::new(index as u32, width)))
    }

    pub fn zero(&mut self, width: WidthInt) -> ExprRef {
        self.bv_lit(BitVecValue::zero(width))
    }

    pub fn one(&mut self, width: WidthInt) -> ExprRef {
        self.bv_lit(BitVecValue::one(width))
    }

    pub fn ones(&mut self, width: WidthInt) -> ExprRef {
        self.bv_lit(BitVecValue::ones(width))
    }

    pub fn array_symbol(
        &mut self,
        name: &str,
        index_width: WidthInt,
        data_width: WidthInt,
    ) -> ArrayRef {
        assert!(index_width > 0 && data_width > 0, "0-bit bitvectors are not allowed");
        let name = self.string(name.into());
        let (index, _) = self.arrays.insert_full(ArraySymbol {
            name,
            index_width,
            data_width,
        });
        ArrayRef::from_index(index)
    }

    /// Extends an update list with one more write. The caller has to make sure
    /// that index and value widths match the root array.
    pub fn push_update(&mut self, updates: UpdateList, index: ExprRef, value: ExprRef) -> UpdateList {
        let (node, _) = self.updates.insert_full(UpdateNode {
            index,
            value,
            next: updates.head,
        });
        UpdateList {
            root: updates.root,
            head: Some(UpdateNodeRef::from_index(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ir_type_size() {
        assert_eq!(std::mem::size_of::<StringRef>(), 2);
        assert_eq!(std::mem::size_of::<ExprRef>(), 4);
        assert_eq!(std::mem::size_of::<Option<UpdateNodeRef>>(), 4);
    }

    #[test]
    fn reference_ids() {
        let mut ctx = Context::default();
        let id0 = ctx.zero(1);
        assert_eq!(id0.0.get(), 1, "ids start at one (for now)");
        let id0_b = ctx.zero(1);
        assert_eq!(id0.0, id0_b.0, "ids should be interned!");
        let id1 = ctx.zero(2);
        assert_eq!(id0.0.get() + 1, id1.0.get(), "ids should increment!");
    }

    #[test]
    fn literal_widths_are_distinct() {
        let mut ctx = Context::default();
        let one_w8 = ctx.one(8);
        let one_w16 = ctx.one(16);
        assert_ne!(one_w8, one_w16);
        assert_eq!(ctx.get(one_w8).as_literal().unwrap().width(), 8);
        assert_eq!(ctx.get(one_w16).as_literal().unwrap().width(), 16);
    }

    #[test]
    fn update_list_ordering() {
        let mut ctx = Context::default();
        let mem = ctx.array_symbol("mem", 32, 8);
        let idx0 = ctx.zero(32);
        let idx1 = ctx.one(32);
        let val = ctx.ones(8);
        let ul = UpdateList::new(mem);
        assert!(ul.head.is_none());
        let ul = ctx.push_update(ul, idx0, val);
        let ul = ctx.push_update(ul, idx1, val);
        // the most recent write is at the head
        let head = ctx.get_update(ul.head.unwrap());
        assert_eq!(head.index, idx1);
        let next = ctx.get_update(head.next.unwrap());
        assert_eq!(next.index, idx0);
        assert!(next.next.is_none());
        assert_eq!(ul.index_width(&ctx), 32);
        assert_eq!(ul.data_width(&ctx), 8);
    }
}
