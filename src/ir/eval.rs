// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::context::{Context, ExprRef};
use crate::ir::expr::{Expr, ForEachChild, UpdateList};
use crate::ir::value::BitVecValue;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Returns a value for an expression if it is available.
pub trait GetExprValue {
    fn get_bv(&self, ctx: &Context, expr: ExprRef) -> Option<BitVecValue>;
}

impl GetExprValue for HashMap<ExprRef, BitVecValue> {
    fn get_bv(&self, _ctx: &Context, expr: ExprRef) -> Option<BitVecValue> {
        self.get(&expr).cloned()
    }
}

impl GetExprValue for [(ExprRef, BitVecValue)] {
    fn get_bv(&self, _ctx: &Context, expr: ExprRef) -> Option<BitVecValue> {
        self.iter()
            .find(|(e, _v)| *e == expr)
            .map(|(_e, v)| v.clone())
    }
}

type BitVecStack = SmallVec<[BitVecValue; 4]>;

#[inline]
fn un_op(stack: &mut BitVecStack, op: impl Fn(BitVecValue) -> BitVecValue) {
    let e = stack.pop().unwrap_or_else(|| panic!("Stack is empty!"));
    let res = op(e);
    stack.push(res);
}

#[inline]
fn bin_op(stack: &mut BitVecStack, op: impl Fn(BitVecValue, BitVecValue) -> BitVecValue) {
    let a = stack.pop().unwrap_or_else(|| panic!("Stack is empty!"));
    let b = stack.pop().unwrap_or_else(|| panic!("Stack is empty!"));
    let res = op(a, b);
    stack.push(res);
}

/// Evaluates the expression under the given value store. Symbolic reads must
/// either be covered by the store or resolve through their update list,
/// otherwise evaluation panics. Division by zero follows the SMT-LIB total
/// semantics of [`BitVecValue`].
pub fn eval_bv_expr(
    ctx: &Context,
    values: &(impl GetExprValue + ?Sized),
    expr: ExprRef,
) -> BitVecValue {
    let mut stack: BitVecStack = SmallVec::with_capacity(4);
    let mut todo: SmallVec<[(ExprRef, bool); 4]> = SmallVec::with_capacity(4);

    todo.push((expr, false));
    while let Some((e, args_available)) = todo.pop() {
        let node = *ctx.get(e);

        // Check if there are children that we need to compute first.
        if !args_available {
            // A value provided for this expression takes precedence over
            // evaluating the children.
            if let Some(value) = values.get_bv(ctx, e) {
                stack.push(value);
                continue;
            }

            let mut has_child = false;
            node.for_each_child(|c| {
                if !has_child {
                    has_child = true;
                    todo.push((e, true));
                }
                todo.push((*c, false));
            });
            // we need to process the children first
            if has_child {
                continue;
            }
        }

        // Otherwise, all arguments are available on the stack for us to use.
        match node {
            Expr::Literal(value) => stack.push(value.get(ctx).clone()),
            Expr::Read { updates, .. } => {
                let index = stack.pop().unwrap_or_else(|| panic!("Stack is empty!"));
                stack.push(resolve_read(ctx, values, updates, &index));
            }
            // transparent for evaluation, the child value is already on the stack
            Expr::NotOptimized(_, _) => {}
            Expr::Select { .. } => {
                let cond = stack.pop().unwrap().to_bool().unwrap();
                if cond {
                    let tru = stack.pop().unwrap();
                    stack.pop().unwrap();
                    stack.push(tru);
                } else {
                    stack.pop().unwrap(); // just discard tru
                }
            }
            Expr::Concat(_, _, _) => bin_op(&mut stack, |hi, lo| hi.concat(&lo)),
            Expr::Extract { offset, width, .. } => {
                un_op(&mut stack, |e| e.extract(offset, width))
            }
            Expr::ZExt { width, .. } => un_op(&mut stack, |e| e.zero_extend(width)),
            Expr::SExt { width, .. } => un_op(&mut stack, |e| e.sign_extend(width)),
            Expr::Add(_, _, _) => bin_op(&mut stack, |a, b| a.add(&b)),
            Expr::Sub(_, _, _) => bin_op(&mut stack, |a, b| a.sub(&b)),
            Expr::Mul(_, _, _) => bin_op(&mut stack, |a, b| a.mul(&b)),
            Expr::UDiv(_, _, _) => bin_op(&mut stack, |a, b| a.udiv(&b)),
            Expr::SDiv(_, _, _) => bin_op(&mut stack, |a, b| a.sdiv(&b)),
            Expr::URem(_, _, _) => bin_op(&mut stack, |a, b| a.urem(&b)),
            Expr::SRem(_, _, _) => bin_op(&mut stack, |a, b| a.srem(&b)),
            Expr::Not(_, _) => un_op(&mut stack, |e| e.not()),
            Expr::And(_, _, _) => bin_op(&mut stack, |a, b| a.and(&b)),
            Expr::Or(_, _, _) => bin_op(&mut stack, |a, b| a.or(&b)),
            Expr::Xor(_, _, _) => bin_op(&mut stack, |a, b| a.xor(&b)),
            Expr::Shl(_, _, _) => bin_op(&mut stack, |a, b| a.shift_left(&b)),
            Expr::LShr(_, _, _) => bin_op(&mut stack, |a, b| a.shift_right(&b)),
            Expr::AShr(_, _, _) => bin_op(&mut stack, |a, b| a.arithmetic_shift_right(&b)),
            Expr::Eq(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(a.is_equal(&b))),
            Expr::Ne(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(!a.is_equal(&b))),
            Expr::Ult(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(a.is_ult(&b))),
            Expr::Ule(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(a.is_ule(&b))),
            Expr::Ugt(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(b.is_ult(&a))),
            Expr::Uge(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(b.is_ule(&a))),
            Expr::Slt(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(a.is_slt(&b))),
            Expr::Sle(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(a.is_sle(&b))),
            Expr::Sgt(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(b.is_slt(&a))),
            Expr::Sge(_, _) => bin_op(&mut stack, |a, b| BitVecValue::from_bool(b.is_sle(&a))),
        }
    }

    debug_assert_eq!(stack.len(), 1);
    stack.pop().unwrap()
}

/// Walks the update list from the most recent write and returns the stored
/// value of the first write whose index evaluates to the read index.
fn resolve_read(
    ctx: &Context,
    values: &(impl GetExprValue + ?Sized),
    updates: UpdateList,
    index: &BitVecValue,
) -> BitVecValue {
    let mut head = updates.head;
    while let Some(node_ref) = head {
        let node = *ctx.get_update(node_ref);
        let stored = eval_bv_expr(ctx, values, node.index);
        if stored.is_equal(index) {
            return eval_bv_expr(ctx, values, node.value);
        }
        head = node.next;
    }
    let array = ctx.get_array(updates.root);
    panic!(
        "No value found for read of array {} at index {index}",
        ctx.get_str(array.name)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simplifying_pipeline, ExprBuilder};
    use crate::ir::UpdateList;

    #[test]
    fn test_eval_bv_expr() {
        let mut c = Context::default();
        let mut b = simplifying_pipeline();

        let mem = c.array_symbol("mem", 4, 128);
        let idx_a = c.zero(4);
        let idx_b = c.one(4);
        let a = b.read(&mut c, UpdateList::new(mem), idx_a);
        let bb = b.read(&mut c, UpdateList::new(mem), idx_b);

        // arithmetic and select
        let zero = b.zero(&mut c, 128);
        let cond = b.sgt(&mut c, a, zero);
        let sub = b.sub(&mut c, bb, a);
        let add = b.add(&mut c, bb, a);
        let expr = b.select(&mut c, cond, sub, add);
        let eval = |c: &Context, a_v: i64, b_v: i64| -> i64 {
            let symbols = [
                (a, BitVecValue::from_i64(a_v, 128)),
                (bb, BitVecValue::from_i64(b_v, 128)),
            ];
            eval_bv_expr(c, symbols.as_slice(), expr).to_i64().unwrap()
        };
        assert_eq!(eval(&c, 1, 0), -1);
        assert_eq!(eval(&c, -1, 0), -1);
        assert_eq!(eval(&c, -1, -2), -3);
        assert_eq!(eval(&c, -1, 2000), 2000 - 1);
        assert_eq!(eval(&c, 1000, 2000), 2000 - 1000);
    }

    #[test]
    fn test_eval_read_through_updates() {
        let mut c = Context::default();
        let mut b = simplifying_pipeline();
        let mem = c.array_symbol("mem", 4, 64);

        let mut ul = UpdateList::new(mem);
        for ii in 0..(1u64 << 4) {
            let idx = c.bv_lit(BitVecValue::from_u64(ii, 4));
            let val = c.bv_lit(BitVecValue::from_u64(ii * ii, 64));
            ul = c.push_update(ul, idx, val);
        }

        for ii in 0..(1u64 << 4) {
            let idx = c.bv_lit(BitVecValue::from_u64(ii, 4));
            let read = b.base().base().read(&mut c, ul, idx);
            let value = eval_bv_expr(&c, &HashMap::new(), read);
            assert_eq!(value.to_u64().unwrap(), ii * ii);
        }
    }
}
