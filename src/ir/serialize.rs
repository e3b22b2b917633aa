// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

use crate::ir::context::{Context, ExprRef};
use crate::ir::expr::{Expr, UpdateList};
use std::io::Write;

/// Compact textual rendering of IR nodes for debugging and test diagnostics.
pub trait SerializableIrNode {
    fn serialize<W: Write>(&self, ctx: &Context, writer: &mut W) -> std::io::Result<()>;
    fn serialize_to_str(&self, ctx: &Context) -> String {
        let mut buf = Vec::new();
        self.serialize(ctx, &mut buf)
            .expect("Failed to write to string!");
        String::from_utf8(buf).expect("Failed to read string we wrote!")
    }
}

fn serialize_fn<W: Write>(
    ctx: &Context,
    writer: &mut W,
    name: &str,
    args: &[ExprRef],
) -> std::io::Result<()> {
    write!(writer, "{name}(")?;
    for (ii, arg) in args.iter().enumerate() {
        if ii > 0 {
            write!(writer, ", ")?;
        }
        arg.serialize(ctx, writer)?;
    }
    write!(writer, ")")
}

fn serialize_updates<W: Write>(
    ctx: &Context,
    writer: &mut W,
    updates: UpdateList,
) -> std::io::Result<()> {
    let array = ctx.get_array(updates.root);
    write!(writer, "{}", ctx.get_str(array.name))?;
    let mut head = updates.head;
    while let Some(node_ref) = head {
        let node = *ctx.get_update(node_ref);
        write!(writer, "[")?;
        node.index.serialize(ctx, writer)?;
        write!(writer, " := ")?;
        node.value.serialize(ctx, writer)?;
        write!(writer, "]")?;
        head = node.next;
    }
    Ok(())
}

impl SerializableIrNode for Expr {
    fn serialize<W: Write>(&self, ctx: &Context, writer: &mut W) -> std::io::Result<()> {
        match *self {
            Expr::Literal(value) => write!(writer, "{}", value.get(ctx)),
            Expr::Read { updates, index, .. } => {
                write!(writer, "read(")?;
                serialize_updates(ctx, writer, updates)?;
                write!(writer, ", ")?;
                index.serialize(ctx, writer)?;
                write!(writer, ")")
            }
            Expr::NotOptimized(e, _) => serialize_fn(ctx, writer, "notopt", &[e]),
            Expr::Select { cond, tru, fals } => {
                serialize_fn(ctx, writer, "select", &[cond, tru, fals])
            }
            Expr::Concat(a, b, _) => serialize_fn(ctx, writer, "concat", &[a, b]),
            Expr::Extract { e, offset, width } => {
                e.serialize(ctx, writer)?;
                let hi = offset + width - 1;
                if hi == offset {
                    write!(writer, "[{offset}]")
                } else {
                    write!(writer, "[{hi}:{offset}]")
                }
            }
            Expr::ZExt { e, width } => {
                write!(writer, "zext(")?;
                e.serialize(ctx, writer)?;
                write!(writer, ", {width})")
            }
            Expr::SExt { e, width } => {
                write!(writer, "sext(")?;
                e.serialize(ctx, writer)?;
                write!(writer, ", {width})")
            }
            Expr::Add(a, b, _) => serialize_fn(ctx, writer, "add", &[a, b]),
            Expr::Sub(a, b, _) => serialize_fn(ctx, writer, "sub", &[a, b]),
            Expr::Mul(a, b, _) => serialize_fn(ctx, writer, "mul", &[a, b]),
            Expr::UDiv(a, b, _) => serialize_fn(ctx, writer, "udiv", &[a, b]),
            Expr::SDiv(a, b, _) => serialize_fn(ctx, writer, "sdiv", &[a, b]),
            Expr::URem(a, b, _) => serialize_fn(ctx, writer, "urem", &[a, b]),
            Expr::SRem(a, b, _) => serialize_fn(ctx, writer, "srem", &[a, b]),
            Expr::Not(e, _) => serialize_fn(ctx, writer, "not", &[e]),
            Expr::And(a, b, _) => serialize_fn(ctx, writer, "and", &[a, b]),
            Expr::Or(a, b, _) => serialize_fn(ctx, writer, "or", &[a, b]),
            Expr::Xor(a, b, _) => serialize_fn(ctx, writer, "xor", &[a, b]),
            Expr::Shl(a, b, _) => serialize_fn(ctx, writer, "shl", &[a, b]),
            Expr::LShr(a, b, _) => serialize_fn(ctx, writer, "lshr", &[a, b]),
            Expr::AShr(a, b, _) => serialize_fn(ctx, writer, "ashr", &[a, b]),
            Expr::Eq(a, b) => serialize_fn(ctx, writer, "eq", &[a, b]),
            Expr::Ne(a, b) => serialize_fn(ctx, writer, "ne", &[a, b]),
            Expr::Ult(a, b) => serialize_fn(ctx, writer, "ult", &[a, b]),
            Expr::Ule(a, b) => serialize_fn(ctx, writer, "ule", &[a, b]),
            Expr::Ugt(a, b) => serialize_fn(ctx, writer, "ugt", &[a, b]),
            Expr::Uge(a, b) => serialize_fn(ctx, writer, "uge", &[a, b]),
            Expr::Slt(a, b) => serialize_fn(ctx, writer, "slt", &[a, b]),
            Expr::Sle(a, b) => serialize_fn(ctx, writer, "sle", &[a, b]),
            Expr::Sgt(a, b) => serialize_fn(ctx, writer, "sgt", &[a, b]),
            Expr::Sge(a, b) => serialize_fn(ctx, writer, "sge", &[a, b]),
        }
    }
}

impl SerializableIrNode for ExprRef {
    fn serialize<W: Write>(&self, ctx: &Context, writer: &mut W) -> std::io::Result<()> {
        ctx.get(*self).serialize(ctx, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{default_builder, ExprBuilder};
    use crate::ir::{BitVecValue, UpdateList};

    #[test]
    fn simple_serialization() {
        let mut ctx = Context::default();
        let mut b = default_builder();
        let three = ctx.bv_lit(BitVecValue::from_u64(3, 8));
        let five = ctx.bv_lit(BitVecValue::from_u64(5, 8));
        let add = b.add(&mut ctx, three, five);
        assert_eq!(add.serialize_to_str(&ctx), "add(8'b11, 8'b101)");

        let mem = ctx.array_symbol("mem", 8, 8);
        let read = b.read(&mut ctx, UpdateList::new(mem), three);
        assert_eq!(read.serialize_to_str(&ctx), "read(mem, 8'b11)");

        let slice = b.extract(&mut ctx, read, 0, 4);
        assert_eq!(slice.serialize_to_str(&ctx), "read(mem, 8'b11)[3:0]");
    }
}
