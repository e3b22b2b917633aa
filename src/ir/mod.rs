// Copyright 2024 The symexpr developers
// released under BSD 3-Clause License

mod context;
mod eval;
mod expr;
mod serialize;
mod type_check;
mod value;

pub use context::{ArrayRef, Context, ExprRef, StringRef, UpdateNodeRef};
pub use eval::{eval_bv_expr, GetExprValue};
pub use expr::{ArraySymbol, BVLitValue, Expr, ForEachChild, UpdateList, UpdateNode};
pub use serialize::SerializableIrNode;
pub use type_check::{TypeCheck, TypeCheckError};
pub use value::{BitVecValue, WidthInt, BOOL_WIDTH};
