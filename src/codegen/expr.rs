//! Expression emission.
//!
//! Every expression compiles to a `(value, type)` pair, since the emitter
//! needs the logical type alongside the raw LLVM value to pick the right
//! instruction family for whatever consumes the result (`InfixExpr`'s type
//! dispatch being the main consumer).

use inkwell::values::BasicValueEnum;
use inkwell::{FloatPredicate, IntPredicate};

use super::{llvm_type, Compiler, Handle};
use crate::ast::{Expr, InfixOperator};
use crate::env::Ty;

impl<'ctx> Compiler<'ctx> {
    pub(crate) fn compile_expr(&self, expr: &Expr) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        match expr {
            Expr::IntegerLiteral(v) => {
                let value = self.context.i32_type().const_int(*v as u64, true);
                Some((value.into(), Ty::Int))
            }
            Expr::FloatLiteral(v) => {
                let value = self.context.f32_type().const_float(*v);
                Some((value.into(), Ty::Float))
            }
            Expr::BooleanLiteral(b) => self.compile_identifier(if *b { "true" } else { "false" }),
            Expr::Identifier(name) => self.compile_identifier(name),
            Expr::Infix { op, left, right } => self.compile_infix(*op, left, right),
            Expr::Call { callee_name, args } => self.compile_call(callee_name, args),
        }
    }

    fn compile_identifier(&self, name: &str) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        let binding = self
            .current_env()
            .lookup(name)
            .unwrap_or_else(|| panic!("identifier '{name}' not found in scope"));

        match binding.handle {
            Handle::Var(ptr) => {
                let llvm_ty = llvm_type(self.context, binding.ty);
                let loaded = self
                    .builder
                    .build_load(llvm_ty, ptr, name)
                    .unwrap_or_else(|e| panic!("failed to load '{name}': {e}"));
                Some((loaded, binding.ty))
            }
            Handle::Func(_) => {
                panic!("identifier '{name}' resolves to a function, not a value")
            }
        }
    }

    fn compile_infix(
        &self,
        op: InfixOperator,
        left: &Expr,
        right: &Expr,
    ) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        let (left_value, left_ty) = self.compile_expr(left)?;
        let (right_value, right_ty) = self.compile_expr(right)?;

        if left_ty != right_ty {
            self.push_error(format!(
                "type mismatch in infix expression: {left_ty:?} {op:?} {right_ty:?}"
            ));
            return None;
        }

        match left_ty {
            Ty::Int => self.compile_int_infix(op, left_value, right_value),
            Ty::Float => self.compile_float_infix(op, left_value, right_value),
            Ty::Bool => {
                self.push_error(format!("operator {op:?} is not supported on bool operands"));
                None
            }
        }
    }

    fn compile_int_infix(
        &self,
        op: InfixOperator,
        left: BasicValueEnum<'ctx>,
        right: BasicValueEnum<'ctx>,
    ) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        let l = left.into_int_value();
        let r = right.into_int_value();
        let b = &self.builder;

        let (value, ty) = match op {
            InfixOperator::Add => (b.build_int_add(l, r, "").unwrap().into(), Ty::Int),
            InfixOperator::Subtract => (b.build_int_sub(l, r, "").unwrap().into(), Ty::Int),
            InfixOperator::Multiply => (b.build_int_mul(l, r, "").unwrap().into(), Ty::Int),
            InfixOperator::Divide => (b.build_int_signed_div(l, r, "").unwrap().into(), Ty::Int),
            InfixOperator::Equals => (
                b.build_int_compare(IntPredicate::EQ, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
            InfixOperator::NotEquals => (
                b.build_int_compare(IntPredicate::NE, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
            InfixOperator::LessThan => (
                b.build_int_compare(IntPredicate::SLT, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
            InfixOperator::LessOrEqual => (
                b.build_int_compare(IntPredicate::SLE, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
            InfixOperator::GreaterThan => (
                b.build_int_compare(IntPredicate::SGT, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
            InfixOperator::GreaterOrEqual => (
                b.build_int_compare(IntPredicate::SGE, l, r, "").unwrap().into(),
                Ty::Bool,
            ),
        };
        Some((value, ty))
    }

    /// Float comparisons uniformly produce the real boolean type, and `!=`
    /// lowers to an ordered float compare rather than falling through to a
    /// signed integer compare (see DESIGN.md).
    fn compile_float_infix(
        &self,
        op: InfixOperator,
        left: BasicValueEnum<'ctx>,
        right: BasicValueEnum<'ctx>,
    ) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        let l = left.into_float_value();
        let r = right.into_float_value();
        let b = &self.builder;

        let (value, ty) = match op {
            InfixOperator::Add => (b.build_float_add(l, r, "").unwrap().into(), Ty::Float),
            InfixOperator::Subtract => (b.build_float_sub(l, r, "").unwrap().into(), Ty::Float),
            InfixOperator::Multiply => (b.build_float_mul(l, r, "").unwrap().into(), Ty::Float),
            InfixOperator::Divide => (b.build_float_div(l, r, "").unwrap().into(), Ty::Float),
            InfixOperator::Equals => (
                b.build_float_compare(FloatPredicate::OEQ, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
            InfixOperator::NotEquals => (
                b.build_float_compare(FloatPredicate::ONE, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
            InfixOperator::LessThan => (
                b.build_float_compare(FloatPredicate::OLT, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
            InfixOperator::LessOrEqual => (
                b.build_float_compare(FloatPredicate::OLE, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
            InfixOperator::GreaterThan => (
                b.build_float_compare(FloatPredicate::OGT, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
            InfixOperator::GreaterOrEqual => (
                b.build_float_compare(FloatPredicate::OGE, l, r, "")
                    .unwrap()
                    .into(),
                Ty::Bool,
            ),
        };
        Some((value, ty))
    }

    fn compile_call(&self, callee_name: &str, args: &[Expr]) -> Option<(BasicValueEnum<'ctx>, Ty)> {
        let binding = self.current_env().lookup(callee_name);
        let Some(binding) = binding else {
            self.push_error(format!("unknown function '{callee_name}'"));
            return None;
        };
        let Handle::Func(function) = binding.handle else {
            self.push_error(format!("'{callee_name}' is not a function"));
            return None;
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let (value, _) = self.compile_expr(arg)?;
            arg_values.push(value.into());
        }

        let call_site = self
            .builder
            .build_call(function, &arg_values, "")
            .unwrap_or_else(|e| panic!("failed to call '{callee_name}': {e}"));

        let value = call_site
            .try_as_basic_value()
            .left()
            .unwrap_or_else(|| panic!("function '{callee_name}' produced no return value"));

        Some((value, binding.ty))
    }
}
