//! Statement emission.

use inkwell::values::BasicMetadataTypeEnum;

use super::{llvm_type, ty_from_name, Compiler, Handle};
use crate::ast::{FunctionParameter, Stmt};
use crate::env::Ty;

impl<'ctx> Compiler<'ctx> {
    pub(crate) fn compile_stmt(&self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => {
                self.compile_expr(expr);
            }
            Stmt::Var {
                name,
                declared_type,
                value,
            } => self.compile_var(name, declared_type, value),
            Stmt::Assign { name, value } => self.compile_assign(name, value),
            Stmt::Function {
                name,
                params,
                return_type,
                body,
            } => self.compile_function(name, params, return_type, body),
            Stmt::Block(stmts) => {
                // No new scope here: only function bodies introduce scopes.
                for stmt in stmts {
                    self.compile_stmt(stmt);
                }
            }
            Stmt::Return(expr) => self.compile_return(expr),
            Stmt::If {
                condition,
                consequence,
                alternative,
            } => self.compile_if(condition, consequence, alternative.as_deref()),
            Stmt::While { condition, body } => self.compile_while(condition, body),
        }
    }

    /// The declared-type annotation is parsed and carried on the AST node
    /// but never cross-checked against the initializer's computed type: the
    /// initializer's type is the binding's type (see DESIGN.md).
    fn compile_var(&self, name: &str, _declared_type: &str, value: &crate::ast::Expr) {
        let Some((value, ty)) = self.compile_expr(value) else {
            return;
        };
        if self.require_block("variable initialization").is_none() {
            return;
        }

        let env = self.current_env();
        match env.lookup(name) {
            Some(existing) => {
                let Handle::Var(ptr) = existing.handle else {
                    self.push_error(format!("'{name}' is not a variable"));
                    return;
                };
                self.builder.build_store(ptr, value).ok();
            }
            None => {
                let llvm_ty = llvm_type(self.context, ty);
                let ptr = self
                    .builder
                    .build_alloca(llvm_ty, name)
                    .unwrap_or_else(|e| panic!("failed to allocate '{name}': {e}"));
                self.builder.build_store(ptr, value).ok();
                env.define(name, Handle::Var(ptr), ty);
            }
        }
    }

    fn compile_assign(&self, name: &str, value: &crate::ast::Expr) {
        let Some((value, _ty)) = self.compile_expr(value) else {
            return;
        };
        if self.require_block("assignment").is_none() {
            return;
        }

        let env = self.current_env();
        match env.lookup(name) {
            None => {
                self.push_error(format!(
                    "Identifier {name} has not been declared before re-assignment"
                ));
            }
            Some(binding) => {
                let Handle::Var(ptr) = binding.handle else {
                    self.push_error(format!("'{name}' is not a variable"));
                    return;
                };
                self.builder.build_store(ptr, value).ok();
            }
        }
    }

    fn compile_function(
        &self,
        name: &str,
        params: &[FunctionParameter],
        return_type: &str,
        body: &Stmt,
    ) {
        let Some(return_ty) = ty_from_name(return_type) else {
            self.push_error(format!("unknown return type '{return_type}' for function '{name}'"));
            return;
        };

        let mut param_types = Vec::with_capacity(params.len());
        for param in params {
            let Some(ty) = ty_from_name(&param.declared_type) else {
                self.push_error(format!(
                    "unknown parameter type '{}' for parameter '{}' of function '{name}'",
                    param.declared_type, param.name
                ));
                return;
            };
            param_types.push(ty);
        }

        let llvm_param_types: Vec<BasicMetadataTypeEnum> = param_types
            .iter()
            .map(|ty| llvm_type(self.context, *ty).into())
            .collect();
        let llvm_return_type = llvm_type(self.context, return_ty);
        let fn_type = llvm_return_type.fn_type(&llvm_param_types, false);

        let function = self.module.add_function(name, fn_type, None);

        let saved_block = self.builder.get_insert_block();
        let entry = self.context.append_basic_block(function, &format!("{name}_entry"));
        self.builder.position_at_end(entry);

        let outer_env = self.current_env();
        let inner_env = outer_env.child();

        for (i, (param, ty)) in params.iter().zip(param_types.iter()).enumerate() {
            let llvm_ty = llvm_type(self.context, *ty);
            let ptr = self
                .builder
                .build_alloca(llvm_ty, &param.name)
                .unwrap_or_else(|e| panic!("failed to allocate parameter '{}': {e}", param.name));
            let arg = function
                .get_nth_param(i as u32)
                .unwrap_or_else(|| panic!("missing argument {i} for function '{name}'"));
            self.builder.build_store(ptr, arg).ok();
            inner_env.define(&param.name, Handle::Var(ptr), *ty);
        }

        // Bind the function's own name in its own scope so it can call itself.
        inner_env.define(name, Handle::Func(function), return_ty);

        self.set_env(inner_env);
        log::debug!("compiling function '{name}' ({} params)", params.len());
        self.compile_stmt(body);
        self.set_env(outer_env.clone());

        // Rebind in the outer scope so callers defined after this point can
        // reach it.
        outer_env.define(name, Handle::Func(function), return_ty);

        if let Some(block) = saved_block {
            self.builder.position_at_end(block);
        }
    }

    fn compile_return(&self, expr: &crate::ast::Expr) {
        let Some((value, _ty)) = self.compile_expr(expr) else {
            return;
        };
        if self.require_block("return statement").is_none() {
            return;
        }
        self.builder.build_return(Some(&value)).ok();
    }

    /// Hand-rolled three-basic-block if/else: there is no structured-if
    /// helper on this collaborator the way llvmlite's `if_then`/`if_else`
    /// context managers provide, so basic blocks are created, branched to,
    /// and stitched back together explicitly. No phi node is built since
    /// this grammar's `IfStmt` never produces a value.
    fn compile_if(&self, condition: &crate::ast::Expr, consequence: &Stmt, alternative: Option<&Stmt>) {
        let Some((condition, cond_ty)) = self.compile_expr(condition) else {
            return;
        };
        if cond_ty != Ty::Bool {
            self.push_error("if condition must be of type bool".to_string());
            return;
        }
        let Some(current_block) = self.require_block("if statement") else {
            return;
        };
        let function = current_block.get_parent().expect("block has a parent function");

        let then_block = self.context.append_basic_block(function, "if_then");
        let merge_block = self.context.append_basic_block(function, "if_merge");
        let else_block = if alternative.is_some() {
            self.context.append_basic_block(function, "if_else")
        } else {
            merge_block
        };

        self.builder
            .build_conditional_branch(condition.into_int_value(), then_block, else_block)
            .ok();

        self.builder.position_at_end(then_block);
        self.compile_stmt(consequence);
        if self.builder.get_insert_block().unwrap().get_terminator().is_none() {
            self.builder.build_unconditional_branch(merge_block).ok();
        }

        if let Some(alternative) = alternative {
            self.builder.position_at_end(else_block);
            self.compile_stmt(alternative);
            if self.builder.get_insert_block().unwrap().get_terminator().is_none() {
                self.builder.build_unconditional_branch(merge_block).ok();
            }
        }

        self.builder.position_at_end(merge_block);
    }

    /// Two named blocks (`while_loop_entry_N`/`while_loop_otherwise_N`),
    /// with the loop condition evaluated both at the head and again at the
    /// tail of the body, rather than a three-block (condition/body/after)
    /// layout.
    fn compile_while(&self, condition: &crate::ast::Expr, body: &Stmt) {
        let Some(current_block) = self.require_block("while statement") else {
            return;
        };
        let function = current_block.get_parent().expect("block has a parent function");
        let id = self.next_loop_id();

        let entry_block = self
            .context
            .append_basic_block(function, &format!("while_loop_entry_{id}"));
        let otherwise_block = self
            .context
            .append_basic_block(function, &format!("while_loop_otherwise_{id}"));

        let Some((condition_value, cond_ty)) = self.compile_expr(condition) else {
            return;
        };
        if cond_ty != Ty::Bool {
            self.push_error("while condition must be of type bool".to_string());
            return;
        }
        self.builder
            .build_conditional_branch(condition_value.into_int_value(), entry_block, otherwise_block)
            .ok();

        self.builder.position_at_end(entry_block);

        self.break_targets.borrow_mut().push(otherwise_block);
        self.continue_targets.borrow_mut().push(entry_block);

        self.compile_stmt(body);

        let Some((condition_value, _)) = self.compile_expr(condition) else {
            self.break_targets.borrow_mut().pop();
            self.continue_targets.borrow_mut().pop();
            return;
        };
        self.builder
            .build_conditional_branch(condition_value.into_int_value(), entry_block, otherwise_block)
            .ok();

        self.break_targets.borrow_mut().pop();
        self.continue_targets.borrow_mut().pop();

        self.builder.position_at_end(otherwise_block);
    }
}
