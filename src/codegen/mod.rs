//! LLVM IR emission.
//!
//! This walks the tagged `Stmt`/`Expr` tree and drives `inkwell` directly,
//! dispatching on node kind via `match` rather than a `CodeGen` trait
//! implemented once per AST node type. With a closed, five-statement/
//! six-expression grammar a trait-per-node split buys nothing but
//! indirection; a flat match is simpler and just as clear.

mod expr;
mod stmt;

use std::cell::{Cell, RefCell};

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{FunctionValue, PointerValue};

use crate::ast::Program;
use crate::env::{Environment, Ty};

/// What a name in the environment resolves to: a stack slot for a variable,
/// or a function for a call target. Rather than keeping separate
/// `variables`/`functions` maps per scope, this follows the data model's
/// literal `(handle, ir_type)` pair by unifying both into one enum so a
/// single `Environment` frame map can hold both kinds of name.
#[derive(Clone, Copy)]
pub enum Handle<'ctx> {
    Var(PointerValue<'ctx>),
    Func(FunctionValue<'ctx>),
}

pub fn llvm_type<'ctx>(context: &'ctx Context, ty: Ty) -> BasicTypeEnum<'ctx> {
    match ty {
        Ty::Int => context.i32_type().into(),
        Ty::Float => context.f32_type().into(),
        Ty::Bool => context.bool_type().into(),
    }
}

/// Maps a declared-type string (`int`, `float`, `bool`) to the internal
/// type tag. Returns `None` for anything else; the parser only ever
/// produces these three, but the emitter re-validates rather than trusting
/// the string blindly, since it is the boundary where a bad annotation
/// would otherwise panic deep inside LLVM type construction.
pub fn ty_from_name(name: &str) -> Option<Ty> {
    match name {
        "int" => Some(Ty::Int),
        "float" => Some(Ty::Float),
        "bool" => Some(Ty::Bool),
        _ => None,
    }
}

pub struct Compiler<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    builder: Builder<'ctx>,
    env: RefCell<Environment<Handle<'ctx>>>,
    errors: RefCell<Vec<String>>,
    loop_counter: Cell<usize>,
    break_targets: RefCell<Vec<BasicBlock<'ctx>>>,
    continue_targets: RefCell<Vec<BasicBlock<'ctx>>>,
}

impl<'ctx> Compiler<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();
        let env = Environment::root();

        let compiler = Self {
            context,
            module,
            builder,
            env: RefCell::new(env),
            errors: RefCell::new(Vec::new()),
            loop_counter: Cell::new(0),
            break_targets: RefCell::new(Vec::new()),
            continue_targets: RefCell::new(Vec::new()),
        };
        compiler.initialize_builtins();
        compiler
    }

    /// Creates the two module-level boolean constants and binds them by
    /// name in the root environment. `BooleanLiteral` nodes resolve through
    /// this binding rather than materializing a fresh constant each time.
    fn initialize_builtins(&self) {
        let bool_ty = self.context.bool_type();

        let true_global = self.module.add_global(bool_ty, None, "true");
        true_global.set_initializer(&bool_ty.const_int(1, false));
        true_global.set_constant(true);

        let false_global = self.module.add_global(bool_ty, None, "false");
        false_global.set_initializer(&bool_ty.const_int(0, false));
        false_global.set_constant(true);

        let env = self.env.borrow();
        env.define(
            "true",
            Handle::Var(true_global.as_pointer_value()),
            Ty::Bool,
        );
        env.define(
            "false",
            Handle::Var(false_global.as_pointer_value()),
            Ty::Bool,
        );
    }

    fn push_error(&self, message: impl Into<String>) {
        self.errors.borrow_mut().push(message.into());
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    fn next_loop_id(&self) -> usize {
        let next = self.loop_counter.get() + 1;
        self.loop_counter.set(next);
        next
    }

    fn current_env(&self) -> Environment<Handle<'ctx>> {
        self.env.borrow().clone()
    }

    fn set_env(&self, env: Environment<Handle<'ctx>>) {
        *self.env.borrow_mut() = env;
    }

    /// Every statement that emits an instruction needs a positioned
    /// builder, and a top-level statement reached before any function has
    /// positioned the builder has nowhere to go. Rather than panic on a
    /// plausible (if unusual) program, this records a semantic error and
    /// skips the statement.
    fn require_block(&self, context: &str) -> Option<BasicBlock<'ctx>> {
        match self.builder.get_insert_block() {
            Some(block) => Some(block),
            None => {
                self.push_error(format!(
                    "cannot emit {context}: no active basic block (statement appears outside any function)"
                ));
                None
            }
        }
    }

    /// Compiles an entire program, returning the accumulated list of
    /// semantic errors (empty on success). Mirrors the parser's own
    /// "errors, not exceptions" discipline.
    pub fn compile_program(&self, program: &Program) -> Result<(), Vec<String>> {
        for stmt in &program.stmts {
            self.compile_stmt(stmt);
        }
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn compile(source: &str) -> (String, Vec<String>) {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        assert!(parser.errors.is_empty(), "{:?}", parser.errors);

        let context = Context::create();
        let compiler = Compiler::new(&context, "main");
        let result = compiler.compile_program(&program);
        let errors = result.err().unwrap_or_default();
        (compiler.module.print_to_string().to_string(), errors)
    }

    #[test]
    fn var_statement_allocates_and_stores() {
        let (ir, errors) = compile("func f() @ int { var x : int = 5 + 3 * 2; ret x; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("alloca i32"));
        assert!(ir.contains("store i32"));
    }

    #[test]
    fn function_definition_and_call_produce_i32_signature() {
        let (ir, errors) = compile(
            "func add(a: int, b: int) @ int { ret a + b; } func main() @ int { ret add(2, 3); }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("define i32 @\"add\""));
        assert!(ir.contains("call i32 @\"add\""));
    }

    #[test]
    fn while_loop_produces_numbered_blocks() {
        let (ir, errors) = compile(
            "func main() @ int { var i : int = 0; while i < 10 { i = i + 1; } ret i; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("while_loop_entry_1"));
        assert!(ir.contains("while_loop_otherwise_1"));
    }

    #[test]
    fn if_else_produces_then_else_merge_blocks() {
        let (ir, errors) = compile(
            "func main(x: int) @ int { if x == 0 { ret 1; } else { ret 0; } ret 0; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("if_then"));
        assert!(ir.contains("if_else"));
        assert!(ir.contains("if_merge"));
    }

    #[test]
    fn float_comparison_yields_boolean_type_not_a_bare_i1_placeholder() {
        let (ir, errors) = compile(
            "func main() @ bool { var a : float = 1.5; var b : float = 2.5; ret a < b; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("fcmp olt"));
    }

    #[test]
    fn float_not_equals_uses_ordered_float_compare_not_signed_int_compare() {
        let (ir, errors) = compile(
            "func main() @ bool { var a : float = 1.5; var b : float = 2.5; ret a != b; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("fcmp one"));
        assert!(!ir.contains("icmp"));
    }

    #[test]
    fn reassignment_without_declaration_records_error_and_emits_no_store() {
        let (_ir, errors) = compile("func main() @ int { y = 1; ret 0; }");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("has not been declared before re-assignment"));
    }

    #[test]
    fn mixed_int_float_infix_is_a_recorded_semantic_error() {
        let (_ir, errors) =
            compile("func main() @ int { var a : int = 1; var b : float = 2.0; var c : int = a + b; ret 0; }");
        assert!(errors.iter().any(|e| e.contains("type mismatch")));
    }

    #[test]
    fn redeclaring_a_variable_reuses_the_existing_slot() {
        let (ir, errors) = compile("func main() @ int { var x : int = 1; var x : int = 2; ret x; }");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(ir.matches("alloca i32").count(), 1);
        assert_eq!(ir.matches("store i32").count(), 2);
    }

    #[test]
    fn recursive_function_can_call_itself() {
        let (ir, errors) = compile(
            "func fact(n: int) @ int { if n == 0 { ret 1; } else { ret n * fact(n - 1); } ret 0; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(ir.contains("call i32 @\"fact\""));
    }
}
