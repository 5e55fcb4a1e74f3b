//! Crate-level error type.
//!
//! The core phases (lexer/parser/emitter) never throw — they accumulate
//! human-readable strings in their own error list and let the driver decide
//! what to do at each phase boundary. `CompileError` is where those lists
//! get turned into something the driver binary can propagate with `?` and
//! print with `{}`, bubbling errors through `anyhow` rather than unwrapping.

use std::fmt;

#[derive(Debug)]
pub enum CompileError {
    /// The parser (or lexer, surfaced through the parser) recorded one or
    /// more structural errors.
    Syntax(Vec<String>),
    /// The emitter recorded one or more semantic errors.
    Semantic(Vec<String>),
    /// The collaborator IR builder rejected the emitted module.
    Verification(String),
    /// JIT lookup or execution of `main` failed.
    Jit(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(errors) => {
                writeln!(f, "syntax errors:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
            CompileError::Semantic(errors) => {
                writeln!(f, "semantic errors:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
            CompileError::Verification(msg) => write!(f, "IR verification failed: {msg}"),
            CompileError::Jit(msg) => write!(f, "JIT execution failed: {msg}"),
        }
    }
}

impl std::error::Error for CompileError {}
