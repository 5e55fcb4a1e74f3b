//! Textual post-pass over already-emitted IR.
//!
//! This is deliberately independent of the core pipeline — it operates on
//! `Module::print_to_string()` output as plain text via regular
//! expressions, not on the in-memory IR. It is not invoked by
//! `compile_program`; the driver calls it only when asked to.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"call\s+\w+\s+@"?(\w+)"?"#).unwrap());
static DEFINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*define\s+\w+\s+@"?(\w+)"?\("#).unwrap());
static STORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*store\s+i32\s+\S+,\s*i32\*?\s*(%"?[\w.]+"?)"#).unwrap());
static LOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*%"?[\w.]+"?\s*=\s*load\s+i32,\s*i32\*?\s*(%"?[\w.]+"?)"#).unwrap());

fn find_called_functions(ir: &str) -> HashSet<String> {
    CALL_RE.captures_iter(ir).map(|c| c[1].to_string()).collect()
}

/// Strips the body of every `define`d function that is neither `main` nor
/// referenced by any `call` instruction in the module. `main` is always
/// kept since it is the JIT/driver's entry point even when nothing in the
/// module calls it.
pub fn optimize_unused_functions(ir: &str) -> String {
    let called = find_called_functions(ir);

    let mut in_function = false;
    let mut current_function = String::new();
    let mut out = Vec::new();

    for line in ir.lines() {
        if let Some(caps) = DEFINE_RE.captures(line) {
            current_function = caps[1].to_string();
            in_function = true;
        }

        if in_function && current_function != "main" && !called.contains(&current_function) {
            if line.trim() == "}" {
                in_function = false;
            }
            continue;
        }

        out.push(line);
    }

    out.join("\n")
}

/// Holds each `store` back until the matching `load` from the same slot is
/// seen, then re-emits the store immediately ahead of it, collapsing out
/// any intervening lines that didn't touch that slot. A `store` with no
/// later `load` of the same slot is held forever and never emitted at
/// all — a store-to-nothing is dead and disappears (see DESIGN.md).
pub fn optimize_variable_assignments(ir: &str) -> String {
    let mut last_assignment: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();

    for line in ir.lines() {
        if let Some(caps) = STORE_RE.captures(line) {
            let var_name = caps[1].to_string();
            last_assignment.insert(var_name, line.to_string());
            continue;
        }

        if let Some(caps) = LOAD_RE.captures(line) {
            let var_name = caps[1].to_string();
            if let Some(stored_line) = last_assignment.remove(&var_name) {
                out.push(stored_line);
            }
        }

        out.push(line.to_string());
    }

    out.join("\n")
}

/// Runs both passes in sequence: `optimize_unused_functions` then
/// `optimize_variable_assignments`.
pub fn optimize(ir: &str) -> String {
    let ir = optimize_unused_functions(ir);
    optimize_variable_assignments(&ir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unreferenced_function_body_keeps_main() {
        let ir = concat!(
            "define i32 @\"helper\"() {\n",
            "helper_entry:\n",
            "  ret i32 0\n",
            "}\n",
            "define i32 @\"main\"() {\n",
            "main_entry:\n",
            "  ret i32 0\n",
            "}\n",
        );
        let optimized = optimize_unused_functions(ir);
        assert!(!optimized.contains("helper_entry"));
        assert!(optimized.contains("main_entry"));
    }

    #[test]
    fn keeps_called_function_body() {
        let ir = concat!(
            "define i32 @\"add\"() {\n",
            "add_entry:\n",
            "  ret i32 0\n",
            "}\n",
            "define i32 @\"main\"() {\n",
            "main_entry:\n",
            "  %1 = call i32 @\"add\"()\n",
            "  ret i32 %1\n",
            "}\n",
        );
        let optimized = optimize_unused_functions(ir);
        assert!(optimized.contains("add_entry"));
    }

    #[test]
    fn collapses_redundant_store_then_load() {
        let ir = concat!(
            "  store i32 5, i32* %\"x.1\"\n",
            "  %\"y.1\" = load i32, i32* %\"x.1\"\n",
        );
        let optimized = optimize_variable_assignments(ir);
        assert_eq!(optimized.matches("store").count(), 0);
        assert!(optimized.contains("load"));
    }

    #[test]
    fn drops_a_store_with_no_following_load() {
        let ir = "  store i32 5, i32* %\"x.1\"\n  ret void";
        let optimized = optimize_variable_assignments(ir);
        assert_eq!(optimized.matches("store").count(), 0);
        assert!(optimized.contains("ret void"));
    }

    #[test]
    fn dead_function_elimination_is_idempotent() {
        let ir = concat!(
            "define i32 @\"helper\"() {\n",
            "helper_entry:\n",
            "  ret i32 0\n",
            "}\n",
            "define i32 @\"main\"() {\n",
            "main_entry:\n",
            "  ret i32 0\n",
            "}\n",
        );
        let once = optimize_unused_functions(ir);
        let twice = optimize_unused_functions(&once);
        assert_eq!(once, twice);
    }
}
