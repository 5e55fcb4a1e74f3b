//! Lexically scoped symbol table.
//!
//! Frames form an owned chain: each frame holds a reference back to its
//! parent, and a `child()` call produces a brand new frame pointing at the
//! caller, rather than mutating a single shared scope stack in place, since
//! the function-call semantics here need a `child()` the emitter can hand
//! off and later discard independently of whatever the *current*
//! environment handle happens to be at that moment.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The three declared types this language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Bool,
}

#[derive(Clone)]
pub struct Binding<H> {
    pub handle: H,
    pub ty: Ty,
}

struct Frame<H> {
    bindings: HashMap<String, Binding<H>>,
    parent: Option<Environment<H>>,
}

/// A handle to one frame in the chain. Cheap to clone; clones share the
/// same underlying frame.
#[derive(Clone)]
pub struct Environment<H>(Rc<RefCell<Frame<H>>>);

impl<H: Clone> Environment<H> {
    pub fn root() -> Self {
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    /// Creates a new frame with `self` as its parent.
    pub fn child(&self) -> Self {
        Environment(Rc::new(RefCell::new(Frame {
            bindings: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Inserts or overwrites `name` in the current frame only. No shadowing
    /// check is enforced; last write wins within a frame.
    pub fn define(&self, name: impl Into<String>, handle: H, ty: Ty) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.into(), Binding { handle, ty });
    }

    /// Walks the current frame, then its parent chain, returning the first
    /// match.
    pub fn lookup(&self, name: &str) -> Option<Binding<H>> {
        let frame = self.0.borrow();
        if let Some(binding) = frame.bindings.get(name) {
            return Some(binding.clone());
        }
        match &frame.parent {
            Some(parent) => parent.lookup(name),
            None => None,
        }
    }
}

impl<H: Clone> Default for Environment<H> {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_binding_in_current_frame() {
        let env: Environment<i32> = Environment::root();
        env.define("x", 1, Ty::Int);
        assert_eq!(env.lookup("x").map(|b| b.handle), Some(1));
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let root: Environment<i32> = Environment::root();
        root.define("x", 1, Ty::Int);
        let child = root.child();
        assert_eq!(child.lookup("x").map(|b| b.handle), Some(1));
    }

    #[test]
    fn define_in_child_does_not_leak_to_parent() {
        let root: Environment<i32> = Environment::root();
        let child = root.child();
        child.define("y", 2, Ty::Int);
        assert!(root.lookup("y").is_none());
        assert_eq!(child.lookup("y").map(|b| b.handle), Some(2));
    }

    #[test]
    fn redefine_in_same_frame_overwrites() {
        let env: Environment<i32> = Environment::root();
        env.define("x", 1, Ty::Int);
        env.define("x", 2, Ty::Int);
        assert_eq!(env.lookup("x").map(|b| b.handle), Some(2));
    }

    #[test]
    fn lookup_missing_name_returns_none() {
        let env: Environment<i32> = Environment::root();
        assert!(env.lookup("missing").is_none());
    }
}
