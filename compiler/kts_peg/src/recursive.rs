//! Forward references for self- and mutually-recursive rules.
//!
//! A [`Recursive`] handle is declared before its rule exists. Rules built
//! from [`Recursive::rule`] look the target up at invocation time, so a
//! definition supplied later is visible to everything built earlier.
//!
//! Results are memoized on the cursor per rule and token position
//! (packrat parsing), so backtracking over the same input costs a lookup
//! rather than a re-parse.
//!
//! The cell only holds a weak reference to the defined rule. The strong
//! reference lives in [`Definitions`], which the grammar owns; rule graphs
//! therefore contain no reference cycles and are freed with the grammar.

use std::any::Any;
use std::sync::{Arc, OnceLock, Weak};

use kts_stack::ensure_sufficient_stack;

use crate::result::Reason;
use crate::rule::RuleFn;
use crate::{Rule, TokenSource};

type Cell<S, T> = OnceLock<Weak<RuleFn<S, T>>>;

/// A rule that can be referenced before it is defined.
///
/// Not `Clone`: [`Definitions::define`] consumes the handle, so each
/// reference is resolved exactly once.
pub struct Recursive<S: TokenSource + 'static, T: 'static> {
    name: &'static str,
    cell: Arc<Cell<S, T>>,
}

impl<S: TokenSource + 'static, T: Clone + 'static> Recursive<S, T> {
    /// Declare an undefined rule named `name`.
    pub fn declare(name: &'static str) -> Self {
        Recursive {
            name,
            cell: Arc::new(OnceLock::new()),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A rule that forwards to the eventual definition.
    ///
    /// Each invocation counts as one recursion level on the cursor; past
    /// the cursor's limit it fails with [`Reason::DepthLimit`] instead of
    /// recursing. A repeated invocation at the same position and cursor
    /// mode returns the memoized result.
    ///
    /// # Panics
    /// Invoking the returned rule before the handle is defined, or after
    /// the owning [`Definitions`] is dropped, panics.
    pub fn rule(&self) -> Rule<S, T> {
        let name = self.name;
        let cell = Arc::clone(&self.cell);
        let id = Arc::as_ptr(&cell).cast::<()>() as usize;
        Rule::new(move |cursor| {
            let key = cursor.memo_key(id);
            if let Some(result) = cursor.recall(&key) {
                return result;
            }
            let Some(target) = cell.get().and_then(Weak::upgrade) else {
                panic!("recursive rule `{name}` is not defined (or its definitions were dropped)");
            };
            if !cursor.enter() {
                return cursor.fail(Reason::DepthLimit {
                    limit: cursor.max_depth(),
                });
            }
            let result = ensure_sufficient_stack(|| target(cursor));
            cursor.exit();
            cursor.memoize(key, &result);
            result
        })
    }
}

/// Owner of every rule defined through a [`Recursive`] handle.
#[derive(Default)]
pub struct Definitions {
    rules: Vec<Box<dyn Any + Send + Sync>>,
    declared: Vec<(&'static str, Arc<dyn Resolved>)>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handle and remember it for [`unresolved`](Self::unresolved).
    pub fn declare<S: TokenSource + 'static, T: Clone + 'static>(
        &mut self,
        name: &'static str,
    ) -> Recursive<S, T> {
        let handle = Recursive::declare(name);
        self.declared
            .push((name, Arc::clone(&handle.cell) as Arc<dyn Resolved>));
        handle
    }

    /// Resolve `handle` to `rule` and keep `rule` alive.
    pub fn define<S: TokenSource + 'static, T: Clone + 'static>(
        &mut self,
        handle: Recursive<S, T>,
        rule: Rule<S, T>,
    ) {
        let fresh = handle.cell.set(Arc::downgrade(&rule.f)).is_ok();
        debug_assert!(fresh, "recursive rule `{}` defined twice", handle.name);
        self.rules.push(Box::new(rule));
    }

    /// Names of handles declared here but never defined.
    pub fn unresolved(&self) -> Vec<&'static str> {
        self.declared
            .iter()
            .filter(|(_, cell)| !cell.is_resolved())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Number of rules defined.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for Definitions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definitions")
            .field("rules", &self.rules.len())
            .field("unresolved", &self.unresolved())
            .finish()
    }
}

trait Resolved: Send + Sync {
    fn is_resolved(&self) -> bool;
}

impl<S: TokenSource + 'static, T: 'static> Resolved for Cell<S, T> {
    fn is_resolved(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests;
