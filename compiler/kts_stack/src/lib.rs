//! Stack safety for recursive rule invocation.
//!
//! Grammar recursion mirrors input nesting (parentheses, lambdas, nested
//! annotation arguments). The parser bounds nesting with an explicit depth
//! limit; this crate makes sure the native stack can hold everything up to
//! that limit by growing it on demand.
//!
//! - **Native targets**: `stacker` grows the stack when it runs low.
//! - **WASM targets**: no-op passthrough.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// ```text
/// fn call_rule(&self, cursor: &mut Cursor<'_, S>) -> ParseResult<T> {
///     ensure_sufficient_stack(|| (self.f)(cursor))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
