//! Stack growth for the recursive passes of the compiler.
//!
//! Expression parsing and constant evaluation recurse once per nesting
//! level. Deeply nested input (long operator chains, nested initializer
//! lists) would otherwise overflow the native stack. Wrap such recursion in
//! [`ensure_sufficient_stack`].
//!
//! On wasm the guard is a plain call.

/// Remaining stack below which we grow (100KB).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[cfg(not(target_arch = "wasm32"))]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
    }

    #[test]
    fn test_deep_recursion_completes() {
        assert_eq!(depth(100_000), 100_000);
    }

    #[test]
    fn test_returns_value() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }
}
