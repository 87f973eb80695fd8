use super::*;

#[test]
fn test_shallow_recursion() {
    fn nesting(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting(n - 1) + 1 })
    }

    assert_eq!(nesting(10), 10);
}

#[test]
fn test_deep_recursion() {
    // Would overflow the 2MB test-thread stack without growth.
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn test_works_with_result_type() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}
