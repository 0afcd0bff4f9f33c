//! Decimal digit palindromes.

/// Whether the decimal digits of `x` read the same in both directions.
///
/// Negative numbers never are: `-121` reversed is `121-`.
pub fn is_palindrome(x: i64) -> bool {
    if x < 0 {
        return false;
    }
    let original = x.unsigned_abs();
    let mut remaining = original;
    // At most 19 digits, so the reversal always fits in a u64.
    let mut reversed: u64 = 0;
    while remaining > 0 {
        reversed = reversed * 10 + remaining % 10;
        remaining /= 10;
    }
    reversed == original
}
