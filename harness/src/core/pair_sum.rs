//! Pair searches over an integer sequence.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Positions `(i, j)`, `i < j`, of two elements summing to `target`.
///
/// Scans left to right and returns the first pair whose second element is
/// reached; for repeated values the most recent position wins as the
/// partner. `None` when no pair exists.
pub fn two_sum(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(nums.len());
    for (index, &value) in nums.iter().enumerate() {
        if let Some(need) = target.checked_sub(value)
            && let Some(&partner) = seen.get(&need)
        {
            return Some((partner, index));
        }
        seen.insert(value, index);
    }
    None
}

/// Two-pointer pair search on an ascending sequence.
///
/// Walks inward from both ends and returns the first `(left, right)` whose
/// elements sum to `target`. Unsorted input gives no guarantees beyond
/// termination.
pub fn find_optimal_pair(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    if nums.len() < 2 {
        return None;
    }
    let (mut left, mut right) = (0, nums.len() - 1);
    while left < right {
        // i128 keeps the sum exact at the i64 extremes.
        let sum = i128::from(nums[left]) + i128::from(nums[right]);
        match sum.cmp(&i128::from(target)) {
            Ordering::Equal => return Some((left, right)),
            Ordering::Less => left += 1,
            Ordering::Greater => right -= 1,
        }
    }
    None
}
