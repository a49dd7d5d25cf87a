//! Secret number draws.
//!
//! Numbers are drawn from the complement of those already handed out, so a
//! round can never assign the same number twice.

use rand::Rng;
use rand::rngs::StdRng;

/// Smallest secret number.
pub const LOWEST: u32 = 1;
/// Largest secret number.
pub const HIGHEST: u32 = 10;

/// Numbers in `LOWEST..=HIGHEST` not yet in `assigned`, ascending.
pub fn available_numbers(assigned: &[u32]) -> Vec<u32> {
    (LOWEST..=HIGHEST)
        .filter(|n| !assigned.contains(n))
        .collect()
}

/// Draw uniformly from the numbers still available. `None` once all ten are
/// taken.
pub fn draw_number(assigned: &[u32], rng: &mut StdRng) -> Option<u32> {
    let pool = available_numbers(assigned);
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}
