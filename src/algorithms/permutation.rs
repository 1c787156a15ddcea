// Lexicographic permutation ranking over input positions

/// `n!`, or None when it does not fit in usize
pub fn factorial(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, i| acc.checked_mul(i))
}

/// Writes the `rank`-th permutation of `0..k` in lexicographic order into `out`
///
/// Ranks run from `0` to `k! - 1`; rank 0 is the identity order. Uses the
/// factorial number system so no permutation list is ever materialized.
pub fn nth_permutation(k: usize, mut rank: usize, out: &mut Vec<usize>) {
    out.clear();
    let mut pool: Vec<usize> = (0..k).collect();

    for remaining in (0..k).rev() {
        let block = factorial(remaining).unwrap_or(usize::MAX);
        let index = (rank / block).min(pool.len() - 1);
        rank %= block;
        out.push(pool.remove(index));
    }
}
