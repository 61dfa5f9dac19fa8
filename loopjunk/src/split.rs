//! Splitting a cross-term coefficient into signed pieces.

use rand::Rng;

/// Settings for one coefficient split.
/// Use `SplitConfig::default()` to get the ranges the identity generator
/// is tuned for.
#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// The fewest pieces one split draws before zero filtering.
    ///
    /// The default is 2.
    pub min_pieces: usize,

    /// The most pieces one split draws before zero filtering (inclusive).
    ///
    /// The default is 4.
    pub max_pieces: usize,
}

impl Default for SplitConfig {
    /// Returns a reasonable default configuration.
    fn default() -> Self {
        Self { min_pieces: 2, max_pieces: 4 }
    }
}

/// Two lists of signed nonzero integers produced by [`split_coefficient`].
///
/// `l1` is the list destined for the sum-of-squares side of an identity,
/// `l2` for the squared-sum side. The sums are skewed apart:
/// `sum(l1) - sum(l2) == 2 * x1`, where `x1` is the internal draw from
/// `[1, x-1]`. For `x == 2`, the only coefficient the identity generator
/// uses, `x1` can only be 1 and the difference is exactly the cross-term
/// coefficient a squared sum produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedPartition {
    pub l1: Vec<i64>,
    pub l2: Vec<i64>,
}

/// Splits `x >= 2` into two lists of signed nonzero pieces.
///
/// The underlying partition cuts `x` into `x1 + x2` and spreads each half
/// over a few pieces whose sums are exactly `x1` and `x2`
/// (`raw_partition`). Then:
///
/// - the original `x` is appended to the first list as one extra piece,
/// - zero pieces are dropped from both lists,
/// - with probability 1/2 every piece is negated and the lists swap roles.
///
/// The appended `x` is what skews the two sums apart; see
/// [`SignedPartition`] for the resulting invariant.
///
/// Panics if `x < 2` or the piece-count range in `cfg` is unusable.
pub fn split_coefficient<Rand: Rng>(
    x: i64,
    cfg: &SplitConfig,
    rng: &mut Rand,
) -> SignedPartition {
    assert!(x >= 2, "Cannot split a coefficient smaller than 2.");
    assert!(
        2 <= cfg.min_pieces && cfg.min_pieces <= cfg.max_pieces,
        "Piece counts must allow at least one piece per list."
    );

    let n = rng.random_range(cfg.min_pieces..=cfg.max_pieces);
    let n1 = rng.random_range(1..n);
    let n2 = n - n1;

    let x1 = rng.random_range(1..x);
    let x2 = x - x1;

    let (mut l1, l2) = raw_partition(n1, n2, x1, x2, rng);

    l1.push(x);
    let mut l1: Vec<i64> = l1.into_iter().filter(|&p| p != 0).collect();
    let mut l2: Vec<i64> = l2.into_iter().filter(|&p| p != 0).collect();

    if rng.random() {
        for p in l1.iter_mut().chain(l2.iter_mut()) {
            *p = -*p;
        }
        std::mem::swap(&mut l1, &mut l2);
    }

    SignedPartition { l1, l2 }
}

/// The sum-preserving core of the split: `n1` pieces summing to exactly
/// `x1` and `n2` pieces summing to exactly `x2`. Pieces are drawn from
/// `[1, half]` and the last piece of each list is corrected by the
/// residual, so it can come out zero or negative; the caller filters
/// zeros.
fn raw_partition<Rand: Rng>(
    n1: usize,
    n2: usize,
    x1: i64,
    x2: i64,
    rng: &mut Rand,
) -> (Vec<i64>, Vec<i64>) {
    fn draw<Rand: Rng>(count: usize, half: i64, rng: &mut Rand) -> Vec<i64> {
        let mut l: Vec<i64> =
            (0..count).map(|_| rng.random_range(1..=half)).collect();
        let diff = half - l.iter().sum::<i64>();
        if diff != 0 {
            *l.last_mut().unwrap() += diff;
        }

        l
    }

    (draw(n1, x1, rng), draw(n2, x2, rng))
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn raw_partition_sums() {
        let rng = &mut StdRng::seed_from_u64(0);
        for _ in 0..500 {
            let x = rng.random_range(2..=10i64);
            let x1 = rng.random_range(1..x);
            let x2 = x - x1;
            let n1 = rng.random_range(1..=3usize);
            let n2 = rng.random_range(1..=3usize);

            let (l1, l2) = raw_partition(n1, n2, x1, x2, rng);
            assert_eq!(l1.iter().sum::<i64>(), x1);
            assert_eq!(l2.iter().sum::<i64>(), x2);
            assert_eq!(
                l1.iter().sum::<i64>() + l2.iter().sum::<i64>(),
                x
            );
        }
    }

    #[test]
    fn split_difference_for_two() {
        let rng = &mut StdRng::seed_from_u64(0);
        let cfg = SplitConfig::default();
        for _ in 0..500 {
            let p = split_coefficient(2, &cfg, rng);
            assert_eq!(
                p.l1.iter().sum::<i64>() - p.l2.iter().sum::<i64>(),
                2,
                "{p:?}"
            );
        }
    }

    #[test]
    fn split_pieces_are_nonzero() {
        let rng = &mut StdRng::seed_from_u64(1);
        let cfg = SplitConfig::default();
        for _ in 0..500 {
            let x = rng.random_range(2..=8i64);
            let p = split_coefficient(x, &cfg, rng);
            assert!(!p.l1.is_empty());
            assert!(p.l1.iter().chain(&p.l2).all(|&c| c != 0), "{p:?}");

            // The skew is always twice the internal x1 draw.
            let diff = p.l1.iter().sum::<i64>() - p.l2.iter().sum::<i64>();
            assert!(diff % 2 == 0 && (2..=2 * (x - 1)).contains(&diff), "{p:?}");
        }
    }
}
