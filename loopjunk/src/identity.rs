//! Generation of textual polynomial identities over junk variables.
//!
//! Every identity is an instance of the expansion
//! `(a + b + ...)^2 = a^2 + b^2 + ... + 2ab + 2ac + ...` over a small
//! random subset of the junk variables, with each cross-term coefficient
//! split into signed pieces that are spread over both sides. Equality is
//! by construction; nothing is evaluated here.

use itertools::Itertools as _;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    Symbol,
    split::{SignedPartition, SplitConfig, split_coefficient},
};

/// The cross-term coefficient of a squared sum.
const CROSS_TERM_COEFFICIENT: i64 = 2;

/// Settings for identity generation.
/// Use `IdentityConfig::default()` to get a reasonable default.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// The fewest junk variables drawn into one identity.
    ///
    /// The default is 2, which is also the hard minimum: with a single
    /// variable there is no cross term to spread split pieces over.
    pub min_vars: usize,

    /// The most junk variables drawn into one identity (inclusive).
    /// Draws beyond the number of available junk variables are clamped.
    ///
    /// The default is 3.
    pub max_vars: usize,

    /// How cross-term coefficients are cut into pieces.
    pub split: SplitConfig,
}

impl Default for IdentityConfig {
    /// Returns a reasonable default configuration.
    fn default() -> Self {
        Self { min_vars: 2, max_vars: 3, split: SplitConfig::default() }
    }
}

/// A pair of program-text fragments that are equal as integer arithmetic
/// for every value of the variables occurring in them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialIdentity {
    pub lhs: String,
    pub rhs: String,
}

/// Generates a random identity over a subset of `junk`.
///
/// One side carries the sum-of-squares form `(a*a + b*b)`, the other the
/// squared sum `(a + b)*(a + b)`; a coin flip decides which is which. The
/// cross terms of the expansion are distributed over both sides through
/// [`split_coefficient`], whose skew puts exactly
/// [`CROSS_TERM_COEFFICIENT`] more of every cross term on the
/// sum-of-squares side.
///
/// Panics if fewer than two junk variables are available or the
/// subset-size range in `cfg` is unusable.
pub fn generate<Rand: Rng>(
    junk: &[Symbol],
    cfg: &IdentityConfig,
    rng: &mut Rand,
) -> PolynomialIdentity {
    assert!(
        junk.len() >= 2,
        "Need at least two junk variables for an identity."
    );
    assert!(
        2 <= cfg.min_vars && cfg.min_vars <= cfg.max_vars,
        "The identity needs at least two variables."
    );

    let count = rng.random_range(cfg.min_vars..=cfg.max_vars).min(junk.len());
    let chosen: Vec<Symbol> =
        junk.choose_multiple(rng, count).copied().collect();

    let sum_vars = chosen.iter().join(" + ");
    let squared_sum = format!("({sum_vars})*({sum_vars})");
    let sum_of_squares =
        format!("({})", chosen.iter().map(|v| format!("{v}*{v}")).join(" + "));

    let mut squares_cross = Vec::new();
    let mut expanded_cross = Vec::new();
    for (a, b) in chosen.iter().tuple_combinations::<(_, _)>() {
        let SignedPartition { l1, l2 } =
            split_coefficient(CROSS_TERM_COEFFICIENT, &cfg.split, rng);
        squares_cross.extend(l1.into_iter().map(|c| format!("{c}*{a}*{b}")));
        expanded_cross.extend(l2.into_iter().map(|c| format!("{c}*{a}*{b}")));
    }

    let squares_side =
        format!("{sum_of_squares} + ({})", squares_cross.iter().join(" + "));
    let expanded_side =
        format!("{squared_sum} + ({})", expanded_cross.iter().join(" + "));

    // Which side of the statement each form ends up on is itself random.
    if rng.random() {
        PolynomialIdentity { lhs: squares_side, rhs: expanded_side }
    } else {
        PolynomialIdentity { lhs: expanded_side, rhs: squares_side }
    }
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng as _, rngs::StdRng};

    use super::*;
    use crate::{expr::Expr, valuation::Valuation};

    fn junk_pool(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|&n| Symbol::from(n)).collect()
    }

    /// Parses both sides and compares them under random valuations.
    fn assert_identity_holds(id: &PolynomialIdentity, seed: u64) {
        let lhs = Expr::from_string(&id.lhs).unwrap();
        let rhs = Expr::from_string(&id.rhs).unwrap();
        for round in 0..20 {
            let mut v = Valuation::random_seeded(seed ^ round);
            assert_eq!(
                lhs.eval(&mut v),
                rhs.eval(&mut v),
                "lhs: {}, rhs: {}",
                id.lhs,
                id.rhs
            );
        }
    }

    #[test]
    fn identities_hold_for_two_vars() {
        let rng = &mut StdRng::seed_from_u64(0);
        let junk = junk_pool(&["g1", "g2"]);
        let cfg = IdentityConfig { max_vars: 2, ..IdentityConfig::default() };
        for seed in 0..200 {
            let id = generate(&junk, &cfg, rng);
            assert_identity_holds(&id, seed);
        }
    }

    #[test]
    fn identities_hold_for_three_vars() {
        let rng = &mut StdRng::seed_from_u64(1);
        let junk = junk_pool(&["g1", "g2", "g3"]);
        let cfg = IdentityConfig {
            min_vars: 3,
            max_vars: 3,
            ..IdentityConfig::default()
        };
        for seed in 0..200 {
            let id = generate(&junk, &cfg, rng);
            assert_identity_holds(&id, seed);
        }
    }

    #[test]
    fn identities_hold_for_mixed_draws() {
        let rng = &mut StdRng::seed_from_u64(2);
        let junk = junk_pool(&["g1", "g2", "g3", "g4", "g5"]);
        let cfg = IdentityConfig::default();
        for seed in 0..200 {
            let id = generate(&junk, &cfg, rng);
            assert_identity_holds(&id, seed);
        }
    }

    #[test]
    fn oversized_draw_is_clamped() {
        // A pool of two with a subset-size draw of up to three must not
        // fail; it can only ever use the two available variables.
        let rng = &mut StdRng::seed_from_u64(3);
        let junk = junk_pool(&["g8", "g9"]);
        let cfg = IdentityConfig::default();
        for seed in 0..50 {
            let id = generate(&junk, &cfg, rng);
            assert_identity_holds(&id, seed);
        }
    }

    #[test]
    #[should_panic]
    fn single_junk_variable_panics() {
        let rng = &mut StdRng::seed_from_u64(4);
        generate(&junk_pool(&["g1"]), &IdentityConfig::default(), rng);
    }
}
