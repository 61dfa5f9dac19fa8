//! Variable bindings used when evaluating program-text fragments.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::Symbol;

/// Stores values that should be substituted into variables.
#[derive(Debug)]
pub struct Valuation {
    /// The pairs are stored as a vector because a fragment only ever
    /// mentions a handful of variables.
    vals: Vec<(Symbol, i128)>,

    /// What to do when the value of a variable is requested
    /// but not found in the valuation.
    missing: MissingValue,
}

impl Valuation {
    /// An empty valuation that will panic when any variable is requested.
    pub fn empty() -> Self {
        Self::from_vec_panic(Vec::new())
    }

    /// A valuation that returns zero for any unknown variable.
    pub fn zero() -> Self {
        Self { vals: Vec::new(), missing: MissingValue::Zero }
    }

    /// A valuation that returns a random value for any unknown variable.
    /// The value is stored, so later uses of the same variable see the
    /// same value.
    pub fn random_seeded(seed: u64) -> Self {
        let rng = Box::new(StdRng::seed_from_u64(seed));
        Self { vals: Vec::new(), missing: MissingValue::Random(rng) }
    }

    /// Initializes a valuation from a list of pairs of variables and
    /// values. If a variable is requested that is not in the list, it will
    /// panic.
    pub fn from_vec_panic(vals: Vec<(Symbol, i128)>) -> Self {
        Self { vals, missing: MissingValue::Panic }
    }

    /// Returns the value of a variable.
    pub fn value(&mut self, name: Symbol) -> i128 {
        if let Some((_, v)) = self.vals.iter().find(|(n, _)| *n == name) {
            return *v;
        }

        let new_val = match &mut self.missing {
            MissingValue::Panic => {
                panic!("Variable {name} not found in valuation.")
            },
            MissingValue::Zero => 0,
            // Small values keep products of a few terms far away from the
            // edges of i128.
            MissingValue::Random(rng) => rng.random_range(-1000..=1000),
        };

        self.vals.push((name, new_val));
        new_val
    }

    /// Sets the value of a variable.
    pub fn set_value(&mut self, name: Symbol, value: i128) {
        match self.vals.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.vals.push((name, value)),
        }
    }

    /// Returns the values of all the seen variables.
    pub fn values(&self) -> &[(Symbol, i128)] {
        &self.vals
    }
}

/// What should be done for a variable that is not found in the valuation.
enum MissingValue {
    /// Panic.
    Panic,

    /// Return zero.
    Zero,

    /// Return a random value. Boxed because the generator is large
    /// compared to the rest of the valuation.
    Random(Box<StdRng>),
}

impl std::fmt::Debug for MissingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingValue::Panic => write!(f, "Panic"),
            MissingValue::Zero => write!(f, "Zero"),
            MissingValue::Random(_) => write!(f, "Random"),
        }
    }
}

#[test]
fn random_values_are_consistent() {
    let x = Symbol::from("x");
    let mut v = Valuation::random_seeded(0);
    let first = v.value(x);
    assert_eq!(v.value(x), first);
    assert_eq!(v.values().len(), 1);
}
