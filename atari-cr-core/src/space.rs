//! Action and observation spaces with seeded samplers.
//!
//! Every space owns its random generator. Seeding a space with
//! [`Space::seed`] makes the sequence of samples reproducible, independent
//! of the global random state and of the environment dynamics.
use rand::{
    distributions::uniform::SampleUniform,
    rngs::SmallRng,
    Rng, SeedableRng,
};
use std::fmt::Debug;

/// A set of values with a random sampler.
pub trait Space {
    /// Element of the space.
    type Item;

    /// Draws a random element of the space.
    fn sample(&mut self) -> Self::Item;

    /// Reseeds the sampler.
    fn seed(&mut self, seed: u64);

    /// Returns `true` if `x` is an element of the space.
    fn contains(&self, x: &Self::Item) -> bool;
}

/// The set `{0, 1, ..., n - 1}`.
#[derive(Debug, Clone)]
pub struct Discrete {
    n: usize,
    rng: SmallRng,
}

impl Discrete {
    /// Constructs a space of `n` elements. `n` must be positive.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "Discrete space must have at least one element");
        Self {
            n,
            rng: SmallRng::from_entropy(),
        }
    }

    /// The number of elements.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl Space for Discrete {
    type Item = usize;

    fn sample(&mut self) -> usize {
        self.rng.gen_range(0..self.n)
    }

    fn seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    fn contains(&self, x: &usize) -> bool {
        *x < self.n
    }
}

/// A box `[low, high]` of the given shape, bounds included.
///
/// Bounds are given per element in row-major order.
#[derive(Debug, Clone)]
pub struct BoxSpace<T> {
    low: Vec<T>,
    high: Vec<T>,
    shape: Vec<usize>,
    rng: SmallRng,
}

impl<T> BoxSpace<T>
where
    T: SampleUniform + PartialOrd + Copy + Debug,
{
    /// Constructs a box with the same bounds for all elements.
    pub fn uniform(low: T, high: T, shape: &[usize]) -> Self {
        let n = shape.iter().product();
        Self::new(vec![low; n], vec![high; n], shape)
    }

    /// Constructs a box with element-wise bounds.
    pub fn new(low: Vec<T>, high: Vec<T>, shape: &[usize]) -> Self {
        let n: usize = shape.iter().product();
        assert_eq!(low.len(), n, "low must have {} elements", n);
        assert_eq!(high.len(), n, "high must have {} elements", n);
        assert!(
            low.iter().zip(high.iter()).all(|(l, h)| l <= h),
            "low must not exceed high: {:?} > {:?}",
            low,
            high
        );
        Self {
            low,
            high,
            shape: shape.to_vec(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Shape of the box.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Lower bounds.
    pub fn low(&self) -> &[T] {
        &self.low
    }

    /// Upper bounds.
    pub fn high(&self) -> &[T] {
        &self.high
    }
}

impl<T> Space for BoxSpace<T>
where
    T: SampleUniform + PartialOrd + Copy + Debug,
{
    type Item = Vec<T>;

    fn sample(&mut self) -> Vec<T> {
        let rng = &mut self.rng;
        self.low
            .iter()
            .zip(self.high.iter())
            .map(|(&l, &h)| rng.gen_range(l..=h))
            .collect()
    }

    fn seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    fn contains(&self, x: &Vec<T>) -> bool {
        x.len() == self.low.len()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (l, h))| l <= v && v <= h)
    }
}

/// Derives seeds of `n` sub-spaces from a single seed.
///
/// Used by composite spaces so that seeding the composite seeds every part
/// deterministically and differently.
pub fn derive_seeds(seed: u64, n: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}
