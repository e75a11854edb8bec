/// Source of uniform randomness for card sampling.
///
/// Callers pass one in explicitly so a review session can be replayed from a seed.
pub trait Random {
    /// Returns a value in `[0, 1)`.
    fn f64(&mut self) -> f64;
}

impl Random for fastrand::Rng {
    fn f64(&mut self) -> f64 {
        fastrand::Rng::f64(self)
    }
}

impl<R: Random + ?Sized> Random for &mut R {
    fn f64(&mut self) -> f64 {
        (**self).f64()
    }
}

/// Creates a source seeded from `seed`, or from the OS when no seed is given.
pub fn rng(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}
