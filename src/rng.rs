use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Source of uniform random numbers in `[0, 1)` injected into the maze generators.
///
/// Every `rand` generator is a `RandomSource`, so tests pass a seeded `StdRng` and get
/// reproducible mazes.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        // Clamp guards against a source returning exactly 1.0
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Fair coin flip.
    fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = get_rng(Some(7));
        let mut b = get_rng(Some(7));
        let xs = (0..16).map(|_| a.next_f64()).collect::<Vec<_>>();
        let ys = (0..16).map(|_| b.next_f64()).collect::<Vec<_>>();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut rng = get_rng(Some(1));
        for len in 1..20 {
            for _ in 0..50 {
                assert!(rng.index(len) < len);
            }
        }
    }
}
