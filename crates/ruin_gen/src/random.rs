//! Random draws used by the generator.
//!
//! Every draw goes through a caller supplied [`RngCore`] and consumes exactly one
//! `u32`, so a run is reproducible from the seed and the call order alone.
use rand::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float in `[min, max]`. Returns `min` when the range is empty.
#[inline]
pub fn range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rand01(rng) * (max - min)
}

/// Uniform integer in `[min, max]`, both ends inclusive.
///
/// Returns `min` without consuming randomness when `max <= min`.
pub fn range_i32(rng: &mut dyn RngCore, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    let span = (max as i64 - min as i64 + 1) as u64;
    let offset = (rng.next_u32() as u64 * span) >> 32;
    (min as i64 + offset as i64) as i32
}

/// Uniform index in `[0, len)`. `len` must be non-zero.
#[inline]
pub fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "index() needs a non-empty range");
    ((rng.next_u32() as u64 * len as u64) >> 32) as usize
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    pub(crate) struct FixedRng {
        pub value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn rand01_stays_below_one() {
        let mut rng = FixedRng { value: u32::MAX };
        let v = rand01(&mut rng);
        assert!((0.0..=1.0).contains(&v));
        let mut zero = FixedRng { value: 0 };
        assert_eq!(rand01(&mut zero), 0.0);
    }

    #[test]
    fn range_i32_is_inclusive_on_both_ends() {
        let mut low = FixedRng { value: 0 };
        assert_eq!(range_i32(&mut low, 3, 7), 3);
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(range_i32(&mut high, 3, 7), 7);
    }

    #[test]
    fn range_i32_empty_range_returns_min() {
        let mut rng = FixedRng { value: 12345 };
        assert_eq!(range_i32(&mut rng, 5, 5), 5);
        assert_eq!(range_i32(&mut rng, 5, 2), 5);
    }

    #[test]
    fn index_covers_whole_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[index(&mut rng, 4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn range_f32_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let v = range_f32(&mut rng, 0.25, 0.75);
            assert!((0.25..=0.75).contains(&v));
        }
    }
}
