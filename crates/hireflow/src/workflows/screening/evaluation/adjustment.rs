use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

pub const ADJUSTMENT_MIN: i32 = -2;
pub const ADJUSTMENT_MAX: i32 = 2;

const SEED_MODULUS: u64 = 1000;

/// Source of the bounded score perturbation. Implementations must return a
/// value in `ADJUSTMENT_MIN..=ADJUSTMENT_MAX` and must be a pure function of
/// the seed.
pub trait AdjustmentSource: Send + Sync {
    fn adjustment(&self, seed: u64) -> i32;
}

/// Default source: a `StdRng` seeded from the resume hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeededAdjustment;

impl AdjustmentSource for SeededAdjustment {
    fn adjustment(&self, seed: u64) -> i32 {
        let mut rng = StdRng::seed_from_u64(seed);
        rng.random_range(ADJUSTMENT_MIN..=ADJUSTMENT_MAX)
    }
}

/// Stable seed for a resume: SHA-256 of the text, first eight bytes, mod 1000.
pub fn resume_seed(resume_text: &str) -> u64 {
    let digest = Sha256::digest(resume_text.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % SEED_MODULUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_stable_and_bounded() {
        let text = "Senior Python engineer with AWS experience";
        assert_eq!(resume_seed(text), resume_seed(text));
        assert!(resume_seed(text) < SEED_MODULUS);
        assert!(resume_seed("") < SEED_MODULUS);
    }

    #[test]
    fn seeded_adjustment_stays_in_range_for_every_seed() {
        let source = SeededAdjustment;
        for seed in 0..SEED_MODULUS {
            let value = source.adjustment(seed);
            assert!(
                (ADJUSTMENT_MIN..=ADJUSTMENT_MAX).contains(&value),
                "seed {seed} produced {value}"
            );
            assert_eq!(value, source.adjustment(seed));
        }
    }

    #[test]
    fn seeded_adjustment_covers_the_whole_range() {
        let source = SeededAdjustment;
        let mut seen: Vec<i32> = (0..SEED_MODULUS).map(|seed| source.adjustment(seed)).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![-2, -1, 0, 1, 2]);
    }
}
