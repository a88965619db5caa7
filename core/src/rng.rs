//! XorShift128+ generator
//!
//! The generator whose two state words the codec carries. Seeding a single
//! word runs it through the MurmurHash3 finalizer twice so that nearby seeds
//! produce unrelated states.

use crate::state::GeneratorState;
use rand::{RngCore, SeedableRng};

/// Scale factor turning 53 random bits into a double in `[0, 1)`
const NORM_DOUBLE: f64 = 1.0 / (1u64 << 53) as f64;

/// MurmurHash3 64-bit finalizer
#[inline]
pub fn murmur3_fmix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

/// XorShift128+ pseudo-random generator.
///
/// Not cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xs128Rng {
    state0: u64,
    state1: u64,
}

impl Xs128Rng {
    /// Restore a generator from previously captured state words
    pub const fn from_state(state: GeneratorState) -> Self {
        Self {
            state0: state.state0,
            state1: state.state1,
        }
    }

    /// Current state words
    pub const fn state(&self) -> GeneratorState {
        GeneratorState::new(self.state0, self.state1)
    }

    /// Replace both state words
    pub fn set_state(&mut self, state: GeneratorState) {
        self.state0 = state.state0;
        self.state1 = state.state1;
    }

    /// Next 64 random bits
    #[inline]
    pub fn next_word(&mut self) -> u64 {
        let mut s1 = self.state0;
        let s0 = self.state1;
        self.state0 = s0;
        s1 ^= s1 << 23;
        self.state1 = s1 ^ s0 ^ (s1 >> 17) ^ (s0 >> 26);
        self.state1.wrapping_add(s0)
    }

    /// Uniform double in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        (self.next_word() >> 11) as f64 * NORM_DOUBLE
    }

    /// True when the top bit of the next word is set
    pub fn next_bool(&mut self) -> bool {
        (self.next_word() as i64) < 0
    }

    /// Uniform value in `[0, bound)`; returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let n = bound as u64;
        loop {
            let bits = self.next_word() >> 1;
            let value = bits % n;
            // Reject the biased tail where the 63-bit range wraps past n
            if ((bits - value).wrapping_add(n - 1) as i64) >= 0 {
                return value as u32;
            }
        }
    }
}

impl From<GeneratorState> for Xs128Rng {
    fn from(state: GeneratorState) -> Self {
        Self::from_state(state)
    }
}

impl RngCore for Xs128Rng {
    fn next_u32(&mut self) -> u32 {
        self.next_word() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_word()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Xs128Rng {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&seed[..8]);
        hi.copy_from_slice(&seed[8..]);
        Self {
            state0: u64::from_le_bytes(lo),
            state1: u64::from_le_bytes(hi),
        }
    }

    fn seed_from_u64(seed: u64) -> Self {
        let seed = if seed == 0 { i64::MIN as u64 } else { seed };
        let state0 = murmur3_fmix64(seed);
        Self {
            state0,
            state1: murmur3_fmix64(state0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sequence() {
        let mut rng = Xs128Rng::from_state(GeneratorState::demo());
        assert_eq!(rng.next_word(), 0x2e77_f3e3_1a76_3712);
        assert_eq!(rng.next_word(), 0x5c80_000b_9280_e768);
        assert_eq!(rng.next_word(), 0x1f7a_b78f_858d_f538);
        assert_eq!(
            rng.state(),
            GeneratorState::new(0x2e08_0c29_780a_b055, 0xf172_ab66_0d83_44e3)
        );
    }

    #[test]
    fn test_seed_from_u64() {
        let rng = Xs128Rng::seed_from_u64(42);
        assert_eq!(
            rng.state(),
            GeneratorState::new(0x8108_7960_8e42_59cc, 0x310d_cdae_81f2_889b)
        );
    }

    #[test]
    fn test_seed_zero_is_remapped() {
        let rng = Xs128Rng::seed_from_u64(0);
        assert_eq!(
            rng.state(),
            GeneratorState::new(0x8f78_0810_af31_a493, 0xd1f9_a22a_f8e8_3383)
        );
    }

    #[test]
    fn test_from_seed_little_endian() {
        let mut seed = [0u8; 16];
        seed[0] = 0x21;
        seed[8] = 0xFF;
        let rng = Xs128Rng::from_seed(seed);
        assert_eq!(rng.state(), GeneratorState::new(0x21, 0xFF));
    }

    #[test]
    fn test_restored_generator_continues_sequence() {
        let mut original = Xs128Rng::seed_from_u64(7);
        original.next_word();
        let mut restored = Xs128Rng::from_state(original.state());
        for _ in 0..64 {
            assert_eq!(original.next_word(), restored.next_word());
        }
    }

    #[test]
    fn test_set_state_rewinds() {
        let mut rng = Xs128Rng::from(GeneratorState::demo());
        let first: Vec<u64> = (0..8).map(|_| rng.next_word()).collect();
        rng.set_state(GeneratorState::demo());
        let again: Vec<u64> = (0..8).map(|_| rng.next_word()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = Xs128Rng::seed_from_u64(99);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_below_range() {
        let mut rng = Xs128Rng::seed_from_u64(3);
        assert_eq!(rng.next_below(0), 0);
        for _ in 0..1000 {
            assert!(rng.next_below(10) < 10);
        }
        assert_eq!(rng.next_below(1), 0);
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut a = Xs128Rng::from_state(GeneratorState::demo());
        let mut b = a.clone();
        let mut buf = [0u8; 11];
        a.fill_bytes(&mut buf);
        let first = b.next_word().to_le_bytes();
        let second = b.next_word().to_le_bytes();
        assert_eq!(&buf[..8], &first);
        assert_eq!(&buf[8..], &second[..3]);
    }
}
