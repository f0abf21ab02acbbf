//! Stable seed derivation from pattern names.
//!
//! Every render of a named pattern must replay the same stochastic
//! sequence, so the seed is a pure function of the name: FNV-1a over
//! the UTF-8 bytes. Collisions between template names are not handled;
//! the expected name cardinality is far below any practical risk.

use rand::SeedableRng as _;
use rand::rngs::StdRng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// 64-bit FNV-1a over the UTF-8 bytes of `name`. Total over all
/// strings, including the empty string (which hashes to the offset
/// basis).
pub fn derive_seed(name: &str) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in name.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// The single generator instance for one render. It is created once per
/// render and threaded through series generation and candle jitter in a
/// fixed draw order; it is never reseeded mid-render.
pub fn rng_for(name: &str) -> StdRng {
    StdRng::seed_from_u64(derive_seed(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng as _;

    #[test]
    fn empty_name_hashes_to_offset_basis() {
        assert_eq!(derive_seed(""), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn seed_is_stable_across_calls() {
        assert_eq!(derive_seed("Bull_Flag"), derive_seed("Bull_Flag"));
    }

    #[test]
    fn distinct_names_produce_distinct_seeds() {
        assert_ne!(derive_seed("Bull_Flag"), derive_seed("Bear_Flag"));
        assert_ne!(derive_seed("a"), derive_seed("b"));
    }

    #[test]
    fn seeded_rng_replays_the_same_draws() {
        let mut a = rng_for("head_shoulders");
        let mut b = rng_for("head_shoulders");
        for _ in 0..16 {
            assert_eq!(a.r#gen::<u64>(), b.r#gen::<u64>());
        }
    }
}
