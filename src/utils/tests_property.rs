//! Property-based tests for byte utilities and challenge predicates

use super::bytes::*;
use crate::search::{Challenge, NoncePosition};
use proptest::prelude::*;

proptest! {
    #[test]
    fn increment_is_plus_one_mod_region(mut region in prop::collection::vec(any::<u8>(), 1..16)) {
        let len = region.len();
        let before: u128 = region
            .iter()
            .take(15)
            .enumerate()
            .map(|(i, &b)| (b as u128) << (8 * i))
            .sum();
        let wrapped = increment_nonce(&mut region);
        let after: u128 = region
            .iter()
            .take(15)
            .enumerate()
            .map(|(i, &b)| (b as u128) << (8 * i))
            .sum();
        let modulus = 1u128 << (8 * len.min(15));
        prop_assert_eq!(after, (before + 1) % modulus);
        prop_assert_eq!(wrapped, after == 0);
    }

    #[test]
    fn less_or_equal_agrees_with_magnitude(
        a in prop::collection::vec(any::<u8>(), 8),
        b in prop::collection::vec(any::<u8>(), 8),
    ) {
        let av = u64::from_be_bytes(a.clone().try_into().unwrap());
        let bv = u64::from_be_bytes(b.clone().try_into().unwrap());
        prop_assert_eq!(Challenge::LessOrEqual.matches(&a, &b), av <= bv);
    }

    #[test]
    fn starts_with_agrees_with_prefix(
        digest in prop::collection::vec(any::<u8>(), 0..24),
        target in prop::collection::vec(any::<u8>(), 0..24),
    ) {
        let expected = digest.len() >= target.len() && digest[..target.len()] == target[..];
        prop_assert_eq!(Challenge::StartsWith.matches(&digest, &target), expected);
    }

    #[test]
    fn splice_extract_inverse(
        data_len in 1usize..64,
        nonce in prop::collection::vec(any::<u8>(), 1..16),
        tail in any::<bool>(),
    ) {
        prop_assume!(nonce.len() <= data_len);
        let position = if tail { NoncePosition::Tail } else { NoncePosition::Head };
        let mut data = vec![0xEEu8; data_len];
        splice_nonce(&mut data, position, &nonce).unwrap();
        prop_assert_eq!(extract_nonce(&data, position, nonce.len()).unwrap(), nonce);
    }

    #[test]
    fn packed_target_mantissa_lands_by_size(size in 3u32..=32, mantissa in 0u32..0x0100_0000) {
        let packed = (size << 24) | mantissa;
        let target = decode_packed_target(packed, TARGET_WIDTH);
        prop_assert_eq!(target.len(), TARGET_WIDTH);
        let offset = TARGET_WIDTH - size as usize;
        prop_assert_eq!(target[offset], (mantissa >> 16) as u8);
        prop_assert_eq!(target[offset + 1], (mantissa >> 8) as u8);
        prop_assert_eq!(target[offset + 2], mantissa as u8);
    }
}
