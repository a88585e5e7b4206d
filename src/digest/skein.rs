//! Skein-512 (v1.3) at 224/256/384/512-bit output widths
//!
//! Threefish-512 under the UBI chaining mode. The IV is derived by
//! running the SHA3-schema configuration block through UBI, so every
//! output width gets its own chaining start without tabulated IVs.
//! Little-endian throughout.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

const C240: u64 = 0x1BD11BDAA9FC1A22;

const ROTATIONS: [[u32; 4]; 8] = [
    [46, 36, 19, 37],
    [33, 27, 14, 42],
    [17, 49, 36, 39],
    [44, 9, 54, 56],
    [39, 30, 34, 24],
    [13, 50, 10, 17],
    [25, 29, 39, 43],
    [8, 35, 56, 22],
];
const PERMUTE: [usize; 8] = [2, 1, 4, 7, 6, 5, 0, 3];

const TYPE_CFG: u64 = 4;
const TYPE_MSG: u64 = 48;
const TYPE_OUT: u64 = 63;
const FLAG_FIRST: u64 = 1 << 62;
const FLAG_FINAL: u64 = 1 << 63;

fn threefish512(key: &[u64; 8], tweak: [u64; 2], block: &[u64; 8]) -> [u64; 8] {
    let mut k = [0u64; 9];
    k[..8].copy_from_slice(key);
    k[8] = key.iter().fold(C240, |acc, &w| acc ^ w);
    let t = [tweak[0], tweak[1], tweak[0] ^ tweak[1]];

    let add_subkey = |v: &mut [u64; 8], s: usize| {
        for i in 0..8 {
            v[i] = v[i].wrapping_add(k[(s + i) % 9]);
        }
        v[5] = v[5].wrapping_add(t[s % 3]);
        v[6] = v[6].wrapping_add(t[(s + 1) % 3]);
        v[7] = v[7].wrapping_add(s as u64);
    };

    let mut v = *block;
    for d in 0..72 {
        if d % 4 == 0 {
            add_subkey(&mut v, d / 4);
        }
        let r = &ROTATIONS[d % 8];
        for j in 0..4 {
            let a = v[2 * j].wrapping_add(v[2 * j + 1]);
            let b = v[2 * j + 1].rotate_left(r[j]) ^ a;
            v[2 * j] = a;
            v[2 * j + 1] = b;
        }
        let prev = v;
        for (i, &p) in PERMUTE.iter().enumerate() {
            v[i] = prev[p];
        }
    }
    add_subkey(&mut v, 18);
    v
}

fn block_words(block: &[u8; 64]) -> [u64; 8] {
    std::array::from_fn(|i| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&block[i * 8..(i + 1) * 8]);
        u64::from_le_bytes(bytes)
    })
}

/// One UBI block: `G' = E(G, tweak, M) xor M`
fn ubi_block(g: &mut [u64; 8], block: &[u8; 64], position: u64, type_code: u64, first: bool, final_: bool) {
    let mut t1 = type_code << 56;
    if first {
        t1 |= FLAG_FIRST;
    }
    if final_ {
        t1 |= FLAG_FINAL;
    }
    let words = block_words(block);
    let encrypted = threefish512(g, [position, t1], &words);
    for (gw, (ew, mw)) in g.iter_mut().zip(encrypted.iter().zip(words)) {
        *gw = ew ^ mw;
    }
}

/// UBI over a fully in-memory message (config and output passes)
fn ubi(g: &mut [u64; 8], msg: &[u8], type_code: u64) {
    let mut block = [0u8; 64];
    if msg.is_empty() {
        ubi_block(g, &block, 0, type_code, true, true);
        return;
    }
    let chunks: Vec<&[u8]> = msg.chunks(64).collect();
    let mut position = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        block = [0u8; 64];
        block[..chunk.len()].copy_from_slice(chunk);
        position += chunk.len() as u64;
        ubi_block(
            g,
            &block,
            position,
            type_code,
            i == 0,
            i == chunks.len() - 1,
        );
    }
}

/// Skein-512 digest at 224/256/384/512-bit output widths
pub struct Skein {
    bits: u32,
}

impl Skein {
    /// Create an instance at the given width
    pub fn new(bits: u32) -> Self {
        let mut skein = Self { bits: 256 };
        skein.configure(bits).ok();
        skein
    }

    /// Chaining value after the configuration block
    fn initial_state(&self) -> [u64; 8] {
        let mut cfg = [0u8; 32];
        cfg[0..4].copy_from_slice(b"SHA3");
        cfg[4..6].copy_from_slice(&1u16.to_le_bytes());
        cfg[8..16].copy_from_slice(&(self.bits as u64).to_le_bytes());
        let mut g = [0u64; 8];
        ubi(&mut g, &cfg, TYPE_CFG);
        g
    }
}

impl Digest for Skein {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "Skein does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        let mut g = self.initial_state();

        // The final block carries the FINAL flag, so each full block is
        // held back until the next read proves more data follows.
        let mut held = [0u8; 64];
        let mut held_len = 0usize;
        let mut have_held = false;
        let mut first = true;
        let mut position = 0u64;
        loop {
            let mut next = [0u8; 64];
            let n = source.fill(&mut next)?;
            if n == 0 {
                break;
            }
            if have_held {
                position += held_len as u64;
                ubi_block(&mut g, &held, position, TYPE_MSG, first, false);
                first = false;
            }
            held = next;
            held_len = n;
            have_held = true;
        }
        if have_held {
            position += held_len as u64;
            let mut last = [0u8; 64];
            last[..held_len].copy_from_slice(&held[..held_len]);
            ubi_block(&mut g, &last, position, TYPE_MSG, first, true);
        } else {
            ubi_block(&mut g, &[0u8; 64], 0, TYPE_MSG, true, true);
        }

        // counter-mode output
        let out_len = (self.bits / 8) as usize;
        let mut out = Vec::with_capacity(out_len.next_multiple_of(64));
        let mut counter = 0u64;
        while out.len() < out_len {
            let mut chained = g;
            let mut ctr_block = [0u8; 64];
            ctr_block[..8].copy_from_slice(&counter.to_le_bytes());
            ubi_block(&mut chained, &ctr_block, 8, TYPE_OUT, true, true);
            for word in chained {
                out.extend_from_slice(&word.to_le_bytes());
            }
            counter += 1;
        }
        out.truncate(out_len);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vector from the Skein v1.3 paper appendix
    #[test]
    fn test_skein512_single_ff_byte() {
        let out = Skein::new(512).compute_bytes(&[0xFFu8]).unwrap();
        assert_eq!(
            hex::encode(out),
            "71b7bce6fe6452227b9ced6014249e5bf9a9754c3ad618ccc4e0aae16b316cc8\
             ca698d864307ed3e80b6ef1570812ac5272dc409b5a012df2a579102f340617a"
        );
    }

    // The published Skein-512-512 IV falls out of the config block
    #[test]
    fn test_config_block_derives_published_iv() {
        let skein = Skein::new(512);
        let g = skein.initial_state();
        assert_eq!(g[0], 0x4903ADFF749C51CE);
        assert_eq!(g[7], 0xAE18A40B660FCC33);
    }

    #[test]
    fn test_output_widths_are_prefix_free() {
        // different config blocks, so 224/256 are unrelated digests
        let a = Skein::new(224).compute_bytes(b"skein").unwrap();
        let b = Skein::new(256).compute_bytes(b"skein").unwrap();
        assert_ne!(&a[..], &b[..28]);
    }

    #[test]
    fn test_exact_block_message() {
        let a = Skein::new(256).compute_bytes(&[7u8; 64]).unwrap();
        let b = Skein::new(256).compute_bytes(&[7u8; 65]).unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unsupported_width_rejected() {
        assert!(Skein::new(256).configure(1024).is_err());
    }
}
