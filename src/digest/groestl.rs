//! Grøstl (final-round tweaked version)
//!
//! 224/256 widths use the 512-bit state (8x8 byte matrix, 10 rounds),
//! 384/512 the 1024-bit state (8x16, 14 rounds). Compression is
//! `h' = P(h xor m) xor Q(m) xor h`; the output transform is
//! `trunc(P(x) xor x)` keeping the trailing bytes. All loads are
//! big-endian; the state matrix is column-major.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

const SBOX: [u8; 256] = [
    0x63, 0x7C, 0x77, 0x7B, 0xF2, 0x6B, 0x6F, 0xC5, 0x30, 0x01, 0x67, 0x2B,
    0xFE, 0xD7, 0xAB, 0x76, 0xCA, 0x82, 0xC9, 0x7D, 0xFA, 0x59, 0x47, 0xF0,
    0xAD, 0xD4, 0xA2, 0xAF, 0x9C, 0xA4, 0x72, 0xC0, 0xB7, 0xFD, 0x93, 0x26,
    0x36, 0x3F, 0xF7, 0xCC, 0x34, 0xA5, 0xE5, 0xF1, 0x71, 0xD8, 0x31, 0x15,
    0x04, 0xC7, 0x23, 0xC3, 0x18, 0x96, 0x05, 0x9A, 0x07, 0x12, 0x80, 0xE2,
    0xEB, 0x27, 0xB2, 0x75, 0x09, 0x83, 0x2C, 0x1A, 0x1B, 0x6E, 0x5A, 0xA0,
    0x52, 0x3B, 0xD6, 0xB3, 0x29, 0xE3, 0x2F, 0x84, 0x53, 0xD1, 0x00, 0xED,
    0x20, 0xFC, 0xB1, 0x5B, 0x6A, 0xCB, 0xBE, 0x39, 0x4A, 0x4C, 0x58, 0xCF,
    0xD0, 0xEF, 0xAA, 0xFB, 0x43, 0x4D, 0x33, 0x85, 0x45, 0xF9, 0x02, 0x7F,
    0x50, 0x3C, 0x9F, 0xA8, 0x51, 0xA3, 0x40, 0x8F, 0x92, 0x9D, 0x38, 0xF5,
    0xBC, 0xB6, 0xDA, 0x21, 0x10, 0xFF, 0xF3, 0xD2, 0xCD, 0x0C, 0x13, 0xEC,
    0x5F, 0x97, 0x44, 0x17, 0xC4, 0xA7, 0x7E, 0x3D, 0x64, 0x5D, 0x19, 0x73,
    0x60, 0x81, 0x4F, 0xDC, 0x22, 0x2A, 0x90, 0x88, 0x46, 0xEE, 0xB8, 0x14,
    0xDE, 0x5E, 0x0B, 0xDB, 0xE0, 0x32, 0x3A, 0x0A, 0x49, 0x06, 0x24, 0x5C,
    0xC2, 0xD3, 0xAC, 0x62, 0x91, 0x95, 0xE4, 0x79, 0xE7, 0xC8, 0x37, 0x6D,
    0x8D, 0xD5, 0x4E, 0xA9, 0x6C, 0x56, 0xF4, 0xEA, 0x65, 0x7A, 0xAE, 0x08,
    0xBA, 0x78, 0x25, 0x2E, 0x1C, 0xA6, 0xB4, 0xC6, 0xE8, 0xDD, 0x74, 0x1F,
    0x4B, 0xBD, 0x8B, 0x8A, 0x70, 0x3E, 0xB5, 0x66, 0x48, 0x03, 0xF6, 0x0E,
    0x61, 0x35, 0x57, 0xB9, 0x86, 0xC1, 0x1D, 0x9E, 0xE1, 0xF8, 0x98, 0x11,
    0x69, 0xD9, 0x8E, 0x94, 0x9B, 0x1E, 0x87, 0xE9, 0xCE, 0x55, 0x28, 0xDF,
    0x8C, 0xA1, 0x89, 0x0D, 0xBF, 0xE6, 0x42, 0x68, 0x41, 0x99, 0x2D, 0x0F,
    0xB0, 0x54, 0xBB, 0x16,
];

const SHIFT_P_NARROW: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
const SHIFT_Q_NARROW: [usize; 8] = [1, 3, 5, 7, 0, 2, 4, 6];
const SHIFT_P_WIDE: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 11];
const SHIFT_Q_WIDE: [usize; 8] = [1, 3, 5, 11, 0, 2, 4, 6];

fn xtime(b: u8) -> u8 {
    (b << 1) ^ (if b & 0x80 != 0 { 0x1B } else { 0 })
}

/// MixBytes over one column: circulant multiply by (2,2,3,4,5,3,5,7)
fn mix_column(col: &[u8; 8]) -> [u8; 8] {
    let x2: [u8; 8] = std::array::from_fn(|i| xtime(col[i]));
    let x4: [u8; 8] = std::array::from_fn(|i| xtime(x2[i]));
    let mut out = [0u8; 8];
    for i in 0..8 {
        out[i] = x2[i]
            ^ x2[(i + 1) % 8]
            ^ (col[(i + 2) % 8] ^ x2[(i + 2) % 8])
            ^ x4[(i + 3) % 8]
            ^ (col[(i + 4) % 8] ^ x4[(i + 4) % 8])
            ^ (col[(i + 5) % 8] ^ x2[(i + 5) % 8])
            ^ (col[(i + 6) % 8] ^ x4[(i + 6) % 8])
            ^ (col[(i + 7) % 8] ^ x2[(i + 7) % 8] ^ x4[(i + 7) % 8]);
    }
    out
}

/// One of the P/Q permutations over a row-major 8 x `cols` state
fn permute(state: &mut [[u8; 16]; 8], cols: usize, rounds: usize, q: bool) {
    let shifts = match (q, cols) {
        (false, 8) => &SHIFT_P_NARROW,
        (true, 8) => &SHIFT_Q_NARROW,
        (false, _) => &SHIFT_P_WIDE,
        (true, _) => &SHIFT_Q_WIDE,
    };
    for rnd in 0..rounds {
        // AddRoundConstant
        if q {
            for row in state.iter_mut() {
                for cell in row.iter_mut().take(cols) {
                    *cell ^= 0xFF;
                }
            }
            for j in 0..cols {
                state[7][j] ^= ((j as u8) << 4) ^ rnd as u8;
            }
        } else {
            for j in 0..cols {
                state[0][j] ^= ((j as u8) << 4) ^ rnd as u8;
            }
        }
        // SubBytes
        for row in state.iter_mut() {
            for cell in row.iter_mut().take(cols) {
                *cell = SBOX[*cell as usize];
            }
        }
        // ShiftBytes: row r rotates left by its shift
        for (r, row) in state.iter_mut().enumerate() {
            row[..cols].rotate_left(shifts[r] % cols);
        }
        // MixBytes
        for j in 0..cols {
            let col: [u8; 8] = std::array::from_fn(|r| state[r][j]);
            let mixed = mix_column(&col);
            for r in 0..8 {
                state[r][j] = mixed[r];
            }
        }
    }
}

fn to_state(bytes: &[u8], cols: usize) -> [[u8; 16]; 8] {
    let mut state = [[0u8; 16]; 8];
    for (k, &b) in bytes.iter().enumerate().take(8 * cols) {
        state[k % 8][k / 8] = b;
    }
    state
}

fn from_state(state: &[[u8; 16]; 8], cols: usize) -> Vec<u8> {
    (0..8 * cols).map(|k| state[k % 8][k / 8]).collect()
}

/// Grøstl digest at 224/256/384/512-bit output widths
pub struct Groestl {
    bits: u32,
}

impl Groestl {
    /// Create an instance at the given width
    pub fn new(bits: u32) -> Self {
        let mut groestl = Self { bits: 256 };
        groestl.configure(bits).ok();
        groestl
    }
}

impl Digest for Groestl {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "Groestl does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        let wide = self.bits > 256;
        let cols = if wide { 16 } else { 8 };
        let rounds = if wide { 14 } else { 10 };
        let blk = 8 * cols;

        // IV: trailing big-endian output width, everything else zero
        let mut h = vec![0u8; blk];
        h[blk - 2..].copy_from_slice(&(self.bits as u16).to_be_bytes());

        let compress = |h: &mut Vec<u8>, m: &[u8]| {
            let hm: Vec<u8> = h.iter().zip(m).map(|(a, b)| a ^ b).collect();
            let mut p = to_state(&hm, cols);
            permute(&mut p, cols, rounds, false);
            let p_out = from_state(&p, cols);
            let mut q = to_state(m, cols);
            permute(&mut q, cols, rounds, true);
            let q_out = from_state(&q, cols);
            for i in 0..blk {
                h[i] ^= p_out[i] ^ q_out[i];
            }
        };

        let mut block = vec![0u8; blk];
        let mut total: u64 = 0;
        let rest = loop {
            let n = source.fill(&mut block)?;
            if n < blk {
                break block[..n].to_vec();
            }
            total += 1;
            compress(&mut h, &block);
        };

        // padding: 0x80, zeros, trailing big-endian block count
        let mut tail = rest;
        tail.push(0x80);
        let pad_blocks = if tail.len() + 8 <= blk { 1 } else { 2 };
        let nblocks = total + pad_blocks;
        tail.resize(pad_blocks as usize * blk - 8, 0x00);
        tail.extend_from_slice(&nblocks.to_be_bytes());
        for chunk in tail.chunks_exact(blk) {
            compress(&mut h, chunk);
        }

        // output transform
        let mut p = to_state(&h, cols);
        permute(&mut p, cols, rounds, false);
        let p_out = from_state(&p, cols);
        let finalized: Vec<u8> = h.iter().zip(&p_out).map(|(a, b)| a ^ b).collect();
        Ok(finalized[blk - (self.bits / 8) as usize..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vector from the Groestl submission document
    #[test]
    fn test_groestl256_empty() {
        let out = Groestl::new(256).compute_bytes(b"").unwrap();
        assert_eq!(
            hex::encode(out),
            "1a52d11d550039be16107f9c58db9ebcc417f16f736adb2502567119f0083467"
        );
    }

    #[test]
    fn test_mix_column_identity_of_zero() {
        assert_eq!(mix_column(&[0u8; 8]), [0u8; 8]);
    }

    #[test]
    fn test_block_boundary_lengths_differ() {
        let widths = [224u32, 256, 384, 512];
        for bits in widths {
            let mut g = Groestl::new(bits);
            let a = g.compute_bytes(&vec![0x55u8; 63]).unwrap();
            let b = g.compute_bytes(&vec![0x55u8; 64]).unwrap();
            assert_ne!(a, b, "{}", bits);
        }
    }

    #[test]
    fn test_unsupported_width_rejected() {
        assert!(Groestl::new(256).configure(128).is_err());
    }
}
