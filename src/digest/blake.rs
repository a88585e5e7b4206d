//! Blake (the SHA-3 finalist, final 14/16-round version)
//!
//! 224/256 widths run the 32-bit compression over 64-byte blocks, 384/512
//! the 64-bit compression over 128-byte blocks. Word loads are big-endian.
//! The block counter covers message bits only; a block holding nothing but
//! padding is compressed with a zero counter.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

const SIGMA: [[usize; 16]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

// pi-fraction constants
const C_32: [u32; 16] = [
    0x243F6A88, 0x85A308D3, 0x13198A2E, 0x03707344,
    0xA4093822, 0x299F31D0, 0x082EFA98, 0xEC4E6C89,
    0x452821E6, 0x38D01377, 0xBE5466CF, 0x34E90C6C,
    0xC0AC29B7, 0xC97C50DD, 0x3F84D5B5, 0xB5470917,
];
const C_64: [u64; 16] = [
    0x243F6A8885A308D3, 0x13198A2E03707344, 0xA4093822299F31D0,
    0x082EFA98EC4E6C89, 0x452821E638D01377, 0xBE5466CF34E90C6C,
    0xC0AC29B7C97C50DD, 0x3F84D5B5B5470917, 0x9216D5D98979FB1B,
    0xD1310BA698DFB5AC, 0x2FFD72DBD01ADFB7, 0xB8E1AFED6A267E96,
    0xBA7C9045F12C7F99, 0x24A19947B3916CF7, 0x0801F2E2858EFC16,
    0x636920D871574E69,
];

const IV_224: [u32; 8] = [
    0xC1059ED8, 0x367CD507, 0x3070DD17, 0xF70E5939,
    0xFFC00B31, 0x68581511, 0x64F98FA7, 0xBEFA4FA4,
];
const IV_256: [u32; 8] = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A,
    0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];
const IV_384: [u64; 8] = [
    0xCBBB9D5DC1059ED8, 0x629A292A367CD507, 0x9159015A3070DD17,
    0x152FECD8F70E5939, 0x67332667FFC00B31, 0x8EB44A8768581511,
    0xDB0C2E0D64F98FA7, 0x47B5481DBEFA4FA4,
];
const IV_512: [u64; 8] = [
    0x6A09E667F3BCC908, 0xBB67AE8584CAA73B, 0x3C6EF372FE94F82B,
    0xA54FF53A5F1D36F1, 0x510E527FADE682D1, 0x9B05688C2B3E6C1F,
    0x1F83D9ABFB41BD6B, 0x5BE0CD19137E2179,
];

fn compress32(h: &mut [u32; 8], block: &[u8], t: u64) {
    let mut m = [0u32; 16];
    for (i, word) in m.iter_mut().enumerate() {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&block[i * 4..i * 4 + 4]);
        *word = u32::from_be_bytes(bytes);
    }
    let mut v = [0u32; 16];
    v[..8].copy_from_slice(h);
    v[8..12].copy_from_slice(&C_32[..4]);
    v[12] = (t as u32) ^ C_32[4];
    v[13] = (t as u32) ^ C_32[5];
    v[14] = ((t >> 32) as u32) ^ C_32[6];
    v[15] = ((t >> 32) as u32) ^ C_32[7];

    let g = |v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, r: usize, i: usize| {
        let s = &SIGMA[r % 10];
        v[a] = v[a]
            .wrapping_add(v[b])
            .wrapping_add(m[s[2 * i]] ^ C_32[s[2 * i + 1]]);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(12);
        v[a] = v[a]
            .wrapping_add(v[b])
            .wrapping_add(m[s[2 * i + 1]] ^ C_32[s[2 * i]]);
        v[d] = (v[d] ^ v[a]).rotate_right(8);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(7);
    };

    for r in 0..14 {
        g(&mut v, 0, 4, 8, 12, r, 0);
        g(&mut v, 1, 5, 9, 13, r, 1);
        g(&mut v, 2, 6, 10, 14, r, 2);
        g(&mut v, 3, 7, 11, 15, r, 3);
        g(&mut v, 0, 5, 10, 15, r, 4);
        g(&mut v, 1, 6, 11, 12, r, 5);
        g(&mut v, 2, 7, 8, 13, r, 6);
        g(&mut v, 3, 4, 9, 14, r, 7);
    }
    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

fn compress64(h: &mut [u64; 8], block: &[u8], t: u128) {
    let mut m = [0u64; 16];
    for (i, word) in m.iter_mut().enumerate() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&block[i * 8..i * 8 + 8]);
        *word = u64::from_be_bytes(bytes);
    }
    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..12].copy_from_slice(&C_64[..4]);
    v[12] = (t as u64) ^ C_64[4];
    v[13] = (t as u64) ^ C_64[5];
    v[14] = ((t >> 64) as u64) ^ C_64[6];
    v[15] = ((t >> 64) as u64) ^ C_64[7];

    let g = |v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, r: usize, i: usize| {
        let s = &SIGMA[r % 10];
        v[a] = v[a]
            .wrapping_add(v[b])
            .wrapping_add(m[s[2 * i]] ^ C_64[s[2 * i + 1]]);
        v[d] = (v[d] ^ v[a]).rotate_right(32);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(25);
        v[a] = v[a]
            .wrapping_add(v[b])
            .wrapping_add(m[s[2 * i + 1]] ^ C_64[s[2 * i]]);
        v[d] = (v[d] ^ v[a]).rotate_right(16);
        v[c] = v[c].wrapping_add(v[d]);
        v[b] = (v[b] ^ v[c]).rotate_right(11);
    };

    for r in 0..16 {
        g(&mut v, 0, 4, 8, 12, r, 0);
        g(&mut v, 1, 5, 9, 13, r, 1);
        g(&mut v, 2, 6, 10, 14, r, 2);
        g(&mut v, 3, 7, 11, 15, r, 3);
        g(&mut v, 0, 5, 10, 15, r, 4);
        g(&mut v, 1, 6, 11, 12, r, 5);
        g(&mut v, 2, 7, 8, 13, r, 6);
        g(&mut v, 3, 4, 9, 14, r, 7);
    }
    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

/// Blake digest at 224/256/384/512-bit output widths
pub struct Blake {
    bits: u32,
}

impl Blake {
    /// Create an instance at the given width
    pub fn new(bits: u32) -> Self {
        let mut blake = Self { bits: 256 };
        blake.configure(bits).ok();
        blake
    }
}

impl Digest for Blake {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "Blake does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        let wide = self.bits > 256;
        let blk = if wide { 128 } else { 64 };
        let ctr_len = if wide { 16 } else { 8 };
        // index of the byte that may carry the closing 0x01 bit
        let pad_mark = blk - ctr_len - 1;
        let one_flag: u8 = if self.bits == 256 || self.bits == 512 {
            0x01
        } else {
            0x00
        };

        let mut h32 = if self.bits == 224 { IV_224 } else { IV_256 };
        let mut h64 = if self.bits == 384 { IV_384 } else { IV_512 };

        let mut block = vec![0u8; blk];
        let mut counted: u128 = 0;
        let rest = loop {
            let n = source.fill(&mut block)?;
            if n < blk {
                break block[..n].to_vec();
            }
            counted += (blk as u128) * 8;
            if wide {
                compress64(&mut h64, &block, counted);
            } else {
                compress32(&mut h32, &block, counted as u64);
            }
        };

        let msg_bits = counted + (rest.len() as u128) * 8;
        let rest_bits = (rest.len() as u128) * 8;
        let mut tail = rest;
        tail.push(0x80);
        if tail.len() > pad_mark + 1 {
            // no room for the counter: close this block, then compress a
            // padding-only block with a zero counter
            tail.resize(blk, 0x00);
            let t = counted + rest_bits;
            if wide {
                compress64(&mut h64, &tail, t);
            } else {
                compress32(&mut h32, &tail, t as u64);
            }
            tail = vec![0u8; blk];
            tail[pad_mark] |= one_flag;
            tail[blk - ctr_len..].copy_from_slice(&msg_bits.to_be_bytes()[16 - ctr_len..]);
            if wide {
                compress64(&mut h64, &tail, 0);
            } else {
                compress32(&mut h32, &tail, 0);
            }
        } else {
            tail.resize(pad_mark + 1, 0x00);
            tail[pad_mark] |= one_flag;
            tail.extend_from_slice(&msg_bits.to_be_bytes()[16 - ctr_len..]);
            let t = if rest_bits > 0 { counted + rest_bits } else { 0 };
            if wide {
                compress64(&mut h64, &tail, t);
            } else {
                compress32(&mut h32, &tail, t as u64);
            }
        }

        let out: Vec<u8> = if wide {
            h64.iter().flat_map(|x| x.to_be_bytes()).collect()
        } else {
            h32.iter().flat_map(|x| x.to_be_bytes()).collect()
        };
        Ok(out[..(self.bits / 8) as usize].to_vec())
    }
}
