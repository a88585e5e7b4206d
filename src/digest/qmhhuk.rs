//! QmhHuk, the deliberate SHA-2 variant
//!
//! QmhHuk keeps the SHA-2 compression layout but diverges on purpose:
//! its own constant tables (square and cube roots of the primes
//! 419..827), its own rotation triples, a four-temporary round step with
//! XOR mixing, an XOR state merge, and pi/phi-fraction padding carrying a
//! two-byte output-width marker ahead of the message length.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

const IV_224: [u32; 8] = [
    0xFBEB2197, 0xA93033FE, 0x0BFEF64A, 0x4CA0D2CD,
    0x3E214144, 0x3A16F2FE, 0x52391DBE, 0xEC6A09C2,
];
const IV_256: [u32; 8] = [
    0x78307697, 0x84AE4B7C, 0xC2B2B755, 0xCF03D20E,
    0xF3CBB117, 0x0C2D3B4B, 0x308AF161, 0x60A7A998,
];
const IV_384: [u64; 8] = [
    0x788D9812FBEB2197, 0x84769B42A93033FE, 0x9C34F0620BFEF64A,
    0xE2D564C44CA0D2CD, 0x116D75FD3E214144, 0x2894C1073A16F2FE,
    0x569B58C652391DBE, 0x6D7B3939EC6A09C2,
];
const IV_512: [u64; 8] = [
    0x7830769755FE0B0A, 0x84AE4B7CB79286A4, 0xC2B2B7559233F645,
    0xCF03D20E5ACFA987, 0xF3CBB117DBF3C297, 0x0C2D3B4BE1707ABA,
    0x308AF161F4A4E085, 0x60A7A9985B936A57,
];

const K_32: [u32; 56] = [
    0x7BA0EA2D, 0x7EABF2D0, 0x8DBE8D03, 0x90BB1721,
    0x99A2AD45, 0x9F86E289, 0xA84C4472, 0xB3DF34FC,
    0xB99BB8D7, 0xBC76CBAB, 0xC226A69A, 0xD304F19A,
    0xDE1BE20A, 0xE39BB437, 0xEE84927C, 0xF3EDD277,
    0xFBFDFE53, 0x0BEE2C7A, 0x0E90181C, 0x25F57204,
    0x2DA45582, 0x3A52C34C, 0x41DC0172, 0x495796FC,
    0x4BD31FC6, 0x533CDE21, 0x5F7ABFE3, 0x66C206B3,
    0x6DFCC6BC, 0x7062F20F, 0x778D5127, 0x7EABA3CC,
    0x8363ECCC, 0x85BE1C25, 0x93C04028, 0x9F4A205F,
    0xA1953565, 0xA627BB0F, 0xACFA8089, 0xB3C29B23,
    0xB602F6FA, 0xC36CEE0A, 0xC7DC81EE, 0xCE7B8471,
    0xD740288C, 0xE21DBA7A, 0xEABBFF66, 0xF56A9E60,
    0xFDE41D72, 0x0434D097, 0x0A7CB752, 0x0EA7D22D,
    0x16F2987F, 0x1D20CDCD, 0x213AF85A, 0x2964505C,
];
const K_64: [u64; 64] = [
    0x7BA0EA2D98160007, 0x7EABF2D0C21F964A, 0x8DBE8D038B409545,
    0x90BB1721582E8285, 0x99A2AD45936D4E61, 0x9F86E289FE03E739,
    0xA84C4472FAA9A82F, 0xB3DF34FCE89E0532, 0xB99BB8D7B173534F,
    0xBC76CBAB1AEA1F9C, 0xC226A69A780F3CC3, 0xD304F19AA233957D,
    0xDE1BE20A212129DD, 0xE39BB43755141950, 0xEE84927CEA48DDD2,
    0xF3EDD2773C523B67, 0xFBFDFE53A8D32F2A, 0x0BEE2C7AB77E9E25,
    0x0E90181CF1B09E56, 0x25F57204C725BED8, 0x2DA45582CD598B32,
    0x3A52C34C203BFCF3, 0x41DC0172CD1991C1, 0x495796FCB33CC1C0,
    0x4BD31FC693F9F16E, 0x533CDE2115F5A9A0, 0x5F7ABFE36E99C1D3,
    0x66C206B310A57E6F, 0x6DFCC6BC39603F61, 0x7062F20F86FD1052,
    0x778D51277ADEC865, 0x7EABA3CC25DA7048, 0x8363ECCC37A5BE05,
    0x85BE1C253BEBA54E, 0x93C04028F348BBC5, 0x9F4A205FD05B2148,
    0xA19535651CA6D2DE, 0xA627BB0FBF027BC7, 0xACFA80891DA2F06B,
    0xB3C29B23031A7F9D, 0xB602F6FAC7D3D74D, 0xC36CEE0A10C7BA49,
    0xC7DC81EEA9EBAD4F, 0xCE7B8471B0F809DF, 0xD740288C84DF269C,
    0xE21DBA7AC2290607, 0xEABBFF66BE175964, 0xF56A9E60F62CEA92,
    0xFDE41D729D126EAB, 0x0434D0970E42E781, 0x0A7CB752A3F1CD86,
    0x0EA7D22D6BCD7382, 0x16F2987F9495A5EE, 0x1D20CDCD45B8DE1E,
    0x213AF85A39B0C320, 0x2964505C52A2F35B, 0x2D738E114181E082,
    0x3B8CEA0E71C58AAF, 0x4584E6AE9F54016E, 0x515F4356903DCCC2,
    0x5356112DDFD5A8E9, 0x5D1BC3EDBE2C897A, 0x5F0DA9F8ED53548B,
    0x62EF0BE4D5492E78,
];

// first 128 bytes of frac(pi)
const PI_PAD: [u8; 128] = [
    0x24, 0x3F, 0x6A, 0x88, 0x85, 0xA3, 0x08, 0xD3, 0x13, 0x19, 0x8A, 0x2E,
    0x03, 0x70, 0x73, 0x44, 0xA4, 0x09, 0x38, 0x22, 0x29, 0x9F, 0x31, 0xD0,
    0x08, 0x2E, 0xFA, 0x98, 0xEC, 0x4E, 0x6C, 0x89, 0x45, 0x28, 0x21, 0xE6,
    0x38, 0xD0, 0x13, 0x77, 0xBE, 0x54, 0x66, 0xCF, 0x34, 0xE9, 0x0C, 0x6C,
    0xC0, 0xAC, 0x29, 0xB7, 0xC9, 0x7C, 0x50, 0xDD, 0x3F, 0x84, 0xD5, 0xB5,
    0xB5, 0x47, 0x09, 0x17, 0x92, 0x16, 0xD5, 0xD9, 0x89, 0x79, 0xFB, 0x1B,
    0xD1, 0x31, 0x0B, 0xA6, 0x98, 0xDF, 0xB5, 0xAC, 0x2F, 0xFD, 0x72, 0xDB,
    0xD0, 0x1A, 0xDF, 0xB7, 0xB8, 0xE1, 0xAF, 0xED, 0x6A, 0x26, 0x7E, 0x96,
    0xBA, 0x7C, 0x90, 0x45, 0xF1, 0x2C, 0x7F, 0x99, 0x24, 0xA1, 0x99, 0x47,
    0xB3, 0x91, 0x6C, 0xF7, 0x08, 0x01, 0xF2, 0xE2, 0x85, 0x8E, 0xFC, 0x16,
    0x63, 0x69, 0x20, 0xD8, 0x71, 0x57, 0x4E, 0x69,
];
// first 128 bytes of frac(phi)
const PHI_PAD: [u8; 128] = [
    0x9E, 0x37, 0x79, 0xB9, 0x7F, 0x4A, 0x7C, 0x15, 0xF3, 0x9C, 0xC0, 0x60,
    0x5C, 0xED, 0xC8, 0x34, 0x10, 0x82, 0x27, 0x6B, 0xF3, 0xA2, 0x72, 0x51,
    0xF8, 0x6C, 0x6A, 0x11, 0xD0, 0xC1, 0x8E, 0x95, 0x27, 0x67, 0xF0, 0xB1,
    0x53, 0xD2, 0x7B, 0x7F, 0x03, 0x47, 0x04, 0x5B, 0x5B, 0xF1, 0x82, 0x7F,
    0x01, 0x88, 0x6F, 0x09, 0x28, 0x40, 0x30, 0x02, 0xC1, 0xD6, 0x4B, 0xA4,
    0x0F, 0x33, 0x5E, 0x36, 0xF0, 0x6A, 0xD7, 0xAE, 0x97, 0x17, 0x87, 0x7E,
    0x85, 0x83, 0x9D, 0x6E, 0xFF, 0xBD, 0x7D, 0xC6, 0x64, 0xD3, 0x25, 0xD1,
    0xC5, 0x37, 0x16, 0x82, 0xCA, 0xDD, 0x0C, 0xCC, 0xFD, 0xFF, 0xBB, 0xE1,
    0x62, 0x6E, 0x33, 0xB8, 0xD0, 0x4B, 0x43, 0x31, 0xBB, 0xF7, 0x3C, 0x79,
    0x0D, 0x94, 0xF7, 0x9D, 0x47, 0x1C, 0x4A, 0xB3, 0xED, 0x3D, 0x82, 0xA5,
    0xFE, 0xC5, 0x07, 0x70, 0x5E, 0x4A, 0xE6, 0xE5,
];

/// QmhHuk digest at 224/256/384/512-bit output widths
pub struct QmhHuk {
    bits: u32,
}

impl QmhHuk {
    /// Create an instance at the given width
    pub fn new(bits: u32) -> Self {
        let mut qmhhuk = Self { bits: 256 };
        qmhhuk.configure(bits).ok();
        qmhhuk
    }

    fn block_len(&self) -> usize {
        if self.bits <= 256 {
            64
        } else {
            128
        }
    }

    /// Final one or two padding blocks for a message of `bitlen` bits
    /// whose last partial block is `rest`
    fn pad(&self, rest: &[u8], bitlen: u64) -> Vec<u8> {
        let blk = self.block_len();
        let mut padded = rest.to_vec();
        let mut table: &[u8; 128] = &PI_PAD;
        let mut pos = rest.len();
        padded.push(0x80);
        pos += 1;
        if pos > blk - 10 {
            // no room for the trailer; the carry block draws from phi
            while pos < blk {
                padded.push(PI_PAD[pos]);
                pos += 1;
            }
            table = &PHI_PAD;
            pos = 0;
        }
        while pos < blk - 10 {
            padded.push(table[pos]);
            pos += 1;
        }
        padded.extend_from_slice(&(self.bits as u16).to_be_bytes());
        padded.extend_from_slice(&bitlen.to_be_bytes());
        padded
    }
}

macro_rules! qmhhuk_core {
    ($name:ident, $word:ty, $rounds:expr, $k:expr,
     bs0: $b00:expr, $b01:expr, $b02:expr,
     bs1: $b10:expr, $b11:expr, $b12:expr,
     ss0: $s00:expr, $s01:expr, $s02:expr,
     ss1: $s10:expr, $s11:expr, $s12:expr) => {
        fn $name(h: &mut [$word; 8], block: &[u8]) {
            const WB: usize = std::mem::size_of::<$word>();

            fn bs0(x: $word) -> $word {
                x.rotate_right($b00) ^ x.rotate_right($b01) ^ x.rotate_right($b02)
            }
            fn bs1(x: $word) -> $word {
                x.rotate_right($b10) ^ x.rotate_right($b11) ^ x.rotate_right($b12)
            }
            fn ss0(x: $word) -> $word {
                x.rotate_right($s00) ^ x.rotate_right($s01) ^ (x >> $s02)
            }
            fn ss1(x: $word) -> $word {
                x.rotate_right($s10) ^ x.rotate_right($s11) ^ (x >> $s12)
            }
            fn ch(x: $word, y: $word, z: $word) -> $word {
                (x & y) ^ (!x & z)
            }
            fn maj(x: $word, y: $word, z: $word) -> $word {
                (x & y) ^ (x & z) ^ (y & z)
            }

            let mut w = [0 as $word; $rounds];
            for (i, word) in w.iter_mut().take(16).enumerate() {
                let mut bytes = [0u8; WB];
                bytes.copy_from_slice(&block[i * WB..(i + 1) * WB]);
                *word = <$word>::from_be_bytes(bytes);
            }
            for i in 16..$rounds {
                w[i] = ss1(w[i - 2])
                    .wrapping_add(w[i - 7])
                    .wrapping_add(ss0(w[i - 15]))
                    .wrapping_add(w[i - 16]);
            }

            let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut hh] = *h;
            for i in 0..$rounds {
                let t1 = hh
                    .wrapping_add(bs1(e))
                    .wrapping_add(ch(e, f, g))
                    .wrapping_add($k[i])
                    .wrapping_add(w[i]);
                let t2 = bs0(a).wrapping_add(maj(a, b, c));
                let t3 = d
                    .wrapping_add(bs0(e))
                    .wrapping_add(maj(f, g, hh))
                    .wrapping_add($k[i]);
                let t4 = ss0(b).wrapping_add(ss1(g)).wrapping_add(w[i]);
                hh = g;
                g = f ^ t1;
                f = e;
                e = t3.wrapping_add(t4);
                d = c;
                c = b ^ t3;
                b = a;
                a = t1.wrapping_add(t2);
            }
            let x = [a, b, c, d, e, f, g, hh];
            for (word, mixed) in h.iter_mut().zip(x) {
                *word ^= mixed;
            }
        }
    };
}

qmhhuk_core!(compress32, u32, 56, K_32,
    bs0: 5, 11, 25, bs1: 7, 14, 22, ss0: 4, 13, 5, ss1: 11, 21, 9);
qmhhuk_core!(compress64, u64, 64, K_64,
    bs0: 25, 30, 37, bs1: 17, 21, 43, ss0: 2, 11, 8, ss1: 23, 57, 5);

impl Digest for QmhHuk {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "QmhHuk does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        let blk = self.block_len();
        let narrow = blk == 64;
        let mut h32 = if self.bits == 224 { IV_224 } else { IV_256 };
        let mut h64 = if self.bits == 384 { IV_384 } else { IV_512 };

        let mut block = vec![0u8; blk];
        let mut bitlen = 0u64;
        let rest = loop {
            let n = source.fill(&mut block)?;
            bitlen += (n as u64) * 8;
            if n < blk {
                break block[..n].to_vec();
            }
            if narrow {
                compress32(&mut h32, &block);
            } else {
                compress64(&mut h64, &block);
            }
        };

        let padded = self.pad(&rest, bitlen);
        for chunk in padded.chunks_exact(blk) {
            if narrow {
                compress32(&mut h32, chunk);
            } else {
                compress64(&mut h64, chunk);
            }
        }

        let out: Vec<u8> = if narrow {
            h32.iter().flat_map(|x| x.to_be_bytes()).collect()
        } else {
            h64.iter().flat_map(|x| x.to_be_bytes()).collect()
        };
        Ok(out[..(self.bits / 8) as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qmhhuk256_abc() {
        let out = QmhHuk::new(256).compute_bytes(b"abc").unwrap();
        assert_eq!(
            hex::encode(out),
            "d40ec878bef405852b68068559ce0c99d55f0805b22d3f5f3bd034e3cc36465e"
        );
    }

    #[test]
    fn test_qmhhuk512_abc() {
        let out = QmhHuk::new(512).compute_bytes(b"abc").unwrap();
        assert_eq!(
            hex::encode(out),
            "0691b9a75bc88e37485c64eb4a26a23ff39fd09850e2bc83bcd920a253b2c003\
             1da687fa1b5ca95513a20e9af21a538b10270b77a8b32860f1447527ca37d0ee"
        );
    }

    #[test]
    fn test_pad_single_block() {
        // 10 message bytes leave room for the trailer in one block
        let q = QmhHuk::new(256);
        let padded = q.pad(&[0xAA; 10], 80);
        assert_eq!(padded.len(), 64);
        assert_eq!(padded[10], 0x80);
        assert_eq!(padded[11], PI_PAD[11]);
        assert_eq!(&padded[54..56], &[0x01, 0x00]); // 256 bits, BE
        assert_eq!(&padded[56..64], &80u64.to_be_bytes());
    }

    #[test]
    fn test_pad_carries_into_phi_block() {
        // 60 message bytes push the trailer into a second block
        let q = QmhHuk::new(256);
        let padded = q.pad(&[0xAA; 60], 480);
        assert_eq!(padded.len(), 128);
        assert_eq!(padded[60], 0x80);
        assert_eq!(padded[61], PI_PAD[61]);
        assert_eq!(padded[64], PHI_PAD[0]);
        assert_eq!(&padded[118..120], &[0x01, 0x00]);
        assert_eq!(&padded[120..128], &480u64.to_be_bytes());
    }

    #[test]
    fn test_width_changes_output() {
        let a = QmhHuk::new(224).compute_bytes(b"same").unwrap();
        let b = QmhHuk::new(256).compute_bytes(b"same").unwrap();
        assert_eq!(a.len(), 28);
        assert_eq!(b.len(), 32);
        assert_ne!(&a[..], &b[..28]);
    }

    #[test]
    fn test_unsupported_width_rejected() {
        assert!(QmhHuk::new(256).configure(160).is_err());
    }
}
