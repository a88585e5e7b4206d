//! JH (final-round 42-round version) at 224/256/384/512-bit widths
//!
//! The 1024-bit state is grouped into 256 4-bit elements whose bits are
//! drawn one from each state quarter. Each round applies the
//! constant-selected S-boxes, the GF(2^4) linear transform on pairs, and
//! the fixed permutation. Round constants iterate from frac(sqrt 2) by
//! the zero-constant degenerate round and are tabulated below. The
//! digest is the trailing bytes of the final state.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

const S0: [u8; 16] = [9, 0, 4, 11, 13, 12, 3, 15, 1, 10, 2, 6, 7, 5, 8, 14];
const S1: [u8; 16] = [3, 12, 6, 13, 5, 7, 1, 9, 15, 2, 0, 4, 11, 10, 14, 8];

// 42 round constants of E8, 32 bytes each
const ROUND_CONSTANTS: [u8; 1344] = [
    0x6A, 0x09, 0xE6, 0x67, 0xF3, 0xBC, 0xC9, 0x08, 0xB2, 0xFB, 0x13, 0x66,
    0xEA, 0x95, 0x7D, 0x3E, 0x3A, 0xDE, 0xC1, 0x75, 0x12, 0x77, 0x50, 0x99,
    0xDA, 0x2F, 0x59, 0x0B, 0x06, 0x67, 0x32, 0x2A, 0xBB, 0x89, 0x6B, 0xF0,
    0x59, 0x55, 0xAB, 0xCD, 0x52, 0x81, 0x82, 0x8D, 0x66, 0xE7, 0xD9, 0x9A,
    0xC4, 0x20, 0x34, 0x94, 0xF8, 0x9B, 0xF1, 0x28, 0x17, 0xDE, 0xB4, 0x32,
    0x88, 0x71, 0x22, 0x31, 0x18, 0x36, 0xE7, 0x6B, 0x12, 0xD7, 0x9C, 0x55,
    0x11, 0x8A, 0x11, 0x39, 0xD2, 0x41, 0x7D, 0xF5, 0x2A, 0x20, 0x21, 0x22,
    0x5F, 0xF6, 0x35, 0x00, 0x63, 0xD8, 0x8E, 0x5F, 0x1F, 0x91, 0x63, 0x1C,
    0x26, 0x30, 0x85, 0xA7, 0x00, 0x0F, 0xA9, 0xC3, 0x31, 0x7C, 0x6C, 0xA8,
    0xAB, 0x65, 0xF7, 0xA7, 0x71, 0x3C, 0xF4, 0x20, 0x10, 0x60, 0xCE, 0x88,
    0x6A, 0xF8, 0x55, 0xA9, 0x0D, 0x6A, 0x4E, 0xED, 0x1C, 0xEB, 0xAF, 0xD5,
    0x1A, 0x15, 0x6A, 0xEB, 0x62, 0xA1, 0x1F, 0xB3, 0xBE, 0x2E, 0x14, 0xF6,
    0x0B, 0x7E, 0x48, 0xDE, 0x85, 0x81, 0x42, 0x70, 0xFD, 0x62, 0xE9, 0x76,
    0x14, 0xD7, 0xB4, 0x41, 0xE5, 0x56, 0x4C, 0xB5, 0x74, 0xF7, 0xE0, 0x9C,
    0x75, 0xE2, 0xE2, 0x44, 0x92, 0x9E, 0x95, 0x49, 0x27, 0x9A, 0xB2, 0x24,
    0xA2, 0x8E, 0x44, 0x5D, 0x57, 0x18, 0x5E, 0x7D, 0x7A, 0x09, 0xFD, 0xC1,
    0x58, 0x20, 0xF0, 0xF0, 0xD7, 0x64, 0xCF, 0xF3, 0xA5, 0x55, 0x2A, 0x5E,
    0x41, 0xA8, 0x2B, 0x9E, 0xFF, 0x6E, 0xE0, 0xAA, 0x61, 0x57, 0x73, 0xBB,
    0x07, 0xE8, 0x60, 0x34, 0x24, 0xC3, 0xCF, 0x8A, 0xB1, 0x26, 0xFB, 0x74,
    0x17, 0x33, 0xC5, 0xBF, 0xCE, 0xF6, 0xF4, 0x3A, 0x62, 0xE8, 0xE5, 0x70,
    0x6A, 0x26, 0x65, 0x60, 0x28, 0xAA, 0x89, 0x7E, 0xC1, 0xEA, 0x46, 0x16,
    0xCE, 0x8F, 0xD5, 0x10, 0xDB, 0xF0, 0xDE, 0x32, 0xBC, 0xA7, 0x72, 0x54,
    0xBB, 0x4F, 0x56, 0x25, 0x81, 0xA3, 0xBC, 0x99, 0x1C, 0xF9, 0x4F, 0x22,
    0x56, 0x52, 0xC2, 0x7F, 0x14, 0xEA, 0xE9, 0x58, 0xAE, 0x6A, 0xA6, 0x16,
    0xE6, 0x11, 0x3B, 0xE6, 0x17, 0xF4, 0x5F, 0x3D, 0xE5, 0x3C, 0xFF, 0x03,
    0x91, 0x9A, 0x94, 0xC3, 0x2C, 0x92, 0x7B, 0x09, 0x3A, 0xC8, 0xF2, 0x3B,
    0x47, 0xF7, 0x18, 0x9A, 0xAD, 0xB9, 0xBC, 0x67, 0x80, 0xD0, 0xD2, 0x60,
    0x52, 0xCA, 0x45, 0xD5, 0x93, 0xAB, 0x5F, 0xB3, 0x10, 0x25, 0x06, 0x39,
    0x00, 0x83, 0xAF, 0xB5, 0xFF, 0xE1, 0x07, 0xDA, 0xCF, 0xCB, 0xA7, 0xDB,
    0xE6, 0x01, 0xA1, 0x2B, 0x43, 0xAF, 0x1C, 0x76, 0x12, 0x67, 0x14, 0xDF,
    0xA9, 0x50, 0xC3, 0x68, 0x78, 0x7C, 0x81, 0xAE, 0x3B, 0xEE, 0xCF, 0x95,
    0x6C, 0x85, 0xC9, 0x62, 0x08, 0x6A, 0xE1, 0x6E, 0x40, 0xEB, 0xB0, 0xB4,
    0x9A, 0xEE, 0x89, 0x94, 0xD2, 0xD7, 0x4A, 0x5C, 0xDB, 0x7B, 0x1E, 0xF2,
    0x94, 0xEE, 0xD5, 0xC1, 0x52, 0x07, 0x24, 0xDD, 0x8E, 0xD5, 0x8C, 0x92,
    0xD3, 0xF0, 0xE1, 0x74, 0xB0, 0xC3, 0x20, 0x45, 0x0B, 0x2A, 0xA5, 0x8C,
    0xEB, 0x3B, 0xDB, 0x9E, 0x1E, 0xEF, 0x66, 0xB3, 0x76, 0xE0, 0xC5, 0x65,
    0xD5, 0xD8, 0xFE, 0x7B, 0xAC, 0xB8, 0xDA, 0x86, 0x6F, 0x85, 0x9A, 0xC5,
    0x21, 0xF3, 0xD5, 0x71, 0x7A, 0x15, 0x23, 0xEF, 0x3D, 0x97, 0x0A, 0x3A,
    0x9B, 0x0B, 0x4D, 0x61, 0x0E, 0x02, 0x74, 0x9D, 0x37, 0xB8, 0xD5, 0x7C,
    0x18, 0x85, 0xFE, 0x42, 0x06, 0xA7, 0xF3, 0x38, 0xE8, 0x35, 0x68, 0x66,
    0x2C, 0x2D, 0xB8, 0xF7, 0x87, 0x66, 0x85, 0xF2, 0xCD, 0x9A, 0x2E, 0x0D,
    0xDB, 0x64, 0xC9, 0xD5, 0xBF, 0x13, 0x90, 0x53, 0x71, 0xFC, 0x39, 0xE0,
    0xFA, 0x86, 0xE1, 0x47, 0x72, 0x34, 0xA2, 0x97, 0x9D, 0xF0, 0x85, 0xEB,
    0x25, 0x44, 0xEB, 0xF6, 0x2B, 0x50, 0x68, 0x6A, 0x71, 0xE6, 0xE8, 0x28,
    0xDF, 0xED, 0x9D, 0xBE, 0x0B, 0x10, 0x6C, 0x94, 0x52, 0xCE, 0xDD, 0xFF,
    0x3D, 0x13, 0x89, 0x90, 0xE6, 0xE5, 0xC4, 0x2C, 0xB2, 0xD4, 0x60, 0xC9,
    0xD6, 0xE4, 0x79, 0x1A, 0x16, 0x81, 0xBB, 0x2E, 0x22, 0x2E, 0x54, 0x55,
    0x8E, 0xB7, 0x8D, 0x52, 0x44, 0xE2, 0x17, 0xD1, 0xBF, 0xCF, 0x50, 0x58,
    0x8F, 0x1F, 0x57, 0xE4, 0x4E, 0x12, 0x62, 0x10, 0xF0, 0x07, 0x63, 0xFF,
    0x57, 0xDA, 0x20, 0x8A, 0x50, 0x93, 0xB8, 0xFF, 0x79, 0x47, 0x53, 0x4A,
    0x4C, 0x26, 0x0A, 0x17, 0x64, 0x2F, 0x72, 0xB2, 0xAE, 0x4E, 0xF4, 0x79,
    0x2E, 0xA1, 0x48, 0x60, 0x8C, 0xF1, 0x16, 0xCB, 0x2B, 0xFF, 0x66, 0xE8,
    0xFC, 0x74, 0x81, 0x12, 0x66, 0xCD, 0x64, 0x11, 0x12, 0xCD, 0x17, 0x80,
    0x1E, 0xD3, 0x8B, 0x59, 0x91, 0xA7, 0x44, 0xEF, 0xBF, 0x68, 0xB1, 0x92,
    0xD0, 0x54, 0x9B, 0x60, 0x8B, 0xDB, 0x31, 0x91, 0xFC, 0x12, 0xA0, 0xE8,
    0x35, 0x43, 0xCE, 0xC5, 0xF8, 0x82, 0x25, 0x0B, 0x24, 0x4F, 0x78, 0xE4,
    0x4B, 0x5D, 0x27, 0xD3, 0x36, 0x8F, 0x9C, 0x17, 0xD4, 0xB2, 0xA2, 0xB2,
    0x16, 0xC7, 0xE7, 0x4E, 0x77, 0x14, 0xD2, 0xCC, 0x03, 0xE1, 0xE4, 0x45,
    0x88, 0xCD, 0x99, 0x36, 0xDE, 0x74, 0x35, 0x7C, 0x0E, 0xA1, 0x7C, 0xAF,
    0xB8, 0x28, 0x61, 0x31, 0xBD, 0xA9, 0xE3, 0x75, 0x7B, 0x36, 0x10, 0xAA,
    0x3F, 0x77, 0xA6, 0xD0, 0x57, 0x50, 0x53, 0xFC, 0x92, 0x6E, 0xEA, 0x7E,
    0x23, 0x7D, 0xF2, 0x89, 0x84, 0x8A, 0xF9, 0xF5, 0x7E, 0xB1, 0xA6, 0x16,
    0xE2, 0xC3, 0x42, 0xC8, 0xCE, 0xA5, 0x28, 0xB8, 0xA9, 0x5A, 0x5D, 0x16,
    0xD9, 0xD8, 0x7B, 0xE9, 0xBB, 0x37, 0x84, 0xD0, 0xC3, 0x51, 0xC3, 0x2B,
    0xC0, 0x43, 0x5C, 0xC3, 0x65, 0x4F, 0xB8, 0x5D, 0xD9, 0x33, 0x5B, 0xA9,
    0x1A, 0xC3, 0xDB, 0xDE, 0x1F, 0x85, 0xD5, 0x67, 0xD7, 0xAD, 0x16, 0xF9,
    0xDE, 0x6E, 0x00, 0x9B, 0xCA, 0x3F, 0x95, 0xB5, 0x92, 0x75, 0x47, 0xFE,
    0x5E, 0x5E, 0x45, 0xE2, 0xFE, 0x99, 0xF1, 0x65, 0x1E, 0xA1, 0xCB, 0xF0,
    0x97, 0xDC, 0x3A, 0x3D, 0x40, 0xDD, 0xD2, 0x1C, 0xEE, 0x26, 0x05, 0x43,
    0xC2, 0x88, 0xEC, 0x6B, 0xC1, 0x17, 0xA3, 0x77, 0x0D, 0x3A, 0x34, 0x46,
    0x9D, 0x50, 0xDF, 0xA7, 0xDB, 0x02, 0x03, 0x00, 0xD3, 0x06, 0xA3, 0x65,
    0x37, 0x4F, 0xA8, 0x28, 0xC8, 0xB7, 0x80, 0xEE, 0x1B, 0x9D, 0x7A, 0x34,
    0x8F, 0xF2, 0x17, 0x8A, 0xE2, 0xDB, 0xE5, 0xE8, 0x72, 0xFA, 0xC7, 0x89,
    0xA3, 0x4B, 0xC2, 0x28, 0xDE, 0xBF, 0x54, 0xA8, 0x82, 0x74, 0x3C, 0xAA,
    0xD1, 0x4F, 0x3A, 0x55, 0x0F, 0xDB, 0xE6, 0x8F, 0xAB, 0xD0, 0x6C, 0x52,
    0xED, 0x58, 0xFF, 0x09, 0x12, 0x05, 0xD0, 0xF6, 0x27, 0x57, 0x4C, 0x8C,
    0xBC, 0x1F, 0xE7, 0xCF, 0x79, 0x21, 0x0F, 0x5A, 0x22, 0x86, 0xF6, 0xE2,
    0x3A, 0x27, 0xEF, 0xA0, 0x63, 0x1F, 0x4A, 0xCB, 0x8D, 0x3C, 0xA4, 0x25,
    0x3E, 0x30, 0x18, 0x49, 0xF1, 0x57, 0x57, 0x1D, 0x32, 0x11, 0xB6, 0xC1,
    0x04, 0x53, 0x47, 0xBE, 0xFB, 0x7C, 0x77, 0xDF, 0x3C, 0x6C, 0xA7, 0xBD,
    0xAE, 0x88, 0xF2, 0x34, 0x2C, 0x23, 0x34, 0x45, 0x90, 0xBE, 0x20, 0x14,
    0xFA, 0xB4, 0xF1, 0x79, 0xFD, 0x4B, 0xF7, 0xC9, 0x0D, 0xB1, 0x4F, 0xA4,
    0x01, 0x8F, 0xCC, 0xE6, 0x89, 0xD2, 0x12, 0x7B, 0x93, 0xB8, 0x93, 0x85,
    0x54, 0x6D, 0x71, 0x37, 0x9F, 0xE4, 0x1C, 0x39, 0xBC, 0x60, 0x2E, 0x8B,
    0x7C, 0x8B, 0x2F, 0x78, 0xEE, 0x91, 0x4D, 0x1F, 0x0A, 0xF0, 0xD4, 0x37,
    0xA1, 0x89, 0xA8, 0xA4, 0x1D, 0x1E, 0x03, 0x6A, 0xBE, 0xEF, 0x3F, 0x44,
    0x84, 0x8C, 0xD7, 0x6E, 0xF6, 0xBA, 0xA8, 0x89, 0xFC, 0xEC, 0x56, 0xCD,
    0x79, 0x67, 0xEB, 0x90, 0x9A, 0x46, 0x4B, 0xFC, 0x23, 0xC7, 0x24, 0x35,
    0xA8, 0xE4, 0xED, 0xE4, 0xC5, 0xFE, 0x5E, 0x88, 0xD4, 0xFB, 0x19, 0x2E,
    0x0A, 0x08, 0x21, 0xE9, 0x35, 0xBA, 0x14, 0x5B, 0xBF, 0xC5, 0x9C, 0x25,
    0x08, 0x28, 0x27, 0x55, 0xA5, 0xDF, 0x53, 0xA5, 0x8E, 0x4E, 0x37, 0xA3,
    0xB9, 0x70, 0xF0, 0x79, 0xAE, 0x9D, 0x22, 0xA4, 0x99, 0xA7, 0x14, 0xC8,
    0x75, 0x76, 0x02, 0x73, 0xF7, 0x4A, 0x93, 0x98, 0x99, 0x5D, 0x32, 0xC0,
    0x50, 0x27, 0xD8, 0x10, 0x61, 0xCF, 0xA4, 0x27, 0x92, 0xF9, 0x3B, 0x9F,
    0xDE, 0x36, 0xEB, 0x16, 0x3E, 0x97, 0x87, 0x09, 0xFA, 0xFA, 0x76, 0x16,
    0xEC, 0x3C, 0x7D, 0xAD, 0x01, 0x35, 0x80, 0x6C, 0x3D, 0x91, 0xA2, 0x1B,
    0xF0, 0x37, 0xC5, 0xD9, 0x16, 0x23, 0x28, 0x8B, 0x7D, 0x03, 0x02, 0xC1,
    0xB9, 0x41, 0xB7, 0x26, 0x76, 0xA9, 0x43, 0xB3, 0x72, 0x65, 0x9D, 0xCD,
    0x7D, 0x6E, 0xF4, 0x08, 0xA1, 0x1B, 0x40, 0xC0, 0x2A, 0x30, 0x63, 0x54,
    0xCA, 0x3E, 0xA9, 0x0B, 0x0E, 0x97, 0xEA, 0xEB, 0xCE, 0xA0, 0xA6, 0xD7,
    0xC6, 0x52, 0x23, 0x99, 0xE8, 0x85, 0xC6, 0x13, 0xDE, 0x82, 0x49, 0x22,
    0xC8, 0x92, 0xC4, 0x90, 0x3C, 0xA6, 0xCD, 0xD7, 0x88, 0xA5, 0xBD, 0xC5,
    0xEF, 0x2D, 0xCE, 0xEB, 0x16, 0xBC, 0xA3, 0x1E, 0x0A, 0x0D, 0x2C, 0x7E,
    0x99, 0x21, 0xB6, 0xF7, 0x1D, 0x33, 0xE2, 0x5D, 0xD2, 0xF3, 0xCF, 0x53,
    0xF7, 0x25, 0x78, 0x72, 0x1D, 0xB5, 0x6B, 0xF8, 0xF4, 0x95, 0x38, 0xB0,
    0xAE, 0x6E, 0xA4, 0x70, 0xC2, 0xFB, 0x13, 0x39, 0xDD, 0x26, 0x33, 0x3F,
    0x13, 0x5F, 0x7D, 0xEF, 0x45, 0x37, 0x6E, 0xC0, 0xE4, 0x49, 0xA0, 0x3E,
    0xAB, 0x35, 0x9E, 0x34, 0x09, 0x5F, 0x8B, 0x4B, 0x55, 0xCD, 0x7A, 0xC7,
    0xC0, 0xEC, 0x65, 0x10, 0xF2, 0xC4, 0xCC, 0x79, 0xFA, 0x6B, 0x1F, 0xEE,
    0x6B, 0x18, 0xC5, 0x9E, 0x73, 0xBD, 0x69, 0x78, 0xC5, 0x9F, 0x2B, 0x21,
    0x94, 0x49, 0xB3, 0x67, 0x70, 0xFB, 0x31, 0x3F, 0xBE, 0x2D, 0xA2, 0x8F,
    0x6B, 0x04, 0x27, 0x5F, 0x07, 0x1A, 0x1B, 0x19, 0x3D, 0xDE, 0x20, 0x72,
];

/// Doubling in GF(2^4) with polynomial x^4 + x + 1
fn mul2(x: u8) -> u8 {
    ((x << 1) ^ if x & 8 != 0 { 0b0011 } else { 0 }) & 0xF
}

/// One round over `n` 4-bit elements; selector bits pick S0 or S1
fn round(elems: &mut [u8], sel: impl Fn(usize) -> u8) {
    let n = elems.len();
    for (i, e) in elems.iter_mut().enumerate() {
        *e = if sel(i) == 0 {
            S0[*e as usize]
        } else {
            S1[*e as usize]
        };
    }
    for i in (0..n).step_by(2) {
        elems[i + 1] ^= mul2(elems[i]);
        elems[i] ^= mul2(elems[i + 1]);
    }
    // pi: swap the last two elements of every quad
    for i in (0..n).step_by(4) {
        elems.swap(i + 2, i + 3);
    }
    // P': evens to the first half, odds to the second
    let half = n / 2;
    let prev = elems.to_vec();
    for i in 0..half {
        elems[i] = prev[2 * i];
        elems[i + half] = prev[2 * i + 1];
    }
    // phi: swap adjacent pairs in the second half
    for i in (half..n).step_by(2) {
        elems.swap(i, i + 1);
    }
}

fn state_bit(state: &[u8; 128], i: usize) -> u8 {
    (state[i >> 3] >> (7 - (i & 7))) & 1
}

/// The E8 permutation on the 128-byte state
fn e8(state: &mut [u8; 128]) {
    let mut elems = [0u8; 256];
    for (i, e) in elems.iter_mut().enumerate() {
        *e = (state_bit(state, i) << 3)
            | (state_bit(state, i + 256) << 2)
            | (state_bit(state, i + 512) << 1)
            | state_bit(state, i + 768);
    }
    for r in 0..42 {
        let rc = &ROUND_CONSTANTS[r * 32..(r + 1) * 32];
        round(&mut elems, |i| (rc[i >> 3] >> (7 - (i & 7))) & 1);
    }
    *state = [0u8; 128];
    for (i, &e) in elems.iter().enumerate() {
        for (shift, offset) in [(3, 0), (2, 256), (1, 512), (0, 768)] {
            if (e >> shift) & 1 != 0 {
                let bit = i + offset;
                state[bit >> 3] |= 1 << (7 - (bit & 7));
            }
        }
    }
}

/// The F8 compression: xor in, permute, xor out
fn f8(state: &mut [u8; 128], block: &[u8; 64]) {
    for (s, b) in state.iter_mut().zip(block) {
        *s ^= b;
    }
    e8(state);
    for (s, b) in state[64..].iter_mut().zip(block) {
        *s ^= b;
    }
}

/// JH digest at 224/256/384/512-bit output widths
pub struct Jh {
    bits: u32,
}

impl Jh {
    /// Create an instance at the given width
    pub fn new(bits: u32) -> Self {
        let mut jh = Self { bits: 256 };
        jh.configure(bits).ok();
        jh
    }
}

impl Digest for Jh {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "JH does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        // H(0) = E8 of the all-zero state carrying the digest width
        let mut state = [0u8; 128];
        state[..2].copy_from_slice(&(self.bits as u16).to_be_bytes());
        f8(&mut state, &[0u8; 64]);

        let mut block = [0u8; 64];
        let mut bitlen = 0u128;
        let rest_len = loop {
            let n = source.fill(&mut block)?;
            bitlen += (n as u128) * 8;
            if n < 64 {
                break n;
            }
            f8(&mut state, &block);
        };

        // padding is always at least one full block; the length block
        // carries nothing but the 128-bit big-endian message length
        let mut last = [0u8; 64];
        if rest_len == 0 {
            last[0] = 0x80;
            last[48..].copy_from_slice(&bitlen.to_be_bytes());
            f8(&mut state, &last);
        } else {
            last[..rest_len].copy_from_slice(&block[..rest_len]);
            last[rest_len] = 0x80;
            f8(&mut state, &last);
            last = [0u8; 64];
            last[48..].copy_from_slice(&bitlen.to_be_bytes());
            f8(&mut state, &last);
        }

        let out_len = (self.bits / 8) as usize;
        Ok(state[128 - out_len..].to_vec())
    }
}
