//! Digest algorithms and the identifier registry
//!
//! Every algorithm family implements the [`Digest`] trait: configure an
//! output width, then compute digests over message sources. The
//! [`DigestId`] enumeration is the stable external identifier; its
//! numeric ordering is part of the crate contract.

mod blake;
mod groestl;
mod jh;
mod qmhhuk;
mod sha;
mod skein;

pub use blake::Blake;
pub use groestl::Groestl;
pub use jh::Jh;
pub use qmhhuk::QmhHuk;
pub use sha::Sha;
pub use skein::Skein;

use crate::error::Result;
use crate::source::{MessageSource, SliceSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configurable message digest
pub trait Digest {
    /// Set the output width in bits; fails with `InvalidConfig` if the
    /// algorithm does not support the width
    fn configure(&mut self, bits: u32) -> Result<()>;

    /// Currently configured output width in bits
    fn output_bits(&self) -> u32;

    /// Consume `source` to end of input and return the digest. Scratch
    /// state is scoped to the call; the instance is immediately reusable.
    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>>;

    /// Compute the digest of an in-memory byte slice
    fn compute_bytes(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.compute(&mut SliceSource::new(bytes))
    }
}

/// Stable identifier for every digest algorithm and output width
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum DigestId {
    /// SHA-1, 160-bit output
    Sha1 = 0,
    /// SHA-256
    Sha256 = 1,
    /// SHA-384
    Sha384 = 2,
    /// SHA-512
    Sha512 = 3,
    /// Blake-224
    Blake224 = 4,
    /// Blake-256
    Blake256 = 5,
    /// Blake-384
    Blake384 = 6,
    /// Blake-512
    Blake512 = 7,
    /// Grøstl-224
    Groestl224 = 8,
    /// Grøstl-256
    Groestl256 = 9,
    /// Grøstl-384
    Groestl384 = 10,
    /// Grøstl-512
    Groestl512 = 11,
    /// JH-224
    Jh224 = 12,
    /// JH-256
    Jh256 = 13,
    /// JH-384
    Jh384 = 14,
    /// JH-512
    Jh512 = 15,
    /// Skein-512-224
    Skein224 = 16,
    /// Skein-512-256
    Skein256 = 17,
    /// Skein-512-384
    Skein384 = 18,
    /// Skein-512-512
    Skein512 = 19,
    /// QmhHuk-224
    QmhHuk224 = 20,
    /// QmhHuk-256
    QmhHuk256 = 21,
    /// QmhHuk-384
    QmhHuk384 = 22,
    /// QmhHuk-512
    QmhHuk512 = 23,
}

impl DigestId {
    /// Every identifier, in numeric order
    pub const ALL: [DigestId; 24] = [
        DigestId::Sha1,
        DigestId::Sha256,
        DigestId::Sha384,
        DigestId::Sha512,
        DigestId::Blake224,
        DigestId::Blake256,
        DigestId::Blake384,
        DigestId::Blake512,
        DigestId::Groestl224,
        DigestId::Groestl256,
        DigestId::Groestl384,
        DigestId::Groestl512,
        DigestId::Jh224,
        DigestId::Jh256,
        DigestId::Jh384,
        DigestId::Jh512,
        DigestId::Skein224,
        DigestId::Skein256,
        DigestId::Skein384,
        DigestId::Skein512,
        DigestId::QmhHuk224,
        DigestId::QmhHuk256,
        DigestId::QmhHuk384,
        DigestId::QmhHuk512,
    ];

    /// Numeric code of this identifier
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Output width in bits
    pub const fn output_bits(self) -> u32 {
        match self {
            DigestId::Sha1 => 160,
            DigestId::Sha256 => 256,
            DigestId::Sha384 => 384,
            DigestId::Sha512 => 512,
            DigestId::Blake224
            | DigestId::Groestl224
            | DigestId::Jh224
            | DigestId::Skein224
            | DigestId::QmhHuk224 => 224,
            DigestId::Blake256
            | DigestId::Groestl256
            | DigestId::Jh256
            | DigestId::Skein256
            | DigestId::QmhHuk256 => 256,
            DigestId::Blake384
            | DigestId::Groestl384
            | DigestId::Jh384
            | DigestId::Skein384
            | DigestId::QmhHuk384 => 384,
            DigestId::Blake512
            | DigestId::Groestl512
            | DigestId::Jh512
            | DigestId::Skein512
            | DigestId::QmhHuk512 => 512,
        }
    }

    /// Output width in bytes
    pub const fn output_len(self) -> usize {
        (self.output_bits() / 8) as usize
    }

    /// Stable lowercase label
    pub const fn label(self) -> &'static str {
        match self {
            DigestId::Sha1 => "sha1",
            DigestId::Sha256 => "sha256",
            DigestId::Sha384 => "sha384",
            DigestId::Sha512 => "sha512",
            DigestId::Blake224 => "blake-224",
            DigestId::Blake256 => "blake-256",
            DigestId::Blake384 => "blake-384",
            DigestId::Blake512 => "blake-512",
            DigestId::Groestl224 => "groestl-224",
            DigestId::Groestl256 => "groestl-256",
            DigestId::Groestl384 => "groestl-384",
            DigestId::Groestl512 => "groestl-512",
            DigestId::Jh224 => "jh-224",
            DigestId::Jh256 => "jh-256",
            DigestId::Jh384 => "jh-384",
            DigestId::Jh512 => "jh-512",
            DigestId::Skein224 => "skein-224",
            DigestId::Skein256 => "skein-256",
            DigestId::Skein384 => "skein-384",
            DigestId::Skein512 => "skein-512",
            DigestId::QmhHuk224 => "qmhhuk-224",
            DigestId::QmhHuk256 => "qmhhuk-256",
            DigestId::QmhHuk384 => "qmhhuk-384",
            DigestId::QmhHuk512 => "qmhhuk-512",
        }
    }
}

impl fmt::Display for DigestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Create a freshly configured digest instance for an identifier
pub fn create(id: DigestId) -> Box<dyn Digest> {
    let bits = id.output_bits();
    match id {
        DigestId::Sha1 | DigestId::Sha256 | DigestId::Sha384 | DigestId::Sha512 => {
            Box::new(Sha::new(bits))
        }
        DigestId::Blake224 | DigestId::Blake256 | DigestId::Blake384 | DigestId::Blake512 => {
            Box::new(Blake::new(bits))
        }
        DigestId::Groestl224
        | DigestId::Groestl256
        | DigestId::Groestl384
        | DigestId::Groestl512 => Box::new(Groestl::new(bits)),
        DigestId::Jh224 | DigestId::Jh256 | DigestId::Jh384 | DigestId::Jh512 => {
            Box::new(Jh::new(bits))
        }
        DigestId::Skein224 | DigestId::Skein256 | DigestId::Skein384 | DigestId::Skein512 => {
            Box::new(Skein::new(bits))
        }
        DigestId::QmhHuk224
        | DigestId::QmhHuk256
        | DigestId::QmhHuk384
        | DigestId::QmhHuk512 => Box::new(QmhHuk::new(bits)),
    }
}
