//! FIPS 180-4 family, delegated to the RustCrypto implementations
//!
//! The engine streams fixed-size blocks from the message source (64 bytes
//! for the 32-bit variants, 128 for the 64-bit ones) and feeds them to
//! the delegate hasher, so sources of unknown length work unchanged.

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::source::MessageSource;

/// SHA-1 / SHA-2 digest at a configurable width
pub struct Sha {
    bits: u32,
}

impl Sha {
    /// Create an instance at the given width; an unsupported width
    /// leaves the default 256-bit configuration in place
    pub fn new(bits: u32) -> Self {
        let mut sha = Self { bits: 256 };
        sha.configure(bits).ok();
        sha
    }
}

fn stream<D: sha2::digest::Digest>(
    source: &mut dyn MessageSource,
    block_len: usize,
) -> Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut block = vec![0u8; block_len];
    loop {
        let n = source.fill(&mut block)?;
        if n > 0 {
            hasher.update(&block[..n]);
        }
        if n < block_len {
            break;
        }
    }
    Ok(hasher.finalize().to_vec())
}

impl Digest for Sha {
    fn configure(&mut self, bits: u32) -> Result<()> {
        match bits {
            160 | 224 | 256 | 384 | 512 => {
                self.bits = bits;
                Ok(())
            }
            _ => Err(Error::invalid_config(format!(
                "SHA does not support a {}-bit output",
                bits
            ))),
        }
    }

    fn output_bits(&self) -> u32 {
        self.bits
    }

    fn compute(&mut self, source: &mut dyn MessageSource) -> Result<Vec<u8>> {
        match self.bits {
            160 => stream::<sha1::Sha1>(source, 64),
            224 => stream::<sha2::Sha224>(source, 64),
            256 => stream::<sha2::Sha256>(source, 64),
            384 => stream::<sha2::Sha384>(source, 128),
            512 => stream::<sha2::Sha512>(source, 128),
            _ => unreachable!("configure() rejects unsupported widths"),
        }
    }
}
