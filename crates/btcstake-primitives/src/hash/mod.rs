//! Hash function primitives.
//!
//! SHA-256 and double SHA-256 back the Bitcoin Signed Message digest;
//! RIPEMD-160 and Hash160 back P2PKH address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Computes SHA-256(SHA-256(data)). This is the digest signed by
/// Bitcoin's message signing scheme and the Base58Check checksum source.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// Applied to a SEC1-encoded public key it yields the P2PKH payload.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}
