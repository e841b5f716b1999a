//! secp256k1 private key.
//!
//! Wraps a k256 signing key. The secret scalar is only ever decoded into
//! zeroizing buffers, and `SigningKey` wipes its scalar when dropped, so a
//! `PrivateKey` leaves nothing behind once it goes out of scope.

use std::fmt;

use k256::ecdsa::SigningKey;
use zeroize::Zeroizing;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::{CompactSignature, RecoveryHeader};
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Length of a hex-encoded private key in characters.
const PRIVATE_KEY_HEX_LEN: usize = PRIVATE_KEY_BYTES_LEN * 2;

/// A secp256k1 private key for deterministic message signing.
///
/// Scalar multiplication and signing run on k256's constant-time
/// arithmetic. `Debug` never prints the scalar.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a scalar in `[1, n-1]`,
    /// or `InvalidPrivateKey` for any other length or value.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| {
            PrimitivesError::InvalidPrivateKey(
                "scalar must be non-zero and below the curve order".to_string(),
            )
        })?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a hexadecimal string.
    ///
    /// The string must be exactly 64 hex characters; it is never truncated
    /// or padded.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string representing the 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or `InvalidPrivateKey` otherwise.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != PRIVATE_KEY_HEX_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} hex characters, got {}",
                PRIVATE_KEY_HEX_LEN,
                hex_str.len()
            )));
        }
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        hex::decode_to_slice(hex_str, &mut bytes[..]).map_err(|_| {
            PrimitivesError::InvalidPrivateKey("private key is not valid hex".to_string())
        })?;
        Self::from_bytes(&bytes[..])
    }

    /// Derive the corresponding public key `k·G`.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest and encode the result as a compact signature.
    ///
    /// Uses RFC6979 deterministic nonces and produces a low-S signature;
    /// the recovery id accounts for the normalization.
    ///
    /// # Arguments
    /// * `hash` - The 32-byte digest to sign.
    /// * `compressed` - Whether the header should mark the key as compressed.
    ///
    /// # Returns
    /// `Ok(CompactSignature)` on success, or `SigningError` if the signer
    /// fails or reports a recovery id outside the header table.
    pub fn sign_compact(
        &self,
        hash: &[u8; 32],
        compressed: bool,
    ) -> Result<CompactSignature, PrimitivesError> {
        let (k256_sig, recovery_id) = self
            .inner
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::SigningError(e.to_string()))?;

        let header = RecoveryHeader::new(recovery_id.to_byte(), compressed).map_err(|e| {
            PrimitivesError::SigningError(e.to_string())
        })?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        Ok(CompactSignature::new(header, r_bytes.into(), s_bytes.into()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}
