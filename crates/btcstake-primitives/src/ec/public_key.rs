//! secp256k1 public key.
//!
//! Supports compressed/uncompressed SEC1 serialization, raw coordinate
//! access, and P2PKH address derivation.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::AffinePoint;

use crate::address::{Address, Network};
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
pub const UNCOMPRESSED_LEN: usize = 65;

/// A secp256k1 public key.
///
/// Wraps a k256 `VerifyingKey`; equality compares the curve point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from raw SEC1 encoded bytes.
    ///
    /// Accepts both compressed (33-byte) and uncompressed (65-byte) formats.
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the bytes don't represent a valid point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            ));
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| PrimitivesError::InvalidPublicKey(hex::encode(bytes)))?;
        Ok(PublicKey { inner: vk })
    }

    /// Create a PublicKey from a hex-encoded SEC1 string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of a compressed (66 chars) or uncompressed (130 chars) key.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the 32-byte X coordinate.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key in uncompressed SEC1 format (65 bytes).
    ///
    /// The first byte is 0x04, followed by 32-byte X and 32-byte Y coordinates.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize in the requested SEC1 form.
    pub fn to_sec1(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            self.to_compressed().to_vec()
        } else {
            self.to_uncompressed().to_vec()
        }
    }

    /// The affine X coordinate, 32 bytes big-endian.
    pub fn x(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_uncompressed()[1..33]);
        out
    }

    /// The affine Y coordinate, 32 bytes big-endian.
    pub fn y(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.to_uncompressed()[33..65]);
        out
    }

    /// Serialize the public key as a lowercase hexadecimal string (compressed format).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Hash160 of the SEC1 encoding selected by `compressed`.
    pub fn hash160(&self, compressed: bool) -> [u8; 20] {
        hash160(&self.to_sec1(compressed))
    }

    /// Derive the P2PKH address for this key.
    ///
    /// Compressed and uncompressed encodings of the same point hash to
    /// different addresses, so the caller picks the encoding the address
    /// was created with.
    pub fn to_address(&self, compressed: bool, network: Network) -> Address {
        Address::from_public_key_hash(&self.hash160(compressed), network)
    }

    /// Construct a PublicKey from a k256 `VerifyingKey`.
    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: vk.clone() }
    }

    /// Construct a PublicKey from an affine point, rejecting the identity.
    pub(crate) fn from_affine(point: AffinePoint) -> Result<Self, PrimitivesError> {
        let vk = VerifyingKey::from_affine(point).map_err(|_| {
            PrimitivesError::InvalidPublicKey("point at infinity".to_string())
        })?;
        Ok(PublicKey { inner: vk })
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
