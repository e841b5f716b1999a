//! Public key derivation from a private scalar.

use serde::Serialize;

use btcstake_primitives::ec::{PrivateKey, PublicKey};

use crate::MessageError;

/// Public key coordinates and SEC1 encodings, all lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    /// X coordinate, 64 hex characters.
    pub x: String,
    /// Y coordinate, 64 hex characters.
    pub y: String,
    /// `02`/`03` prefix followed by X.
    pub compressed: String,
    /// `04` prefix followed by X and Y.
    pub uncompressed: String,
}

impl From<&PublicKey> for KeyPair {
    fn from(public_key: &PublicKey) -> Self {
        KeyPair {
            x: hex::encode(public_key.x()),
            y: hex::encode(public_key.y()),
            compressed: hex::encode(public_key.to_compressed()),
            uncompressed: hex::encode(public_key.to_uncompressed()),
        }
    }
}

/// Derive the public key for `private_key_hex`.
///
/// The input must be exactly 64 hex characters encoding a scalar in
/// `[1, n-1]`. The private key is dropped, and its scalar wiped, before
/// this function returns.
pub fn derive_key_pair(private_key_hex: &str) -> Result<KeyPair, MessageError> {
    let public_key = PrivateKey::from_hex(private_key_hex)?.pub_key();
    tracing::debug!(public_key = %public_key, "derived public key");
    Ok(KeyPair::from(&public_key))
}
