//! Bitcoin Signed Message signing and verification.
//!
//! The signed digest is
//! `SHA256(SHA256(varint(len(magic)) ‖ magic ‖ varint(len(message)) ‖ message))`
//! and signatures use the 65-byte compact encoding.

use btcstake_primitives::address::Address;
use btcstake_primitives::ec::signature::COMPACT_SIGNATURE_HEX_LEN;
use btcstake_primitives::ec::{CompactSignature, PrivateKey, PublicKey};
use btcstake_primitives::hash::sha256d;
use btcstake_primitives::util::ByteWriter;

use crate::config::BITCOIN_SIGNED_MESSAGE_MAGIC;
use crate::{Config, MessageError};

/// Digest of `message` under the Bitcoin Signed Message scheme.
pub fn magic_hash(message: &[u8]) -> [u8; 32] {
    magic_hash_with(BITCOIN_SIGNED_MESSAGE_MAGIC, message)
}

/// Digest of `message` under an arbitrary magic prefix.
pub fn magic_hash_with(magic: &str, message: &[u8]) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(magic.len() + message.len() + 10);
    writer.write_var_bytes(magic.as_bytes());
    writer.write_var_bytes(message);
    sha256d(writer.as_bytes())
}

/// Sign `message` and return the compact signature as 130 lowercase hex characters.
///
/// The header byte is `27 + recovery_id`, plus 4 when `compressed` is set.
/// Signing is deterministic (RFC6979): the same message and key always
/// produce the same signature.
///
/// # Errors
/// `InvalidPrivateKey` for a malformed or out-of-range key, `SigningError`
/// if the signer fails.
pub fn sign(message: &str, private_key_hex: &str, compressed: bool) -> Result<String, MessageError> {
    sign_with_config(
        message,
        private_key_hex,
        &Config::bitcoin().with_compressed(compressed),
    )
}

/// Sign `message` using the magic prefix and compression flag of `config`.
pub fn sign_with_config(
    message: &str,
    private_key_hex: &str,
    config: &Config,
) -> Result<String, MessageError> {
    Ok(sign_compact(message, private_key_hex, config)?.to_hex())
}

/// Sign `message` and return the signature in Bitcoin Core's base64 form.
pub fn sign_base64(
    message: &str,
    private_key_hex: &str,
    compressed: bool,
) -> Result<String, MessageError> {
    let config = Config::bitcoin().with_compressed(compressed);
    Ok(sign_compact(message, private_key_hex, &config)?.to_base64())
}

#[tracing::instrument(level = "debug", skip_all, fields(message_len = message.len()))]
fn sign_compact(
    message: &str,
    private_key_hex: &str,
    config: &Config,
) -> Result<CompactSignature, MessageError> {
    // The key is dropped, and its scalar zeroized, on every return path.
    let private_key = PrivateKey::from_hex(private_key_hex)?;
    let hash = magic_hash_with(config.magic, message.as_bytes());
    let signature = private_key.sign_compact(&hash, config.compressed)?;

    tracing::debug!(
        header = signature.header().byte(),
        recovery_id = signature.header().recovery_id(),
        "signed message"
    );
    Ok(signature)
}

/// Recover the signer's public key from a Bitcoin Signed Message signature.
///
/// `signature` may be 130 hex characters or Bitcoin Core base64.
pub fn recover_public_key(message: &str, signature: &str) -> Result<PublicKey, MessageError> {
    recover_public_key_with(message, signature, &Config::bitcoin())
}

/// Recover the signer's public key using the magic prefix of `config`.
pub fn recover_public_key_with(
    message: &str,
    signature: &str,
    config: &Config,
) -> Result<PublicKey, MessageError> {
    let signature = parse_signature(signature)?;
    let hash = magic_hash_with(config.magic, message.as_bytes());
    Ok(signature.recover_public_key(&hash)?)
}

/// Check that `signature` over `message` was made by the key behind the P2PKH `address`.
///
/// The key is re-encoded compressed or uncompressed as the header says
/// before hashing, so a signature only matches the address form it was
/// made for.
///
/// # Returns
/// `Ok(true)` on a match, `Ok(false)` if the recovered key belongs to a
/// different address or no key can be recovered. Malformed signatures,
/// unknown headers and invalid addresses are errors.
pub fn verify(message: &str, signature: &str, address: &str) -> Result<bool, MessageError> {
    verify_with(message, signature, address, &Config::bitcoin())
}

/// Verify using the magic prefix of `config`. The network is taken from `address`.
pub fn verify_with(
    message: &str,
    signature: &str,
    address: &str,
    config: &Config,
) -> Result<bool, MessageError> {
    let expected = Address::from_string(address)?;
    let signature = parse_signature(signature)?;
    let hash = magic_hash_with(config.magic, message.as_bytes());

    let recovered = match signature.recover_public_key(&hash) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(error = %e, "signature does not recover a public key");
            return Ok(false);
        }
    };
    let actual = recovered.to_address(signature.header().is_compressed(), expected.network);
    Ok(actual == expected)
}

fn parse_signature(signature: &str) -> Result<CompactSignature, MessageError> {
    let parsed = if signature.len() == COMPACT_SIGNATURE_HEX_LEN {
        CompactSignature::from_hex(signature)?
    } else {
        CompactSignature::from_base64(signature)?
    };
    Ok(parsed)
}
