/// Unified error type for all primitives operations.
///
/// Covers errors from key parsing, signing, compact signature decoding,
/// public key recovery and address encoding. No variant ever carries
/// private key material.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signing failed: {0}")]
    SigningError(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("unknown recovery header: {0}")]
    UnknownRecoveryHeader(u8),

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
