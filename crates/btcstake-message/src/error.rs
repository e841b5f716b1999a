use btcstake_primitives::PrimitivesError;

/// Error types for message operations.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The private key is not 64 hex characters or not in `[1, n-1]`.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    /// Nonce generation or curve arithmetic failed while signing.
    #[error("signing failed: {0}")]
    SigningError(String),
    /// The signature is not a 65-byte compact signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// The header byte is outside `27..=34`.
    #[error("unknown recovery header {0}: expected a value in 27..=34")]
    UnknownRecoveryHeader(u8),
    /// No public key could be recovered from the signature.
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
    /// The address is not a valid P2PKH address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<PrimitivesError> for MessageError {
    fn from(e: PrimitivesError) -> Self {
        match e {
            PrimitivesError::InvalidPrivateKey(msg) => MessageError::InvalidPrivateKey(msg),
            PrimitivesError::SigningError(msg) => MessageError::SigningError(msg),
            PrimitivesError::InvalidRecoveryId(id) => {
                MessageError::SigningError(format!("invalid recovery id {}", id))
            }
            PrimitivesError::MalformedSignature(msg) | PrimitivesError::InvalidHex(msg) => {
                MessageError::MalformedSignature(msg)
            }
            PrimitivesError::UnknownRecoveryHeader(byte) => {
                MessageError::UnknownRecoveryHeader(byte)
            }
            PrimitivesError::RecoveryFailed(msg) | PrimitivesError::InvalidPublicKey(msg) => {
                MessageError::RecoveryFailed(msg)
            }
            PrimitivesError::InvalidAddress(msg) => MessageError::InvalidAddress(msg),
            PrimitivesError::ChecksumMismatch => {
                MessageError::InvalidAddress("checksum mismatch".to_string())
            }
        }
    }
}
