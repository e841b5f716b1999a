#![deny(missing_docs)]

//! btcstake - Bitcoin Signed Message signing and signature recovery.
//!
//! Derives public key coordinates from a private scalar, signs messages
//! with deterministic compact ECDSA signatures, splits signatures into
//! their `(v, r, s, recoveryId)` fields, and recovers and verifies signers.

mod error;
pub mod config;
pub mod keypair;
pub mod signed;
pub mod split;

pub use config::Config;
pub use error::MessageError;
pub use keypair::{derive_key_pair, KeyPair};
pub use signed::{
    magic_hash, recover_public_key, recover_public_key_with, sign, sign_base64,
    sign_with_config, verify, verify_with,
};
pub use split::{split_signature, SplitSignature};
