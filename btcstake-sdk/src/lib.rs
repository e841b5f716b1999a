#![deny(missing_docs)]

//! btcstake SDK.
//!
//! Re-exports the signing components for single-crate usage.

pub use btcstake_message as message;
pub use btcstake_primitives as primitives;

pub use btcstake_message::{
    derive_key_pair, recover_public_key, sign, split_signature, verify, Config, KeyPair,
    MessageError, SplitSignature,
};
