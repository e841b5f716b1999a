/// btcstake - Cryptographic primitives for Bitcoin message signing.
///
/// This crate provides the building blocks used by `btcstake-message`:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Variable-length integer encoding and a byte writer
/// - Elliptic curve cryptography (secp256k1 keys, compact recoverable signatures)
/// - P2PKH address encoding and decoding

pub mod hash;
pub mod util;
pub mod ec;
pub mod address;

mod error;
pub use error::PrimitivesError;
