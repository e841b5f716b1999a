//! P2PKH address handling.
//!
//! Encodes and decodes Base58Check P2PKH addresses for mainnet and testnet.
//! These are the only addresses a compact message signature with a header
//! in `27..=34` can attest to.

use std::fmt;

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Bitcoin network type for address prefix selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Network {
    /// Bitcoin mainnet (address prefix 0x00, starts with '1').
    #[default]
    Mainnet,
    /// Bitcoin testnet (address prefix 0x6f, starts with 'm' or 'n').
    Testnet,
}

impl Network {
    fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        }
    }
}

/// A P2PKH address: a 20-byte public key hash on a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded P2PKH address string.
    ///
    /// Decodes the string, validates the checksum, and detects the network
    /// from the version byte (0x00 = mainnet, 0x6f = testnet).
    ///
    /// # Returns
    /// An `Address`, `ChecksumMismatch` on a bad checksum, or
    /// `InvalidAddress` for anything else.
    pub fn from_string(addr: &str) -> Result<Self, PrimitivesError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| PrimitivesError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(PrimitivesError::InvalidAddress(format!(
                "invalid address length for '{}'",
                addr
            )));
        }

        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            _ => {
                return Err(PrimitivesError::InvalidAddress(format!(
                    "address not supported {}",
                    addr
                )))
            }
        };

        let mut public_key_hash = [0u8; 20];
        public_key_hash.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            public_key_hash,
            network,
        })
    }

    /// Create an address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Address {
            public_key_hash: *hash,
            network,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(25);
        payload.push(self.network.p2pkh_version());
        payload.extend_from_slice(&self.public_key_hash);
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        write!(f, "{}", bs58::encode(payload).into_string())
    }
}
