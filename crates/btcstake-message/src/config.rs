//! Signing configuration.

use btcstake_primitives::address::Network;

/// Magic prefix of the Bitcoin Signed Message scheme.
pub const BITCOIN_SIGNED_MESSAGE_MAGIC: &str = "Bitcoin Signed Message:\n";

/// Message signing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Prefix hashed ahead of every message.
    pub magic: &'static str,
    /// Whether signatures mark the signer's key as compressed.
    pub compressed: bool,
    /// Network used when deriving addresses.
    pub network: Network,
}

impl Config {
    /// Bitcoin mainnet, compressed keys.
    pub fn bitcoin() -> Self {
        Config {
            magic: BITCOIN_SIGNED_MESSAGE_MAGIC,
            compressed: true,
            network: Network::Mainnet,
        }
    }

    /// Bitcoin testnet, compressed keys.
    pub fn testnet() -> Self {
        Config {
            network: Network::Testnet,
            ..Self::bitcoin()
        }
    }

    /// Return a copy with the compression flag replaced.
    pub fn with_compressed(self, compressed: bool) -> Self {
        Config { compressed, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::bitcoin()
    }
}
