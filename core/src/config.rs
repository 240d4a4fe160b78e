//! Configuration values passed to the SDK components at construction.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::types::Network;

/// Default base URL of the NFTfi SDK API.
pub const DEFAULT_API_URL: &str = "https://sdk-api.nftfi.com";

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL of the API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key sent as `X-API-Key` on every request.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Chain the signatures are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
}

impl From<Network> for ChainConfig {
    fn from(network: Network) -> Self {
        Self {
            chain_id: network.chain_id(),
        }
    }
}

/// Gnosis Safe deployment controlled by a multisig owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeConfig {
    pub address: Address,
}

/// Multisig descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigConfig {
    pub safe: SafeConfig,
}

impl MultisigConfig {
    pub fn new(safe_address: Address) -> Self {
        Self {
            safe: SafeConfig {
                address: safe_address,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults_base_url() {
        let config: ApiConfig = serde_json::from_str(r#"{"apiKey":"abc"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_multisig_config_wire_shape() {
        let config: MultisigConfig = serde_json::from_str(
            r#"{"safe":{"address":"0x00000000000000000000000000000000000000aa"}}"#,
        )
        .unwrap();
        assert_eq!(config.safe.address, Address::with_last_byte(0xaa));

        let chain: ChainConfig = serde_json::from_str(r#"{"chainId":5}"#).unwrap();
        assert_eq!(chain, ChainConfig::from(Network::Goerli));
    }
}
