//! Shared types for the NFTfi Client SDK.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde module for `U256` amounts carried as decimal strings on the wire.
///
/// Numbers are accepted on input as well, since older API responses used them
/// for small values.
pub(crate) mod u256_dec {
    use super::*;
    use alloy_primitives::U256;
    use serde_json::Value;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            Value::Number(n) => n
                .as_u64()
                .map(U256::from)
                .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer")),
            other => Err(serde::de::Error::custom(format!(
                "expected a decimal string, got {other}"
            ))),
        }
    }
}

/// Deserialize a loosely typed flag.
///
/// `null`, `false`, `0` and `""` read as false; any other value reads as true.
pub(crate) fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// EVM network the SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet.
    Mainnet,
    /// Sepolia testnet.
    Sepolia,
    /// Goerli testnet (deprecated, kept for old deployments).
    Goerli,
    /// Local development chain (anvil/hardhat).
    Local,
}

impl Network {
    /// EIP-155 chain id of the network.
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Sepolia => 11_155_111,
            Network::Goerli => 5,
            Network::Local => 31_337,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "ethereum" | "homestead" => Ok(Network::Mainnet),
            "sepolia" => Ok(Network::Sepolia),
            "goerli" => Ok(Network::Goerli),
            "local" | "localhost" | "anvil" | "hardhat" => Ok(Network::Local),
            _ => Err(crate::error::Error::Parse(format!(
                "Unknown network: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Sepolia => write!(f, "sepolia"),
            Network::Goerli => write!(f, "goerli"),
            Network::Local => write!(f, "local"),
        }
    }
}
