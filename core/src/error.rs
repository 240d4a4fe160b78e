//! Error types for the NFTfi Client SDK.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the NFTfi Client SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Neither an explicit signer nor a private key was configured.
    #[error("No signer or private key configured")]
    MissingSigner,

    /// The stored private key cannot be turned into a wallet.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Signing failed inside the signer.
    #[error("Signer error: {0}")]
    Signer(String),

    /// The signature does not end in a recovery byte of 27 or 28.
    #[error("Unexpected recovery byte in signature: {0}")]
    UnexpectedRecoveryByte(String),

    /// An on-chain read was requested from an adapter without a provider.
    #[error("No RPC provider configured")]
    MissingProvider,

    /// Contract call error.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Contract(err.to_string())
    }
}
