//! Signing capability shared by the wallet owners.
//!
//! An owner either wraps an explicit [`OwnerSigner`] supplied by the caller, or derives a
//! local wallet from a private key. [`SignerSource`] captures that choice once per call so
//! address resolution, adapter construction and signing all branch the same way.

use std::sync::Arc;

use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Address, B256, Bytes};

use crate::error::{Error, Result};
use crate::providers::{Account, SdkFuture};

/// Something that can sign EIP-191 messages on behalf of an address.
#[cfg(target_arch = "wasm32")]
pub trait OwnerSigner {
    /// Address of the signing key.
    fn address(&self) -> SdkFuture<'_, Address>;

    /// Sign `message` with the `"\x19Ethereum Signed Message:\n"` prefix.
    ///
    /// Returns the 65 byte `r || s || v` signature with `v` in `{27, 28}`.
    fn sign_message<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, Bytes>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait OwnerSigner: Send + Sync {
    /// Address of the signing key.
    fn address(&self) -> SdkFuture<'_, Address>;

    /// Sign `message` with the `"\x19Ethereum Signed Message:\n"` prefix.
    ///
    /// Returns the 65 byte `r || s || v` signature with `v` in `{27, 28}`.
    fn sign_message<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, Bytes>;
}

impl OwnerSigner for PrivateKeySigner {
    fn address(&self) -> SdkFuture<'_, Address> {
        let address = alloy::signers::Signer::address(self);
        Box::pin(async move { Ok(address) })
    }

    fn sign_message<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, Bytes> {
        Box::pin(async move {
            let signature = self
                .sign_message_sync(message)
                .map_err(|e| Error::Signer(e.to_string()))?;
            Ok(Bytes::from(signature.as_bytes().to_vec()))
        })
    }
}

/// Common surface of wallet owners, used wherever a signer is required.
#[cfg(target_arch = "wasm32")]
pub trait Owner {
    fn get_address(&self) -> SdkFuture<'_, Address>;

    /// Sign `message` and return the signature as `0x` prefixed hex.
    fn sign<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, String>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait Owner: Send + Sync {
    fn get_address(&self) -> SdkFuture<'_, Address>;

    /// Sign `message` and return the signature as `0x` prefixed hex.
    fn sign<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, String>;
}

/// Build a local wallet from a raw private key.
pub fn wallet_from_key(key: &B256) -> Result<PrivateKeySigner> {
    PrivateKeySigner::from_bytes(key).map_err(|e| Error::InvalidPrivateKey(e.to_string()))
}

/// `0x` prefixed lowercase hex of a signature.
pub fn signature_hex(signature: &[u8]) -> String {
    format!("0x{}", hex::encode(signature))
}

/// Where an owner's signatures come from, resolved once per call.
pub enum SignerSource<'a> {
    /// A signer supplied by the caller.
    Explicit(&'a Arc<dyn OwnerSigner>),
    /// A wallet derived from the stored private key.
    Derived(&'a B256),
}

impl<'a> SignerSource<'a> {
    /// Prefer the explicit signer; fall back to the private key.
    pub fn resolve(
        signer: Option<&'a Arc<dyn OwnerSigner>>,
        key: Option<&'a B256>,
    ) -> Result<Self> {
        match (signer, key) {
            (Some(signer), _) => Ok(SignerSource::Explicit(signer)),
            (None, Some(key)) => Ok(SignerSource::Derived(key)),
            (None, None) => Err(Error::MissingSigner),
        }
    }

    pub async fn address(&self) -> Result<Address> {
        match self {
            SignerSource::Explicit(signer) => signer.address().await,
            SignerSource::Derived(key) => {
                Ok(alloy::signers::Signer::address(&wallet_from_key(key)?))
            }
        }
    }

    pub fn into_signer(self) -> Result<Arc<dyn OwnerSigner>> {
        match self {
            SignerSource::Explicit(signer) => Ok(Arc::clone(signer)),
            SignerSource::Derived(key) => Ok(Arc::new(wallet_from_key(key)?)),
        }
    }
}

/// Owner of an externally owned account.
///
/// Signs plain EIP-191 messages; signatures are returned untouched.
#[derive(Clone)]
pub struct EoaOwner {
    signer: Arc<dyn OwnerSigner>,
}

impl EoaOwner {
    pub fn new(signer: Arc<dyn OwnerSigner>) -> Self {
        Self { signer }
    }

    pub fn from_private_key(key: &B256) -> Result<Self> {
        Ok(Self::new(Arc::new(wallet_from_key(key)?)))
    }

    pub fn signer(&self) -> &Arc<dyn OwnerSigner> {
        &self.signer
    }
}

impl Owner for EoaOwner {
    fn get_address(&self) -> SdkFuture<'_, Address> {
        self.signer.address()
    }

    fn sign<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, String> {
        Box::pin(async move {
            let signature = self.signer.sign_message(message).await?;
            Ok(signature_hex(&signature))
        })
    }
}

impl Account for EoaOwner {
    fn address(&self) -> SdkFuture<'_, Address> {
        self.signer.address()
    }
}
