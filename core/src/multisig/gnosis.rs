//! Gnosis Safe owner.
//!
//! [`MultisigGnosisOwner`] signs on behalf of one owner of a Safe. Messages are wrapped in
//! the Safe's `SafeMessage` EIP-712 type and signed as EIP-191 messages, after which the
//! recovery byte is shifted by 4 so the Safe treats the signature as an `eth_sign` one.

use std::sync::Arc;

use alloy::providers::ProviderBuilder;
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use alloy_primitives::{Address, B256, Bytes, U256, eip191_hash_message};
use reqwest::Url;

use crate::config::{ChainConfig, MultisigConfig};
use crate::error::{Error, Result};
use crate::providers::SdkFuture;
use crate::signer::{Owner, OwnerSigner, SignerSource, signature_hex};

sol! {
    /// Message type the Safe fallback handler hashes for EIP-1271 checks.
    struct SafeMessage {
        bytes message;
    }

    #[sol(rpc)]
    interface IGnosisSafe {
        function getOwners() external view returns (address[] memory);
        function getThreshold() external view returns (uint256);
        function nonce() external view returns (uint256);
        function isOwner(address owner) external view returns (bool);
    }
}

/// EIP-712 hash of `SafeMessage { message: eip191_hash(msg) }` for the given Safe.
pub fn safe_message_hash(msg: &[u8], safe_address: Address, chain_id: u64) -> B256 {
    let domain = Eip712Domain::new(
        None,
        None,
        Some(U256::from(chain_id)),
        Some(safe_address),
        None,
    );
    let message = SafeMessage {
        message: Bytes::copy_from_slice(eip191_hash_message(msg).as_slice()),
    };
    message.eip712_signing_hash(&domain)
}

/// Shift the trailing recovery byte of a hex signature from `27/28` to `31/32`.
///
/// Only the last byte changes. Any other trailing byte is rejected.
pub fn adjust_recovery_byte(signature: &str) -> Result<String> {
    let split = signature
        .len()
        .checked_sub(2)
        .filter(|&at| signature.is_char_boundary(at))
        .ok_or_else(|| Error::UnexpectedRecoveryByte(signature.to_string()))?;
    let (head, suffix) = signature.split_at(split);

    let adjusted = match suffix.to_ascii_lowercase().as_str() {
        "1b" => "1f",
        "1c" => "20",
        _ => return Err(Error::UnexpectedRecoveryByte(signature.to_string())),
    };
    Ok(format!("{}{}", head, adjusted))
}

/// Chain adapter handed to the Safe factory: a signer plus the provider it reads through.
#[derive(Clone)]
pub struct EthAdapter {
    signer: Arc<dyn OwnerSigner>,
    rpc_url: Option<Url>,
}

impl EthAdapter {
    pub fn new(signer: Arc<dyn OwnerSigner>, rpc_url: Option<Url>) -> Self {
        Self { signer, rpc_url }
    }

    pub fn signer(&self) -> &Arc<dyn OwnerSigner> {
        &self.signer
    }

    pub fn rpc_url(&self) -> Option<&Url> {
        self.rpc_url.as_ref()
    }

    pub async fn signer_address(&self) -> Result<Address> {
        self.signer.address().await
    }
}

/// Creates Safe sessions from an adapter and a Safe address.
#[cfg(target_arch = "wasm32")]
pub trait SafeFactory {
    type Safe;

    fn create(&self, eth_adapter: EthAdapter, safe_address: Address) -> SdkFuture<'_, Self::Safe>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait SafeFactory: Send + Sync {
    type Safe: Send;

    fn create(&self, eth_adapter: EthAdapter, safe_address: Address) -> SdkFuture<'_, Self::Safe>;
}

/// Factory producing [`SafeSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSafeFactory;

impl SafeFactory for DefaultSafeFactory {
    type Safe = SafeSession;

    fn create(&self, eth_adapter: EthAdapter, safe_address: Address) -> SdkFuture<'_, SafeSession> {
        Box::pin(async move {
            log::debug!("Opening Safe session for {}", safe_address);
            Ok(SafeSession {
                eth_adapter,
                safe_address,
            })
        })
    }
}

/// A Safe bound to one owner's adapter.
///
/// Reads go through the adapter's provider; a session without one can still be used
/// for its address and signer.
#[derive(Clone)]
pub struct SafeSession {
    eth_adapter: EthAdapter,
    safe_address: Address,
}

impl SafeSession {
    pub fn address(&self) -> Address {
        self.safe_address
    }

    pub fn eth_adapter(&self) -> &EthAdapter {
        &self.eth_adapter
    }

    fn rpc_url(&self) -> Result<Url> {
        self.eth_adapter
            .rpc_url()
            .cloned()
            .ok_or(Error::MissingProvider)
    }

    pub async fn get_owners(&self) -> Result<Vec<Address>> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let safe = IGnosisSafe::new(self.safe_address, provider);
        Ok(safe.getOwners().call().await?._0)
    }

    pub async fn get_threshold(&self) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let safe = IGnosisSafe::new(self.safe_address, provider);
        Ok(safe.getThreshold().call().await?._0)
    }

    pub async fn get_nonce(&self) -> Result<U256> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let safe = IGnosisSafe::new(self.safe_address, provider);
        Ok(safe.nonce().call().await?._0)
    }

    pub async fn is_owner(&self, owner: Address) -> Result<bool> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url()?);
        let safe = IGnosisSafe::new(self.safe_address, provider);
        Ok(safe.isOwner(owner).call().await?._0)
    }
}

/// Owner of a Gnosis Safe.
///
/// Signs with an explicit signer when one is set, otherwise with a wallet derived from
/// the private key. Missing both is only reported when an operation needs a signer.
pub struct MultisigGnosisOwner<F: SafeFactory = DefaultSafeFactory> {
    multisig: MultisigConfig,
    chain: ChainConfig,
    private_key: Option<B256>,
    signer: Option<Arc<dyn OwnerSigner>>,
    rpc_url: Option<Url>,
    safe_factory: F,
}

impl MultisigGnosisOwner<DefaultSafeFactory> {
    pub fn new(multisig: MultisigConfig, chain: ChainConfig) -> Self {
        Self::with_safe_factory(multisig, chain, DefaultSafeFactory)
    }
}

impl<F: SafeFactory> MultisigGnosisOwner<F> {
    pub fn with_safe_factory(multisig: MultisigConfig, chain: ChainConfig, safe_factory: F) -> Self {
        Self {
            multisig,
            chain,
            private_key: None,
            signer: None,
            rpc_url: None,
            safe_factory,
        }
    }

    pub fn with_private_key(mut self, private_key: B256) -> Self {
        self.private_key = Some(private_key);
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn OwnerSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// RPC endpoint the Safe adapter reads through.
    pub fn with_provider(mut self, rpc_url: Url) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub fn private_key(&self) -> Option<&B256> {
        self.private_key.as_ref()
    }

    pub fn signer(&self) -> Option<&Arc<dyn OwnerSigner>> {
        self.signer.as_ref()
    }

    pub fn safe_address(&self) -> Address {
        self.multisig.safe.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain.chain_id
    }

    fn signer_source(&self) -> Result<SignerSource<'_>> {
        SignerSource::resolve(self.signer.as_ref(), self.private_key.as_ref())
    }

    /// Address of the owner (not of the Safe).
    pub async fn get_address(&self) -> Result<Address> {
        self.signer_source()?.address().await
    }

    /// Open a Safe session bound to this owner.
    pub async fn get_safe_sdk(&self) -> Result<F::Safe> {
        let signer = self.signer_source()?.into_signer()?;
        let eth_adapter = EthAdapter::new(signer, self.rpc_url.clone());
        self.safe_factory
            .create(eth_adapter, self.safe_address())
            .await
    }

    /// Sign `msg` for verification by the Safe.
    pub async fn sign(&self, msg: &[u8]) -> Result<String> {
        let hash = safe_message_hash(msg, self.safe_address(), self.chain_id());
        log::debug!(
            "Signing Safe message {} for {} on chain {}",
            hash,
            self.safe_address(),
            self.chain_id()
        );

        let signer = self.signer_source()?.into_signer()?;
        let signature = signer.sign_message(hash.as_slice()).await?;
        adjust_recovery_byte(&signature_hex(&signature))
    }
}

impl<F: SafeFactory> Owner for MultisigGnosisOwner<F> {
    fn get_address(&self) -> SdkFuture<'_, Address> {
        Box::pin(MultisigGnosisOwner::get_address(self))
    }

    fn sign<'a>(&'a self, message: &'a [u8]) -> SdkFuture<'a, String> {
        Box::pin(MultisigGnosisOwner::sign(self, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::tests::{DEV_ADDRESS, DEV_KEY, StaticSigner};
    use crate::signer::wallet_from_key;
    use crate::types::Network;
    use alloy_primitives::keccak256;
    use std::sync::Mutex;

    fn safe() -> Address {
        Address::with_last_byte(0x5a)
    }

    fn owner() -> MultisigGnosisOwner {
        MultisigGnosisOwner::new(MultisigConfig::new(safe()), Network::Sepolia.into())
    }

    fn static_signer(last_byte: u8) -> Arc<dyn OwnerSigner> {
        let mut signature = vec![0x11; 65];
        signature[64] = last_byte;
        Arc::new(StaticSigner {
            address: Address::with_last_byte(0x42),
            signature,
        })
    }

    /// Factory recording the adapter and address it was called with.
    #[derive(Default)]
    struct RecordingFactory {
        seen: Mutex<Option<(Address, Address, Option<Url>)>>,
    }

    impl SafeFactory for RecordingFactory {
        type Safe = &'static str;

        fn create(
            &self,
            eth_adapter: EthAdapter,
            safe_address: Address,
        ) -> SdkFuture<'_, &'static str> {
            Box::pin(async move {
                let signer = eth_adapter.signer_address().await?;
                *self.seen.lock().unwrap() =
                    Some((signer, safe_address, eth_adapter.rpc_url().cloned()));
                Ok("safe")
            })
        }
    }

    #[test]
    fn test_adjust_recovery_byte() {
        assert_eq!(adjust_recovery_byte("0xabcd1b").unwrap(), "0xabcd1f");
        assert_eq!(adjust_recovery_byte("0xabcd1c").unwrap(), "0xabcd20");
        assert_eq!(adjust_recovery_byte("0x1b1c").unwrap(), "0x1b20");
        assert_eq!(adjust_recovery_byte("0xABCD1B").unwrap(), "0xABCD1f");

        for bad in ["0xabcd00", "0xabcd1f", "0xabcd01", "", "b"] {
            assert!(matches!(
                adjust_recovery_byte(bad),
                Err(Error::UnexpectedRecoveryByte(_))
            ));
        }
    }

    #[test]
    fn test_safe_message_hash_matches_manual_encoding() {
        let msg = b"offer 42";
        let chain_id = 11_155_111u64;

        let domain_typehash = keccak256("EIP712Domain(uint256 chainId,address verifyingContract)");
        let mut domain = Vec::new();
        domain.extend_from_slice(domain_typehash.as_slice());
        domain.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
        domain.extend_from_slice(safe().into_word().as_slice());
        let domain_separator = keccak256(&domain);

        let message_typehash = keccak256("SafeMessage(bytes message)");
        let mut message = Vec::new();
        message.extend_from_slice(message_typehash.as_slice());
        message.extend_from_slice(keccak256(eip191_hash_message(msg)).as_slice());
        let struct_hash = keccak256(&message);

        let mut digest = vec![0x19, 0x01];
        digest.extend_from_slice(domain_separator.as_slice());
        digest.extend_from_slice(struct_hash.as_slice());

        assert_eq!(safe_message_hash(msg, safe(), chain_id), keccak256(&digest));
    }

    #[test]
    fn test_safe_message_hash_is_scoped_to_safe_and_chain() {
        let base = safe_message_hash(b"m", safe(), 1);
        assert_ne!(base, safe_message_hash(b"m", Address::with_last_byte(0x5b), 1));
        assert_ne!(base, safe_message_hash(b"m", safe(), 5));
        assert_ne!(base, safe_message_hash(b"n", safe(), 1));
    }

    #[tokio::test]
    async fn test_get_address_prefers_signer() {
        let owner = owner()
            .with_private_key(DEV_KEY)
            .with_signer(static_signer(0x1b));
        assert_eq!(owner.get_address().await.unwrap(), Address::with_last_byte(0x42));

        let owner = self::owner().with_private_key(DEV_KEY);
        assert_eq!(owner.get_address().await.unwrap(), DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_operations_fail_without_signer_or_key() {
        let owner = owner();

        assert!(owner.private_key().is_none());
        assert!(owner.signer().is_none());
        assert!(matches!(owner.get_address().await, Err(Error::MissingSigner)));
        assert!(matches!(owner.sign(b"m").await, Err(Error::MissingSigner)));
        assert!(matches!(owner.get_safe_sdk().await, Err(Error::MissingSigner)));
    }

    #[tokio::test]
    async fn test_sign_rewrites_recovery_byte_of_explicit_signer() {
        let owner = owner().with_signer(static_signer(0x1b));
        let signature = owner.sign(b"m").await.unwrap();
        assert_eq!(signature, format!("0x{}1f", "11".repeat(64)));

        let owner = self::owner().with_signer(static_signer(0x1c));
        let signature = owner.sign(b"m").await.unwrap();
        assert_eq!(signature, format!("0x{}20", "11".repeat(64)));

        let owner = self::owner().with_signer(static_signer(0x00));
        assert!(matches!(
            owner.sign(b"m").await,
            Err(Error::UnexpectedRecoveryByte(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_with_private_key() {
        let owner = owner().with_private_key(DEV_KEY);
        let signature = owner.sign(b"offer 42").await.unwrap();

        let hash = safe_message_hash(b"offer 42", safe(), Network::Sepolia.chain_id());
        let wallet = wallet_from_key(&DEV_KEY).unwrap();
        let raw = OwnerSigner::sign_message(&wallet, hash.as_slice())
            .await
            .unwrap();

        assert_eq!(signature.len(), 2 + 130);
        assert_eq!(signature[..130], signature_hex(&raw)[..130]);
        assert!(signature.ends_with("1f") || signature.ends_with("20"));
        assert_eq!(signature, adjust_recovery_byte(&signature_hex(&raw)).unwrap());
    }

    #[tokio::test]
    async fn test_get_safe_sdk_binds_signer_and_safe_address() {
        let rpc: Url = "http://localhost:8545".parse().unwrap();
        let owner = MultisigGnosisOwner::with_safe_factory(
            MultisigConfig::new(safe()),
            Network::Local.into(),
            RecordingFactory::default(),
        )
        .with_private_key(DEV_KEY)
        .with_provider(rpc.clone());

        assert_eq!(owner.get_safe_sdk().await.unwrap(), "safe");
        assert_eq!(
            *owner.safe_factory.seen.lock().unwrap(),
            Some((DEV_ADDRESS, safe(), Some(rpc)))
        );
    }

    #[tokio::test]
    async fn test_default_session_without_provider() {
        let owner = owner().with_signer(static_signer(0x1b));
        let session = owner.get_safe_sdk().await.unwrap();

        assert_eq!(session.address(), safe());
        assert_eq!(
            session.eth_adapter().signer_address().await.unwrap(),
            Address::with_last_byte(0x42)
        );
        assert!(matches!(
            session.get_owners().await,
            Err(Error::MissingProvider)
        ));
    }
}
