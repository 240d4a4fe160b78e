//! NFTfi Client SDK - Core Library
//!
//! Offers API access and wallet-owner signing for the NFTfi peer-to-peer lending platform.
//!
//! Every component is a thin façade over injected collaborators: the HTTP client, the
//! caller's account, the contract specific offer builder and the loan contract bindings
//! are all traits (see [`providers`]) so they can be swapped for any backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use nftfi_core::{ApiClient, ApiConfig, Offers, OfferFilters};
//!
//! let api = ApiClient::new(ApiConfig::default().with_api_key(key));
//! let offers = Offers::new(lender_address, api, my_offers_helper, my_loans);
//!
//! // Offers on one token
//! let results = offers.get(Some(&OfferFilters::nft(collection, "42"))).await?;
//!
//! // Sign for a Safe
//! let owner = MultisigGnosisOwner::new(multisig, Network::Mainnet.into())
//!     .with_private_key(owner_key);
//! let signature = owner.sign(b"hello").await?;
//! ```

pub mod api;
pub mod config;
pub mod drops_og;
pub mod error;
pub mod multisig;
pub mod offers;
pub mod providers;
pub mod signer;
pub mod types;

pub use api::ApiClient;
pub use config::{ApiConfig, ChainConfig, MultisigConfig, SafeConfig};
pub use drops_og::{DropsOg, DropsOgOptions};
pub use error::{Error, Result};
pub use multisig::{DefaultSafeFactory, EthAdapter, MultisigGnosisOwner, SafeFactory, SafeSession};
pub use offers::{CreateOfferOptions, CreateOfferOutcome, OfferFilters, Offers};
pub use providers::{Account, Api, Loans, OffersHelper, SdkFuture};
pub use signer::{EoaOwner, Owner, OwnerSigner, SignerSource};
pub use types::Network;
