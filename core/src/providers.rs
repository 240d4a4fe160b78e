//! Async collaborator traits injected into the SDK components.
//!
//! The offers façade never talks to the network, a wallet or a loan contract
//! directly; it goes through these traits so callers can plug in their own
//! HTTP client, account source or contract bindings.
//!
//! - `Account`: source of the caller's own address
//! - `Api`: JSON HTTP client bound to the offers backend
//! - `OffersHelper`: builds contract-specific offer payloads
//! - `Loans`: on-chain loan operations (offer revocation)

use crate::api::{Offer, RevokeOfferOptions};
use crate::error::Result;
use crate::offers::CreateOfferOptions;
use alloy_primitives::Address;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Type alias for collaborator futures.
///
/// On WASM targets, futures don't need to be `Send` since JavaScript is single-threaded.
/// On native targets, futures should be `Send` to allow use with multi-threaded runtimes.
#[cfg(target_arch = "wasm32")]
pub type SdkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a>>;

#[cfg(not(target_arch = "wasm32"))]
pub type SdkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source of the caller's own address.
#[cfg(target_arch = "wasm32")]
pub trait Account {
    /// The address offers are listed under when no NFT filter is given.
    fn address(&self) -> SdkFuture<'_, Address>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait Account: Send + Sync {
    /// The address offers are listed under when no NFT filter is given.
    fn address(&self) -> SdkFuture<'_, Address>;
}

impl Account for Address {
    fn address(&self) -> SdkFuture<'_, Address> {
        let address = *self;
        Box::pin(async move { Ok(address) })
    }
}

/// JSON HTTP client bound to the offers backend.
///
/// URIs are relative to the client's base URL (e.g. `offers`, `offers/<id>`).
#[cfg(target_arch = "wasm32")]
pub trait Api {
    /// `GET uri?params`.
    fn get<'a>(&'a self, uri: &'a str, params: &'a [(String, String)]) -> SdkFuture<'a, Value>;

    /// `POST uri` with a JSON payload.
    fn post<'a>(&'a self, uri: &'a str, payload: &'a Value) -> SdkFuture<'a, Value>;

    /// `DELETE uri`.
    fn delete<'a>(&'a self, uri: &'a str) -> SdkFuture<'a, Value>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait Api: Send + Sync {
    /// `GET uri?params`.
    fn get<'a>(&'a self, uri: &'a str, params: &'a [(String, String)]) -> SdkFuture<'a, Value>;

    /// `POST uri` with a JSON payload.
    fn post<'a>(&'a self, uri: &'a str, payload: &'a Value) -> SdkFuture<'a, Value>;

    /// `DELETE uri`.
    fn delete<'a>(&'a self, uri: &'a str) -> SdkFuture<'a, Value>;
}

/// Builds offer payloads for a specific loan contract.
#[cfg(target_arch = "wasm32")]
pub trait OffersHelper {
    /// Build (and sign) a payload for the `v2-1.loan.fixed` contract.
    fn construct_v2_offer<'a>(&'a self, options: &'a CreateOfferOptions) -> SdkFuture<'a, Offer>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait OffersHelper: Send + Sync {
    /// Build (and sign) a payload for the `v2-1.loan.fixed` contract.
    fn construct_v2_offer<'a>(&'a self, options: &'a CreateOfferOptions) -> SdkFuture<'a, Offer>;
}

/// On-chain loan operations.
#[cfg(target_arch = "wasm32")]
pub trait Loans {
    /// Revoke a signed offer by burning its nonce on the loan contract.
    fn revoke_offer<'a>(&'a self, options: &'a RevokeOfferOptions) -> SdkFuture<'a, Value>;
}

#[cfg(not(target_arch = "wasm32"))]
pub trait Loans: Send + Sync {
    /// Revoke a signed offer by burning its nonce on the loan contract.
    fn revoke_offer<'a>(&'a self, options: &'a RevokeOfferOptions) -> SdkFuture<'a, Value>;
}
