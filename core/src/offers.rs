//! Loan offers: listing, creation, deletion and revocation.
//!
//! [`Offers`] is a thin façade. It shapes query parameters, dispatches creation on the
//! loan contract name, and forwards everything else to its injected collaborators.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value, json};

use crate::api::{
    Borrower, ListResponse, NftfiRef, Offer, OfferNft, OfferTerms, RevokeOfferOptions,
    V2_1_LOAN_FIXED,
};
use crate::error::{Error, Result};
use crate::providers::{Account, Api, Loans, OffersHelper};
use crate::types::truthy;

/// Endpoint of the offers resource.
const OFFERS_URI: &str = "offers";

/// Key of the legacy nested listing object folded in when [`CreateOfferOptions`] is parsed.
const LEGACY_LISTING_KEY: &str = "listing";

/// NFT filter of [`OfferFilters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftFilter {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Filters accepted by [`Offers::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferFilters {
    #[serde(default)]
    pub nft: Option<NftFilter>,
}

impl OfferFilters {
    /// Offers on one specific token.
    pub fn nft(address: Address, id: impl Into<String>) -> Self {
        Self {
            nft: Some(NftFilter {
                address: Some(address),
                id: Some(id.into()),
            }),
        }
    }

    /// Offers on any token of a collection.
    pub fn collection(address: Address) -> Self {
        Self {
            nft: Some(NftFilter {
                address: Some(address),
                id: None,
            }),
        }
    }
}

/// Simulation switches of [`CreateOfferOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    /// Build the payload but do not post it.
    #[serde(default, deserialize_with = "truthy")]
    pub dry_run: bool,
}

/// Arguments of [`Offers::create`], handed to the offers helper as-is.
///
/// Deserializing folds a legacy `listing` object onto the root first, see
/// [`merge_legacy_listing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOfferOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<OfferTerms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft: Option<OfferNft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower: Option<Borrower>,
    pub nftfi: NftfiRef,
    #[serde(default)]
    pub simulation: Simulation,
    /// Any other option, passed through to the helper.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateOfferOptions {
    pub fn new(nftfi: NftfiRef) -> Self {
        Self {
            terms: None,
            nft: None,
            borrower: None,
            nftfi,
            simulation: Simulation::default(),
            extra: Map::new(),
        }
    }

    /// Parse raw options, first folding a legacy `listing` object onto the root.
    pub fn from_value(options: Value) -> Result<Self> {
        Ok(serde_json::from_value(options)?)
    }
}

/// Field layout of [`CreateOfferOptions`] once the legacy listing is merged.
#[derive(Deserialize)]
struct MergedOptions {
    #[serde(default)]
    terms: Option<OfferTerms>,
    #[serde(default)]
    nft: Option<OfferNft>,
    #[serde(default)]
    borrower: Option<Borrower>,
    nftfi: NftfiRef,
    #[serde(default)]
    simulation: Option<Simulation>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for CreateOfferOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let merged: MergedOptions =
            serde_json::from_value(merge_legacy_listing(raw)).map_err(de::Error::custom)?;

        Ok(Self {
            terms: merged.terms,
            nft: merged.nft,
            borrower: merged.borrower,
            nftfi: merged.nftfi,
            simulation: merged.simulation.unwrap_or_default(),
            extra: merged.extra,
        })
    }
}

/// Lift the fields of a nested `listing` object to the top level.
///
/// Root fields win over listing fields of the same name. The `listing` key itself is dropped.
pub fn merge_legacy_listing(options: Value) -> Value {
    let Value::Object(mut root) = options else {
        return options;
    };
    let Some(Value::Object(listing)) = root.remove(LEGACY_LISTING_KEY) else {
        return Value::Object(root);
    };

    let mut merged = listing;
    merged.extend(root);
    Value::Object(merged)
}

/// Validation errors keyed by the offending option path.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Outcome of [`Offers::create`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOfferOutcome {
    /// The payload was posted; carries the API response.
    Posted(Value),
    /// Dry run; carries the payload that would have been posted.
    Simulated(Offer),
    /// The options were rejected before anything was built or sent.
    Rejected(ValidationErrors),
}

impl CreateOfferOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CreateOfferOutcome::Rejected(_))
    }

    /// Render the outcome in the single JSON shape older callers branch on.
    ///
    /// Rejections become `{"errors": {...}}`; other outcomes are returned unwrapped.
    pub fn into_value(self) -> Result<Value> {
        match self {
            CreateOfferOutcome::Posted(response) => Ok(response),
            CreateOfferOutcome::Simulated(payload) => Ok(serde_json::to_value(payload)?),
            CreateOfferOutcome::Rejected(errors) => Ok(json!({ "errors": errors })),
        }
    }
}

/// Lowercase `0x` hex, the form addresses take in offer queries.
fn query_address(address: &Address) -> String {
    format!("{:#x}", address)
}

/// Query selecting offers on one token (address and id) or on a collection (address only).
///
/// An empty id counts as no id.
fn nft_query_params(filters: Option<&OfferFilters>) -> Option<Vec<(String, String)>> {
    let nft = filters.and_then(|f| f.nft.as_ref())?;
    let address = nft.address.as_ref()?;

    let mut params = vec![("nftAddress".to_string(), query_address(address))];
    if let Some(id) = nft.id.as_deref().filter(|id| !id.is_empty()) {
        params.push(("nftId".to_string(), id.to_string()));
    }
    Some(params)
}

/// Build the `offers` query for the given filters.
///
/// A full NFT filter selects one token, an address-only filter a collection, and no
/// NFT filter at all selects the lender's own offers.
pub fn offer_query_params(
    filters: Option<&OfferFilters>,
    lender: Address,
) -> Vec<(String, String)> {
    nft_query_params(filters)
        .unwrap_or_else(|| vec![("lenderAddress".to_string(), query_address(&lender))])
}

/// Loan offers on the NFTfi platform.
///
/// Generic over its collaborators:
/// - `C`: the caller's account (default lender filter)
/// - `A`: the API client
/// - `H`: the contract specific payload builder
/// - `L`: on-chain loan operations
pub struct Offers<C: Account, A: Api, H: OffersHelper, L: Loans> {
    account: C,
    api: A,
    helper: H,
    loans: L,
}

impl<C: Account, A: Api, H: OffersHelper, L: Loans> Offers<C, A, H, L> {
    pub fn new(account: C, api: A, helper: H, loans: L) -> Self {
        Self {
            account,
            api,
            helper,
            loans,
        }
    }

    pub fn account(&self) -> &C {
        &self.account
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// List offers.
    ///
    /// Returns the `results` of the API response untouched and in the order received.
    /// Only the first page the API returns is read.
    pub async fn get(&self, filters: Option<&OfferFilters>) -> Result<Vec<Value>> {
        let params = match nft_query_params(filters) {
            Some(params) => params,
            None => {
                let lender = self.account.address().await?;
                offer_query_params(None, lender)
            }
        };

        let response = self.api.get(OFFERS_URI, &params).await?;
        let list: ListResponse<Value> = serde_json::from_value(response)
            .map_err(|e| Error::Parse(format!("Offers response without results: {}", e)))?;
        Ok(list.results)
    }

    /// Create an offer.
    ///
    /// Dispatches on `nftfi.contract.name`. Unsupported contracts are rejected without
    /// calling the helper or the API.
    pub async fn create(&self, options: CreateOfferOptions) -> Result<CreateOfferOutcome> {
        let contract_name = options.nftfi.contract_name();
        match contract_name {
            V2_1_LOAN_FIXED => {
                let payload = self.helper.construct_v2_offer(&options).await?;
                if options.simulation.dry_run {
                    log::debug!("Dry run, not posting {} offer", contract_name);
                    return Ok(CreateOfferOutcome::Simulated(payload));
                }

                let body = serde_json::to_value(&payload)?;
                let response = self.api.post(OFFERS_URI, &body).await?;
                Ok(CreateOfferOutcome::Posted(response))
            }
            unsupported => {
                log::debug!("Rejecting offer for unsupported contract {}", unsupported);
                let mut errors = ValidationErrors::new();
                errors.insert(
                    "nftfi.contract.name".to_string(),
                    vec![format!("{} not supported", unsupported)],
                );
                Ok(CreateOfferOutcome::Rejected(errors))
            }
        }
    }

    /// Delete an offer by id.
    pub async fn delete(&self, offer_id: &str) -> Result<Value> {
        let uri = format!("{}/{}", OFFERS_URI, offer_id);
        self.api.delete(&uri).await
    }

    /// Revoke a signed offer on-chain.
    pub async fn revoke(&self, options: &RevokeOfferOptions) -> Result<Value> {
        self.loans.revoke_offer(options).await
    }
}
