//! API types for the NFTfi offers backend.
//!
//! These types match the backend API schema and are used for request/response serialization.
//! Fields the SDK does not model are kept in `extra` so records pass through verbatim.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::u256_dec;

/// Contract name of the v2.1 fixed-term loan contract.
pub const V2_1_LOAN_FIXED: &str = "v2-1.loan.fixed";

/// Loan terms of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    /// Amount lent, in the currency's base units.
    #[serde(with = "u256_dec")]
    pub principal: U256,
    /// Amount owed at maturity, in the currency's base units.
    #[serde(with = "u256_dec")]
    pub repayment: U256,
    /// Loan duration in seconds.
    pub duration: u64,
    /// ERC-20 token the loan is denominated in.
    pub currency: Address,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// NFT used as collateral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferNft {
    pub address: Address,
    /// Token id, kept as the decimal string the API uses.
    pub id: String,
}

/// Borrower side of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub address: Address,
}

/// Lender side of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lender {
    pub address: Address,
    /// Nonce the lender signed the offer with; used to revoke it.
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub name: String,
}

/// Platform specific section selecting the loan contract variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftfiRef {
    pub contract: ContractRef,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NftfiRef {
    pub fn new(contract_name: impl Into<String>) -> Self {
        Self {
            contract: ContractRef {
                name: contract_name.into(),
            },
            extra: Map::new(),
        }
    }

    /// The `nftfi.contract.name` discriminator.
    pub fn contract_name(&self) -> &str {
        &self.contract.name
    }
}

/// A loan offer as stored by the API, and as posted when creating one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<OfferTerms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft: Option<OfferNft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower: Option<Borrower>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lender: Option<Lender>,
    pub nftfi: NftfiRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope of list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
}

/// Offer reference used by [`RevokeOfferOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferNonce {
    pub nonce: String,
}

/// Arguments of `Offers::revoke`, forwarded unchanged to the loans collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeOfferOptions {
    pub offer: OfferNonce,
    pub nftfi: NftfiRef,
}
