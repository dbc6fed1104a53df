//! Common types used throughout the submission engine

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Submission path for a single attempt
///
/// Exactly one path is executed per attempt. The sponsored and
/// alternate-provider paths relay the fee through a third party; the
/// standard path pays the fee from the sender account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Path {
    /// Direct broadcast through the network node
    Standard,
    /// Broadcast through the sponsorship service
    Sponsored,
    /// Broadcast through the alternate fee-relay provider
    AlternateProvider,
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Path::Standard => write!(f, "standard"),
            Path::Sponsored => write!(f, "sponsored"),
            Path::AlternateProvider => write!(f, "alternate_provider"),
        }
    }
}

/// Validation failure for a transaction id string
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TxIdError {
    #[error("transaction id has invalid length {0} (expected 64 hex characters)")]
    InvalidLength(usize),

    #[error("transaction id contains non-hexadecimal characters")]
    InvalidCharacter,
}

/// A validated transaction id
///
/// Backends answer with heterogeneous id encodings (with or without a `0x`
/// prefix, mixed case). `TxId` normalizes to lowercase unprefixed hex and
/// rejects anything that is not exactly 64 hex characters, so a prose error
/// string can never masquerade as an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxId(String);

impl TxId {
    /// Parse and normalize a transaction id from a backend response
    pub fn parse(raw: &str) -> Result<Self, TxIdError> {
        let trimmed = raw.trim();
        let unprefixed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if unprefixed.len() != 64 {
            return Err(TxIdError::InvalidLength(unprefixed.len()));
        }
        if !unprefixed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxIdError::InvalidCharacter);
        }

        Ok(Self(unprefixed.to_ascii_lowercase()))
    }

    /// The bare 64-character hex form
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// The `0x`-prefixed form used by explorer links
    pub fn to_prefixed(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TxId {
    type Err = TxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TxId {
    type Error = TxIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TxId> for String {
    fn from(id: TxId) -> Self {
        id.0
    }
}

/// Payload of a transaction-signing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionPayload {
    /// Transfer of the native token
    TokenTransfer {
        recipient: String,
        amount: u64,
        memo: Option<String>,
    },
    /// Invocation of a deployed contract function
    ContractCall {
        contract_id: String,
        function_name: String,
    },
}

/// A not-yet-signed transaction
///
/// Immutable once constructed. Path-specific variants (the sponsored
/// variant in particular) are constructed fresh, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    sender: String,
    nonce: u64,
    fee: u64,
    payload: TransactionPayload,
    sponsored: bool,
}

impl UnsignedTransaction {
    /// Create a standard (sender-paid) unsigned transaction
    pub fn new(
        sender: impl Into<String>,
        nonce: u64,
        fee: u64,
        payload: TransactionPayload,
    ) -> Self {
        Self {
            sender: sender.into(),
            nonce,
            fee,
            payload,
            sponsored: false,
        }
    }

    /// Construct the sponsored variant of this transaction
    ///
    /// The sponsor pays the fee, so the user-paid fee is zero. The nonce is
    /// pinned to the resolved next nonce at eligibility-resolution time.
    pub fn sponsored_variant(&self, next_nonce: u64) -> Self {
        Self {
            sender: self.sender.clone(),
            nonce: next_nonce,
            fee: 0,
            payload: self.payload.clone(),
            sponsored: true,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    pub fn is_sponsored(&self) -> bool {
        self.sponsored
    }
}

/// A signed transaction, ready for broadcast
///
/// Produced once per unsigned transaction and never re-signed. Carries the
/// canonical byte serialization; the hex form is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    raw: Vec<u8>,
}

impl SignedTransaction {
    pub fn from_raw_bytes(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// Canonical serialized bytes, as submitted to the network
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Canonical hex serialization delivered back to the requester
    pub fn to_raw_hex(&self) -> String {
        hex::encode(&self.raw)
    }

    /// Short digest of the canonical bytes, for log correlation
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(&self.raw);
        hex::encode(&hash[..8])
    }
}

/// Fee selection tier chosen in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FeeType {
    Low,
    #[default]
    Middle,
    High,
}

/// User-supplied form values driving a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    /// Fee in the smallest native unit
    pub fee: u64,

    /// Which fee tier the fee was derived from
    pub fee_type: FeeType,

    /// Explicit nonce override; the resolved next nonce is used when absent
    pub nonce: Option<u64>,
}

/// How the fee options were computed by the fee-calculation interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeCalculation {
    /// Derived from recent network fee rates
    FeeRate,
    /// Fixed default values
    Default,
}

/// Result of the fee-calculation interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub calculation: FeeCalculation,

    /// Fee options ordered low, middle, high
    pub options: Vec<u64>,
}

/// Result of the nonce-query interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextNonce {
    pub nonce: u64,
}

/// Result of the balance-query interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub available_unlocked_balance: u64,
}

/// Status of an asynchronous collaborator query
///
/// Mirrors the tri-state the surrounding UI observes: a query that has not
/// settled is neither a success nor a failure, and submission gating must
/// treat it as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus<T> {
    Pending,
    Success(T),
    Error(String),
}

impl<T> QueryStatus<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryStatus::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            QueryStatus::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for QueryStatus<T> {
    fn default() -> Self {
        QueryStatus::Pending
    }
}

/// Identity of the party that requested the signature
///
/// Present for the lifetime of the page. Finalization requires both fields;
/// an absent context is a loud, classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub request_token: String,
    pub tab_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID_TXID: &str = "117a6522b4e9ec27ff10bbe3940a4a07fd58e5352010b4143992edb05a7130c7";

    #[test]
    fn test_txid_accepts_unprefixed() {
        assert!(TxId::parse(VALID_TXID).is_ok());
    }

    #[test]
    fn test_txid_accepts_prefixed_and_normalizes() {
        let id = TxId::parse(&format!("0x{}", VALID_TXID.to_uppercase())).unwrap();
        assert_eq!(id.as_hex(), VALID_TXID);
        assert_eq!(id.to_prefixed(), format!("0x{VALID_TXID}"));
    }

    #[test]
    fn test_txid_rejects_short_and_long() {
        assert_eq!(
            TxId::parse(&VALID_TXID[..60]),
            Err(TxIdError::InvalidLength(60))
        );
        let long = format!("{VALID_TXID}{VALID_TXID}");
        assert!(TxId::parse(&long).is_err());
    }

    #[test]
    fn test_txid_rejects_prose_even_when_it_contains_a_valid_id() {
        let prose = "Failed to deserialize posted transaction: invalid string";
        assert!(TxId::parse(prose).is_err());
        let prose_with_id = format!("{prose}. 0x{VALID_TXID}");
        assert!(TxId::parse(&prose_with_id).is_err());
    }

    #[test]
    fn test_sponsored_variant_is_a_new_value() {
        let tx = UnsignedTransaction::new(
            "SP000",
            3,
            180,
            TransactionPayload::TokenTransfer {
                recipient: "SP111".to_string(),
                amount: 500,
                memo: None,
            },
        );
        let sponsored = tx.sponsored_variant(5);

        assert!(!tx.is_sponsored());
        assert_eq!(tx.fee(), 180);
        assert_eq!(tx.nonce(), 3);

        assert!(sponsored.is_sponsored());
        assert_eq!(sponsored.fee(), 0);
        assert_eq!(sponsored.nonce(), 5);
        assert_eq!(sponsored.payload(), tx.payload());
    }

    #[test]
    fn test_signed_transaction_hex_roundtrip() {
        let signed = SignedTransaction::from_raw_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(signed.to_raw_hex(), "deadbeef");
        assert_eq!(signed.digest().len(), 16);
    }

    proptest! {
        #[test]
        fn prop_valid_hex_of_correct_length_parses(id in "[0-9a-fA-F]{64}") {
            let bare = TxId::parse(&id).unwrap();
            let prefixed = TxId::parse(&format!("0x{id}")).unwrap();
            prop_assert_eq!(bare.clone(), prefixed);
            prop_assert_eq!(bare.as_hex(), id.to_ascii_lowercase());
        }

        #[test]
        fn prop_wrong_length_never_parses(id in "[0-9a-f]{1,63}") {
            prop_assert!(TxId::parse(&id).is_err());
        }
    }
}
