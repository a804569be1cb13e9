//! Operations: the atomic ledger actions carried inside a transaction.
//!
//! An [`Operation`] pairs a header type tag with an [`OperationBody`]. The
//! body is a closed sum type, so the set of operation kinds is checked by the
//! compiler at every `match`, and the tag is derived from the body rather
//! than stored independently. A header declaring `payment` wrapped around a
//! create-account body cannot be constructed.
//!
//! # Wire format
//!
//! ```json
//! { "H": { "type": "payment" }, "B": { "target": "dtsr1...", "amount": "10000" } }
//! ```
//!
//! Decoding goes through [`OperationEnvelope`]: the tag is resolved first and
//! the body is then built for that tag, so unknown tags are rejected at the
//! boundary with [`TransactionError::UnknownOperationType`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::canonical::CanonicalEncode;
use super::error::{OperationError, TransactionError};
use super::types::{Amount, OperationType};
use crate::config::NetworkConfig;
use crate::identity::address::parse_address;

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Funds a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountBody {
    pub target: String,
    pub amount: Amount,
}

/// Transfers value to an existing account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentBody {
    pub target: String,
    pub amount: Amount,
}

/// Mints new supply to a budget address. Only the issuance pool emits these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuanceBody {
    pub target: String,
    pub amount: Amount,
}

/// The payload of an operation, one variant per [`OperationType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationBody {
    CreateAccount(CreateAccountBody),
    Payment(PaymentBody),
    Issuance(IssuanceBody),
}

impl OperationBody {
    pub fn create_account(target: impl Into<String>, amount: Amount) -> Self {
        Self::CreateAccount(CreateAccountBody {
            target: target.into(),
            amount,
        })
    }

    pub fn payment(target: impl Into<String>, amount: Amount) -> Self {
        Self::Payment(PaymentBody {
            target: target.into(),
            amount,
        })
    }

    pub fn issuance(target: impl Into<String>, amount: Amount) -> Self {
        Self::Issuance(IssuanceBody {
            target: target.into(),
            amount,
        })
    }

    /// Builds the body variant matching `kind`.
    pub fn for_kind(kind: OperationType, target: impl Into<String>, amount: Amount) -> Self {
        match kind {
            OperationType::CreateAccount => Self::create_account(target, amount),
            OperationType::Payment => Self::payment(target, amount),
            OperationType::Issuance => Self::issuance(target, amount),
        }
    }

    /// The type tag this body belongs under.
    pub fn kind(&self) -> OperationType {
        match self {
            Self::CreateAccount(_) => OperationType::CreateAccount,
            Self::Payment(_) => OperationType::Payment,
            Self::Issuance(_) => OperationType::Issuance,
        }
    }

    pub fn target_address(&self) -> &str {
        match self {
            Self::CreateAccount(b) => &b.target,
            Self::Payment(b) => &b.target,
            Self::Issuance(b) => &b.target,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Self::CreateAccount(b) => b.amount,
            Self::Payment(b) => b.amount,
            Self::Issuance(b) => b.amount,
        }
    }

    /// Structural checks: the target is a valid account on `network` and the
    /// amount does not exceed the supply ceiling.
    pub fn is_well_formed(&self, network: &NetworkConfig) -> Result<(), OperationError> {
        let target = self.target_address();
        parse_address(network, target).map_err(|reason| OperationError::InvalidTarget {
            address: target.to_string(),
            reason,
        })?;

        let amount = self.amount();
        if !amount.is_within_supply() {
            return Err(OperationError::AmountOutOfRange(amount));
        }
        Ok(())
    }
}

impl CanonicalEncode for OperationBody {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.target_address().encode_canonical(buf);
        self.amount().encode_canonical(buf);
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Operation header: the type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHeader {
    #[serde(rename = "type")]
    pub kind: OperationType,
}

/// A typed operation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OperationEnvelope")]
pub struct Operation {
    #[serde(rename = "H")]
    header: OperationHeader,
    #[serde(rename = "B")]
    body: OperationBody,
}

impl Operation {
    /// Wraps `body` under the header tag `kind`.
    ///
    /// # Errors
    ///
    /// [`TransactionError::OperationBodyMismatch`] if the body variant does
    /// not belong to `kind`.
    pub fn new(kind: OperationType, body: OperationBody) -> Result<Self, TransactionError> {
        if body.kind() != kind {
            return Err(TransactionError::OperationBodyMismatch {
                expected: kind,
                actual: body.kind(),
            });
        }
        Ok(Self {
            header: OperationHeader { kind },
            body,
        })
    }

    /// Wraps `body` under its own tag. Cannot fail.
    pub fn from_body(body: OperationBody) -> Self {
        Self {
            header: OperationHeader { kind: body.kind() },
            body,
        }
    }

    /// Decodes an operation from its JSON wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let envelope: OperationEnvelope = serde_json::from_slice(bytes)?;
        Self::try_from(envelope)
    }

    pub fn kind(&self) -> OperationType {
        self.header.kind
    }

    pub fn header(&self) -> &OperationHeader {
        &self.header
    }

    pub fn body(&self) -> &OperationBody {
        &self.body
    }

    pub fn target_address(&self) -> &str {
        self.body.target_address()
    }

    pub fn amount(&self) -> Amount {
        self.body.amount()
    }

    pub fn is_well_formed(&self, network: &NetworkConfig) -> Result<(), OperationError> {
        self.body.is_well_formed(network)
    }

    /// Content hash of the whole operation.
    pub fn hash(&self) -> [u8; 32] {
        self.canonical_hash()
    }

    /// Base58 form of [`Operation::hash`].
    pub fn hash_string(&self) -> String {
        self.canonical_hash_string()
    }

    /// Compact JSON wire form.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl CanonicalEncode for Operation {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.header.kind.encode_canonical(buf);
        self.body.encode_canonical(buf);
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

// ---------------------------------------------------------------------------
// Wire decoding
// ---------------------------------------------------------------------------

/// Loosely typed decode target: the tag is a bare string and the amount is
/// whatever JSON value the sender used.
#[derive(Debug, Deserialize)]
pub struct OperationEnvelope {
    #[serde(rename = "H")]
    header: EnvelopeHeader,
    #[serde(rename = "B")]
    body: EnvelopeBody,
}

#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody {
    target: String,
    amount: serde_json::Value,
}

impl TryFrom<OperationEnvelope> for Operation {
    type Error = TransactionError;

    fn try_from(envelope: OperationEnvelope) -> Result<Self, Self::Error> {
        let kind: OperationType = envelope.header.kind.parse()?;
        let amount = Amount::from_json_value(&envelope.body.amount)
            .map_err(TransactionError::InvalidAmount)?;
        Ok(Self::from_body(OperationBody::for_kind(
            kind,
            envelope.body.target,
            amount,
        )))
    }
}
