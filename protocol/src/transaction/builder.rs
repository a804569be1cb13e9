//! Transaction construction via the builder pattern.
//!
//! [`Transaction::new`] covers the common case: a source, a sequence id and
//! one or more operations, with the base fee and current time filled in. The
//! [`TransactionBuilder`] exposes the remaining knobs (fee, version, creation
//! time, kind). Either way the body hash is computed immediately and stamped
//! into the header; the signature is left empty until
//! [`super::signing::sign_transaction`] runs.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "T": "transaction",
//!   "H": { "version": "0.1.0", "created": "...", "hash": "...", "signature": "..." },
//!   "B": { "source": "dtsr1...", "fee": "10000", "sequenceID": 7, "operations": [ ... ] }
//! }
//! ```

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::canonical::CanonicalEncode;
use super::error::TransactionError;
use super::operation::{Operation, OperationEnvelope};
use super::types::{Amount, TransactionKind};
use crate::config::PROTOCOL_VERSION;

// ---------------------------------------------------------------------------
// Header / Body
// ---------------------------------------------------------------------------

/// Transaction metadata. Nothing here is covered by the body hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Protocol version the transaction was built for.
    pub version: String,
    /// RFC 3339 creation timestamp.
    pub created: String,
    /// Base58 hash of the body at build or signing time.
    pub hash: String,
    /// Base58 Ed25519 signature over `network_id ‖ hash`. Empty when unsigned.
    pub signature: String,
}

/// The hashed and signed part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    /// Address of the paying account.
    pub source: String,
    /// Fee paid per operation.
    pub fee: Amount,
    /// Must equal the source account's next expected sequence id.
    #[serde(rename = "sequenceID")]
    pub sequence_id: u64,
    /// Ordered operations; order is part of the hash.
    pub operations: Vec<Operation>,
}

impl TransactionBody {
    /// Content hash of the body. This is the transaction's identity.
    pub fn make_hash(&self) -> [u8; 32] {
        self.canonical_hash()
    }

    pub fn make_hash_string(&self) -> String {
        self.canonical_hash_string()
    }
}

impl CanonicalEncode for TransactionBody {
    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        self.source.encode_canonical(buf);
        self.fee.encode_canonical(buf);
        self.sequence_id.encode_canonical(buf);
        self.operations.encode_canonical(buf);
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A Tessera transaction: a kind discriminator, header metadata and the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "T")]
    pub kind: TransactionKind,
    #[serde(rename = "H")]
    pub header: TransactionHeader,
    #[serde(rename = "B")]
    pub body: TransactionBody,
}

impl Transaction {
    /// Builds an unsigned user transaction with the base fee.
    ///
    /// # Errors
    ///
    /// [`TransactionError::EmptyOperations`] if `operations` is empty.
    pub fn new(
        source: impl Into<String>,
        sequence_id: u64,
        operations: Vec<Operation>,
    ) -> Result<Self, TransactionError> {
        TransactionBuilder::new(source, sequence_id)
            .operations(operations)
            .build()
    }

    /// Decodes a transaction from its JSON wire form.
    ///
    /// Operations are decoded through their envelope so an unknown type tag
    /// or a malformed amount surfaces as its own error kind rather than a
    /// generic decode failure.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TransactionError> {
        let envelope: TransactionEnvelope = serde_json::from_slice(bytes)?;
        let fee = Amount::from_json_value(&envelope.body.fee).map_err(TransactionError::InvalidAmount)?;
        let operations = envelope
            .body
            .operations
            .into_iter()
            .map(Operation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind: envelope.kind,
            header: envelope.header,
            body: TransactionBody {
                source: envelope.body.source,
                fee,
                sequence_id: envelope.body.sequence_id,
                operations,
            },
        })
    }

    /// The hash stored in the header.
    pub fn hash(&self) -> &str {
        &self.header.hash
    }

    pub fn source(&self) -> &str {
        &self.body.source
    }

    pub fn sequence_id(&self) -> u64 {
        self.body.sequence_id
    }

    /// The sequence id the source account expects after this transaction
    /// is applied. `None` once the id space is exhausted at `u64::MAX`.
    pub fn next_sequence_id(&self) -> Option<u64> {
        self.body.sequence_id.checked_add(1)
    }

    pub fn is_valid_sequence_id(&self, sequence_id: u64) -> bool {
        self.body.sequence_id == sequence_id
    }

    pub fn operations(&self) -> &[Operation] {
        &self.body.operations
    }

    pub fn is_signed(&self) -> bool {
        !self.header.signature.is_empty()
    }

    /// Sum of every operation's amount, plus `fee × operation count` when
    /// `with_fee` is set.
    ///
    /// # Errors
    ///
    /// [`TransactionError::AmountOverflow`] if the total leaves `[0, MAX]`.
    pub fn total_amount(&self, with_fee: bool) -> Result<Amount, TransactionError> {
        let mut total = Amount::zero();
        for op in &self.body.operations {
            total = total
                .checked_add(op.amount())
                .map_err(TransactionError::AmountOverflow)?;
        }

        if with_fee {
            let fees = self
                .body
                .fee
                .checked_mul(self.body.operations.len() as u64)
                .map_err(TransactionError::AmountOverflow)?;
            total = total
                .checked_add(fees)
                .map_err(TransactionError::AmountOverflow)?;
        }

        Ok(total)
    }

    /// Compact JSON wire form.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

#[derive(Deserialize)]
struct TransactionEnvelope {
    #[serde(rename = "T")]
    kind: TransactionKind,
    #[serde(rename = "H")]
    header: TransactionHeader,
    #[serde(rename = "B")]
    body: BodyEnvelope,
}

#[derive(Deserialize)]
struct BodyEnvelope {
    source: String,
    fee: serde_json::Value,
    #[serde(rename = "sequenceID")]
    sequence_id: u64,
    operations: Vec<OperationEnvelope>,
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] instances.
///
/// ```
/// use tessera_protocol::transaction::{Amount, Operation, OperationBody, TransactionBuilder};
///
/// let tx = TransactionBuilder::new("dtsr1source", 3)
///     .fee(Amount::from_raw(20_000))
///     .operation(Operation::from_body(OperationBody::payment("dtsr1target", Amount::from_raw(5))))
///     .build()
///     .unwrap();
/// assert_eq!(tx.body.sequence_id, 3);
/// assert!(!tx.is_signed());
/// ```
///
/// Defaults: kind `transaction`, the base fee, the current protocol version,
/// and the current UTC time.
pub struct TransactionBuilder {
    kind: TransactionKind,
    version: String,
    created: Option<String>,
    source: String,
    fee: Amount,
    sequence_id: u64,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    pub fn new(source: impl Into<String>, sequence_id: u64) -> Self {
        Self {
            kind: TransactionKind::Transaction,
            version: PROTOCOL_VERSION.to_string(),
            created: None,
            source: source.into(),
            fee: Amount::base_fee(),
            sequence_id,
            operations: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Overrides the protocol version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the creation timestamp explicitly. If not called, `build()`
    /// uses the current UTC time.
    pub fn created(mut self, created: impl Into<String>) -> Self {
        self.created = Some(created.into());
        self
    }

    pub fn fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Consumes the builder and produces an unsigned [`Transaction`] whose
    /// header hash matches its body.
    pub fn build(self) -> Result<Transaction, TransactionError> {
        if self.operations.is_empty() {
            return Err(TransactionError::EmptyOperations);
        }

        let body = TransactionBody {
            source: self.source,
            fee: self.fee,
            sequence_id: self.sequence_id,
            operations: self.operations,
        };
        let created = self
            .created
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(Transaction {
            kind: self.kind,
            header: TransactionHeader {
                version: self.version,
                created,
                hash: body.make_hash_string(),
                signature: String::new(),
            },
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
