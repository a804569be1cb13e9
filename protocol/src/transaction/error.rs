//! Error types for transaction construction, decoding and admission.
//!
//! Every checker rule maps to exactly one [`TransactionError`] variant so the
//! mempool can tell a client precisely which rule rejected its transaction.
//! All variants are terminal for the transaction that produced them.

use thiserror::Error;

use super::types::{Amount, AmountError, OperationType, TransactionKind};
use crate::identity::address::AddressError;

/// Why a single operation body failed its structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The target is not a valid account address on this network.
    #[error("invalid target address {address}: {reason}")]
    InvalidTarget {
        address: String,
        #[source]
        reason: AddressError,
    },

    /// The amount exceeds the supply ceiling.
    #[error("amount {0} exceeds the supply ceiling")]
    AmountOutOfRange(Amount),

    /// Only the issuance pool may emit this operation type.
    #[error("{0} operations cannot be submitted by accounts")]
    Reserved(OperationType),
}

/// Errors that can occur while building, decoding or admitting a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The body variant handed to `Operation::new` does not match the header type.
    #[error("operation body mismatch: header says {expected}, body is {actual}")]
    OperationBodyMismatch {
        expected: OperationType,
        actual: OperationType,
    },

    /// The operation type tag is not one this protocol version understands.
    #[error("unknown operation type: {0:?}")]
    UnknownOperationType(String),

    /// An amount field could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[source] AmountError),

    /// A transaction must carry at least one operation.
    #[error("transaction has no operations")]
    EmptyOperations,

    /// The sequence id does not equal the next expected id for the source.
    #[error("invalid sequence id for {account}: expected {expected:?}, got {actual}")]
    InvalidSequenceId {
        account: String,
        expected: Option<u64>,
        actual: u64,
    },

    /// The source is not a valid account address on this network.
    #[error("invalid source address {address}: {reason}")]
    InvalidSourceAddress {
        address: String,
        #[source]
        reason: AddressError,
    },

    /// Account-signed admission only accepts `transaction`-kind envelopes.
    #[error("unexpected transaction kind {actual}, expected {expected}")]
    UnexpectedKind {
        expected: TransactionKind,
        actual: TransactionKind,
    },

    /// The fee is below the network minimum.
    #[error("fee underflow: minimum {minimum}, got {actual}")]
    FeeUnderflow { minimum: Amount, actual: Amount },

    /// One of the operations failed its own structural checks.
    #[error("operation #{index} is not well-formed: {reason}")]
    OperationNotWellFormed {
        index: usize,
        #[source]
        reason: OperationError,
    },

    /// An operation targets the transaction's own source account.
    #[error("operation #{index} targets its own source {address}")]
    SelfTransaction { index: usize, address: String },

    /// The header signature does not verify against the source account.
    #[error("invalid signature: does not verify against source {account}")]
    InvalidSignature { account: String },

    /// The stored hash differs from a fresh hash of the body.
    #[error("hash mismatch: header has {stored}, body hashes to {computed}")]
    HashMismatch { stored: String, computed: String },

    /// Summing amounts left the representable range.
    #[error("amount overflow: {0}")]
    AmountOverflow(#[source] AmountError),

    /// The input bytes are not a structurally valid JSON document.
    #[error("malformed transaction encoding: {0}")]
    Decode(#[from] serde_json::Error),
}
