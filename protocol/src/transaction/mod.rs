//! # Transaction Module
//!
//! Construction, hashing, signing and admission of Tessera transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        Amount, OperationType, TransactionKind
//! canonical.rs    Schema-ordered byte encoding and content hashes
//! operation.rs    Operation bodies and the wire envelope
//! builder.rs      Transaction, TransactionBuilder, JSON codec
//! signing.rs      Network-scoped Ed25519 signing
//! sequence.rs     SequenceOracle and an in-memory implementation
//! verification.rs The ordered well-formedness checker pipeline
//! error.rs        TransactionError, OperationError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** with [`Transaction::new`] or [`TransactionBuilder`]. The body
//!    hash is stamped into the header immediately.
//! 2. **Sign** with [`sign_transaction`]; only header fields change.
//! 3. **Admit** with [`verify_transaction`] against the network config and
//!    the ledger's [`SequenceOracle`].

pub mod builder;
pub mod canonical;
pub mod error;
pub mod operation;
pub mod sequence;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBody, TransactionBuilder, TransactionHeader};
pub use canonical::CanonicalEncode;
pub use error::{OperationError, TransactionError};
pub use operation::{Operation, OperationBody, OperationHeader};
pub use sequence::{InMemorySequenceOracle, SequenceOracle};
pub use signing::sign_transaction;
pub use types::{Amount, AmountError, OperationType, TransactionKind};
pub use verification::{verify_transaction, TransactionChecker, WELL_FORMED_CHECKS};
