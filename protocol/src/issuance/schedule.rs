//! A single recurring mint: the [`Issuance`] descriptor.
//!
//! An issuance fires at every height `h` with `start <= h <= end` and
//! `(h - start) % interval == 0`, minting `unit` to its budget address.
//! Non-firing heights are the normal case and return `None`, not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{
    NetworkConfig, COMMON_BUDGET_END_HEIGHT, COMMON_BUDGET_INTERVAL, COMMON_BUDGET_ISSUANCE_ID,
    COMMON_BUDGET_START_HEIGHT, COMMON_BUDGET_UNIT_RAW,
};
use crate::crypto::keys::Keypair;
use crate::identity::address::{address_of, parse_address, AddressError};
use crate::transaction::error::TransactionError;
use crate::transaction::operation::{Operation, OperationBody};
use crate::transaction::types::Amount;

/// Errors raised while building issuance descriptors or their transactions.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The window ends before it starts.
    #[error("invalid issuance window: start {start} is after end {end}")]
    InvalidWindow { start: u64, end: u64 },

    /// An interval of zero would fire nowhere (or everywhere).
    #[error("issuance interval must be at least 1")]
    ZeroInterval,

    /// A budget or proposer address could not be encoded or parsed.
    #[error("issuance address error: {0}")]
    Address(#[from] AddressError),

    /// The synthetic transaction could not be assembled.
    #[error("issuance transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

/// External description of an issuance registered after genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceContract {
    /// Content hash of the contract document; becomes the issuance id.
    pub id: String,
    pub start_height: u64,
    pub end_height: u64,
    pub interval: u64,
    pub unit: Amount,
    pub budget: String,
}

/// A recurring mint event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuance {
    id: String,
    start: u64,
    end: u64,
    interval: u64,
    unit: Amount,
    issued_total: Amount,
    budget: String,
}

impl Issuance {
    /// Builds a descriptor, enforcing `start <= end` and `interval >= 1`.
    pub fn new(
        id: impl Into<String>,
        start: u64,
        end: u64,
        interval: u64,
        unit: Amount,
        budget: impl Into<String>,
    ) -> Result<Self, IssuanceError> {
        if start > end {
            return Err(IssuanceError::InvalidWindow { start, end });
        }
        if interval == 0 {
            return Err(IssuanceError::ZeroInterval);
        }
        Ok(Self {
            id: id.into(),
            start,
            end,
            interval,
            unit,
            issued_total: Amount::zero(),
            budget: budget.into(),
        })
    }

    /// Builds a descriptor from a registered contract. The budget must be a
    /// valid account on `network`.
    pub fn from_contract(
        contract: &IssuanceContract,
        network: &NetworkConfig,
    ) -> Result<Self, IssuanceError> {
        parse_address(network, &contract.budget)?;
        Self::new(
            contract.id.clone(),
            contract.start_height,
            contract.end_height,
            contract.interval,
            contract.unit,
            contract.budget.clone(),
        )
    }

    /// The genesis issuance present in every pool: 50 units per height to
    /// the address derived from the well-known identifier.
    pub fn common_budget(network: &NetworkConfig) -> Result<Self, IssuanceError> {
        let budget = address_of(network, &Keypair::master(COMMON_BUDGET_ISSUANCE_ID))?;
        Self::new(
            COMMON_BUDGET_ISSUANCE_ID,
            COMMON_BUDGET_START_HEIGHT,
            COMMON_BUDGET_END_HEIGHT,
            COMMON_BUDGET_INTERVAL,
            Amount::from_raw(COMMON_BUDGET_UNIT_RAW),
            budget,
        )
    }

    /// Records a running total for reporting. Not consulted by any rule.
    pub fn with_issued_total(mut self, total: Amount) -> Self {
        self.issued_total = total;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn unit(&self) -> Amount {
        self.unit
    }

    pub fn issued_total(&self) -> Amount {
        self.issued_total
    }

    pub fn budget(&self) -> &str {
        &self.budget
    }

    /// `false` once `height` is past the window; the pool prunes on this.
    pub fn is_available_issuance(&self, height: u64) -> bool {
        height <= self.end
    }

    /// The mint due at `height`, if any.
    pub fn issue(&self, height: u64) -> Option<Operation> {
        if height < self.start || height > self.end {
            return None;
        }
        if (height - self.start) % self.interval != 0 {
            return None;
        }
        Some(Operation::from_body(OperationBody::issuance(
            self.budget.clone(),
            self.unit,
        )))
    }
}
