//! Core type definitions for Tessera transactions.
//!
//! These types form the vocabulary of every transaction on the network:
//! the supply-capped [`Amount`], the [`OperationType`] tag carried in every
//! operation header, and the [`TransactionKind`] discriminator that separates
//! user transactions from protocol-issued ones.

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::error::TransactionError;
use crate::config::{BASE_FEE_RAW, MAX_AMOUNT_RAW};

// ---------------------------------------------------------------------------
// AmountError
// ---------------------------------------------------------------------------

/// Errors produced by [`Amount`] arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The result would exceed the supply ceiling or `u64::MAX`.
    #[error("amount overflow: {lhs} {op} {rhs} exceeds the supply ceiling")]
    Overflow { lhs: u64, op: char, rhs: u64 },

    /// The result would be negative.
    #[error("amount underflow: {lhs} - {rhs} is negative")]
    Underflow { lhs: u64, rhs: u64 },

    /// The input is not a non-negative integer within the supply ceiling.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A non-negative monetary value in the smallest indivisible unit.
///
/// Every arithmetic operation is checked against both `u64` overflow and the
/// protocol supply ceiling ([`Amount::MAX`]); a result outside `[0, MAX]`
/// is an error, never a wrapped or saturated value.
///
/// On the wire an amount is a decimal string (`"10000"`). Decoding is lenient
/// and also accepts a non-negative JSON integer.
///
/// ```
/// use tessera_protocol::transaction::types::Amount;
///
/// let a = Amount::from_raw(40);
/// let b = Amount::from_raw(2);
/// assert_eq!(a.checked_add(b).unwrap(), Amount::from_raw(42));
/// assert!(Amount::MAX.checked_add(b).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// The supply ceiling.
    pub const MAX: Amount = Amount(MAX_AMOUNT_RAW);

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Wraps a raw value without range checking.
    ///
    /// Use [`Amount::new`] for untrusted input; values above [`Amount::MAX`]
    /// built here are caught by [`Amount::is_within_supply`] during
    /// well-formedness checks.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Builds an amount, rejecting values above the supply ceiling.
    pub fn new(raw: u64) -> Result<Self, AmountError> {
        if raw > MAX_AMOUNT_RAW {
            return Err(AmountError::Invalid(format!(
                "{} exceeds the supply ceiling {}",
                raw, MAX_AMOUNT_RAW
            )));
        }
        Ok(Self(raw))
    }

    /// The protocol base fee.
    pub const fn base_fee() -> Self {
        Self(BASE_FEE_RAW)
    }

    pub fn to_raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value does not exceed the supply ceiling.
    pub fn is_within_supply(&self) -> bool {
        self.0 <= MAX_AMOUNT_RAW
    }

    /// Adds two amounts, failing if the sum leaves `[0, MAX]`.
    pub fn checked_add(self, other: Amount) -> Result<Self, AmountError> {
        self.0
            .checked_add(other.0)
            .filter(|sum| *sum <= MAX_AMOUNT_RAW)
            .map(Amount)
            .ok_or(AmountError::Overflow {
                lhs: self.0,
                op: '+',
                rhs: other.0,
            })
    }

    /// Subtracts `other`, failing if the result would be negative.
    pub fn checked_sub(self, other: Amount) -> Result<Self, AmountError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(AmountError::Underflow {
                lhs: self.0,
                rhs: other.0,
            })
    }

    /// Multiplies by a scalar, failing if the product leaves `[0, MAX]`.
    pub fn checked_mul(self, factor: u64) -> Result<Self, AmountError> {
        self.0
            .checked_mul(factor)
            .filter(|product| *product <= MAX_AMOUNT_RAW)
            .map(Amount)
            .ok_or(AmountError::Overflow {
                lhs: self.0,
                op: '*',
                rhs: factor,
            })
    }

    /// Parses an amount from a loosely typed JSON value: a non-negative
    /// integer or a decimal string.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, AmountError> {
        match value {
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(raw) => Self::new(raw),
                None => Err(AmountError::Invalid(n.to_string())),
            },
            serde_json::Value::String(s) => s.parse(),
            other => Err(AmountError::Invalid(other.to_string())),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a plain decimal integer. Signs, fractions, whitespace and values
/// above the supply ceiling are rejected.
impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Invalid(format!("{:?} is not a decimal integer", s)));
        }
        let raw = s
            .parse::<u64>()
            .map_err(|_| AmountError::Invalid(format!("{} does not fit in u64", s)))?;
        Self::new(raw)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Amount::new(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        u64::try_from(value)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
            .and_then(|raw| self.visit_u64(raw))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        Amount::from_str(value).map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}

// ---------------------------------------------------------------------------
// OperationType
// ---------------------------------------------------------------------------

/// Type tag carried in every operation header.
///
/// The tag always agrees with the body variant; see
/// [`super::operation::Operation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// Fund a new account.
    #[serde(rename = "create-account")]
    CreateAccount,
    /// Transfer value to an existing account.
    #[serde(rename = "payment")]
    Payment,
    /// Protocol mint to a budget address.
    #[serde(rename = "issuance")]
    Issuance,
}

impl OperationType {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAccount => "create-account",
            Self::Payment => "payment",
            Self::Issuance => "issuance",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create-account" => Ok(Self::CreateAccount),
            "payment" => Ok(Self::Payment),
            "issuance" => Ok(Self::Issuance),
            other => Err(TransactionError::UnknownOperationType(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// Discriminator stored in the transaction's `T` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Submitted by a user account; subject to the full checker pipeline.
    Transaction,
    /// Synthesised by the issuance pool for a block height.
    Issue,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction => write!(f, "transaction"),
            Self::Issue => write!(f, "issue"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
