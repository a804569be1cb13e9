//! # Issuance
//!
//! Protocol-defined minting. Each [`Issuance`] describes a recurring mint
//! over a height window; the [`IssuancePool`] turns every issuance due at a
//! height into a single synthetic `issue` transaction for the block producer.
//!
//! ```text
//! schedule.rs Issuance, IssuanceContract, IssuanceError
//! pool.rs     IssuancePool, SharedIssuancePool
//! ```

pub mod pool;
pub mod schedule;

pub use pool::{IssuancePool, SharedIssuancePool};
pub use schedule::{Issuance, IssuanceContract, IssuanceError};
