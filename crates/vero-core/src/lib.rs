pub mod categories;
pub mod depreciation;
pub mod error;
pub mod ledger;
pub mod money;
pub mod rates;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "reconciliation")]
pub mod reconciliation;

#[cfg(feature = "compliance")]
pub mod compliance;

pub use error::VeroError;
pub use types::*;

/// Standard result type for all vero operations
pub type VeroResult<T> = Result<T, VeroError>;
