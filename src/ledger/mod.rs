//! Funding lookups against an external ledger service.
//!
//! [`BalanceLookup`] is the seam the search runs against. [`EsploraClient`]
//! talks to an Esplora compatible HTTP API and [`Retrying`] wraps any lookup
//! with a bounded backoff policy without changing the interface.

pub mod esplora;
pub mod retry;

use async_trait::async_trait;

use crate::{address::Address, error::LookupError};

pub use esplora::EsploraClient;
pub use retry::{RetryPolicy, Retrying};

/// Source of the cumulative amount ever received by an address.
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    /// Funded total in satoshis. Zero means the address was never funded.
    async fn lookup(&self, address: &Address) -> Result<u64, LookupError>;
}

#[async_trait]
impl<L: BalanceLookup + ?Sized> BalanceLookup for std::sync::Arc<L> {
    async fn lookup(&self, address: &Address) -> Result<u64, LookupError> {
        (**self).lookup(address).await
    }
}

/// Classified result of one lookup. Keeps "confirmed empty" apart from "unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Funding {
    Funded(u64),
    Empty,
    Unknown(LookupError),
}

impl Funding {
    pub fn is_hit(&self) -> bool {
        matches!(self, Funding::Funded(_))
    }
}

impl From<Result<u64, LookupError>> for Funding {
    fn from(result: Result<u64, LookupError>) -> Self {
        match result {
            Ok(0) => Funding::Empty,
            Ok(n) => Funding::Funded(n),
            Err(e) => Funding::Unknown(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(Funding::from(Ok(0)), Funding::Empty);
        assert_eq!(Funding::from(Ok(1500)), Funding::Funded(1500));
        assert!(Funding::from(Ok(1)).is_hit());

        let unknown = Funding::from(Err(LookupError::Transport("refused".into())));
        assert!(!unknown.is_hit());
        assert_ne!(unknown, Funding::Empty);
    }
}
