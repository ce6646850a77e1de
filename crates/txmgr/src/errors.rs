use crate::{client::L1Error, types::MonitoredTxStatus};

/// Errors returned by the [`TxManager`](crate::TxManager) and its store.
#[derive(Debug, thiserror::Error)]
pub enum TxManagerError {
    /// A monitored transaction with this id is already tracked.
    #[error("monitored tx `{0}` already exists")]
    AlreadyExists(String),
    /// No monitored transaction with this id is tracked for the owner.
    #[error("monitored tx `{0}` not found")]
    NotFound(String),
    /// The update would move the transaction backwards in its lifecycle.
    #[error("invalid status transition for monitored tx `{id}`: {from} -> {to}")]
    InvalidTransition {
        /// The monitored transaction id.
        id: String,
        /// The stored status.
        from: MonitoredTxStatus,
        /// The rejected status.
        to: MonitoredTxStatus,
    },
    /// None of the gas price providers returned a usable price.
    #[error("no gas price available")]
    NoGasPrice,
    /// An L1 client call failed.
    #[error(transparent)]
    L1(#[from] L1Error),
}
