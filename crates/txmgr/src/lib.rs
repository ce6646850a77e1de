#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! A concurrent, at-least-once L1 transaction manager.
//!
//! Every transaction handed to the [`TxManager`] is tracked as a [`MonitoredTx`] until it is
//! either confirmed or definitively failed. A background loop re-evaluates the nonce and gas
//! parameters of pending transactions, re-broadcasts escalated variants and records every
//! signed variant in the transaction history.

/// Monitored transaction types.
pub mod types;
pub use types::{
    L1Tx, MinedReceipt, MonitoredTx, MonitoredTxResult, MonitoredTxStatus, RevertReason,
    SignedTx, TxRequest, TxResult,
};

/// The monitored transaction store.
pub mod store;
pub use store::MonitoredTxStore;

/// The L1 client interface consumed by the manager.
pub mod client;
pub use client::{GasPriceProvider, L1Client, L1Error, L1Result};

/// The gas price policy.
pub mod gas;
pub use gas::GasPricer;

/// The monitored transaction manager.
pub mod manager;
pub use manager::{TxManager, TxManagerConfig};

mod errors;
pub use errors::TxManagerError;

mod metrics;

#[cfg(test)]
pub(crate) mod test_utils;
