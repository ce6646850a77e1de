use std::time::Duration;

use alloy::{consensus::TxLegacy, transports::TransportError};
use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;

use crate::types::{L1Tx, MinedReceipt, RevertReason, SignedTx};

/// Errors returned by [`L1Client`] and [`GasPriceProvider`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum L1Error {
    /// The underlying RPC transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The client holds no signing key for the sender.
    #[error("no signer available for {0}")]
    UnknownSender(Address),
    /// Signing the transaction failed.
    #[error("failed to sign transaction: {0}")]
    Signing(String),
    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Result alias for L1 client calls.
pub type L1Result<T> = Result<T, L1Error>;

/// The L1 operations needed to monitor transactions.
#[async_trait]
pub trait L1Client: Send + Sync {
    /// Returns the pending nonce of `address`.
    async fn current_nonce(&self, address: Address) -> L1Result<u64>;

    /// Estimates the gas needed to execute the given call.
    async fn estimate_gas(
        &self,
        from: Address,
        to: Option<Address>,
        value: U256,
        data: &Bytes,
    ) -> L1Result<u64>;

    /// Broadcasts a signed transaction.
    async fn send_transaction(&self, tx: &SignedTx) -> L1Result<()>;

    /// Returns the transaction with the given hash, or `None` if the node does not know it.
    async fn get_tx(&self, hash: B256) -> L1Result<Option<L1Tx>>;

    /// Returns the receipt of the transaction with the given hash, if it was mined.
    async fn get_tx_receipt(&self, hash: B256) -> L1Result<Option<MinedReceipt>>;

    /// Returns the receipt of the transaction if it was mined.
    async fn check_tx_was_mined(&self, hash: B256) -> L1Result<Option<MinedReceipt>> {
        self.get_tx_receipt(hash).await
    }

    /// Waits up to `timeout` for the transaction to be mined, returning its receipt if it was.
    async fn wait_tx_to_be_mined(
        &self,
        hash: B256,
        timeout: Duration,
    ) -> L1Result<Option<MinedReceipt>>;

    /// Signs the transaction with the key of `from`.
    async fn sign_tx(&self, from: Address, tx: TxLegacy) -> L1Result<SignedTx>;

    /// Returns the reason the mined transaction reverted.
    async fn get_revert_message(&self, hash: B256) -> L1Result<RevertReason>;
}

/// A source of suggested L1 gas prices.
#[async_trait]
pub trait GasPriceProvider: Send + Sync {
    /// Returns the suggested gas price in wei.
    async fn suggest_gas_price(&self) -> L1Result<u128>;
}
