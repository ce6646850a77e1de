use std::fmt;

use alloy::consensus::TxLegacy;
use alloy_primitives::{Address, B256, Bytes, TxKind, U256};

use seqs_primitives::{summary::Summary, time::Timestamp};

/// The lifecycle status of a [`MonitoredTx`].
///
/// Statuses only move forward: `Created -> Sent -> {Confirmed, Failed} -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoredTxStatus {
    /// Persisted, but no variant has been broadcast yet.
    Created,
    /// At least one signed variant has been broadcast.
    Sent,
    /// A variant was mined and reverted with an identifiable reason.
    Failed,
    /// A variant was mined successfully.
    Confirmed,
    /// The outcome has been consumed by the owner.
    Done,
}

impl MonitoredTxStatus {
    /// Returns the status as a static string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Confirmed => "confirmed",
            Self::Done => "done",
        }
    }

    /// Returns true if the transaction will not be monitored anymore.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Confirmed | Self::Done)
    }

    /// Returns true if a transaction in this status may be moved to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }

        matches!(
            (self, next),
            (Self::Created, Self::Sent | Self::Confirmed | Self::Failed) |
                (Self::Sent, Self::Confirmed | Self::Failed) |
                (Self::Confirmed | Self::Failed, Self::Done)
        )
    }
}

impl fmt::Display for MonitoredTxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The caller-provided parameters of a transaction to monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxRequest {
    /// The sender of the transaction.
    pub from: Address,
    /// The recipient of the transaction, `None` for contract creations.
    pub to: Option<Address>,
    /// The value transferred with the transaction.
    pub value: U256,
    /// The transaction input data.
    pub data: Bytes,
    /// Extra gas added on top of the estimated gas limit.
    pub gas_offset: u64,
}

/// A transaction tracked by the [`TxManager`](crate::TxManager) until it reaches a terminal
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredTx {
    /// The owner of the transaction, used to scope queries.
    pub owner: String,
    /// The unique id of the transaction, chosen by the owner.
    pub id: String,
    /// The sender of the transaction.
    pub from: Address,
    /// The recipient of the transaction.
    pub to: Option<Address>,
    /// The current nonce. Never decreases.
    pub nonce: u64,
    /// The value transferred with the transaction.
    pub value: U256,
    /// The transaction input data.
    pub data: Bytes,
    /// The current estimated gas. Never decreases.
    pub gas: u64,
    /// Extra gas added on top of `gas` when building the transaction.
    pub gas_offset: u64,
    /// The current gas price in wei. Never decreases.
    pub gas_price: u128,
    /// The lifecycle status.
    pub status: MonitoredTxStatus,
    /// The hashes of every signed variant, in signing order and without duplicates.
    pub history: Vec<B256>,
    /// The block in which the transaction was confirmed or failed.
    pub block_number: Option<u64>,
    /// Whether a failure has already been handed to the owner.
    pub failure_reported: bool,
    /// When the transaction was added.
    pub created_at: Timestamp,
    /// When the transaction was last updated.
    pub updated_at: Timestamp,
}

impl MonitoredTx {
    /// Creates a new monitored transaction in the [`MonitoredTxStatus::Created`] status.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: &str,
        id: &str,
        request: TxRequest,
        nonce: u64,
        gas: u64,
        gas_price: u128,
        now: Timestamp,
    ) -> Self {
        Self {
            owner: owner.to_owned(),
            id: id.to_owned(),
            from: request.from,
            to: request.to,
            nonce,
            value: request.value,
            data: request.data,
            gas,
            gas_offset: request.gas_offset,
            gas_price,
            status: MonitoredTxStatus::Created,
            history: Vec::new(),
            block_number: None,
            failure_reported: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a signed variant hash. Returns false if it was already recorded.
    pub fn add_history(&mut self, hash: B256) -> bool {
        if self.history.contains(&hash) {
            return false;
        }

        self.history.push(hash);
        true
    }

    /// The gas limit of the transaction, including the offset.
    pub const fn gas_limit(&self) -> u64 {
        self.gas.saturating_add(self.gas_offset)
    }

    /// Raises the nonce if `nonce` is higher. Returns true if it changed.
    pub const fn raise_nonce(&mut self, nonce: u64) -> bool {
        let raised = nonce > self.nonce;
        if raised {
            self.nonce = nonce;
        }
        raised
    }

    /// Raises the estimated gas if `gas` is higher. Returns true if it changed.
    pub const fn raise_gas(&mut self, gas: u64) -> bool {
        let raised = gas > self.gas;
        if raised {
            self.gas = gas;
        }
        raised
    }

    /// Raises the gas price if `gas_price` is higher. Returns true if it changed.
    pub const fn raise_gas_price(&mut self, gas_price: u128) -> bool {
        let raised = gas_price > self.gas_price;
        if raised {
            self.gas_price = gas_price;
        }
        raised
    }

    /// Builds the unsigned legacy transaction with the current parameters.
    pub fn unsigned_tx(&self) -> TxLegacy {
        TxLegacy {
            chain_id: None,
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit(),
            to: self.to.map_or(TxKind::Create, TxKind::Call),
            value: self.value,
            input: self.data.clone(),
        }
    }
}

impl Summary for MonitoredTx {
    fn summary(&self) -> String {
        format!(
            "id={}, status={}, nonce={}, gas={}, gas_price={}, history={}",
            self.id,
            self.status,
            self.nonce,
            self.gas_limit(),
            self.gas_price,
            self.history.len()
        )
    }
}

/// A transaction as seen by the L1 node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1Tx {
    /// The transaction hash.
    pub hash: B256,
    /// The transaction nonce.
    pub nonce: u64,
    /// Whether the transaction is still in the mempool.
    pub pending: bool,
}

/// The receipt of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinedReceipt {
    /// The transaction hash.
    pub tx_hash: B256,
    /// The block in which the transaction was included.
    pub block_number: Option<u64>,
    /// Whether the execution succeeded.
    pub success: bool,
    /// The gas used by the transaction.
    pub gas_used: u64,
}

/// A signed transaction ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    /// The transaction hash.
    pub hash: B256,
    /// The EIP-2718 encoded transaction.
    pub raw: Bytes,
}

/// The reason a mined transaction reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// A decoded revert message.
    Message(String),
    /// Raw revert data that could not be decoded into a message.
    Data(Bytes),
    /// No reason could be determined.
    Unknown,
}

impl RevertReason {
    /// Returns true if the revert reason was identified.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(msg) => f.write_str(msg),
            Self::Data(data) => write!(f, "{data}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// The L1 view of a single signed variant of a monitored transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    /// The variant hash.
    pub hash: B256,
    /// The transaction, if known to the node.
    pub tx: Option<L1Tx>,
    /// The receipt, if mined.
    pub receipt: Option<MinedReceipt>,
    /// The revert reason, for variants mined with a failed receipt.
    pub revert_reason: Option<RevertReason>,
}

/// The outcome of a monitored transaction, as handed to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredTxResult {
    /// The monitored transaction id.
    pub id: String,
    /// The status at the time the result was built.
    pub status: MonitoredTxStatus,
    /// The block in which the transaction was confirmed or failed.
    pub block_number: Option<u64>,
    /// One entry per history hash, in signing order.
    pub txs: Vec<TxResult>,
}
