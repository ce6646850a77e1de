use std::time::Duration;

use clap::Parser;

/// Monitored transaction manager configuration options
#[derive(Debug, Clone, Parser)]
pub struct TxManagerOpts {
    /// The interval between monitoring ticks (in milliseconds)
    #[clap(
        long = "txmgr.monitor-interval-ms",
        env = "SEQS_TXMGR_MONITOR_INTERVAL_MS",
        default_value_t = 1000
    )]
    pub monitor_interval_ms: u64,
    /// How long a monitoring tick waits for a transaction to be mined (in seconds)
    #[clap(
        long = "txmgr.wait-tx-mined-secs",
        env = "SEQS_TXMGR_WAIT_TX_MINED_SECS",
        default_value_t = 120
    )]
    pub wait_tx_mined_secs: u64,
    /// The gas limit used when gas estimation fails. Zero disables the fallback.
    #[clap(long = "txmgr.forced-gas", env = "SEQS_TXMGR_FORCED_GAS", default_value_t = 0)]
    pub forced_gas: u64,
    /// The factor applied to the suggested gas price
    #[clap(
        long = "txmgr.gas-price-margin-factor",
        env = "SEQS_TXMGR_GAS_PRICE_MARGIN_FACTOR",
        default_value_t = 1.0
    )]
    pub gas_price_margin_factor: f64,
    /// The maximum gas price (in wei). Zero means unlimited.
    #[clap(long = "txmgr.max-gas-price", env = "SEQS_TXMGR_MAX_GAS_PRICE", default_value_t = 0)]
    pub max_gas_price: u128,
    /// The interval between checks while waiting for pending transactions (in milliseconds)
    #[clap(
        long = "txmgr.pending-poll-interval-ms",
        env = "SEQS_TXMGR_PENDING_POLL_INTERVAL_MS",
        default_value_t = 1000
    )]
    pub pending_poll_interval_ms: u64,
}

impl TxManagerOpts {
    /// The interval between monitoring ticks.
    pub const fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    /// How long a monitoring tick waits for a transaction to be mined.
    pub const fn wait_tx_mined_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_tx_mined_secs)
    }

    /// The interval between checks while waiting for pending transactions.
    pub const fn pending_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pending_poll_interval_ms)
    }
}
