use std::time::Duration;

use alloy::primitives::{Address, address};
use clap::Parser;

/// The default L2 coinbase, the first prefunded dev account.
const DEFAULT_L2_COINBASE: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// Sequence sender configuration options
#[derive(Debug, Clone, Parser)]
pub struct SenderOpts {
    /// The wait after each send attempt (in seconds)
    #[clap(long = "sender.wait-period-secs", env = "SEQS_SENDER_WAIT_PERIOD_SECS", default_value_t = 5)]
    pub wait_period_secs: u64,
    /// The maximum number of batches sequenced by a single L1 transaction
    #[clap(
        long = "sender.max-batches-per-l1-tx",
        env = "SEQS_SENDER_MAX_BATCHES_PER_L1_TX",
        default_value_t = 10
    )]
    pub max_batches_per_l1_tx: usize,
    /// The size of the synthetic batches handed to the sender (in bytes)
    #[clap(
        long = "sender.max-batch-bytes",
        env = "SEQS_SENDER_MAX_BATCH_BYTES",
        default_value_t = 131_072
    )]
    pub max_batch_bytes: usize,
    /// The gas added on top of the estimated gas of sequencing transactions
    #[clap(long = "sender.gas-offset", env = "SEQS_SENDER_GAS_OFFSET", default_value_t = 80_000)]
    pub gas_offset: u64,
    /// The L2 coinbase credited for the sequenced batches
    #[clap(long = "sender.l2-coinbase", env = "SEQS_SENDER_L2_COINBASE", default_value_t = DEFAULT_L2_COINBASE)]
    pub l2_coinbase: Address,
    /// The wait between polls of the batch source when it has nothing to offer (in milliseconds)
    #[clap(
        long = "sender.idle-interval-ms",
        env = "SEQS_SENDER_IDLE_INTERVAL_MS",
        default_value_t = 1000
    )]
    pub idle_interval_ms: u64,
}

impl SenderOpts {
    /// The wait after each send attempt.
    pub const fn wait_period(&self) -> Duration {
        Duration::from_secs(self.wait_period_secs)
    }

    /// The wait between polls of an idle batch source.
    pub const fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}
