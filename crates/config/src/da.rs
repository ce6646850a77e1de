use std::time::Duration;

use clap::Parser;
use seqs_primitives::BYTES_PER_KB;
use url::Url;

/// DA network configuration options
#[derive(Debug, Clone, Parser)]
pub struct DaOpts {
    /// The URL of the DA node JSON-RPC API
    #[clap(long = "da.rpc-url", env = "SEQS_DA_RPC_URL")]
    pub rpc_url: Url,
    /// The bearer token used to authenticate with the DA node
    #[clap(long = "da.auth-token", env = "SEQS_DA_AUTH_TOKEN")]
    pub auth_token: Option<String>,
    /// The name of the DA namespace blobs are submitted under
    #[clap(long = "da.namespace", env = "SEQS_DA_NAMESPACE", default_value = "seqs")]
    pub namespace: String,
    /// The buffered size (in bytes) at which batches are committed to the DA network.
    ///
    /// Default: 100 KiB
    #[clap(long = "da.max-blob-size", env = "SEQS_DA_MAX_BLOB_SIZE", default_value_t = 100 * BYTES_PER_KB)]
    pub max_blob_size: usize,
    /// The number of times the inclusion proof of a submitted blob is requested
    #[clap(long = "da.proof-max-retries", env = "SEQS_DA_PROOF_MAX_RETRIES", default_value_t = 10)]
    pub proof_max_retries: usize,
    /// The wait between inclusion proof requests (in milliseconds)
    #[clap(
        long = "da.proof-wait-period-ms",
        env = "SEQS_DA_PROOF_WAIT_PERIOD_MS",
        default_value_t = 5000
    )]
    pub proof_wait_period_ms: u64,
    /// The minimum interval between two DA commits (in milliseconds)
    #[clap(
        long = "da.min-commit-interval-ms",
        env = "SEQS_DA_MIN_COMMIT_INTERVAL_MS",
        default_value_t = 500
    )]
    pub min_commit_interval_ms: u64,
    /// The timeout of requests to the DA node (in seconds)
    #[clap(
        long = "da.request-timeout-secs",
        env = "SEQS_DA_REQUEST_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub request_timeout_secs: u64,
}

impl DaOpts {
    /// The wait between inclusion proof requests.
    pub const fn proof_wait_period(&self) -> Duration {
        Duration::from_millis(self.proof_wait_period_ms)
    }

    /// The minimum interval between two DA commits.
    pub const fn min_commit_interval(&self) -> Duration {
        Duration::from_millis(self.min_commit_interval_ms)
    }

    /// The timeout of requests to the DA node.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
