use alloy::primitives::Address;
use clap::Parser;
use seqs_primitives::ForkVersion;
use url::Url;

/// L1-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct L1Opts {
    /// The URL of the L1 execution client HTTP connection
    #[clap(long = "l1.el-url", env = "SEQS_L1_EXECUTION_URL")]
    pub el_url: Url,
    /// Additional JSON-RPC endpoints queried for gas price suggestions, comma separated.
    /// The L1 execution client is always queried.
    #[clap(
        long = "l1.gas-price-urls",
        env = "SEQS_L1_GAS_PRICE_URLS",
        value_delimiter = ','
    )]
    pub gas_price_urls: Vec<Url>,
    /// The address of the L1 `PolygonValidium` rollup contract
    #[clap(long = "l1.validium-address", env = "SEQS_L1_VALIDIUM_ADDRESS")]
    pub validium_address: Address,
    /// The rollup fork, which selects the sequencing interface of the rollup contract
    #[clap(long = "l1.fork", env = "SEQS_L1_FORK", default_value_t = ForkVersion::Elderberry)]
    pub fork: ForkVersion,
}
