use alloy::rpc::client::{ClientBuilder, RpcClient};
use alloy_primitives::U128;
use async_trait::async_trait;
use seqs_primitives::retries::default_retry_layer;
use seqs_txmgr::{GasPriceProvider, L1Result};
use url::Url;

/// A gas price oracle backed by the `eth_gasPrice` method of an arbitrary JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcGasPriceOracle {
    rpc: RpcClient,
    url: Url,
}

impl RpcGasPriceOracle {
    /// Create a new oracle querying the given URL.
    pub fn new(url: Url) -> Self {
        let rpc = ClientBuilder::default().layer(default_retry_layer()).http(url.clone());
        Self { rpc, url }
    }

    /// The URL of the oracle.
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl GasPriceProvider for RpcGasPriceOracle {
    async fn suggest_gas_price(&self) -> L1Result<u128> {
        let price: U128 = self.rpc.request("eth_gasPrice", ()).await?;
        Ok(price.to())
    }
}
