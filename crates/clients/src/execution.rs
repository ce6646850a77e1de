use std::time::Duration;

use alloy::{
    consensus::{SignableTransaction, Transaction as _, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    providers::{Provider, RootProvider},
    rpc::{
        client::{ClientBuilder, RpcClient},
        types::{TransactionInput, TransactionRequest},
    },
    signers::{SignerSync, local::PrivateKeySigner},
    transports::TransportResult,
};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rpc_types_trace::geth::{
    CallConfig, CallFrame, GethDebugBuiltInTracerType, GethDebugTracerType, GethDebugTracingOptions,
};
use alloy_sol_types::SolInterface;
use async_trait::async_trait;
use derive_more::derive::Deref;
use seqs_chainio::{
    TryParseTransportErrorResult, try_parse_transport_error,
    validium::IPolygonValidium::IPolygonValidiumErrors,
};
use seqs_primitives::retries::default_retry_layer;
use seqs_txmgr::{
    GasPriceProvider, L1Client, L1Error, L1Result, L1Tx, MinedReceipt, RevertReason, SignedTx,
};
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};
use url::Url;

/// Interval between receipt polls while waiting for a transaction to be mined.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// An HTTP-based JSON-RPC execution client for the L1, holding the sequencer key.
///
/// This struct is a wrapper over an inner [`RootProvider`], which can be used directly via
/// dereferencing, and implements the [`L1Client`] operations used by the tx manager.
#[derive(Clone, Debug, Deref)]
pub struct ExecutionClient {
    /// The raw RPC client, for methods not exposed by the provider.
    rpc: RpcClient,
    /// The inner provider that implements all the standard JSON-RPC methods.
    #[deref]
    inner: RootProvider,
    /// The key used to sign transactions sent by the sequencer.
    signer: PrivateKeySigner,
    /// The chain id, used for replay-protected signatures.
    chain_id: u64,
}

impl ExecutionClient {
    /// Create a new [`ExecutionClient`] with the given HTTP URL and signer.
    ///
    /// Fetches the chain id from the node.
    pub async fn new<U: Into<Url>>(url: U, signer: PrivateKeySigner) -> TransportResult<Self> {
        let rpc = ClientBuilder::default().layer(default_retry_layer()).http(url.into());
        let inner = RootProvider::new(rpc.clone());
        let chain_id = inner.get_chain_id().await?;

        Ok(Self { rpc, inner, signer, chain_id })
    }

    /// The address of the sequencer key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The chain id of the connected node.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Runs a simple `debug_traceTransaction` RPC call to establish the revert reason of a
    /// transaction, if any.
    ///
    /// NOTE: assumes a client compatible with the `debug_traceTransaction` RPC call
    pub async fn debug_revert_reason(&self, tx_hash: B256) -> TransportResult<RevertReasonTrace> {
        let opts = GethDebugTracingOptions::default()
            .with_tracer(GethDebugTracerType::BuiltInTracer(GethDebugBuiltInTracerType::CallTracer))
            .with_config(CallConfig::default().only_top_call());

        let trace: CallFrame = self.rpc.request("debug_traceTransaction", (tx_hash, opts)).await?;

        // Prefer the decoded revert string, then the raw output that may hold a contract error.
        match trace.revert_reason {
            Some(reason) => Ok(RevertReasonTrace::String(reason)),
            None => match trace.output {
                Some(output) if !output.is_empty() => Ok(RevertReasonTrace::ContractBytes(output)),
                _ => Ok(RevertReasonTrace::Unknown),
            },
        }
    }
}

#[async_trait]
impl L1Client for ExecutionClient {
    async fn current_nonce(&self, address: Address) -> L1Result<u64> {
        Ok(self.inner.get_transaction_count(address).pending().await?)
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Option<Address>,
        value: U256,
        data: &Bytes,
    ) -> L1Result<u64> {
        let mut request = TransactionRequest::default()
            .from(from)
            .value(value)
            .input(TransactionInput::new(data.clone()));
        if let Some(to) = to {
            request = request.to(to);
        }

        match self.inner.estimate_gas(request).await {
            Ok(gas) => Ok(gas),
            Err(err) => match try_parse_transport_error::<IPolygonValidiumErrors>(err) {
                TryParseTransportErrorResult::Decoded(error) => {
                    Err(L1Error::Other(format!("gas estimation reverted: {error:?}")))
                }
                TryParseTransportErrorResult::UnknownSelector(data) => {
                    Err(L1Error::Other(format!("gas estimation reverted with data {data}")))
                }
                TryParseTransportErrorResult::Original(err) => Err(err.into()),
            },
        }
    }

    async fn send_transaction(&self, tx: &SignedTx) -> L1Result<()> {
        let hash: B256 = self.rpc.request("eth_sendRawTransaction", [tx.raw.clone()]).await?;
        if hash != tx.hash {
            warn!(expected = ?tx.hash, returned = ?hash, "Node returned an unexpected tx hash");
        }
        Ok(())
    }

    async fn get_tx(&self, hash: B256) -> L1Result<Option<L1Tx>> {
        let tx = self.inner.get_transaction_by_hash(hash).await?;
        Ok(tx.map(|tx| L1Tx { hash, nonce: tx.nonce(), pending: tx.block_number.is_none() }))
    }

    async fn get_tx_receipt(&self, hash: B256) -> L1Result<Option<MinedReceipt>> {
        let receipt = self.inner.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|r| MinedReceipt {
            tx_hash: r.transaction_hash,
            block_number: r.block_number,
            success: r.status(),
            gas_used: r.gas_used,
        }))
    }

    async fn wait_tx_to_be_mined(
        &self,
        hash: B256,
        timeout: Duration,
    ) -> L1Result<Option<MinedReceipt>> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(receipt) = self.get_tx_receipt(hash).await? {
                return Ok(Some(receipt));
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(?hash, ?timeout, "Timed out waiting for tx to be mined");
                return Ok(None);
            }

            sleep(RECEIPT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn sign_tx(&self, from: Address, mut tx: TxLegacy) -> L1Result<SignedTx> {
        if from != self.signer.address() {
            return Err(L1Error::UnknownSender(from));
        }

        tx.chain_id = Some(self.chain_id);
        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| L1Error::Signing(e.to_string()))?;

        let envelope = TxEnvelope::Legacy(tx.into_signed(signature));
        Ok(SignedTx { hash: *envelope.tx_hash(), raw: envelope.encoded_2718().into() })
    }

    async fn get_revert_message(&self, hash: B256) -> L1Result<RevertReason> {
        let trace = self.debug_revert_reason(hash).await?;
        Ok(trace.into_revert_reason::<IPolygonValidiumErrors>())
    }
}

#[async_trait]
impl GasPriceProvider for ExecutionClient {
    async fn suggest_gas_price(&self) -> L1Result<u128> {
        Ok(self.inner.get_gas_price().await?)
    }
}

/// The result of a `debug_traceTransaction` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReasonTrace {
    /// The revert reason is a string.
    String(String),
    /// The output is a bytes object.
    ContractBytes(Bytes),
    /// The reason is unknown
    Unknown,
}

impl RevertReasonTrace {
    /// Converts the trace into a [`RevertReason`], decoding contract errors of the given
    /// interface into their debug representation.
    pub fn into_revert_reason<I: SolInterface + std::fmt::Debug>(self) -> RevertReason {
        match self {
            Self::String(reason) => RevertReason::Message(reason),
            Self::ContractBytes(bytes) => match I::abi_decode(&bytes) {
                Ok(error) => RevertReason::Message(format!("{error:?}")),
                Err(_) => RevertReason::Data(bytes),
            },
            Self::Unknown => RevertReason::Unknown,
        }
    }
}
