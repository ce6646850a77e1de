use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy::consensus::TxLegacy;
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use async_trait::async_trait;
use seqs_da::{BlobId, DaClient, DaClientError, Namespace};
use seqs_primitives::Batch;
use seqs_txmgr::{
    GasPriceProvider, L1Client, L1Error, L1Result, L1Tx, MinedReceipt, RevertReason, SignedTx,
};

use crate::BatchSource;

/// A batch source handing out a fixed list of batches.
#[derive(Debug)]
pub(crate) struct ScriptedSource(VecDeque<Batch>);

impl ScriptedSource {
    pub(crate) fn new(batches: Vec<Batch>) -> Self {
        Self(batches.into())
    }
}

#[async_trait]
impl BatchSource for ScriptedSource {
    async fn next_batches(&mut self, max: usize) -> Vec<Batch> {
        let count = max.min(self.0.len());
        self.0.drain(..count).collect()
    }
}

/// An in-memory DA node that includes every blob immediately.
#[derive(Debug, Default)]
pub(crate) struct MemoryDa {
    blobs: Mutex<HashMap<BlobId, Bytes>>,
    pub(crate) submits: AtomicUsize,
    pub(crate) fail_submit: AtomicBool,
}

#[async_trait]
impl DaClient for MemoryDa {
    async fn submit(
        &self,
        blobs: &[Bytes],
        _gas_price: f64,
        _namespace: &Namespace,
    ) -> Result<Vec<BlobId>, DaClientError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(DaClientError::Rpc { code: -32000, message: "node syncing".to_owned() });
        }
        self.submits.fetch_add(1, Ordering::SeqCst);

        let mut stored = self.blobs.lock().unwrap();
        Ok(blobs
            .iter()
            .map(|blob| {
                let id = Bytes::from(keccak256(blob).to_vec());
                stored.insert(id.clone(), blob.clone());
                id
            })
            .collect())
    }

    async fn get_proofs(
        &self,
        ids: &[BlobId],
        _namespace: &Namespace,
    ) -> Result<Vec<Bytes>, DaClientError> {
        Ok(ids.iter().map(|_| Bytes::from_static(b"proof")).collect())
    }

    async fn get(&self, ids: &[BlobId], _namespace: &Namespace) -> Result<Vec<Bytes>, DaClientError> {
        let stored = self.blobs.lock().unwrap();
        Ok(ids.iter().filter_map(|id| stored.get(id).cloned()).collect())
    }
}

#[derive(Debug, Default)]
struct MinedL1State {
    nonce: AtomicU64,
    fail_estimate: AtomicBool,
    revert: Mutex<Option<RevertReason>>,
    sent: Mutex<HashSet<B256>>,
    receipts: Mutex<HashMap<B256, MinedReceipt>>,
}

/// An in-memory L1 that mines every broadcast transaction as soon as it is awaited.
///
/// Mined transactions consume the sender nonce, reverted or not.
#[derive(Debug, Clone, Default)]
pub(crate) struct MinedL1(Arc<MinedL1State>);

impl MinedL1 {
    /// Transactions mined from now on revert with `reason`, or succeed if `None`.
    pub(crate) fn revert_with(&self, reason: Option<RevertReason>) {
        *self.0.revert.lock().unwrap() = reason;
    }

    pub(crate) fn fail_estimate(&self, fail: bool) {
        self.0.fail_estimate.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl L1Client for MinedL1 {
    async fn current_nonce(&self, _address: Address) -> L1Result<u64> {
        Ok(self.0.nonce.load(Ordering::SeqCst))
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _to: Option<Address>,
        _value: U256,
        _data: &Bytes,
    ) -> L1Result<u64> {
        if self.0.fail_estimate.load(Ordering::SeqCst) {
            return Err(L1Error::Other("execution reverted".to_owned()));
        }
        Ok(250_000)
    }

    async fn send_transaction(&self, tx: &SignedTx) -> L1Result<()> {
        self.0.sent.lock().unwrap().insert(tx.hash);
        Ok(())
    }

    async fn get_tx(&self, hash: B256) -> L1Result<Option<L1Tx>> {
        let known = self.0.sent.lock().unwrap().contains(&hash);
        let pending = !self.0.receipts.lock().unwrap().contains_key(&hash);
        Ok(known.then_some(L1Tx { hash, nonce: 0, pending }))
    }

    async fn get_tx_receipt(&self, hash: B256) -> L1Result<Option<MinedReceipt>> {
        Ok(self.0.receipts.lock().unwrap().get(&hash).copied())
    }

    async fn wait_tx_to_be_mined(
        &self,
        hash: B256,
        _timeout: Duration,
    ) -> L1Result<Option<MinedReceipt>> {
        if !self.0.sent.lock().unwrap().contains(&hash) {
            return Ok(None);
        }

        let success = self.0.revert.lock().unwrap().is_none();
        let mut receipts = self.0.receipts.lock().unwrap();
        let receipt = *receipts.entry(hash).or_insert_with(|| {
            let block = self.0.nonce.fetch_add(1, Ordering::SeqCst) + 1;
            MinedReceipt { tx_hash: hash, block_number: Some(block), success, gas_used: 200_000 }
        });
        Ok(Some(receipt))
    }

    async fn sign_tx(&self, from: Address, tx: TxLegacy) -> L1Result<SignedTx> {
        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&tx.nonce.to_be_bytes());
        preimage.extend_from_slice(&tx.gas_limit.to_be_bytes());
        preimage.extend_from_slice(&tx.gas_price.to_be_bytes());
        preimage.extend_from_slice(&tx.input);

        Ok(SignedTx { hash: keccak256(&preimage), raw: Bytes::from(preimage) })
    }

    async fn get_revert_message(&self, _hash: B256) -> L1Result<RevertReason> {
        Ok(self.0.revert.lock().unwrap().clone().unwrap_or(RevertReason::Unknown))
    }
}

/// A gas price provider returning a fixed price.
#[derive(Debug)]
pub(crate) struct FixedGasPrice(pub(crate) u128);

#[async_trait]
impl GasPriceProvider for FixedGasPrice {
    async fn suggest_gas_price(&self) -> L1Result<u128> {
        Ok(self.0)
    }
}
