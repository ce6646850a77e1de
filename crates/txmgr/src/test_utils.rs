use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy::{consensus::TxLegacy, transports::TransportErrorKind};
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use async_trait::async_trait;

use crate::{
    client::{GasPriceProvider, L1Client, L1Error, L1Result},
    types::{L1Tx, MinedReceipt, RevertReason, SignedTx},
};

/// An in-memory L1 whose mining behaviour is scripted by the test.
#[derive(Debug)]
pub(crate) struct ScriptedL1 {
    nonce: AtomicU64,
    gas_estimate: AtomicU64,
    fail_estimate: AtomicBool,
    wait_calls: AtomicUsize,
    broadcasts: AtomicUsize,
    mine_on_wait: Mutex<Option<(usize, bool)>>,
    wait_delay: Mutex<Duration>,
    revert_reason: Mutex<RevertReason>,
    sent: Mutex<HashSet<B256>>,
    receipts: Mutex<HashMap<B256, MinedReceipt>>,
}

impl Default for ScriptedL1 {
    fn default() -> Self {
        Self {
            nonce: AtomicU64::new(0),
            gas_estimate: AtomicU64::new(21_000),
            fail_estimate: AtomicBool::new(false),
            wait_calls: AtomicUsize::new(0),
            broadcasts: AtomicUsize::new(0),
            mine_on_wait: Mutex::new(None),
            wait_delay: Mutex::new(Duration::ZERO),
            revert_reason: Mutex::new(RevertReason::Unknown),
            sent: Mutex::default(),
            receipts: Mutex::default(),
        }
    }
}

impl ScriptedL1 {
    /// Signing a transaction with this input panics.
    pub(crate) const PANIC_DATA: &'static [u8] = b"panic";
    /// Signing a transaction with this input fails.
    pub(crate) const SIGN_ERROR_DATA: &'static [u8] = b"sign error";

    pub(crate) fn set_nonce(&self, nonce: u64) {
        self.nonce.store(nonce, Ordering::SeqCst);
    }

    pub(crate) fn set_gas_estimate(&self, gas: u64) {
        self.gas_estimate.store(gas, Ordering::SeqCst);
    }

    pub(crate) fn fail_estimate(&self, fail: bool) {
        self.fail_estimate.store(fail, Ordering::SeqCst);
    }

    /// Mines the awaited transaction on the `call`-th wait, counting from 1.
    pub(crate) fn mine_on_wait(&self, call: usize, success: bool) {
        *self.mine_on_wait.lock().unwrap() = Some((call, success));
    }

    /// Every wait for a receipt takes `delay` before looking the receipt up.
    pub(crate) fn set_wait_delay(&self, delay: Duration) {
        *self.wait_delay.lock().unwrap() = delay;
    }

    pub(crate) fn set_revert_reason(&self, reason: RevertReason) {
        *self.revert_reason.lock().unwrap() = reason;
    }

    pub(crate) fn broadcasts(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl L1Client for ScriptedL1 {
    async fn current_nonce(&self, _address: Address) -> L1Result<u64> {
        Ok(self.nonce.load(Ordering::SeqCst))
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _to: Option<Address>,
        _value: U256,
        _data: &Bytes,
    ) -> L1Result<u64> {
        if self.fail_estimate.load(Ordering::SeqCst) {
            return Err(TransportErrorKind::custom_str("execution reverted").into());
        }
        Ok(self.gas_estimate.load(Ordering::SeqCst))
    }

    async fn send_transaction(&self, tx: &SignedTx) -> L1Result<()> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().insert(tx.hash);
        Ok(())
    }

    async fn get_tx(&self, hash: B256) -> L1Result<Option<L1Tx>> {
        let known = self.sent.lock().unwrap().contains(&hash);
        let pending = !self.receipts.lock().unwrap().contains_key(&hash);
        Ok(known.then_some(L1Tx { hash, nonce: 0, pending }))
    }

    async fn get_tx_receipt(&self, hash: B256) -> L1Result<Option<MinedReceipt>> {
        Ok(self.receipts.lock().unwrap().get(&hash).copied())
    }

    async fn wait_tx_to_be_mined(
        &self,
        hash: B256,
        _timeout: Duration,
    ) -> L1Result<Option<MinedReceipt>> {
        let call = self.wait_calls.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut script = self.mine_on_wait.lock().unwrap();
            if let Some((at, success)) = *script {
                if at == call {
                    *script = None;
                    let receipt = MinedReceipt {
                        tx_hash: hash,
                        block_number: Some(100 + call as u64),
                        success,
                        gas_used: 21_000,
                    };
                    self.receipts.lock().unwrap().insert(hash, receipt);
                }
            }
        }

        let delay = *self.wait_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.get_tx_receipt(hash).await
    }

    async fn sign_tx(&self, from: Address, tx: TxLegacy) -> L1Result<SignedTx> {
        assert!(tx.input.as_ref() != Self::PANIC_DATA, "signer exploded");
        if tx.input.as_ref() == Self::SIGN_ERROR_DATA {
            return Err(L1Error::Signing("key unavailable".to_owned()));
        }

        let mut preimage = from.to_vec();
        preimage.extend_from_slice(&tx.nonce.to_be_bytes());
        preimage.extend_from_slice(&tx.gas_limit.to_be_bytes());
        preimage.extend_from_slice(&tx.gas_price.to_be_bytes());
        preimage.extend_from_slice(&tx.input);

        Ok(SignedTx { hash: keccak256(&preimage), raw: Bytes::from(preimage) })
    }

    async fn get_revert_message(&self, _hash: B256) -> L1Result<RevertReason> {
        Ok(self.revert_reason.lock().unwrap().clone())
    }
}

/// A gas price provider returning an adjustable price.
#[derive(Debug)]
pub(crate) struct FixedGasPrice(AtomicU64);

impl FixedGasPrice {
    pub(crate) const fn new(price: u64) -> Self {
        Self(AtomicU64::new(price))
    }

    pub(crate) fn set(&self, price: u64) {
        self.0.store(price, Ordering::SeqCst);
    }
}

#[async_trait]
impl GasPriceProvider for FixedGasPrice {
    async fn suggest_gas_price(&self) -> L1Result<u128> {
        Ok(self.0.load(Ordering::SeqCst).into())
    }
}

/// A gas price provider that always fails.
#[derive(Debug)]
pub(crate) struct FailingGasPrice;

#[async_trait]
impl GasPriceProvider for FailingGasPrice {
    async fn suggest_gas_price(&self) -> L1Result<u128> {
        Err(L1Error::Other("provider unavailable".to_owned()))
    }
}
