use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, task::JoinSet, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use seqs_primitives::{summary::Summary, time::current_timestamp_seconds};

use crate::{
    client::L1Client,
    errors::TxManagerError,
    gas::GasPricer,
    metrics::TxManagerMetrics,
    store::MonitoredTxStore,
    types::{MonitoredTx, MonitoredTxResult, MonitoredTxStatus, RevertReason, TxRequest, TxResult},
};

/// Configuration of the [`TxManager`].
#[derive(Debug, Clone)]
pub struct TxManagerConfig {
    /// Interval between monitoring ticks.
    pub monitor_interval: Duration,
    /// How long a tick waits for a broadcast variant to be mined.
    pub wait_tx_mined_timeout: Duration,
    /// Gas limit used when estimation fails. Zero disables the fallback.
    pub forced_gas: u64,
    /// Interval between polls while waiting for pending transactions of an owner.
    pub pending_poll_interval: Duration,
}

impl Default for TxManagerConfig {
    fn default() -> Self {
        Self {
            monitor_interval: Duration::from_secs(1),
            wait_tx_mined_timeout: Duration::from_secs(120),
            forced_gas: 0,
            pending_poll_interval: Duration::from_secs(1),
        }
    }
}

/// Tracks L1 transactions until they are confirmed or definitively failed.
///
/// The manager is cheap to clone: clones share the same store, client and cancellation token.
#[derive(Debug)]
pub struct TxManager<C> {
    l1: Arc<C>,
    gas_pricer: Arc<GasPricer>,
    store: MonitoredTxStore,
    config: TxManagerConfig,
    cancel: CancellationToken,
}

impl<C> Clone for TxManager<C> {
    fn clone(&self) -> Self {
        Self {
            l1: Arc::clone(&self.l1),
            gas_pricer: Arc::clone(&self.gas_pricer),
            store: self.store.clone(),
            config: self.config.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<C: L1Client + 'static> TxManager<C> {
    /// Creates a new manager over the given store.
    pub fn new(
        l1: C,
        gas_pricer: GasPricer,
        store: MonitoredTxStore,
        config: TxManagerConfig,
    ) -> Self {
        Self {
            l1: Arc::new(l1),
            gas_pricer: Arc::new(gas_pricer),
            store,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a handle to the underlying store.
    pub const fn store(&self) -> &MonitoredTxStore {
        &self.store
    }

    /// Starts tracking a new transaction.
    ///
    /// The nonce, gas limit and gas price are resolved here. If gas estimation fails and a
    /// forced gas limit is configured, the forced value is used instead.
    pub async fn add(
        &self,
        owner: &str,
        id: &str,
        request: TxRequest,
    ) -> Result<(), TxManagerError> {
        if self.store.contains(id) {
            return Err(TxManagerError::AlreadyExists(id.to_owned()));
        }

        let nonce = self.l1.current_nonce(request.from).await?;

        let gas = match self
            .l1
            .estimate_gas(request.from, request.to, request.value, &request.data)
            .await
        {
            Ok(gas) => gas,
            Err(err) if self.config.forced_gas > 0 => {
                warn!(id, %err, forced_gas = self.config.forced_gas, "Gas estimation failed, using forced gas");
                self.config.forced_gas
            }
            Err(err) => return Err(err.into()),
        };

        let gas_price = self.gas_pricer.suggested_gas_price().await?;

        let mtx =
            MonitoredTx::new(owner, id, request, nonce, gas, gas_price, current_timestamp_seconds());
        info!(owner, summary = mtx.summary(), "📝 Monitored tx added");
        self.store.add(mtx)?;

        TxManagerMetrics::increment_txs_added(owner);
        Ok(())
    }

    /// Returns the outcome of a monitored transaction owned by `owner`.
    pub async fn result(
        &self,
        owner: &str,
        id: &str,
    ) -> Result<MonitoredTxResult, TxManagerError> {
        let mtx = self.store.get(Some(owner), id)?;
        self.build_result(&mtx).await
    }

    /// Returns the outcomes of every transaction in any of `statuses`, oldest first.
    pub async fn results_by_status(
        &self,
        owner: Option<&str>,
        statuses: &[MonitoredTxStatus],
    ) -> Result<Vec<MonitoredTxResult>, TxManagerError> {
        let mut results = Vec::new();
        for mtx in self.store.get_by_status(owner, statuses) {
            results.push(self.build_result(&mtx).await?);
        }
        Ok(results)
    }

    /// Spawns the monitoring loop. It runs one [`Self::monitor_txs`] tick per interval until
    /// [`Self::stop`] is called. An in-flight tick always completes.
    pub fn start(&self) -> JoinHandle<()> {
        let this = self.clone();

        tokio::spawn(async move {
            info!(interval = ?this.config.monitor_interval, "🔭 Monitored tx manager started");

            loop {
                tokio::select! {
                    _ = this.cancel.cancelled() => break,
                    _ = tokio::time::sleep(this.config.monitor_interval) => this.monitor_txs().await,
                }
            }

            info!("Monitored tx manager stopped");
        })
    }

    /// Stops the monitoring loop. Calling this more than once has no further effect.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Runs a single monitoring tick over every `Created` and `Sent` transaction.
    ///
    /// Each transaction is processed in its own task, so an error or panic while handling one
    /// of them does not affect the others.
    pub async fn monitor_txs(&self) {
        let txs = self
            .store
            .get_by_status(None, &[MonitoredTxStatus::Created, MonitoredTxStatus::Sent]);
        if txs.is_empty() {
            return;
        }

        let start = Instant::now();
        debug!(count = txs.len(), "Monitoring txs");

        let mut tasks = JoinSet::new();
        for mtx in txs {
            let this = self.clone();
            tasks.spawn(async move {
                let id = mtx.id.clone();
                (id, this.monitor_tx(mtx).await)
            });
        }

        while let Some(res) = tasks.join_next().await {
            match res {
                Ok((_, Ok(()))) => {}
                Ok((id, Err(err))) => error!(id, %err, "Failed to monitor tx"),
                Err(err) => error!(%err, "Monitor task panicked"),
            }
        }

        TxManagerMetrics::record_tick_duration(start.elapsed());
    }

    /// Evaluates a single monitored transaction and advances it as far as possible.
    async fn monitor_tx(&self, mut mtx: MonitoredTx) -> Result<(), TxManagerError> {
        let mut has_failed_receipts = false;
        let mut all_history_mined = true;

        for hash in mtx.history.clone() {
            match self.l1.check_tx_was_mined(hash).await {
                Ok(Some(receipt)) if receipt.success => {
                    info!(id = mtx.id, ?hash, block = ?receipt.block_number, "Found mined tx in history");
                    mtx.block_number = receipt.block_number;
                    return self.finalize(mtx, MonitoredTxStatus::Confirmed);
                }
                Ok(Some(_)) => has_failed_receipts = true,
                Ok(None) => all_history_mined = false,
                // A failed lookup counts as not mined, so no nonce review on partial data.
                Err(err) => {
                    warn!(id = mtx.id, ?hash, %err, "Failed to check if tx was mined");
                    all_history_mined = false;
                }
            }
        }

        // Every variant was mined and reverted: the nonce may have been consumed.
        if has_failed_receipts && all_history_mined {
            self.review_nonce(&mut mtx).await?;
        }

        if mtx.status == MonitoredTxStatus::Sent {
            self.review_gas(&mut mtx).await?;
        }

        let signed = self.l1.sign_tx(mtx.from, mtx.unsigned_tx()).await?;
        if mtx.add_history(signed.hash) {
            debug!(id = mtx.id, hash = ?signed.hash, history = mtx.history.len(), "Signed new tx variant");
            self.store.update(mtx.clone())?;
        }

        if self.l1.get_tx(signed.hash).await?.is_some() {
            debug!(id = mtx.id, hash = ?signed.hash, "Tx already known to the network");
        } else {
            self.l1.send_transaction(&signed).await?;
            TxManagerMetrics::increment_broadcasts();
            info!(id = mtx.id, hash = ?signed.hash, nonce = mtx.nonce, gas_price = mtx.gas_price, "📡 Tx broadcast");

            if mtx.status == MonitoredTxStatus::Created {
                mtx.status = MonitoredTxStatus::Sent;
                self.store.update(mtx.clone())?;
            }
        }

        let Some(receipt) =
            self.l1.wait_tx_to_be_mined(signed.hash, self.config.wait_tx_mined_timeout).await?
        else {
            debug!(id = mtx.id, hash = ?signed.hash, "Tx not mined yet");
            return Ok(());
        };

        mtx.block_number = receipt.block_number;
        if receipt.success {
            info!(id = mtx.id, hash = ?signed.hash, block = ?receipt.block_number, "✅ Tx mined");
            return self.finalize(mtx, MonitoredTxStatus::Confirmed);
        }

        match self.l1.get_revert_message(signed.hash).await {
            Ok(RevertReason::Unknown) => {
                warn!(id = mtx.id, hash = ?signed.hash, "Tx reverted with unknown reason, monitoring continues");
                Ok(())
            }
            Ok(reason) => {
                error!(id = mtx.id, hash = ?signed.hash, %reason, "❌ Tx reverted");
                self.finalize(mtx, MonitoredTxStatus::Failed)
            }
            Err(err) => {
                error!(id = mtx.id, hash = ?signed.hash, %err, "❌ Tx reverted, failed to fetch the reason");
                self.finalize(mtx, MonitoredTxStatus::Failed)
            }
        }
    }

    /// Moves the nonce forward if the account nonce on L1 is ahead of it.
    async fn review_nonce(&self, mtx: &mut MonitoredTx) -> Result<(), TxManagerError> {
        let nonce = self.l1.current_nonce(mtx.from).await?;
        let previous = mtx.nonce;
        if mtx.raise_nonce(nonce) {
            info!(id = mtx.id, previous, nonce, "Nonce raised");
            TxManagerMetrics::increment_escalations("nonce");
        }
        Ok(())
    }

    /// Raises the gas limit and gas price to the current estimates, if they are higher.
    async fn review_gas(&self, mtx: &mut MonitoredTx) -> Result<(), TxManagerError> {
        let gas = match self.l1.estimate_gas(mtx.from, mtx.to, mtx.value, &mtx.data).await {
            Ok(gas) => gas,
            Err(err) if self.config.forced_gas > 0 => {
                debug!(id = mtx.id, %err, "Gas re-estimation failed, using forced gas");
                self.config.forced_gas
            }
            Err(err) => return Err(err.into()),
        };

        let previous = mtx.gas;
        if mtx.raise_gas(gas) {
            info!(id = mtx.id, previous, gas, "Gas limit raised");
            TxManagerMetrics::increment_escalations("gas");
        }

        let gas_price = self.gas_pricer.suggested_gas_price().await?;
        let previous = mtx.gas_price;
        if mtx.raise_gas_price(gas_price) {
            info!(id = mtx.id, previous, gas_price, "Gas price raised");
            TxManagerMetrics::increment_escalations("gas_price");
        }

        Ok(())
    }

    fn finalize(
        &self,
        mut mtx: MonitoredTx,
        status: MonitoredTxStatus,
    ) -> Result<(), TxManagerError> {
        mtx.status = status;
        self.store.update(mtx)?;
        TxManagerMetrics::increment_terminal(status);
        Ok(())
    }

    /// Hands every settled transaction of `owner` to `on_result`, then waits for pending ones.
    ///
    /// Confirmed transactions are moved to `Done` and failed ones are marked as reported
    /// before the callback runs, so each outcome is delivered exactly once. Returns when
    /// `owner` has no `Created` or `Sent` transactions left.
    pub async fn process_pending_monitored_txs<F>(&self, owner: &str, mut on_result: F)
    where
        F: FnMut(MonitoredTxResult),
    {
        loop {
            let txs = self.store.get_by_status(
                Some(owner),
                &[
                    MonitoredTxStatus::Created,
                    MonitoredTxStatus::Sent,
                    MonitoredTxStatus::Confirmed,
                    MonitoredTxStatus::Failed,
                ],
            );

            let mut pending = 0usize;
            for mtx in txs {
                match mtx.status {
                    MonitoredTxStatus::Created | MonitoredTxStatus::Sent => {
                        pending += 1;
                        continue;
                    }
                    MonitoredTxStatus::Failed if mtx.failure_reported => continue,
                    _ => {}
                }

                let result = match self.build_result(&mtx).await {
                    Ok(result) => result,
                    Err(err) => {
                        error!(id = mtx.id, %err, "Failed to build monitored tx result");
                        pending += 1;
                        continue;
                    }
                };

                let mut settled = mtx;
                if settled.status == MonitoredTxStatus::Confirmed {
                    settled.status = MonitoredTxStatus::Done;
                } else {
                    settled.failure_reported = true;
                }

                if let Err(err) = self.store.update(settled) {
                    error!(id = result.id, %err, "Failed to settle monitored tx");
                    pending += 1;
                    continue;
                }

                on_result(result);
            }

            if pending == 0 {
                return;
            }

            debug!(owner, pending, "Waiting for pending monitored txs");
            tokio::time::sleep(self.config.pending_poll_interval).await;
        }
    }

    async fn build_result(&self, mtx: &MonitoredTx) -> Result<MonitoredTxResult, TxManagerError> {
        let mut txs = Vec::with_capacity(mtx.history.len());

        for hash in &mtx.history {
            let tx = self.l1.get_tx(*hash).await?;
            let receipt = self.l1.get_tx_receipt(*hash).await?;

            let revert_reason = match receipt {
                Some(receipt) if !receipt.success => {
                    match self.l1.get_revert_message(*hash).await {
                        Ok(reason) => Some(reason),
                        Err(err) => {
                            warn!(id = mtx.id, ?hash, %err, "Failed to fetch revert reason");
                            Some(RevertReason::Unknown)
                        }
                    }
                }
                _ => None,
            };

            txs.push(TxResult { hash: *hash, tx, receipt, revert_reason });
        }

        Ok(MonitoredTxResult {
            id: mtx.id.clone(),
            status: mtx.status,
            block_number: mtx.block_number,
            txs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use alloy_primitives::{Address, Bytes, U256};

    use super::*;
    use crate::{
        client::GasPriceProvider,
        test_utils::{FixedGasPrice, ScriptedL1},
    };

    const OWNER: &str = "owner";

    fn request(data: &'static [u8]) -> TxRequest {
        TxRequest {
            from: Address::repeat_byte(1),
            to: Some(Address::repeat_byte(2)),
            value: U256::ZERO,
            data: Bytes::from_static(data),
            gas_offset: 80_000,
        }
    }

    fn manager(l1: ScriptedL1, price: Arc<FixedGasPrice>) -> TxManager<ScriptedL1> {
        manager_with(l1, price, TxManagerConfig::default())
    }

    fn manager_with(
        l1: ScriptedL1,
        price: Arc<FixedGasPrice>,
        config: TxManagerConfig,
    ) -> TxManager<ScriptedL1> {
        let providers: Vec<Arc<dyn GasPriceProvider>> = vec![price];
        TxManager::new(
            l1,
            GasPricer::new(providers, 1.0, 0),
            MonitoredTxStore::new(),
            TxManagerConfig { wait_tx_mined_timeout: Duration::from_millis(10), ..config },
        )
    }

    fn stored(mgr: &TxManager<ScriptedL1>, id: &str) -> MonitoredTx {
        mgr.store().get(Some(OWNER), id).unwrap()
    }

    #[tokio::test]
    async fn test_tx_confirmed_after_several_ticks() {
        let price = Arc::new(FixedGasPrice::new(10));
        let mgr = manager(ScriptedL1::default(), Arc::clone(&price));

        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();
        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.status, MonitoredTxStatus::Created);
        assert!(mtx.history.is_empty());
        assert_eq!(mtx.gas_limit(), 21_000 + 80_000);

        // The variant is mined successfully while waiting in the fourth tick.
        mgr.l1.mine_on_wait(4, true);

        let mut statuses = Vec::new();
        let mut history = Vec::new();
        for tick in 1..=4 {
            if tick == 3 {
                price.set(20);
            }
            mgr.monitor_txs().await;
            let mtx = stored(&mgr, "tx-1");
            statuses.push(mtx.status);
            history.push(mtx.history.len());
        }

        use MonitoredTxStatus as S;
        assert_eq!(statuses, [S::Sent, S::Sent, S::Sent, S::Confirmed]);
        // The history only grows when the gas price escalates.
        assert_eq!(history, [1, 1, 2, 2]);
        assert_eq!(mgr.l1.broadcasts(), 2);

        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.gas_price, 20);
        assert!(mtx.block_number.is_some());

        let result = mgr.result(OWNER, "tx-1").await.unwrap();
        assert_eq!(result.status, MonitoredTxStatus::Confirmed);
        assert_eq!(result.txs.len(), 2);
        assert!(result.txs[1].receipt.is_some_and(|r| r.success));
    }

    #[tokio::test]
    async fn test_unknown_revert_keeps_monitoring() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();

        mgr.l1.mine_on_wait(1, false);
        mgr.l1.set_revert_reason(RevertReason::Unknown);

        mgr.monitor_txs().await;
        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.status, MonitoredTxStatus::Sent);

        // The next tick finds every variant mined and failed, and reviews the nonce.
        mgr.l1.set_nonce(5);
        mgr.monitor_txs().await;
        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.status, MonitoredTxStatus::Sent);
        assert_eq!(mtx.nonce, 5);
        assert_eq!(mtx.history.len(), 2);

        // Nonces never move backwards.
        mgr.l1.set_nonce(3);
        mgr.monitor_txs().await;
        assert_eq!(stored(&mgr, "tx-1").nonce, 5);
    }

    #[tokio::test]
    async fn test_identified_revert_fails_tx() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();

        mgr.l1.mine_on_wait(1, false);
        mgr.l1.set_revert_reason(RevertReason::Message("OnlyTrustedSequencer".to_owned()));

        mgr.monitor_txs().await;
        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.status, MonitoredTxStatus::Failed);
        assert!(mtx.block_number.is_some());

        // Terminal transactions are not monitored anymore.
        mgr.monitor_txs().await;
        assert_eq!(stored(&mgr, "tx-1").history.len(), 1);

        let result = mgr.result(OWNER, "tx-1").await.unwrap();
        assert_eq!(
            result.txs[0].revert_reason,
            Some(RevertReason::Message("OnlyTrustedSequencer".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_gas_parameters_never_decrease() {
        let price = Arc::new(FixedGasPrice::new(50));
        let mgr = manager(ScriptedL1::default(), Arc::clone(&price));
        mgr.l1.set_gas_estimate(40_000);

        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();
        mgr.monitor_txs().await;

        price.set(10);
        mgr.l1.set_gas_estimate(30_000);
        mgr.monitor_txs().await;

        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.gas, 40_000);
        assert_eq!(mtx.gas_price, 50);
        assert_eq!(mtx.history.len(), 1);

        mgr.l1.set_gas_estimate(45_000);
        mgr.monitor_txs().await;

        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.gas, 45_000);
        assert_eq!(mtx.history.len(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_id() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();

        let err = mgr.add("other", "tx-1", request(b"seq")).await.unwrap_err();
        assert!(matches!(err, TxManagerError::AlreadyExists(_)));
        assert_eq!(mgr.store().len(), 1);
    }

    #[tokio::test]
    async fn test_forced_gas_fallback() {
        let l1 = ScriptedL1::default();
        l1.fail_estimate(true);
        let config = TxManagerConfig { forced_gas: 500_000, ..Default::default() };
        let mgr = manager_with(l1, Arc::new(FixedGasPrice::new(10)), config);

        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();
        assert_eq!(stored(&mgr, "tx-1").gas, 500_000);

        let l1 = ScriptedL1::default();
        l1.fail_estimate(true);
        let mgr = manager(l1, Arc::new(FixedGasPrice::new(10)));
        let err = mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap_err();
        assert!(matches!(err, TxManagerError::L1(_)));
        assert!(mgr.store().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_tx_does_not_affect_others() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"one")).await.unwrap();
        mgr.add(OWNER, "tx-2", request(ScriptedL1::PANIC_DATA)).await.unwrap();
        mgr.add(OWNER, "tx-3", request(b"three")).await.unwrap();

        mgr.monitor_txs().await;

        assert_eq!(stored(&mgr, "tx-1").status, MonitoredTxStatus::Sent);
        assert_eq!(stored(&mgr, "tx-2").status, MonitoredTxStatus::Created);
        assert_eq!(stored(&mgr, "tx-3").status, MonitoredTxStatus::Sent);
    }

    #[tokio::test]
    async fn test_failing_tx_does_not_affect_others() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"one")).await.unwrap();
        mgr.add(OWNER, "tx-2", request(ScriptedL1::SIGN_ERROR_DATA)).await.unwrap();
        mgr.add(OWNER, "tx-3", request(b"three")).await.unwrap();

        mgr.monitor_txs().await;

        assert_eq!(stored(&mgr, "tx-1").status, MonitoredTxStatus::Sent);
        let failing = stored(&mgr, "tx-2");
        assert_eq!(failing.status, MonitoredTxStatus::Created);
        assert!(failing.history.is_empty());
        assert_eq!(stored(&mgr, "tx-3").status, MonitoredTxStatus::Sent);
        assert_eq!(mgr.l1.broadcasts(), 2);
    }

    #[tokio::test]
    async fn test_result_unknown_owner() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();

        assert!(matches!(mgr.result("other", "tx-1").await, Err(TxManagerError::NotFound(_))));
        assert_eq!(mgr.results_by_status(None, &[]).await.unwrap().len(), 1);
        assert!(
            mgr.results_by_status(Some(OWNER), &[MonitoredTxStatus::Done])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_process_pending_delivers_each_outcome_once() {
        let mgr = manager(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)));

        mgr.add(OWNER, "ok", request(b"ok")).await.unwrap();
        mgr.l1.mine_on_wait(1, true);
        mgr.monitor_txs().await;

        mgr.add(OWNER, "ko", request(b"ko")).await.unwrap();
        mgr.l1.mine_on_wait(2, false);
        mgr.l1.set_revert_reason(RevertReason::Message("reverted".to_owned()));
        mgr.monitor_txs().await;

        let mut delivered = Vec::new();
        mgr.process_pending_monitored_txs(OWNER, |r| delivered.push((r.id, r.status))).await;
        delivered.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            delivered,
            [
                ("ko".to_owned(), MonitoredTxStatus::Failed),
                ("ok".to_owned(), MonitoredTxStatus::Confirmed)
            ]
        );

        assert_eq!(stored(&mgr, "ok").status, MonitoredTxStatus::Done);
        let failed = stored(&mgr, "ko");
        assert_eq!(failed.status, MonitoredTxStatus::Failed);
        assert!(failed.failure_reported);

        let mut again = 0;
        mgr.process_pending_monitored_txs(OWNER, |_| again += 1).await;
        assert_eq!(again, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_pending_waits_for_sent_txs() {
        let config =
            TxManagerConfig { monitor_interval: Duration::from_millis(100), ..Default::default() };
        let mgr = manager_with(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)), config);
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();
        mgr.l1.mine_on_wait(3, true);

        let handle = mgr.start();

        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delivered);
        mgr.process_pending_monitored_txs(OWNER, move |r| sink.lock().unwrap().push(r.id)).await;

        assert_eq!(*delivered.lock().unwrap(), ["tx-1"]);
        assert_eq!(stored(&mgr, "tx-1").status, MonitoredTxStatus::Done);

        mgr.stop();
        mgr.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_in_flight_tick_finish() {
        let config =
            TxManagerConfig { monitor_interval: Duration::from_secs(1), ..Default::default() };
        let mgr = manager_with(ScriptedL1::default(), Arc::new(FixedGasPrice::new(10)), config);
        mgr.add(OWNER, "tx-1", request(b"seq")).await.unwrap();
        mgr.l1.set_wait_delay(Duration::from_secs(10));
        mgr.l1.mine_on_wait(1, true);

        let handle = mgr.start();

        // The first tick starts after one second, then waits ten seconds for the receipt.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(stored(&mgr, "tx-1").status, MonitoredTxStatus::Sent);

        mgr.stop();
        handle.await.unwrap();

        let mtx = stored(&mgr, "tx-1");
        assert_eq!(mtx.status, MonitoredTxStatus::Confirmed);
        assert!(mtx.block_number.is_some());
    }
}
