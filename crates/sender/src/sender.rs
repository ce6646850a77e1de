use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use alloy_primitives::{Address, Bytes, U256};
use seqs_chainio::validium::ValidiumSequencer;
use seqs_da::{DaBatcher, DaClient};
use seqs_primitives::{Batch, batch::batch_range, summary::Summary};
use seqs_txmgr::{L1Client, MonitoredTxResult, MonitoredTxStatus, TxManager, TxRequest};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{SenderError, metrics::SenderMetrics, source::BatchSource, trigger::SendTrigger};

/// The owner of the monitored transactions sent by the sequence sender.
pub const SENDER_OWNER: &str = "sequencer";

/// Configuration of the [`SequenceSender`].
#[derive(Debug, Clone)]
pub struct SequenceSenderConfig {
    /// The sender of the sequencing transactions.
    pub from: Address,
    /// Extra gas added on top of the estimated gas of sequencing transactions.
    pub gas_offset: u64,
    /// Maximum number of batches gathered per cycle.
    pub max_batches_per_l1_tx: usize,
    /// Wait after a failed cycle.
    pub wait_period: Duration,
    /// Wait when there is nothing to do.
    pub idle_interval: Duration,
}

/// The outcome of a single [`SequenceSender::cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing to send: the trigger was not armed or the source was empty.
    Idle,
    /// A sequencing transaction failed on L1. It will be resubmitted next cycle.
    Aborted,
    /// A failed sequence was resubmitted under the given id.
    Resubmitted(String),
    /// The gathered batches were absorbed by the DA batcher.
    Absorbed,
    /// A new sequence was handed to the tx manager under the given id.
    Sent(String),
    /// The cycle failed and the sender backed off. No batch was lost.
    Failed,
}

/// A sequence committed to the DA network.
#[derive(Debug, Clone)]
struct Sequence {
    batches: Vec<Batch>,
    da_message: Bytes,
    attempt: u32,
}

impl Sequence {
    /// The monitored transaction id of this attempt.
    fn id(&self) -> String {
        let (from, to) = batch_range(&self.batches).unwrap_or_default();
        if self.attempt == 0 {
            format!("sequence-from-{from}-to-{to}")
        } else {
            format!("sequence-from-{from}-to-{to}-retry-{}", self.attempt)
        }
    }
}

/// The control loop gluing the DA batcher and the tx manager.
///
/// Every cycle first waits for the outcome of the sequences in flight. Failed sequences are
/// resubmitted before anything new is sent. New batches are only gathered when the operator
/// arms the [`SendTrigger`].
pub struct SequenceSender<D, C> {
    batcher: DaBatcher<D>,
    txmgr: TxManager<C>,
    sequencer: ValidiumSequencer,
    source: Box<dyn BatchSource>,
    trigger: SendTrigger,
    config: SequenceSenderConfig,
    /// Batches accepted by the batcher and not yet committed.
    absorbed: Vec<Batch>,
    /// Batches gathered from the source and not yet accepted by the batcher.
    gathered: Vec<Batch>,
    /// Sequences handed to the tx manager, by monitored tx id.
    in_flight: HashMap<String, Sequence>,
    /// Committed sequences waiting to be (re)submitted to L1, oldest first.
    retries: VecDeque<Sequence>,
}

impl<D, C> std::fmt::Debug for SequenceSender<D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceSender")
            .field("sequencer", &self.sequencer)
            .field("config", &self.config)
            .field("absorbed", &self.absorbed.len())
            .field("gathered", &self.gathered.len())
            .field("in_flight", &self.in_flight.len())
            .field("retries", &self.retries.len())
            .finish_non_exhaustive()
    }
}

impl<D: DaClient, C: L1Client + 'static> SequenceSender<D, C> {
    /// Creates a new [`SequenceSender`].
    pub fn new(
        batcher: DaBatcher<D>,
        txmgr: TxManager<C>,
        sequencer: ValidiumSequencer,
        source: Box<dyn BatchSource>,
        trigger: SendTrigger,
        config: SequenceSenderConfig,
    ) -> Self {
        Self {
            batcher,
            txmgr,
            sequencer,
            source,
            trigger,
            config,
            absorbed: Vec::new(),
            gathered: Vec::new(),
            in_flight: HashMap::new(),
            retries: VecDeque::new(),
        }
    }

    /// Runs the sender forever. Cycle failures are logged and retried, so this never returns.
    pub async fn run(mut self) {
        info!(config = ?self.config, "🚀 Sequence sender started");

        loop {
            let outcome = self.cycle().await;
            debug!(?outcome, "Sequence sender cycle done");
        }
    }

    /// Runs a single cycle. Errors are logged and followed by a back-off, never propagated.
    pub async fn cycle(&mut self) -> CycleOutcome {
        if self.drain_pending_txs().await {
            return CycleOutcome::Aborted;
        }

        if let Some(sequence) = self.retries.pop_front() {
            return match self.submit(sequence).await {
                Ok(id) => CycleOutcome::Resubmitted(id),
                Err(err) => self.back_off(err).await,
            };
        }

        if self.gathered.is_empty() {
            if !self.trigger.take() {
                sleep(self.config.idle_interval).await;
                return CycleOutcome::Idle;
            }

            self.gathered = self.gather().await;
            if self.gathered.is_empty() {
                debug!("Batch source is empty");
                return CycleOutcome::Idle;
            }
        }

        let payloads = self.gathered.iter().map(|b| b.l2_data.clone()).collect();
        let da_message = match self.batcher.post_sequence(payloads).await {
            Ok(Some(da_message)) => da_message,
            Ok(None) => {
                let absorbed = self.gathered.len();
                info!(summary = self.gathered.summary(), buffered = self.batcher.buffered_size(), "Batches absorbed by the DA batcher");
                self.absorbed.append(&mut self.gathered);
                SenderMetrics::increment_batches_absorbed(absorbed);
                return CycleOutcome::Absorbed;
            }
            // The gathered batches are kept for the next cycle.
            Err(err) => return self.back_off(err.into()).await,
        };

        let mut batches = std::mem::take(&mut self.absorbed);
        batches.append(&mut self.gathered);
        info!(summary = batches.summary(), "📦 Sequence committed to DA");

        match self.submit(Sequence { batches, da_message, attempt: 0 }).await {
            Ok(id) => CycleOutcome::Sent(id),
            Err(err) => self.back_off(err).await,
        }
    }

    /// Waits for every sequence in flight to settle. Returns true if any of them failed.
    async fn drain_pending_txs(&mut self) -> bool {
        let mut results: Vec<MonitoredTxResult> = Vec::new();
        self.txmgr.process_pending_monitored_txs(SENDER_OWNER, |result| results.push(result)).await;

        let mut failed = false;
        for result in results {
            let Some(mut sequence) = self.in_flight.remove(&result.id) else {
                warn!(id = result.id, status = %result.status, "Outcome of an unknown sequence");
                continue;
            };

            if result.status == MonitoredTxStatus::Confirmed {
                info!(id = result.id, block = ?result.block_number, "✅ Sequence confirmed on L1");
                SenderMetrics::increment_sequences_confirmed();
            } else {
                error!(id = result.id, status = %result.status, "❌ Sequence failed on L1, will resubmit");
                SenderMetrics::increment_failures("l1");
                sequence.attempt += 1;
                self.retries.push_back(sequence);
                failed = true;
            }
        }

        SenderMetrics::set_retry_queue_len(self.retries.len());
        failed
    }

    /// Gathers the next batches from the source. Every batch is kept, whatever its size: the
    /// DA batcher decides how they are grouped into blobs.
    async fn gather(&mut self) -> Vec<Batch> {
        let batches = self.source.next_batches(self.config.max_batches_per_l1_tx).await;
        debug!(summary = batches.summary(), "Gathered batches");
        batches
    }

    /// Hands a committed sequence to the tx manager. On failure the sequence is queued for
    /// resubmission.
    async fn submit(&mut self, sequence: Sequence) -> Result<String, SenderError> {
        let id = sequence.id();

        let result = async {
            let (to, data) =
                self.sequencer.sequence_batches_payload(&sequence.batches, sequence.da_message.clone())?;
            let request = TxRequest {
                from: self.config.from,
                to: Some(to),
                value: U256::ZERO,
                data,
                gas_offset: self.config.gas_offset,
            };
            self.txmgr.add(SENDER_OWNER, &id, request).await?;
            Ok::<_, SenderError>(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(id, "📨 Sequence sent to the tx manager");
                SenderMetrics::increment_sequences_sent();
                self.in_flight.insert(id.clone(), sequence);
                Ok(id)
            }
            Err(err) => {
                self.retries.push_front(sequence);
                SenderMetrics::set_retry_queue_len(self.retries.len());
                Err(err)
            }
        }
    }

    async fn back_off(&self, err: SenderError) -> CycleOutcome {
        error!(%err, wait = ?self.config.wait_period, "Sequence sender cycle failed");
        SenderMetrics::increment_failures(err.kind());
        sleep(self.config.wait_period).await;
        CycleOutcome::Failed
    }
}
