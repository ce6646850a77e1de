use metrics::{counter, gauge};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SenderMetrics;

impl SenderMetrics {
    /// Increments the amount of sequences handed to the tx manager.
    pub(crate) fn increment_sequences_sent() {
        counter!("sender_sequences_sent").increment(1);
    }

    /// Increments the amount of sequences confirmed on L1.
    pub(crate) fn increment_sequences_confirmed() {
        counter!("sender_sequences_confirmed").increment(1);
    }

    /// Increments the amount of failed cycles, labelled by the failure kind.
    pub(crate) fn increment_failures(kind: &'static str) {
        counter!("sender_failures", "kind" => kind).increment(1);
    }

    /// Increments the amount of batches absorbed by the DA batcher.
    pub(crate) fn increment_batches_absorbed(count: usize) {
        counter!("sender_batches_absorbed").increment(count as u64);
    }

    /// Sets the amount of sequences waiting to be resubmitted.
    pub(crate) fn set_retry_queue_len(len: usize) {
        gauge!("sender_retry_queue_len").set(len as f64);
    }
}
