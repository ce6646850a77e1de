use std::time::Duration;

use metrics::{counter, gauge, histogram};

#[derive(Debug, Clone, Copy)]
pub(crate) struct DaMetrics;

impl DaMetrics {
    /// Sets the amount of bytes waiting in the accumulation buffer.
    pub(crate) fn set_buffered_bytes(bytes: usize) {
        gauge!("da_buffered_bytes").set(bytes as f64);
    }

    /// Increments the amount of blobs accepted by the DA network.
    pub(crate) fn increment_blobs_submitted() {
        counter!("da_blobs_submitted").increment(1);
    }

    /// Records the size of a submitted blob.
    pub(crate) fn record_blob_size(bytes: usize) {
        histogram!("da_blob_size_bytes").record(bytes as f64);
    }

    /// Increments the amount of inclusion proof requests.
    pub(crate) fn increment_proof_attempts() {
        counter!("da_proof_attempts").increment(1);
    }

    /// Increments the amount of failed commits, labelled by failure kind.
    pub(crate) fn increment_commit_failures(kind: &'static str) {
        counter!("da_commit_failures", "kind" => kind).increment(1);
    }

    /// Records the time it took to submit a blob and obtain its proof.
    pub(crate) fn record_commit_time(elapsed: Duration) {
        histogram!("da_commit_time_ms").record(elapsed.as_millis() as f64);
    }
}
