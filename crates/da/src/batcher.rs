use std::{slice, time::Duration};

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Bytes;
use seqs_primitives::{BYTES_PER_KB, retries::fixed_attempts};
use tokio::time::{Instant, sleep};
use tokio_retry::Retry;
use tracing::{debug, info, warn};

use crate::{
    client::{BlobId, DEFAULT_DA_GAS_PRICE, DaClient},
    codec::{DecodedSequence, decode_sequence, encode_sequence},
    commitment::Commitment,
    errors::DaError,
    metrics::DaMetrics,
    namespace::Namespace,
};

/// Configuration of the [`DaBatcher`].
#[derive(Debug, Clone)]
pub struct DaBatcherConfig {
    /// Accumulated size, in bytes, from which the buffer is committed to the DA network.
    pub max_blob_size: usize,
    /// Maximum number of inclusion proof requests per submitted blob.
    pub proof_max_retries: usize,
    /// Fixed wait between inclusion proof requests.
    pub proof_wait_period: Duration,
    /// Minimum time between two submissions to the DA network.
    pub min_commit_interval: Duration,
}

impl Default for DaBatcherConfig {
    fn default() -> Self {
        Self {
            max_blob_size: 100 * BYTES_PER_KB,
            proof_max_retries: 10,
            proof_wait_period: Duration::from_secs(5),
            min_commit_interval: Duration::from_millis(500),
        }
    }
}

/// Accumulates batches and commits them to the DA network as a single blob once enough
/// data has been gathered.
///
/// The batcher is driven by a single caller. Concurrent `post_sequence` calls need
/// external serialization, which `&mut self` enforces.
#[derive(Debug)]
pub struct DaBatcher<C> {
    client: C,
    namespace: Namespace,
    signer: PrivateKeySigner,
    config: DaBatcherConfig,
    /// Batches absorbed but not yet committed.
    buffer: Vec<Bytes>,
    /// Total size of `buffer` in bytes.
    buffered_size: usize,
    /// Instant of the last successful commit.
    last_commit: Instant,
}

impl<C: DaClient> DaBatcher<C> {
    /// Creates a new [`DaBatcher`]. The commit interval is counted from now.
    pub fn new(
        client: C,
        namespace: Namespace,
        signer: PrivateKeySigner,
        config: DaBatcherConfig,
    ) -> Self {
        info!(%namespace, signer = %signer.address(), ?config, "DA batcher initialized");

        Self {
            client,
            namespace,
            signer,
            config,
            buffer: Vec::new(),
            buffered_size: 0,
            last_commit: Instant::now(),
        }
    }

    /// Batches absorbed into the buffer and not yet committed.
    pub fn pending_batches(&self) -> &[Bytes] {
        &self.buffer
    }

    /// Size in bytes of the absorbed batches.
    pub const fn buffered_size(&self) -> usize {
        self.buffered_size
    }

    /// Posts a sequence of batches.
    ///
    /// Returns `Ok(None)` if the batches were absorbed into the buffer and the buffer is still
    /// below the maximum blob size. Otherwise commits the buffer together with `batches` and
    /// returns the encoded [`Commitment`] (the DA message) covering all of them.
    ///
    /// On error the buffer is left exactly as it was before the call and `batches` are NOT
    /// absorbed: the caller retries with the same batches.
    pub async fn post_sequence(&mut self, batches: Vec<Bytes>) -> Result<Option<Bytes>, DaError> {
        let total_size = self.buffered_size + batches.iter().map(|b| b.len()).sum::<usize>();

        if total_size < self.config.max_blob_size {
            self.buffer.extend(batches);
            self.buffered_size = total_size;
            DaMetrics::set_buffered_bytes(total_size);

            debug!(
                batches = self.buffer.len(),
                size = total_size,
                max = self.config.max_blob_size,
                "Batches absorbed into DA buffer"
            );
            return Ok(None);
        }

        let candidate = self.buffer.iter().cloned().chain(batches).collect::<Vec<_>>();

        let start = Instant::now();
        let message = self.commit(&candidate).await.inspect_err(|e| {
            DaMetrics::increment_commit_failures(e.kind());
        })?;
        DaMetrics::record_commit_time(start.elapsed());

        self.buffer.clear();
        self.buffered_size = 0;
        self.last_commit = Instant::now();
        DaMetrics::set_buffered_bytes(0);

        Ok(Some(message))
    }

    /// Resolves a DA message into the batches of the blob it commits to.
    pub async fn get_sequence(&self, message: &[u8]) -> Result<Vec<Bytes>, DaError> {
        Ok(self.fetch_sequence(message).await?.batches)
    }

    /// Same as [`DaBatcher::get_sequence`], but also exposes the hashes carried in the blob so
    /// that the caller can verify them.
    pub async fn fetch_sequence(&self, message: &[u8]) -> Result<DecodedSequence, DaError> {
        let commitment = Commitment::decode(message).map_err(DaError::retrieval)?;

        let blobs = self
            .client
            .get(slice::from_ref(&commitment.blob_id), &self.namespace)
            .await
            .map_err(DaError::retrieval)?;

        let [blob] = blobs.as_slice() else {
            return Err(DaError::RetrievalFailed(format!(
                "expected exactly one blob for id {}, got {}",
                commitment.blob_id,
                blobs.len()
            )));
        };

        decode_sequence(blob).map_err(DaError::retrieval)
    }

    /// Submits `batches` as one blob, waits for its inclusion proof and signs the sequence.
    async fn commit(&self, batches: &[Bytes]) -> Result<Bytes, DaError> {
        self.wait_min_commit_interval().await;

        let blob = encode_sequence(batches);
        let blob_size = blob.len();
        let blob_id = self.submit_blob(blob).await?;

        DaMetrics::increment_blobs_submitted();
        DaMetrics::record_blob_size(blob_size);
        info!(
            size = blob_size,
            batches = batches.len(),
            namespace = %self.namespace,
            id = %blob_id,
            "📦 Blob submitted to DA"
        );

        self.wait_for_proof(&blob_id).await?;

        let commitment = Commitment::sign(&self.signer, blob_id, batches)?;
        Ok(commitment.encode())
    }

    /// Sleeps until the minimum commit interval has elapsed since the last commit.
    async fn wait_min_commit_interval(&self) {
        let elapsed = self.last_commit.elapsed();
        if let Some(remaining) = self.config.min_commit_interval.checked_sub(elapsed) {
            if !remaining.is_zero() {
                debug!(?remaining, "Waiting for the minimum DA commit interval");
                sleep(remaining).await;
            }
        }
    }

    async fn submit_blob(&self, blob: Bytes) -> Result<BlobId, DaError> {
        let ids = self
            .client
            .submit(slice::from_ref(&blob), DEFAULT_DA_GAS_PRICE, &self.namespace)
            .await
            .map_err(DaError::submission)?;

        match <[BlobId; 1]>::try_from(ids) {
            Ok([id]) => Ok(id),
            Err(ids) => Err(DaError::SubmissionFailed(format!(
                "expected exactly one blob id, got {}",
                ids.len()
            ))),
        }
    }

    /// Polls the DA network for an inclusion proof of `blob_id`.
    async fn wait_for_proof(&self, blob_id: &BlobId) -> Result<(), DaError> {
        let client = &self.client;
        let namespace = &self.namespace;
        let attempts = self.config.proof_max_retries.max(1);

        let strategy = fixed_attempts(self.config.proof_wait_period, attempts);
        let proof = Retry::spawn(strategy, move || async move {
            DaMetrics::increment_proof_attempts();
            match client.get_proofs(slice::from_ref(blob_id), namespace).await {
                Ok(mut proofs) if proofs.len() == 1 => Ok(proofs.remove(0)),
                Ok(proofs) => {
                    debug!(id = %blob_id, count = proofs.len(), "Proof not available yet");
                    Err(())
                }
                Err(err) => {
                    warn!(id = %blob_id, %err, "Proof not available");
                    Err(())
                }
            }
        })
        .await
        .map_err(|_| DaError::ProofUnavailable { blob_id: blob_id.clone(), attempts })?;

        debug!(id = %blob_id, proof_size = proof.len(), "Inclusion proof received from DA");
        Ok(())
    }
}
