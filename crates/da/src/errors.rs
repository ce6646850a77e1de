use alloy_primitives::Bytes;

use crate::client::DaClientError;

/// Errors produced while decoding a DA blob.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A length field is inconsistent with the size of the blob.
    #[error("malformed blob: {0}")]
    MalformedBlob(String),
    /// A carried hash does not match the payload it describes.
    #[error("hash mismatch for batch at index {index}")]
    HashMismatch {
        /// Index of the offending batch in the sequence.
        index: usize,
    },
}

/// Errors produced by the [`DaBatcher`](crate::DaBatcher).
#[derive(Debug, thiserror::Error)]
pub enum DaError {
    /// The DA network rejected the submission or did not return exactly one blob id.
    #[error("DA submission failed: {0}")]
    SubmissionFailed(String),
    /// No inclusion proof was returned for the blob within the configured attempts.
    #[error("DA inclusion proof unavailable for blob {blob_id} after {attempts} attempts")]
    ProofUnavailable {
        /// The id of the submitted blob.
        blob_id: Bytes,
        /// How many times the proof was requested.
        attempts: usize,
    },
    /// The blob referenced by a DA message could not be retrieved or decoded.
    #[error("DA retrieval failed: {0}")]
    RetrievalFailed(String),
    /// The sequence could not be signed.
    #[error("failed to sign sequence: {0}")]
    Signing(#[from] alloy::signers::Error),
}

impl DaError {
    /// A short label for metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SubmissionFailed(_) => "submission",
            Self::ProofUnavailable { .. } => "proof",
            Self::RetrievalFailed(_) => "retrieval",
            Self::Signing(_) => "signing",
        }
    }

    pub(crate) fn submission(err: DaClientError) -> Self {
        Self::SubmissionFailed(err.to_string())
    }

    pub(crate) fn retrieval(err: impl ToString) -> Self {
        Self::RetrievalFailed(err.to_string())
    }
}
