use std::sync::Arc;

use alloy_primitives::Bytes;
use async_trait::async_trait;

use crate::Namespace;

/// A DA-assigned blob identifier.
pub type BlobId = Bytes;

/// Gas price sentinel telling the DA network to use its own default.
pub const DEFAULT_DA_GAS_PRICE: f64 = -1.0;

/// Errors returned by a [`DaClient`].
#[derive(Debug, thiserror::Error)]
pub enum DaClientError {
    /// The request could not be delivered or the response could not be read.
    #[error("DA transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The DA node answered with an error.
    #[error("DA node error {code}: {message}")]
    Rpc {
        /// The JSON-RPC error code.
        code: i64,
        /// The error message.
        message: String,
    },
    /// The DA node answered with something that could not be interpreted.
    #[error("invalid DA response: {0}")]
    InvalidResponse(String),
}

/// The interface of a DA network node.
#[async_trait]
pub trait DaClient: Send + Sync {
    /// Submits blobs under `namespace`, returning one id per blob.
    async fn submit(
        &self,
        blobs: &[Bytes],
        gas_price: f64,
        namespace: &Namespace,
    ) -> Result<Vec<BlobId>, DaClientError>;

    /// Returns the inclusion proofs of the given blobs, if available.
    async fn get_proofs(
        &self,
        ids: &[BlobId],
        namespace: &Namespace,
    ) -> Result<Vec<Bytes>, DaClientError>;

    /// Retrieves the given blobs.
    async fn get(&self, ids: &[BlobId], namespace: &Namespace) -> Result<Vec<Bytes>, DaClientError>;
}

#[async_trait]
impl<T: DaClient + ?Sized> DaClient for Arc<T> {
    async fn submit(
        &self,
        blobs: &[Bytes],
        gas_price: f64,
        namespace: &Namespace,
    ) -> Result<Vec<BlobId>, DaClientError> {
        (**self).submit(blobs, gas_price, namespace).await
    }

    async fn get_proofs(
        &self,
        ids: &[BlobId],
        namespace: &Namespace,
    ) -> Result<Vec<Bytes>, DaClientError> {
        (**self).get_proofs(ids, namespace).await
    }

    async fn get(&self, ids: &[BlobId], namespace: &Namespace) -> Result<Vec<Bytes>, DaClientError> {
        (**self).get(ids, namespace).await
    }
}
