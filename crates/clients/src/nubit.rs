use std::time::Duration;

use alloy::{
    rpc::client::RpcClient,
    transports::{TransportError, http::Http},
};
use alloy_json_rpc::RpcError;
use alloy_primitives::Bytes;
use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue},
};
use seqs_da::{BlobId, DaClient, DaClientError, Namespace};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

/// Errors that can occur when building a [`NubitClient`].
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum NubitClientError {
    #[error("invalid auth token: {0}")]
    InvalidAuthToken(#[from] InvalidHeaderValue),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A client for the JSON-RPC API of a Nubit DA node.
///
/// Blobs, ids, proofs and namespaces travel as base64 strings.
#[derive(Debug, Clone)]
pub struct NubitClient {
    rpc: RpcClient,
}

impl NubitClient {
    /// Create a new [`NubitClient`]. If an auth token is given, every request carries it as a
    /// bearer token.
    pub fn new(
        url: Url,
        auth_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, NubitClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder().default_headers(headers).timeout(timeout).build()?;
        let rpc = RpcClient::new(Http::with_client(client, url), false);

        Ok(Self { rpc })
    }
}

#[async_trait]
impl DaClient for NubitClient {
    async fn submit(
        &self,
        blobs: &[Bytes],
        gas_price: f64,
        namespace: &Namespace,
    ) -> Result<Vec<BlobId>, DaClientError> {
        let blobs = blobs.iter().cloned().map(Base64Bytes).collect::<Vec<_>>();
        let ns = Base64Bytes(namespace.as_bytes().clone());

        let ids: Vec<Base64Bytes> = self
            .rpc
            .request("da.Submit", (blobs, gas_price, ns))
            .await
            .map_err(|err| da_error("da.Submit", err))?;
        Ok(ids.into_iter().map(|id| id.0).collect())
    }

    async fn get_proofs(
        &self,
        ids: &[BlobId],
        namespace: &Namespace,
    ) -> Result<Vec<Bytes>, DaClientError> {
        let ids = ids.iter().cloned().map(Base64Bytes).collect::<Vec<_>>();
        let ns = Base64Bytes(namespace.as_bytes().clone());

        let proofs: Vec<Base64Bytes> = self
            .rpc
            .request("da.GetProofs", (ids, ns))
            .await
            .map_err(|err| da_error("da.GetProofs", err))?;
        Ok(proofs.into_iter().map(|proof| proof.0).collect())
    }

    async fn get(&self, ids: &[BlobId], namespace: &Namespace) -> Result<Vec<Bytes>, DaClientError> {
        let ids = ids.iter().cloned().map(Base64Bytes).collect::<Vec<_>>();
        let ns = Base64Bytes(namespace.as_bytes().clone());

        let blobs: Vec<Base64Bytes> = self
            .rpc
            .request("da.Get", (ids, ns))
            .await
            .map_err(|err| da_error("da.Get", err))?;
        Ok(blobs.into_iter().map(|blob| blob.0).collect())
    }
}

/// Maps a transport error onto the [`DaClient`] error kinds.
fn da_error(method: &str, err: TransportError) -> DaClientError {
    match err {
        RpcError::ErrorResp(payload) => {
            DaClientError::Rpc { code: payload.code, message: payload.message.into_owned() }
        }
        RpcError::NullResp => DaClientError::InvalidResponse(format!("{method}: empty result")),
        RpcError::DeserError { err, .. } => {
            DaClientError::InvalidResponse(format!("{method}: {err}"))
        }
        other => DaClientError::Transport(Box::new(other)),
    }
}

/// Bytes that (de)serialize as a standard base64 string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Base64Bytes(Bytes);

impl Serialize for Base64Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Base64Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let decoded = BASE64_STANDARD.decode(encoded).map_err(serde::de::Error::custom)?;
        Ok(Self(decoded.into()))
    }
}
