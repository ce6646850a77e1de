#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Data availability layer integration: the blob codec, sequence commitments and the
//! batcher that accumulates sequenced batches into DA blobs.

/// Binary encoding of a sequence of batches into a single DA blob.
pub mod codec;
pub use codec::{DecodedSequence, decode_sequence, encode_sequence};

/// Commitments to DA blobs, as embedded in the L1 sequencing transaction.
pub mod commitment;
pub use commitment::Commitment;

/// DA namespaces.
pub mod namespace;
pub use namespace::Namespace;

/// The DA network client interface.
pub mod client;
pub use client::{BlobId, DaClient, DaClientError};

/// The DA batcher.
pub mod batcher;
pub use batcher::{DaBatcher, DaBatcherConfig};

mod errors;
pub use errors::{CodecError, DaError};

mod metrics;
