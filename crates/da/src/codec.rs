//! Blob layout, all integers big-endian:
//!
//! ```text
//! | count: u64 | count * (len: u64 | keccak256(payload): [u8; 32]) | payload_0 | ... | payload_n |
//! ```

use alloy_primitives::{B256, Bytes, keccak256};

use crate::errors::CodecError;

/// Size of the batch count header.
pub const BATCH_COUNT_SIZE: usize = 8;

/// Size of the metadata record of a single batch: its length and its hash.
pub const BATCH_METADATA_SIZE: usize = 8 + 32;

/// A sequence recovered from a blob, with the hashes carried alongside each batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSequence {
    /// The batch payloads, in order.
    pub batches: Vec<Bytes>,
    /// The hashes carried in the blob metadata, in order. Not recomputed on decode.
    pub hashes: Vec<B256>,
}

impl DecodedSequence {
    /// Checks every carried hash against the keccak256 of its payload.
    pub fn verify(&self) -> Result<(), CodecError> {
        match self.batches.iter().zip(&self.hashes).position(|(b, h)| keccak256(b) != *h) {
            Some(index) => Err(CodecError::HashMismatch { index }),
            None => Ok(()),
        }
    }
}

/// Encodes an ordered list of batches into a single blob. Deterministic.
pub fn encode_sequence<B: AsRef<[u8]>>(batches: &[B]) -> Bytes {
    let payload_size = batches.iter().map(|b| b.as_ref().len()).sum::<usize>();
    let mut blob = Vec::with_capacity(
        BATCH_COUNT_SIZE + batches.len() * BATCH_METADATA_SIZE + payload_size,
    );

    blob.extend_from_slice(&(batches.len() as u64).to_be_bytes());
    for batch in batches {
        let batch = batch.as_ref();
        blob.extend_from_slice(&(batch.len() as u64).to_be_bytes());
        blob.extend_from_slice(keccak256(batch).as_slice());
    }
    for batch in batches {
        blob.extend_from_slice(batch.as_ref());
    }

    blob.into()
}

/// Decodes a blob produced by [`encode_sequence`].
///
/// Fails with [`CodecError::MalformedBlob`] if any declared length does not fit the blob, or if
/// bytes are left over after the last payload.
pub fn decode_sequence(blob: &[u8]) -> Result<DecodedSequence, CodecError> {
    let (count, rest) = split_u64(blob).ok_or_else(|| {
        CodecError::MalformedBlob(format!("{} bytes is too short for the batch count", blob.len()))
    })?;

    let metadata_size = usize::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(BATCH_METADATA_SIZE))
        .filter(|size| *size <= rest.len())
        .ok_or_else(|| {
            CodecError::MalformedBlob(format!(
                "{count} batches declared, only {} bytes of metadata available",
                rest.len()
            ))
        })?;

    let (metadata, mut payloads) = rest.split_at(metadata_size);
    let mut sequence = DecodedSequence {
        batches: Vec::with_capacity(metadata_size / BATCH_METADATA_SIZE),
        hashes: Vec::with_capacity(metadata_size / BATCH_METADATA_SIZE),
    };

    for (index, record) in metadata.chunks_exact(BATCH_METADATA_SIZE).enumerate() {
        let (len, hash) = split_u64(record).ok_or_else(|| {
            CodecError::MalformedBlob(format!("truncated metadata for batch {index}"))
        })?;

        let len = usize::try_from(len).ok().filter(|len| *len <= payloads.len()).ok_or_else(|| {
            CodecError::MalformedBlob(format!(
                "batch {index} declares {len} bytes, only {} remaining",
                payloads.len()
            ))
        })?;

        let (payload, tail) = payloads.split_at(len);
        sequence.batches.push(Bytes::copy_from_slice(payload));
        sequence.hashes.push(B256::from_slice(hash));
        payloads = tail;
    }

    // Padding after the last payload is ignored.
    Ok(sequence)
}

/// Splits a big-endian `u64` off the front of `buf`.
fn split_u64(buf: &[u8]) -> Option<(u64, &[u8])> {
    let (head, tail) = buf.split_first_chunk::<8>()?;
    Some((u64::from_be_bytes(*head), tail))
}
