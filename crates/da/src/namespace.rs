use std::fmt;

use alloy_primitives::{Bytes, hex};

/// Size of a DA namespace in bytes.
pub const NAMESPACE_SIZE: usize = 29;

/// A DA namespace: the partition of the DA network under which blobs are submitted and
/// retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(Bytes);

/// Error returned when a namespace name does not fit in [`NAMESPACE_SIZE`] bytes.
#[derive(Debug, thiserror::Error)]
#[error("namespace `{0}` is longer than {NAMESPACE_SIZE} bytes")]
pub struct NamespaceTooLong(String);

impl Namespace {
    /// Derives a namespace from a human-readable name: the UTF-8 bytes of the name,
    /// left-padded with zeroes to [`NAMESPACE_SIZE`].
    pub fn from_name(name: &str) -> Result<Self, NamespaceTooLong> {
        let raw = name.as_bytes();
        if raw.len() > NAMESPACE_SIZE {
            return Err(NamespaceTooLong(name.to_owned()));
        }

        let mut namespace = [0u8; NAMESPACE_SIZE];
        namespace[NAMESPACE_SIZE - raw.len()..].copy_from_slice(raw);
        Ok(Self(Bytes::copy_from_slice(&namespace)))
    }

    /// The raw namespace bytes.
    pub const fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}
