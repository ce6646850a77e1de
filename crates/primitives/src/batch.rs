use alloy_primitives::{B256, Bytes, keccak256};
use serde::{Deserialize, Serialize};

use crate::{summary::Summary, time::Timestamp};

/// A sequenced L2 batch. Its data is made available on the DA layer and its hash is
/// referenced by the L1 sequencing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// The batch number. Strictly increasing across sequenced batches.
    pub number: u64,
    /// The raw L2 batch data.
    pub l2_data: Bytes,
    /// The timestamp of the last L2 block contained in the batch.
    pub last_l2_block_timestamp: Timestamp,
}

impl Batch {
    /// Creates a new batch.
    pub const fn new(number: u64, l2_data: Bytes, last_l2_block_timestamp: Timestamp) -> Self {
        Self { number, l2_data, last_l2_block_timestamp }
    }

    /// Returns the keccak256 hash of the batch L2 data.
    pub fn l2_data_hash(&self) -> B256 {
        keccak256(&self.l2_data)
    }

    /// Returns the size of the batch L2 data in bytes.
    pub fn size(&self) -> usize {
        self.l2_data.len()
    }
}

/// Returns the first and last batch numbers of a non-empty list of batches.
pub fn batch_range(batches: &[Batch]) -> Option<(u64, u64)> {
    Some((batches.first()?.number, batches.last()?.number))
}

impl Summary for [Batch] {
    fn summary(&self) -> String {
        let size = self.iter().map(Batch::size).sum::<usize>();
        match batch_range(self) {
            Some((first, last)) => {
                format!("batches={}, range={first}..={last}, size={size}", self.len())
            }
            None => "batches=0".to_owned(),
        }
    }
}
