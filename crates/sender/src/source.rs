use alloy_primitives::Bytes;
use async_trait::async_trait;
use seqs_primitives::{Batch, time::current_timestamp_seconds};

/// The filler byte of synthetic batches.
const SYNTHETIC_FILLER: u8 = 0x0a;

/// A source of closed L2 batches ready to be sequenced.
#[async_trait]
pub trait BatchSource: Send {
    /// Returns up to `max` batches, in batch number order, continuing after the last batch
    /// returned.
    async fn next_batches(&mut self, max: usize) -> Vec<Batch>;
}

/// A batch source producing numbered batches of fixed-size filler data, for devnets and
/// load tests.
#[derive(Debug, Clone)]
pub struct SyntheticBatchSource {
    next_number: u64,
    batch_size: usize,
}

impl SyntheticBatchSource {
    /// Creates a source whose first batch is number 1.
    pub const fn new(batch_size: usize) -> Self {
        Self { next_number: 1, batch_size }
    }
}

#[async_trait]
impl BatchSource for SyntheticBatchSource {
    async fn next_batches(&mut self, max: usize) -> Vec<Batch> {
        let now = current_timestamp_seconds();

        (0..max)
            .map(|_| {
                let number = self.next_number;
                self.next_number += 1;
                Batch::new(number, Bytes::from(vec![SYNTHETIC_FILLER; self.batch_size]), now)
            })
            .collect()
    }
}
