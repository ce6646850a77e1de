use IPolygonValidium::{
    IPolygonValidiumCalls, ValidiumBatchData, sequenceBatchesValidium_0Call,
    sequenceBatchesValidium_1Call,
};
use alloy::sol;
use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::{SolCall, SolInterface};
use seqs_primitives::{Batch, ForkVersion, time::Timestamp};

/// Errors that can occur while building or decoding sequencing calldata.
#[derive(Debug, thiserror::Error)]
pub enum SequenceCalldataError {
    /// The sequence contains no batches.
    #[error("cannot sequence an empty list of batches")]
    EmptySequence,
    /// ABI decoding failed.
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
}

/// A helper that builds `sequenceBatchesValidium` payloads for the rollup contract at
/// `address`, according to the configured fork.
#[derive(Debug, Clone, Copy)]
pub struct ValidiumSequencer {
    address: Address,
    fork: ForkVersion,
    l2_coinbase: Address,
}

impl ValidiumSequencer {
    /// Creates a new [`ValidiumSequencer`].
    pub const fn new(address: Address, fork: ForkVersion, l2_coinbase: Address) -> Self {
        Self { address, fork, l2_coinbase }
    }

    /// The rollup contract address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the `(to, data)` pair of the L1 transaction sequencing `batches`, with the
    /// given DA message attached.
    pub fn sequence_batches_payload(
        &self,
        batches: &[Batch],
        da_message: Bytes,
    ) -> Result<(Address, Bytes), SequenceCalldataError> {
        let (first, last) = match (batches.first(), batches.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(SequenceCalldataError::EmptySequence),
        };

        let data = batches.iter().map(validium_batch_data).collect::<Vec<_>>();

        let calldata = match self.fork {
            ForkVersion::Etrog => sequenceBatchesValidium_0Call {
                batches: data,
                l2Coinbase: self.l2_coinbase,
                dataAvailabilityMessage: da_message,
            }
            .abi_encode(),
            ForkVersion::Elderberry => sequenceBatchesValidium_1Call {
                batches: data,
                maxSequenceTimestamp: last.last_l2_block_timestamp,
                initSequencedBatch: first.number.saturating_sub(1),
                l2Coinbase: self.l2_coinbase,
                dataAvailabilityMessage: da_message,
            }
            .abi_encode(),
        };

        Ok((self.address, calldata.into()))
    }
}

/// Builds the on-chain batch data for a non-forced batch.
fn validium_batch_data(batch: &Batch) -> ValidiumBatchData {
    ValidiumBatchData {
        transactionsHash: batch.l2_data_hash(),
        forcedGlobalExitRoot: B256::ZERO,
        forcedTimestamp: 0,
        forcedBlockHashL1: B256::ZERO,
    }
}

/// A decoded `sequenceBatchesValidium` call, tagged by the fork that defines it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencedValidiumCall {
    /// Etrog sequencing call.
    Etrog {
        /// The transaction hashes of the sequenced batches.
        transactions_hashes: Vec<B256>,
        /// The L2 coinbase.
        l2_coinbase: Address,
        /// The DA message.
        da_message: Bytes,
    },
    /// Elderberry sequencing call.
    Elderberry {
        /// The transaction hashes of the sequenced batches.
        transactions_hashes: Vec<B256>,
        /// The max timestamp of the sequence.
        max_sequence_timestamp: Timestamp,
        /// The last batch number sequenced before this call.
        init_sequenced_batch: u64,
        /// The L2 coinbase.
        l2_coinbase: Address,
        /// The DA message.
        da_message: Bytes,
    },
}

impl SequencedValidiumCall {
    /// Decodes the calldata of a sequencing transaction by its selector. Unknown selectors
    /// surface as [`SequenceCalldataError::Abi`].
    pub fn decode(calldata: &[u8]) -> Result<Self, SequenceCalldataError> {
        let hashes = |batches: Vec<ValidiumBatchData>| {
            batches.into_iter().map(|b| b.transactionsHash).collect::<Vec<_>>()
        };

        match IPolygonValidiumCalls::abi_decode(calldata)? {
            IPolygonValidiumCalls::sequenceBatchesValidium_0(call) => Ok(Self::Etrog {
                transactions_hashes: hashes(call.batches),
                l2_coinbase: call.l2Coinbase,
                da_message: call.dataAvailabilityMessage,
            }),
            IPolygonValidiumCalls::sequenceBatchesValidium_1(call) => Ok(Self::Elderberry {
                transactions_hashes: hashes(call.batches),
                max_sequence_timestamp: call.maxSequenceTimestamp,
                init_sequenced_batch: call.initSequencedBatch,
                l2_coinbase: call.l2Coinbase,
                da_message: call.dataAvailabilityMessage,
            }),
        }
    }

    /// The fork this call belongs to.
    pub const fn fork(&self) -> ForkVersion {
        match self {
            Self::Etrog { .. } => ForkVersion::Etrog,
            Self::Elderberry { .. } => ForkVersion::Elderberry,
        }
    }

    /// The DA message attached to the call.
    pub const fn da_message(&self) -> &Bytes {
        match self {
            Self::Etrog { da_message, .. } | Self::Elderberry { da_message, .. } => da_message,
        }
    }
}

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    interface IPolygonValidium {
        struct ValidiumBatchData {
            bytes32 transactionsHash;
            bytes32 forcedGlobalExitRoot;
            uint64 forcedTimestamp;
            bytes32 forcedBlockHashL1;
        }

        error OnlyTrustedSequencer();
        error SequenceZeroBatches();
        error ExceedMaxVerifyBatches();
        error ForcedDataDoesNotMatch();
        error SequencedTimestampBelowForcedTimestamp();
        error GlobalExitRootNotExist();
        error MaxTimestampSequenceInvalid();
        error InitSequencedBatchDoesNotMatch();
        error SequenceWithDataAvailabilityNotAllowed();

        /// @notice Etrog: allows a sequencer to send multiple batches whose data lives on a DA layer.
        function sequenceBatchesValidium(
            ValidiumBatchData[] calldata batches,
            address l2Coinbase,
            bytes calldata dataAvailabilityMessage
        ) external;

        /// @notice Elderberry: same as above, bounded by the max sequence timestamp and the
        /// last sequenced batch number.
        function sequenceBatchesValidium(
            ValidiumBatchData[] calldata batches,
            uint64 maxSequenceTimestamp,
            uint64 initSequencedBatch,
            address l2Coinbase,
            bytes calldata dataAvailabilityMessage
        ) external;
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, hex};

    use super::*;

    fn batches() -> Vec<Batch> {
        vec![
            Batch::new(11, Bytes::from_static(b"first"), 1_700_000_000),
            Batch::new(12, Bytes::from_static(b"second"), 1_700_000_012),
        ]
    }

    #[test]
    fn selectors_match_deployed_contracts() {
        assert_eq!(sequenceBatchesValidium_0Call::SELECTOR, hex!("2d72c248"));
        assert_eq!(sequenceBatchesValidium_1Call::SELECTOR, hex!("db5b0ed7"));
    }

    #[test]
    fn elderberry_payload_roundtrip() {
        let coinbase = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        let contract = address!("0000000000000000000000000000000000000abc");
        let sequencer = ValidiumSequencer::new(contract, ForkVersion::Elderberry, coinbase);

        let msg = Bytes::from_static(b"da message");
        let (to, data) = sequencer.sequence_batches_payload(&batches(), msg.clone()).unwrap();
        assert_eq!(to, contract);

        let decoded = SequencedValidiumCall::decode(&data).unwrap();
        assert_eq!(decoded.fork(), ForkVersion::Elderberry);
        assert_eq!(
            decoded,
            SequencedValidiumCall::Elderberry {
                transactions_hashes: batches().iter().map(Batch::l2_data_hash).collect(),
                max_sequence_timestamp: 1_700_000_012,
                init_sequenced_batch: 10,
                l2_coinbase: coinbase,
                da_message: msg,
            }
        );
    }

    #[test]
    fn etrog_payload_carries_da_message() {
        let sequencer =
            ValidiumSequencer::new(Address::ZERO, ForkVersion::Etrog, Address::repeat_byte(1));

        let msg = Bytes::from_static(b"etrog");
        let (_, data) = sequencer.sequence_batches_payload(&batches(), msg.clone()).unwrap();

        let decoded = SequencedValidiumCall::decode(&data).unwrap();
        assert_eq!(decoded.fork(), ForkVersion::Etrog);
        assert_eq!(decoded.da_message(), &msg);
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let sequencer =
            ValidiumSequencer::new(Address::ZERO, ForkVersion::Elderberry, Address::ZERO);
        let err = sequencer.sequence_batches_payload(&[], Bytes::new()).unwrap_err();
        assert!(matches!(err, SequenceCalldataError::EmptySequence));
    }
}
