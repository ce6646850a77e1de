#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Seqs sequence sender primitive types, utilities and constants.

/// Sequenced L2 batches.
pub mod batch;
pub use batch::Batch;

/// Rollup fork versions that change the L1 sequencing interface.
pub mod fork;
pub use fork::ForkVersion;

/// Time-related utilities.
pub mod time;

/// Transport retries utilities
pub mod retries;

/// Utility for summarizing objects into a string for logging purposes.
pub mod summary;

/// Utilities for running the process until a shutdown signal is received.
pub mod shutdown;

/// A constant for the number of bytes in a kilobyte.
pub const BYTES_PER_KB: usize = 1024;
