#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! The sequence sender: gathers L2 batches, commits them to the DA network and lands the
//! resulting commitment on L1 through the monitored transaction manager.

/// The sequence sender control loop.
pub mod sender;
pub use sender::{CycleOutcome, SENDER_OWNER, SequenceSender, SequenceSenderConfig};

/// Sources of batches to sequence.
pub mod source;
pub use source::{BatchSource, SyntheticBatchSource};

/// The operator send trigger.
pub mod trigger;
pub use trigger::{SendTrigger, spawn_line_trigger, spawn_stdin_trigger};

mod errors;
pub use errors::SenderError;

mod metrics;

#[cfg(test)]
mod test_utils;
