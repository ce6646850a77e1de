#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Client connections to the L1 execution layer and the DA network.

/// Execution layer client connection
pub mod execution;

/// JSON-RPC gas price oracles
pub mod gas_price;

/// Nubit DA node connection
pub mod nubit;

#[cfg(test)]
pub(crate) mod test_utils;
