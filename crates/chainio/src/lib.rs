#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Chain I/O module to interact with the rollup contracts on L1.

use alloy::transports::TransportError;
use alloy_primitives::Bytes;
use alloy_sol_types::SolInterface;

/// `PolygonValidiumEtrog.sol` L1 sequencing bindings
///
/// Ref: <https://github.com/0xPolygonHermez/zkevm-contracts/blob/main/contracts/v2/consensus/validium/PolygonValidiumEtrog.sol>
pub mod validium;

/// The result of trying to parse a transport error into a specific interface.
#[derive(Debug)]
pub enum TryParseTransportErrorResult<I: SolInterface> {
    /// The error was successfully decoded into the specified interface.
    Decoded(I),
    /// The error was not decoded but the revert data was extracted.
    UnknownSelector(Bytes),
    /// The error was not decoded and the revert data was not extracted.
    Original(TransportError),
}

/// Try to decode the revert data carried by a JSON-RPC error response (for example from
/// `eth_estimateGas`) into the given Solidity error interface.
pub fn try_parse_transport_error<I: SolInterface>(
    error: TransportError,
) -> TryParseTransportErrorResult<I> {
    let revert_data = error.as_error_resp().and_then(|e| e.as_revert_data());
    let decoded = revert_data.as_ref().and_then(|data| I::abi_decode(data).ok());

    match (decoded, revert_data) {
        (Some(decoded), _) => TryParseTransportErrorResult::Decoded(decoded),
        (None, Some(data)) => TryParseTransportErrorResult::UnknownSelector(data),
        (None, None) => TryParseTransportErrorResult::Original(error),
    }
}
