use std::time::Duration;

use metrics::{counter, histogram};

use crate::types::MonitoredTxStatus;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TxManagerMetrics;

impl TxManagerMetrics {
    /// Increments the amount of monitored transactions added.
    pub(crate) fn increment_txs_added(owner: &str) {
        counter!("txmgr_txs_added", "owner" => owner.to_owned()).increment(1);
    }

    /// Increments the amount of signed transactions broadcast to L1.
    pub(crate) fn increment_broadcasts() {
        counter!("txmgr_broadcasts").increment(1);
    }

    /// Increments the amount of parameter escalations, labelled by parameter.
    pub(crate) fn increment_escalations(param: &'static str) {
        counter!("txmgr_escalations", "param" => param).increment(1);
    }

    /// Increments the amount of monitored transactions reaching a terminal status.
    pub(crate) fn increment_terminal(status: MonitoredTxStatus) {
        counter!("txmgr_terminal_txs", "status" => status.as_str()).increment(1);
    }

    /// Records the duration of a monitoring tick.
    pub(crate) fn record_tick_duration(elapsed: Duration) {
        histogram!("txmgr_tick_duration_ms").record(elapsed.as_millis() as f64);
    }
}
