use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use seqs_primitives::time::current_timestamp_seconds;

use crate::{
    errors::TxManagerError,
    types::{MonitoredTx, MonitoredTxStatus},
};

/// An in-memory store of monitored transactions, keyed by id.
///
/// Cloning the store yields a handle to the same underlying map. Every operation takes the
/// lock for the duration of a single read or write, never across an await point.
#[derive(Debug, Clone, Default)]
pub struct MonitoredTxStore {
    inner: Arc<RwLock<HashMap<String, MonitoredTx>>>,
}

impl MonitoredTxStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a new monitored transaction.
    pub fn add(&self, mtx: MonitoredTx) -> Result<(), TxManagerError> {
        let mut txs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if txs.contains_key(&mtx.id) {
            return Err(TxManagerError::AlreadyExists(mtx.id));
        }

        txs.insert(mtx.id.clone(), mtx);
        Ok(())
    }

    /// Returns true if a transaction with this id is stored, regardless of its owner.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).contains_key(id)
    }

    /// Returns the transaction with the given id. If `owner` is set, the transaction must
    /// belong to it.
    pub fn get(&self, owner: Option<&str>, id: &str) -> Result<MonitoredTx, TxManagerError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .filter(|mtx| owner.is_none_or(|o| mtx.owner == o))
            .cloned()
            .ok_or_else(|| TxManagerError::NotFound(id.to_owned()))
    }

    /// Returns the transactions in any of `statuses`, oldest first. An empty status list
    /// matches every transaction.
    pub fn get_by_status(
        &self,
        owner: Option<&str>,
        statuses: &[MonitoredTxStatus],
    ) -> Vec<MonitoredTx> {
        let mut txs: Vec<_> = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|mtx| owner.is_none_or(|o| mtx.owner == o))
            .filter(|mtx| statuses.is_empty() || statuses.contains(&mtx.status))
            .cloned()
            .collect();

        txs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        txs
    }

    /// Overwrites a stored transaction.
    ///
    /// Fails if the transaction is unknown or if the update would move its status backwards.
    pub fn update(&self, mut mtx: MonitoredTx) -> Result<(), TxManagerError> {
        let mut txs = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let Some(stored) = txs.get_mut(&mtx.id) else {
            return Err(TxManagerError::NotFound(mtx.id));
        };

        if !stored.status.can_transition_to(mtx.status) {
            return Err(TxManagerError::InvalidTransition {
                id: mtx.id,
                from: stored.status,
                to: mtx.status,
            });
        }

        mtx.updated_at = current_timestamp_seconds();
        *stored = mtx;
        Ok(())
    }

    /// Returns the number of stored transactions.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
