use seqs_chainio::validium::SequenceCalldataError;
use seqs_da::DaError;
use seqs_txmgr::TxManagerError;

/// Errors that can abort a single sequence sender cycle.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    /// Committing the batches to the DA network failed.
    #[error(transparent)]
    Da(#[from] DaError),
    /// Building the sequencing calldata failed.
    #[error(transparent)]
    Calldata(#[from] SequenceCalldataError),
    /// Handing the sequencing transaction to the tx manager failed.
    #[error(transparent)]
    TxManager(#[from] TxManagerError),
}

impl SenderError {
    /// A short label of the error kind, used in metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Da(err) => err.kind(),
            Self::Calldata(_) => "calldata",
            Self::TxManager(_) => "txmgr",
        }
    }
}
