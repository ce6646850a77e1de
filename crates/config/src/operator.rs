use alloy::signers::local::PrivateKeySigner;
use clap::Parser;

/// Operator-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct OperatorOpts {
    /// The private key of the trusted sequencer, used to send L1 transactions
    #[clap(long = "operator.private-key", env = "SEQS_OPERATOR_PRIVATE_KEY")]
    pub private_key: PrivateKeySigner,
    /// The private key used to sign DA commitments. Defaults to the operator key.
    #[clap(long = "operator.da-private-key", env = "SEQS_OPERATOR_DA_PRIVATE_KEY")]
    pub da_private_key: Option<PrivateKeySigner>,
}

impl OperatorOpts {
    /// The signer of DA commitments.
    pub fn da_signer(&self) -> PrivateKeySigner {
        self.da_private_key.clone().unwrap_or_else(|| self.private_key.clone())
    }
}
