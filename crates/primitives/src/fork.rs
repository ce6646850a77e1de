use std::{fmt, str::FromStr};

/// The rollup fork version. Each fork exposes a different L1 sequencing function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ForkVersion {
    /// Fork 7: batches are sequenced with the L2 coinbase and DA message only.
    Etrog,
    /// Fork 8 and later: adds the max sequence timestamp and the initial sequenced batch.
    #[default]
    Elderberry,
}

impl ForkVersion {
    /// Returns the fork id as used on-chain.
    pub const fn fork_id(&self) -> u64 {
        match self {
            Self::Etrog => 7,
            Self::Elderberry => 8,
        }
    }
}

impl fmt::Display for ForkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Etrog => write!(f, "etrog"),
            Self::Elderberry => write!(f, "elderberry"),
        }
    }
}

/// Error returned when parsing an unknown fork version.
#[derive(Debug, thiserror::Error)]
#[error("unknown fork version: {0}, expected `etrog` or `elderberry`")]
pub struct UnknownForkVersion(String);

impl FromStr for ForkVersion {
    type Err = UnknownForkVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "etrog" | "7" => Ok(Self::Etrog),
            "elderberry" | "8" | "9" => Ok(Self::Elderberry),
            other => Err(UnknownForkVersion(other.to_owned())),
        }
    }
}
