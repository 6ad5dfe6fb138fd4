use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("LeetCode user '{0}' does not exist")]
    NotFound(String),

    #[error("LeetCode is rate limiting requests")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedData(String),

    #[error("LeetCode returned all-zero statistics for '{0}'")]
    ZeroValueData(String),
}

impl ProviderError {
    /// Throttling, transport failures and all-zero payloads are usually
    /// transient. Unknown users and schema mismatches are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Transport(_) | Self::ZeroValueData(_)
        )
    }

    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::Transport(_) => "transport",
            Self::MalformedData(_) => "malformed_data",
            Self::ZeroValueData(_) => "zero_value_data",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::MalformedData(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}
