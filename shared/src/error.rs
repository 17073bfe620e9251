//! Error taxonomy. Each collaborator gets its own enum; `SyncError` is what
//! the core records for the shell to display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    Rejected,
    Malformed,
    NoSession,
    NoSearchResult,
    MutationInProgress,
    Config,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Rejected => "REJECTED",
            Self::Malformed => "MALFORMED_RESPONSE",
            Self::NoSession => "NO_SESSION",
            Self::NoSearchResult => "NO_SEARCH_RESULT",
            Self::MutationInProgress => "MUTATION_IN_PROGRESS",
            Self::Config => "CONFIG_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::MutationInProgress => ErrorSeverity::Transient,
            Self::Validation
            | Self::Rejected
            | Self::Malformed
            | Self::NoSession
            | Self::NoSearchResult
            | Self::Config => ErrorSeverity::Permanent,
        }
    }

    /// Whether the caller may reasonably try again. The core itself never retries.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self.default_severity(), ErrorSeverity::Transient)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("address contains non-hex characters: {0}")]
    InvalidHex(String),
}

/// Failure reported by the remote social-graph query service.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("query timed out")]
    Timeout,

    #[error("query rejected: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl QueryError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Malformed(_) => ErrorKind::Malformed,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Failure reported by the follow/unfollow provider.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MutationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("signature rejected by wallet")]
    SignatureRejected,

    #[error("mutation rejected: {0}")]
    Rejected(String),
}

impl MutationError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::SignatureRejected | Self::Rejected(_) => ErrorKind::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("namespace cannot be empty")]
    EmptyNamespace,

    #[error("page size must be between 1 and {max}, got {got}")]
    PageSize { got: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("query failed: {0}")]
    Query(#[from] QueryError),

    #[error("mutation failed: {0}")]
    Mutation(#[from] MutationError),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("no active session")]
    NoSession,

    #[error("no search result to act on")]
    NoSearchResult,

    #[error("a follow mutation is already pending for {0}")]
    MutationInProgress(Address),
}

impl SyncError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Address(_) => ErrorKind::Validation,
            Self::Query(e) => e.kind(),
            Self::Mutation(e) => e.kind(),
            Self::Config(_) => ErrorKind::Config,
            Self::NoSession => ErrorKind::NoSession,
            Self::NoSearchResult => ErrorKind::NoSearchResult,
            Self::MutationInProgress(_) => ErrorKind::MutationInProgress,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
