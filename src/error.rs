//! Error types for source calls, lookups and aggregation.

use std::time::Duration;

use reqwest::StatusCode;

use crate::artwork::Source;

/// A single upstream call failed.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{museum} request failed: {cause}")]
    Transport {
        museum: Source,
        #[source]
        cause: reqwest::Error,
    },

    #[error("{museum} API error: {status}")]
    Status { museum: Source, status: StatusCode },

    #[error("{museum} API rejected the credentials ({status})")]
    Auth { museum: Source, status: StatusCode },

    #[error("{museum} artwork {id} not found")]
    NotFound { museum: Source, id: u64 },

    #[error("{museum} returned an unreadable response: {cause}")]
    Decode {
        museum: Source,
        #[source]
        cause: reqwest::Error,
    },

    #[error("{museum} did not answer within {after:?}")]
    Timeout { museum: Source, after: Duration },
}

impl SourceError {
    /// The museum the failed call was addressed to.
    pub fn museum(&self) -> Source {
        match self {
            SourceError::Transport { museum, .. }
            | SourceError::Status { museum, .. }
            | SourceError::Auth { museum, .. }
            | SourceError::NotFound { museum, .. }
            | SourceError::Decode { museum, .. }
            | SourceError::Timeout { museum, .. } => *museum,
        }
    }
}

/// Resolving a namespaced artwork id to a single artwork failed.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid artwork id: {0:?} (expected <source>-<number>)")]
    InvalidId(String),

    #[error("unknown museum: {0:?}")]
    UnknownSource(String),

    #[error("{0} is not configured")]
    Unregistered(Source),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A single-source aggregation pass could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0} is not configured")]
    Unregistered(Source),

    #[error(transparent)]
    Source(#[from] SourceError),
}
