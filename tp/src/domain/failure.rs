//! Provider failure contract
//!
//! Every external-capability call returns `ProviderResult<T>` - the adapter
//! converts any native fault (transport error, bad payload, upstream refusal)
//! into a `ProviderFailure` at its own boundary. Nothing below the adapters
//! ever sees a transport error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of every provider call
pub type ProviderResult<T> = Result<T, ProviderFailure>;

/// Why a provider call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network error, timeout, or non-2xx from the upstream
    UpstreamUnavailable,
    /// Upstream answered but expected fields were absent
    MalformedResponse,
    /// Routing upstream explicitly reported zero routes
    NoRouteFound,
    /// Generative model did not answer within the timeout
    GenerationTimeout,
    /// Generative model unavailable or errored
    GenerationRefused,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::UpstreamUnavailable => "upstream_unavailable",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::NoRouteFound => "no_route_found",
            FailureKind::GenerationTimeout => "generation_timeout",
            FailureKind::GenerationRefused => "generation_refused",
        };
        write!(f, "{}", s)
    }
}

/// A contained provider failure: the kind plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ProviderFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Timeout on a non-generative provider
    pub fn timeout() -> Self {
        Self::new(FailureKind::UpstreamUnavailable, "timeout")
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UpstreamUnavailable, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, message)
    }

    pub fn no_route(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NoRouteFound, message)
    }

    pub fn generation_timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::GenerationTimeout, message)
    }

    pub fn generation_refused(message: impl Into<String>) -> Self {
        Self::new(FailureKind::GenerationRefused, message)
    }

    /// The only failure the aggregator retries
    pub fn is_generation_timeout(&self) -> bool {
        self.kind == FailureKind::GenerationTimeout
    }
}
