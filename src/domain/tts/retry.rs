//! Retry and fallback bookkeeping for the TTS client.
//!
//! A call walks `Primary{0..n}` then `Fallback{0..n}` then `Exhausted`.
//! Between two attempts on the same endpoint the client waits
//! `base_delay * 2^attempt`; switching endpoints happens immediately.

use super::model::EndpointRole;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_retries` is the attempt budget per endpoint (at least one).
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            base_delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Wait after a failed attempt with zero-based index `attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Primary { attempt: u32 },
    Fallback { attempt: u32 },
    Exhausted,
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Primary { attempt: 0 }
    }

    /// Endpoint and zero-based attempt index to try next, if any
    pub fn current(&self) -> Option<(EndpointRole, u32)> {
        match *self {
            RetryState::Primary { attempt } => Some((EndpointRole::Primary, attempt)),
            RetryState::Fallback { attempt } => Some((EndpointRole::Fallback, attempt)),
            RetryState::Exhausted => None,
        }
    }

    /// Advance after a failed attempt. Returns the next state and the delay to
    /// observe before attempting again on the same endpoint.
    pub fn on_failure(self, policy: &RetryPolicy) -> (RetryState, Option<Duration>) {
        match self {
            RetryState::Primary { attempt } if attempt + 1 < policy.max_retries => (
                RetryState::Primary {
                    attempt: attempt + 1,
                },
                Some(policy.backoff(attempt)),
            ),
            RetryState::Primary { .. } => (RetryState::Fallback { attempt: 0 }, None),
            RetryState::Fallback { attempt } if attempt + 1 < policy.max_retries => (
                RetryState::Fallback {
                    attempt: attempt + 1,
                },
                Some(policy.backoff(attempt)),
            ),
            RetryState::Fallback { .. } | RetryState::Exhausted => (RetryState::Exhausted, None),
        }
    }
}
