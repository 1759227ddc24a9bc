//! Crossfade planning.
//!
//! The running stream starts as the first input; each following input is
//! blended over an overlap of `min(requested, running, next, 60s)`, truncated
//! to whole milliseconds. A boundary whose effective overlap is zero is a plain
//! concatenation.

use std::time::Duration;

/// Longest overlap ffmpeg's `acrossfade` accepts
pub const MAX_CROSSFADE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossfadePlan {
    /// Effective overlap at each boundary, `inputs.len() - 1` entries
    pub boundaries: Vec<Duration>,
    /// Length of the combined stream
    pub total: Duration,
}

/// Convert a configured crossfade in seconds, treating negative or
/// non-finite values as no crossfade.
pub fn crossfade_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

pub fn plan_crossfades(durations: &[Duration], requested: Duration) -> CrossfadePlan {
    let mut iter = durations.iter();
    let Some(first) = iter.next() else {
        return CrossfadePlan {
            boundaries: Vec::new(),
            total: Duration::ZERO,
        };
    };

    let mut running = *first;
    let mut boundaries = Vec::with_capacity(durations.len().saturating_sub(1));
    for next in iter {
        let overlap = requested.min(running).min(*next).min(MAX_CROSSFADE);
        let overlap = Duration::from_millis(overlap.as_millis() as u64);
        boundaries.push(overlap);
        running = running + *next - overlap;
    }

    CrossfadePlan {
        boundaries,
        total: running,
    }
}
