//! Transport readout: elapsed/total labels and seek-bar fill.

use std::time::Duration;

/// Coarse playback state shown by the play/pause indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No handle.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Format a `Duration` as `MM:SS`. Minutes are not wrapped into hours, so
/// 3661 seconds is `61:01`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed/total text and fill percentage, always computed together from a
/// single position/duration snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReadout {
    pub elapsed: String,
    pub total: String,
    pub fill_percent: f64,
}

impl Default for TransportReadout {
    fn default() -> Self {
        Self {
            elapsed: format_mmss(Duration::ZERO),
            total: format_mmss(Duration::ZERO),
            fill_percent: 0.0,
        }
    }
}

impl TransportReadout {
    /// Readout once the duration is known but nothing has played yet.
    pub fn metadata(duration: Duration) -> Self {
        Self {
            total: format_mmss(duration),
            ..Self::default()
        }
    }

    pub fn progress(position: Duration, duration: Duration) -> Self {
        let fill_percent = if duration.is_zero() {
            0.0
        } else {
            (position.as_secs_f64() / duration.as_secs_f64() * 100.0).clamp(0.0, 100.0)
        };
        Self {
            elapsed: format_mmss(position),
            total: format_mmss(duration),
            fill_percent,
        }
    }

    /// `elapsed<sep>total`, e.g. `01:05 / 03:20`.
    pub fn label(&self, separator: &str) -> String {
        format!("{}{}{}", self.elapsed, separator, self.total)
    }
}
