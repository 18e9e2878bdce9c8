//! Error kinds and the solver-facing status flag.
//!
//! All errors here signal solver/callback miswiring, not transient
//! conditions: they are raised to the caller, never swallowed. The one
//! non-fatal condition -- a render surface closed by the user -- travels
//! through [`Status`] instead.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors raised by the plot callback.
#[derive(Debug, Error)]
pub enum PlotError {
    /// `step` or `done` was called with no active session.
    ///
    /// The message spells out the call shape the caller appears to be
    /// using, so the fix (`init` first) names the right arity.
    #[error(
        "no active plot session: call init(tspan, y0{}) before step/done",
        if *.with_noise { ", w0" } else { "" }
    )]
    NotInitialized {
        /// Whether the failing call supplied a noise block.
        with_noise: bool,
    },

    /// Noise-argument presence disagrees with what `init` established.
    #[error("{}", if *.noise_enabled {
        "session tracks noise increments but the call omitted the noise block"
    } else {
        "session does not track noise increments but the call supplied a noise block"
    })]
    NoiseMismatch {
        /// Whether the session was initialized with noise tracking.
        noise_enabled: bool,
    },

    /// Operation selector outside `init` / `step` / `done`.
    #[error("unrecognized operation selector `{0}` (expected init, step or done)")]
    InvalidSelector(String),

    /// A data block's length does not match the session's dimensions.
    #[error("{what} block holds {got} values, expected {expected}")]
    ShapeMismatch {
        /// Which block was malformed (`"state"`, `"noise"`, ...).
        what: &'static str,
        /// Number of values the session's dimensions require.
        expected: usize,
        /// Number of values actually supplied.
        got: usize,
    },

    /// `init` was given an empty time span or an empty initial state.
    #[error("{0} must contain at least one value")]
    EmptyInput(&'static str),

    /// The rendering surface could not be created or written to.
    #[error("render surface error: {0}")]
    Surface(#[from] std::io::Error),
}

/// Status flag returned to the solver from every operation.
///
/// `Open` (1) means the surface accepted the update; `Closed` (0) means
/// the surface was shut externally and the solver should stop invoking
/// the callback. Whether integration itself stops is the solver's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// Surface closed externally; the session is terminal.
    Closed = 0,
    /// Surface open and updated.
    Open = 1,
}

impl Status {
    /// The numeric flag handed back to solver code (1 = open, 0 = closed).
    #[inline]
    pub const fn as_flag(self) -> u8 {
        self as u8
    }

    /// Check whether the surface was still open.
    #[inline]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags() {
        assert_eq!(Status::Open.as_flag(), 1);
        assert_eq!(Status::Closed.as_flag(), 0);
        assert!(Status::Open.is_open());
        assert!(!Status::Closed.is_open());
    }

    #[test]
    fn test_not_initialized_message_names_call_shape() {
        let plain = PlotError::NotInitialized { with_noise: false }.to_string();
        let noisy = PlotError::NotInitialized { with_noise: true }.to_string();
        assert!(plain.contains("init(tspan, y0)"));
        assert!(noisy.contains("init(tspan, y0, w0)"));
        assert_ne!(plain, noisy);
    }

    #[test]
    fn test_mismatch_messages_are_distinct() {
        let missing = PlotError::NoiseMismatch { noise_enabled: true }.to_string();
        let extra = PlotError::NoiseMismatch { noise_enabled: false }.to_string();
        assert!(missing.contains("omitted"));
        assert!(extra.contains("supplied"));
    }

    #[test]
    fn test_invalid_selector_names_offender() {
        let err = PlotError::InvalidSelector("plot".to_string()).to_string();
        assert!(err.contains("`plot`"));
    }
}
