//! Render-surface seam: the narrow interface the controller draws through.
//!
//! The controller never touches pixels. Everything it needs from a display
//! is captured by the [`Surface`] trait: a drawable width for chunk sizing,
//! a liveness check, line-series creation and append-only extension, two
//! cosmetic axis hints, and a render pass. [`TermSurface`] is the shipped
//! terminal implementation; tests substitute a scripted fake.

mod canvas;
mod output;
mod style;
mod term;

pub use canvas::{Canvas, CanvasCell, Dots};
pub use output::AnsiBuffer;
pub use style::{Rgb, SeriesStyle, PALETTE};
pub use term::{TermConfig, TermSurface};

/// Handle to one line series created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(pub(crate) usize);

/// A passive rendering sink for streaming line series.
///
/// Liveness and width queries take `&mut self` so implementations may
/// drain externally produced events (close keys, resizes) at exactly the
/// points the controller probes; nothing mutates a surface between the
/// controller's calls.
pub trait Surface {
    /// Drawable width in addressable columns; reflects live resize.
    fn width(&mut self) -> u16;

    /// Whether the surface is still open. Once this returns `false` it
    /// must keep returning `false`: a closed surface is terminal.
    fn is_open(&mut self) -> bool;

    /// Whether the surface is in overlay/hold mode. Queried once at
    /// session start; purely cosmetic.
    fn overlay(&self) -> bool;

    /// Create a line series. `t0`/`v0` position the series on the axes
    /// before any data arrives; the series' data starts empty and grows
    /// only through [`extend_series`](Self::extend_series).
    fn add_series(&mut self, style: SeriesStyle, t0: f64, v0: f64) -> SeriesId;

    /// Append points to a series. Concatenation semantics: existing data
    /// is never overwritten or reordered.
    fn extend_series(&mut self, id: SeriesId, times: &[f64], values: &[f64]);

    /// Preset the time-axis range (cosmetic).
    fn set_time_range(&mut self, min: f64, max: f64);

    /// Restore time-axis auto-scaling (cosmetic).
    fn set_auto_scale(&mut self);

    /// Flush pending drawing operations to the display.
    fn render(&mut self) -> std::io::Result<()>;
}
