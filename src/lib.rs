//! # Traceplot
//!
//! An incremental live-plot output callback for SDE/ODE solvers.
//!
//! A solver hands each produced time step (or block of refined steps) to a
//! [`PlotController`], which builds up a chart of the trajectory -- and,
//! optionally, the driving noise increments -- progressively instead of
//! rendering only after the whole trajectory is computed.
//!
//! ## Core Concepts
//!
//! - **Chunked flushing**: samples accumulate in a width-sized buffer and
//!   the expensive redraw runs roughly once per drawable column, not once
//!   per integration step
//! - **Resize awareness**: the drawable width is re-queried at every
//!   flush and the chunk capacity recomputed
//! - **Session state machine**: uninitialized -> streaming -> done, with
//!   distinct errors for each kind of miswiring
//! - **Narrow render seam**: the controller draws through the [`Surface`]
//!   trait; a braille-canvas terminal implementation is included
//!
//! ## Example
//!
//! ```rust,ignore
//! use traceplot::{PlotController, TermConfig};
//!
//! let mut plot = PlotController::terminal(TermConfig::default());
//! plot.init(&tspan, &[y0], None)?;
//! for (t, y) in solver {
//!     if !plot.step(&[t], &[y], None)?.is_open() {
//!         break; // display closed by the user
//!     }
//! }
//! plot.done()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod chunk;
pub mod controller;
pub mod error;
pub mod surface;

// Re-exports for convenience
pub use chunk::{chunk_capacity, SampleChunk};
pub use controller::PlotController;
pub use error::{PlotError, Result, Status};
pub use surface::{Rgb, SeriesId, SeriesStyle, Surface, TermConfig, TermSurface};
