//! The Streaming Buffer Controller: the solver-facing callback.
//!
//! A solver drives one [`PlotController`] through `init` -> repeated
//! `step` -> `done`. The controller owns all cross-call state (the
//! session), batches incoming samples in a width-sized [`SampleChunk`],
//! and only touches the render surface when the chunk overflows or the
//! session finishes. Chunk capacity is recomputed from the drawable's
//! current width at every flush, so a resized display changes the batch
//! size on the next fill cycle.
//!
//! Every operation runs synchronously to completion on the solver's
//! thread; the cost of a flush lands on the solver's clock, which is
//! exactly why flushes are rationed to roughly one per drawable column.

use crate::chunk::{chunk_capacity, SampleChunk};
use crate::error::{PlotError, Result, Status};
use crate::surface::{SeriesId, SeriesStyle, Surface, TermConfig, TermSurface};
use std::io;
use tracing::debug;

/// Per-session state, alive between a successful `init` and its `done`.
struct Session<S> {
    /// Exclusively-owned render surface; released when the session ends.
    surface: S,
    /// One line series per solution component.
    series: Vec<SeriesId>,
    /// One line series per noise channel (empty when noise is off).
    noise_series: Vec<SeriesId>,
    /// Anticipated total sample count, fixed at init; only bounds
    /// chunk capacity.
    expected_samples: usize,
    /// The current fill cycle's buffer.
    chunk: SampleChunk,
    /// Whether `step` calls must carry a noise block.
    noise_enabled: bool,
    /// Overlay/hold mode, queried from the surface at init.
    overlay: bool,
}

/// Incremental-plot output callback for SDE/ODE solvers.
///
/// Generic over the [`Surface`] it draws through; the surface is created
/// inside `init` (one fresh surface per session) via the factory handed
/// to [`new`](Self::new).
pub struct PlotController<S: Surface> {
    make_surface: Box<dyn FnMut() -> io::Result<S>>,
    session: Option<Session<S>>,
}

impl PlotController<TermSurface> {
    /// Controller plotting to the terminal.
    pub fn terminal(config: TermConfig) -> Self {
        Self::new(move || TermSurface::open(config.clone()))
    }
}

impl<S: Surface> PlotController<S> {
    /// Create a controller with a surface factory.
    ///
    /// The factory runs once per `init` call; its error is fatal for
    /// that session.
    pub fn new<F>(make_surface: F) -> Self
    where
        F: FnMut() -> io::Result<S> + 'static,
    {
        Self {
            make_surface: Box::new(make_surface),
            session: None,
        }
    }

    /// Whether a session is currently active.
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a plot session.
    ///
    /// `tspan` lists all anticipated sample times (its length and extrema
    /// drive chunk sizing and the axis range), `y0` is the solution at
    /// `tspan[0]`, and `w0` is the initial noise value iff noise
    /// increments are to be plotted alongside the solution.
    ///
    /// A new `init` supersedes any session still active: the old surface
    /// is released first.
    pub fn init(&mut self, tspan: &[f64], y0: &[f64], w0: Option<&[f64]>) -> Result<Status> {
        if tspan.is_empty() {
            return Err(PlotError::EmptyInput("time span"));
        }
        if y0.is_empty() {
            return Err(PlotError::EmptyInput("initial state"));
        }
        if w0.is_some_and(<[f64]>::is_empty) {
            return Err(PlotError::EmptyInput("initial noise"));
        }

        self.session = None;
        let mut surface = (self.make_surface)()?;

        let expected_samples = tspan.len();
        let width = surface.width();
        let capacity = chunk_capacity(expected_samples, width);
        let mut chunk = SampleChunk::new(y0.len(), w0.map(<[f64]>::len), capacity);
        chunk.push_block(&tspan[..1], y0, w0);

        let overlay = surface.overlay();
        let (t0, t_end) = (tspan[0], tspan[expected_samples - 1]);
        if !overlay {
            surface.set_time_range(t0.min(t_end), t0.max(t_end));
        }

        let series = y0
            .iter()
            .enumerate()
            .map(|(d, &v)| surface.add_series(SeriesStyle::for_component(d, overlay), t0, v))
            .collect();
        let noise_series = w0.map_or_else(Vec::new, |w0| {
            w0.iter()
                .enumerate()
                .map(|(d, &v)| surface.add_series(SeriesStyle::for_noise(d), t0, v))
                .collect()
        });

        surface.render()?;
        debug!(
            expected_samples,
            width,
            capacity,
            dim = y0.len(),
            noise = w0.is_some(),
            overlay,
            "plot session initialized"
        );

        self.session = Some(Session {
            surface,
            series,
            noise_series,
            expected_samples,
            chunk,
            noise_enabled: w0.is_some(),
            overlay,
        });
        Ok(Status::Open)
    }

    /// Record a block of refined steps.
    ///
    /// `times` must be non-decreasing and start at or after the last
    /// recorded time; `states` (and `noises`, required iff the session
    /// tracks noise) are column-major `dimension x times.len()` blocks.
    ///
    /// The common case appends into the chunk and returns without any
    /// drawing. On overflow, the already-buffered samples are flushed
    /// onto the line series, the drawable width is re-queried, the chunk
    /// is reallocated at the recomputed capacity, and the new batch
    /// starts the next fill cycle.
    pub fn step(&mut self, times: &[f64], states: &[f64], noises: Option<&[f64]>) -> Result<Status> {
        let Some(sess) = self.session.as_mut() else {
            return Err(PlotError::NotInitialized {
                with_noise: noises.is_some(),
            });
        };
        if noises.is_some() != sess.noise_enabled {
            return Err(PlotError::NoiseMismatch {
                noise_enabled: sess.noise_enabled,
            });
        }

        let n = times.len();
        let dim = sess.chunk.dim();
        if states.len() != n * dim {
            return Err(PlotError::ShapeMismatch {
                what: "state",
                expected: n * dim,
                got: states.len(),
            });
        }
        if let Some(noises) = noises {
            let expected = n * sess.chunk.noise_dim();
            if noises.len() != expected {
                return Err(PlotError::ShapeMismatch {
                    what: "noise",
                    expected,
                    got: noises.len(),
                });
            }
        }

        if !sess.surface.is_open() {
            return Ok(Status::Closed);
        }
        if n == 0 {
            return Ok(Status::Open);
        }

        if !sess.chunk.fits(n) {
            let flushed = sess.chunk.len();
            Self::flush_chunk(sess);
            sess.surface.render()?;

            // Capacity is derived from the original expected count and the
            // width as it is now; a live resize changes the batch size
            // from here on. A batch larger than the derived capacity
            // forces the capacity up to fit it.
            let width = sess.surface.width();
            let capacity = chunk_capacity(sess.expected_samples, width).max(n);
            debug!(flushed, width, capacity, "chunk flushed, buffers reallocated");
            sess.chunk.reset(capacity);
        }

        sess.chunk.push_block(times, states, noises);
        Ok(Status::Open)
    }

    /// Finish the session: flush the final partial chunk and release the
    /// surface.
    pub fn done(&mut self) -> Result<Status> {
        self.finish(false)
    }

    /// Selector-based call surface mirroring the solver convention.
    ///
    /// `selector` must be `"init"`, `"step"` or `"done"`; anything else
    /// is an [`PlotError::InvalidSelector`] error. For `"init"`, `times`
    /// is the full time span and `states` the initial state vector. For
    /// `"done"`, data arguments are ignored except that supplying a noise
    /// block to a session initialized without noise tracking is a
    /// mismatch.
    pub fn call(
        &mut self,
        selector: &str,
        times: &[f64],
        states: &[f64],
        noises: Option<&[f64]>,
    ) -> Result<Status> {
        match selector {
            "init" => self.init(times, states, noises),
            "step" => self.step(times, states, noises),
            "done" => {
                if noises.is_some() {
                    if let Some(sess) = &self.session {
                        if !sess.noise_enabled {
                            return Err(PlotError::NoiseMismatch {
                                noise_enabled: false,
                            });
                        }
                    }
                }
                self.finish(noises.is_some())
            }
            other => Err(PlotError::InvalidSelector(other.to_string())),
        }
    }

    fn finish(&mut self, with_noise: bool) -> Result<Status> {
        let Some(mut sess) = self.session.take() else {
            return Err(PlotError::NotInitialized { with_noise });
        };

        if sess.surface.is_open() {
            let flushed = sess.chunk.len();
            Self::flush_chunk(&mut sess);
            sess.surface.render()?;
            if !sess.overlay {
                sess.surface.set_auto_scale();
            }
            debug!(flushed, "plot session finished");
            Ok(Status::Open)
        } else {
            // Closed surfaces still get a best-effort final render pass,
            // but no error: closure is a status, not a failure.
            let _ = sess.surface.render();
            debug!("plot session finished on a closed surface");
            Ok(Status::Closed)
        }
        // `sess` drops here, releasing the surface.
    }

    /// Concatenate the chunk's `[0..len)` samples onto every line series.
    fn flush_chunk(sess: &mut Session<S>) {
        for (d, &id) in sess.series.iter().enumerate() {
            sess.surface
                .extend_series(id, sess.chunk.times(), sess.chunk.state_row(d));
        }
        for (d, &id) in sess.noise_series.iter().enumerate() {
            sess.surface
                .extend_series(id, sess.chunk.times(), sess.chunk.noise_row(d));
        }
    }
}
