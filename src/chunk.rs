//! `SampleChunk`: the fixed-capacity triple-series buffer between flushes.
//!
//! A chunk accumulates consecutive `(time, state[, noise])` samples until
//! a flush drains it onto the render surface. Storage is preallocated at a
//! width-derived capacity and is never grown in place: overflow is handled
//! by flush-then-refill in the controller, and a resize reallocates.
//!
//! State and noise are stored one row per component (`dimension` rows of
//! `capacity` slots each) so a flush can hand each line series a
//! contiguous slice without gathering.

/// Compute the chunk capacity for a run of `expected_samples` samples on a
/// drawable `width` addressable columns wide.
///
/// One flush per on-screen column is the break-even point: redrawing more
/// often than once per column cannot add visible resolution. The result is
/// clamped to at least 1 and at most `expected_samples`.
pub fn chunk_capacity(expected_samples: usize, width: u16) -> usize {
    let width = usize::from(width).max(1);
    expected_samples
        .div_ceil(width)
        .clamp(1, expected_samples.max(1))
}

/// A fixed-capacity buffer of consecutive samples awaiting one flush.
///
/// The write index (`len`) satisfies `0 <= len <= capacity` at all times;
/// appends that would exceed capacity are rejected by [`fits`](Self::fits)
/// and must be preceded by a flush.
#[derive(Debug, Clone)]
pub struct SampleChunk {
    /// Sample times for the current chunk.
    time: Vec<f64>,
    /// One row per solution component, each `capacity` slots.
    state: Vec<Vec<f64>>,
    /// One row per noise channel; empty when noise tracking is off.
    noise: Vec<Vec<f64>>,
    /// Slots allocated per row.
    capacity: usize,
    /// Next free slot (number of samples held).
    len: usize,
}

impl SampleChunk {
    /// Create a chunk for `dim` solution components and, optionally,
    /// `noise_dim` noise channels, with `capacity` slots per row.
    ///
    /// # Panics
    /// Panics if `dim` or `capacity` is 0.
    pub fn new(dim: usize, noise_dim: Option<usize>, capacity: usize) -> Self {
        assert!(dim > 0, "chunk needs at least one solution component");
        assert!(capacity > 0, "chunk capacity must be non-zero");
        let noise_dim = noise_dim.unwrap_or(0);
        Self {
            time: vec![0.0; capacity],
            state: vec![vec![0.0; capacity]; dim],
            noise: vec![vec![0.0; capacity]; noise_dim],
            capacity,
            len: 0,
        }
    }

    /// Number of solution components.
    #[inline]
    pub fn dim(&self) -> usize {
        self.state.len()
    }

    /// Number of noise channels (0 when noise tracking is off).
    #[inline]
    pub fn noise_dim(&self) -> usize {
        self.noise.len()
    }

    /// Slots allocated per row.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently buffered (the write index).
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check whether no samples are buffered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether a batch of `n` further samples fits without overflow.
    #[inline]
    pub const fn fits(&self, n: usize) -> bool {
        self.len + n <= self.capacity
    }

    /// Append a batch of samples.
    ///
    /// `states` (and `noises`, when present) are column-major flat slices:
    /// sample `k` occupies `[k * dim .. (k + 1) * dim]`. The caller has
    /// already validated shapes and checked [`fits`](Self::fits).
    ///
    /// # Panics
    /// Panics in debug builds if the batch does not fit or the block
    /// shapes are wrong.
    pub fn push_block(&mut self, times: &[f64], states: &[f64], noises: Option<&[f64]>) {
        let n = times.len();
        debug_assert!(self.fits(n), "chunk overflow must be flushed first");
        debug_assert_eq!(states.len(), n * self.dim());
        debug_assert_eq!(
            noises.map_or(0, <[f64]>::len),
            n * self.noise_dim(),
        );

        self.time[self.len..self.len + n].copy_from_slice(times);
        let dim = self.dim();
        for (d, row) in self.state.iter_mut().enumerate() {
            for k in 0..n {
                row[self.len + k] = states[k * dim + d];
            }
        }
        if let Some(noises) = noises {
            let noise_dim = self.noise.len();
            for (d, row) in self.noise.iter_mut().enumerate() {
                for k in 0..n {
                    row[self.len + k] = noises[k * noise_dim + d];
                }
            }
        }
        self.len += n;
    }

    /// The buffered sample times, trimmed to the write index.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.time[..self.len]
    }

    /// Buffered values for solution component `d`, trimmed to the write
    /// index.
    #[inline]
    pub fn state_row(&self, d: usize) -> &[f64] {
        &self.state[d][..self.len]
    }

    /// Buffered values for noise channel `d`, trimmed to the write index.
    #[inline]
    pub fn noise_row(&self, d: usize) -> &[f64] {
        &self.noise[d][..self.len]
    }

    /// Discard the buffered samples and reallocate every row at
    /// `capacity` slots.
    ///
    /// Dimensions are fixed for the chunk's lifetime; only the capacity
    /// changes. Called after every flush so a resized drawable is picked
    /// up on the next fill cycle.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn reset(&mut self, capacity: usize) {
        assert!(capacity > 0, "chunk capacity must be non-zero");
        self.time = vec![0.0; capacity];
        for row in &mut self.state {
            *row = vec![0.0; capacity];
        }
        for row in &mut self.noise {
            *row = vec![0.0; capacity];
        }
        self.capacity = capacity;
        self.len = 0;
    }
}
