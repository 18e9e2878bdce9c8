//! `TermSurface`: the terminal-backed render surface.
//!
//! Draws line series on a braille canvas inside an alternate-screen
//! raw-mode terminal. A watcher thread polls crossterm events and reports
//! close keystrokes ('q', Escape, Ctrl-C) and resizes over a channel; the
//! surface drains that channel synchronously whenever the controller
//! probes liveness or width, so the surface itself never mutates between
//! calls.

use super::canvas::Canvas;
use super::output::AnsiBuffer;
use super::style::{Rgb, SeriesStyle};
use super::{SeriesId, Surface};
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Cells reserved left of the plot area for value labels and the axis.
const MARGIN_LEFT: u16 = 10;
/// Rows reserved below the plot area for the axis and time labels.
const MARGIN_BOTTOM: u16 = 2;
/// Rows reserved above the plot area for the title.
const MARGIN_TOP: u16 = 1;

/// Configuration for a terminal surface.
#[derive(Debug, Clone)]
pub struct TermConfig {
    /// Overlay/hold mode: series are drawn dashed and the time axis is
    /// never preset or auto-scale-restored by the controller.
    pub overlay: bool,
    /// Title drawn above the plot area.
    pub title: String,
    /// Watcher poll timeout.
    pub poll_timeout: Duration,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            overlay: false,
            title: "traceplot".to_string(),
            poll_timeout: Duration::from_millis(50),
        }
    }
}

/// Events from the watcher thread.
#[derive(Debug, Clone, Copy)]
enum WatchEvent {
    /// A close keystroke was seen.
    Close,
    /// The terminal was resized.
    Resize(u16, u16),
}

/// Watcher thread polling terminal events for close and resize.
struct Watcher {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Watcher {
    fn spawn(sender: Sender<WatchEvent>, poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let handle = thread::Builder::new()
            .name("traceplot-watch".to_string())
            .spawn(move || Self::run_loop(&sender, &shutdown_flag, poll_timeout))
            .expect("failed to spawn watcher thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    fn run_loop(sender: &Sender<WatchEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            match event::poll(poll_timeout) {
                Ok(true) => {
                    if let Ok(ev) = event::read() {
                        if let Some(watch) = Self::convert(&ev) {
                            if sender.send(watch).is_err() {
                                break;
                            }
                        }
                    }
                }
                // No event within the timeout; loop to re-check shutdown.
                Ok(false) => {}
                Err(_) => break,
            }
        }
    }

    fn convert(ev: &Event) -> Option<WatchEvent> {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(WatchEvent::Close),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(WatchEvent::Close)
                }
                _ => None,
            },
            Event::Resize(w, h) => Some(WatchEvent::Resize(*w, *h)),
            _ => None,
        }
    }

    fn join(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// Data held for one line series.
#[derive(Debug, Clone)]
struct SeriesData {
    style: SeriesStyle,
    /// Axis seed: positions the series before any data is flushed. Not
    /// part of the data stream.
    seed: (f64, f64),
    times: Vec<f64>,
    values: Vec<f64>,
}

/// A live plot on an alternate-screen raw-mode terminal.
pub struct TermSurface {
    config: TermConfig,
    series: Vec<SeriesData>,
    canvas: Canvas,
    out: AnsiBuffer,
    events: Receiver<WatchEvent>,
    watcher: Option<Watcher>,
    open: bool,
    cols: u16,
    rows: u16,
    /// Preset time range; `None` means auto-scale from data.
    time_range: Option<(f64, f64)>,
}

impl TermSurface {
    /// Open the terminal surface: raw mode, alternate screen, hidden
    /// cursor, watcher thread.
    ///
    /// # Errors
    /// Returns an error if terminal setup fails; this is fatal for the
    /// plot session.
    pub fn open(config: TermConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let (tx, rx) = bounded::<WatchEvent>(64);
        let watcher = Watcher::spawn(tx, config.poll_timeout);

        let (cw, ch) = Self::plot_cells(cols, rows);
        Ok(Self {
            config,
            series: Vec::new(),
            canvas: Canvas::new(cw, ch),
            out: AnsiBuffer::new(),
            events: rx,
            watcher: Some(watcher),
            open: true,
            cols,
            rows,
            time_range: None,
        })
    }

    /// Plot-area size in cells for a terminal of `cols x rows`.
    fn plot_cells(cols: u16, rows: u16) -> (u16, u16) {
        let cw = cols.saturating_sub(MARGIN_LEFT + 1).max(1);
        let ch = rows.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1);
        (cw, ch)
    }

    /// Drain watcher events; the sole place surface state changes between
    /// controller calls is folded in here.
    fn drain_events(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            match ev {
                WatchEvent::Close => self.open = false,
                WatchEvent::Resize(w, h) => {
                    self.cols = w;
                    self.rows = h;
                    let (cw, ch) = Self::plot_cells(w, h);
                    self.canvas.resize(cw, ch);
                }
            }
        }
    }

    /// The time range to draw: the preset range, else data extrema.
    fn effective_time_range(&self) -> (f64, f64) {
        if let Some(range) = self.time_range {
            return range;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for s in &self.series {
            min = min.min(s.seed.0);
            max = max.max(s.seed.0);
            for &t in &s.times {
                min = min.min(t);
                max = max.max(t);
            }
        }
        pad_degenerate(min, max)
    }

    /// Value range over all series data and seeds.
    fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for s in &self.series {
            min = min.min(s.seed.1);
            max = max.max(s.seed.1);
            for &v in &s.values {
                min = min.min(v);
                max = max.max(v);
            }
        }
        pad_degenerate(min, max)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&mut self) {
        self.canvas.clear();
        let (tmin, tmax) = self.effective_time_range();
        let (vmin, vmax) = self.value_range();
        let dw = self.canvas.dot_width().saturating_sub(1).max(1) as f64;
        let dh = self.canvas.dot_height().saturating_sub(1).max(1) as f64;

        let to_dot = |t: f64, v: f64| -> (u32, u32) {
            let fx = ((t - tmin) / (tmax - tmin)).clamp(0.0, 1.0);
            let fy = ((vmax - v) / (vmax - vmin)).clamp(0.0, 1.0);
            ((fx * dw).round() as u32, (fy * dh).round() as u32)
        };

        for s in &self.series {
            if s.times.is_empty() {
                let (px, py) = to_dot(s.seed.0, s.seed.1);
                self.canvas.set_dot(px, py, s.style.color);
                continue;
            }
            let mut prev = to_dot(s.times[0], s.values[0]);
            self.canvas.set_dot(prev.0, prev.1, s.style.color);
            for (&t, &v) in s.times.iter().zip(&s.values).skip(1) {
                let next = to_dot(t, v);
                self.canvas.line(prev, next, s.style.color, s.style.dashed);
                prev = next;
            }
        }
    }

    /// Emit the full frame into the output buffer.
    fn compose_frame(&mut self) {
        let (tmin, tmax) = self.effective_time_range();
        let (vmin, vmax) = self.value_range();

        self.out.clear();
        self.out.clear_screen();

        // Title row.
        self.out.move_to(MARGIN_LEFT, 0);
        self.out.set_fg(Rgb::WHITE);
        self.out.push_str(&self.config.title);

        // Canvas rows with color runs.
        let plot_top = MARGIN_TOP;
        let mut current_fg: Option<Rgb> = None;
        let height = self.canvas.height();
        for (row_idx, row) in self.canvas.rows().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = plot_top + row_idx as u16;
            self.out.move_to(MARGIN_LEFT, y);
            for cell in row {
                if cell.dots.is_empty() {
                    self.out.push_char(' ');
                    continue;
                }
                if current_fg != Some(cell.color) {
                    self.out.set_fg(cell.color);
                    current_fg = Some(cell.color);
                }
                self.out.push_char(cell.dots.glyph());
            }
        }

        // Left axis with value labels at top, middle and bottom.
        self.out.set_fg(Rgb::AXIS);
        for row in 0..height {
            self.out.move_to(MARGIN_LEFT - 1, plot_top + row);
            self.out.push_char('\u{2502}');
        }
        self.emit_value_label(vmax, plot_top);
        self.emit_value_label((vmin + vmax) / 2.0, plot_top + height / 2);
        self.emit_value_label(vmin, plot_top + height.saturating_sub(1));

        // Bottom axis with time labels at both ends.
        let axis_y = plot_top + height;
        self.out.move_to(MARGIN_LEFT - 1, axis_y);
        self.out.push_char('\u{2514}');
        for _ in 0..self.canvas.width() {
            self.out.push_char('\u{2500}');
        }
        self.out.move_to(MARGIN_LEFT, axis_y + 1);
        self.out.push_str(&format_value(tmin));
        let tmax_label = format_value(tmax);
        #[allow(clippy::cast_possible_truncation)]
        let label_w = UnicodeWidthStr::width(tmax_label.as_str()) as u16;
        let x = (MARGIN_LEFT + self.canvas.width()).saturating_sub(label_w);
        self.out.move_to(x, axis_y + 1);
        self.out.push_str(&tmax_label);

        // Quit hint in the top-left gutter.
        self.out.move_to(0, 0);
        self.out.push_str("q:quit");
        self.out.reset_attrs();
    }

    /// Right-align a value label in the left gutter at `y`.
    fn emit_value_label(&mut self, v: f64, y: u16) {
        let label = format_value(v);
        #[allow(clippy::cast_possible_truncation)]
        let w = UnicodeWidthStr::width(label.as_str()) as u16;
        let x = MARGIN_LEFT.saturating_sub(1).saturating_sub(w);
        self.out.move_to(x, y);
        self.out.push_str(&label);
    }
}

impl Surface for TermSurface {
    fn width(&mut self) -> u16 {
        self.drain_events();
        let (cw, _) = Self::plot_cells(self.cols, self.rows);
        // Two addressable dot columns per cell.
        cw.saturating_mul(2)
    }

    fn is_open(&mut self) -> bool {
        self.drain_events();
        self.open
    }

    fn overlay(&self) -> bool {
        self.config.overlay
    }

    fn add_series(&mut self, style: SeriesStyle, t0: f64, v0: f64) -> SeriesId {
        let id = SeriesId(self.series.len());
        self.series.push(SeriesData {
            style,
            seed: (t0, v0),
            times: Vec::new(),
            values: Vec::new(),
        });
        id
    }

    fn extend_series(&mut self, id: SeriesId, times: &[f64], values: &[f64]) {
        debug_assert_eq!(times.len(), values.len());
        if let Some(s) = self.series.get_mut(id.0) {
            s.times.extend_from_slice(times);
            s.values.extend_from_slice(values);
        }
    }

    fn set_time_range(&mut self, min: f64, max: f64) {
        self.time_range = Some(pad_degenerate(min, max));
    }

    fn set_auto_scale(&mut self) {
        self.time_range = None;
    }

    fn render(&mut self) -> io::Result<()> {
        self.drain_events();
        if !self.open {
            return Ok(());
        }
        self.rasterize();
        self.compose_frame();
        self.out.flush_to(&mut io::stdout())
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.join();
        }
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Widen a degenerate or empty range so mapping to dots stays finite.
fn pad_degenerate(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        let pad = if min.abs() < f64::EPSILON { 0.5 } else { min.abs() * 0.1 };
        return (min - pad, max + pad);
    }
    (min, max)
}

/// Short numeric label for axis annotations.
fn format_value(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else if v.abs() >= 10_000.0 || v.abs() < 0.001 {
        format!("{v:.2e}")
    } else {
        format!("{v:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_cells_reserve_margins() {
        let (cw, ch) = TermSurface::plot_cells(80, 24);
        assert_eq!(cw, 80 - MARGIN_LEFT - 1);
        assert_eq!(ch, 24 - MARGIN_TOP - MARGIN_BOTTOM);
    }

    #[test]
    fn test_plot_cells_never_zero() {
        let (cw, ch) = TermSurface::plot_cells(2, 1);
        assert!(cw >= 1 && ch >= 1);
    }

    #[test]
    fn test_pad_degenerate_ranges() {
        assert_eq!(pad_degenerate(0.0, 1.0), (0.0, 1.0));
        let (lo, hi) = pad_degenerate(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
        let (lo, hi) = pad_degenerate(f64::INFINITY, f64::NEG_INFINITY);
        assert!(lo < hi);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(1.5), "1.500");
        assert!(format_value(1.0e6).contains('e'));
        assert!(format_value(1.0e-5).contains('e'));
    }
}
