//! `AnsiBuffer`: single-syscall output buffer for ANSI sequences.

use super::style::Rgb;
use std::io::Write;

/// Pre-allocated buffer for building one frame of ANSI escape sequences.
///
/// A render pass accumulates every sequence here and flushes with a single
/// `write()` syscall, so a frame never appears half-drawn.
pub struct AnsiBuffer {
    data: Vec<u8>,
}

impl AnsiBuffer {
    /// Create a buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical plot frame (16KB).
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Clear the buffer for the next frame.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the accumulated bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if nothing has been written this frame.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string verbatim.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a single character.
    #[inline]
    pub fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    /// Move the cursor to 0-indexed (x, y).
    #[inline]
    pub fn move_to(&mut self, x: u16, y: u16) {
        write!(self.data, "\x1b[{};{}H", y + 1, x + 1).unwrap();
    }

    /// Set the foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b).unwrap();
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush the frame to a writer in a single syscall.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for AnsiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_is_one_indexed() {
        let mut out = AnsiBuffer::new();
        out.move_to(0, 0);
        assert_eq!(out.as_bytes(), b"\x1b[1;1H");
    }

    #[test]
    fn test_color_sequence() {
        let mut out = AnsiBuffer::new();
        out.set_fg(Rgb::new(1, 2, 3));
        assert_eq!(out.as_bytes(), b"\x1b[38;2;1;2;3m");
    }

    #[test]
    fn test_frame_accumulates_then_clears() {
        let mut out = AnsiBuffer::new();
        out.push_str("abc");
        out.push_char('\u{2801}');
        assert!(!out.is_empty());

        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, out.as_bytes());

        out.clear();
        assert!(out.is_empty());
    }
}
