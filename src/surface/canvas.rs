//! Canvas: a braille dot grid for rasterizing line series.
//!
//! Each terminal cell holds a 2x4 block of addressable dots (U+2800 block),
//! so a canvas of `width x height` cells exposes `2*width x 4*height`
//! pixels. Cells are stored in a contiguous `Vec` in row-major order.

use super::style::Rgb;
use bitflags::bitflags;

bitflags! {
    /// Dot mask of one braille cell.
    ///
    /// Bit assignments follow the Unicode braille encoding: the glyph is
    /// `U+2800 + bits`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dots: u8 {
        /// Left column, row 0.
        const L0 = 0x01;
        /// Left column, row 1.
        const L1 = 0x02;
        /// Left column, row 2.
        const L2 = 0x04;
        /// Right column, row 0.
        const R0 = 0x08;
        /// Right column, row 1.
        const R1 = 0x10;
        /// Right column, row 2.
        const R2 = 0x20;
        /// Left column, row 3.
        const L3 = 0x40;
        /// Right column, row 3.
        const R3 = 0x80;
    }
}

impl Dots {
    /// Dot mask for the pixel at (`dx`, `dy`) within a cell, with
    /// `dx < 2` and `dy < 4`.
    pub const fn at(dx: u16, dy: u16) -> Self {
        const LEFT: [Dots; 4] = [Dots::L0, Dots::L1, Dots::L2, Dots::L3];
        const RIGHT: [Dots; 4] = [Dots::R0, Dots::R1, Dots::R2, Dots::R3];
        if dx == 0 {
            LEFT[dy as usize]
        } else {
            RIGHT[dy as usize]
        }
    }

    /// The braille glyph for this mask (space when no dots are set).
    pub fn glyph(self) -> char {
        if self.is_empty() {
            ' '
        } else {
            // 0x2800..=0x28FF is always a valid scalar value.
            char::from_u32(0x2800 + u32::from(self.bits())).unwrap_or(' ')
        }
    }
}

/// One canvas cell: a dot mask plus the color of its most recent dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasCell {
    /// Dots set in this cell.
    pub dots: Dots,
    /// Color the cell is drawn in.
    pub color: Rgb,
}

impl CanvasCell {
    /// An empty cell.
    pub const EMPTY: Self = Self {
        dots: Dots::empty(),
        color: Rgb::WHITE,
    };
}

/// A grid of braille cells addressed at dot resolution.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Contiguous cell storage (row-major order).
    cells: Vec<CanvasCell>,
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
}

impl Canvas {
    /// Create a canvas of `width x height` cells, all empty.
    ///
    /// # Panics
    /// Panics if either dimension is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "canvas dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![CanvasCell::EMPTY; size],
            width,
            height,
        }
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Width in addressable dots (2 per cell).
    #[inline]
    pub const fn dot_width(&self) -> u32 {
        self.width as u32 * 2
    }

    /// Height in addressable dots (4 per cell).
    #[inline]
    pub const fn dot_height(&self) -> u32 {
        self.height as u32 * 4
    }

    #[inline]
    fn index_of(&self, cx: u16, cy: u16) -> Option<usize> {
        if cx < self.width && cy < self.height {
            Some((cy as usize) * (self.width as usize) + (cx as usize))
        } else {
            None
        }
    }

    /// Set the dot at pixel coordinates (`px`, `py`), top-left origin.
    ///
    /// Out-of-bounds dots are ignored.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_dot(&mut self, px: u32, py: u32, color: Rgb) {
        if px >= self.dot_width() || py >= self.dot_height() {
            return;
        }
        let (cx, cy) = ((px / 2) as u16, (py / 4) as u16);
        if let Some(idx) = self.index_of(cx, cy) {
            let cell = &mut self.cells[idx];
            cell.dots |= Dots::at((px % 2) as u16, (py % 4) as u16);
            cell.color = color;
        }
    }

    /// Read the cell at (`cx`, `cy`).
    #[inline]
    pub fn get(&self, cx: u16, cy: u16) -> Option<&CanvasCell> {
        self.index_of(cx, cy).map(|i| &self.cells[i])
    }

    /// Draw a line segment between two dot coordinates (Bresenham).
    ///
    /// When `dashed` is set, every other 3-dot run is skipped.
    pub fn line(&mut self, a: (u32, u32), b: (u32, u32), color: Rgb, dashed: bool) {
        let (mut x, mut y) = (i64::from(a.0), i64::from(a.1));
        let (x1, y1) = (i64::from(b.0), i64::from(b.1));
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut step = 0u64;

        loop {
            #[allow(clippy::cast_sign_loss)]
            if !dashed || (step / 3) % 2 == 0 {
                self.set_dot(x as u32, y as u32, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            step += 1;
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Clear every cell.
    pub fn clear(&mut self) {
        self.cells.fill(CanvasCell::EMPTY);
    }

    /// Resize the canvas, discarding all content.
    ///
    /// The canvas is redrawn from scratch every frame, so unlike a
    /// scrollback buffer there is nothing worth preserving.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        assert!(new_width > 0 && new_height > 0, "canvas dimensions must be non-zero");
        if new_width == self.width && new_height == self.height {
            self.clear();
            return;
        }
        let size = (new_width as usize) * (new_height as usize);
        self.cells = vec![CanvasCell::EMPTY; size];
        self.width = new_width;
        self.height = new_height;
    }

    /// Iterate over cell rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CanvasCell]> {
        self.cells.chunks(self.width as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_mask_positions() {
        assert_eq!(Dots::at(0, 0), Dots::L0);
        assert_eq!(Dots::at(1, 0), Dots::R0);
        assert_eq!(Dots::at(0, 3), Dots::L3);
        assert_eq!(Dots::at(1, 3), Dots::R3);
    }

    #[test]
    fn test_glyph_encoding() {
        assert_eq!(Dots::empty().glyph(), ' ');
        assert_eq!(Dots::L0.glyph(), '\u{2801}');
        assert_eq!(Dots::all().glyph(), '\u{28FF}');
    }

    #[test]
    fn test_set_dot_maps_to_cell() {
        let mut canvas = Canvas::new(4, 2);
        canvas.set_dot(0, 0, Rgb::WHITE);
        canvas.set_dot(3, 5, Rgb::WHITE);

        assert_eq!(canvas.get(0, 0).unwrap().dots, Dots::L0);
        // Dot (3,5): cell (1,1), in-cell (1,1) -> R1.
        assert_eq!(canvas.get(1, 1).unwrap().dots, Dots::R1);
    }

    #[test]
    fn test_set_dot_accumulates_in_cell() {
        let mut canvas = Canvas::new(1, 1);
        canvas.set_dot(0, 0, Rgb::WHITE);
        canvas.set_dot(1, 3, Rgb::WHITE);
        assert_eq!(canvas.get(0, 0).unwrap().dots, Dots::L0 | Dots::R3);
    }

    #[test]
    fn test_out_of_bounds_dots_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set_dot(100, 100, Rgb::WHITE);
        assert!(canvas.rows().flatten().all(|c| c.dots.is_empty()));
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = Canvas::new(4, 1);
        canvas.line((0, 0), (7, 0), Rgb::WHITE, false);
        for cx in 0..4 {
            let dots = canvas.get(cx, 0).unwrap().dots;
            assert!(dots.contains(Dots::L0) && dots.contains(Dots::R0));
        }
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut canvas = Canvas::new(10, 1);
        canvas.line((0, 0), (19, 0), Rgb::WHITE, true);
        let set: usize = canvas
            .rows()
            .flatten()
            .map(|c| c.dots.bits().count_ones() as usize)
            .sum();
        assert!(set > 0 && set < 20);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut canvas = Canvas::new(4, 2);
        canvas.set_dot(0, 0, Rgb::WHITE);
        canvas.resize(8, 3);
        assert_eq!(canvas.width(), 8);
        assert_eq!(canvas.height(), 3);
        assert!(canvas.rows().flatten().all(|c| c.dots.is_empty()));
    }
}
