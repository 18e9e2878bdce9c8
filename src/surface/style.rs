//! Series colors and line styles.

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Create a new color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Dim gray, used for axes and labels.
    pub const AXIS: Self = Self::new(110, 110, 110);
}

/// Default palette cycled over solution components.
pub const PALETTE: [Rgb; 6] = [
    Rgb::new(90, 170, 255),
    Rgb::new(255, 160, 70),
    Rgb::new(120, 220, 120),
    Rgb::new(240, 110, 110),
    Rgb::new(190, 140, 250),
    Rgb::new(110, 210, 210),
];

/// Visual style of one line series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Line color.
    pub color: Rgb,
    /// Dashed instead of solid (secondary/overlay series).
    pub dashed: bool,
}

impl SeriesStyle {
    /// Solid line in the given color.
    #[inline]
    pub const fn solid(color: Rgb) -> Self {
        Self { color, dashed: false }
    }

    /// Dashed line in the given color.
    #[inline]
    pub const fn dashed(color: Rgb) -> Self {
        Self { color, dashed: true }
    }

    /// Palette style for solution component `d`.
    pub const fn for_component(d: usize, overlay: bool) -> Self {
        let color = PALETTE[d % PALETTE.len()];
        // In overlay/hold mode new series are drawn dashed so they read
        // as an addition to whatever the surface already shows.
        Self { color, dashed: overlay }
    }

    /// Palette style for noise channel `d` (always dashed).
    pub const fn for_noise(d: usize) -> Self {
        let base = PALETTE[d % PALETTE.len()];
        // Dim the solution palette so noise reads as secondary.
        Self::dashed(Rgb::new(base.r / 2 + 60, base.g / 2 + 60, base.b / 2 + 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let a = SeriesStyle::for_component(0, false);
        let b = SeriesStyle::for_component(PALETTE.len(), false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_overlay_series_are_dashed() {
        assert!(!SeriesStyle::for_component(0, false).dashed);
        assert!(SeriesStyle::for_component(0, true).dashed);
        assert!(SeriesStyle::for_noise(0).dashed);
    }
}
