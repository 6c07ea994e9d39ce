//! Display rendering: diverging colour map and binary PPM export
//!
//! Rendering reads the grid and never changes it. Values are scaled by the
//! largest finite |sample| and clamped to [-1, 1] for colour only.
//! Non-finite (evanescent) cells get their own colour.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::grid::FieldGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Positive extreme
pub const POSITIVE: Rgb = Rgb(255, 107, 53);
/// Negative extreme
pub const NEGATIVE: Rgb = Rgb(0, 229, 204);
/// Cells with no propagating field
pub const EVANESCENT: Rgb = Rgb(72, 40, 96);

/// Colour for a normalised sample in [-1, 1]; zero maps to black
pub fn colour_for(value: f64) -> Rgb {
    if !value.is_finite() {
        return EVANESCENT;
    }
    let (base, intensity) = if value > 0.0 {
        (POSITIVE, value.min(1.0))
    } else {
        (NEGATIVE, (-value).min(1.0))
    };
    let scale = |c: u8| (c as f64 * intensity).floor() as u8;
    Rgb(scale(base.0), scale(base.1), scale(base.2))
}

/// RGB raster of a grid
pub struct Image {
    pub width: usize,
    pub height: usize,
    /// Row-major RGB triples
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let k = (y * self.width + x) * 3;
        Some(Rgb(self.pixels[k], self.pixels[k + 1], self.pixels[k + 2]))
    }
}

/// Rasterise with `cell_px` pixels per sample. Grid rows run along the
/// horizontal image axis, columns down the vertical one.
pub fn render_image(grid: &FieldGrid, cell_px: usize) -> Image {
    let cell_px = cell_px.max(1);
    let n = grid.size();
    let side = n * cell_px;
    let max_abs = grid.max_abs();
    let norm = if max_abs > 0.0 { max_abs } else { 1.0 };

    let mut pixels = Vec::with_capacity(side * side * 3);
    for y in 0..side {
        let j = y / cell_px;
        for x in 0..side {
            let i = x / cell_px;
            let value = grid.get(i, j).unwrap_or(f64::NAN);
            let Rgb(r, g, b) = colour_for(value / norm);
            pixels.extend_from_slice(&[r, g, b]);
        }
    }

    Image { width: side, height: side, pixels }
}

/// Write binary PPM (P6)
pub fn write_ppm(image: &Image, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "P6\n{} {}\n255\n", image.width, image.height)?;
    writer.write_all(&image.pixels)?;
    writer.flush()?;

    info!(
        "Wrote {}x{} PPM to {:?}",
        image.width, image.height, path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_map_extremes() {
        assert_eq!(colour_for(0.0), Rgb(0, 0, 0));
        assert_eq!(colour_for(1.0), POSITIVE);
        assert_eq!(colour_for(-1.0), NEGATIVE);
        // Clamped for display
        assert_eq!(colour_for(7.5), POSITIVE);
        assert_eq!(colour_for(f64::NAN), EVANESCENT);
        assert_eq!(colour_for(f64::INFINITY), EVANESCENT);
    }

    #[test]
    fn test_render_leaves_grid_untouched() {
        let grid = FieldGrid::from_fn(3, |i, j| if i == 1 { f64::NAN } else { (j as f64) - 1.0 });
        let before = grid.clone();
        let image = render_image(&grid, 2);
        assert!(grid.bit_eq(&before));

        assert_eq!(image.width, 6);
        assert_eq!(image.pixels.len(), 6 * 6 * 3);
        // Row i = 1 is x in [2, 4)
        assert_eq!(image.pixel(2, 0), Some(EVANESCENT));
        assert_eq!(image.pixel(0, 0), Some(NEGATIVE));
        assert_eq!(image.pixel(0, 5), Some(POSITIVE));
        assert_eq!(image.pixel(6, 0), None);
    }

    #[test]
    fn test_write_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.ppm");
        let grid = FieldGrid::from_fn(2, |i, _| i as f64);
        write_ppm(&render_image(&grid, 1), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6\n2 2\n255\n"));
        assert_eq!(bytes.len(), b"P6\n2 2\n255\n".len() + 12);
    }
}
