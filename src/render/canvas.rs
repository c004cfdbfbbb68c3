//! Intensity canvas: `0.0` is paper, `1.0` is a burnt dot.

use super::RawRaster;
use super::dither;

/// How coverage is applied to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Darkens (normal text)
    Black,
    /// Lightens (text on an inverted band)
    White,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Intensity at `(x, y)`; out-of-range reads are paper.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0.0
        }
    }

    /// Apply `coverage` at `(x, y)`. Anything outside the canvas is dropped.
    pub fn paint(&mut self, x: i64, y: i64, coverage: f32, ink: Ink) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let px = &mut self.data[y as usize * self.width + x as usize];
        *px = match ink {
            Ink::Black => (*px + coverage).min(1.0),
            Ink::White => (*px - coverage).max(0.0),
        };
    }

    /// Fill a rectangle solid black, clipped to the canvas.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for row in y.min(self.height)..y_end {
            let start = row * self.width;
            self.data[start + x.min(x_end)..start + x_end].fill(1.0);
        }
    }

    /// Number of dots that would print.
    #[cfg(test)]
    pub fn inked(&self) -> usize {
        self.data
            .iter()
            .filter(|&&v| v >= dither::THRESHOLD)
            .count()
    }

    /// Threshold to 1-bit and pack rows.
    pub fn into_raster(self) -> RawRaster {
        let data = dither::pack_intensity(&self.data, self.width, self.height);
        RawRaster {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
