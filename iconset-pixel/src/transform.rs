//! Threshold transform on RGBA rasters

use image::{Rgba, RgbaImage};

/// Fully transparent black, written over every near-black pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Channel cutoff below which a pixel counts as black.
///
/// A pixel qualifies only when red, green and blue are all strictly below
/// the cutoff, so `Threshold(0)` never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(pub u8);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(30);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Threshold {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True when R, G and B are all below the threshold. Alpha is ignored.
pub fn is_near_black(pixel: &Rgba<u8>, threshold: Threshold) -> bool {
    let [r, g, b, _] = pixel.0;
    let t = threshold.value();
    r < t && g < t && b < t
}

/// Clear near-black pixels in place.
///
/// Returns the number of pixels whose value actually changed, so pixels
/// that were already `(0,0,0,0)` are not counted.
pub fn clear_near_black(img: &mut RgbaImage, threshold: Threshold) -> usize {
    let mut changed = 0;

    for pixel in img.pixels_mut() {
        if is_near_black(pixel, threshold) && *pixel != TRANSPARENT {
            *pixel = TRANSPARENT;
            changed += 1;
        }
    }

    changed
}
