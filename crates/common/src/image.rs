use crate::types::Rgba;

/// A decoded RGBA image held in memory, row-major.
///
/// Decoding from files is the asset layer's job; this type only stores pixels
/// and knows how to resample itself to a viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Image {
    /// Build an image from raw pixels. Returns `None` if the pixel count does
    /// not match `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-color image.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Resample to `width` x `height` with nearest-neighbour sampling.
    ///
    /// An empty source produces a transparent target of the requested size.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        if self.width == 0 || self.height == 0 {
            return Self::solid(width, height, Rgba::rgba(0, 0, 0, 0));
        }
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height.max(1) as u64) as usize;
            let row = sy * self.width as usize;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width.max(1) as u64) as usize;
                pixels.push(self.pixels[row + sx]);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Image {
        let a = Rgba::rgb(255, 0, 0);
        let b = Rgba::rgb(0, 0, 255);
        Image::from_pixels(2, 2, vec![a, b, b, a]).unwrap()
    }

    #[test]
    fn from_pixels_checks_length() {
        assert!(Image::from_pixels(2, 2, vec![Rgba::BLACK; 3]).is_none());
    }

    #[test]
    fn scale_up_repeats_pixels() {
        let img = checker().scaled(4, 4);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
        assert_eq!(img.pixel(0, 0), img.pixel(1, 1));
        assert_eq!(img.pixel(2, 0), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(img.pixel(3, 3), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn scale_down_samples() {
        let img = checker().scaled(1, 1);
        assert_eq!(img.pixel(0, 0), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn scale_empty_source() {
        let empty = Image::solid(0, 0, Rgba::BLACK);
        let img = empty.scaled(3, 2);
        assert_eq!(img.pixel(2, 1), Some(Rgba::rgba(0, 0, 0, 0)));
    }

    #[test]
    fn pixel_out_of_bounds() {
        assert_eq!(checker().pixel(2, 0), None);
    }
}
