#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self::new(columns as u32, rows as u32 * 2)
    }

    fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: PixelSize,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn blank(size: PixelSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.area() * 4],
        }
    }

    pub fn from_rgb(size: PixelSize, rgb: &[u8]) -> Self {
        let mut pixels = Vec::with_capacity(size.area() * 4);
        for px in rgb.chunks_exact(3).take(size.area()) {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        pixels.resize(size.area() * 4, 0);
        Self { size, pixels }
    }

    #[cfg(test)]
    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}
