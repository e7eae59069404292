/// First code point of the Unicode Braille Patterns block
const BRAILLE_BASE: u32 = 0x2800;

/// Terminal canvas drawn with Braille patterns.
/// Each character cell holds a 2x4 dot grid, so a canvas of `w x h`
/// characters has `2w x 4h` addressable pixels.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    /// Dot bits per character cell, row-major
    cells: Vec<u8>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Turn on a dot.
    /// Dot bits within a cell:
    /// ```text
    /// (0,0) 0x01  (1,0) 0x08
    /// (0,1) 0x02  (1,1) 0x10
    /// (0,2) 0x04  (1,2) 0x20
    /// (0,3) 0x40  (1,3) 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (0, 3) => 0x40,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            _ => 0x80,
        };
        self.cells[cy * self.width + cx] |= bit;
    }

    /// Signed variant for projected coordinates; negatives are off-canvas
    #[inline]
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Character at a cell, `None` when the cell has no dots
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row * self.width + col] {
            0 => None,
            bits => char::from_u32(BRAILLE_BASE + bits as u32),
        }
    }
}

#[cfg(test)]
impl BrailleCanvas {
    /// One row as a string, blank cells included
    pub fn row_to_string(&self, row: usize) -> String {
        (0..self.width)
            .map(|col| self.glyph(col, row).unwrap_or('\u{2800}'))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|row| self.row_to_string(row))
    }
}
