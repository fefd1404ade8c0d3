/// First code point of the Unicode Braille Patterns block
const BRAILLE_BLANK: u32 = 0x2800;

/// Bit of each dot inside a cell, indexed by `[row][column]`.
/// Rows 0-2 use the original six-dot numbering, row 3 the two extra dots.
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Grid of terminal cells, each holding a 2x4 block of Braille dots
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl BrailleCanvas {
    /// Blank canvas of `cols` x `rows` terminal cells
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
        }
    }

    pub fn dot_width(&self) -> usize {
        self.cols * 2
    }

    pub fn dot_height(&self) -> usize {
        self.rows * 4
    }

    /// Raise the dot at (x, y); dots off the canvas are dropped
    pub fn set(&mut self, x: usize, y: usize) {
        if x >= self.dot_width() || y >= self.dot_height() {
            return;
        }
        self.cells[(y / 4) * self.cols + x / 2] |= DOT_BITS[y % 4][x % 2];
    }

    /// Glyph for a cell, `None` while the cell has no dots
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        match self.cells[row * self.cols + col] {
            0 => None,
            bits => char::from_u32(BRAILLE_BLANK + bits as u32),
        }
    }
}
