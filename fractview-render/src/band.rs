/// Default band height in rows. A 600-pixel canvas splits into 38 bands,
/// enough to keep every rayon thread busy while each band stays contiguous.
pub const DEFAULT_ROWS_PER_BAND: u32 = 16;

/// A contiguous range of whole rows within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band.
    pub y: u32,
    /// Number of rows (the last band may be shorter).
    pub rows: u32,
}

impl RowBand {
    /// Number of pixels in the band on a canvas of edge `size`.
    pub fn pixel_count(&self, size: u32) -> usize {
        self.rows as usize * size as usize
    }

    /// Byte range of the band inside a `size × size` RGBA buffer.
    pub fn byte_range(&self, size: u32) -> std::ops::Range<usize> {
        let row_bytes = size as usize * 4;
        let start = self.y as usize * row_bytes;
        start..start + self.rows as usize * row_bytes
    }
}

/// Split `size` rows into bands of at most `rows_per_band` rows, top to bottom.
pub fn build_row_bands(size: u32, rows_per_band: u32) -> Vec<RowBand> {
    let step = rows_per_band.max(1);
    let mut bands = Vec::with_capacity(size.div_ceil(step) as usize);
    let mut y = 0;
    while y < size {
        let rows = step.min(size - y);
        bands.push(RowBand { y, rows });
        y += rows;
    }
    bands
}
