use crate::error::RenderError;
use crate::request::RenderRequest;

/// A square RGBA canvas: `size × size` pixels, 4 bytes each, row-major with
/// the origin at the top-left.
///
/// The buffer is moved, never shared, between whoever is writing it and
/// whoever displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer filled with opaque black.
    pub fn new(size: u32) -> Self {
        let mut pixels = vec![0u8; size as usize * size as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self { size, pixels }
    }

    /// A buffer sized for `request`.
    pub fn for_request(request: &RenderRequest) -> Self {
        Self::new(request.viewport.size())
    }

    /// Canvas edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Stride of one row in bytes.
    pub fn row_bytes(&self) -> usize {
        self.size as usize * 4
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Hand the raw RGBA bytes to a display surface.
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.size as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Reject a buffer whose length does not match what `request` writes.
    pub fn check_fits(&self, request: &RenderRequest) -> crate::Result<()> {
        let expected = request.buffer_len();
        if self.pixels.len() != expected {
            return Err(RenderError::BufferSizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorizer::ColorizerKind;
    use fractview_core::Viewport;

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = PixelBuffer::new(4);
        assert_eq!(buf.as_bytes().len(), 4 * 4 * 4);
        for chunk in buf.as_bytes().chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let mut buf = PixelBuffer::new(3);
        let i = (2 * 3 + 1) * 4;
        buf.as_bytes_mut()[i..i + 4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buf.pixel(1, 2), [1, 2, 3, 4]);
        assert_eq!(buf.pixel(2, 1), [0, 0, 0, 255]);
        assert_eq!(buf.row_bytes(), 12);
    }

    #[test]
    fn check_fits_compares_lengths() {
        let req = RenderRequest::new(
            Viewport::default_view(5).unwrap(),
            10,
            ColorizerKind::Rainbow,
        )
        .unwrap();
        assert!(PixelBuffer::for_request(&req).check_fits(&req).is_ok());
        let err = PixelBuffer::new(4).check_fits(&req).unwrap_err();
        assert!(matches!(
            err,
            RenderError::BufferSizeMismatch {
                expected: 100,
                actual: 64
            }
        ));
    }
}
