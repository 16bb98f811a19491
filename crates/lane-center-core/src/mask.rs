use crate::LaneError;

/// Borrowed row-major binary mask. Any non-zero byte is foreground.
#[derive(Clone, Copy, Debug)]
pub struct MaskView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned row-major binary mask, as returned by the edge and denoise stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

fn expected_len(width: usize, height: usize) -> Result<usize, LaneError> {
    if width == 0 || height == 0 {
        return Err(LaneError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(LaneError::InvalidDimensions { width, height })
}

impl<'a> MaskView<'a> {
    /// Wrap a row-major buffer, checking that it holds exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, LaneError> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(LaneError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Re-check the invariants of a view built with struct-literal syntax.
    pub fn validate(&self) -> Result<(), LaneError> {
        Self::new(self.width, self.height, self.data).map(|_| ())
    }

    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    /// First row of the region of interest (the lower half of the frame).
    #[inline]
    pub fn roi_start(&self) -> usize {
        self.height / 2
    }

    /// Mean intensity over the whole mask, on the 0..255 scale.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f32 / self.data.len() as f32
    }
}

impl Mask {
    /// Take ownership of a row-major buffer, checking its length.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, LaneError> {
        MaskView::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// All-background mask.
    pub fn zeros(width: usize, height: usize) -> Result<Self, LaneError> {
        let len = expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Build a mask from nested rows. Values are truncated to bytes with any
    /// non-zero value mapped to 255.
    pub fn from_rows<R, T>(rows: &[R]) -> Result<Self, LaneError>
    where
        R: AsRef<[T]>,
        T: Copy + Default + PartialEq,
    {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let len = expected_len(width, height)?;

        let mut data = Vec::with_capacity(len);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(LaneError::RaggedRows {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
            data.extend(
                values
                    .iter()
                    .map(|&v| if v == T::default() { 0u8 } else { 255u8 }),
            );
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn view(&self) -> MaskView<'_> {
        MaskView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Mark every pixel of columns `x0..=x1` in rows `y0..height` as foreground.
    pub fn fill_columns(&mut self, x0: usize, x1: usize, y0: usize) {
        let x1 = x1.min(self.width.saturating_sub(1));
        for y in y0..self.height {
            let row = &mut self.data[y * self.width..(y + 1) * self.width];
            for px in row.iter_mut().take(x1 + 1).skip(x0) {
                *px = 255;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            MaskView::new(0, 4, &[]).unwrap_err(),
            LaneError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn rejects_short_buffer() {
        let data = [0u8; 5];
        assert_eq!(
            MaskView::new(3, 2, &data).unwrap_err(),
            LaneError::InvalidBuffer {
                expected: 6,
                got: 5
            }
        );
    }

    #[test]
    fn from_rows_detects_ragged_input() {
        let rows = vec![vec![0i32, 255, 0], vec![0, 255]];
        assert_eq!(
            Mask::from_rows(&rows).unwrap_err(),
            LaneError::RaggedRows {
                row: 1,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn from_rows_binarizes_non_zero_values() {
        let rows = vec![vec![0i32, 1, 300], vec![-4, 0, 0]];
        let mask = Mask::from_rows(&rows).expect("valid rows");
        assert_eq!(mask.data, vec![0, 255, 255, 255, 0, 0]);
    }

    #[test]
    fn fill_columns_clamps_to_width() {
        let mut mask = Mask::zeros(4, 2).unwrap();
        mask.fill_columns(2, 10, 1);
        assert_eq!(mask.data, vec![0, 0, 0, 0, 0, 0, 255, 255]);
    }
}
