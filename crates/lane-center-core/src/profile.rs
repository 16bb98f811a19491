//! Column density profiles over the region of interest.

use serde::{Deserialize, Serialize};

use crate::MaskView;

/// Per-column foreground count over rows `roi_start..height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub counts: Vec<u32>,
    pub roi_start: usize,
}

impl ColumnProfile {
    /// Count foreground pixels of every column in rows `roi_start..height`.
    ///
    /// A `roi_start` past the last row yields an all-zero profile.
    pub fn from_mask(mask: &MaskView<'_>, roi_start: usize) -> Self {
        let mut counts = vec![0u32; mask.width];
        let roi_start = roi_start.min(mask.height);
        for row in mask.data.chunks_exact(mask.width).skip(roi_start) {
            for (count, &px) in counts.iter_mut().zip(row) {
                if px != 0 {
                    *count += 1;
                }
            }
        }
        Self { counts, roi_start }
    }

    /// Profile over the lower half of the mask.
    pub fn lower_half(mask: &MaskView<'_>) -> Self {
        Self::from_mask(mask, mask.roi_start())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn get(&self, x: usize) -> u32 {
        self.counts.get(x).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Columns whose count reaches `min_pixels`, in ascending order.
    pub fn valid_columns(&self, min_pixels: u32) -> Vec<usize> {
        let min_pixels = min_pixels.max(1);
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c >= min_pixels)
            .map(|(x, _)| x)
            .collect()
    }

    /// Sum of counts over `range`, clipped to the profile width.
    pub fn sum(&self, range: std::ops::Range<usize>) -> u64 {
        let end = range.end.min(self.counts.len());
        let start = range.start.min(end);
        self.counts[start..end].iter().map(|&c| c as u64).sum()
    }

    /// Column with the largest count; the leftmost one on ties.
    pub fn argmax(&self, range: std::ops::Range<usize>) -> Option<(usize, u32)> {
        let end = range.end.min(self.counts.len());
        let start = range.start.min(end);
        let mut best: Option<(usize, u32)> = None;
        for (x, &c) in self.counts[start..end].iter().enumerate() {
            if best.is_none_or(|(_, v)| c > v) {
                best = Some((start + x, c));
            }
        }
        best
    }
}
