use serde::{Deserialize, Serialize};

/// How lane-boundary candidates are extracted from the column profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    /// Contiguous runs of valid columns, scored by their width.
    #[default]
    Regions,
    /// Strict local maxima of the profile, scored by their height.
    Peaks,
    /// Strongest column in each half of the frame.
    FixedSplit,
}

/// Which mask the column profile is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// The cleaned binary mask.
    #[default]
    Mask,
    /// The edge mask; falls back to the cleaned mask when it has no valid column.
    Edges,
}

/// Parameters of the lane center detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneParams {
    pub strategy: BoundaryStrategy,
    pub evidence: EvidenceSource,

    /// Minimal number of foreground pixels in the region of interest for a
    /// column to count as valid.
    pub min_column_pixels: u32,

    /// Largest step between consecutive valid columns of one region.
    pub max_gap: usize,

    /// Minimal profile value of a peak.
    pub min_peak_value: u32,

    /// Minimal distance (columns) between the two boundary candidates.
    pub min_separation: usize,

    /// Columns on each side of a lone candidate inspected by the density
    /// imbalance test. `None` uses `min(20, width / 4)`.
    pub imbalance_window: Option<usize>,

    /// The dominant side must exceed this count for the imbalance test to fire.
    pub imbalance_min_count: u32,

    /// Regions at least this wide are represented by their midpoint.
    pub min_region_span_for_midpoint: usize,

    /// Below this many valid columns the center falls back to a
    /// density-weighted centroid.
    pub sparse_column_limit: usize,
}

impl Default for LaneParams {
    fn default() -> Self {
        Self {
            strategy: BoundaryStrategy::Regions,
            evidence: EvidenceSource::Mask,
            min_column_pixels: 2,
            max_gap: 3,
            min_peak_value: 2,
            min_separation: 20,
            imbalance_window: None,
            imbalance_min_count: 3,
            min_region_span_for_midpoint: 3,
            sparse_column_limit: 10,
        }
    }
}

impl LaneParams {
    /// Peak picking on the edge profile.
    pub fn edge_peaks() -> Self {
        Self {
            strategy: BoundaryStrategy::Peaks,
            evidence: EvidenceSource::Edges,
            min_separation: 15,
            ..Self::default()
        }
    }

    /// Strongest column per frame half. Kept for comparison with older tuning.
    pub fn fixed_split() -> Self {
        Self {
            strategy: BoundaryStrategy::FixedSplit,
            ..Self::default()
        }
    }

    /// Effective imbalance window for a frame of the given width.
    pub fn imbalance_window_for(&self, width: usize) -> usize {
        self.imbalance_window.unwrap_or_else(|| 20.min(width / 4))
    }
}
