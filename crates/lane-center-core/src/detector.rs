use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::boundary::{resolve_fixed_split, resolve_peaks, resolve_regions};
use crate::{
    estimate_center, find_peaks, find_regions, BoundaryPair, BoundaryStrategy, ColumnProfile,
    EvidenceSource, LaneDetection, LaneError, LaneParams, Mask, MaskView, Peak, Region,
};

/// Edge extraction stage: turns a cleaned binary mask into an edge mask of
/// the same size, non-zero marking an edge pixel.
pub trait EdgeDetector {
    fn detect_edges(&self, mask: &MaskView<'_>) -> Mask;
}

/// Noise removal stage applied to the raw mask before anything else.
pub trait Denoiser {
    fn denoise(&self, mask: &MaskView<'_>) -> Mask;
}

impl<F> EdgeDetector for F
where
    F: Fn(&MaskView<'_>) -> Mask,
{
    fn detect_edges(&self, mask: &MaskView<'_>) -> Mask {
        self(mask)
    }
}

/// Everything computed for one frame, for debugging and visualisation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaneAnalysis {
    /// Mask the boundary profile was actually built from.
    pub evidence: EvidenceSource,
    pub profile: ColumnProfile,
    pub valid_columns: Vec<usize>,
    pub regions: Vec<Region>,
    pub peaks: Vec<Peak>,
    pub boundaries: BoundaryPair,
    pub detection: Option<LaneDetection>,
}

/// Lane center detector.
///
/// Holds only configuration and the optional preprocessing stages; every call
/// is independent of the previous ones.
pub struct LaneCenterDetector {
    params: LaneParams,
    denoiser: Option<Box<dyn Denoiser + Send + Sync>>,
    edge_detector: Option<Box<dyn EdgeDetector + Send + Sync>>,
}

impl LaneCenterDetector {
    pub fn new(params: LaneParams) -> Self {
        Self {
            params,
            denoiser: None,
            edge_detector: None,
        }
    }

    pub fn with_denoiser(mut self, denoiser: impl Denoiser + Send + Sync + 'static) -> Self {
        self.denoiser = Some(Box::new(denoiser));
        self
    }

    pub fn with_edge_detector(
        mut self,
        edge_detector: impl EdgeDetector + Send + Sync + 'static,
    ) -> Self {
        self.edge_detector = Some(Box::new(edge_detector));
        self
    }

    pub fn params(&self) -> &LaneParams {
        &self.params
    }

    /// Validate the mask, run the configured stages and estimate the lane.
    ///
    /// `Ok(None)` means the frame holds no usable lane evidence.
    pub fn detect(&self, mask: &MaskView<'_>) -> Result<Option<LaneDetection>, LaneError> {
        Ok(self.analyze(mask)?.detection)
    }

    /// Like [`detect`](Self::detect) but returns all intermediate results.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, mask), fields(width = mask.width, height = mask.height))
    )]
    pub fn analyze(&self, mask: &MaskView<'_>) -> Result<LaneAnalysis, LaneError> {
        mask.validate()?;

        let cleaned = self
            .denoiser
            .as_ref()
            .map(|d| d.denoise(mask))
            .filter(|m| {
                let same = m.width == mask.width && m.height == mask.height;
                if !same {
                    warn!("denoiser changed the mask size; using the raw mask");
                }
                same
            });
        let cleaned_view = cleaned.as_ref().map(Mask::view).unwrap_or(*mask);

        let edges = match (self.params.evidence, &self.edge_detector) {
            (EvidenceSource::Edges, Some(detector)) => Some(detector.detect_edges(&cleaned_view)),
            (EvidenceSource::Edges, None) => {
                debug!("edge evidence requested without an edge detector; using the mask");
                None
            }
            (EvidenceSource::Mask, _) => None,
        };

        Ok(self.analyze_masks(&cleaned_view, edges.as_ref().map(Mask::view).as_ref()))
    }

    /// Estimate the lane from an already cleaned mask and an optional edge mask.
    pub fn detect_from_masks(
        &self,
        cleaned: &MaskView<'_>,
        edges: Option<&MaskView<'_>>,
    ) -> Option<LaneDetection> {
        self.analyze_masks(cleaned, edges).detection
    }

    /// Core of the pipeline: profile, candidates, boundaries, center.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(width = cleaned.width, height = cleaned.height))
    )]
    pub fn analyze_masks(
        &self,
        cleaned: &MaskView<'_>,
        edges: Option<&MaskView<'_>>,
    ) -> LaneAnalysis {
        let params = &self.params;
        if let Err(err) = cleaned.validate() {
            warn!("skipping malformed mask: {err}");
            return LaneAnalysis {
                evidence: EvidenceSource::Mask,
                profile: ColumnProfile {
                    counts: Vec::new(),
                    roi_start: 0,
                },
                valid_columns: Vec::new(),
                regions: Vec::new(),
                peaks: Vec::new(),
                boundaries: BoundaryPair::default(),
                detection: None,
            };
        }
        let mask_profile = ColumnProfile::lower_half(cleaned);

        let edge_profile = match (params.evidence, edges) {
            (EvidenceSource::Edges, Some(e))
                if e.width == cleaned.width
                    && e.height == cleaned.height
                    && e.validate().is_ok() =>
            {
                let profile = ColumnProfile::lower_half(e);
                if profile.valid_columns(params.min_column_pixels).is_empty() {
                    debug!("edge profile empty; falling back to the mask profile");
                    None
                } else {
                    Some(profile)
                }
            }
            (EvidenceSource::Edges, Some(e)) => {
                warn!(
                    "edge mask is {}x{} ({} bytes), frame is {}x{}; ignoring edges",
                    e.width,
                    e.height,
                    e.data.len(),
                    cleaned.width,
                    cleaned.height
                );
                None
            }
            _ => None,
        };

        let (evidence, profile) = match edge_profile {
            Some(p) => (EvidenceSource::Edges, p),
            None => (EvidenceSource::Mask, mask_profile.clone()),
        };

        let valid_columns = profile.valid_columns(params.min_column_pixels);
        let mut analysis = LaneAnalysis {
            evidence,
            profile,
            valid_columns,
            regions: Vec::new(),
            peaks: Vec::new(),
            boundaries: BoundaryPair::default(),
            detection: None,
        };

        if analysis.valid_columns.is_empty() {
            debug!("no valid columns in the region of interest");
            return analysis;
        }

        analysis.boundaries = match params.strategy {
            BoundaryStrategy::Regions => {
                analysis.regions = find_regions(&analysis.valid_columns, params.max_gap);
                resolve_regions(&analysis.regions, &analysis.profile, params)
            }
            BoundaryStrategy::Peaks => {
                analysis.peaks = find_peaks(&analysis.profile, params.min_peak_value);
                resolve_peaks(&analysis.peaks, &analysis.profile, params)
            }
            BoundaryStrategy::FixedSplit => resolve_fixed_split(&analysis.profile, params),
        };

        let width = cleaned.width;
        let Some(bounds) = analysis.boundaries.bounds(width, &analysis.valid_columns) else {
            return analysis;
        };
        let Some((center_x, center_rule)) = estimate_center(
            &analysis.boundaries,
            &analysis.valid_columns,
            &mask_profile,
            params,
        ) else {
            return analysis;
        };

        debug!(
            "lane center {center_x} via {center_rule:?}, bounds [{}, {}]",
            bounds.left, bounds.right
        );
        analysis.detection = Some(LaneDetection {
            center_x: center_x.min(width - 1),
            center_y: cleaned.height / 2,
            left_bound: bounds.left,
            right_bound: bounds.right,
            left_source: bounds.left_source,
            right_source: bounds.right_source,
            center_rule,
        });
        analysis
    }
}

/// Estimate the lane in a raw row-major mask using the cleaned-mask profile
/// only (no denoising, no edge stage).
pub fn compute_lane_center(
    data: &[u8],
    width: usize,
    height: usize,
    params: &LaneParams,
) -> Result<Option<LaneDetection>, LaneError> {
    let mask = MaskView::new(width, height, data)?;
    LaneCenterDetector::new(params.clone()).detect(&mask)
}
