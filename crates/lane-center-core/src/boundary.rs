//! Selection and left/right labeling of lane boundaries.
//!
//! Candidates (regions or peaks) are scored, the best one is paired with the
//! best candidate lying at least `min_separation` columns away, and the pair is
//! labeled by position only. A lone candidate is assigned to a side by the
//! density imbalance around it, falling back to its position in the frame.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{ColumnProfile, LaneParams, Peak, Region};

/// Side of the lane a boundary belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// How a reported bound was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundSource {
    /// Resolved from a region or peak.
    Evidence,
    /// Extrapolated one third of the frame away from the opposite bound.
    Estimated,
    /// Outermost valid column.
    Extent,
}

/// One resolved lane boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Column reported for this boundary.
    pub column: usize,
    /// Columns whose mean drives the center estimate.
    pub evidence: Vec<usize>,
}

impl Boundary {
    /// Integer mean of the evidence columns.
    pub fn mean_column(&self) -> usize {
        if self.evidence.is_empty() {
            return self.column;
        }
        self.evidence.iter().sum::<usize>() / self.evidence.len()
    }
}

/// Left and right boundaries, either of which may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPair {
    pub left: Option<Boundary>,
    pub right: Option<Boundary>,
}

/// Reported bounds after filling in missing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBounds {
    pub left: usize,
    pub right: usize,
    pub left_source: BoundSource,
    pub right_source: BoundSource,
}

/// Scored boundary candidate built from either a region or a peak.
#[derive(Clone, Debug)]
struct Candidate {
    column: usize,
    start: usize,
    end: usize,
    score: u32,
    evidence: Vec<usize>,
}

impl Candidate {
    fn from_region(region: &Region, min_span_for_midpoint: usize) -> Self {
        let column = if region.len() >= min_span_for_midpoint {
            region.center()
        } else {
            region.start()
        };
        Self {
            column,
            start: region.start(),
            end: region.end(),
            score: region.len() as u32,
            evidence: region.columns.clone(),
        }
    }

    fn from_peak(peak: &Peak) -> Self {
        Self {
            column: peak.x,
            start: peak.x,
            end: peak.x,
            score: peak.value,
            evidence: vec![peak.x],
        }
    }

    fn into_boundary(self) -> Boundary {
        Boundary {
            column: self.column,
            evidence: self.evidence,
        }
    }
}

/// Resolve boundaries from regions, scored by width.
pub fn resolve_regions(
    regions: &[Region],
    profile: &ColumnProfile,
    params: &LaneParams,
) -> BoundaryPair {
    let candidates: Vec<Candidate> = regions
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| Candidate::from_region(r, params.min_region_span_for_midpoint))
        .collect();
    resolve_candidates(candidates, profile, params)
}

/// Resolve boundaries from peaks, scored by height.
pub fn resolve_peaks(peaks: &[Peak], profile: &ColumnProfile, params: &LaneParams) -> BoundaryPair {
    let candidates: Vec<Candidate> = peaks.iter().map(Candidate::from_peak).collect();
    resolve_candidates(candidates, profile, params)
}

/// Strongest column in each half of the frame.
pub fn resolve_fixed_split(profile: &ColumnProfile, params: &LaneParams) -> BoundaryPair {
    let width = profile.width();
    let mid = width / 2;
    let min_pixels = params.min_column_pixels.max(1);
    let pick = |range: std::ops::Range<usize>| {
        profile
            .argmax(range)
            .filter(|&(_, v)| v >= min_pixels)
            .map(|(x, _)| Boundary {
                column: x,
                evidence: vec![x],
            })
    };
    BoundaryPair {
        left: pick(0..mid),
        right: pick(mid..width),
    }
}

fn resolve_candidates(
    candidates: Vec<Candidate>,
    profile: &ColumnProfile,
    params: &LaneParams,
) -> BoundaryPair {
    let (first, second) = select_pair(&candidates, params.min_separation);
    let Some(first) = first else {
        return BoundaryPair::default();
    };

    if let Some(second) = second {
        let (a, b) = (&candidates[first], &candidates[second]);
        let (left, right) = if a.column <= b.column { (a, b) } else { (b, a) };
        debug!(
            "boundary pair: left={} (score {}), right={} (score {})",
            left.column, left.score, right.column, right.score
        );
        return BoundaryPair {
            left: Some(left.clone().into_boundary()),
            right: Some(right.clone().into_boundary()),
        };
    }

    let lone = candidates[first].clone();
    let side = classify_single(&lone, profile, params);
    debug!("single boundary at {} labeled {:?}", lone.column, side);
    match side {
        Side::Left => BoundaryPair {
            left: Some(lone.into_boundary()),
            right: None,
        },
        Side::Right => BoundaryPair {
            left: None,
            right: Some(lone.into_boundary()),
        },
    }
}

/// Index of the highest-scoring candidate, and of the highest-scoring one at
/// least `min_separation` columns away from it. Ties keep the leftmost.
fn select_pair(candidates: &[Candidate], min_separation: usize) -> (Option<usize>, Option<usize>) {
    let mut best1: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if best1.is_none_or(|b| c.score > candidates[b].score) {
            best1 = Some(i);
        }
    }
    let Some(b1) = best1 else {
        return (None, None);
    };

    let anchor = candidates[b1].column;
    let mut best2: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if i == b1 || c.column.abs_diff(anchor) < min_separation {
            continue;
        }
        if best2.is_none_or(|b| c.score > candidates[b].score) {
            best2 = Some(i);
        }
    }

    (best1, best2)
}

/// Decide which side a lone candidate bounds.
///
/// Heavy evidence on one side means the candidate is the far edge, so it is
/// labeled as the opposite side. Otherwise the left and right thirds of the
/// frame decide, and the middle third defaults to left.
fn classify_single(candidate: &Candidate, profile: &ColumnProfile, params: &LaneParams) -> Side {
    let width = profile.width();
    let window = params.imbalance_window_for(width);
    let left_sum = profile.sum(candidate.start.saturating_sub(window)..candidate.start);
    let right_sum = profile.sum(candidate.end + 1..candidate.end + 1 + window);
    let min_count = params.imbalance_min_count as u64;

    if left_sum * 2 > right_sum * 3 && left_sum > min_count {
        return Side::Right;
    }
    if right_sum * 2 > left_sum * 3 && right_sum > min_count {
        return Side::Left;
    }

    if candidate.column < width / 3 {
        Side::Left
    } else if candidate.column > width * 2 / 3 {
        Side::Right
    } else {
        Side::Left
    }
}

impl BoundaryPair {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Fill in missing sides and enforce `left <= right`.
    ///
    /// A lone side is mirrored by `width / 3` (clamped to the frame). With no
    /// side at all the outermost valid columns are used; `None` is returned
    /// only when there are no valid columns either.
    pub fn bounds(&self, width: usize, valid_columns: &[usize]) -> Option<ResolvedBounds> {
        let last = width.checked_sub(1)?;
        let third = width / 3;
        let (left, right, left_source, right_source) = match (&self.left, &self.right) {
            (Some(l), Some(r)) => (
                l.column,
                r.column,
                BoundSource::Evidence,
                BoundSource::Evidence,
            ),
            (Some(l), None) => (
                l.column,
                (l.column + third).min(last),
                BoundSource::Evidence,
                BoundSource::Estimated,
            ),
            (None, Some(r)) => (
                r.column.saturating_sub(third),
                r.column,
                BoundSource::Estimated,
                BoundSource::Evidence,
            ),
            (None, None) => (
                *valid_columns.first()?,
                *valid_columns.last()?,
                BoundSource::Extent,
                BoundSource::Extent,
            ),
        };

        let resolved = if left <= right {
            ResolvedBounds {
                left,
                right,
                left_source,
                right_source,
            }
        } else {
            debug!("swapping inverted bounds {left} > {right}");
            ResolvedBounds {
                left: right,
                right: left,
                left_source: right_source,
                right_source: left_source,
            }
        };
        Some(resolved)
    }
}
