//! Center column estimation from resolved boundaries.
//!
//! Rules are tried in a fixed order and the first applicable one wins. All
//! arithmetic is integer with truncating division.

use serde::{Deserialize, Serialize};

use crate::{BoundaryPair, ColumnProfile, LaneParams};

/// Rule that produced a center estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterRule {
    /// Mean of both boundaries' evidence.
    BothSides,
    /// Left evidence with the right side extrapolated.
    LeftOnly,
    /// Right evidence with the left side extrapolated.
    RightOnly,
    /// Density-weighted centroid of a few valid columns.
    WeightedCentroid,
    /// Outermost valid columns weighted by their own density.
    WeightedExtent,
    /// Plain midpoint of the outermost known columns.
    Midpoint,
}

/// Estimate the lane center column.
///
/// `weights` is the profile of the cleaned mask; it supplies per-column
/// foreground counts for the density-weighted rules. Returns `None` only when
/// there is neither boundary evidence nor a valid column.
pub fn estimate_center(
    pair: &BoundaryPair,
    valid_columns: &[usize],
    weights: &ColumnProfile,
    params: &LaneParams,
) -> Option<(usize, CenterRule)> {
    let width = weights.width();
    let last = width.checked_sub(1)?;
    let third = width / 3;

    match (&pair.left, &pair.right) {
        (Some(l), Some(r)) => {
            let (la, ra) = (l.mean_column(), r.mean_column());
            if la < ra && ra < width {
                return Some(((la + ra) / 2, CenterRule::BothSides));
            }
        }
        (Some(l), None) => {
            let la = l.mean_column();
            let right = (la + third).min(last);
            return Some(((la + right) / 2, CenterRule::LeftOnly));
        }
        (None, Some(r)) => {
            let ra = r.mean_column();
            let left = ra.saturating_sub(third);
            return Some(((left + ra) / 2, CenterRule::RightOnly));
        }
        (None, None) => {}
    }

    if !valid_columns.is_empty() && valid_columns.len() < params.sparse_column_limit {
        if let Some(center) = weighted_centroid(valid_columns, weights) {
            return Some((center, CenterRule::WeightedCentroid));
        }
    }

    if let (Some(&left), Some(&right)) = (valid_columns.first(), valid_columns.last()) {
        let lw = weights.get(left) as u64;
        let rw = weights.get(right) as u64;
        if lw + rw > 0 {
            let center = (left as u64 * lw + right as u64 * rw) / (lw + rw);
            return Some((center as usize, CenterRule::WeightedExtent));
        }
        return Some(((left + right) / 2, CenterRule::Midpoint));
    }

    // Boundaries in the wrong order with no valid column to fall back on.
    let columns: Vec<usize> = [&pair.left, &pair.right]
        .into_iter()
        .flatten()
        .map(|b| b.column)
        .collect();
    let lo = columns.iter().min()?;
    let hi = columns.iter().max()?;
    Some(((lo + hi) / 2, CenterRule::Midpoint))
}

fn weighted_centroid(columns: &[usize], weights: &ColumnProfile) -> Option<usize> {
    let mut sum = 0u64;
    let mut total = 0u64;
    for &x in columns {
        let w = weights.get(x) as u64;
        sum += x as u64 * w;
        total += w;
    }
    (total > 0).then(|| (sum / total) as usize)
}
