//! Grouping of profile columns into regions and peaks.
//!
//! Both extractors are pure functions of the profile. An empty result means
//! "no evidence" and is never an error.

use serde::{Deserialize, Serialize};

use crate::ColumnProfile;

/// Maximal run of valid columns where consecutive members are at most
/// `max_gap` columns apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Valid columns belonging to the region, ascending.
    pub columns: Vec<usize>,
}

impl Region {
    pub fn start(&self) -> usize {
        self.columns[0]
    }

    pub fn end(&self) -> usize {
        self.columns[self.columns.len() - 1]
    }

    /// Number of valid columns in the region.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Midpoint between the first and last column.
    pub fn center(&self) -> usize {
        (self.start() + self.end()) / 2
    }
}

/// Strict local maximum of the column profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peak {
    pub x: usize,
    pub value: u32,
}

/// Group ascending `valid_columns` into regions.
pub fn find_regions(valid_columns: &[usize], max_gap: usize) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    for &x in valid_columns {
        if let Some(&prev) = current.last() {
            if x - prev > max_gap {
                regions.push(Region {
                    columns: std::mem::take(&mut current),
                });
            }
        }
        current.push(x);
    }
    if !current.is_empty() {
        regions.push(Region { columns: current });
    }

    regions
}

/// Regions of columns with at least `min_pixels` counts.
pub fn regions_from_profile(
    profile: &ColumnProfile,
    min_pixels: u32,
    max_gap: usize,
) -> Vec<Region> {
    find_regions(&profile.valid_columns(min_pixels), max_gap)
}

/// Strict interior local maxima with value `>= min_value`.
///
/// Plateaus produce no interior peak; when nothing qualifies the global
/// maximum is returned instead, provided it clears `min_value`.
pub fn find_peaks(profile: &ColumnProfile, min_value: u32) -> Vec<Peak> {
    let counts = &profile.counts;
    let min_value = min_value.max(1);

    let mut peaks: Vec<Peak> = counts
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] >= min_value && w[1] > w[0] && w[1] > w[2])
        .map(|(i, w)| Peak {
            x: i + 1,
            value: w[1],
        })
        .collect();

    if peaks.is_empty() {
        if let Some((x, value)) = profile.argmax(0..counts.len()) {
            if value >= min_value {
                peaks.push(Peak { x, value });
            }
        }
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(counts: &[u32]) -> ColumnProfile {
        ColumnProfile {
            counts: counts.to_vec(),
            roi_start: 0,
        }
    }

    #[test]
    fn merges_columns_within_gap() {
        let regions = find_regions(&[2, 3, 6, 10, 11, 30], 3);
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].columns, vec![2, 3, 6]);
        assert_eq!(regions[1].columns, vec![10, 11]);
        assert_eq!(regions[2].start(), 30);
        assert_eq!(regions[0].center(), 4);
    }

    #[test]
    fn no_columns_no_regions() {
        assert!(find_regions(&[], 3).is_empty());
        assert!(regions_from_profile(&profile(&[0, 1, 0]), 2, 3).is_empty());
    }

    #[test]
    fn finds_strict_interior_maxima() {
        let peaks = find_peaks(&profile(&[9, 1, 5, 2, 2, 7, 3, 8]), 2);
        // Border columns are never interior peaks.
        assert_eq!(
            peaks,
            vec![Peak { x: 2, value: 5 }, Peak { x: 5, value: 7 }]
        );
    }

    #[test]
    fn plateau_falls_back_to_global_maximum() {
        let peaks = find_peaks(&profile(&[0, 4, 4, 4, 0]), 2);
        assert_eq!(peaks, vec![Peak { x: 1, value: 4 }]);
    }

    #[test]
    fn weak_profile_yields_no_peak() {
        assert!(find_peaks(&profile(&[0, 1, 0]), 2).is_empty());
        assert!(find_peaks(&profile(&[]), 2).is_empty());
    }
}
