//! Lane center estimation from binary top-down masks.
//!
//! The core reduces the lower half of a mask to a per-column density profile,
//! groups dense columns into regions (or peaks), picks and labels the two lane
//! boundaries, and turns them into a single steering column through a chain of
//! fallbacks that degrades gracefully when only one side, or only scattered
//! evidence, is visible.
//!
//! This crate does not depend on any image library. Edge extraction and
//! morphological cleanup plug in through the [`EdgeDetector`] and
//! [`Denoiser`] traits; the `lane-center` crate provides implementations.
//!
//! ## Quickstart
//!
//! ```
//! use lane_center_core::{LaneCenterDetector, LaneParams, Mask};
//!
//! let mut mask = Mask::zeros(320, 240).unwrap();
//! mask.fill_columns(64, 80, 0);
//! mask.fill_columns(240, 256, 0);
//!
//! let detector = LaneCenterDetector::new(LaneParams::default());
//! let lane = detector.detect(&mask.view()).unwrap().expect("lane");
//! assert_eq!(lane.center_x, 160);
//! ```

mod boundary;
mod center;
mod detector;
mod error;
mod logger;
mod mask;
mod params;
mod profile;
mod regions;
mod result;

pub use boundary::{
    resolve_fixed_split, resolve_peaks, resolve_regions, BoundSource, Boundary, BoundaryPair,
    ResolvedBounds, Side,
};
pub use center::{estimate_center, CenterRule};
pub use detector::{compute_lane_center, Denoiser, EdgeDetector, LaneAnalysis, LaneCenterDetector};
pub use error::LaneError;
pub use mask::{Mask, MaskView};
pub use params::{BoundaryStrategy, EvidenceSource, LaneParams};
pub use profile::ColumnProfile;
pub use regions::{find_peaks, find_regions, regions_from_profile, Peak, Region};
pub use result::{LaneDetection, LaneReport, NOT_DETECTED};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, init_with_verbosity, level_from_verbosity};
