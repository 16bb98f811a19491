//! High-level facade crate for the `lane-center-*` workspace.
//!
//! This crate provides:
//! - re-exports of the image-free estimator in `lane-center-core`
//! - (feature-gated) `imageproc`-backed preprocessing stages, `image::GrayImage`
//!   helpers and mask loaders, so a frame on disk can be turned into a lane
//!   center in one call.
//!
//! ## Quickstart
//!
//! ```no_run
//! use lane_center::{detect, io};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = io::load_image("frame.png")?;
//! let lane = detect::detect_lane_default(&img)?;
//! match lane {
//!     Some(lane) => println!("steer towards column {}", lane.center_x),
//!     None => println!("no lane"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `lane_center::core`: masks, column profiles, regions, boundaries, the detector.
//! - `lane_center::detect` (feature `image`): Canny and morphology stages, end-to-end helpers.
//! - `lane_center::io` (feature `image`): image, text-grid and synthetic mask sources.

pub use lane_center_core as core;

pub use lane_center_core::{
    BoundaryStrategy, EvidenceSource, LaneCenterDetector, LaneDetection, LaneError, LaneParams,
    LaneReport, Mask, MaskView,
};

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "image")]
pub mod io;
