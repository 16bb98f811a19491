use serde::{Deserialize, Serialize};

use crate::{BoundSource, CenterRule};

/// Sentinel reported for every coordinate when no lane is detected.
pub const NOT_DETECTED: i32 = -1;

/// A detected lane: the steering target and the boundaries behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDetection {
    pub center_x: usize,
    /// Always the middle row of the frame.
    pub center_y: usize,
    pub left_bound: usize,
    pub right_bound: usize,
    pub left_source: BoundSource,
    pub right_source: BoundSource,
    pub center_rule: CenterRule,
}

/// Flat report with `-1` sentinels, as consumed by steering controllers.
///
/// A controller receiving `detected == false` should hold its previous
/// heading rather than steer towards column `-1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneReport {
    pub center_x: i32,
    pub center_y: i32,
    pub left_bound: i32,
    pub right_bound: i32,
    pub detected: bool,
}

impl LaneReport {
    pub const NOT_DETECTED: LaneReport = LaneReport {
        center_x: NOT_DETECTED,
        center_y: NOT_DETECTED,
        left_bound: NOT_DETECTED,
        right_bound: NOT_DETECTED,
        detected: false,
    };

    /// `[center_x, center_y]`, the pair written by the legacy C entry point.
    pub fn center_pair(&self) -> [i32; 2] {
        [self.center_x, self.center_y]
    }
}

fn to_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

impl From<&LaneDetection> for LaneReport {
    fn from(d: &LaneDetection) -> Self {
        Self {
            center_x: to_i32(d.center_x),
            center_y: to_i32(d.center_y),
            left_bound: to_i32(d.left_bound),
            right_bound: to_i32(d.right_bound),
            detected: true,
        }
    }
}

impl From<Option<&LaneDetection>> for LaneReport {
    fn from(d: Option<&LaneDetection>) -> Self {
        d.map(LaneReport::from).unwrap_or(LaneReport::NOT_DETECTED)
    }
}

impl From<Option<LaneDetection>> for LaneReport {
    fn from(d: Option<LaneDetection>) -> Self {
        LaneReport::from(d.as_ref())
    }
}
