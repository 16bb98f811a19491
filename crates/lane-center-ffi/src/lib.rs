//! C ABI for lane center estimation.
//!
//! Both entry points run the default pipeline (3x3 open/close cleanup,
//! Canny collaborator, default [`LaneParams`](lane_center::LaneParams)) and
//! never unwind across the boundary: invalid input or an internal fault is
//! reported as "not detected" with every coordinate set to `-1`.

use std::panic::catch_unwind;

use lane_center::core::{LaneReport, NOT_DETECTED};
use lane_center::detect;

/// Lane estimate for one frame. Coordinates are `-1` when `detected == 0`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneCenterResult {
    pub center_x: i32,
    pub center_y: i32,
    pub left_bound: i32,
    pub right_bound: i32,
    pub detected: i32,
}

impl From<LaneReport> for LaneCenterResult {
    fn from(r: LaneReport) -> Self {
        Self {
            center_x: r.center_x,
            center_y: r.center_y,
            left_bound: r.left_bound,
            right_bound: r.right_bound,
            detected: i32::from(r.detected),
        }
    }
}

fn pixel_count(width: usize, height: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    width.checked_mul(height)
}

fn run(width: u32, height: u32, pixels: &[u8]) -> LaneReport {
    let outcome = catch_unwind(|| detect::compute_lane_center(width, height, pixels));
    match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => {
            log::warn!("lane detection rejected input: {err}");
            LaneReport::NOT_DETECTED
        }
        Err(_) => {
            log::error!("lane detection panicked");
            LaneReport::NOT_DETECTED
        }
    }
}

/// Legacy entry point: one `int` per pixel, row-major, non-zero is lane.
///
/// Writes `[center_x, center_y]` to `result` (or `[-1, -1]`) and returns 1
/// when a lane was found, 0 otherwise.
///
/// # Safety
/// `image_data` must point to `width * height` readable `int`s and `result`
/// to two writable `int`s.
#[no_mangle]
pub unsafe extern "C" fn lane_center_calculate(
    image_data: *const i32,
    width: i32,
    height: i32,
    result: *mut i32,
) -> i32 {
    if result.is_null() {
        return 0;
    }
    let out = unsafe { std::slice::from_raw_parts_mut(result, 2) };
    out.copy_from_slice(&[NOT_DETECTED, NOT_DETECTED]);

    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return 0;
    };
    let Some(len) = pixel_count(w as usize, h as usize) else {
        return 0;
    };
    if image_data.is_null() {
        return 0;
    }

    let values = unsafe { std::slice::from_raw_parts(image_data, len) };
    let pixels: Vec<u8> = values.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect();
    let report = run(w, h, &pixels);
    out.copy_from_slice(&report.center_pair());
    i32::from(report.detected)
}

/// Byte-mask entry point filling every field of [`LaneCenterResult`].
///
/// Returns 1 when a lane was found, 0 otherwise (including invalid input).
///
/// # Safety
/// `data` must point to `width * height` readable bytes and `out` to a
/// writable `LaneCenterResult`.
#[no_mangle]
pub unsafe extern "C" fn lane_center_detect(
    data: *const u8,
    width: u32,
    height: u32,
    out: *mut LaneCenterResult,
) -> i32 {
    if out.is_null() {
        return 0;
    }
    let mut report = LaneReport::NOT_DETECTED;
    if !data.is_null() {
        if let Some(len) = pixel_count(width as usize, height as usize) {
            let pixels = unsafe { std::slice::from_raw_parts(data, len) };
            report = run(width, height, pixels);
        }
    }
    unsafe { out.write(LaneCenterResult::from(report)) };
    i32::from(report.detected)
}

/// `LaneCenterResult` in the "not detected" state, for initialising buffers.
#[no_mangle]
pub extern "C" fn lane_center_result_empty() -> LaneCenterResult {
    LaneCenterResult::from(LaneReport::NOT_DETECTED)
}
