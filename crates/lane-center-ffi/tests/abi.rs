use lane_center::io::synthetic_two_band;
use lane_center_ffi::{
    lane_center_calculate, lane_center_detect, lane_center_result_empty, LaneCenterResult,
};

#[test]
fn legacy_entry_point_on_synthetic_frame() {
    let mask = synthetic_two_band(320, 240).unwrap();
    let ints: Vec<i32> = mask.data.iter().map(|&v| i32::from(v)).collect();
    let mut result = [0i32; 2];

    let found = unsafe { lane_center_calculate(ints.as_ptr(), 320, 240, result.as_mut_ptr()) };
    assert_eq!(found, 1);
    assert_eq!(result, [157, 120]);
}

#[test]
fn byte_entry_point_fills_bounds() {
    let mask = synthetic_two_band(320, 240).unwrap();
    let mut out = lane_center_result_empty();

    let found = unsafe { lane_center_detect(mask.data.as_ptr(), 320, 240, &mut out) };
    assert_eq!(found, 1);
    assert_eq!(
        out,
        LaneCenterResult {
            center_x: 157,
            center_y: 120,
            left_bound: 71,
            right_bound: 243,
            detected: 1,
        }
    );
}

#[test]
fn empty_frame_writes_sentinels() {
    let ints = vec![0i32; 64 * 48];
    let mut result = [7i32; 2];
    let found = unsafe { lane_center_calculate(ints.as_ptr(), 64, 48, result.as_mut_ptr()) };
    assert_eq!(found, 0);
    assert_eq!(result, [-1, -1]);
}

#[test]
fn invalid_arguments_are_rejected() {
    let mut result = [7i32; 2];
    let found = unsafe { lane_center_calculate(std::ptr::null(), 10, 10, result.as_mut_ptr()) };
    assert_eq!((found, result), (0, [-1, -1]));

    let ints = [0i32; 4];
    let found = unsafe { lane_center_calculate(ints.as_ptr(), -2, 2, result.as_mut_ptr()) };
    assert_eq!((found, result), (0, [-1, -1]));

    assert_eq!(
        unsafe { lane_center_calculate(ints.as_ptr(), 2, 2, std::ptr::null_mut()) },
        0
    );

    let mut out = LaneCenterResult {
        center_x: 5,
        center_y: 5,
        left_bound: 5,
        right_bound: 5,
        detected: 1,
    };
    let found = unsafe { lane_center_detect(std::ptr::null(), 4, 4, &mut out) };
    assert_eq!(found, 0);
    assert_eq!(out, lane_center_result_empty());
    assert_eq!(out.center_x, -1);
}
