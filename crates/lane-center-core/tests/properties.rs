use lane_center_core::{
    compute_lane_center, BoundSource, BoundaryStrategy, CenterRule, LaneCenterDetector,
    LaneDetection, LaneParams, LaneReport, Mask,
};

const W: usize = 320;
const H: usize = 240;

fn frame(bands: &[(usize, usize)]) -> Mask {
    let mut mask = Mask::zeros(W, H).expect("mask");
    for &(x0, x1) in bands {
        mask.fill_columns(x0, x1, 0);
    }
    mask
}

fn detect(mask: &Mask) -> Option<LaneDetection> {
    LaneCenterDetector::new(LaneParams::default())
        .detect(&mask.view())
        .expect("valid mask")
}

#[test]
fn empty_frame_reports_sentinel() {
    let mask = frame(&[]);
    let report = LaneReport::from(detect(&mask));
    assert!(!report.detected);
    assert_eq!(report.center_pair(), [-1, -1]);
}

#[test]
fn two_bands_center_on_their_midpoint() {
    let lane = detect(&frame(&[(64, 80), (240, 256)])).expect("lane");
    assert_eq!(lane.left_bound, 72);
    assert_eq!(lane.right_bound, 248);
    assert_eq!(lane.center_x, 160);
    assert_eq!(lane.center_y, 120);
}

#[test]
fn shifting_pattern_shifts_center() {
    let base = detect(&frame(&[(40, 50), (200, 210)])).expect("lane");
    for k in [1usize, 7, 30, 90] {
        let shifted = detect(&frame(&[(40 + k, 50 + k), (200 + k, 210 + k)])).expect("lane");
        assert_eq!(shifted.center_x, base.center_x + k, "shift {k}");
    }
}

#[test]
fn narrow_left_band_stays_left_of_wide_band() {
    let lane = detect(&frame(&[(30, 33), (150, 230)])).expect("lane");
    assert_eq!(lane.left_bound, 31);
    assert_eq!(lane.right_bound, 190);
    assert!(lane.left_bound < lane.right_bound);
}

#[test]
fn single_left_band_estimates_right_bound() {
    let lane = detect(&frame(&[(20, 40)])).expect("lane");
    assert_eq!(lane.left_bound, 30);
    assert_eq!(lane.right_bound, 30 + W / 3);
    assert_eq!(lane.left_source, BoundSource::Evidence);
    assert_eq!(lane.right_source, BoundSource::Estimated);
    assert_eq!(lane.center_rule, CenterRule::LeftOnly);
}

#[test]
fn single_right_band_estimates_left_bound() {
    let lane = detect(&frame(&[(240, 256)])).expect("lane");
    assert_eq!(lane.right_bound, 248);
    assert_eq!(lane.left_bound, 248 - W / 3);
    assert_eq!(lane.center_x, (142 + 248) / 2);
    assert_eq!(lane.center_y, 120);
}

#[test]
fn band_at_right_border_is_clamped() {
    let lane = detect(&frame(&[(300, 319)])).expect("lane");
    assert_eq!(lane.right_bound, 309);
    assert!(lane.left_bound <= lane.right_bound);
    assert!(lane.center_x < W);
}

#[test]
fn repeated_calls_are_identical() {
    let mask = frame(&[(64, 80), (240, 256)]);
    let detector = LaneCenterDetector::new(LaneParams::default());
    let a = detector.detect(&mask.view()).unwrap();
    let b = detector.detect(&mask.view()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn region_and_split_strategies_agree_on_clean_frame() {
    let mask = frame(&[(64, 80), (240, 256)]);
    for strategy in [BoundaryStrategy::Regions, BoundaryStrategy::FixedSplit] {
        let params = LaneParams {
            strategy,
            ..LaneParams::default()
        };
        let lane = compute_lane_center(&mask.data, W, H, &params)
            .unwrap()
            .expect("lane");
        assert!(lane.left_bound >= 64 && lane.left_bound <= 80, "{strategy:?}");
        assert!(lane.right_bound >= 240 && lane.right_bound <= 256, "{strategy:?}");
    }
}

#[test]
fn detector_is_shareable_across_threads() {
    let detector = std::sync::Arc::new(LaneCenterDetector::new(LaneParams::default()));
    let handles: Vec<_> = (0..4usize)
        .map(|k| {
            let detector = detector.clone();
            std::thread::spawn(move || {
                let mask = frame(&[(40 + k, 50 + k), (200 + k, 210 + k)]);
                detector.detect(&mask.view()).unwrap().map(|d| d.center_x)
            })
        })
        .collect();
    let centers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(centers, vec![Some(125), Some(126), Some(127), Some(128)]);
}

#[test]
fn ragged_rows_are_rejected() {
    let rows = vec![vec![0u8; 8], vec![0u8; 7]];
    assert!(Mask::from_rows(&rows).is_err());
}
