use lane_center::core::LaneParams;
use lane_center::detect::{self, PreprocessConfig};
use lane_center::io;

#[cfg(feature = "tracing")]
use lane_center::core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    lane_center::core::init_with_verbosity(1)?;

    let img = match std::env::args().nth(1) {
        Some(path) => io::load_image(path)?,
        None => {
            eprintln!("Usage: detect_lane <mask_path>; using the synthetic frame");
            detect::mask_image(&io::synthetic_two_band(320, 240)?.view())
        }
    };

    for (name, params) in [
        ("regions", LaneParams::default()),
        ("edge peaks", LaneParams::edge_peaks()),
        ("fixed split", LaneParams::fixed_split()),
    ] {
        match detect::detect_lane(&img, params, &PreprocessConfig::default())? {
            Some(lane) => println!(
                "{name:>11}: center ({}, {}), bounds [{}, {}] via {:?}",
                lane.center_x, lane.center_y, lane.left_bound, lane.right_bound, lane.center_rule
            ),
            None => println!("{name:>11}: no lane"),
        }
    }

    Ok(())
}
