//! Mask ingestion: image files, whitespace-separated text grids and
//! synthetic test frames.

use std::fmt::Write as _;
use std::path::Path;

use ::image::{GrayImage, ImageReader, Luma};

use crate::core::{LaneError, Mask, MaskView};
use crate::detect::mask_image;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid pixel value {token:?}")]
    Parse { line: usize, token: String },

    #[error(transparent)]
    Mask(#[from] LaneError),
}

/// Decode any image format supported by `image` into 8-bit grayscale.
pub fn load_image(path: impl AsRef<Path>) -> Result<GrayImage, LoadError> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// Threshold a grayscale frame into a 0/255 mask.
///
/// With `invert` set, pixels darker than `threshold` become foreground
/// (dark tape on a bright floor).
pub fn binarize(img: &GrayImage, threshold: u8, invert: bool) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let above = img.get_pixel(x, y)[0] > threshold;
        Luma([if above != invert { 255 } else { 0 }])
    })
}

/// Parse a text grid: one row per line, pixel values separated by
/// whitespace. Leading blank lines are skipped and the first blank line
/// after the data ends the grid.
pub fn parse_text_mask(text: &str) -> Result<Mask, LoadError> {
    let mut rows: Vec<Vec<i64>> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if rows.is_empty() {
                continue;
            }
            break;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i64>().map_err(|_| LoadError::Parse {
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(Mask::from_rows(&rows)?)
}

pub fn load_text_mask(path: impl AsRef<Path>) -> Result<Mask, LoadError> {
    parse_text_mask(&std::fs::read_to_string(path)?)
}

/// Serialise a mask in the text grid format, foreground as `255`.
pub fn format_text_mask(mask: &MaskView<'_>) -> String {
    let mut out = String::with_capacity(mask.data.len() * 2);
    for row in mask.data.chunks(mask.width.max(1)) {
        for (x, &v) in row.iter().enumerate() {
            if x > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", if v != 0 { 255 } else { 0 });
        }
        out.push('\n');
    }
    out
}

/// Write a mask as an image (format from the extension) or, for `.txt`,
/// as a text grid.
pub fn save_mask(mask: &MaskView<'_>, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    if is_text_path(path) {
        std::fs::write(path, format_text_mask(mask))?;
    } else {
        mask_image(mask).save(path)?;
    }
    Ok(())
}

/// `true` for paths with a `.txt` extension.
pub fn is_text_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Two vertical bands: the left one spans 20-25 % of the width, the right
/// one 75-80 %, with the right band half as wide below the middle row.
pub fn synthetic_two_band(width: usize, height: usize) -> Result<Mask, LaneError> {
    let mut mask = Mask::zeros(width, height)?;
    let left = (width / 5, width / 4);
    let right_start = width * 3 / 4;
    let right_width = width * 4 / 5 - right_start;

    for y in 0..height {
        let right_width = if y > height / 2 {
            right_width / 2
        } else {
            right_width
        };
        let row = &mut mask.data[y * width..(y + 1) * width];
        for px in &mut row[left.0..left.1] {
            *px = 255;
        }
        for px in &mut row[right_start..right_start + right_width] {
            *px = 255;
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_grid() {
        let mask = parse_text_mask("\n0 1 0\n255 0 0\n\nignored\n").unwrap();
        assert_eq!((mask.width, mask.height), (3, 2));
        assert_eq!(mask.data, vec![0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn reports_bad_tokens_and_ragged_rows() {
        match parse_text_mask("0 0\n0 x\n") {
            Err(LoadError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_text_mask("0 0\n0\n"),
            Err(LoadError::Mask(LaneError::RaggedRows { row: 1, .. }))
        ));
        assert!(matches!(
            parse_text_mask(""),
            Err(LoadError::Mask(LaneError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn text_format_round_trips() {
        let mask = synthetic_two_band(20, 6).unwrap();
        let back = parse_text_mask(&format_text_mask(&mask.view())).unwrap();
        assert_eq!(back, mask);
    }

    #[test]
    fn synthetic_bands_match_layout() {
        let mask = synthetic_two_band(320, 240).unwrap();
        let view = mask.view();
        assert!(view.is_foreground(64, 0) && view.is_foreground(79, 239));
        assert!(!view.is_foreground(80, 0));
        assert!(view.is_foreground(255, 120));
        assert!(!view.is_foreground(255, 121));
        assert!(view.is_foreground(247, 239));
        assert!(!view.is_foreground(248, 239));
    }

    #[test]
    fn binarize_inverts_dark_lines() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([if x < 2 { 20 } else { 200 }]));
        let out = binarize(&img, 70, true);
        assert_eq!(out.as_raw(), &vec![255, 255, 0, 0]);
        assert_eq!(binarize(&img, 70, false).as_raw(), &vec![0, 0, 255, 255]);
    }
}
