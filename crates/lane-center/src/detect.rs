use crate::core::{
    Denoiser, EdgeDetector, LaneAnalysis, LaneCenterDetector, LaneDetection, LaneError,
    LaneParams, LaneReport, Mask, MaskView,
};
use ::image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidGrayBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidGrayDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Lane(#[from] LaneError),
}

/// Hysteresis thresholds for the Canny stage.
///
/// A `None` threshold is derived from the mean intensity of the cleaned mask:
/// `low = max(30, 0.3 * mean)`, `high = min(200, 1.5 * mean)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: Option<f32>,
    pub high_threshold: Option<f32>,
}

impl CannyParams {
    pub fn fixed(low: f32, high: f32) -> Self {
        Self {
            low_threshold: Some(low),
            high_threshold: Some(high),
        }
    }

    /// Resolve `(low, high)` for an image with the given mean intensity.
    /// `high` is never below `low`.
    pub fn thresholds(&self, mean: f32) -> (f32, f32) {
        let low = self
            .low_threshold
            .unwrap_or_else(|| (0.3 * mean).floor().max(30.0));
        let high = self
            .high_threshold
            .unwrap_or_else(|| (1.5 * mean).floor().min(200.0));
        (low, high.max(low))
    }
}

/// Preprocessing applied before the lane estimator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// 3x3 morphological opening followed by closing.
    pub denoise: bool,
    pub canny: CannyParams,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            denoise: true,
            canny: CannyParams::default(),
        }
    }
}

/// Canny edge detector backed by `imageproc`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CannyEdges {
    pub params: CannyParams,
}

impl EdgeDetector for CannyEdges {
    fn detect_edges(&self, mask: &MaskView<'_>) -> Mask {
        let img = mask_image(mask);
        let (low, high) = self.params.thresholds(image_mean(&img));
        log::debug!("canny thresholds low={low} high={high}");
        mask_from_image(imageproc::edges::canny(&img, low, high))
    }
}

/// Morphological open-then-close with a square structuring element of
/// side `2 * radius + 1`.
#[derive(Clone, Copy, Debug)]
pub struct MorphologyDenoise {
    pub radius: u8,
}

impl Default for MorphologyDenoise {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

impl Denoiser for MorphologyDenoise {
    fn denoise(&self, mask: &MaskView<'_>) -> Mask {
        let img = mask_image(mask);
        let opened = imageproc::morphology::open(&img, Norm::LInf, self.radius);
        mask_from_image(imageproc::morphology::close(&opened, Norm::LInf, self.radius))
    }
}

/// Borrow an `image::GrayImage` as a core mask view. Non-zero pixels are foreground.
pub fn mask_view(img: &GrayImage) -> MaskView<'_> {
    MaskView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Render a mask as a 0/255 grayscale image.
pub fn mask_image(mask: &MaskView<'_>) -> GrayImage {
    let width = mask.width;
    GrayImage::from_fn(mask.width as u32, mask.height as u32, |x, y| {
        let idx = y as usize * width + x as usize;
        match mask.data.get(idx) {
            Some(&v) if v != 0 => Luma([255]),
            _ => Luma([0]),
        }
    })
}

fn mask_from_image(img: GrayImage) -> Mask {
    Mask {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}

fn image_mean(img: &GrayImage) -> f32 {
    let raw = img.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f32 / raw.len() as f32
}

/// Build a detector with the `imageproc` collaborators configured by `preprocess`.
pub fn detector_for(params: LaneParams, preprocess: &PreprocessConfig) -> LaneCenterDetector {
    let detector = LaneCenterDetector::new(params).with_edge_detector(CannyEdges {
        params: preprocess.canny,
    });
    if preprocess.denoise {
        detector.with_denoiser(MorphologyDenoise::default())
    } else {
        detector
    }
}

/// Run the full pipeline on a binary mask image.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params, preprocess),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_lane(
    img: &GrayImage,
    params: LaneParams,
    preprocess: &PreprocessConfig,
) -> Result<Option<LaneDetection>, DetectError> {
    Ok(detector_for(params, preprocess).detect(&mask_view(img))?)
}

/// Convenience overload using default parameters and preprocessing.
pub fn detect_lane_default(img: &GrayImage) -> Result<Option<LaneDetection>, DetectError> {
    detect_lane(img, LaneParams::default(), &PreprocessConfig::default())
}

/// Like [`detect_lane`] but keeps every intermediate result.
pub fn analyze_lane(
    img: &GrayImage,
    params: LaneParams,
    preprocess: &PreprocessConfig,
) -> Result<LaneAnalysis, DetectError> {
    Ok(detector_for(params, preprocess).analyze(&mask_view(img))?)
}

/// Build an `image::GrayImage` from a raw grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<GrayImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).filter(|&n| n > 0) else {
        return Err(DetectError::InvalidGrayDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidGrayBuffer {
            expected,
            got: pixels.len(),
        });
    }
    GrayImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidGrayDimensions { width, height })
}

pub fn detect_lane_from_gray_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: LaneParams,
    preprocess: &PreprocessConfig,
) -> Result<Option<LaneDetection>, DetectError> {
    let img = gray_image_from_slice(width, height, pixels)?;
    detect_lane(&img, params, preprocess)
}

/// Default pipeline on a raw mask buffer, reported in the flat sentinel form.
pub fn compute_lane_center(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<LaneReport, DetectError> {
    let detection = detect_lane_from_gray_u8(
        width,
        height,
        pixels,
        LaneParams::default(),
        &PreprocessConfig::default(),
    )?;
    Ok(LaneReport::from(detection))
}
