use std::path::Path;

use anyhow::Context;
use image::GrayImage;

// SeetaFace scan parameters, fixed for roster-style scans.
const MIN_FACE_SIZE: u32 = 20;
const SCORE_THRESH: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const SLIDE_WINDOW_STEP: u32 = 4;

/// Bounding box of a detected face within a candidate region.
#[derive(Debug, Clone)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels).
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom detector and pass it to
/// [`crate::ExtractionPipeline::new`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds>;
}

/// Presence gate: a candidate region is kept only if it contains at least one
/// face. Zero detections is a normal filtering outcome, not a failure.
pub fn has_face(detector: &dyn FaceDetector, region: &GrayImage) -> bool {
    let (width, height) = region.dimensions();
    !detector.detect(region.as_raw(), width, height).is_empty()
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Loads the model once on construction; detection runs on a fresh detector
/// built from the shared model, so calls can come from multiple runs.
pub struct SeetaFaceDetector {
    model: rustface::Model,
}

impl SeetaFaceDetector {
    /// Load the SeetaFace frontal model from `path`.
    pub fn from_model_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!(
                "face model not found at {} (expected a SeetaFace frontal detection binary)",
                path.display()
            );
        }

        let data = std::fs::read(path)
            .with_context(|| format!("failed to read face model at {}", path.display()))?;
        let model = rustface::read_model(std::io::Cursor::new(data))
            .map_err(|e| anyhow::anyhow!("failed to parse face model: {}", e))?;

        Ok(Self { model })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBounds> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESH);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
