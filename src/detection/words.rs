use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;

use crate::models::WordBox;

// The recognition output carries no per-word score, so detections from the
// ocrs backend all report this value.
const NOMINAL_WORD_CONFIDENCE: f32 = 0.9;

/// One raw detection from the word detector: recognized text, the four
/// corners of the detector's bounding polygon, and a confidence score.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub text: String,
    pub corners: [(f32, f32); 4],
    pub confidence: f32,
}

/// Pluggable word detection backend, invoked once per processed image.
pub trait WordDetector: Send + Sync {
    fn detect_words(&self, image: &DynamicImage) -> Result<Vec<RawDetection>>;
}

/// Run the detector over the full image and normalize its raw output into a
/// confidence-filtered word index.
///
/// Detections at or below `min_confidence`, or whose trimmed text is empty,
/// are dropped permanently for the run. The order of the returned words is
/// detector-dependent; consumers must not rely on it.
pub fn build_word_index(
    detector: &dyn WordDetector,
    image: &DynamicImage,
    min_confidence: f32,
) -> Result<Vec<WordBox>> {
    let raw = detector.detect_words(image)?;

    let mut words = Vec::with_capacity(raw.len());
    for detection in &raw {
        if detection.confidence <= min_confidence {
            continue;
        }
        let text = detection.text.trim();
        if text.is_empty() {
            continue;
        }
        words.push(normalize(text, detection));
    }

    Ok(words)
}

/// Derive an axis-aligned box from the polygon's top-left and bottom-right
/// extremes, clamped to the image origin.
fn normalize(text: &str, detection: &RawDetection) -> WordBox {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for &(cx, cy) in &detection.corners {
        min_x = min_x.min(cx);
        min_y = min_y.min(cy);
        max_x = max_x.max(cx);
        max_y = max_y.max(cy);
    }

    WordBox {
        text: text.to_string(),
        x: min_x.max(0.0) as u32,
        y: min_y.max(0.0) as u32,
        w: (max_x - min_x).max(0.0) as u32,
        h: (max_y - min_y).max(0.0) as u32,
        confidence: detection.confidence,
    }
}

/// Word detector backed by the `ocrs` engine.
///
/// Model loading is expensive; construct once per process and share the
/// instance across runs. Recognition calls are serialized internally, so at
/// most one is in flight at a time.
pub struct OcrsWordDetector {
    engine: OcrEngine,
    recognition_lock: Mutex<()>,
}

impl OcrsWordDetector {
    /// Load detection and recognition models from the standard cache location.
    pub fn from_cache_dir() -> Result<Self> {
        let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        let cache_dir = Path::new(&home_dir).join(".cache/ocrs");
        Self::from_model_dir(&cache_dir)
    }

    /// Load models from `dir`, which must contain `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn from_model_dir(dir: &Path) -> Result<Self> {
        let detection_model_path = dir.join("text-detection.rten");
        let recognition_model_path = dir.join("text-recognition.rten");

        if !detection_model_path.exists() || !recognition_model_path.exists() {
            anyhow::bail!(
                "OCR models not found. Expected locations:\n  - {}\n  - {}",
                detection_model_path.display(),
                recognition_model_path.display()
            );
        }

        let detection_model = Model::load_file(&detection_model_path)?;
        let recognition_model = Model::load_file(&recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })?;

        Ok(Self {
            engine,
            recognition_lock: Mutex::new(()),
        })
    }
}

impl WordDetector for OcrsWordDetector {
    fn detect_words(&self, image: &DynamicImage) -> Result<Vec<RawDetection>> {
        // One in-flight recognition at a time.
        let _guard = self.recognition_lock.lock().unwrap();

        let img = image.to_rgb8();
        let source = ImageSource::from_bytes(img.as_raw(), img.dimensions())?;
        let input = self.engine.prepare_input(source)?;

        let word_rects = self.engine.detect_words(&input)?;
        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let lines = self.engine.recognize_text(&input, &line_rects)?;

        let mut detections = Vec::new();
        for line in lines.into_iter().flatten() {
            for word in line.words() {
                let corners = word.rotated_rect().corners();
                detections.push(RawDetection {
                    text: word.to_string(),
                    corners: [
                        (corners[0].x, corners[0].y),
                        (corners[1].x, corners[1].y),
                        (corners[2].x, corners[2].y),
                        (corners[3].x, corners[3].y),
                    ],
                    confidence: NOMINAL_WORD_CONFIDENCE,
                });
            }
        }

        Ok(detections)
    }
}
