pub mod associate;
pub mod face;
pub mod preprocessing;
pub mod regions;
pub mod words;

use std::path::Path;

use image::DynamicImage;

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::models::{BoundingBox, NameMatch, PhotoCandidate, RunResult, WordBox};
use crate::output;
use face::FaceDetector;
use words::WordDetector;

/// Run the geometric stage alone: binarize the document and return the
/// filtered photo rectangles in reading order. No model is involved.
pub fn detect_photo_regions(image: &DynamicImage, config: &ExtractionConfig) -> Vec<BoundingBox> {
    let gray = preprocessing::to_grayscale(image);
    let blurred = preprocessing::apply_blur(&gray, config.blur_sigma);
    let mask = preprocessing::binarize(&blurred);
    regions::filter_photo_regions(&mask, config)
}

/// Sequences the full extraction over one document image: binarize, filter
/// photo regions, gate each region on face presence, associate the name
/// printed beneath it, and write one crop (plus optional metadata sidecar)
/// per validated photo into a freshly allocated run folder.
pub struct ExtractionPipeline {
    config: ExtractionConfig,
    face_detector: Box<dyn FaceDetector>,
    word_detector: Box<dyn WordDetector>,
    verbose: bool,
}

impl ExtractionPipeline {
    pub fn new(face_detector: Box<dyn FaceDetector>, word_detector: Box<dyn WordDetector>) -> Self {
        Self {
            config: ExtractionConfig::default(),
            face_detector,
            word_detector,
            verbose: false,
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Process the image at `input_path`, writing artifacts under a fresh
    /// folder derived from `output_base` inside `result_dir`.
    pub fn process_file(
        &self,
        input_path: &Path,
        result_dir: &Path,
        output_base: &str,
    ) -> Result<RunResult, ExtractError> {
        if !input_path.exists() {
            return Err(ExtractError::InputNotFound(input_path.to_path_buf()));
        }
        let image = image::open(input_path)?;
        self.process(&image, result_dir, output_base)
    }

    /// Process an already decoded document image.
    pub fn process(
        &self,
        image: &DynamicImage,
        result_dir: &Path,
        output_base: &str,
    ) -> Result<RunResult, ExtractError> {
        let output_folder = output::allocate_run_folder(&result_dir.join(output_base))?;

        let gray = preprocessing::to_grayscale(image);
        let blurred = preprocessing::apply_blur(&gray, self.config.blur_sigma);
        let mask = preprocessing::binarize(&blurred);

        let rects = regions::filter_photo_regions(&mask, &self.config);
        if self.verbose {
            println!("Found {} photo candidates", rects.len());
        }

        let mut candidates: Vec<PhotoCandidate> =
            rects.into_iter().map(PhotoCandidate::new).collect();

        // The word detector runs at most once per document, on the first
        // candidate that passes the face gate, then the index is reused.
        let mut word_index: Option<Vec<WordBox>> = None;

        let mut entries = Vec::new();
        for candidate in &mut candidates {
            let rect = candidate.rect;
            let gray_crop =
                image::imageops::crop_imm(&gray, rect.x, rect.y, rect.w, rect.h).to_image();

            candidate.has_face = face::has_face(self.face_detector.as_ref(), &gray_crop);
            if !candidate.has_face {
                if self.verbose {
                    println!("  Region at ({}, {}): no face, skipped", rect.x, rect.y);
                }
                continue;
            }

            if word_index.is_none() {
                let built = words::build_word_index(
                    self.word_detector.as_ref(),
                    image,
                    self.config.word_confidence_threshold,
                )
                .map_err(ExtractError::WordDetection)?;
                if self.verbose {
                    println!("Word index built: {} words", built.len());
                }
                word_index = Some(built);
            }
            let all_words = word_index.as_deref().unwrap_or(&[]);

            if let Some((name, matched)) =
                associate::match_words_to_photo(&rect, all_words, &self.config)
            {
                candidate.matched_name = Some(name);
                candidate.matched_words = matched;
            }

            let base_name = match candidate.matched_name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => format!("unnamed_{}", entries.len()),
            };

            let name_match = (!candidate.matched_words.is_empty()).then(|| NameMatch {
                full_name: candidate.matched_name.clone().unwrap_or_default(),
                words: candidate.matched_words.clone(),
            });

            let crop = image.crop_imm(rect.x, rect.y, rect.w, rect.h);
            match output::write_entry(&output_folder, &base_name, &crop, rect, name_match.as_ref())
            {
                Ok(entry) => {
                    if self.verbose {
                        println!(
                            "  Saved '{}' from region at ({}, {})",
                            base_name, rect.x, rect.y
                        );
                    }
                    entries.push(entry);
                }
                Err(err) => {
                    // A failed write loses this candidate only; entries
                    // written before it stay in the result.
                    eprintln!("warning: {err}");
                }
            }
        }

        let total_processed = entries.len();
        Ok(RunResult {
            success: true,
            output_folder,
            total_processed,
            results: entries,
        })
    }
}
