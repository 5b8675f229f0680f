/// Geometric and association parameters for one extraction run.
///
/// Immutable once constructed; pass a modified copy to run with different
/// bounds. Area and aspect-ratio limits are exclusive on both ends.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionConfig {
    /// Lower bound on candidate area in pixels, exclusive.
    pub min_area: u64,
    /// Upper bound on candidate area in pixels, exclusive.
    pub max_area: u64,
    /// Lower bound on width/height, exclusive.
    pub min_aspect_ratio: f32,
    /// Upper bound on width/height, exclusive.
    pub max_aspect_ratio: f32,
    /// Vertical extent of the name search window below each photo, in pixels.
    pub text_search_height: u32,
    /// Horizontal slack added to each side of the photo when matching words.
    pub text_search_width_tolerance: u32,
    /// Words at or below this confidence are dropped from the index.
    pub word_confidence_threshold: f32,
    /// Sigma of the Gaussian blur applied before thresholding.
    pub blur_sigma: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_area: 20_000,
            max_area: 150_000,
            min_aspect_ratio: 0.65,
            max_aspect_ratio: 0.85,
            text_search_height: 70,
            text_search_width_tolerance: 40,
            word_confidence_threshold: 0.3,
            blur_sigma: 1.1,
        }
    }
}
