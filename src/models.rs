use std::path::PathBuf;

use serde::Serialize;

/// Axis-aligned rectangle in image pixel coordinates, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.h == 0 {
            return 0.0;
        }
        self.w as f32 / self.h as f32
    }

    /// Y coordinate just past the last row of the rectangle.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// A recognized word and its location in the full document image.
///
/// `confidence` is detector-defined and stays out of serialized artifacts;
/// the sidecar's word list carries geometry and text only.
#[derive(Debug, Clone, Serialize)]
pub struct WordBox {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(skip_serializing)]
    pub confidence: f32,
}

impl WordBox {
    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.w as f32 / 2.0
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// A rectangle that survived geometric filtering, tracked through the face
/// gate and name association. Discarded candidates are never revisited.
#[derive(Debug, Clone)]
pub struct PhotoCandidate {
    pub rect: BoundingBox,
    pub has_face: bool,
    pub matched_name: Option<String>,
    pub matched_words: Vec<WordBox>,
}

impl PhotoCandidate {
    pub fn new(rect: BoundingBox) -> Self {
        Self {
            rect,
            has_face: false,
            matched_name: None,
            matched_words: Vec::new(),
        }
    }
}

/// Sidecar metadata written next to a crop whose name was matched.
#[derive(Debug, Clone, Serialize)]
pub struct NameMatch {
    pub full_name: String,
    pub words: Vec<WordBox>,
}

/// One saved crop and its artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoEntry {
    pub name: String,
    pub image_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
    pub bbox: BoundingBox,
}

/// Outcome of processing one document image.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub success: bool,
    pub output_folder: PathBuf,
    pub total_processed: usize,
    pub results: Vec<PhotoEntry>,
}
