pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod output;

pub use config::ExtractionConfig;
pub use detection::{detect_photo_regions, ExtractionPipeline};
pub use error::ExtractError;
pub use models::{BoundingBox, NameMatch, PhotoCandidate, PhotoEntry, RunResult, WordBox};
