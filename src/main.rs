use clap::Parser;
use std::path::PathBuf;

use photoroster::detection::face::SeetaFaceDetector;
use photoroster::detection::words::OcrsWordDetector;
use photoroster::{detect_photo_regions, ExtractionConfig, ExtractionPipeline};

#[derive(Parser)]
#[command(name = "photoroster")]
#[command(about = "Extract named portrait photos from scanned roster sheets")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Directory that receives per-run output folders
    #[arg(short, long, value_name = "DIR", default_value = "result")]
    output_dir: PathBuf,

    /// Base name for the run folder (defaults to processed_<file stem>)
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Path to the SeetaFace frontal detection model
    #[arg(long, value_name = "FILE", default_value = "seeta_fd_frontal_v1.0.bin")]
    face_model: PathBuf,

    /// Directory containing the OCR models (defaults to ~/.cache/ocrs)
    #[arg(long, value_name = "DIR")]
    ocr_models: Option<PathBuf>,

    /// Print detected photo rectangles and exit (no models loaded)
    #[arg(long)]
    regions_only: bool,

    /// Print the run result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.regions_only {
        if args.verbose {
            println!("Loading image: {:?}", args.image_path);
        }
        let image = image::open(&args.image_path)?;
        let rects = detect_photo_regions(&image, &ExtractionConfig::default());

        println!("\n=== Photo Region Candidates ===");
        println!("Total regions: {}", rects.len());
        for (i, rect) in rects.iter().enumerate() {
            println!(
                "  Region {} at ({}, {}) - {}x{}",
                i + 1,
                rect.x,
                rect.y,
                rect.w,
                rect.h
            );
        }
        return Ok(());
    }

    let output_base = args.name.clone().unwrap_or_else(|| {
        let stem = args
            .image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        format!("processed_{stem}")
    });

    if args.verbose {
        println!("Loading face model: {:?}", args.face_model);
    }
    let face_detector = SeetaFaceDetector::from_model_file(&args.face_model)?;

    if args.verbose {
        println!("Loading OCR models...");
    }
    let word_detector = match &args.ocr_models {
        Some(dir) => OcrsWordDetector::from_model_dir(dir)?,
        None => OcrsWordDetector::from_cache_dir()?,
    };

    let pipeline = ExtractionPipeline::new(Box::new(face_detector), Box::new(word_detector))
        .with_verbose(args.verbose);

    let result = pipeline.process_file(&args.image_path, &args.output_dir, &output_base)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\n=== Photo Extraction Results ===");
        println!("Output folder: {}", result.output_folder.display());
        println!("Total photos saved: {}", result.total_processed);

        for entry in &result.results {
            println!(
                "  {} at ({}, {}) -> {}",
                entry.name,
                entry.bbox.x,
                entry.bbox.y,
                entry.image_path.display()
            );
        }
    }

    Ok(())
}
