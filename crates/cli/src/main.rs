use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use chopcrop_core::io::domain::image_source::ImageSource;
use chopcrop_core::io::infrastructure::file_storage_sink::FileStorageSink;
use chopcrop_core::io::infrastructure::http_image_source::HttpImageSource;
use chopcrop_core::pipeline::batch_process_use_case::{BatchProcessUseCase, ItemOutcome};
use chopcrop_core::pipeline::composite_crop_use_case::{CompositeConfig, CompositeCropUseCase};
use chopcrop_core::pipeline::detect_crop_use_case::{DetectCropUseCase, DetectionConfig};
use chopcrop_core::segmentation::classifier::BackdropRule;
use chopcrop_core::segmentation::morphology::MorphStrategy;
use chopcrop_core::segmentation::selector::SelectorConfig;
use chopcrop_core::shared::constants::{COMPOSITE_BLUE_LEVEL, DEFAULT_BLUE_LEVEL};
use chopcrop_core::shared::crop_result::CropResult;
use chopcrop_core::shared::error::PipelineError;

/// Specimen crop detection and background removal for sample photos.
#[derive(Parser)]
#[command(name = "chopcrop")]
struct Cli {
    /// Input image files or http(s) URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Directory for composited output images.
    #[arg(long, default_value = "crops")]
    out_dir: PathBuf,

    /// Print crop coordinates as JSON instead of writing images.
    #[arg(long)]
    detect_only: bool,

    /// Re-crop at fixed coordinates x1,y1,x2,y2 (skips detection).
    #[arg(long, value_delimiter = ',', num_args = 4)]
    coords: Option<Vec<u32>>,

    /// Backdrop color: blue or white.
    #[arg(long, default_value = "blue")]
    backdrop: String,

    /// Blue-channel cutoff for the detection rule.
    #[arg(long, default_value_t = DEFAULT_BLUE_LEVEL)]
    blue_level: u8,

    /// Blue-channel cutoff for the compositing rule (looser by default).
    #[arg(long, default_value_t = COMPOSITE_BLUE_LEVEL)]
    composite_blue_level: u8,

    /// Mask cleaning strategy: majority or close-open.
    #[arg(long, default_value = "majority")]
    morphology: String,

    /// Majority window radius (radius 4 = 9x9 window).
    #[arg(long, default_value = "4")]
    radius: usize,

    /// Majority vote threshold (0.0-1.0).
    #[arg(long, default_value = "0.6")]
    threshold: f64,

    /// Crop margin as a fraction of subject size (0.0-0.25).
    #[arg(long, default_value = "0.01")]
    margin: f64,

    /// JPEG quality for composited output (1-100).
    #[arg(long, default_value = "95")]
    quality: u8,

    /// Worker threads for batch processing.
    #[arg(long, default_value = "4")]
    jobs: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = DetectCropUseCase::new(detection_config(&cli));
    let compositor = CompositeCropUseCase::new(composite_config(&cli));
    let source = LocalOrHttpSource::new();

    if let Some(coords) = cli.coords.clone() {
        return run_recrop(&cli, &source, &compositor, &coords);
    }
    if cli.detect_only {
        return run_detect_only(&cli, &source, &detector);
    }
    run_batch(&cli, source, detector, compositor)
}

fn run_detect_only(
    cli: &Cli,
    source: &LocalOrHttpSource,
    detector: &DetectCropUseCase,
) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        let bytes = source.fetch(input)?;
        let crop = detector.detect(&bytes)?;
        let line = serde_json::json!({ "input": input, "crop": crop });
        println!("{line}");
    }
    Ok(())
}

fn run_recrop(
    cli: &Cli,
    source: &LocalOrHttpSource,
    compositor: &CompositeCropUseCase,
    coords: &[u32],
) -> Result<(), Box<dyn std::error::Error>> {
    use chopcrop_core::io::domain::storage_sink::StorageSink;

    let crop = CropResult::new(coords[0], coords[1], coords[2], coords[3], 1.0);
    let sink = FileStorageSink::new(&cli.out_dir);
    for input in &cli.inputs {
        let bytes = source.fetch(input)?;
        let cropped = compositor.recrop(&bytes, &crop)?;
        let url = sink.store(input, &cropped)?;
        log::info!("re-cropped {input} -> {url}");
    }
    Ok(())
}

fn run_batch(
    cli: &Cli,
    source: LocalOrHttpSource,
    detector: DetectCropUseCase,
    compositor: CompositeCropUseCase,
) -> Result<(), Box<dyn std::error::Error>> {
    let sink = FileStorageSink::new(&cli.out_dir);
    let use_case = BatchProcessUseCase::new(
        Box::new(source),
        Box::new(sink),
        detector,
        compositor,
        Some(cli.jobs),
        None,
    );

    let summary = use_case.execute(&cli.inputs);
    for item in &summary.items {
        match &item.outcome {
            ItemOutcome::Processed { crop, output_url } => match output_url {
                Some(url) => println!(
                    "{}: ({},{})-({},{}) confidence {:.2} -> {url}",
                    item.id, crop.x1, crop.y1, crop.x2, crop.y2, crop.confidence
                ),
                None => println!("{}: no subject detected", item.id),
            },
            ItemOutcome::Failed { error } => println!("{}: FAILED ({error})", item.id),
        }
    }
    println!("processed: {}, failed: {}", summary.processed, summary.failed);

    if summary.failed > 0 && summary.processed == 0 {
        return Err("all inputs failed".into());
    }
    Ok(())
}

fn detection_config(cli: &Cli) -> DetectionConfig {
    DetectionConfig {
        rule: backdrop_rule(&cli.backdrop, cli.blue_level),
        morphology: morphology(cli),
        selector: SelectorConfig {
            margin: cli.margin,
            ..SelectorConfig::default()
        },
    }
}

fn composite_config(cli: &Cli) -> CompositeConfig {
    CompositeConfig {
        rule: backdrop_rule(&cli.backdrop, cli.composite_blue_level),
        morphology: morphology(cli),
        jpeg_quality: cli.quality,
        ..CompositeConfig::default()
    }
}

fn backdrop_rule(backdrop: &str, blue_level: u8) -> BackdropRule {
    if backdrop == "white" {
        BackdropRule::white()
    } else {
        BackdropRule::blue_with_level(blue_level)
    }
}

fn morphology(cli: &Cli) -> MorphStrategy {
    if cli.morphology == "close-open" {
        MorphStrategy::CloseOpen {
            close_radius: 2,
            open_radius: 1,
        }
    } else {
        MorphStrategy::Majority {
            radius: cli.radius,
            threshold: cli.threshold,
        }
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.backdrop != "blue" && cli.backdrop != "white" {
        return Err(format!("Backdrop must be 'blue' or 'white', got '{}'", cli.backdrop).into());
    }
    if cli.morphology != "majority" && cli.morphology != "close-open" {
        return Err(format!(
            "Morphology must be 'majority' or 'close-open', got '{}'",
            cli.morphology
        )
        .into());
    }
    if cli.threshold <= 0.0 || cli.threshold >= 1.0 {
        return Err(format!(
            "Threshold must be between 0.0 and 1.0 exclusive, got {}",
            cli.threshold
        )
        .into());
    }
    if !(0.0..=0.25).contains(&cli.margin) {
        return Err(format!("Margin must be between 0.0 and 0.25, got {}", cli.margin).into());
    }
    if cli.quality == 0 || cli.quality > 100 {
        return Err(format!("Quality must be between 1 and 100, got {}", cli.quality).into());
    }
    if cli.jobs == 0 {
        return Err("Jobs must be at least 1".into());
    }
    if cli.radius == 0 {
        return Err("Radius must be at least 1".into());
    }
    if let Some(coords) = &cli.coords {
        if coords[0] >= coords[2] || coords[1] >= coords[3] {
            return Err(format!(
                "Coordinates must describe a positive area, got {},{},{},{}",
                coords[0], coords[1], coords[2], coords[3]
            )
            .into());
        }
    }
    for input in &cli.inputs {
        if !is_url(input) && !Path::new(input).exists() {
            return Err(format!("Input file not found: {input}").into());
        }
    }
    Ok(())
}

/// Dispatches fetches to HTTP or the local filesystem based on the id.
struct LocalOrHttpSource {
    http: HttpImageSource,
}

impl LocalOrHttpSource {
    fn new() -> Self {
        Self {
            http: HttpImageSource::new(),
        }
    }
}

impl ImageSource for LocalOrHttpSource {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, PipelineError> {
        if is_url(id) {
            self.http.fetch(id)
        } else {
            std::fs::read(id).map_err(|e| PipelineError::Read {
                path: PathBuf::from(id),
                source: e,
            })
        }
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
