//! Runs the detector over a directory of images and scores it against YOLO
//! labels (mAP@0.5, mAP@0.5:0.95, mAP@0.75 and an approximate F1).

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use logo_detector::adapters::metrics::coco_map::CocoMeanAveragePrecision;
use logo_detector::adapters::onnx::{load_detector, model_catalog::OnnxModelCatalog};
use logo_detector::application::validation::{ValidationOutcome, ValidationService};
use logo_detector::config::{init_tracing, DetectorArgs};

#[derive(Parser, Debug)]
#[command(name = "validate", about = "Evaluate detection quality against YOLO labels")]
struct Args {
    /// Directory with images.
    #[arg(long)]
    input: PathBuf,
    /// Directory with `<image-stem>.txt` YOLO label files.
    #[arg(long)]
    labels: PathBuf,
    #[command(flatten)]
    detector: DetectorArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let cfg = args.detector.inference_config();
    let engine = load_detector(&OnnxModelCatalog::new(), &cfg).await?;

    let service = ValidationService::new(Arc::new(engine), Box::new(CocoMeanAveragePrecision::new()));
    match service.validate_directory(&args.input, &args.labels)? {
        ValidationOutcome::NoImages => {
            println!("No images found in {}", args.input.display());
        }
        ValidationOutcome::Report(report) => println!("{report}"),
    }
    Ok(())
}
