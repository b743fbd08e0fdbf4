//! Copies every image in which the model finds at least one logo into an
//! output directory, then prints a report.

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use logo_detector::adapters::onnx::{load_detector, model_catalog::OnnxModelCatalog};
use logo_detector::application::triage::TriageService;
use logo_detector::config::{init_tracing, DetectorArgs};

#[derive(Parser, Debug)]
#[command(name = "batch_detect", about = "Filter a directory down to images containing the logo")]
struct Args {
    /// Directory with input images.
    #[arg(long)]
    input: PathBuf,
    /// Directory receiving the images with detections.
    #[arg(long, default_value = "filtered")]
    output: PathBuf,
    #[command(flatten)]
    detector: DetectorArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let cfg = args.detector.inference_config();
    let engine = load_detector(&OnnxModelCatalog::new(), &cfg).await?;

    let report = TriageService::new(Arc::new(engine)).process_directory(&args.input, &args.output)?;
    println!("{report}");
    Ok(())
}
