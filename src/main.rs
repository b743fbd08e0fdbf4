use std::sync::Arc;
use clap::Parser;
use logo_detector::adapters::{
    http::{router, routes::SERVICE_NAME, state::HttpState},
    onnx::{load_detector, model_catalog::OnnxModelCatalog},
};
use logo_detector::application::services::DetectionService;
use logo_detector::config::{init_tracing, DetectorArgs};

#[derive(Parser, Debug)]
#[command(name = "logo-detector", version, about = "HTTP logo detection service")]
struct ServerArgs {
    /// Listen address.
    #[arg(long, env = "LOGO_DETECTOR_BIND", default_value = "0.0.0.0:8000")]
    bind: String,
    /// Maximum size of one /detect request body, in MiB.
    #[arg(long, env = "LOGO_DETECTOR_MAX_UPLOAD_MB", default_value_t = 20)]
    max_upload_mb: usize,
    #[command(flatten)]
    detector: DetectorArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing();

    tracing::info!("{} v{} starting", SERVICE_NAME, env!("CARGO_PKG_VERSION"));

    // Weights are loaded before binding: a server without a model never accepts requests.
    let cfg = args.detector.inference_config();
    let catalog = OnnxModelCatalog::new();
    let engine = load_detector(&catalog, &cfg).await?;

    let detection = Arc::new(DetectionService::new(Arc::new(engine), cfg.model.clone()));
    let state = HttpState {
        detection,
        max_upload_bytes: args.max_upload_mb * 1024 * 1024,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
