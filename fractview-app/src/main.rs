mod config;
mod session;

use std::path::PathBuf;

use tracing::{error, info};

use fractview_render::RenderWorker;

use config::AppConfig;
use session::FrameStatus;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load(&path)?,
        None => {
            info!("No configuration file given, using the default view");
            AppConfig::default()
        }
    };

    let worker = RenderWorker::create(config.render)?;
    let frames = session::replay(&config, &worker)?;

    for frame in &frames {
        let vp = frame.request.viewport;
        match frame.status {
            FrameStatus::Rendered {
                digest,
                elapsed,
                bands,
            } => println!(
                "frame {:>3}  gen {:>3}  {}px  center {}  zoom {:e}  {} iters  {}  {:016x}  {} bands  {} ms",
                frame.index,
                frame.generation,
                vp.size(),
                vp.center(),
                vp.zoom(),
                frame.request.max_iterations,
                frame.request.colorizer,
                digest,
                bands,
                elapsed.as_millis(),
            ),
            FrameStatus::Superseded => println!(
                "frame {:>3}  gen {:>3}  superseded",
                frame.index, frame.generation
            ),
        }
    }

    let rendered = frames.iter().filter_map(|f| f.digest()).count();
    info!(frames = frames.len(), rendered, "Session complete");
    worker.shutdown();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting fractview");

    run().inspect_err(|e| error!("{e}"))
}
