use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docscan_client::HttpRecognitionClient;
use docscan_config::Config;
use docscan_types::{ImageOrigin, ScanState};
use tokio::signal;

pub mod commands;
pub mod controller;
pub mod events;
pub mod logging;
pub mod render;
pub mod scan;


use self::controller::AppController;
use self::render::Renderer;

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Capture an image, send it to a recognition service, read the text back")]
#[command(version)]
struct Cli {
    /// JSON profile layered over environment defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Recognition endpoint URL, overrides config
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a single image and print the result
    Scan {
        path: PathBuf,
        /// Tag the image as a camera capture
        #[arg(long)]
        camera: bool,
    },
    /// Line-driven session on stdin (default)
    Interactive,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("docscan: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_tracing(&config.logging);

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("docscan: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::new();
    if let Some(path) = &cli.config {
        config = config
            .merge_file(path)
            .with_context(|| format!("loading profile {}", path.display()))?;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.recognition.endpoint_url = endpoint.clone();
    }
    Ok(config)
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    let client = HttpRecognitionClient::new(&config.recognition)?;
    tracing::info!("Recognition endpoint: {}", client.endpoint_url());

    let controller = AppController::new(Arc::new(config), Arc::new(client));

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Scan { path, camera } => {
            let origin = if camera {
                ImageOrigin::Camera
            } else {
                ImageOrigin::File
            };
            run_scan(&controller, path, origin).await
        }
        Commands::Interactive => {
            run_interactive(&controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_scan(
    controller: &AppController,
    path: PathBuf,
    origin: ImageOrigin,
) -> anyhow::Result<ExitCode> {
    let mut session = controller.new_session();
    let session_rx = controller.session_events();

    let state = tokio::select! {
        state = scan::scan_once(&mut session, &session_rx, &path, origin) => state?,
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            return Ok(ExitCode::FAILURE);
        }
    };

    Renderer::stdout().render(&session.view())?;

    Ok(match state {
        ScanState::Succeeded(..) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

async fn run_interactive(controller: &AppController) -> anyhow::Result<()> {
    let mut renderer = Renderer::stdout();
    if atty::is(atty::Stream::Stdin) {
        renderer.print(commands::HELP)?;
    }

    let mut tasks = controller.spawn_tasks(renderer)?;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("event loop finished"),
                Ok(Err(e)) => tracing::error!("event loop exited: {e}"),
                Err(e) => tracing::error!("event loop panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while tasks.join_next().await.is_some() {}

    Ok(())
}
