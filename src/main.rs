use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;

use tubefetch::cli::{Cli, Commands};
use tubefetch::core::config::ClientConfig;
use tubefetch::core::init_logger;
use tubefetch::core::validation::validate_youtube_url;
use tubefetch::download::models::FormatKind;
use tubefetch::download::{Backend, DiskSaver, HttpBackend};
use tubefetch::session::{Controller, DownloadState, Event, FetchState, SessionRuntime, ViewModel};

/// Entry point for the command-line client
///
/// # Errors
/// Returns an error if logging or the HTTP client cannot be initialized, or if the
/// requested fetch/download does not complete successfully.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present (before any config static is read)
    let _ = dotenv();

    let cli = Cli::parse_args();
    init_logger(cli.verbose)?;

    let config = ClientConfig::from_env().with_backend_url(cli.backend);
    log::debug!("Configuration loaded, backend: {}", config.backend_url);

    match cli.command {
        Commands::Info { url, json } => run_cli_info(config, url, json).await,
        Commands::Download {
            url,
            format,
            quality,
            output,
        } => run_cli_download(config.with_download_dir(output), url, format, quality).await,
    }
}

/// Run CLI info command
async fn run_cli_info(config: ClientConfig, url: String, json: bool) -> Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config)?);

    if json {
        let url = validate_youtube_url(&url)?;
        let metadata = backend.fetch_info(url).await?;
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let saver = Arc::new(DiskSaver::new(config.download_dir.clone()));
    let mut session = SessionRuntime::new(backend, saver);

    println!("🎬 Video Information");
    println!("====================");
    println!("URL: {}\n", url.trim());

    match session.fetch(&url).await {
        FetchState::Displayed => {
            print_panel(session.controller().view());
            Ok(())
        }
        _ => Err(session_error(session.controller())),
    }
}

/// Run CLI download command
async fn run_cli_download(
    config: ClientConfig,
    url: String,
    format: FormatKind,
    quality: Option<String>,
) -> Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&config)?);
    let saver = Arc::new(DiskSaver::new(config.download_dir.clone()));
    let mut session = SessionRuntime::new(backend, saver);

    println!("🎬 Tubefetch Download");
    println!("=====================");
    println!("URL: {}", url.trim());
    println!("Format: {}", format);
    println!("Output directory: {}", config.download_dir.display());
    println!();

    if session.fetch(&url).await != FetchState::Displayed {
        return Err(session_error(session.controller()));
    }
    print_panel(session.controller().view());

    session.dispatch(Event::SelectKind(format));
    if let Some(quality) = quality.filter(|_| format.has_quality()) {
        session.dispatch(Event::SelectQuality(quality.clone()));
        if session.controller().view().selected_quality.as_deref() != Some(quality.as_str()) {
            println!("⚠️ Quality {} is not offered for this video", quality);
        }
    }
    if format.has_quality() {
        if let Some(label) = session.controller().view().selected_label() {
            println!("Quality: {}", label);
        }
    }
    println!("Estimated size: {}\n", session.controller().view().estimated_size);

    // Ctrl-C cancels the download instead of killing the process
    let handle = session.handle();
    let ctrl_c = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, cancelling download");
            handle.cancel();
        }
    });

    let mut last_text = String::new();
    let outcome = session
        .download_observed(|controller| {
            let view = controller.view();
            if view.progress_visible && view.progress_text != last_text {
                println!("📥 {}", view.progress_text);
                last_text.clone_from(&view.progress_text);
            }
        })
        .await;
    ctrl_c.abort();

    match outcome {
        DownloadState::Completed { path, .. } => {
            println!("\n✅ Download completed successfully!");
            println!("📂 Saved to: {}", path.display());
            Ok(())
        }
        DownloadState::Cancelled => {
            println!("\n⏹️ Download cancelled");
            Ok(())
        }
        _ => Err(session_error(session.controller())),
    }
}

fn print_panel(view: &ViewModel) {
    let Some(panel) = view.panel.as_ref() else {
        return;
    };

    println!("Title: {}", panel.title);
    println!("Channel: {}", panel.channel);
    println!("Duration: {}", panel.duration);
    println!("Views: {}", panel.views);
    if !panel.thumbnail.is_empty() {
        println!("Thumbnail: {}", panel.thumbnail);
    }

    println!("\n📋 Available Qualities:");
    println!("-----------------------");
    for option in &view.quality_options {
        println!("  {}", option.label);
    }
    println!();
}

/// Latest error notice as a command failure.
fn session_error(controller: &Controller) -> anyhow::Error {
    match controller.view().errors().last() {
        Some(notice) => anyhow!("❌ {}", notice.text),
        None => anyhow!("❌ Request did not complete"),
    }
}
