use clap::{Parser, Subcommand};

use crate::download::models::FormatKind;

#[derive(Parser)]
#[command(name = "tubefetch")]
#[command(author, version, about = "Fetch YouTube video info and download it through a conversion backend", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides TUBEFETCH_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show video information and the available qualities
    Info {
        /// YouTube URL
        url: String,

        /// Print the backend's metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a video or its audio track
    Download {
        /// YouTube URL
        url: String,

        /// Download type: video or audio
        #[arg(short, long, default_value = "video")]
        format: FormatKind,

        /// Video quality label (e.g. 720p); defaults to the first quality offered
        #[arg(short, long)]
        quality: Option<String>,

        /// Output directory (overrides TUBEFETCH_DOWNLOAD_DIR)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
