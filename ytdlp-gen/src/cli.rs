use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ytdlp_wrap::{DEFAULT_RELEASE_URL, Platform};

#[derive(Debug, Parser)]
#[command(name = "ytdlp-gen")]
#[command(about = "Download yt-dlp, read its help listing and generate typed Rust bindings")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding the per-platform yt-dlp binaries.
    #[arg(long, global = true, env = "YTDLP_BIN_DIR", default_value = "bin")]
    pub bin_dir: PathBuf,

    /// Base URL the release assets are fetched from.
    #[arg(long, global = true, env = "YTDLP_RELEASE_URL", default_value = DEFAULT_RELEASE_URL)]
    pub release_url: String
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download yt-dlp release binaries.
    Download(DownloadArgs),
    /// Extract the option table and print it as JSON.
    Parse(ParseArgs),
    /// Generate the typed client module.
    Generate(GenerateArgs)
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Platform to download for (linux, macos, windows); defaults to the current one.
    #[arg(long, conflicts_with = "all")]
    pub platform: Option<Platform>,

    /// Download the binaries for every platform.
    #[arg(long)]
    pub all: bool
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Parse a saved help listing instead of running the binary.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the JSON table to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Path of the generated Rust module.
    #[arg(long, short)]
    pub output: PathBuf,

    /// Render from a saved JSON table instead of running the binary.
    #[arg(long, conflicts_with = "skip_download")]
    pub snapshot: Option<PathBuf>,

    /// Also write the extracted table as JSON.
    #[arg(long)]
    pub write_snapshot: Option<PathBuf>,

    /// Use the binary already in the bin directory; fail if it is missing.
    #[arg(long)]
    pub skip_download: bool
}
