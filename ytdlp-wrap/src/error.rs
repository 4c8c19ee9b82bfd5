use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("yt-dlp binary not found: {0}")]
    BinaryNotFound(PathBuf),

    #[error("yt-dlp binary not executable: {0}")]
    BinaryNotExecutable(PathBuf),

    #[error("failed to execute yt-dlp: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    #[error("yt-dlp command failed with exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("yt-dlp wrote to stderr: {0}")]
    Stderr(String),

    #[error("yt-dlp help extraction failed: {0}")]
    HelpFailed(String),

    #[error("yt-dlp {0} was not captured")]
    MissingPipe(&'static str),

    #[error("failed to parse JSON: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("unknown option: --{0}")]
    UnknownOption(String),

    #[error("option --{name} {expected}")]
    OptionKindMismatch { name: String, expected: &'static str },

    #[error("option --{name} expects {expected} value(s), got {found}")]
    MissingValue { name: String, expected: usize, found: usize },

    #[error("value `{value}` of option --{name} would be read back as a flag")]
    AmbiguousValue { name: String, value: String },

    #[error("failed to render generated module: {0}")]
    Render(#[from] askama::Error)
}

pub type Result<T> = std::result::Result<T, Error>;
