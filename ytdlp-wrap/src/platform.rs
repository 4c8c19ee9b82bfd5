use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Platforms yt-dlp publishes standalone binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::MacOs, Platform::Windows];

    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            other => Err(Error::UnsupportedPlatform(other.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows"
        }
    }

    /// Name of the asset on the yt-dlp releases page.
    pub fn release_asset(&self) -> &'static str {
        match self {
            Platform::Linux => "yt-dlp_linux",
            Platform::MacOs => "yt-dlp_macos",
            Platform::Windows => "yt-dlp.exe"
        }
    }

    /// Local file name; distinct per platform so every binary fits in one directory.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Platform::Linux => "yt-dlp-linux",
            Platform::MacOs => "yt-dlp-macos",
            Platform::Windows => "yt-dlp-windows.exe"
        }
    }

    pub fn binary_path(&self, bin_dir: impl AsRef<Path>) -> PathBuf {
        bin_dir.as_ref().join(self.binary_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "darwin" | "mac" => Ok(Platform::MacOs),
            "win32" | "win" => Ok(Platform::Windows),
            other => Self::from_os(other)
        }
    }
}
