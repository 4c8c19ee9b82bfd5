//! Fetching yt-dlp release binaries.

use std::path::{Path, PathBuf};

use reqwest::Url;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::platform::Platform;

pub const DEFAULT_RELEASE_URL: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest/download/";

#[derive(Debug, Clone)]
pub struct Provisioner {
    http: reqwest::Client,
    release_url: String,
    bin_dir: PathBuf
}

impl Provisioner {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            release_url: DEFAULT_RELEASE_URL.to_string(),
            bin_dir: bin_dir.into()
        }
    }

    pub fn with_release_url(mut self, url: impl Into<String>) -> Self {
        self.release_url = url.into();
        self
    }

    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn asset_url(&self, platform: Platform) -> Result<Url> {
        let mut base = self.release_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Url::parse(&base)
            .and_then(|url| url.join(platform.release_asset()))
            .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))
    }

    /// Downloads the binary for `platform`, replacing any existing copy.
    ///
    /// Redirects are followed by the HTTP client; the body lands in a `.part`
    /// file that is renamed into place once complete.
    pub async fn download(&self, platform: Platform) -> Result<PathBuf> {
        let url = self.asset_url(platform)?;
        let path = platform.binary_path(&self.bin_dir);

        fs::create_dir_all(&self.bin_dir).await?;

        tracing::info!(%platform, %url, "downloading yt-dlp");

        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::DownloadFailed(format!(
                "{url} responded with {}",
                response.status()
            )));
        }

        let partial = partial_path(&path);
        let written = match write_body(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                discard_partial(&partial).await;
                return Err(e);
            }
        };

        fs::rename(&partial, &path).await?;
        make_executable(&path).await?;

        tracing::debug!(path = %path.display(), bytes = written, "downloaded yt-dlp");

        Ok(path)
    }

    pub async fn download_all(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            paths.push(self.download(platform).await?);
        }
        Ok(paths)
    }

    /// Returns the local binary for `platform`, downloading it only when missing.
    pub async fn ensure(&self, platform: Platform) -> Result<PathBuf> {
        let path = platform.binary_path(&self.bin_dir);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "yt-dlp already present");
            return Ok(path);
        }
        self.download(platform).await
    }
}

async fn write_body(mut response: reqwest::Response, partial: &Path) -> Result<u64> {
    let mut file = fs::File::create(partial).await?;
    let mut written = 0u64;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

async fn discard_partial(partial: &Path) {
    if let Err(e) = fs::remove_file(partial).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %partial.display(), error = %e, "failed to remove partial download");
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
