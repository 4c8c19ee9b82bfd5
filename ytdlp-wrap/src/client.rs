use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use futures_core::Stream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;

use crate::command::CommandBuilder;
use crate::error::{Error, Result};
use crate::help::{self, HelpLayout, HelpOption};
use crate::platform::Platform;
use crate::table::OptionTable;

/// Handle to a yt-dlp executable.
///
/// The binary path is resolved once by the caller and carried here; nothing
/// about the platform is looked up implicitly.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    extra_args: Vec<String>,
    env_vars: HashMap<String, String>
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Uses `yt-dlp` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into(),
            extra_args: Vec::new(),
            env_vars: HashMap::new()
        }
    }

    /// Uses the provisioned binary for `platform` under `bin_dir`.
    pub fn for_platform(bin_dir: impl AsRef<Path>, platform: Platform) -> Self {
        Self::with_binary(platform.binary_path(bin_dir))
    }

    pub fn for_current_platform(bin_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::for_platform(bin_dir, Platform::current()?))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn set_binary(&mut self, path: PathBuf) {
        self.binary = path;
    }

    /// Arguments placed after the URL and before per-call options.
    pub fn set_extra_args(&mut self, args: Vec<String>) {
        self.extra_args = args;
    }

    pub fn set_env(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }

    pub async fn check_binary(&self) -> Result<String> {
        let output = CommandBuilder::new(&self.binary)
            .version()
            .build_with_env(&self.env_vars)
            .output()
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(Error::BinaryNotExecutable(self.binary.clone()))
        }
    }

    /// Runs `--help` and extracts its option listing.
    ///
    /// Any stderr output fails the extraction, even when stdout was complete.
    pub async fn help_options(&self, layout: HelpLayout) -> Result<Vec<HelpOption>> {
        let builder = CommandBuilder::new(&self.binary).help();

        tracing::debug!(binary = %self.binary.display(), "reading yt-dlp help");

        let mut child = builder
            .build_with_env(&self.env_vars)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&self.binary, e))?;

        let stdout = child.stdout.take().ok_or(Error::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(Error::MissingPipe("stderr"))?;

        let extracted = help::extract_options(stdout, stderr, layout).await;
        let status = child.wait().await?;
        let options = extracted?;

        if !status.success() {
            return Err(Error::CommandFailed {
                code: status.code().unwrap_or(-1),
                stderr: String::new()
            });
        }

        Ok(options)
    }

    pub async fn help_table(&self, layout: HelpLayout) -> Result<OptionTable> {
        Ok(OptionTable::new(self.help_options(layout).await?))
    }

    /// Runs yt-dlp to completion and returns its stdout.
    ///
    /// Fails on a non-zero exit or when anything was written to stderr.
    pub async fn run(&self, url: &str, args: &[String]) -> Result<String> {
        let builder = self.invocation(url, args);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "running yt-dlp"
        );

        let output = builder
            .build_with_env(&self.env_vars)
            .output()
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(Error::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr
            });
        }

        if !stderr.is_empty() {
            return Err(Error::Stderr(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Blocking counterpart of [`run`](Self::run); stderr is logged, not fatal.
    pub fn run_blocking(&self, url: &str, args: &[String]) -> Result<String> {
        let builder = self.invocation(url, args);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "running yt-dlp (blocking)"
        );

        let output = builder
            .build_blocking(&self.env_vars)
            .output()
            .map_err(|e| spawn_error(&self.binary, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(Error::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr
            });
        }

        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::warn!(line = %line, "yt-dlp stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Starts yt-dlp and hands back the running process with piped stdout and stderr.
    pub fn spawn(&self, url: &str, args: &[String]) -> Result<Child> {
        let builder = self.invocation(url, args);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "spawning yt-dlp"
        );

        builder
            .build_with_env(&self.env_vars)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&self.binary, e))
    }

    /// Streams stdout line by line while yt-dlp runs.
    ///
    /// Stderr lines are traced; a non-zero exit ends the stream with
    /// [`Error::CommandFailed`] carrying them.
    pub fn stream_lines(
        &self,
        url: &str,
        args: &[String]
    ) -> Pin<Box<dyn Stream<Item = Result<String>> + Send + 'static>> {
        let builder = self.invocation(url, args);
        let binary = self.binary.clone();
        let env_vars = self.env_vars.clone();

        Box::pin(async_stream::try_stream! {
            tracing::debug!(
                binary = %binary.display(),
                args = ?builder.get_args(),
                "spawning yt-dlp"
            );

            let mut cmd = builder.build_with_env(&env_vars);
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());

            let mut child = cmd.spawn().map_err(|e| spawn_error(&binary, e))?;

            let stderr = child.stderr.take().ok_or(Error::MissingPipe("stderr"))?;
            let stderr_task = tokio::spawn(async move {
                let mut collected = String::new();
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    tracing::trace!(line = %line, "yt-dlp stderr");
                    collected.push_str(&line);
                    collected.push('\n');
                }
                collected
            });

            let stdout = child.stdout.take().ok_or(Error::MissingPipe("stdout"))?;
            let mut reader = BufReader::new(stdout).lines();

            while let Some(line) = reader.next_line().await? {
                tracing::trace!(line = %line, "yt-dlp stdout");
                yield line;
            }

            let status = child.wait().await?;
            let stderr = stderr_task.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "yt-dlp stderr reader did not finish");
                String::new()
            });

            if !status.success() {
                Err::<(), _>(Error::CommandFailed {
                    code: status.code().unwrap_or(-1),
                    stderr
                })?;
            }
        })
    }

    fn invocation(&self, url: &str, args: &[String]) -> CommandBuilder {
        CommandBuilder::new(&self.binary)
            .url(url)
            .args(self.extra_args.iter().map(String::as_str))
            .args(args.iter().map(String::as_str))
    }
}

fn spawn_error(binary: &Path, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::BinaryNotFound(binary.to_path_buf())
    } else {
        Error::ExecutionFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_ytdlp_default() {
        let client = YtDlp::default();
        assert_eq!(client.binary, PathBuf::from("yt-dlp"));
        assert!(client.extra_args.is_empty());
    }

    #[test]
    fn test_ytdlp_with_binary() {
        let client = YtDlp::with_binary("/usr/local/bin/yt-dlp");
        assert_eq!(client.binary(), Path::new("/usr/local/bin/yt-dlp"));
    }

    #[test]
    fn test_ytdlp_for_platform() {
        let client = YtDlp::for_platform("bin", Platform::MacOs);
        assert_eq!(client.binary(), Path::new("bin").join("yt-dlp-macos"));
    }

    #[test]
    fn test_ytdlp_set_binary() {
        let mut client = YtDlp::new();
        client.set_binary(PathBuf::from("/opt/yt-dlp"));
        assert_eq!(client.binary, PathBuf::from("/opt/yt-dlp"));
    }

    #[test]
    fn test_invocation_order() {
        let mut client = YtDlp::new();
        client.set_extra_args(args(&["--no-colors"]));
        let builder = client.invocation("https://example.com/v", &args(&["--quiet"]));
        assert_eq!(builder.get_args(), &["https://example.com/v", "--no-colors", "--quiet"]);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let client = YtDlp::with_binary("/nonexistent/path/to/yt-dlp");
        assert!(matches!(client.check_binary().await, Err(Error::BinaryNotFound(_))));
        assert!(matches!(client.run("u", &[]).await, Err(Error::BinaryNotFound(_))));
        assert!(matches!(client.run_blocking("u", &[]), Err(Error::BinaryNotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_returns_stdout() {
        let client = YtDlp::with_binary("echo");
        let out = client.run("https://example.com/v", &args(&["--quiet"])).await.unwrap();
        assert_eq!(out, "https://example.com/v --quiet\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_fails_on_stderr() {
        let client = YtDlp::with_binary("sh");
        let result = client.run("-c", &args(&["echo oops >&2"])).await;
        assert!(matches!(result, Err(Error::Stderr(message)) if message.contains("oops")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_fails_on_blank_stderr() {
        let client = YtDlp::with_binary("sh");
        let result = client.run("-c", &args(&["echo out; echo >&2"])).await;
        assert!(matches!(result, Err(Error::Stderr(message)) if message == "\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_fails_on_exit_code() {
        let client = YtDlp::with_binary("sh");
        let result = client.run("-c", &args(&["exit 3"])).await;
        assert!(matches!(result, Err(Error::CommandFailed { code: 3, .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_env() {
        let mut client = YtDlp::with_binary("sh");
        client.set_env("YTDLP_WRAP_TEST".to_string(), "bar".to_string());
        let out = client.run("-c", &args(&["echo $YTDLP_WRAP_TEST"])).await.unwrap();
        assert_eq!(out.trim(), "bar");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_blocking() {
        let client = YtDlp::with_binary("sh");
        let out = client.run_blocking("-c", &args(&["echo out; echo note >&2"])).unwrap();
        assert_eq!(out, "out\n");

        let result = client.run_blocking("-c", &args(&["exit 2"]));
        assert!(matches!(result, Err(Error::CommandFailed { code: 2, .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_pipes_output() {
        let client = YtDlp::with_binary("echo");
        let child = client.spawn("https://example.com/v", &args(&["--no-mtime"])).unwrap();
        let output = child.wait_with_output().await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "https://example.com/v --no-mtime\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stream_lines() {
        let client = YtDlp::with_binary("sh");
        let mut stream = client.stream_lines("-c", &args(&["printf 'a\\nb\\n'"]));
        let mut lines = Vec::new();
        while let Some(line) = stream.next().await {
            lines.push(line.unwrap());
        }
        assert_eq!(lines, ["a", "b"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stream_lines_reports_failure() {
        let client = YtDlp::with_binary("sh");
        let mut stream = client.stream_lines("-c", &args(&["echo partial; echo bad >&2; exit 1"]));
        assert_eq!(stream.next().await.unwrap().unwrap(), "partial");
        match stream.next().await {
            Some(Err(Error::CommandFailed { code: 1, stderr })) => assert_eq!(stderr, "bad\n"),
            other => panic!("expected CommandFailed, got {other:?}")
        }
        assert!(stream.next().await.is_none());
    }
}
