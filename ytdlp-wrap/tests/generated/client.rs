// @generated by ytdlp-gen from `yt-dlp --help`. Do not edit by hand.

use ytdlp_wrap::{ArgValue, Child, Result, YtDlp, push_switch};

/// Command-line options accepted by yt-dlp, in help-text order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Print this help text and exit
    pub help: bool,
    /// Resume partially downloaded files
    pub r#continue: bool,
    /// Use the specified HTTP/HTTPS/SOCKS proxy
    ///
    /// Takes `URL`.
    pub proxy: Option<ArgValue>,
    /// Set an extended attribute
    ///
    /// Takes `NAME VALUE`.
    pub xattr_set: Option<ArgValue>,
    /// Passes `--no-mtime`.
    pub no_mtime: bool,
}

impl Options {
    /// Formats the options as command-line arguments, in help-text order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        push_switch("--help", self.help, &mut args);
        push_switch("--continue", self.r#continue, &mut args);
        if let Some(value) = &self.proxy {
            value.push_to("--proxy", &mut args);
        }
        if let Some(value) = &self.xattr_set {
            value.push_to("--xattr-set", &mut args);
        }
        push_switch("--no-mtime", self.no_mtime, &mut args);
        args
    }
}

/// Runs yt-dlp on `url` and resolves to its standard output once it exits.
pub async fn ytdlp(client: &YtDlp, url: &str, options: &Options) -> Result<String> {
    client.run(url, &options.to_args()).await
}

/// Runs yt-dlp on `url`, blocking the current thread until it exits.
pub fn ytdlp_sync(client: &YtDlp, url: &str, options: &Options) -> Result<String> {
    client.run_blocking(url, &options.to_args())
}

/// Starts yt-dlp on `url` and returns the running process with piped output.
pub fn ytdlp_stream(client: &YtDlp, url: &str, options: &Options) -> Result<Child> {
    client.spawn(url, &options.to_args())
}
