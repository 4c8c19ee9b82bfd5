// @generated by ytdlp-gen from `{{ source }}`. Do not edit by hand.

use ytdlp_wrap::{ArgValue, Child, Result, YtDlp, push_switch};

/// Command-line options accepted by yt-dlp, in help-text order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
{%- for field in fields %}
    /// {{ field.doc }}
{%- if field.takes_value %}
    ///
    /// Takes `{{ field.placeholders }}`.
{%- endif %}
    pub {{ field.ident }}: {{ field.ty() }},
{%- endfor %}
}

impl Options {
    /// Formats the options as command-line arguments, in help-text order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
{%- for field in fields %}
{%- if field.takes_value %}
        if let Some(value) = &self.{{ field.ident }} {
            value.push_to("{{ field.flag }}", &mut args);
        }
{%- else %}
        push_switch("{{ field.flag }}", self.{{ field.ident }}, &mut args);
{%- endif %}
{%- endfor %}
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
