//! Extraction of option descriptors from `yt-dlp --help` output.
//!
//! The help listing is laid out by indentation: section headings sit at a
//! shallow depth, option definitions one level deeper, and wrapped
//! description lines further right. [`HelpExtractor`] scans that layout line
//! by line and can be fed arbitrary chunks as they arrive from a child
//! process.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

const LONG_FLAG: &str = "--";
const READ_CHUNK: usize = 8 * 1024;

/// One flag surfaced by the help listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpOption {
    /// Flag name without the leading `--`, as printed (e.g. `ignore-errors`).
    pub name: String,
    /// Value placeholders (e.g. `URL`); empty for boolean switches.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub description: String
}

impl HelpOption {
    pub fn takes_value(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn flag(&self) -> String {
        format!("{LONG_FLAG}{}", self.name)
    }
}

/// Indentation depths that give a help line its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLayout {
    pub section_depth: usize,
    pub option_depth: usize
}

impl Default for HelpLayout {
    fn default() -> Self {
        Self {
            section_depth: 2,
            option_depth: 4
        }
    }
}

/// Incremental help-text scanner.
///
/// Chunks may split lines (or multi-byte characters) anywhere; only complete
/// lines are scanned and the remainder is carried to the next [`feed`](Self::feed).
#[derive(Debug, Default)]
pub struct HelpExtractor {
    layout: HelpLayout,
    completed: Vec<HelpOption>,
    current: Option<HelpOption>,
    pending: Vec<u8>
}

impl HelpExtractor {
    pub fn new(layout: HelpLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return;
        };

        let rest = self.pending.split_off(last_newline + 1);
        let mut complete = std::mem::replace(&mut self.pending, rest);
        complete.pop();

        for line in complete.split(|&b| b == b'\n') {
            self.feed_line(&String::from_utf8_lossy(line));
        }
    }

    pub fn feed_line(&mut self, line: &str) {
        let depth = line.chars().take_while(|c| c.is_whitespace()).count();
        let line = line.trim();

        if line.is_empty() || depth == self.layout.section_depth {
            self.flush();
            return;
        }

        if depth == self.layout.option_depth
            && let Some(option) = parse_option_line(line)
        {
            self.flush();
            self.current = Some(option);
            return;
        }

        match self.current.as_mut() {
            Some(option) => {
                option.description.push(' ');
                option.description.push_str(line);
            }
            None => tracing::trace!(line = %line, "skipping help line outside any option")
        }
    }

    /// Scans any buffered partial line and returns every option in encounter order.
    pub fn finish(mut self) -> Vec<HelpOption> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.feed_line(&String::from_utf8_lossy(&tail));
        }
        self.flush();
        self.completed
    }

    fn flush(&mut self) {
        if let Some(option) = self.current.take() {
            self.completed.push(option);
        }
    }
}

fn parse_option_line(line: &str) -> Option<HelpOption> {
    let (_, rest) = line.split_once(LONG_FLAG)?;
    let (name, rest) = rest.split_once(' ').unwrap_or((rest, ""));

    let (args, description) = if rest.starts_with(char::is_whitespace) {
        ("", rest)
    } else {
        rest.split_once("  ").unwrap_or((rest, ""))
    };

    Some(HelpOption {
        name: name.to_string(),
        args: args
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        description: description.trim().to_string()
    })
}

/// Parses a complete help listing with the default layout.
pub fn parse_help(text: &str) -> Vec<HelpOption> {
    let mut extractor = HelpExtractor::new(HelpLayout::default());
    extractor.feed(text.as_bytes());
    extractor.finish()
}

/// Drives an extractor from a running process's output streams.
///
/// Both streams are read to completion concurrently. Any text on `stderr`
/// fails the whole extraction and no options are returned.
pub async fn extract_options<O, E>(
    mut stdout: O,
    mut stderr: E,
    layout: HelpLayout
) -> Result<Vec<HelpOption>>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin
{
    let mut extractor = HelpExtractor::new(layout);

    let read_stdout = async {
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = stdout.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            extractor.feed(&buf[..n]);
        }
        Ok::<_, std::io::Error>(())
    };

    let read_stderr = async {
        let mut errors = Vec::new();
        stderr.read_to_end(&mut errors).await?;
        Ok::<_, std::io::Error>(errors)
    };

    let ((), errors) = tokio::try_join!(read_stdout, read_stderr)?;

    if !errors.is_empty() {
        return Err(Error::HelpFailed(String::from_utf8_lossy(&errors).into_owned()));
    }

    let options = extractor.finish();
    tracing::debug!(count = options.len(), "extracted options from help text");
    Ok(options)
}
