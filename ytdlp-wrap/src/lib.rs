//! Typed bindings for the yt-dlp command-line tool.
//!
//! The crate reads yt-dlp's own `--help` listing into an [`OptionTable`],
//! formats option values back into command-line arguments, renders a typed
//! Rust client module from the table, and runs the binary buffered,
//! blocking, or streamed.
//!
//! # Example
//!
//! ```no_run
//! use ytdlp_wrap::{HelpLayout, OptionSet, Platform, Provisioner, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> ytdlp_wrap::Result<()> {
//!     let platform = Platform::current()?;
//!     let binary = Provisioner::new("bin").ensure(platform).await?;
//!     let client = YtDlp::with_binary(binary);
//!
//!     // Read the option listing from the binary itself
//!     let table = client.help_table(HelpLayout::default()).await?;
//!     println!("yt-dlp knows {} options", table.len());
//!
//!     // Format a configuration and run it
//!     let options = OptionSet::new().switch("no-mtime").value("format", "bestaudio");
//!     let args = table.format(&options)?;
//!     let stdout = client.run("https://www.youtube.com/watch?v=dQw4w9WgXcQ", &args).await?;
//!     println!("{stdout}");
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod codegen;
mod command;
pub mod error;
pub mod help;
pub mod platform;
pub mod provision;
mod table;
pub mod types;

pub use client::YtDlp;
pub use codegen::{ClientModule, render_client};
pub use command::{CommandBuilder, PATH_PREPEND};
pub use error::{Error, Result};
pub use help::{HelpExtractor, HelpLayout, HelpOption, extract_options, parse_help};
pub use platform::Platform;
pub use provision::{DEFAULT_RELEASE_URL, Provisioner};
pub use table::OptionTable;
pub use tokio::process::Child;
pub use types::{ArgValue, OptionSet, OptionValue, push_switch};
