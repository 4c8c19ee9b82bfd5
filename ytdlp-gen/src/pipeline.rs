use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::fs;
use ytdlp_wrap::{HelpLayout, OptionTable, Platform, Provisioner, YtDlp, parse_help, render_client};

use crate::cli::{DownloadArgs, GenerateArgs, GlobalArgs, ParseArgs};

/// Resolved settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Config {
    pub bin_dir: PathBuf,
    pub release_url: String
}

impl From<GlobalArgs> for Config {
    fn from(args: GlobalArgs) -> Self {
        Self {
            bin_dir: args.bin_dir,
            release_url: args.release_url
        }
    }
}

impl Config {
    fn provisioner(&self) -> Provisioner {
        Provisioner::new(&self.bin_dir).with_release_url(&self.release_url)
    }
}

pub async fn download(config: &Config, args: DownloadArgs) -> Result<()> {
    let provisioner = config.provisioner();

    let paths = if args.all {
        provisioner.download_all().await?
    } else {
        let platform = match args.platform {
            Some(platform) => platform,
            None => Platform::current()?
        };
        vec![provisioner.download(platform).await?]
    };

    for path in paths {
        tracing::info!("downloaded {}", path.display());
    }

    Ok(())
}

pub async fn parse(config: &Config, args: ParseArgs) -> Result<()> {
    let table = match args.input {
        Some(ref input) => {
            let text = fs::read_to_string(input)
                .await
                .with_context(|| format!("failed to read help text from {}", input.display()))?;
            OptionTable::new(parse_help(&text))
        }
        None => {
            let client = provisioned_client(config, false).await?;
            client.help_table(HelpLayout::default()).await?
        }
    };

    tracing::info!("extracted {} options", table.len());

    let json = table.to_json_pretty()?;
    match args.output {
        Some(path) => write_file(&path, &json).await?,
        None => println!("{json}")
    }

    Ok(())
}

pub async fn generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let (table, version) = match args.snapshot {
        Some(ref snapshot) => {
            let json = fs::read_to_string(snapshot)
                .await
                .with_context(|| format!("failed to read snapshot {}", snapshot.display()))?;
            (OptionTable::from_json(&json)?, None)
        }
        None => {
            let client = provisioned_client(config, args.skip_download).await?;
            let version = client
                .check_binary()
                .await
                .context("yt-dlp is not runnable")?;
            tracing::info!("yt-dlp version: {}", version);
            (client.help_table(HelpLayout::default()).await?, Some(version))
        }
    };

    if table.is_empty() {
        bail!("no options were extracted from the help listing");
    }

    tracing::info!("generating bindings for {} options", table.len());

    if let Some(ref path) = args.write_snapshot {
        write_file(path, &table.to_json_pretty()?).await?;
    }

    let source = render_client(&table, version.as_deref())?;
    write_file(&args.output, &source).await?;

    tracing::info!("wrote {}", args.output.display());

    Ok(())
}

async fn provisioned_client(config: &Config, skip_download: bool) -> Result<YtDlp> {
    let platform = Platform::current()?;

    let binary = if skip_download {
        platform.binary_path(&config.bin_dir)
    } else {
        config.provisioner().ensure(platform).await?
    };

    Ok(YtDlp::with_binary(binary))
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELP: &str = "  General Options:\n    -h, --help  Print this help text and exit\n    --proxy URL  Use the specified proxy\n";

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ytdlp-gen-{name}-{}", std::process::id()))
    }

    fn config(dir: &Path) -> Config {
        Config {
            bin_dir: dir.join("bin"),
            release_url: "http://127.0.0.1:9/".to_string()
        }
    }

    #[tokio::test]
    async fn test_parse_from_input_file() {
        let dir = scratch_dir("parse");
        fs::create_dir_all(&dir).await.unwrap();
        let input = dir.join("help.txt");
        let output = dir.join("out/table.json");
        fs::write(&input, HELP).await.unwrap();

        parse(&config(&dir), ParseArgs {
            input: Some(input),
            output: Some(output.clone())
        })
        .await
        .unwrap();

        let table = OptionTable::from_json(&fs::read_to_string(&output).await.unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("proxy").unwrap().args, ["URL"]);

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_from_snapshot() {
        let dir = scratch_dir("generate");
        fs::create_dir_all(&dir).await.unwrap();
        let snapshot = dir.join("table.json");
        let output = dir.join("src/generated.rs");
        let table = OptionTable::new(parse_help(HELP));
        fs::write(&snapshot, table.to_json_pretty().unwrap()).await.unwrap();

        generate(&config(&dir), GenerateArgs {
            output: output.clone(),
            snapshot: Some(snapshot),
            write_snapshot: None,
            skip_download: false
        })
        .await
        .unwrap();

        let source = fs::read_to_string(&output).await.unwrap();
        assert!(source.contains("pub help: bool,"));
        assert!(source.contains("pub proxy: Option<ArgValue>,"));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_table() {
        let dir = scratch_dir("empty");
        fs::create_dir_all(&dir).await.unwrap();
        let snapshot = dir.join("table.json");
        fs::write(&snapshot, "[]").await.unwrap();

        let result = generate(&config(&dir), GenerateArgs {
            output: dir.join("generated.rs"),
            snapshot: Some(snapshot),
            write_snapshot: None,
            skip_download: false
        })
        .await;
        assert!(result.is_err());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_skip_download_without_binary() {
        let dir = scratch_dir("nobinary");

        let result = generate(&config(&dir), GenerateArgs {
            output: dir.join("generated.rs"),
            snapshot: None,
            write_snapshot: None,
            skip_download: true
        })
        .await;
        assert!(result.is_err());
    }
}
