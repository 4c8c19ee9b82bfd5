use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Environment key whose value is prepended to the child's `PATH`.
pub const PATH_PREPEND: &str = "PATH_PREPEND";

const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

#[derive(Debug, Clone)]
pub struct CommandBuilder {
    binary: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn url(self, url: impl Into<String>) -> Self {
        self.arg(url)
    }

    pub fn help(self) -> Self {
        self.arg("--help")
    }

    pub fn version(self) -> Self {
        self.arg("--version")
    }

    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        cmd
    }

    pub fn build_with_env(&self, env_vars: &HashMap<String, String>) -> Command {
        let mut cmd = self.build();
        cmd.envs(resolve_env(env_vars));
        cmd
    }

    pub fn build_blocking(&self, env_vars: &HashMap<String, String>) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.binary);
        cmd.args(&self.args);
        cmd.envs(resolve_env(env_vars));
        cmd
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

fn resolve_env(env_vars: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut vars = Vec::with_capacity(env_vars.len());

    if let Some(path_prepend) = env_vars.get(PATH_PREPEND) {
        let current_path = std::env::var("PATH").unwrap_or_default();
        vars.push(("PATH".to_string(), format!("{path_prepend}{PATH_SEPARATOR}{current_path}")));
    }

    for (key, value) in env_vars {
        if key != PATH_PREPEND {
            vars.push((key.clone(), value.clone()));
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_basic() {
        let builder = CommandBuilder::new("yt-dlp")
            .version();
        assert_eq!(builder.get_args(), &["--version"]);
        assert_eq!(builder.binary(), Path::new("yt-dlp"));
    }

    #[test]
    fn test_command_builder_url_then_options() {
        let builder = CommandBuilder::new("yt-dlp")
            .url("https://example.com/video")
            .args(["--proxy", "socks5://127.0.0.1:1080"])
            .arg("--no-mtime");
        assert_eq!(builder.get_args(), &[
            "https://example.com/video",
            "--proxy", "socks5://127.0.0.1:1080",
            "--no-mtime"
        ]);
    }

    #[test]
    fn test_build_blocking_keeps_args() {
        let cmd = CommandBuilder::new("yt-dlp")
            .help()
            .build_blocking(&HashMap::new());
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, ["--help"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_with_env_path_prepend() {
        let mut env_vars = HashMap::new();
        env_vars.insert(PATH_PREPEND.to_string(), "/opt/bin".to_string());
        env_vars.insert("LC_ALL".to_string(), "C".to_string());
        let builder = CommandBuilder::new("echo")
            .arg("test");
        let cmd = builder.build_with_env(&env_vars);
        let cmd_ref = cmd.as_std();
        let envs: HashMap<_, _> = cmd_ref.get_envs()
            .filter_map(|(k, v)| Some((k.to_string_lossy().to_string(), v?.to_string_lossy().to_string())))
            .collect();
        assert!(envs.get("PATH").unwrap().starts_with("/opt/bin:"));
        assert_eq!(envs.get("LC_ALL").map(String::as_str), Some("C"));
        assert!(!envs.contains_key(PATH_PREPEND));
    }
}
