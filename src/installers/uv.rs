use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use super::PackageTool;

/// Backend that shells out to `uv tool` subcommands.
///
/// `uv` derives its tool directory from `XDG_DATA_HOME`, which every
/// invocation points at the project-local data directory so installs stay
/// inside the project environment.
pub struct Uv {
    data_dir: PathBuf,
}

impl Uv {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new("uv");
        command.env("XDG_DATA_HOME", &self.data_dir).args(args);
        command
    }

    fn run(&self, args: &[String]) -> Result<()> {
        debug!(args = %args.join(" "), "running uv");
        let status = self
            .command(args)
            .status()
            .with_context(|| format!("Failed to run `uv {}`", args.join(" ")))?;

        if !status.success() {
            bail!("`uv {}` exited with {}", args.join(" "), status);
        }

        Ok(())
    }

    fn run_capture(&self, args: &[String]) -> Result<String> {
        debug!(args = %args.join(" "), "running uv");
        let output = self
            .command(args)
            .output()
            .with_context(|| format!("Failed to run `uv {}`", args.join(" ")))?;

        if !output.status.success() {
            bail!("`uv {}` exited with {}", args.join(" "), output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PackageTool for Uv {
    fn list_installed(&self) -> Result<Vec<String>> {
        let stdout = self.run_capture(&string_args(&["tool", "list"]))?;
        Ok(parse_tool_list(&stdout))
    }

    fn install(&self, name: &str, extras: &[String]) -> Result<()> {
        self.run(&install_args(name, extras))
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.run(&string_args(&["tool", "uninstall", name]))
    }
}

fn string_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

/// Argument list for `uv tool install`, one `--with` per overlay dependency.
fn install_args(name: &str, extras: &[String]) -> Vec<String> {
    let mut args = string_args(&["tool", "install"]);

    for extra in extras {
        args.push("--with".to_string());
        args.push(extra.clone());
    }

    args.push(name.to_string());
    args
}

/// Extract tool names from `uv tool list` output.
///
/// Each tool line leads with the tool name and version; indented `- name`
/// continuation lines list the tool's executables and are skipped.
fn parse_tool_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_args_layer_extras_before_the_tool() {
        let args = install_args(
            "mypy",
            &["types-toml".to_string(), "types-requests".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "tool",
                "install",
                "--with",
                "types-toml",
                "--with",
                "types-requests",
                "mypy",
            ]
        );
    }

    #[test]
    fn install_args_without_extras() {
        assert_eq!(install_args("ruff", &[]), vec!["tool", "install", "ruff"]);
    }

    #[test]
    fn parse_tool_list_skips_executable_lines() {
        let output = "ruff v0.6.2\n- ruff\nmypy v1.11.1\n- dmypy\n- mypy\n";
        assert_eq!(parse_tool_list(output), vec!["ruff", "mypy"]);
    }

    #[test]
    fn parse_tool_list_handles_empty_output() {
        assert!(parse_tool_list("").is_empty());
        assert!(parse_tool_list("\n\n").is_empty());
    }
}
