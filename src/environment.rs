use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local environment that backs tool installs.
///
/// Tools live under the data directory of the project's virtual environment
/// (`$UV_PROJECT_ENVIRONMENT`, default `./.venv`) rather than the user-wide
/// tool directory, so every project keeps its own tool set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    venv_dir: PathBuf,
    data_dir: PathBuf,
}

impl Environment {
    /// Discover the environment for the current working directory.
    pub fn discover() -> Result<Self> {
        let venv_dir = match env::var_os("UV_PROJECT_ENVIRONMENT") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()
                .context("Failed to determine current directory")?
                .join(".venv"),
        };

        Self::from_venv(venv_dir)
    }

    /// Build the environment rooted at an existing virtual environment.
    pub fn from_venv(venv_dir: PathBuf) -> Result<Self> {
        if !venv_dir.is_dir() {
            bail!(
                "No virtual environment at {}; create one with `uv venv` first",
                venv_dir.display()
            );
        }

        let data_dir = venv_dir.join("share");
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        Ok(Self { venv_dir, data_dir })
    }

    /// Data directory handed to the package tool via `XDG_DATA_HOME`.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Root of the virtual environment.
    pub fn venv_dir(&self) -> &Path {
        &self.venv_dir
    }
}
