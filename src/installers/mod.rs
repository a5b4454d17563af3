use anyhow::{bail, Result};

use crate::config::Tool;
use crate::resolver::ResolvedSet;
use crate::ui;

mod uv;
pub use uv::Uv;

/// Narrow synchronous interface to the external package tool.
///
/// `extras` on install are runtime-only packages layered on top of the named
/// tool's own install; they never change the tool's declared dependencies.
pub trait PackageTool {
    /// Names of currently installed tools.
    fn list_installed(&self) -> Result<Vec<String>>;

    /// Install a tool, with `extras` layered into its environment.
    fn install(&self, name: &str, extras: &[String]) -> Result<()>;

    /// Uninstall a tool by name.
    fn remove(&self, name: &str) -> Result<()>;
}

/// Drives install/remove batches against a backend, one tool at a time.
///
/// The installed-tool snapshot is taken once on construction and kept
/// current across the batch, so repeated operations in one run are skipped
/// with a notice instead of re-invoking the package tool.
pub struct Installer<'a, T: PackageTool> {
    backend: &'a T,
    installed: Vec<String>,
}

impl<'a, T: PackageTool> Installer<'a, T> {
    pub fn new(backend: &'a T) -> Result<Self> {
        let installed = backend.list_installed()?;
        Ok(Self { backend, installed })
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|tool| tool == name)
    }

    /// Install one tool; an already-installed tool is skipped with a notice.
    pub fn install(&mut self, tool: &Tool) -> Result<()> {
        if self.is_installed(&tool.name) {
            ui::info(format!("Tool {} already installed", tool));
            return Ok(());
        }

        let progress = ui::Progress::new("Installing", tool.name.clone());
        match self.backend.install(&tool.name, &tool.dependencies) {
            Ok(()) => {
                progress.success("Installed");
                self.installed.push(tool.name.clone());
                Ok(())
            }
            Err(error) => {
                progress.fail("Failed", &error);
                Err(error)
            }
        }
    }

    /// Uninstall one tool; a tool that is not installed is skipped with a notice.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if !self.is_installed(name) {
            ui::warn(format!("Tool {name} not installed"));
            return Ok(());
        }

        let progress = ui::Progress::new("Removing", name.to_string());
        match self.backend.remove(name) {
            Ok(()) => {
                progress.success("Removed");
                self.installed.retain(|tool| tool != name);
                Ok(())
            }
            Err(error) => {
                progress.fail("Failed", &error);
                Err(error)
            }
        }
    }

    /// Install every tool in the set, in emission order.
    ///
    /// A failing tool does not stop the batch; the run fails at the end
    /// naming every tool that could not be installed.
    pub fn install_set(&mut self, tools: &ResolvedSet) -> Result<()> {
        let mut failures = Vec::new();

        for tool in tools {
            if self.install(tool).is_err() {
                failures.push(tool.name.clone());
            }
        }

        finish_batch("install", failures)
    }

    /// Uninstall every tool in the set, in emission order.
    pub fn remove_set(&mut self, tools: &ResolvedSet) -> Result<()> {
        let mut failures = Vec::new();

        for tool in tools {
            if self.remove(&tool.name).is_err() {
                failures.push(tool.name.clone());
            }
        }

        finish_batch("remove", failures)
    }
}

fn finish_batch(operation: &str, failures: Vec<String>) -> Result<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        bail!(
            "Failed to {} {} tool(s): {}",
            operation,
            failures.len(),
            failures.join(", ")
        );
    }
}
