use anyhow::Result;

use crate::config::Tool;
use crate::installers::{Installer, PackageTool};

pub fn execute<T: PackageTool>(backend: &T, tool: String, dependencies: Vec<String>) -> Result<()> {
    let mut installer = Installer::new(backend)?;
    installer.install(&Tool::new(tool, dependencies))
}
