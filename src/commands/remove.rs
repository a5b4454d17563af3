use anyhow::Result;

use crate::installers::{Installer, PackageTool};

pub fn execute<T: PackageTool>(backend: &T, tool: String) -> Result<()> {
    let mut installer = Installer::new(backend)?;
    installer.remove(&tool)
}
