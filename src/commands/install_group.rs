use anyhow::Result;

use crate::config::DEFAULT_GROUP;
use crate::installers::{Installer, PackageTool};
use crate::resolver;
use crate::Config;

pub fn execute<T: PackageTool>(backend: &T, config: &Config, groups: Vec<String>) -> Result<()> {
    let requested = if groups.is_empty() {
        vec![DEFAULT_GROUP.to_string()]
    } else {
        groups
    };

    // Resolution happens in full before the first install, so a bad group
    // name never leaves a partial batch behind.
    let tools = resolver::resolve(&requested, config.groups(), config.ungrouped())?;

    let mut installer = Installer::new(backend)?;
    installer.install_set(&tools)
}
