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

    let tools = resolver::resolve(&requested, config.groups(), config.ungrouped())?;

    let mut installer = Installer::new(backend)?;
    installer.remove_set(&tools)
}
