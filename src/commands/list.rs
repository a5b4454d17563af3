use anyhow::Result;

use crate::installers::PackageTool;

pub fn execute<T: PackageTool>(backend: &T) -> Result<()> {
    for name in backend.list_installed()? {
        println!("{name}");
    }

    Ok(())
}
