use crate::cli::{Cli, Commands};
use crate::installers::Uv;
use crate::{Config, Environment};
use anyhow::Result;
use std::path::Path;

mod install;
mod install_group;
mod list;
mod remove;
mod remove_group;

/// Configuration document consulted for tool groups.
const CONFIG_FILE: &str = "pyproject.toml";

pub fn execute(cli: Cli) -> Result<()> {
    // Environment and configuration problems surface here, before any
    // package-tool invocation.
    let environment = Environment::discover()?;
    let config = Config::load(Path::new(CONFIG_FILE))?;
    let backend = Uv::new(environment.data_dir());

    match cli.command {
        Commands::Install { tool, dependencies } => {
            install::execute(&backend, tool, dependencies)
        }

        Commands::Remove { tool } => remove::execute(&backend, tool),

        Commands::InstallGroup { groups } => install_group::execute(&backend, &config, groups),

        Commands::RemoveGroup { groups } => remove_group::execute(&backend, &config, groups),

        Commands::List => list::execute(&backend),
    }
}
