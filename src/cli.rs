use clap::{Parser, Subcommand};

/// uvkit - Declarative tool groups for uv
///
/// uvkit installs command-line tools with uv from groups declared in
/// `pyproject.toml` (`[tool.uvkit]`). Groups may include other groups;
/// resolution flattens them into a deduplicated install set scoped to the
/// project's virtual environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a single tool
    Install {
        /// Tool to install (package spec, version constraints allowed)
        #[arg(value_name = "TOOL")]
        tool: String,

        /// Extra packages layered into the tool's environment
        #[arg(value_name = "DEPENDENCIES")]
        dependencies: Vec<String>,
    },

    /// Uninstall a single tool
    Remove {
        /// Tool to uninstall
        #[arg(value_name = "TOOL")]
        tool: String,
    },

    /// Resolve groups and install their tools
    ///
    /// The ungrouped `tools` list is always merged in; with no groups named,
    /// only the ungrouped list is installed.
    InstallGroup {
        /// Groups to resolve
        #[arg(value_name = "GROUP")]
        groups: Vec<String>,
    },

    /// Resolve groups and uninstall their tools
    RemoveGroup {
        /// Groups to resolve
        #[arg(value_name = "GROUP")]
        groups: Vec<String>,
    },

    /// List installed tools
    List,
}
