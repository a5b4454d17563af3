// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod config;
mod environment;
mod installers;
mod resolver;
mod ui;

// Re-export main types
pub use config::{Config, GroupEntry, SchemaError, Tool, ToolGroup, DEFAULT_GROUP};
pub use environment::Environment;
pub use installers::{Installer, PackageTool, Uv};
pub use resolver::{resolve, ResolveError, ResolvedSet};
