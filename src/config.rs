use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the group assembled from the top-level `tools` list.
pub const DEFAULT_GROUP: &str = "default";

/// Structural errors raised while validating the `[tool.uvkit]` table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A section or field has the wrong TOML type.
    #[error("`{key}` must be {expected}")]
    WrongType { key: String, expected: &'static str },

    /// A group entry that is neither a package spec nor a recognized table shape.
    #[error("`{key}` must be a package string or a table with a `name` or `include` key")]
    UnknownEntryShape { key: String },

    /// Package specs and group names must be non-empty.
    #[error("`{key}` must be a non-empty string")]
    EmptyString { key: String },

    /// Includes only make sense as references into the groups table.
    #[error("`{key}`: includes are not allowed in the top-level `tools` list")]
    IncludeNotAllowed { key: String },

    /// The `default` group name is taken by the top-level `tools` list.
    #[error("group `default` conflicts with the top-level `tools` list")]
    ReservedGroupName,
}

/// A single installable tool with its overlay dependencies.
///
/// The name is an opaque package spec (version constraints allowed) and the
/// dependencies are extra packages layered into the tool's environment at
/// install time. Identity is the full value: the same name with different
/// dependencies is a different tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tool {
    pub name: String,
    pub dependencies: Vec<String>,
}

impl Tool {
    pub fn new(name: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            dependencies,
        }
    }

    /// A tool with no overlay dependencies.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One entry of a tool group, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEntry {
    Tool(Tool),
    /// Reference to another group, expanded in place during resolution.
    Include(String),
}

/// An ordered list of tools and group references.
pub type ToolGroup = Vec<GroupEntry>;

/// Whether a list being normalized may contain `include` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncludePolicy {
    Allowed,
    Forbidden,
}

/// Outer layer of `pyproject.toml`; only the `[tool]` table is consulted.
#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: BTreeMap<String, toml::Value>,
}

/// Tool groups loaded from the `[tool.uvkit]` table of `pyproject.toml`.
///
/// The top-level `tools` list becomes the distinguished `default` group;
/// the keyed `groups` table holds every other group. Group entries are
/// validated and normalized up front so resolution never sees raw TOML.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ungrouped tools from the top-level `tools` list.
    tools: Vec<Tool>,
    /// All groups, including `default`.
    groups: BTreeMap<String, ToolGroup>,
}

impl Default for Config {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(DEFAULT_GROUP.to_string(), ToolGroup::new());
        Self {
            tools: Vec::new(),
            groups,
        }
    }
}

impl Config {
    /// Load tool groups from a `pyproject.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        Self::parse(&contents).with_context(|| format!("Invalid configuration in {:?}", path))
    }

    /// Parse tool groups out of a `pyproject.toml` document.
    ///
    /// A document without a `[tool.uvkit]` table is not an error and yields
    /// an empty configuration.
    pub fn parse(contents: &str) -> Result<Self> {
        let document: PyProject =
            toml::from_str(contents).context("Failed to parse TOML document")?;

        let Some(section) = document.tool.get("uvkit") else {
            return Ok(Self::default());
        };

        let section = section.as_table().ok_or_else(|| SchemaError::WrongType {
            key: "tool.uvkit".to_string(),
            expected: "a table",
        })?;

        Ok(Self::from_section(section)?)
    }

    /// Validate and normalize the `[tool.uvkit]` table itself.
    pub fn from_section(section: &toml::Table) -> Result<Self, SchemaError> {
        let mut groups = BTreeMap::new();

        if let Some(raw_groups) = section.get("groups") {
            let raw_groups = raw_groups.as_table().ok_or_else(|| SchemaError::WrongType {
                key: "groups".to_string(),
                expected: "a table of group name to tool list",
            })?;

            for (name, value) in raw_groups {
                let key = format!("groups.{name}");
                groups.insert(name.clone(), parse_group(&key, value, IncludePolicy::Allowed)?);
            }
        }

        let mut tools = Vec::new();

        match section.get("tools") {
            Some(raw_tools) => {
                if groups.contains_key(DEFAULT_GROUP) {
                    return Err(SchemaError::ReservedGroupName);
                }

                let group = parse_group("tools", raw_tools, IncludePolicy::Forbidden)?;
                tools = group
                    .iter()
                    .filter_map(|entry| match entry {
                        GroupEntry::Tool(tool) => Some(tool.clone()),
                        GroupEntry::Include(_) => None,
                    })
                    .collect();
                groups.insert(DEFAULT_GROUP.to_string(), group);
            }
            None => {
                // Keep `default` resolvable even when no ungrouped list exists.
                groups.entry(DEFAULT_GROUP.to_string()).or_default();
            }
        }

        Ok(Self { tools, groups })
    }

    /// All groups by name, `default` included.
    pub fn groups(&self) -> &BTreeMap<String, ToolGroup> {
        &self.groups
    }

    /// Tools from the top-level `tools` list, merged into every resolution.
    pub fn ungrouped(&self) -> &[Tool] {
        &self.tools
    }
}

/// Validate one group list and normalize every entry.
fn parse_group(
    key: &str,
    value: &toml::Value,
    includes: IncludePolicy,
) -> Result<ToolGroup, SchemaError> {
    let entries = value.as_array().ok_or_else(|| SchemaError::WrongType {
        key: key.to_string(),
        expected: "a list of tool entries",
    })?;

    let mut group = ToolGroup::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let entry_key = format!("{key}[{index}]");
        let parsed = parse_entry(&entry_key, entry)?;

        if includes == IncludePolicy::Forbidden && matches!(parsed, GroupEntry::Include(_)) {
            return Err(SchemaError::IncludeNotAllowed { key: entry_key });
        }

        group.push(parsed);
    }

    Ok(group)
}

/// Classify one raw group entry into its typed representation.
///
/// Recognized shapes: a bare package string, `{ include = "group" }`, and
/// `{ name = "pkg", dependencies = ["spec", ...] }` with `dependencies`
/// optional. An `include` key wins when both are present.
fn parse_entry(key: &str, value: &toml::Value) -> Result<GroupEntry, SchemaError> {
    if let Some(spec) = value.as_str() {
        return Ok(GroupEntry::Tool(Tool::bare(non_empty(key, spec)?)));
    }

    let Some(table) = value.as_table() else {
        return Err(SchemaError::UnknownEntryShape {
            key: key.to_string(),
        });
    };

    if let Some(target) = table.get("include") {
        let target_key = format!("{key}.include");
        let target = target.as_str().ok_or_else(|| SchemaError::WrongType {
            key: target_key.clone(),
            expected: "a group name string",
        })?;
        return Ok(GroupEntry::Include(
            non_empty(&target_key, target)?.to_string(),
        ));
    }

    if let Some(name) = table.get("name") {
        let name_key = format!("{key}.name");
        let name = name.as_str().ok_or_else(|| SchemaError::WrongType {
            key: name_key.clone(),
            expected: "a package spec string",
        })?;
        let name = non_empty(&name_key, name)?;

        let dependencies = match table.get("dependencies") {
            Some(deps) => parse_dependencies(&format!("{key}.dependencies"), deps)?,
            None => Vec::new(),
        };

        return Ok(GroupEntry::Tool(Tool::new(name, dependencies)));
    }

    Err(SchemaError::UnknownEntryShape {
        key: key.to_string(),
    })
}

fn parse_dependencies(key: &str, value: &toml::Value) -> Result<Vec<String>, SchemaError> {
    let items = value.as_array().ok_or_else(|| SchemaError::WrongType {
        key: key.to_string(),
        expected: "a list of strings",
    })?;

    let mut dependencies = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let item_key = format!("{key}[{index}]");
        let spec = item.as_str().ok_or_else(|| SchemaError::WrongType {
            key: item_key.clone(),
            expected: "a string",
        })?;
        dependencies.push(non_empty(&item_key, spec)?.to_string());
    }

    Ok(dependencies)
}

fn non_empty<'a>(key: &str, value: &'a str) -> Result<&'a str, SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::EmptyString {
            key: key.to_string(),
        })
    } else {
        Ok(value)
    }
}
