use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::config::{GroupEntry, Tool, ToolGroup};

/// Fatal errors raised while flattening group references.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A requested or included group name has no definition.
    #[error("group `{0}` is not defined in the configuration")]
    UnknownGroup(String),
}

/// Deduplicated set of tools in first-encountered order.
///
/// Membership is by full tool value, so the same package name with two
/// different dependency lists yields two members. Iteration order is the
/// order tools were first inserted, which keeps the install command
/// sequence reproducible for the same configuration.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet {
    tools: Vec<Tool>,
    seen: HashSet<Tool>,
}

impl ResolvedSet {
    /// Add a tool; inserting an already-present value is a no-op.
    fn insert(&mut self, tool: Tool) -> bool {
        if self.seen.contains(&tool) {
            return false;
        }

        self.seen.insert(tool.clone());
        self.tools.push(tool);
        true
    }

    /// Iterate tools in first-encountered order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn contains(&self, tool: &Tool) -> bool {
        self.seen.contains(tool)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedSet {
    type Item = &'a Tool;
    type IntoIter = std::slice::Iter<'a, Tool>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.iter()
    }
}

/// Flatten the requested groups into a deduplicated tool set.
///
/// The seed tools are merged unconditionally before any group expands.
/// Each requested group is walked in declaration order; `include` entries
/// recurse into the referenced group. The visited set spans the whole
/// call, so a group reached twice - directly, via repeated requests, or
/// through an include cycle - expands exactly once.
///
/// An unknown group name, requested or included, aborts resolution.
pub fn resolve(
    requested: &[String],
    groups: &BTreeMap<String, ToolGroup>,
    seed: &[Tool],
) -> Result<ResolvedSet, ResolveError> {
    let mut resolved = ResolvedSet::default();
    for tool in seed {
        resolved.insert(tool.clone());
    }

    let mut visited = HashSet::new();
    for name in requested {
        expand(name, groups, &mut visited, &mut resolved)?;
    }

    Ok(resolved)
}

fn expand(
    name: &str,
    groups: &BTreeMap<String, ToolGroup>,
    visited: &mut HashSet<String>,
    resolved: &mut ResolvedSet,
) -> Result<(), ResolveError> {
    let group = groups
        .get(name)
        .ok_or_else(|| ResolveError::UnknownGroup(name.to_string()))?;

    if !visited.insert(name.to_string()) {
        debug!(group = name, "group already expanded, skipping");
        return Ok(());
    }

    for entry in group {
        match entry {
            GroupEntry::Include(target) => expand(target, groups, visited, resolved)?,
            GroupEntry::Tool(tool) => {
                resolved.insert(tool.clone());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tools(entries: &[&str]) -> ToolGroup {
        entries
            .iter()
            .map(|name| GroupEntry::Tool(Tool::bare(*name)))
            .collect()
    }

    fn include(target: &str) -> GroupEntry {
        GroupEntry::Include(target.to_string())
    }

    fn names(set: &ResolvedSet) -> Vec<&str> {
        set.iter().map(|tool| tool.name.as_str()).collect()
    }

    fn requested(groups: &[&str]) -> Vec<String> {
        groups.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn resolves_requested_group_with_seed() {
        let mut groups = BTreeMap::new();
        groups.insert("default".to_string(), tools(&["ruff"]));
        let mut dev = tools(&["pytest"]);
        dev.push(include("default"));
        groups.insert("dev".to_string(), dev);
        groups.insert(
            "lint".to_string(),
            vec![GroupEntry::Tool(Tool::new(
                "mypy",
                vec!["types-toml".to_string()],
            ))],
        );

        let seed = [Tool::bare("ruff")];

        let set = resolve(&requested(&["dev"]), &groups, &seed).unwrap();
        assert_eq!(names(&set), vec!["ruff", "pytest"]);

        let set = resolve(&requested(&["dev", "lint"]), &groups, &seed).unwrap();
        assert_eq!(names(&set), vec!["ruff", "pytest", "mypy"]);
        assert!(set.contains(&Tool::new("mypy", vec!["types-toml".to_string()])));
    }

    #[test]
    fn unknown_group_is_fatal() {
        let groups = BTreeMap::new();
        let error = resolve(&requested(&["missing"]), &groups, &[]).unwrap_err();
        assert_eq!(error, ResolveError::UnknownGroup("missing".to_string()));
    }

    #[test]
    fn unknown_group_behind_an_include_is_fatal() {
        let mut groups = BTreeMap::new();
        groups.insert("dev".to_string(), vec![include("missing")]);

        let error = resolve(&requested(&["dev"]), &groups, &[]).unwrap_err();
        assert_eq!(error, ResolveError::UnknownGroup("missing".to_string()));
    }

    #[test]
    fn self_include_terminates() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "x".to_string(),
            vec![include("x"), GroupEntry::Tool(Tool::bare("a"))],
        );

        let set = resolve(&requested(&["x"]), &groups, &[]).unwrap();
        assert_eq!(names(&set), vec!["a"]);
    }

    #[rstest]
    #[case::direct(&["a", "b"])]
    #[case::entered_from_either_side(&["b", "a"])]
    #[case::one_request(&["a"])]
    fn mutual_include_yields_each_tool_once(#[case] request: &[&str]) {
        let mut groups = BTreeMap::new();
        groups.insert(
            "a".to_string(),
            vec![GroupEntry::Tool(Tool::bare("alpha")), include("b")],
        );
        groups.insert(
            "b".to_string(),
            vec![GroupEntry::Tool(Tool::bare("beta")), include("a")],
        );

        let set = resolve(&requested(request), &groups, &[]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Tool::bare("alpha")));
        assert!(set.contains(&Tool::bare("beta")));
    }

    #[test]
    fn cycle_discovered_deep_in_a_chain_terminates() {
        // a -> b -> c -> a
        let mut groups = BTreeMap::new();
        groups.insert(
            "a".to_string(),
            vec![GroupEntry::Tool(Tool::bare("alpha")), include("b")],
        );
        groups.insert(
            "b".to_string(),
            vec![GroupEntry::Tool(Tool::bare("beta")), include("c")],
        );
        groups.insert(
            "c".to_string(),
            vec![include("a"), GroupEntry::Tool(Tool::bare("gamma"))],
        );

        let set = resolve(&requested(&["a"]), &groups, &[]).unwrap();
        assert_eq!(names(&set), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn repeated_requests_collapse() {
        let mut groups = BTreeMap::new();
        groups.insert("dev".to_string(), tools(&["pytest"]));

        let once = resolve(&requested(&["dev"]), &groups, &[]).unwrap();
        let twice = resolve(&requested(&["dev", "dev"]), &groups, &[]).unwrap();
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn dependency_list_is_part_of_tool_identity() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "a".to_string(),
            vec![
                GroupEntry::Tool(Tool::new("mypy", vec!["types-toml".to_string()])),
                GroupEntry::Tool(Tool::bare("mypy")),
            ],
        );
        groups.insert(
            "b".to_string(),
            vec![GroupEntry::Tool(Tool::new(
                "mypy",
                vec!["types-toml".to_string()],
            ))],
        );

        // Different dependency lists stay distinct; identical ones collapse.
        let set = resolve(&requested(&["a", "b"]), &groups, &[]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn emission_order_is_first_encountered() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "outer".to_string(),
            vec![
                GroupEntry::Tool(Tool::bare("one")),
                include("inner"),
                GroupEntry::Tool(Tool::bare("four")),
            ],
        );
        groups.insert(
            "inner".to_string(),
            vec![
                GroupEntry::Tool(Tool::bare("two")),
                GroupEntry::Tool(Tool::bare("three")),
                // Already emitted by `outer`; must not move.
                GroupEntry::Tool(Tool::bare("one")),
            ],
        );

        let set = resolve(&requested(&["outer"]), &groups, &[Tool::bare("seeded")]).unwrap();
        assert_eq!(names(&set), vec!["seeded", "one", "two", "three", "four"]);
    }

    #[test]
    fn seed_tools_merge_even_with_no_requests() {
        let groups = BTreeMap::new();
        let set = resolve(&[], &groups, &[Tool::bare("ruff")]).unwrap();
        assert_eq!(names(&set), vec!["ruff"]);
    }
}
