//! Dependency graph walks over the repository index and the loaded set

use std::collections::HashSet;

use crate::domain::{LoadedSet, ModuleDefinition, ModuleId};
use crate::error::{Result, circular_dependency, unresolved_dependency};
use crate::repo::RepositoryIndex;

/// Context for the dependency closure walk
struct ClosureContext<'a> {
    index: &'a RepositoryIndex,
    /// Fully processed identities
    visited: HashSet<ModuleId>,
    /// Identities in the current recursion stack, for cycle detection
    in_path: HashSet<ModuleId>,
    /// Closure in postorder
    result: Vec<&'a ModuleDefinition>,
}

/// Transitive dependency closure of `root`, in postorder
///
/// Leaves come first and `root` itself is last, which is exactly the order
/// the load actions must take. Every dependency identity must exist in the
/// index (`UnresolvedDependency` otherwise); a dependency cycle is
/// `CircularDependency`.
pub fn dependency_closure<'a>(
    index: &'a RepositoryIndex,
    root: &'a ModuleDefinition,
) -> Result<Vec<&'a ModuleDefinition>> {
    let mut ctx = ClosureContext {
        index,
        visited: HashSet::new(),
        in_path: HashSet::new(),
        result: Vec::new(),
    };
    closure_dfs(&mut ctx, root)?;
    Ok(ctx.result)
}

fn closure_dfs<'a>(ctx: &mut ClosureContext<'a>, def: &'a ModuleDefinition) -> Result<()> {
    if ctx.in_path.contains(&def.id) {
        return Err(circular_dependency(format!(
            "cycle involving {}",
            def.id
        )));
    }
    if ctx.visited.contains(&def.id) {
        return Ok(());
    }

    ctx.in_path.insert(def.id.clone());

    for dep_id in &def.requires {
        let dep = ctx
            .index
            .get(dep_id)
            .ok_or_else(|| unresolved_dependency(def.id.to_string(), dep_id.to_string()))?;
        closure_dfs(ctx, dep)?;
    }

    ctx.in_path.remove(&def.id);
    ctx.visited.insert(def.id.clone());
    ctx.result.push(def);

    Ok(())
}

/// Loaded modules that depend, directly or transitively, on `target`
///
/// The graph is restricted to the loaded set; a loaded module whose
/// definition is gone from the index declares no dependencies. Results keep
/// the loaded set's order.
pub fn loaded_dependents(
    index: &RepositoryIndex,
    loaded: &LoadedSet,
    target: &ModuleId,
) -> Vec<ModuleId> {
    let mut depends_on_target: HashSet<ModuleId> = HashSet::from([target.clone()]);

    // Fixpoint over reverse edges; the loaded set is small
    loop {
        let mut grew = false;
        for id in loaded.iter() {
            if depends_on_target.contains(id) {
                continue;
            }
            let requires_hit = index
                .get(id)
                .is_some_and(|def| def.requires.iter().any(|d| depends_on_target.contains(d)));
            if requires_hit {
                depends_on_target.insert(id.clone());
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    loaded
        .iter()
        .filter(|id| *id != target && depends_on_target.contains(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::repo::scan::tests::write_module;
    use tempfile::TempDir;

    fn build_index(specs: &[(&str, &str, &str)]) -> (TempDir, RepositoryIndex) {
        let temp = TempDir::new().unwrap();
        for (family, version, content) in specs {
            write_module(temp.path(), family, version, content);
        }
        let (index, _) = RepositoryIndex::build(&[temp.path().to_path_buf()]).unwrap();
        (temp, index)
    }

    #[test]
    fn test_closure_postorder() {
        let (_temp, index) = build_index(&[
            ("libX", "3.0", "env: []\n"),
            ("libY", "1.0", "requires:\n  - libX/3.0\n"),
            ("appA", "1.0", "requires:\n  - libY/1.0\n"),
        ]);

        let root = index.get(&ModuleId::new("appA", "1.0")).unwrap();
        let closure = dependency_closure(&index, root).unwrap();
        let ids: Vec<String> = closure.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["libX/3.0", "libY/1.0", "appA/1.0"]);
    }

    #[test]
    fn test_closure_shared_dependency_appears_once() {
        let (_temp, index) = build_index(&[
            ("libX", "3.0", "env: []\n"),
            ("libY", "1.0", "requires:\n  - libX/3.0\n"),
            ("appA", "1.0", "requires:\n  - libY/1.0\n  - libX/3.0\n"),
        ]);

        let root = index.get(&ModuleId::new("appA", "1.0")).unwrap();
        let closure = dependency_closure(&index, root).unwrap();
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn test_closure_missing_dependency() {
        let (_temp, index) = build_index(&[("appA", "1.0", "requires:\n  - libX/3.0\n")]);

        let root = index.get(&ModuleId::new("appA", "1.0")).unwrap();
        let result = dependency_closure(&index, root);
        assert!(matches!(
            result,
            Err(crate::error::ModenvError::UnresolvedDependency { .. })
        ));
    }

    #[test]
    fn test_closure_cycle_detection() {
        let (_temp, index) = build_index(&[
            ("a", "1.0", "requires:\n  - b/1.0\n"),
            ("b", "1.0", "requires:\n  - a/1.0\n"),
        ]);

        let root = index.get(&ModuleId::new("a", "1.0")).unwrap();
        let result = dependency_closure(&index, root);
        assert!(matches!(
            result,
            Err(crate::error::ModenvError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_loaded_dependents_direct() {
        let (_temp, index) = build_index(&[
            ("libX", "3.0", "env: []\n"),
            ("appA", "1.0", "requires:\n  - libX/3.0\n"),
        ]);
        let loaded = LoadedSet::parse("libX/3.0:appA/1.0");

        let dependents = loaded_dependents(&index, &loaded, &ModuleId::new("libX", "3.0"));
        assert_eq!(dependents, vec![ModuleId::new("appA", "1.0")]);
    }

    #[test]
    fn test_loaded_dependents_transitive() {
        let (_temp, index) = build_index(&[
            ("libX", "3.0", "env: []\n"),
            ("libY", "1.0", "requires:\n  - libX/3.0\n"),
            ("appA", "1.0", "requires:\n  - libY/1.0\n"),
        ]);
        let loaded = LoadedSet::parse("libX/3.0:libY/1.0:appA/1.0");

        let dependents = loaded_dependents(&index, &loaded, &ModuleId::new("libX", "3.0"));
        assert_eq!(
            dependents,
            vec![ModuleId::new("libY", "1.0"), ModuleId::new("appA", "1.0")]
        );
    }

    #[test]
    fn test_loaded_dependents_ignores_unloaded() {
        let (_temp, index) = build_index(&[
            ("libX", "3.0", "env: []\n"),
            ("appA", "1.0", "requires:\n  - libX/3.0\n"),
        ]);
        let loaded = LoadedSet::parse("libX/3.0");

        let dependents = loaded_dependents(&index, &loaded, &ModuleId::new("libX", "3.0"));
        assert!(dependents.is_empty());
    }
}
