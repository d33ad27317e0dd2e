//! Unload ordering over the loaded set
//!
//! Unloading must remove dependents before the modules they depend on: a
//! reverse topological order of the dependency graph restricted to the
//! loaded set. Uses DFS with three-color marking (unvisited, in current
//! stack, done) to order nodes and catch cycles.

use std::collections::HashSet;

use crate::domain::{LoadedSet, ModuleId};
use crate::error::{Result, circular_dependency};
use crate::repo::RepositoryIndex;

/// Context for the unload ordering walk
struct UnloadSortContext<'a> {
    index: &'a RepositoryIndex,
    loaded: &'a LoadedSet,
    /// Fully processed identities (BLACK)
    visited: HashSet<ModuleId>,
    /// Identities in the current recursion stack (GRAY)
    in_path: HashSet<ModuleId>,
    /// Dependencies-first order; reversed by the caller
    postorder: Vec<ModuleId>,
}

/// Order `targets` so that dependents come before their dependencies
///
/// `targets` must be a subset of the loaded set. The relative order among
/// independent targets follows the loaded set's order, reversed, so the most
/// recently loaded module unloads first.
pub fn unload_order(
    index: &RepositoryIndex,
    loaded: &LoadedSet,
    targets: &[ModuleId],
) -> Result<Vec<ModuleId>> {
    let mut ctx = UnloadSortContext {
        index,
        loaded,
        visited: HashSet::new(),
        in_path: HashSet::new(),
        postorder: Vec::new(),
    };

    for id in loaded.iter() {
        if !ctx.visited.contains(id) {
            sort_dfs(&mut ctx, id)?;
        }
    }

    let target_set: HashSet<&ModuleId> = targets.iter().collect();
    let mut order: Vec<ModuleId> = ctx
        .postorder
        .into_iter()
        .filter(|id| target_set.contains(id))
        .collect();
    order.reverse();
    Ok(order)
}

fn sort_dfs(ctx: &mut UnloadSortContext, id: &ModuleId) -> Result<()> {
    if ctx.in_path.contains(id) {
        return Err(circular_dependency(format!("cycle involving {id}")));
    }
    if ctx.visited.contains(id) {
        return Ok(());
    }

    ctx.in_path.insert(id.clone());

    // A loaded module missing from the index declares no dependencies
    if let Some(def) = ctx.index.get(id) {
        for dep in &def.requires {
            if ctx.loaded.contains(dep) {
                sort_dfs(ctx, dep)?;
            }
        }
    }

    ctx.in_path.remove(id);
    ctx.visited.insert(id.clone());
    ctx.postorder.push(id.clone());

    Ok(())
}
