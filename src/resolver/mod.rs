//! Module graph controller
//!
//! Turns a resolution request into an ordered action plan, consulting the
//! repository index filtered by the host profile. Pure: the inputs are never
//! mutated, the post-state loaded set is returned alongside the actions, and
//! on any failure no partial plan escapes.

pub mod graph;
pub mod sort;

use crate::domain::{Action, LoadedSet, ModuleDefinition, ModuleId, ModuleSpec, Plan, Request};
use crate::error::{
    Result, conflict_detected, dependents_loaded, module_incompatible, module_not_found,
};
use crate::host::HostProfile;
use crate::repo::RepositoryIndex;

/// Resolve a request against the current state
pub fn resolve(
    index: &RepositoryIndex,
    profile: &HostProfile,
    loaded: &LoadedSet,
    request: &Request,
) -> Result<Plan> {
    match request {
        Request::Load { spec, auto_unload } => {
            load_plan(index, profile, loaded, spec, *auto_unload)
        }
        Request::Unload { spec, cascade } => unload_plan(index, loaded, spec, *cascade),
        Request::Swap { from, to } => swap_plan(index, profile, loaded, from, to),
        Request::Purge => purge_plan(index, loaded),
    }
}

/// Resolve a module spec to a concrete definition
///
/// Partial specs pick the highest version whose capability tags the host
/// satisfies. `ModuleNotFound` when nothing matches the spec at all;
/// `ModuleIncompatible` when matches exist but none fit this host; the
/// distinction matters for user-facing diagnostics.
pub fn resolve_spec<'a>(
    index: &'a RepositoryIndex,
    profile: &HostProfile,
    spec: &ModuleSpec,
) -> Result<&'a ModuleDefinition> {
    let candidates: Vec<&ModuleDefinition> = index
        .versions_of(&spec.name)
        .into_iter()
        .filter(|def| spec.matches(&def.id))
        .collect();

    if candidates.is_empty() {
        return Err(module_not_found(spec.to_string()));
    }

    let compatible: Vec<&ModuleDefinition> = candidates
        .iter()
        .copied()
        .filter(|def| profile.supports(&def.capabilities))
        .collect();

    match compatible.last() {
        Some(def) => Ok(def),
        None => {
            let best = candidates[candidates.len() - 1];
            Err(module_incompatible(
                best.id.to_string(),
                profile.missing_tags(&best.capabilities).join(", "),
            ))
        }
    }
}

fn load_plan(
    index: &RepositoryIndex,
    profile: &HostProfile,
    loaded: &LoadedSet,
    spec: &ModuleSpec,
    auto_unload: bool,
) -> Result<Plan> {
    let def = resolve_spec(index, profile, spec)?;

    // Loading an already-loaded module is a no-op
    if loaded.contains(&def.id) {
        return Ok(Plan::noop(loaded.clone()));
    }

    let closure = graph::dependency_closure(index, def)?;

    // The host filter applies to the whole closure, not just the request
    for member in &closure {
        if !profile.supports(&member.capabilities) {
            return Err(module_incompatible(
                member.id.to_string(),
                profile.missing_tags(&member.capabilities).join(", "),
            ));
        }
    }

    // Postorder, minus anything the loaded set already satisfies
    let to_load: Vec<&ModuleDefinition> = closure
        .into_iter()
        .filter(|member| !loaded.contains(&member.id))
        .collect();

    let unload_targets = collect_unload_targets(index, loaded, &to_load, auto_unload)?;
    let unload_ids = sort::unload_order(index, loaded, &unload_targets)?;

    let mut actions = Vec::with_capacity(unload_ids.len() + to_load.len());
    let mut new_loaded = loaded.clone();

    for id in &unload_ids {
        actions.push(Action::Unload(definition_for_unload(index, id)?));
        new_loaded.remove(id);
    }
    for member in &to_load {
        actions.push(Action::Load((*member).clone()));
        new_loaded.insert(member.id.clone());
    }

    Ok(Plan {
        actions,
        loaded: new_loaded,
    })
}

/// Loaded modules that must leave before `to_load` can enter
///
/// Covers declared conflicts in either direction, in-place upgrades via
/// `replaces`, and the loaded dependents of everything scheduled to leave
/// (removing a module may not strand modules that depend on it).
fn collect_unload_targets(
    index: &RepositoryIndex,
    loaded: &LoadedSet,
    to_load: &[&ModuleDefinition],
    auto_unload: bool,
) -> Result<Vec<ModuleId>> {
    let mut targets: Vec<ModuleId> = Vec::new();

    for new in to_load {
        if let Some(predecessor) = &new.replaces {
            if loaded.contains(predecessor) && !targets.contains(predecessor) {
                targets.push(predecessor.clone());
            }
        }
    }

    for new in to_load {
        for loaded_id in loaded.iter() {
            if targets.contains(loaded_id) {
                continue;
            }
            let declared = new.conflicts_with(loaded_id)
                || index
                    .get(loaded_id)
                    .is_some_and(|old| old.conflicts_with(&new.id));
            if declared {
                if !auto_unload {
                    return Err(conflict_detected(
                        new.id.to_string(),
                        loaded_id.to_string(),
                    ));
                }
                targets.push(loaded_id.clone());
            }
        }
    }

    let mut expanded = targets.clone();
    for target in &targets {
        for dependent in graph::loaded_dependents(index, loaded, target) {
            if !expanded.contains(&dependent) {
                expanded.push(dependent);
            }
        }
    }

    Ok(expanded)
}

fn unload_plan(
    index: &RepositoryIndex,
    loaded: &LoadedSet,
    spec: &ModuleSpec,
    cascade: bool,
) -> Result<Plan> {
    // Unloading something that is not loaded is a no-op, mirroring load
    let Some(target) = loaded.iter().find(|id| spec.matches(id)).cloned() else {
        return Ok(Plan::noop(loaded.clone()));
    };

    let dependents = graph::loaded_dependents(index, loaded, &target);
    if !dependents.is_empty() && !cascade {
        return Err(dependents_loaded(
            target.to_string(),
            dependents
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ));
    }

    let mut targets = dependents;
    targets.push(target);
    let order = sort::unload_order(index, loaded, &targets)?;

    let mut actions = Vec::with_capacity(order.len());
    let mut new_loaded = loaded.clone();
    for id in &order {
        actions.push(Action::Unload(definition_for_unload(index, id)?));
        new_loaded.remove(id);
    }

    Ok(Plan {
        actions,
        loaded: new_loaded,
    })
}

fn swap_plan(
    index: &RepositoryIndex,
    profile: &HostProfile,
    loaded: &LoadedSet,
    from: &ModuleSpec,
    to: &ModuleSpec,
) -> Result<Plan> {
    let unload = unload_plan(index, loaded, from, true)?;
    let load = load_plan(index, profile, &unload.loaded, to, false)?;

    let mut actions = unload.actions;
    actions.extend(load.actions);

    Ok(Plan {
        actions,
        loaded: load.loaded,
    })
}

fn purge_plan(index: &RepositoryIndex, loaded: &LoadedSet) -> Result<Plan> {
    let targets: Vec<ModuleId> = loaded.iter().cloned().collect();
    let order = sort::unload_order(index, loaded, &targets)?;

    let actions = order
        .iter()
        .map(|id| Action::Unload(definition_or_empty(index, id)))
        .collect();

    Ok(Plan {
        actions,
        loaded: LoadedSet::new(),
    })
}

/// Definition needed to reverse a load; the identity must still be indexed
fn definition_for_unload(index: &RepositoryIndex, id: &ModuleId) -> Result<ModuleDefinition> {
    index
        .get(id)
        .cloned()
        .ok_or_else(|| module_not_found(id.to_string()))
}

/// Like [`definition_for_unload`], but purge must always be able to clear
/// state: a definition gone from the index unloads with no effects.
fn definition_or_empty(index: &RepositoryIndex, id: &ModuleId) -> ModuleDefinition {
    index
        .get(id)
        .cloned()
        .unwrap_or_else(|| ModuleDefinition::new(id.clone()))
}
