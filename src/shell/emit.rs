//! Plan application and script rendering

use crate::domain::{Action, EffectOp, ModuleDefinition, Plan};
use crate::shell::{Dialect, EnvSnapshot};

/// Apply a plan's actions to a snapshot, left to right
///
/// Returns the post-state environment, including the re-serialized loaded
/// set tracking variable. Pure with respect to the input snapshot.
pub fn apply(plan: &Plan, snapshot: &EnvSnapshot) -> EnvSnapshot {
    let mut env = snapshot.clone();

    for action in &plan.actions {
        match action {
            Action::Load(def) => apply_load(&mut env, def),
            Action::Unload(def) => apply_unload(&mut env, def),
        }
    }

    env.set_loaded(&plan.loaded);
    env
}

/// Emit the shell script realizing a plan in the given dialect
///
/// Only variables whose value actually changed appear in the output; a
/// no-op plan emits an empty script.
pub fn emit(plan: &Plan, snapshot: &EnvSnapshot, dialect: Dialect) -> String {
    let after = apply(plan, snapshot);
    render_delta(snapshot, &after, dialect)
}

fn apply_load(env: &mut EnvSnapshot, def: &ModuleDefinition) {
    for effect in &def.effects {
        match (effect.op, effect.value.as_deref()) {
            (EffectOp::Set, Some(value)) => env.set(&effect.var, value),
            (EffectOp::Prepend, Some(value)) => env.prepend(&effect.var, value),
            (EffectOp::Append, Some(value)) => env.append(&effect.var, value),
            (EffectOp::Unset, _) => env.unset(&effect.var),
            // The scanner rejects value-less set/prepend/append
            (_, None) => {}
        }
    }
}

/// Reverse a load structurally
///
/// A prepend's or append's inverse removes the exact entry at whatever
/// position it now occupies; a set's inverse unsets (the pre-load value is
/// not recorded anywhere recoverable); an unset has no inverse. Effects
/// reverse in reverse declaration order.
fn apply_unload(env: &mut EnvSnapshot, def: &ModuleDefinition) {
    for effect in def.effects.iter().rev() {
        match (effect.op, effect.value.as_deref()) {
            (EffectOp::Set, Some(_)) => env.unset(&effect.var),
            (EffectOp::Prepend | EffectOp::Append, Some(value)) => {
                env.remove_entry(&effect.var, value);
            }
            (EffectOp::Unset, _) | (_, None) => {}
        }
    }
}

/// Render the difference between two snapshots as dialect-specific lines
fn render_delta(before: &EnvSnapshot, after: &EnvSnapshot, dialect: Dialect) -> String {
    let mut lines = Vec::new();

    for (var, value) in after.vars() {
        if before.get(var) != Some(value.as_str()) {
            lines.push(dialect.render_set(var, value));
        }
    }
    for var in before.vars().keys() {
        if after.get(var).is_none() {
            lines.push(dialect.render_unset(var));
        }
    }

    if lines.is_empty() {
        String::new()
    } else {
        let mut script = lines.join("\n");
        script.push('\n');
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnvEffect, LoadedSet, ModuleId};
    use crate::domain::loaded::LOADED_VAR;

    fn effect(var: &str, op: EffectOp, value: Option<&str>) -> EnvEffect {
        EnvEffect {
            var: var.to_string(),
            op,
            value: value.map(ToString::to_string),
        }
    }

    fn gcc_def() -> ModuleDefinition {
        let mut def = ModuleDefinition::new(ModuleId::new("gcc", "13.2"));
        def.effects = vec![
            effect("PATH", EffectOp::Prepend, Some("/opt/gcc/bin")),
            effect("CC", EffectOp::Set, Some("gcc-13")),
        ];
        def
    }

    fn load_plan(def: &ModuleDefinition, prior: &LoadedSet) -> Plan {
        let mut loaded = prior.clone();
        loaded.insert(def.id.clone());
        Plan {
            actions: vec![Action::Load(def.clone())],
            loaded,
        }
    }

    fn unload_plan(def: &ModuleDefinition, prior: &LoadedSet) -> Plan {
        let mut loaded = prior.clone();
        loaded.remove(&def.id);
        Plan {
            actions: vec![Action::Unload(def.clone())],
            loaded,
        }
    }

    #[test]
    fn test_apply_load_effects_in_order() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("PATH", "/usr/bin");

        let plan = load_plan(&gcc_def(), &LoadedSet::new());
        let after = apply(&plan, &snapshot);

        assert_eq!(after.get("PATH"), Some("/opt/gcc/bin:/usr/bin"));
        assert_eq!(after.get("CC"), Some("gcc-13"));
        assert_eq!(after.get(LOADED_VAR), Some("gcc/13.2"));
    }

    #[test]
    fn test_unload_is_exact_inverse_of_load() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("PATH", "/usr/bin");

        let def = gcc_def();
        let loaded = load_plan(&def, &LoadedSet::new());
        let after_load = apply(&loaded, &snapshot);

        let unloaded = unload_plan(&def, &loaded.loaded);
        let after_unload = apply(&unloaded, &after_load);

        assert_eq!(after_unload, snapshot);
    }

    #[test]
    fn test_inverse_holds_with_interleaved_loads() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("PATH", "/usr/bin");

        let gcc = gcc_def();
        let mut other = ModuleDefinition::new(ModuleId::new("tools", "1.0"));
        other.effects = vec![effect("PATH", EffectOp::Prepend, Some("/opt/tools/bin"))];

        let plan1 = load_plan(&gcc, &LoadedSet::new());
        let env1 = apply(&plan1, &snapshot);
        let plan2 = load_plan(&other, &plan1.loaded);
        let env2 = apply(&plan2, &env1);

        // tools prepended after gcc; gcc's entry is now in the middle
        assert_eq!(
            env2.get("PATH"),
            Some("/opt/tools/bin:/opt/gcc/bin:/usr/bin")
        );

        let plan3 = unload_plan(&gcc, &plan2.loaded);
        let env3 = apply(&plan3, &env2);

        // gcc's exact entry is gone, tools' stays put
        assert_eq!(env3.get("PATH"), Some("/opt/tools/bin:/usr/bin"));
        assert_eq!(env3.get("CC"), None);
        assert_eq!(env3.get(LOADED_VAR), Some("tools/1.0"));
    }

    #[test]
    fn test_repeated_cycles_do_not_grow_path() {
        let mut env = EnvSnapshot::new();
        env.set("PATH", "/usr/bin");
        let def = gcc_def();

        for _ in 0..3 {
            let load = load_plan(&def, &LoadedSet::new());
            env = apply(&load, &env);
            let unload = unload_plan(&def, &load.loaded);
            env = apply(&unload, &env);
        }

        assert_eq!(env.get("PATH"), Some("/usr/bin"));
    }

    #[test]
    fn test_emit_noop_plan_is_empty() {
        let snapshot = EnvSnapshot::new();
        let plan = Plan::noop(LoadedSet::new());
        assert_eq!(emit(&plan, &snapshot, Dialect::Sh), "");
    }

    #[test]
    fn test_emit_sh_script() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("PATH", "/usr/bin");

        let plan = load_plan(&gcc_def(), &LoadedSet::new());
        let script = emit(&plan, &snapshot, Dialect::Sh);

        assert!(script.contains("export CC=\"gcc-13\""));
        assert!(script.contains("export PATH=\"/opt/gcc/bin:/usr/bin\""));
        assert!(script.contains("export MODENV_LOADED=\"gcc/13.2\""));
        assert!(script.ends_with('\n'));
    }

    #[test]
    fn test_emit_unload_renders_unset() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("CC", "gcc-13");
        snapshot.set("PATH", "/opt/gcc/bin:/usr/bin");
        snapshot.set(LOADED_VAR, "gcc/13.2");

        let plan = unload_plan(&gcc_def(), &LoadedSet::parse("gcc/13.2"));
        let script = emit(&plan, &snapshot, Dialect::Sh);

        assert!(script.contains("unset CC"));
        assert!(script.contains("export PATH=\"/usr/bin\""));
        assert!(script.contains("unset MODENV_LOADED"));
    }

    #[test]
    fn test_emit_only_changed_variables() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("HOME", "/home/user");
        snapshot.set("PATH", "/usr/bin");

        let plan = load_plan(&gcc_def(), &LoadedSet::new());
        let script = emit(&plan, &snapshot, Dialect::Sh);

        assert!(!script.contains("HOME"));
    }

    #[test]
    fn test_emit_fish_dialect() {
        let snapshot = EnvSnapshot::new();
        let plan = load_plan(&gcc_def(), &LoadedSet::new());
        let script = emit(&plan, &snapshot, Dialect::Fish);

        assert!(script.contains("set -gx CC \"gcc-13\""));
    }

    #[test]
    fn test_set_unload_unsets_variable() {
        let mut snapshot = EnvSnapshot::new();
        snapshot.set("CC", "clang");

        let mut def = ModuleDefinition::new(ModuleId::new("gcc", "13.2"));
        def.effects = vec![effect("CC", EffectOp::Set, Some("gcc-13"))];

        let load = load_plan(&def, &LoadedSet::new());
        let env1 = apply(&load, &snapshot);
        assert_eq!(env1.get("CC"), Some("gcc-13"));

        // The pre-load value is not recorded; unload unsets rather than restores
        let unload = unload_plan(&def, &load.loaded);
        let env2 = apply(&unload, &env1);
        assert_eq!(env2.get("CC"), None);
    }
}
