//! Repository directory scanner
//!
//! Walks each repository path at the module-family level (non-recursive) and
//! recursively within a family for version definition files. A malformed
//! definition is skipped and reported as a warning, never fatal to the build.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::domain::{EffectOp, EnvEffect, ModuleDefinition, ModuleId};
use crate::error::Result;
use crate::fingerprint;

/// Definition file extensions recognized by the scanner
const DEFINITION_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// A per-file problem encountered during a scan
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: {}", self.path.display(), self.reason)
    }
}

/// Everything one scan pass produces
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Usable definitions in scan order
    pub definitions: Vec<ModuleDefinition>,

    /// Definition files seen, usable or not
    pub files_seen: usize,

    /// Per-file modification signatures, for the index fingerprint
    pub file_signatures: Vec<String>,

    /// Skipped files with reasons
    pub warnings: Vec<ScanWarning>,
}

/// On-disk definition file content
///
/// The identity is not repeated inside the file; the family directory name
/// and the file's path within it are the identity.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    #[serde(default)]
    requires: Vec<String>,

    #[serde(default)]
    conflicts: Vec<String>,

    #[serde(default)]
    capabilities: Vec<String>,

    #[serde(default)]
    replaces: Option<String>,

    #[serde(default)]
    env: Vec<EnvEffect>,
}

/// Scan the given repository paths
///
/// A missing or unreadable repository path is a warning, not an error: sites
/// commonly configure paths that only exist on some hosts.
pub fn scan(paths: &[PathBuf]) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();

    for repo in paths {
        let entries = match std::fs::read_dir(repo) {
            Ok(entries) => entries,
            Err(e) => {
                outcome.warnings.push(ScanWarning {
                    path: repo.clone(),
                    reason: format!("unreadable repository: {e}"),
                });
                continue;
            }
        };

        let mut families: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        families.sort();

        for family_dir in families {
            scan_family(&family_dir, &mut outcome);
        }
    }

    Ok(outcome)
}

/// Scan one family directory for version definition files
fn scan_family(family_dir: &Path, outcome: &mut ScanOutcome) {
    let Some(family) = family_dir.file_name().and_then(|n| n.to_str()) else {
        return;
    };

    let mut files: Vec<PathBuf> = WalkDir::new(family_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| DEFINITION_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();

    for file in files {
        outcome.files_seen += 1;

        if let Ok(signature) = fingerprint::file_signature(&file) {
            outcome.file_signatures.push(signature);
        }

        let Some(version) = version_of(family_dir, &file) else {
            outcome.warnings.push(ScanWarning {
                path: file.clone(),
                reason: "definition path is not valid UTF-8".to_string(),
            });
            continue;
        };

        match parse_definition(&file, ModuleId::new(family, version)) {
            Ok(def) => outcome.definitions.push(def),
            Err(reason) => outcome.warnings.push(ScanWarning { path: file, reason }),
        }
    }
}

/// Version string of a definition file: its path relative to the family
/// directory with the extension stripped (`gcc/2024/13.2.yaml` -> `2024/13.2`)
fn version_of(family_dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(family_dir).ok()?;
    let stem = relative.with_extension("");
    let parts: Option<Vec<&str>> = stem.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn parse_definition(path: &Path, id: ModuleId) -> std::result::Result<ModuleDefinition, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let raw: RawDefinition = serde_yaml::from_str(&content).map_err(|e| e.to_string())?;

    let mut def = ModuleDefinition::new(id);
    def.capabilities = raw.capabilities.into_iter().collect();
    def.requires = parse_ids(&raw.requires, "requires")?;
    def.conflicts = parse_ids(&raw.conflicts, "conflicts")?;
    def.replaces = raw
        .replaces
        .map(|s| {
            s.parse::<ModuleId>()
                .map_err(|_| format!("invalid replaces identity '{s}'"))
        })
        .transpose()?;

    for effect in &raw.env {
        validate_effect(effect)?;
    }
    def.effects = raw.env;

    Ok(def)
}

fn parse_ids(specs: &[String], field: &str) -> std::result::Result<Vec<ModuleId>, String> {
    specs
        .iter()
        .map(|s| {
            s.parse::<ModuleId>()
                .map_err(|_| format!("invalid {field} identity '{s}' (expected name/version)"))
        })
        .collect()
}

fn validate_effect(effect: &EnvEffect) -> std::result::Result<(), String> {
    if effect.var.is_empty() {
        return Err("effect with empty variable name".to_string());
    }
    match effect.op {
        EffectOp::Unset if effect.value.is_some() => {
            Err(format!("unset effect on '{}' must not carry a value", effect.var))
        }
        EffectOp::Set | EffectOp::Prepend | EffectOp::Append if effect.value.is_none() => {
            Err(format!("{:?} effect on '{}' requires a value", effect.op, effect.var))
        }
        _ => Ok(()),
    }
}
