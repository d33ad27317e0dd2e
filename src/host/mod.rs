//! Host capability model
//!
//! Probes the local machine once per process and produces an immutable
//! [`HostProfile`]. Capability tags derived from the profile filter which
//! module definitions are resolvable on this host.

pub mod probes;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use probes::Probe;

/// Immutable description of the current host
///
/// Computed by [`HostProfile::probe`] on cache miss and read back from the
/// cache otherwise; treated as read-only input to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub hostname: String,
    pub os_family: String,
    pub os_version: String,
    pub cpu_arch: String,

    /// Capability tags aggregated from every sub-probe
    pub tags: BTreeSet<String>,
}

impl HostProfile {
    /// Probe all subsystems and aggregate their capability tags
    ///
    /// Sub-probes are independent and side-effect-free; a failing probe
    /// contributes no tags rather than erroring, so detection degrades
    /// gracefully on hosts without the probed hardware.
    pub fn probe() -> Self {
        let mut tags = BTreeSet::new();
        for probe in Probe::ALL {
            tags.extend(probe.detect());
        }

        Self {
            hostname: read_first_line("/proc/sys/kernel/hostname")
                .unwrap_or_else(|| "unknown".to_string()),
            os_family: std::env::consts::OS.to_string(),
            os_version: read_first_line("/proc/sys/kernel/osrelease").unwrap_or_default(),
            cpu_arch: std::env::consts::ARCH.to_string(),
            tags,
        }
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Capability tags a definition requires that this host lacks
    pub fn missing_tags<'a, I>(&self, required: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        required
            .into_iter()
            .filter(|tag| !self.tags.contains(*tag))
            .cloned()
            .collect()
    }

    /// Whether every required tag is present on this host
    pub fn supports<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.missing_tags(required).is_empty()
    }

    /// Host identity string for cache fingerprinting
    ///
    /// Changes whenever the machine or its OS release changes, invalidating
    /// cache entries probed on a different host.
    pub fn identity(&self) -> String {
        format!("{}\0{}\0{}", self.hostname, self.os_family, self.os_version)
    }
}

/// Host identity without running the full probe
///
/// Produces the same string as [`HostProfile::identity`] for the same host,
/// from cheap reads only, so cache keying never pays the probe cost.
pub fn quick_identity() -> String {
    format!(
        "{}\0{}\0{}",
        read_first_line("/proc/sys/kernel/hostname").unwrap_or_else(|| "unknown".to_string()),
        std::env::consts::OS,
        read_first_line("/proc/sys/kernel/osrelease").unwrap_or_default()
    )
}

fn read_first_line(path: &str) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
