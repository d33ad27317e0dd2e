//! Capability sub-probes
//!
//! Each probe detects one host trait and reports it as capability tags.
//! Probes are a closed set of variants behind one `detect` contract; they are
//! independent of each other, side-effect-free, and may run in any order.
//! A probe that finds nothing (or cannot look) returns an empty set.

use std::collections::BTreeSet;
use std::path::Path;

/// CPU feature flags worth exposing as capability tags
///
/// Module definitions branch on vector extensions, not on the full flag set
/// `/proc/cpuinfo` reports.
const CPU_FEATURE_TAGS: [&str; 4] = ["sse4_2", "avx", "avx2", "avx512f"];

/// One hardware/OS capability detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Os,
    Cpu,
    Gpu,
    Network,
    Desktop,
}

impl Probe {
    pub const ALL: [Probe; 5] = [
        Probe::Os,
        Probe::Cpu,
        Probe::Gpu,
        Probe::Network,
        Probe::Desktop,
    ];

    /// Detect this probe's capability tags on the current host
    pub fn detect(self) -> BTreeSet<String> {
        match self {
            Probe::Os => os_tags(),
            Probe::Cpu => cpu_tags(),
            Probe::Gpu => gpu_tags(
                Path::new("/proc/driver/nvidia").exists() || Path::new("/dev/nvidia0").exists(),
                Path::new("/dev/dri").exists(),
            ),
            Probe::Network => network_tags(Path::new("/sys/class/infiniband")),
            Probe::Desktop => desktop_tags(
                std::env::var_os("DISPLAY").is_some()
                    || std::env::var_os("WAYLAND_DISPLAY").is_some(),
            ),
        }
    }
}

fn os_tags() -> BTreeSet<String> {
    BTreeSet::from([format!("os:{}", std::env::consts::OS)])
}

fn cpu_tags() -> BTreeSet<String> {
    let mut tags = BTreeSet::from([format!("arch:{}", std::env::consts::ARCH)]);
    if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
        tags.extend(cpu_feature_tags(&cpuinfo));
    }
    tags
}

/// Parse `/proc/cpuinfo` content for recognized feature flags
fn cpu_feature_tags(cpuinfo: &str) -> BTreeSet<String> {
    let Some(flags_line) = cpuinfo
        .lines()
        .find(|line| line.starts_with("flags") || line.starts_with("Features"))
    else {
        return BTreeSet::new();
    };

    let Some((_, flags)) = flags_line.split_once(':') else {
        return BTreeSet::new();
    };

    flags
        .split_whitespace()
        .filter(|flag| CPU_FEATURE_TAGS.contains(flag))
        .map(|flag| format!("cpu:{flag}"))
        .collect()
}

/// Classify the GPU: NVIDIA-accelerated, generic, or absent
///
/// Module effect sets frequently branch on accelerator vendor, so an NVIDIA
/// device yields the vendor tag on top of the generic one.
fn gpu_tags(nvidia_present: bool, generic_present: bool) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    if nvidia_present {
        tags.insert("gpu:nvidia".to_string());
        tags.insert("gpu".to_string());
    } else if generic_present {
        tags.insert("gpu".to_string());
    }
    tags
}

fn network_tags(infiniband_class: &Path) -> BTreeSet<String> {
    let has_fabric = std::fs::read_dir(infiniband_class)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);

    if has_fabric {
        BTreeSet::from(["fabric:infiniband".to_string()])
    } else {
        BTreeSet::new()
    }
}

fn desktop_tags(has_display: bool) -> BTreeSet<String> {
    if has_display {
        BTreeSet::from(["ui:desktop".to_string()])
    } else {
        BTreeSet::from(["ui:headless".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_feature_tags_filters_allowlist() {
        let cpuinfo = "processor\t: 0\nflags\t\t: fpu vme avx avx2 ht syscall\n";
        let tags = cpu_feature_tags(cpuinfo);
        assert!(tags.contains("cpu:avx"));
        assert!(tags.contains("cpu:avx2"));
        assert!(!tags.contains("cpu:fpu"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_cpu_feature_tags_no_flags_line() {
        assert!(cpu_feature_tags("processor: 0\n").is_empty());
    }

    #[test]
    fn test_gpu_tags_nvidia() {
        let tags = gpu_tags(true, true);
        assert!(tags.contains("gpu:nvidia"));
        assert!(tags.contains("gpu"));
    }

    #[test]
    fn test_gpu_tags_generic_only() {
        let tags = gpu_tags(false, true);
        assert!(!tags.contains("gpu:nvidia"));
        assert!(tags.contains("gpu"));
    }

    #[test]
    fn test_gpu_tags_absent() {
        assert!(gpu_tags(false, false).is_empty());
    }

    #[test]
    fn test_desktop_tags() {
        assert!(desktop_tags(true).contains("ui:desktop"));
        assert!(desktop_tags(false).contains("ui:headless"));
    }

    #[test]
    fn test_network_tags_missing_class_dir() {
        assert!(network_tags(Path::new("/nonexistent/infiniband")).is_empty());
    }

    #[test]
    fn test_probes_never_error() {
        // Every probe must degrade to a tag set on any host
        for probe in Probe::ALL {
            let _ = probe.detect();
        }
    }
}
