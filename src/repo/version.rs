//! Version ordering for module definitions
//!
//! Versions in the wild are not semver: `13.2`, `2024a`, `4.1.5-debug` all
//! occur. The order defined here is total and documented:
//!
//! - Versions split into segments at `.`, `-` and `_`.
//! - Two numeric segments compare numerically (`10` > `9`).
//! - Any other segment pair compares lexically (`0rc1` > `0`), so ill-formed
//!   or mixed versions still have a defined place in the order.
//! - When one version is a prefix of the other, the shorter sorts first.
//!
//! Versions whose segments all compare equal are equal; among equal versions
//! the most recently built index entry wins selection.

use std::cmp::Ordering;

/// Compare two version strings with the documented total order
pub fn compare(a: &str, b: &str) -> Ordering {
    let a_segments: Vec<&str> = split_segments(a);
    let b_segments: Vec<&str> = split_segments(b);

    for (sa, sb) in a_segments.iter().zip(b_segments.iter()) {
        let ordering = compare_segment(sa, sb);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_segments.len().cmp(&b_segments.len())
}

fn split_segments(version: &str) -> Vec<&str> {
    version
        .split(['.', '-', '_'])
        .filter(|s| !s.is_empty())
        .collect()
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(na), Ok(nb)) => na.cmp(&nb),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_version_order {
        ($test_name:ident, $lesser:expr, $greater:expr) => {
            #[test]
            fn $test_name() {
                assert_eq!(compare($lesser, $greater), Ordering::Less);
                assert_eq!(compare($greater, $lesser), Ordering::Greater);
            }
        };
    }

    test_version_order!(test_numeric_segments, "9.0", "10.0");
    test_version_order!(test_patch_level, "4.1.4", "4.1.5");
    test_version_order!(test_prefix_sorts_first, "4.1", "4.1.5");
    test_version_order!(test_lexical_fallback, "2023b", "2024a");
    test_version_order!(test_mixed_segment_is_lexical, "1.0", "1.0rc1");
    test_version_order!(test_suffix_separator, "4.1.5", "4.1.5-debug");

    #[test]
    fn test_equal_versions() {
        assert_eq!(compare("13.2", "13.2"), Ordering::Equal);
        assert_eq!(compare("13-2", "13.2"), Ordering::Equal);
    }

    #[test]
    fn test_empty_segments_ignored() {
        assert_eq!(compare("1..0", "1.0"), Ordering::Equal);
    }
}
