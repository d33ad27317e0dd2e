//! Target shell dialects
//!
//! The supported set is a closed enumeration; anything else fails with
//! `UnsupportedDialect` before any resolution work happens.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModenvError, unsupported_dialect};

/// Syntax variant of the shell that will source the emitted script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// POSIX sh, bash, zsh
    Sh,
    /// csh, tcsh
    Csh,
    /// fish
    Fish,
    /// PowerShell
    Pwsh,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Dialect::Sh, Dialect::Csh, Dialect::Fish, Dialect::Pwsh];

    /// Render an assignment of `value` to `var`
    pub fn render_set(self, var: &str, value: &str) -> String {
        match self {
            Dialect::Sh => format!("export {}=\"{}\"", var, escape_posix(value)),
            Dialect::Csh => format!("setenv {} \"{}\"", var, escape_posix(value)),
            Dialect::Fish => format!("set -gx {} \"{}\"", var, escape_posix(value)),
            Dialect::Pwsh => format!("$Env:{} = \"{}\"", var, escape_pwsh(value)),
        }
    }

    /// Render removal of `var`
    pub fn render_unset(self, var: &str) -> String {
        match self {
            Dialect::Sh => format!("unset {var}"),
            Dialect::Csh => format!("unsetenv {var}"),
            Dialect::Fish => format!("set -e {var}"),
            Dialect::Pwsh => {
                format!("Remove-Item -Path Env:{var} -ErrorAction SilentlyContinue")
            }
        }
    }
}

/// Escape a value for a double-quoted POSIX-family string
fn escape_posix(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '$' | '`' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a value for a double-quoted PowerShell string
fn escape_pwsh(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '$' | '`') {
            escaped.push('`');
        }
        escaped.push(c);
    }
    escaped
}

impl FromStr for Dialect {
    type Err = ModenvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sh" | "bash" | "zsh" => Ok(Dialect::Sh),
            "csh" | "tcsh" => Ok(Dialect::Csh),
            "fish" => Ok(Dialect::Fish),
            "pwsh" | "powershell" => Ok(Dialect::Pwsh),
            other => Err(unsupported_dialect(other)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Sh => "sh",
            Dialect::Csh => "csh",
            Dialect::Fish => "fish",
            Dialect::Pwsh => "pwsh",
        };
        write!(f, "{name}")
    }
}
