// src/policy/explicit_checks.rs

//! Guard requiring audit checks to be spelled out in the step options.

use crate::config::StepOptions;
use crate::errors::{Result, SitepipeError};

/// Option enabling the guard.
pub const REQUIRE_EXPLICIT_CHECKS: &[&str] = &["requireExplicitChecks", "explicitChecks"];

/// A check toggle the auditor understands, with its accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalCheck {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl CanonicalCheck {
    /// Canonical name followed by aliases.
    pub fn spellings(&self) -> Vec<&'static str> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .collect()
    }
}

pub const AUDIT_CHECKS: [CanonicalCheck; 6] = [
    CanonicalCheck {
        name: "checkLinks",
        aliases: &[],
    },
    CanonicalCheck {
        name: "checkAssets",
        aliases: &[],
    },
    CanonicalCheck {
        name: "checkNav",
        aliases: &["checkNavigation"],
    },
    CanonicalCheck {
        name: "checkTitles",
        aliases: &[],
    },
    CanonicalCheck {
        name: "checkIds",
        aliases: &["checkDuplicateIds"],
    },
    CanonicalCheck {
        name: "checkStructure",
        aliases: &["checkHtmlStructure"],
    },
];

/// Canonical names with no spelling present in `options`, in canonical order.
pub fn missing_explicit_checks(options: &StepOptions) -> Vec<&'static str> {
    AUDIT_CHECKS
        .iter()
        .filter(|check| !options.contains(&check.spellings()))
        .map(|check| check.name)
        .collect()
}

/// Refuse to run when `requireExplicitChecks` is set and any check is left
/// implicit. One error lists every missing name.
pub fn ensure_explicit_checks(options: &StepOptions) -> Result<()> {
    if !options.get_or(REQUIRE_EXPLICIT_CHECKS, false)? {
        return Ok(());
    }
    let missing = missing_explicit_checks(options);
    if missing.is_empty() {
        return Ok(());
    }
    Err(SitepipeError::config(format!(
        "requireExplicitChecks is set but these checks are not specified: {}",
        missing.join(", ")
    )))
}
