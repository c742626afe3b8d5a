// src/policy/fast_mode.rs

//! Fast-mode option overrides.
//!
//! In fast mode each task kind downgrades its expensive options to cheap,
//! bounded values right before the handler runs. The transform is pure and
//! idempotent, and only logs when an override changes the effective value.

use serde_json::Value;
use tracing::info;

use crate::config::StepOptions;
use crate::engine::TaskKind;
use crate::errors::Result;
use crate::tasks::{audit, optimize};

/// Cap applied to `maxHtmlFiles` in fast mode.
pub const FAST_MAX_HTML_FILES: i64 = 200;

/// Option that limits forced overrides to settings the user left unset.
pub const RESPECT_EXPLICIT: &[&str] = &["fastRespectExplicit", "respectExplicitSettings"];

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Force a boolean to `value`. `default` is the handler's default when
    /// the option is unset.
    Force {
        names: &'static [&'static str],
        value: bool,
        default: bool,
    },
    /// Cap an integer limit where 0 (the default) means unlimited.
    Cap {
        names: &'static [&'static str],
        limit: i64,
    },
}

impl Rule {
    fn names(&self) -> &'static [&'static str] {
        match self {
            Rule::Force { names, .. } | Rule::Cap { names, .. } => names,
        }
    }
}

const AUDIT_RULES: &[Rule] = &[
    Rule::Force {
        names: audit::RENDERED_CHECKS,
        value: false,
        default: audit::RENDERED_CHECKS_DEFAULT,
    },
    Rule::Cap {
        names: audit::MAX_HTML_FILES,
        limit: FAST_MAX_HTML_FILES,
    },
];

const SEO_RULES: &[Rule] = &[Rule::Cap {
    names: audit::MAX_HTML_FILES,
    limit: FAST_MAX_HTML_FILES,
}];

const OPTIMIZE_RULES: &[Rule] = &[
    Rule::Force {
        names: optimize::OPTIMIZE_IMAGES,
        value: false,
        default: optimize::OPTIMIZE_IMAGES_DEFAULT,
    },
    Rule::Force {
        names: optimize::HASH_ASSETS,
        value: false,
        default: optimize::HASH_ASSETS_DEFAULT,
    },
    Rule::Force {
        names: optimize::CACHE_HEADERS,
        value: false,
        default: optimize::CACHE_HEADERS_DEFAULT,
    },
    Rule::Force {
        names: optimize::MINIFY_CSS,
        value: false,
        default: optimize::MINIFY_CSS_DEFAULT,
    },
    Rule::Force {
        names: optimize::MINIFY_JS,
        value: false,
        default: optimize::MINIFY_JS_DEFAULT,
    },
    Rule::Cap {
        names: audit::MAX_HTML_FILES,
        limit: FAST_MAX_HTML_FILES,
    },
];

fn rules_for(kind: TaskKind) -> &'static [Rule] {
    match kind {
        TaskKind::Audit | TaskKind::Doctor => AUDIT_RULES,
        TaskKind::SeoDoctor => SEO_RULES,
        TaskKind::Optimize => OPTIMIZE_RULES,
        _ => &[],
    }
}

/// One override that actually changed an option.
#[derive(Debug, Clone, PartialEq)]
pub struct FastOverride {
    pub option: &'static str,
    pub from: Option<Value>,
    pub to: Value,
}

/// Apply the fast-mode rules for `kind` to `options` in place.
///
/// Returns the overrides that flipped behaviour (and were logged). Running it
/// twice yields no overrides the second time.
pub fn apply_fast_mode(kind: TaskKind, options: &mut StepOptions) -> Result<Vec<FastOverride>> {
    let respect_explicit = options.get_or(RESPECT_EXPLICIT, false)?;
    let mut applied = Vec::new();

    for rule in rules_for(kind) {
        let names = rule.names();
        let from = options.raw(names).cloned();
        let to = match *rule {
            Rule::Force { value, default, .. } => {
                let current = options.get::<bool>(names)?;
                if current.unwrap_or(default) == value {
                    continue;
                }
                if respect_explicit && current.is_some() {
                    continue;
                }
                Value::Bool(value)
            }
            Rule::Cap { limit, .. } => {
                let current = options.get::<i64>(names)?;
                let effective = current.unwrap_or(0);
                if effective > 0 && effective <= limit {
                    continue;
                }
                if respect_explicit && current.is_some() {
                    continue;
                }
                Value::from(limit)
            }
        };

        let option = names[0];
        options.set(option, to.clone());
        info!(
            task = %kind,
            option,
            from = ?from,
            to = %to,
            "fast mode override applied"
        );
        applied.push(FastOverride { option, from, to });
    }

    Ok(applied)
}
