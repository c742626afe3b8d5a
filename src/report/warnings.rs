// src/report/warnings.rs

//! Warning bucketing by leading `[CODE]` token.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Bucket for warnings without a leading `[CODE]` token.
pub const UNCODED: &str = "UNCODED";
/// Bucket collecting everything outside the top N.
pub const OTHER: &str = "OTHER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningBucket {
    pub code: String,
    pub count: usize,
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*\[([^\]\s][^\]]*)\]").expect("warning code pattern is valid")
    })
}

/// Leading bracketed code of a warning, upper-cased.
pub fn warning_code(warning: &str) -> Option<String> {
    code_pattern()
        .captures(warning)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

/// Count warnings per code and keep the `top_n` largest buckets (ties broken
/// alphabetically). Uncoded warnings are ranked as an `UNCODED` bucket like
/// any other code; buckets outside the top N fold into a trailing `OTHER`
/// bucket when non-empty.
pub fn bucket_warnings<S: AsRef<str>>(warnings: &[S], top_n: usize) -> Vec<WarningBucket> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for w in warnings {
        let code = warning_code(w.as_ref()).unwrap_or_else(|| UNCODED.to_string());
        *counts.entry(code).or_default() += 1;
    }

    let mut ranked: Vec<WarningBucket> = counts
        .into_iter()
        .map(|(code, count)| WarningBucket { code, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));

    let rest: usize = ranked.iter().skip(top_n).map(|b| b.count).sum();
    ranked.truncate(top_n);
    if rest > 0 {
        ranked.push(WarningBucket {
            code: OTHER.to_string(),
            count: rest,
        });
    }
    ranked
}

/// `A=2, OTHER=2`
pub fn format_buckets(buckets: &[WarningBucket]) -> String {
    buckets
        .iter()
        .map(|b| format!("{}={}", b.code, b.count))
        .collect::<Vec<_>>()
        .join(", ")
}
