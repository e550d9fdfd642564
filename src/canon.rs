//! Ordered literal-substring path canonicalization.
//!
//! Known naming divergences between the reference and target trees (mirrored
//! parts, revised hardware sizes, variant suffixes) are bridged by an ordered
//! list of literal rewrites. Each rule is applied to the output of the
//! previous one, so order is significant and compound rewrites are possible.
//! The rules are deliberately plain substrings, not patterns; keeping the
//! whole mechanism behind this type lets a structured rule engine replace it
//! later without touching the reconciler.

use crate::domain::Rule;

/// An ordered list of literal substring rewrites.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Apply every rule in order. Each application replaces all
    /// non-overlapping occurrences in one left-to-right pass. Total and
    /// deterministic; idempotence holds only when no rule's output is
    /// matched by an earlier rule, which is on the ruleset author.
    pub fn apply(&self, path: &str) -> String {
        let mut out = path.to_string();
        for rule in &self.rules {
            out = out.replace(&rule.find, &rule.replace);
        }
        out
    }
}
