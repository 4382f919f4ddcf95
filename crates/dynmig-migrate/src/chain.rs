//! Version-stepping over an ordered rule list.
//!
//! Both workspace and node migration walk their rules the same way:
//! starting at the declared version, repeatedly pick the first rule (in
//! ascending `from` order, ties in declaration order) whose `from` is at or
//! above the tracked version, apply it, and advance the tracked version to
//! the rule's `to`. The walk stops when the tracked version reaches the
//! current version, when no rule qualifies, after a terminal rule, or after
//! a flat rule (`to == from`), which would otherwise select itself forever.
//!
//! Rule selection never depends on what a transform did, so the chain is
//! planned up front and applied by the caller step by step.

use dynmig_core::Version;
use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// The rules a chain will apply, in order, and where it ends.
#[derive(Debug)]
pub struct ChainPlan<'r, R> {
    pub steps: Vec<&'r R>,
    /// Tracked version after the last step. `None` if the declared version
    /// was missing or a terminal rule ran.
    pub reached: Option<Version>,
}

/// What a chain did: rule names applied and the version reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainOutcome {
    pub fired: Vec<String>,
    pub reached: Option<Version>,
}

impl ChainOutcome {
    pub fn attempted(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// Plans the chain for `declared` against `rules`, which must already be
/// sorted by `from` with a stable sort.
pub fn plan_chain<'r, R: Rule>(
    rules: &'r [R],
    declared: Option<Version>,
    current: Version,
) -> ChainPlan<'r, R> {
    let mut steps = Vec::new();
    let mut version = declared;

    while let Some(v) = version {
        if v >= current {
            break;
        }

        let Some(rule) = next_rule(rules, v) else {
            break;
        };
        steps.push(rule);

        match rule.bounds().to {
            None => version = None,
            Some(to) => {
                // `to >= from >= v`, so the version never moves backwards.
                version = Some(to.max(v));
                if to == rule.bounds().from {
                    break;
                }
            }
        }
    }

    ChainPlan {
        steps,
        reached: version,
    }
}

/// First rule whose `from` is at or above `version`. Rules below the
/// tracked version are treated as already superseded.
pub fn next_rule<R: Rule>(rules: &[R], version: Version) -> Option<&R> {
    rules.iter().find(|r| r.bounds().from >= version)
}
