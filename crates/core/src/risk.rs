//! Risk classification for kubectl verbs.
use std::fmt;

const LOW_RISK_VERBS: &[&str] = &["get", "describe", "logs", "top"];
const MEDIUM_RISK_VERBS: &[&str] = &["exec", "port-forward", "cp", "edit"];

/// Cluster-impact tier of a kubectl command, derived from its verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    /// Whether the session loop should print a warning for this tier.
    pub fn warns(&self) -> bool {
        !matches!(self, RiskTier::Low)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a kubectl verb to its risk tier.
///
/// Verbs absent from the LOW and MEDIUM tables are treated as HIGH risk, so
/// an unknown or misspelled verb is never under-reported.
pub fn classify(verb: &str) -> RiskTier {
    if LOW_RISK_VERBS.contains(&verb) {
        RiskTier::Low
    } else if MEDIUM_RISK_VERBS.contains(&verb) {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}
