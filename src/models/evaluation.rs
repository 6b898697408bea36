//! Inputs and outputs of a single change evaluation.

use serde::{Deserialize, Serialize};

/// What one evaluation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Absolute http(s) URL of the page
    pub url: String,
    /// Optional CSS selector scoping the compared text
    pub selector: Option<String>,
    /// Baseline store key (a file path for `LocalStorage`)
    pub baseline_key: String,
}

/// Why an evaluation reached its decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// No baseline existed; the current fingerprint became the baseline
    FirstRun,
    Unchanged,
    Changed,
}

impl ChangeReason {
    /// Human-readable description for logs.
    pub fn message(&self) -> &'static str {
        match self {
            ChangeReason::FirstRun => "First run - baseline hash saved",
            ChangeReason::Unchanged => "No changes detected",
            ChangeReason::Changed => "Change detected on monitored page",
        }
    }
}

/// Decision produced by one evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub changed: bool,
    pub reason: ChangeReason,
    /// Fingerprint of the content fetched this run
    pub fingerprint: String,
}

impl EvaluationResult {
    pub fn first_run(fingerprint: String) -> Self {
        Self {
            changed: false,
            reason: ChangeReason::FirstRun,
            fingerprint,
        }
    }

    pub fn unchanged(fingerprint: String) -> Self {
        Self {
            changed: false,
            reason: ChangeReason::Unchanged,
            fingerprint,
        }
    }

    pub fn changed(fingerprint: String) -> Self {
        Self {
            changed: true,
            reason: ChangeReason::Changed,
            fingerprint,
        }
    }

    /// Human-readable description for logs.
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}
