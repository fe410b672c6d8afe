use serde::Serialize;
use std::fmt;

use crate::library::AssetId;

/// One successful file rename (primary file or variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSuccess {
    pub asset_id: AssetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub from: String,
    pub to: String,
    /// Went through an intermediate temp file because only letter case changed.
    pub case_only: bool,
}

impl fmt::Display for RenameSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_only {
            write!(f, "Renamed (case-only): {} -> {}", self.from, self.to)
        } else {
            write!(f, "Renamed: {} -> {}", self.from, self.to)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Source file missing, or the record carries no path.
    NotFound,
    /// The OS-level rename call failed.
    RenameFailed,
    /// Destination already occupied by a different file.
    TargetExists,
    /// Files were renamed but the record update could not be written.
    RecordWriteFailed,
}

/// One failed rename attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFailure {
    pub asset_id: AssetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub kind: FailureKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for RenameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::NotFound => write!(f, "File not found: {}", self.path),
            FailureKind::RenameFailed => write!(f, "Failed to rename: {}", self.path),
            FailureKind::TargetExists => write!(f, "Target file already exists: {}", self.path),
            FailureKind::RecordWriteFailed => write!(f, "Failed to update record: {}", self.path),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSummary {
    pub renamed: usize,
    pub case_only: usize,
    pub errors: usize,
}

/// Everything a run did, in the order it happened. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    pub successes: Vec<RenameSuccess>,
    pub errors: Vec<RenameFailure>,
}

impl RenameOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, success: RenameSuccess) {
        self.successes.push(success);
    }

    pub fn record_failure(&mut self, failure: RenameFailure) {
        self.errors.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn summary(&self) -> RenameSummary {
        let case_only = self.successes.iter().filter(|s| s.case_only).count();
        RenameSummary {
            renamed: self.successes.len() - case_only,
            case_only,
            errors: self.errors.len(),
        }
    }

    pub fn success_messages(&self) -> Vec<String> {
        self.successes.iter().map(ToString::to_string).collect()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Operator-facing report: a "Successes" list and an "Errors" list, each
    /// omitted when empty.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Rename Media Results\n");

        if self.successes.is_empty() && self.errors.is_empty() {
            out.push_str("\nNo media files were processed.\n");
            return out;
        }

        if !self.successes.is_empty() {
            out.push_str("\n## Successes\n\n");
            for message in self.success_messages() {
                out.push_str(&format!("- {}\n", message));
            }
        }

        if !self.errors.is_empty() {
            out.push_str("\n## Errors\n\n");
            for failure in &self.errors {
                match &failure.reason {
                    Some(reason) => out.push_str(&format!("- {} ({})\n", failure, reason)),
                    None => out.push_str(&format!("- {}\n", failure)),
                }
            }
        }

        out
    }
}
