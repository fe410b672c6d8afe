//! Bulk rename of media files to skeleton case.
//!
//! For every asset in the store:
//! 1. Renames the primary file to its normalized name (via a temp file when
//!    only letter case changes, refusing to overwrite an existing target)
//! 2. Records the new primary path
//! 3. Renames each variant listed in the asset's registry the same way
//! 4. Writes the updated registry back once per asset
//!
//! Nothing is rolled back: a file renamed before a later failure stays renamed.

mod engine;
mod outcome;

pub use engine::{PlanAction, PlannedRename, RenameEngine};
pub use outcome::{FailureKind, RenameFailure, RenameOutcome, RenameSuccess, RenameSummary};
