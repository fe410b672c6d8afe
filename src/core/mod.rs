// Public modules
pub mod error;
pub mod files;
pub mod library;
pub mod normalize;
pub mod rename;

// Internal modules - not part of public API
pub(crate) mod paths;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use files::{FileSystem, LocalFs};
pub use library::{Asset, AssetId, AssetStore, JsonLibrary, Variant, VariantRegistry};
pub use normalize::normalize;
pub use rename::{
    FailureKind, PlanAction, PlannedRename, RenameEngine, RenameFailure, RenameOutcome,
    RenameSuccess, RenameSummary,
};
