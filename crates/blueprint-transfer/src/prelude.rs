//! Convenience re-exports for common usage.

// Error types
pub use crate::error::{TransferError, TransferResult};

// Pipelines
pub use crate::context::SiteContext;
pub use crate::export::{ExportOutcome, ExportRequest, Exporter};
pub use crate::import::{IdMap, ImportReport, Importer, ItemErrorKind, Resolution, StepReport};
pub use crate::reset::{ResetReport, ResetScope, Resetter};

// Documents and configuration
pub use crate::manifest::{Manifest, MetaOverrides};
pub use crate::settings::TransferSettings;

// Command types
pub use crate::commands::{
	ExportArgs, ExportCommand, ExportOptions, ImportArgs, ImportCommand, ImportOptions, ResetCommand, ResetOptions,
};
