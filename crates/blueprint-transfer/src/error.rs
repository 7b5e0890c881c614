//! Error types for blueprint transfer.
//!
//! Only fatal failures are errors. Per-item failures (slug conflicts,
//! unresolvable references) are collected in a
//! [`StepReport`](crate::import::StepReport) instead.

use std::path::PathBuf;

use blueprint_core::CoreError;
use blueprint_relations::RelationError;
use thiserror::Error;

/// Errors that stop an export, import or reset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransferError {
	/// The running environment is older than the archive requires.
	#[error("Incompatible {component} version: archive requires {required}, running {actual}")]
	IncompatibleVersion {
		/// "host" or "plugin".
		component: &'static str,
		/// Minimum version from the manifest.
		required: String,
		/// Version of the running environment.
		actual: String,
	},

	/// The manifest is missing or malformed.
	#[error("Invalid manifest: {0}")]
	InvalidManifest(String),

	/// A file or directory operation failed.
	#[error("IO error at {path}: {source}")]
	Io {
		/// Path being accessed.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// The archive could not be read or written.
	#[error("Archive error: {0}")]
	Archive(#[from] zip::result::ZipError),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Settings could not be loaded.
	#[error("Configuration error: {0}")]
	Config(String),

	/// A host store failed.
	#[error(transparent)]
	Core(#[from] CoreError),

	/// The relationship table failed.
	#[error(transparent)]
	Relation(#[from] RelationError),

	/// Any other failure, with its cause.
	#[error("Unclassified failure: {0}")]
	Unclassified(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransferError {
	/// Wraps an I/O error with the path it concerns.
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Wraps a foreign error.
	pub fn unclassified(source: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self::Unclassified(Box::new(source))
	}
}

/// Result type alias for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::error::Error as _;

	#[rstest]
	fn test_incompatible_version_message() {
		let err = TransferError::IncompatibleVersion {
			component: "host",
			required: "7.0.0".to_string(),
			actual: "6.4.0".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Incompatible host version: archive requires 7.0.0, running 6.4.0"
		);
	}

	#[rstest]
	fn test_unclassified_keeps_cause() {
		let cause = std::io::Error::other("disk on fire");
		let err = TransferError::unclassified(cause);

		assert!(err.source().is_some());
		assert!(err.to_string().contains("disk on fire"));
	}
}
