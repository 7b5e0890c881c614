//! Error types for host store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by host collaborators and definition registries.
#[derive(Debug, Error)]
pub enum CoreError {
	/// A record with the given identifier does not exist.
	#[error("{kind} not found: {id}")]
	NotFound {
		/// Record family (e.g. "entry", "term").
		kind: &'static str,
		/// Identifier that was looked up.
		id: String,
	},

	/// A definition or term with the same slug already exists.
	#[error("{kind} with slug '{slug}' already exists")]
	SlugConflict {
		/// Record family (e.g. "model", "taxonomy").
		kind: &'static str,
		/// Conflicting slug.
		slug: String,
	},

	/// Filesystem operation failed.
	#[error("IO error at {}: {source}", path.display())]
	Io {
		/// Path being accessed.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// An option holds a value of the wrong shape.
	#[error("Invalid option value for '{key}': {message}")]
	InvalidOption {
		/// Option key.
		key: String,
		/// What was wrong with it.
		message: String,
	},

	/// Backend-specific storage failure.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl CoreError {
	/// Builds an [`CoreError::Io`] for the given path.
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Returns true if this error is a slug conflict.
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::SlugConflict { .. })
	}
}

/// Result type alias for host store operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_slug_conflict_message() {
		let error = CoreError::SlugConflict {
			kind: "model",
			slug: "rabbit".to_string(),
		};
		assert_eq!(error.to_string(), "model with slug 'rabbit' already exists");
		assert!(error.is_conflict());
	}

	#[rstest]
	fn test_io_error_includes_path() {
		let error = CoreError::io(
			"/tmp/missing.jpg",
			std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
		);
		assert_eq!(error.to_string(), "IO error at /tmp/missing.jpg: gone");
		assert!(!error.is_conflict());
	}
}
