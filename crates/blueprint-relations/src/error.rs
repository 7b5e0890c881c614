use blueprint_core::{Cardinality, EntryId};
use thiserror::Error;

/// Errors raised by relationship storage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RelationError {
	/// Linking would break the relationship's cardinality.
	#[error(
		"Cardinality violation on '{name}' ({cardinality}): cannot link {id_from} -> {id_to}, entry {conflicting} is already linked"
	)]
	CardinalityViolation {
		name: String,
		cardinality: Cardinality,
		id_from: EntryId,
		id_to: EntryId,
		conflicting: EntryId,
	},

	/// The backing table failed.
	#[error("Relationship storage error: {0}")]
	Storage(String),
}

/// Result type for relationship operations
pub type RelationResult<T> = std::result::Result<T, RelationError>;
