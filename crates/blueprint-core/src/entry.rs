//! Content entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host identifier of an entry.
pub type EntryId = u64;

/// Publication status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
	/// Work in progress.
	#[default]
	Draft,
	/// Awaiting review.
	Pending,
	/// Visible only to privileged users.
	Private,
	/// Publicly visible.
	Publish,
	/// Soft-deleted.
	Trash,
}

/// A unit of content of a given type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
	/// Host identifier.
	pub id: EntryId,
	/// Slug of the entry's type.
	pub entry_type: String,
	/// Title.
	pub title: String,
	/// Body content.
	pub body: String,
	/// Publication status.
	pub status: EntryStatus,
	/// Creation time.
	pub created_at: DateTime<Utc>,
	/// Last modification time.
	pub modified_at: DateTime<Utc>,
}

/// Values for an entry that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
	/// Slug of the entry's type.
	pub entry_type: String,
	/// Title.
	pub title: String,
	/// Body content.
	pub body: String,
	/// Publication status.
	pub status: EntryStatus,
	/// Creation time.
	pub created_at: DateTime<Utc>,
	/// Last modification time.
	pub modified_at: DateTime<Utc>,
}

impl NewEntry {
	/// Creates a draft entry stamped with the current time.
	pub fn new(entry_type: impl Into<String>, title: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			entry_type: entry_type.into(),
			title: title.into(),
			body: String::new(),
			status: EntryStatus::Draft,
			created_at: now,
			modified_at: now,
		}
	}

	/// Sets the body content.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	/// Sets the publication status.
	pub fn with_status(mut self, status: EntryStatus) -> Self {
		self.status = status;
		self
	}

	/// Sets both timestamps.
	pub fn with_timestamps(mut self, created_at: DateTime<Utc>, modified_at: DateTime<Utc>) -> Self {
		self.created_at = created_at;
		self.modified_at = modified_at;
		self
	}

	/// Shorthand for a published entry.
	pub fn published(entry_type: impl Into<String>, title: impl Into<String>) -> Self {
		Self::new(entry_type, title).with_status(EntryStatus::Publish)
	}
}

/// Filter for listing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
	/// Entry type slugs to include. Empty means every type.
	pub types: Vec<String>,
	/// Only entries with this status, if set.
	pub status: Option<EntryStatus>,
}

impl EntryQuery {
	/// Matches every entry.
	pub fn all() -> Self {
		Self::default()
	}

	/// Restricts the query to the given types.
	pub fn of_types<I, S>(types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
			status: None,
		}
	}

	/// Restricts the query to a status.
	pub fn with_status(mut self, status: EntryStatus) -> Self {
		self.status = Some(status);
		self
	}

	/// Returns true if the entry passes this filter.
	pub fn matches(&self, entry: &Entry) -> bool {
		let type_ok = self.types.is_empty() || self.types.iter().any(|t| *t == entry.entry_type);
		let status_ok = self.status.is_none_or(|status| status == entry.status);
		type_ok && status_ok
	}
}
