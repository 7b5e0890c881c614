//! Host collaborator interfaces.
//!
//! These traits are the only way the blueprint pipeline reaches the host CMS.
//! Implementations must be usable through `Arc<dyn Trait>` and take `&self`;
//! any mutation happens behind interior mutability.

use std::path::{Path, PathBuf};

use crate::entry::{Entry, EntryId, EntryQuery, NewEntry};
use crate::error::CoreResult;
use crate::field::MetaEntry;
use crate::media::{MediaId, MediaItem, Rendition};
use crate::taxonomy::{NewTerm, Term, TermId};

/// Typed content entries and their field values.
pub trait ContentStore: Send + Sync {
	/// Entry types the host itself provides (e.g. "post", "page").
	fn core_types(&self) -> Vec<String>;

	/// Reads an entry.
	fn get_entry(&self, id: EntryId) -> CoreResult<Option<Entry>>;

	/// Lists entries matching the query, ordered by identifier.
	fn find_entries(&self, query: &EntryQuery) -> CoreResult<Vec<Entry>>;

	/// Creates an entry and assigns it a fresh identifier.
	fn insert_entry(&self, entry: NewEntry) -> CoreResult<Entry>;

	/// Deletes an entry together with its field values and term assignments.
	fn delete_entry(&self, id: EntryId) -> CoreResult<bool>;

	/// Returns an entry's field values in insertion order.
	fn entry_meta(&self, id: EntryId) -> CoreResult<Vec<MetaEntry>>;

	/// Appends a field value to an entry.
	fn add_entry_meta(&self, id: EntryId, meta: MetaEntry) -> CoreResult<()>;
}

/// Taxonomy terms and their assignment to entries.
pub trait ClassificationStore: Send + Sync {
	/// Taxonomies the host itself provides (e.g. "category").
	fn core_taxonomies(&self) -> Vec<String>;

	/// Reads a term.
	fn get_term(&self, id: TermId) -> CoreResult<Option<Term>>;

	/// Finds a term by taxonomy and slug.
	fn find_term(&self, taxonomy: &str, slug: &str) -> CoreResult<Option<Term>>;

	/// Lists the terms of a taxonomy.
	fn terms(&self, taxonomy: &str) -> CoreResult<Vec<Term>>;

	/// Creates a term.
	///
	/// Fails with [`CoreError::SlugConflict`](crate::CoreError::SlugConflict) if the
	/// taxonomy already has a term with this slug.
	fn insert_term(&self, term: NewTerm) -> CoreResult<Term>;

	/// Deletes a term and its assignments.
	fn delete_term(&self, id: TermId) -> CoreResult<bool>;

	/// Returns the terms assigned to an entry, in assignment order.
	fn entry_terms(&self, entry: EntryId) -> CoreResult<Vec<Term>>;

	/// Assigns a term to an entry. Assigning twice is a no-op.
	fn assign_term(&self, entry: EntryId, term: TermId) -> CoreResult<()>;
}

/// Uploaded files.
pub trait MediaStore: Send + Sync {
	/// Reads a media item.
	fn get_media(&self, id: MediaId) -> CoreResult<Option<MediaItem>>;

	/// Lists every media item.
	fn list_media(&self) -> CoreResult<Vec<MediaItem>>;

	/// Absolute path of a media item's file.
	fn media_path(&self, item: &MediaItem) -> PathBuf;

	/// Copies a file into the store and creates a media item for it.
	fn import_file(&self, source: &Path, title: Option<&str>) -> CoreResult<MediaItem>;

	/// Regenerates derived renditions (e.g. thumbnails) for a media item.
	fn regenerate_renditions(&self, id: MediaId) -> CoreResult<Vec<Rendition>>;

	/// Deletes a media item, its file and its renditions.
	fn delete_media(&self, id: MediaId) -> CoreResult<bool>;
}
