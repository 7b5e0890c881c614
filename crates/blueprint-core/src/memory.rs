//! In-memory host implementation.
//!
//! [`MemorySite`] implements every host collaborator over a single
//! [`SiteSnapshot`] guarded by a lock. Media files live on disk under a media
//! root as `{media_id}/{filename}`. The snapshot is serializable, so a caller
//! can persist a site between runs.
//!
//! ## Example
//!
//! ```
//! use blueprint_core::{ContentStore, EntryQuery, MemorySite, NewEntry};
//!
//! let site = MemorySite::new(std::env::temp_dir());
//! let entry = site.insert_entry(NewEntry::published("rabbit", "Peter")).unwrap();
//! assert_eq!(site.find_entries(&EntryQuery::of_types(["rabbit"])).unwrap(), vec![entry]);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::{Entry, EntryId, EntryQuery, NewEntry};
use crate::error::{CoreError, CoreResult};
use crate::field::MetaEntry;
use crate::media::{MediaId, MediaItem, Rendition, RenditionSize, mime_type_for, render_thumbnails};
use crate::options::OptionRepository;
use crate::store::{ClassificationStore, ContentStore, MediaStore};
use crate::taxonomy::{NewTerm, Term, TermId};

/// Slug of the term every host seeds into its default taxonomy.
pub const DEFAULT_TERM_SLUG: &str = "uncategorized";

/// Serializable state of a [`MemorySite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSnapshot {
	/// Entry types provided by the host.
	pub core_types: Vec<String>,
	/// Taxonomies provided by the host.
	pub core_taxonomies: Vec<String>,
	/// Entries by identifier.
	pub entries: BTreeMap<EntryId, Entry>,
	/// Field values by entry.
	pub meta: BTreeMap<EntryId, Vec<MetaEntry>>,
	/// Terms by identifier.
	pub terms: BTreeMap<TermId, Term>,
	/// Term assignments by entry.
	pub assignments: BTreeMap<EntryId, Vec<TermId>>,
	/// Media items by identifier.
	pub media: BTreeMap<MediaId, MediaItem>,
	/// Key/value options.
	pub options: BTreeMap<String, Value>,
	/// Rendition sizes generated for images.
	pub rendition_sizes: Vec<RenditionSize>,
	/// Next entry identifier.
	pub next_entry_id: EntryId,
	/// Next term identifier.
	pub next_term_id: TermId,
	/// Next media identifier.
	pub next_media_id: MediaId,
}

impl Default for SiteSnapshot {
	fn default() -> Self {
		let mut terms = BTreeMap::new();
		terms.insert(
			1,
			Term {
				id: 1,
				taxonomy: "category".to_string(),
				slug: DEFAULT_TERM_SLUG.to_string(),
				name: "Uncategorized".to_string(),
				parent: None,
			},
		);
		Self {
			core_types: vec!["post".to_string(), "page".to_string()],
			core_taxonomies: vec!["category".to_string(), "post_tag".to_string()],
			entries: BTreeMap::new(),
			meta: BTreeMap::new(),
			terms,
			assignments: BTreeMap::new(),
			media: BTreeMap::new(),
			options: BTreeMap::new(),
			rendition_sizes: RenditionSize::defaults(),
			next_entry_id: 1,
			next_term_id: 2,
			next_media_id: 1,
		}
	}
}

/// A complete host kept in memory.
pub struct MemorySite {
	state: RwLock<SiteSnapshot>,
	media_root: PathBuf,
}

impl MemorySite {
	/// Creates a freshly seeded site storing media under `media_root`.
	pub fn new(media_root: impl Into<PathBuf>) -> Self {
		Self::from_snapshot(SiteSnapshot::default(), media_root)
	}

	/// Creates a site from saved state.
	pub fn from_snapshot(snapshot: SiteSnapshot, media_root: impl Into<PathBuf>) -> Self {
		Self {
			state: RwLock::new(snapshot),
			media_root: media_root.into(),
		}
	}

	/// Starts entry, term and media identifiers at or above `offset`.
	///
	/// Useful for making a destination's identifiers differ from a source's.
	pub fn with_id_offset(self, offset: u64) -> Self {
		{
			let mut state = self.state.write();
			state.next_entry_id = state.next_entry_id.max(offset);
			state.next_term_id = state.next_term_id.max(offset);
			state.next_media_id = state.next_media_id.max(offset);
		}
		self
	}

	/// Replaces the rendition sizes generated for images.
	pub fn with_rendition_sizes(self, sizes: Vec<RenditionSize>) -> Self {
		self.state.write().rendition_sizes = sizes;
		self
	}

	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> SiteSnapshot {
		self.state.read().clone()
	}

	/// Root directory holding media files.
	pub fn media_root(&self) -> &Path {
		&self.media_root
	}

	/// Stores raw bytes as a new media item.
	pub fn upload(&self, filename: &str, data: &[u8]) -> CoreResult<MediaItem> {
		let mut state = self.state.write();
		let id = state.next_media_id;
		let file = PathBuf::from(id.to_string()).join(filename);
		let target = self.media_root.join(&file);
		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
		}
		fs::write(&target, data).map_err(|e| CoreError::io(&target, e))?;

		let item = MediaItem {
			id,
			filename: filename.to_string(),
			mime_type: mime_type_for(filename),
			title: title_from_filename(filename),
			file,
			size: data.len() as u64,
			renditions: Vec::new(),
		};
		state.next_media_id += 1;
		state.media.insert(id, item.clone());
		Ok(item)
	}

	fn remove_media_files(&self, item: &MediaItem) {
		let dir = self.media_root.join(item.id.to_string());
		if let Err(e) = fs::remove_dir_all(&dir)
			&& e.kind() != std::io::ErrorKind::NotFound
		{
			tracing::warn!(media_id = item.id, error = %e, "failed to remove media directory");
		}
	}
}

fn title_from_filename(filename: &str) -> String {
	Path::new(filename)
		.file_stem()
		.and_then(|s| s.to_str())
		.unwrap_or(filename)
		.to_string()
}

impl OptionRepository for MemorySite {
	fn get_option(&self, key: &str) -> CoreResult<Option<Value>> {
		Ok(self.state.read().options.get(key).cloned())
	}

	fn set_option(&self, key: &str, value: Value) -> CoreResult<()> {
		self.state.write().options.insert(key.to_string(), value);
		Ok(())
	}

	fn delete_option(&self, key: &str) -> CoreResult<bool> {
		Ok(self.state.write().options.remove(key).is_some())
	}
}

impl ContentStore for MemorySite {
	fn core_types(&self) -> Vec<String> {
		self.state.read().core_types.clone()
	}

	fn get_entry(&self, id: EntryId) -> CoreResult<Option<Entry>> {
		Ok(self.state.read().entries.get(&id).cloned())
	}

	fn find_entries(&self, query: &EntryQuery) -> CoreResult<Vec<Entry>> {
		Ok(self
			.state
			.read()
			.entries
			.values()
			.filter(|entry| query.matches(entry))
			.cloned()
			.collect())
	}

	fn insert_entry(&self, entry: NewEntry) -> CoreResult<Entry> {
		let mut state = self.state.write();
		let id = state.next_entry_id;
		state.next_entry_id += 1;
		let entry = Entry {
			id,
			entry_type: entry.entry_type,
			title: entry.title,
			body: entry.body,
			status: entry.status,
			created_at: entry.created_at,
			modified_at: entry.modified_at,
		};
		state.entries.insert(id, entry.clone());
		Ok(entry)
	}

	fn delete_entry(&self, id: EntryId) -> CoreResult<bool> {
		let mut state = self.state.write();
		state.meta.remove(&id);
		state.assignments.remove(&id);
		Ok(state.entries.remove(&id).is_some())
	}

	fn entry_meta(&self, id: EntryId) -> CoreResult<Vec<MetaEntry>> {
		Ok(self.state.read().meta.get(&id).cloned().unwrap_or_default())
	}

	fn add_entry_meta(&self, id: EntryId, meta: MetaEntry) -> CoreResult<()> {
		let mut state = self.state.write();
		if !state.entries.contains_key(&id) {
			return Err(CoreError::NotFound {
				kind: "entry",
				id: id.to_string(),
			});
		}
		state.meta.entry(id).or_default().push(meta);
		Ok(())
	}
}

impl ClassificationStore for MemorySite {
	fn core_taxonomies(&self) -> Vec<String> {
		self.state.read().core_taxonomies.clone()
	}

	fn get_term(&self, id: TermId) -> CoreResult<Option<Term>> {
		Ok(self.state.read().terms.get(&id).cloned())
	}

	fn find_term(&self, taxonomy: &str, slug: &str) -> CoreResult<Option<Term>> {
		Ok(self
			.state
			.read()
			.terms
			.values()
			.find(|t| t.taxonomy == taxonomy && t.slug == slug)
			.cloned())
	}

	fn terms(&self, taxonomy: &str) -> CoreResult<Vec<Term>> {
		Ok(self
			.state
			.read()
			.terms
			.values()
			.filter(|t| t.taxonomy == taxonomy)
			.cloned()
			.collect())
	}

	fn insert_term(&self, term: NewTerm) -> CoreResult<Term> {
		let mut state = self.state.write();
		if state
			.terms
			.values()
			.any(|t| t.taxonomy == term.taxonomy && t.slug == term.slug)
		{
			return Err(CoreError::SlugConflict {
				kind: "term",
				slug: format!("{}/{}", term.taxonomy, term.slug),
			});
		}
		let id = state.next_term_id;
		state.next_term_id += 1;
		let term = Term {
			id,
			taxonomy: term.taxonomy,
			slug: term.slug,
			name: term.name,
			parent: term.parent,
		};
		state.terms.insert(id, term.clone());
		Ok(term)
	}

	fn delete_term(&self, id: TermId) -> CoreResult<bool> {
		let mut state = self.state.write();
		if state.terms.remove(&id).is_none() {
			return Ok(false);
		}
		for assigned in state.assignments.values_mut() {
			assigned.retain(|t| *t != id);
		}
		for term in state.terms.values_mut() {
			if term.parent == Some(id) {
				term.parent = None;
			}
		}
		Ok(true)
	}

	fn entry_terms(&self, entry: EntryId) -> CoreResult<Vec<Term>> {
		let state = self.state.read();
		Ok(state
			.assignments
			.get(&entry)
			.map(|ids| ids.iter().filter_map(|id| state.terms.get(id).cloned()).collect())
			.unwrap_or_default())
	}

	fn assign_term(&self, entry: EntryId, term: TermId) -> CoreResult<()> {
		let mut state = self.state.write();
		if !state.entries.contains_key(&entry) {
			return Err(CoreError::NotFound {
				kind: "entry",
				id: entry.to_string(),
			});
		}
		if !state.terms.contains_key(&term) {
			return Err(CoreError::NotFound {
				kind: "term",
				id: term.to_string(),
			});
		}
		let assigned = state.assignments.entry(entry).or_default();
		if !assigned.contains(&term) {
			assigned.push(term);
		}
		Ok(())
	}
}

impl MediaStore for MemorySite {
	fn get_media(&self, id: MediaId) -> CoreResult<Option<MediaItem>> {
		Ok(self.state.read().media.get(&id).cloned())
	}

	fn list_media(&self) -> CoreResult<Vec<MediaItem>> {
		Ok(self.state.read().media.values().cloned().collect())
	}

	fn media_path(&self, item: &MediaItem) -> PathBuf {
		self.media_root.join(&item.file)
	}

	fn import_file(&self, source: &Path, title: Option<&str>) -> CoreResult<MediaItem> {
		let filename = source
			.file_name()
			.and_then(|n| n.to_str())
			.ok_or_else(|| CoreError::Storage(format!("invalid media file name: {}", source.display())))?;
		let data = fs::read(source).map_err(|e| CoreError::io(source, e))?;
		let mut item = self.upload(filename, &data)?;
		if let Some(title) = title {
			item.title = title.to_string();
			self.state.write().media.insert(item.id, item.clone());
		}
		Ok(item)
	}

	fn regenerate_renditions(&self, id: MediaId) -> CoreResult<Vec<Rendition>> {
		let (item, sizes) = {
			let state = self.state.read();
			let item = state.media.get(&id).cloned().ok_or_else(|| CoreError::NotFound {
				kind: "media",
				id: id.to_string(),
			})?;
			(item, state.rendition_sizes.clone())
		};

		for old in &item.renditions {
			let path = self.media_root.join(&old.file);
			if let Err(e) = fs::remove_file(&path)
				&& e.kind() != std::io::ErrorKind::NotFound
			{
				return Err(CoreError::io(path, e));
			}
		}

		let renditions = if item.is_image() {
			render_thumbnails(&self.media_root, &item, &sizes)?
		} else {
			Vec::new()
		};
		if let Some(stored) = self.state.write().media.get_mut(&id) {
			stored.renditions = renditions.clone();
		}
		Ok(renditions)
	}

	fn delete_media(&self, id: MediaId) -> CoreResult<bool> {
		let removed = self.state.write().media.remove(&id);
		match removed {
			Some(item) => {
				self.remove_media_files(&item);
				Ok(true)
			}
			None => Ok(false),
		}
	}
}
