//! On-disk site used by the CLI.
//!
//! A site file is a single JSON document holding the host state and the
//! relationship table. A missing file stands for a freshly seeded site.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blueprint_core::{MemorySite, SiteSnapshot};
use blueprint_relations::{MemoryRelationshipTable, OrderMark, RelationshipRecord, RelationshipTable};
use blueprint_transfer::{SiteContext, TransferError, TransferResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SiteFile {
	site: SiteSnapshot,
	relationships: Vec<RelationshipRecord>,
	order_marks: Vec<OrderMark>,
}

/// A site loaded from disk, written back with [`FileSite::save`].
pub struct FileSite {
	path: PathBuf,
	site: Arc<MemorySite>,
	table: Arc<MemoryRelationshipTable>,
}

impl FileSite {
	/// Loads the site at `path`, keeping media files under `media_root`.
	pub fn open(path: &Path, media_root: PathBuf) -> TransferResult<Self> {
		let file: SiteFile = match fs::read_to_string(path) {
			Ok(content) => serde_json::from_str(&content)?,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::info!(path = %path.display(), "site file not found, starting from a fresh site");
				SiteFile::default()
			}
			Err(e) => return Err(TransferError::io(path, e)),
		};
		tracing::debug!(
			path = %path.display(),
			entries = file.site.entries.len(),
			relationships = file.relationships.len(),
			"loaded site"
		);

		Ok(Self {
			path: path.to_path_buf(),
			site: Arc::new(MemorySite::from_snapshot(file.site, media_root)),
			table: Arc::new(
				MemoryRelationshipTable::from_records(file.relationships).with_order_marks(file.order_marks),
			),
		})
	}

	/// Collaborators for the pipelines.
	pub fn context(&self) -> SiteContext {
		SiteContext::from_memory(self.site.clone(), self.table.clone())
	}

	/// Saves the site after a command, whether or not the command succeeded.
	///
	/// Imports are not transactional, so records committed before a fatal
	/// error are kept. The command's error wins over a failed save.
	pub fn persist<T>(&self, result: TransferResult<T>) -> TransferResult<T> {
		match result {
			Ok(value) => {
				self.save()?;
				Ok(value)
			}
			Err(e) => {
				if let Err(save_error) = self.save() {
					tracing::error!(path = %self.path.display(), error = %save_error, "failed to save site");
				}
				Err(e)
			}
		}
	}

	/// Writes the current state back to the site file.
	pub fn save(&self) -> TransferResult<()> {
		let file = SiteFile {
			site: self.site.snapshot(),
			relationships: self.table.records()?,
			order_marks: self.table.order_marks(),
		};
		let content = serde_json::to_string_pretty(&file)?;
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| TransferError::io(parent, e))?;
		}
		fs::write(&self.path, content).map_err(|e| TransferError::io(&self.path, e))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use blueprint_core::{ClassificationStore, ContentModel, ContentStore, NewEntry};
	use blueprint_relations::Link;
	use blueprint_transfer::archive::zip_archive;
	use blueprint_transfer::commands::{ImportArgs, ImportCommand, ImportOptions};
	use blueprint_transfer::{ExportRequest, Exporter, TransferSettings};
	use rstest::rstest;

	#[rstest]
	fn test_missing_file_opens_fresh_site() {
		let root = tempfile::tempdir().unwrap();

		let site = FileSite::open(&root.path().join("site.json"), root.path().join("media")).unwrap();

		assert!(site.context().classifications.find_term("category", "uncategorized").unwrap().is_some());
		assert!(site.table.is_empty());
	}

	#[rstest]
	fn test_save_keeps_entries_and_relationships() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		let path = root.path().join("state").join("site.json");
		let site = FileSite::open(&path, root.path().join("media")).unwrap();
		let a = site.site.insert_entry(NewEntry::published("post", "A")).unwrap();
		let b = site.site.insert_entry(NewEntry::published("post", "B")).unwrap();
		site.table.insert(Link::new(a.id, b.id, "related")).unwrap();

		// Act
		site.save().unwrap();
		let reopened = FileSite::open(&path, root.path().join("media")).unwrap();

		// Assert
		assert_eq!(reopened.site.get_entry(b.id).unwrap().unwrap().title, "B");
		let records = reopened.table.records().unwrap();
		assert_eq!(records.len(), 1);
		assert!(records[0].is(a.id, b.id, "related"));
	}

	#[rstest]
	fn test_order_marks_survive_reopen() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		let path = root.path().join("site.json");
		let site = FileSite::open(&path, root.path().join("media")).unwrap();
		let record = site.table.insert(Link::new(1, 2, "related").with_order(3)).unwrap();
		site.table.remove(record.id).unwrap();

		// Act
		site.save().unwrap();
		let reopened = FileSite::open(&path, root.path().join("media")).unwrap();

		// Assert
		assert!(reopened.table.is_empty());
		assert_eq!(reopened.table.next_order(1, "related").unwrap(), 4);
	}

	#[rstest]
	fn test_failed_import_keeps_committed_records() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		let source = FileSite::open(&root.path().join("source.json"), root.path().join("source-media")).unwrap();
		source
			.context()
			.models()
			.create(ContentModel::new("rabbit", "Rabbit", "Rabbits"))
			.unwrap();
		source.site.insert_entry(NewEntry::published("rabbit", "Peter")).unwrap();
		let mut manifest = Exporter::new(source.context(), TransferSettings::default())
			.build_manifest(&ExportRequest::for_types(["rabbit"]))
			.unwrap();
		manifest.media.insert(9, "media/9/gone.png".to_string());
		let dir = root.path().join("broken");
		manifest.write(&dir, "manifest.json").unwrap();
		let archive = zip_archive(&dir, "broken").unwrap();

		let path = root.path().join("destination.json");
		let destination = FileSite::open(&path, root.path().join("media")).unwrap();
		let settings = TransferSettings::default().with_staging_dir(root.path().join("staging"));
		let command = ImportCommand::new(destination.context(), settings);

		// Act
		let result = destination.persist(command.execute(ImportArgs { archive }, ImportOptions::new()));

		// Assert
		assert!(matches!(result, Err(TransferError::Io { .. })));
		let reopened = FileSite::open(&path, root.path().join("media")).unwrap();
		assert!(reopened.context().models().contains("rabbit").unwrap());
		let titles: Vec<String> = reopened
			.site
			.find_entries(&blueprint_core::EntryQuery::of_types(["rabbit"]))
			.unwrap()
			.into_iter()
			.map(|entry| entry.title)
			.collect();
		assert_eq!(titles, vec!["Peter".to_string()]);
	}
}
