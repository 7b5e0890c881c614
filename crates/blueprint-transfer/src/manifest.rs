//! The manifest document describing a full export.
//!
//! A manifest is written once by export and read once by import. Every map is
//! keyed by the identifier the record had on the source site; JSON object keys
//! carry those identifiers as strings.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use blueprint_core::{
	ContentModel, Entry, EntryId, EntryStatus, MediaId, MetaEntry, NewEntry, Taxonomy, Term, TermId,
};
use blueprint_relations::Link;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TransferError, TransferResult};
use crate::version::parse_version;

/// Manifest schema this crate reads and writes.
pub const SCHEMA_VERSION: &str = "1";

/// Archive directory holding media files.
pub const MEDIA_DIR: &str = "media";

/// Minimum versions needed to import an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
	pub host: String,
	pub plugin: String,
}

/// Descriptive header of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMeta {
	pub schema: String,
	pub version: String,
	pub name: String,
	#[serde(default)]
	pub description: String,
	pub requires: Requirements,
	#[serde(default = "Utc::now")]
	pub generated_at: DateTime<Utc>,
}

/// Caller-supplied values that take precedence over generated metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaOverrides {
	pub name: Option<String>,
	pub description: Option<String>,
	pub version: Option<String>,
	pub requires_host: Option<String>,
	pub requires_plugin: Option<String>,
}

impl MetaOverrides {
	/// Sets the blueprint name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the blueprint version.
	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());
		self
	}

	/// Sets the minimum host version.
	pub fn with_requires_host(mut self, version: impl Into<String>) -> Self {
		self.requires_host = Some(version.into());
		self
	}

	/// Sets the minimum plugin version.
	pub fn with_requires_plugin(mut self, version: impl Into<String>) -> Self {
		self.requires_plugin = Some(version.into());
		self
	}
}

/// An entry without its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSnapshot {
	#[serde(rename = "type")]
	pub entry_type: String,
	pub title: String,
	#[serde(default)]
	pub body: String,
	pub status: EntryStatus,
	pub created_at: DateTime<Utc>,
	pub modified_at: DateTime<Utc>,
}

impl From<&Entry> for PostSnapshot {
	fn from(entry: &Entry) -> Self {
		Self {
			entry_type: entry.entry_type.clone(),
			title: entry.title.clone(),
			body: entry.body.clone(),
			status: entry.status,
			created_at: entry.created_at,
			modified_at: entry.modified_at,
		}
	}
}

impl PostSnapshot {
	/// Builds the entry to create at the destination.
	pub fn to_new_entry(&self) -> NewEntry {
		NewEntry::new(&self.entry_type, &self.title)
			.with_body(&self.body)
			.with_status(self.status)
			.with_timestamps(self.created_at, self.modified_at)
	}
}

/// A term assigned to an exported entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSnapshot {
	/// Identifier on the source site.
	pub id: TermId,
	pub taxonomy: String,
	pub slug: String,
	pub name: String,
	/// Source identifier of the parent term.
	#[serde(default)]
	pub parent: Option<TermId>,
}

impl From<&Term> for TermSnapshot {
	fn from(term: &Term) -> Self {
		Self {
			id: term.id,
			taxonomy: term.taxonomy.clone(),
			slug: term.slug.clone(),
			name: term.name.clone(),
			parent: term.parent,
		}
	}
}

/// A complete exported configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
	pub meta: ManifestMeta,
	#[serde(default)]
	pub models: BTreeMap<String, ContentModel>,
	#[serde(default)]
	pub taxonomies: BTreeMap<String, Taxonomy>,
	#[serde(default)]
	pub posts: BTreeMap<EntryId, PostSnapshot>,
	#[serde(default)]
	pub post_meta: BTreeMap<EntryId, Vec<MetaEntry>>,
	#[serde(default)]
	pub post_terms: BTreeMap<EntryId, Vec<TermSnapshot>>,
	/// Ancestors of assigned terms that are not assigned themselves.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub parent_terms: Vec<TermSnapshot>,
	/// Media identifier to path relative to the archive root.
	#[serde(default)]
	pub media: BTreeMap<MediaId, String>,
	/// Media titles, keyed like `media`.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub media_titles: BTreeMap<MediaId, String>,
	#[serde(default)]
	pub relationships: Vec<Link>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub options: BTreeMap<String, Value>,
}

impl Manifest {
	/// Creates an empty manifest with the given header.
	pub fn new(meta: ManifestMeta) -> Self {
		Self {
			meta,
			models: BTreeMap::new(),
			taxonomies: BTreeMap::new(),
			posts: BTreeMap::new(),
			post_meta: BTreeMap::new(),
			post_terms: BTreeMap::new(),
			parent_terms: Vec::new(),
			media: BTreeMap::new(),
			media_titles: BTreeMap::new(),
			relationships: Vec::new(),
			options: BTreeMap::new(),
		}
	}

	/// Reads a manifest file.
	pub fn read(path: &Path) -> TransferResult<Self> {
		let content = fs::read_to_string(path).map_err(|e| match e.kind() {
			std::io::ErrorKind::NotFound => {
				TransferError::InvalidManifest(format!("manifest not found at {}", path.display()))
			}
			_ => TransferError::io(path, e),
		})?;
		serde_json::from_str(&content).map_err(|e| TransferError::InvalidManifest(e.to_string()))
	}

	/// Writes the manifest as pretty JSON to `dir/file_name`.
	pub fn write(&self, dir: &Path, file_name: &str) -> TransferResult<PathBuf> {
		fs::create_dir_all(dir).map_err(|e| TransferError::io(dir, e))?;
		let path = dir.join(file_name);
		let content = serde_json::to_string_pretty(self)?;
		fs::write(&path, content).map_err(|e| TransferError::io(&path, e))?;
		Ok(path)
	}

	/// Checks the schema, version requirements and media paths.
	pub fn validate(&self) -> TransferResult<()> {
		let major = self.meta.schema.split('.').next().unwrap_or_default();
		if major != SCHEMA_VERSION {
			return Err(TransferError::InvalidManifest(format!(
				"unsupported schema '{}', expected {SCHEMA_VERSION}",
				self.meta.schema
			)));
		}

		for (component, version) in [
			("host", &self.meta.requires.host),
			("plugin", &self.meta.requires.plugin),
		] {
			parse_version(version).map_err(|e| {
				TransferError::InvalidManifest(format!("requires.{component} '{version}': {e}"))
			})?;
		}

		for (id, path) in &self.media {
			if !is_confined(Path::new(path)) {
				return Err(TransferError::InvalidManifest(format!(
					"media {id} path '{path}' escapes the archive"
				)));
			}
		}
		Ok(())
	}

	/// Media identifiers referenced by field values, in ascending order.
	pub fn referenced_media(&self) -> BTreeSet<MediaId> {
		self.post_meta
			.values()
			.flatten()
			.filter_map(|meta| meta.meta_value.media_id())
			.collect()
	}

	/// Distinct term snapshots, assigned and ancestors, keyed by source identifier.
	pub fn terms(&self) -> BTreeMap<TermId, TermSnapshot> {
		self.post_terms
			.values()
			.flatten()
			.chain(&self.parent_terms)
			.map(|term| (term.id, term.clone()))
			.collect()
	}
}

/// Relative archive path of a media file.
pub fn media_archive_path(id: MediaId, filename: &str) -> String {
	format!("{MEDIA_DIR}/{id}/{filename}")
}

fn is_confined(path: &Path) -> bool {
	path.components().next().is_some() && path.components().all(|c| matches!(c, Component::Normal(_)))
}
