//! Archive export.
//!
//! Export reads the source site through its collaborator traits, builds a
//! [`Manifest`], stages referenced media next to it and zips the result.
//! Only published entries are exported.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use blueprint_core::{ContentModel, EntryId, EntryQuery, EntryStatus, MetaEntry, Taxonomy, TermId};
use blueprint_relations::Link;
use chrono::Utc;
use serde_json::Value;

use crate::archive;
use crate::context::SiteContext;
use crate::error::{TransferError, TransferResult};
use crate::manifest::{
	Manifest, ManifestMeta, MetaOverrides, PostSnapshot, Requirements, SCHEMA_VERSION, TermSnapshot,
	media_archive_path,
};
use crate::settings::TransferSettings;

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
	/// Entry types to export. Empty means every registered model.
	pub types: Vec<String>,
	/// Taxonomies whose definitions and assignments are exported. Empty means
	/// every registered taxonomy.
	pub taxonomies: Vec<String>,
	/// Host options to copy. Empty falls back to the configured keys.
	pub option_keys: Vec<String>,
	pub overrides: MetaOverrides,
}

impl ExportRequest {
	/// Exports the given entry types.
	pub fn for_types<I, S>(types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	/// Restricts exported taxonomies.
	pub fn with_taxonomies<I, S>(mut self, taxonomies: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.taxonomies = taxonomies.into_iter().map(Into::into).collect();
		self
	}

	/// Sets the host options to copy.
	pub fn with_option_keys(mut self, keys: Vec<String>) -> Self {
		self.option_keys = keys;
		self
	}

	/// Sets metadata overrides.
	pub fn with_overrides(mut self, overrides: MetaOverrides) -> Self {
		self.overrides = overrides;
		self
	}
}

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
	pub archive: PathBuf,
	pub manifest: Manifest,
}

/// Builds archives from a source site.
pub struct Exporter {
	site: SiteContext,
	settings: TransferSettings,
}

impl Exporter {
	/// Creates an exporter reading from `site`.
	pub fn new(site: SiteContext, settings: TransferSettings) -> Self {
		Self { site, settings }
	}

	/// Builds the manifest, stages media, and writes the archive into the output directory.
	pub fn export(&self, request: &ExportRequest) -> TransferResult<ExportOutcome> {
		let manifest = self.build_manifest(request)?;

		let staging = self
			.settings
			.output_dir
			.join(format!(".blueprint-export-{}", uuid::Uuid::new_v4()));
		let result = self.package(manifest, &staging);
		if let Err(e) = fs::remove_dir_all(&staging)
			&& e.kind() != std::io::ErrorKind::NotFound
		{
			tracing::warn!(path = %staging.display(), error = %e, "failed to remove export staging directory");
		}
		result
	}

	fn package(&self, mut manifest: Manifest, staging: &Path) -> TransferResult<ExportOutcome> {
		self.collect_media(&mut manifest, staging)?;
		self.write_manifest(&manifest, staging)?;
		let archive = self.zip_archive(staging, &manifest.meta.name)?;
		Ok(ExportOutcome { archive, manifest })
	}

	/// Builds the manifest without touching the file system.
	///
	/// The `media` maps stay empty until [`collect_media`](Self::collect_media) runs.
	pub fn build_manifest(&self, request: &ExportRequest) -> TransferResult<Manifest> {
		let models = self.collect_models(&request.types)?;
		let types: Vec<String> = if request.types.is_empty() {
			models.keys().cloned().collect()
		} else {
			request.types.clone()
		};
		let taxonomies = self.collect_taxonomies(&request.taxonomies)?;
		let taxonomy_slugs: Vec<String> = if request.taxonomies.is_empty() {
			taxonomies.keys().cloned().collect()
		} else {
			request.taxonomies.clone()
		};
		let option_keys = if request.option_keys.is_empty() {
			&self.settings.option_keys
		} else {
			&request.option_keys
		};

		let mut manifest = Manifest::new(self.generate_meta(&request.overrides));
		manifest.models = models;
		manifest.taxonomies = taxonomies;
		manifest.posts = self.collect_posts(&types)?;
		manifest.post_meta = self.collect_post_meta(&manifest.posts)?;
		manifest.post_terms = self.collect_post_tags(&manifest.posts, &taxonomy_slugs)?;
		manifest.parent_terms = self.collect_parent_terms(&manifest.post_terms)?;
		manifest.relationships = self.collect_relationships(&manifest.posts)?;
		manifest.options = self.collect_options(option_keys)?;

		tracing::info!(
			models = manifest.models.len(),
			taxonomies = manifest.taxonomies.len(),
			posts = manifest.posts.len(),
			relationships = manifest.relationships.len(),
			"collected manifest"
		);
		Ok(manifest)
	}

	/// Registered model definitions for the given types. Empty means all.
	///
	/// Built-in host types have no definition and are left out.
	pub fn collect_models(&self, type_slugs: &[String]) -> TransferResult<BTreeMap<String, ContentModel>> {
		let mut models = self.site.models().all()?;
		if !type_slugs.is_empty() {
			models.retain(|slug, _| type_slugs.contains(slug));
		}
		Ok(models)
	}

	/// Registered taxonomy definitions. Empty means all.
	pub fn collect_taxonomies(&self, taxonomy_slugs: &[String]) -> TransferResult<BTreeMap<String, Taxonomy>> {
		let mut taxonomies = self.site.taxonomies().all()?;
		if !taxonomy_slugs.is_empty() {
			taxonomies.retain(|slug, _| taxonomy_slugs.contains(slug));
		}
		Ok(taxonomies)
	}

	/// Published entries of the given types, keyed by identifier.
	pub fn collect_posts(&self, type_slugs: &[String]) -> TransferResult<BTreeMap<EntryId, PostSnapshot>> {
		if type_slugs.is_empty() {
			return Ok(BTreeMap::new());
		}
		let query = EntryQuery::of_types(type_slugs.iter().cloned()).with_status(EntryStatus::Publish);
		Ok(self
			.site
			.content
			.find_entries(&query)?
			.iter()
			.map(|entry| (entry.id, PostSnapshot::from(entry)))
			.collect())
	}

	/// Field values of the collected entries. Entries without values are left out.
	pub fn collect_post_meta(
		&self,
		posts: &BTreeMap<EntryId, PostSnapshot>,
	) -> TransferResult<BTreeMap<EntryId, Vec<MetaEntry>>> {
		let mut post_meta = BTreeMap::new();
		for id in posts.keys() {
			let meta = self.site.content.entry_meta(*id)?;
			if !meta.is_empty() {
				post_meta.insert(*id, meta);
			}
		}
		Ok(post_meta)
	}

	/// Term assignments in the requested taxonomies plus the default ones.
	pub fn collect_post_tags(
		&self,
		posts: &BTreeMap<EntryId, PostSnapshot>,
		taxonomy_slugs: &[String],
	) -> TransferResult<BTreeMap<EntryId, Vec<TermSnapshot>>> {
		let wanted: BTreeSet<&str> = taxonomy_slugs
			.iter()
			.chain(&self.settings.default_taxonomies)
			.map(String::as_str)
			.collect();

		let mut post_terms = BTreeMap::new();
		for id in posts.keys() {
			let terms: Vec<TermSnapshot> = self
				.site
				.classifications
				.entry_terms(*id)?
				.iter()
				.filter(|term| wanted.contains(term.taxonomy.as_str()))
				.map(TermSnapshot::from)
				.collect();
			if !terms.is_empty() {
				post_terms.insert(*id, terms);
			}
		}
		Ok(post_terms)
	}

	/// Ancestors of the assigned terms that are not assigned to any collected entry.
	///
	/// Parents come before their children. A parent missing on the source
	/// ends the chain.
	pub fn collect_parent_terms(
		&self,
		post_terms: &BTreeMap<EntryId, Vec<TermSnapshot>>,
	) -> TransferResult<Vec<TermSnapshot>> {
		let mut seen: BTreeSet<TermId> = post_terms.values().flatten().map(|term| term.id).collect();
		let mut parents = Vec::new();

		for term in post_terms.values().flatten() {
			let mut chain = Vec::new();
			let mut next = term.parent;
			while let Some(id) = next {
				if !seen.insert(id) {
					break;
				}
				let Some(parent) = self.site.classifications.get_term(id)? else {
					tracing::warn!(term_id = id, "parent term not found, ending hierarchy");
					break;
				};
				next = parent.parent;
				chain.push(TermSnapshot::from(&parent));
			}
			parents.extend(chain.into_iter().rev());
		}
		Ok(parents)
	}

	/// Copies referenced media into `staging/media/{id}/{filename}`.
	///
	/// Fills the manifest's `media` paths and `media_titles`. References to
	/// media that no longer exists are dropped with a warning.
	pub fn collect_media(&self, manifest: &mut Manifest, staging: &Path) -> TransferResult<()> {
		for id in manifest.referenced_media() {
			let Some(item) = self.site.media.get_media(id)? else {
				tracing::warn!(media_id = id, "referenced media not found, leaving it out");
				continue;
			};
			let relative = media_archive_path(id, &item.filename);
			let target = staging.join(&relative);
			if let Some(parent) = target.parent() {
				fs::create_dir_all(parent).map_err(|e| TransferError::io(parent, e))?;
			}
			let source = self.site.media.media_path(&item);
			fs::copy(&source, &target).map_err(|e| TransferError::io(&source, e))?;
			tracing::debug!(media_id = id, path = %relative, "staged media");
			manifest.media.insert(id, relative);
			manifest.media_titles.insert(id, item.title);
		}
		Ok(())
	}

	/// Relationship records whose endpoints were both collected.
	pub fn collect_relationships(&self, posts: &BTreeMap<EntryId, PostSnapshot>) -> TransferResult<Vec<Link>> {
		Ok(self
			.site
			.relationships
			.records()?
			.into_iter()
			.map(|record| record.link)
			.filter(|link| posts.contains_key(&link.id1) && posts.contains_key(&link.id2))
			.collect())
	}

	/// Current values of the named host options. Unset keys are left out.
	pub fn collect_options(&self, keys: &[String]) -> TransferResult<BTreeMap<String, Value>> {
		let mut options = BTreeMap::new();
		for key in keys {
			match self.site.options.get_option(key)? {
				Some(value) => {
					options.insert(key.clone(), value);
				}
				None => tracing::debug!(key, "option not set, leaving it out"),
			}
		}
		Ok(options)
	}

	/// Manifest header from the running environment, with overrides applied.
	pub fn generate_meta(&self, overrides: &MetaOverrides) -> ManifestMeta {
		let generated_at = Utc::now();
		ManifestMeta {
			schema: SCHEMA_VERSION.to_string(),
			version: overrides
				.version
				.clone()
				.unwrap_or_else(|| self.settings.plugin_version.clone()),
			name: overrides
				.name
				.clone()
				.unwrap_or_else(|| format!("blueprint-{}", generated_at.format("%Y%m%d-%H%M%S"))),
			description: overrides
				.description
				.clone()
				.unwrap_or_else(|| format!("Content blueprint exported on {}", generated_at.format("%Y-%m-%d"))),
			requires: Requirements {
				host: overrides
					.requires_host
					.clone()
					.unwrap_or_else(|| self.settings.host_version.clone()),
				plugin: overrides
					.requires_plugin
					.clone()
					.unwrap_or_else(|| self.settings.plugin_version.clone()),
			},
			generated_at,
		}
	}

	/// Writes the manifest into `dir` under the configured file name.
	pub fn write_manifest(&self, manifest: &Manifest, dir: &Path) -> TransferResult<PathBuf> {
		manifest.write(dir, &self.settings.manifest_file)
	}

	/// Zips `dir` into a sibling archive named after `name`.
	pub fn zip_archive(&self, dir: &Path, name: &str) -> TransferResult<PathBuf> {
		archive::zip_archive(dir, name)
	}
}
