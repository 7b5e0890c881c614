//! Archive import.
//!
//! An import replays a manifest against a destination site in a fixed order.
//! Steps that create records return an [`IdMap`] from source to destination
//! identifiers, and later steps rewrite references through those maps:
//!
//! 1. `unzip_archive`, `get_manifest`, `check_versions` (no writes)
//! 2. `create_models`, `import_taxonomies`
//! 3. `import_terms` → term map
//! 4. `import_posts` → entry map
//! 5. `tag_posts`, `import_media` → media map
//! 6. `import_post_meta`, `import_acm_relationships`, `import_options`
//! 7. `cleanup`
//!
//! Fatal failures stop the import with a [`TransferError`]. Per-item failures
//! are collected in each step's [`StepReport`]. Nothing is rolled back; an
//! interrupted import is discarded with [`Resetter`](crate::reset::Resetter).

mod id_map;
mod report;

pub use id_map::{IdMap, Resolution};
pub use report::{ImportReport, ItemErrorKind, ItemFailure, StepReport};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use blueprint_core::{CoreError, EntryId, FieldValue, MetaEntry, NewTerm, TermId};
use blueprint_relations::Link;

use crate::archive;
use crate::context::SiteContext;
use crate::error::{TransferError, TransferResult};
use crate::manifest::{Manifest, TermSnapshot};
use crate::settings::TransferSettings;
use crate::version;

/// Replays archives against a destination site.
pub struct Importer {
	site: SiteContext,
	settings: TransferSettings,
}

impl Importer {
	/// Creates an importer writing to `site`.
	pub fn new(site: SiteContext, settings: TransferSettings) -> Self {
		Self { site, settings }
	}

	/// Runs every step against an archive and removes it afterwards.
	///
	/// On a fatal error the staging directory is removed but the archive is
	/// kept, and records written by earlier steps stay in place.
	pub fn import_blueprint(&self, archive: &Path) -> TransferResult<ImportReport> {
		tracing::info!(archive = %archive.display(), "importing blueprint");
		let staging = self.unzip_archive(archive)?;

		match self.replay(&staging) {
			Ok(mut report) => {
				report.cleaned_up = self.cleanup(&staging, Some(archive));
				for line in report.summary_lines() {
					tracing::info!("{line}");
				}
				Ok(report)
			}
			Err(e) => {
				tracing::error!(error = %e, "import stopped");
				self.cleanup(&staging, None);
				Err(e)
			}
		}
	}

	fn replay(&self, staging: &Path) -> TransferResult<ImportReport> {
		let manifest = self.get_manifest(staging)?;
		self.check_versions(&manifest)?;

		let models = self.create_models(&manifest)?;
		let taxonomies = self.import_taxonomies(&manifest)?;
		let (terms, term_report) = self.import_terms(&manifest)?;
		let (entries, post_report) = self.import_posts(&manifest)?;
		let tags = self.tag_posts(&manifest, &entries, &terms)?;
		let (media, media_report) = self.import_media(&manifest, staging)?;
		let meta = self.import_post_meta(&manifest, &entries, &media)?;
		let relationships = self.import_acm_relationships(&manifest, &entries)?;
		let options = self.import_options(&manifest)?;

		Ok(ImportReport {
			steps: vec![
				models,
				taxonomies,
				term_report,
				post_report,
				tags,
				media_report,
				meta,
				relationships,
				options,
			],
			entries,
			terms,
			media,
			cleaned_up: false,
		})
	}

	/// Unpacks the archive into a fresh staging directory.
	pub fn unzip_archive(&self, archive: &Path) -> TransferResult<PathBuf> {
		archive::unzip_archive(archive, &self.settings.staging_dir)
	}

	/// Reads and validates the manifest at the staging root.
	pub fn get_manifest(&self, staging: &Path) -> TransferResult<Manifest> {
		let manifest = Manifest::read(&staging.join(&self.settings.manifest_file))?;
		manifest.validate()?;
		tracing::info!(
			name = %manifest.meta.name,
			models = manifest.models.len(),
			taxonomies = manifest.taxonomies.len(),
			posts = manifest.posts.len(),
			media = manifest.media.len(),
			relationships = manifest.relationships.len(),
			"read manifest"
		);
		Ok(manifest)
	}

	/// Fails unless the running host and plugin meet the manifest's minimums.
	pub fn check_versions(&self, manifest: &Manifest) -> TransferResult<()> {
		version::check_versions(
			&manifest.meta.requires,
			&self.settings.host_version,
			&self.settings.plugin_version,
		)
	}

	/// Registers each content model. Taken slugs are reported as conflicts.
	pub fn create_models(&self, manifest: &Manifest) -> TransferResult<StepReport> {
		let mut report = StepReport::new("create_models", "models");
		let registry = self.site.models();
		let core_types = self.site.content.core_types();

		for model in manifest.models.values() {
			if core_types.contains(&model.slug) {
				report.fail(&model.slug, ItemErrorKind::SlugConflict, "slug is a built-in type");
				continue;
			}
			match registry.create(model.clone()) {
				Ok(()) => {
					tracing::debug!(slug = %model.slug, "created model");
					report.succeed();
				}
				Err(e) => report.fail_core(&model.slug, &e),
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Registers each taxonomy. Taken slugs are reported as conflicts.
	pub fn import_taxonomies(&self, manifest: &Manifest) -> TransferResult<StepReport> {
		let mut report = StepReport::new("import_taxonomies", "taxonomies");
		let registry = self.site.taxonomies();
		let core_taxonomies = self.site.classifications.core_taxonomies();

		for taxonomy in manifest.taxonomies.values() {
			if core_taxonomies.contains(&taxonomy.slug) {
				report.fail(&taxonomy.slug, ItemErrorKind::SlugConflict, "slug is a built-in taxonomy");
				continue;
			}
			match registry.create(taxonomy.clone()) {
				Ok(()) => {
					tracing::debug!(slug = %taxonomy.slug, "created taxonomy");
					report.succeed();
				}
				Err(e) => report.fail_core(&taxonomy.slug, &e),
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Creates missing terms, parents before children, and maps every term.
	///
	/// Terms already present (same taxonomy and slug) are reused.
	pub fn import_terms(&self, manifest: &Manifest) -> TransferResult<(IdMap, StepReport)> {
		let mut map = IdMap::new("term");
		let mut report = StepReport::new("import_terms", "terms");

		let mut pending: Vec<TermSnapshot> = manifest.terms().into_values().collect();
		let known: BTreeSet<TermId> = pending.iter().map(|t| t.id).collect();
		let mut settled = BTreeSet::new();

		while !pending.is_empty() {
			let (ready, waiting): (Vec<_>, Vec<_>) = pending.into_iter().partition(|t| {
				t.parent
					.is_none_or(|parent| !known.contains(&parent) || settled.contains(&parent))
			});
			// A parent cycle leaves nothing ready; import the rest as they come.
			let batch = if ready.is_empty() {
				pending = Vec::new();
				waiting
			} else {
				pending = waiting;
				ready
			};
			for snapshot in batch {
				settled.insert(snapshot.id);
				self.import_term(&snapshot, &mut map, &mut report)?;
			}
		}

		tracing::info!("{}", report.summary_line());
		Ok((map, report))
	}

	fn import_term(&self, snapshot: &TermSnapshot, map: &mut IdMap, report: &mut StepReport) -> TransferResult<()> {
		let label = format!("{}/{}", snapshot.taxonomy, snapshot.slug);
		if !self.site.taxonomy_exists(&snapshot.taxonomy)? {
			report.fail(
				label,
				ItemErrorKind::UnresolvableReference,
				format!("taxonomy '{}' does not exist", snapshot.taxonomy),
			);
			return Ok(());
		}

		let classifications = &self.site.classifications;
		if let Some(existing) = classifications.find_term(&snapshot.taxonomy, &snapshot.slug)? {
			tracing::debug!(term = %label, id = existing.id, "reusing existing term");
			map.insert(snapshot.id, existing.id);
			report.succeed();
			return Ok(());
		}

		let mut term = NewTerm::new(&snapshot.taxonomy, &snapshot.slug, &snapshot.name);
		if let Some(parent) = snapshot.parent {
			if let Some(parent) = self.resolve_parent(parent, &snapshot.taxonomy, map)? {
				term = term.with_parent(parent);
			}
		}
		match classifications.insert_term(term) {
			Ok(created) => {
				map.insert(snapshot.id, created.id);
				report.succeed();
			}
			Err(e) => report.fail_core(label, &e),
		}
		Ok(())
	}

	fn resolve_parent(&self, parent: TermId, taxonomy: &str, map: &IdMap) -> TransferResult<Option<TermId>> {
		let resolution = map.resolve(parent);
		if resolution.is_mapped() {
			return Ok(Some(resolution.id()));
		}
		match self.site.classifications.get_term(resolution.id())? {
			Some(term) if term.taxonomy == taxonomy => Ok(Some(term.id)),
			_ => {
				tracing::warn!(parent, taxonomy, "parent term not found at destination, importing as top level");
				Ok(None)
			}
		}
	}

	/// Creates one entry per manifest entry whose type exists at the destination.
	pub fn import_posts(&self, manifest: &Manifest) -> TransferResult<(IdMap, StepReport)> {
		let mut map = IdMap::new("entry");
		let mut report = StepReport::new("import_posts", "entries");

		for (id, post) in &manifest.posts {
			if !self.site.type_exists(&post.entry_type)? {
				report.skip(id, "type does not exist at destination");
				continue;
			}
			match self.site.content.insert_entry(post.to_new_entry()) {
				Ok(entry) => {
					tracing::debug!(source = id, destination = entry.id, "created entry");
					map.insert(*id, entry.id);
					report.succeed();
				}
				Err(e) => report.fail_core(id, &e),
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok((map, report))
	}

	/// Assigns terms to imported entries.
	pub fn tag_posts(&self, manifest: &Manifest, entries: &IdMap, terms: &IdMap) -> TransferResult<StepReport> {
		let mut report = StepReport::new("tag_posts", "term assignments");

		for (source, snapshots) in &manifest.post_terms {
			let entry = resolve_entry(manifest, entries, *source);
			for snapshot in snapshots {
				let label = format!("{source}:{}/{}", snapshot.taxonomy, snapshot.slug);
				let Some(entry) = entry else {
					report.fail(label, ItemErrorKind::UnresolvableReference, "entry was not imported");
					continue;
				};
				if !self.site.taxonomy_exists(&snapshot.taxonomy)? {
					report.fail(
						label,
						ItemErrorKind::UnresolvableReference,
						format!("taxonomy '{}' does not exist", snapshot.taxonomy),
					);
					continue;
				}
				match self
					.site
					.classifications
					.assign_term(entry, terms.resolve(snapshot.id).id())
				{
					Ok(()) => report.succeed(),
					Err(e) => report.fail_core(label, &e),
				}
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Copies staged media into the media store and regenerates renditions.
	///
	/// A missing or unreadable staged file stops the import.
	pub fn import_media(&self, manifest: &Manifest, staging: &Path) -> TransferResult<(IdMap, StepReport)> {
		let mut map = IdMap::new("media");
		let mut report = StepReport::new("import_media", "media");

		for (id, relative) in &manifest.media {
			let path = staging.join(relative);
			let metadata = fs::metadata(&path).map_err(|e| TransferError::io(&path, e))?;
			if !metadata.is_file() {
				return Err(TransferError::io(
					&path,
					std::io::Error::new(std::io::ErrorKind::InvalidInput, "staged media is not a file"),
				));
			}

			let title = manifest.media_titles.get(id).map(String::as_str);
			let item = match self.site.media.import_file(&path, title) {
				Ok(item) => item,
				Err(e @ CoreError::Io { .. }) => return Err(e.into()),
				Err(e) => {
					report.fail_core(id, &e);
					continue;
				}
			};
			match self.site.media.regenerate_renditions(item.id) {
				Ok(renditions) => {
					tracing::debug!(source = id, destination = item.id, renditions = renditions.len(), "imported media")
				}
				Err(e) => tracing::warn!(media_id = item.id, error = %e, "failed to regenerate renditions"),
			}
			map.insert(*id, item.id);
			report.succeed();
		}
		tracing::info!("{}", report.summary_line());
		Ok((map, report))
	}

	/// Copies field values onto imported entries, rewriting media references.
	pub fn import_post_meta(&self, manifest: &Manifest, entries: &IdMap, media: &IdMap) -> TransferResult<StepReport> {
		let mut report = StepReport::new("import_post_meta", "field values");

		for (source, values) in &manifest.post_meta {
			let entry = resolve_entry(manifest, entries, *source);
			for meta in values {
				let label = format!("{source}:{}", meta.meta_key);
				let Some(entry) = entry else {
					report.fail(label, ItemErrorKind::UnresolvableReference, "entry was not imported");
					continue;
				};
				let value = remap_value(&meta.meta_value, media);
				match self
					.site
					.content
					.add_entry_meta(entry, MetaEntry::new(&meta.meta_key, value))
				{
					Ok(()) => report.succeed(),
					Err(e) => report.fail_core(label, &e),
				}
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Writes relationship records with remapped endpoints straight into the table.
	///
	/// Cardinality is not checked: the records were valid on the source site.
	pub fn import_acm_relationships(&self, manifest: &Manifest, entries: &IdMap) -> TransferResult<StepReport> {
		let mut report = StepReport::new("import_acm_relationships", "relationships");

		for link in &manifest.relationships {
			let label = format!("{}:{}->{}", link.name, link.id1, link.id2);
			let (Some(id1), Some(id2)) = (
				resolve_entry(manifest, entries, link.id1),
				resolve_entry(manifest, entries, link.id2),
			) else {
				report.fail(label, ItemErrorKind::UnresolvableReference, "endpoint entry was not imported");
				continue;
			};
			let remapped = Link::new(id1, id2, &link.name).with_order(link.order);
			match self.site.relationships.insert(remapped) {
				Ok(_) => report.succeed(),
				Err(e) => report.fail(label, ItemErrorKind::Store, e.to_string()),
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Writes exported host options. Existing keys conflict unless overwriting.
	pub fn import_options(&self, manifest: &Manifest) -> TransferResult<StepReport> {
		let mut report = StepReport::new("import_options", "options");

		for (key, value) in &manifest.options {
			if !self.settings.overwrite_options && self.site.options.get_option(key)?.is_some() {
				report.fail(key, ItemErrorKind::SlugConflict, "option is already set");
				continue;
			}
			match self.site.options.set_option(key, value.clone()) {
				Ok(()) => report.succeed(),
				Err(e) => report.fail_core(key, &e),
			}
		}
		tracing::info!("{}", report.summary_line());
		Ok(report)
	}

	/// Removes the staging directory and, if given, the archive.
	///
	/// Failures are logged; returns whether everything was removed.
	pub fn cleanup(&self, staging: &Path, archive: Option<&Path>) -> bool {
		let mut clean = true;
		if let Err(e) = fs::remove_dir_all(staging) {
			tracing::warn!(path = %staging.display(), error = %e, "failed to remove staging directory");
			clean = false;
		}
		if let Some(archive) = archive
			&& let Err(e) = fs::remove_file(archive)
		{
			tracing::warn!(path = %archive.display(), error = %e, "failed to remove archive");
			clean = false;
		}
		clean
	}
}

/// Resolves an entry reference.
///
/// Entries present in the manifest but absent from the map were skipped by
/// `import_posts` and resolve to `None`. Anything else not in the map passes
/// through as a pre-existing destination entry.
fn resolve_entry(manifest: &Manifest, entries: &IdMap, source: EntryId) -> Option<EntryId> {
	match entries.resolve(source) {
		Resolution::Mapped(id) => Some(id),
		Resolution::Passthrough(_) if manifest.posts.contains_key(&source) => None,
		Resolution::Passthrough(id) => Some(id),
	}
}

fn remap_value(value: &FieldValue, media: &IdMap) -> FieldValue {
	match value {
		FieldValue::Media(reference) => FieldValue::media(media.resolve(reference.media_id).id()),
		other => other.clone(),
	}
}
