//! Removal of blueprint-created data.
//!
//! Every operation is independent and idempotent. Without `include_core` only
//! data owned by registered models and taxonomies is removed; with it, host
//! content is wiped as well.

use std::collections::BTreeSet;

use blueprint_core::{EntryQuery, MediaId};

use crate::context::SiteContext;
use crate::error::TransferResult;

/// Families to delete in [`Resetter::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetScope {
	pub posts: bool,
	pub media: bool,
	pub relationships: bool,
	pub terms: bool,
	pub taxonomies: bool,
	pub models: bool,
	/// Also remove host-owned entries and media.
	pub include_core: bool,
}

impl ResetScope {
	/// Every blueprint-owned family.
	pub fn all() -> Self {
		Self {
			posts: true,
			media: true,
			relationships: true,
			terms: true,
			taxonomies: true,
			models: true,
			include_core: false,
		}
	}

	/// Extends deletion to host-owned content.
	pub fn with_core(mut self) -> Self {
		self.include_core = true;
		self
	}
}

/// Deletion counts per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetReport {
	pub posts: usize,
	pub media: usize,
	pub relationships: usize,
	pub terms: usize,
	pub taxonomies: usize,
	pub models: usize,
}

impl ResetReport {
	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.posts + self.media + self.relationships + self.terms + self.taxonomies + self.models
	}

	/// `(family, count)` pairs in deletion order.
	pub fn counts(&self) -> [(&'static str, usize); 6] {
		[
			("relationships", self.relationships),
			("media", self.media),
			("posts", self.posts),
			("terms", self.terms),
			("taxonomies", self.taxonomies),
			("models", self.models),
		]
	}
}

/// Deletes data from a site.
pub struct Resetter {
	site: SiteContext,
}

impl Resetter {
	/// Creates a resetter for `site`.
	pub fn new(site: SiteContext) -> Self {
		Self { site }
	}

	/// Runs the selected deletions.
	///
	/// Media goes before entries and terms before taxonomies, since ownership
	/// is worked out from what still exists.
	pub fn reset(&self, scope: &ResetScope) -> TransferResult<ResetReport> {
		let mut report = ResetReport::default();
		if scope.relationships {
			report.relationships = self.delete_relationships()?;
		}
		if scope.media {
			report.media = self.delete_media(scope.include_core)?;
		}
		if scope.posts {
			report.posts = self.delete_posts(scope.include_core)?;
		}
		if scope.terms {
			report.terms = self.delete_taxonomy_terms()?;
		}
		if scope.taxonomies {
			report.taxonomies = self.delete_taxonomies()?;
		}
		if scope.models {
			report.models = self.delete_models()?;
		}
		tracing::info!(total = report.total(), "reset complete");
		Ok(report)
	}

	fn owned_entries(&self, include_core: bool) -> TransferResult<EntryQuery> {
		if include_core {
			return Ok(EntryQuery::all());
		}
		Ok(EntryQuery::of_types(self.site.models().all()?.into_keys()))
	}

	/// Deletes entries of registered models, or every entry with `include_core`.
	pub fn delete_posts(&self, include_core: bool) -> TransferResult<usize> {
		let query = self.owned_entries(include_core)?;
		let mut deleted = 0;
		if include_core || !query.types.is_empty() {
			for entry in self.site.content.find_entries(&query)? {
				if self.site.content.delete_entry(entry.id)? {
					deleted += 1;
				}
			}
		}
		tracing::info!(deleted, include_core, "deleted entries");
		Ok(deleted)
	}

	/// Deletes media referenced by registered models' entries, or all media with `include_core`.
	pub fn delete_media(&self, include_core: bool) -> TransferResult<usize> {
		let targets: BTreeSet<MediaId> = if include_core {
			self.site.media.list_media()?.into_iter().map(|m| m.id).collect()
		} else {
			let query = self.owned_entries(false)?;
			let mut referenced = BTreeSet::new();
			if !query.types.is_empty() {
				for entry in self.site.content.find_entries(&query)? {
					referenced.extend(
						self.site
							.content
							.entry_meta(entry.id)?
							.iter()
							.filter_map(|meta| meta.meta_value.media_id()),
					);
				}
			}
			referenced
		};

		let mut deleted = 0;
		for id in targets {
			if self.site.media.delete_media(id)? {
				deleted += 1;
			}
		}
		tracing::info!(deleted, include_core, "deleted media");
		Ok(deleted)
	}

	/// Deletes every relationship record.
	pub fn delete_relationships(&self) -> TransferResult<usize> {
		let deleted = self.site.relationships.clear()?;
		tracing::info!(deleted, "deleted relationships");
		Ok(deleted)
	}

	/// Deletes the terms of registered taxonomies.
	pub fn delete_taxonomy_terms(&self) -> TransferResult<usize> {
		let mut deleted = 0;
		for slug in self.site.taxonomies().all()?.into_keys() {
			for term in self.site.classifications.terms(&slug)? {
				if self.site.classifications.delete_term(term.id)? {
					deleted += 1;
				}
			}
		}
		tracing::info!(deleted, "deleted terms");
		Ok(deleted)
	}

	/// Removes every taxonomy definition.
	pub fn delete_taxonomies(&self) -> TransferResult<usize> {
		let deleted = self.site.taxonomies().clear()?;
		tracing::info!(deleted, "deleted taxonomies");
		Ok(deleted)
	}

	/// Removes every model definition.
	pub fn delete_models(&self) -> TransferResult<usize> {
		let deleted = self.site.models().clear()?;
		tracing::info!(deleted, "deleted models");
		Ok(deleted)
	}
}
