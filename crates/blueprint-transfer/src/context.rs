//! Host collaborators handed to every pipeline step.

use std::sync::Arc;

use blueprint_core::{
	ClassificationStore, ContentStore, CoreResult, MediaStore, MemorySite, ModelRegistry, OptionRepository,
	TaxonomyRegistry,
};
use blueprint_relations::{RelationshipStore, RelationshipTable};

/// The destination or source site, reached only through its collaborator traits.
#[derive(Clone)]
pub struct SiteContext {
	pub content: Arc<dyn ContentStore>,
	pub classifications: Arc<dyn ClassificationStore>,
	pub media: Arc<dyn MediaStore>,
	pub options: Arc<dyn OptionRepository>,
	pub relationships: Arc<dyn RelationshipTable>,
}

impl SiteContext {
	/// Uses one [`MemorySite`] for every host collaborator.
	pub fn from_memory(site: Arc<MemorySite>, relationships: Arc<dyn RelationshipTable>) -> Self {
		Self {
			content: site.clone(),
			classifications: site.clone(),
			media: site.clone(),
			options: site,
			relationships,
		}
	}

	/// Registry of content model definitions.
	pub fn models(&self) -> ModelRegistry {
		ModelRegistry::new(self.options.clone())
	}

	/// Registry of taxonomy definitions.
	pub fn taxonomies(&self) -> TaxonomyRegistry {
		TaxonomyRegistry::new(self.options.clone())
	}

	/// Cardinality-enforcing view of the relationship table.
	pub fn relationship_store(&self) -> RelationshipStore {
		RelationshipStore::new(self.relationships.clone())
	}

	/// Returns true if entries of this type can be stored.
	pub fn type_exists(&self, slug: &str) -> CoreResult<bool> {
		Ok(self.content.core_types().iter().any(|t| t == slug) || self.models().contains(slug)?)
	}

	/// Returns true if terms of this taxonomy can be stored.
	pub fn taxonomy_exists(&self, slug: &str) -> CoreResult<bool> {
		Ok(self.classifications.core_taxonomies().iter().any(|t| t == slug) || self.taxonomies().contains(slug)?)
	}
}
