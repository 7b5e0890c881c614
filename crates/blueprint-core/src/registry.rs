//! Definition registries backed by the host option store.
//!
//! Model and taxonomy definitions are stored as a single option each, holding
//! a map of slug to definition. Creating a definition whose slug is taken is
//! refused with [`CoreError::SlugConflict`].

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CoreError, CoreResult};
use crate::model::ContentModel;
use crate::options::{OptionRepository, get_typed, set_typed};
use crate::taxonomy::Taxonomy;

/// Option key holding content model definitions.
pub const MODELS_OPTION: &str = "blueprint_post_types";

/// Option key holding taxonomy definitions.
pub const TAXONOMIES_OPTION: &str = "blueprint_taxonomies";

/// A definition persisted in a [`DefinitionRegistry`].
pub trait Definition: Serialize + DeserializeOwned + Clone {
	/// Record family name used in errors and logs.
	const KIND: &'static str;
	/// Option key holding the definitions.
	const OPTION_KEY: &'static str;

	/// Unique slug of the definition.
	fn slug(&self) -> &str;
}

impl Definition for ContentModel {
	const KIND: &'static str = "model";
	const OPTION_KEY: &'static str = MODELS_OPTION;

	fn slug(&self) -> &str {
		&self.slug
	}
}

impl Definition for Taxonomy {
	const KIND: &'static str = "taxonomy";
	const OPTION_KEY: &'static str = TAXONOMIES_OPTION;

	fn slug(&self) -> &str {
		&self.slug
	}
}

/// Slug-keyed definitions stored in an injected [`OptionRepository`].
pub struct DefinitionRegistry<T> {
	options: Arc<dyn OptionRepository>,
	_marker: PhantomData<T>,
}

/// Registry of content model definitions.
pub type ModelRegistry = DefinitionRegistry<ContentModel>;

/// Registry of taxonomy definitions.
pub type TaxonomyRegistry = DefinitionRegistry<Taxonomy>;

impl<T: Definition> DefinitionRegistry<T> {
	/// Creates a registry over the given option store.
	pub fn new(options: Arc<dyn OptionRepository>) -> Self {
		Self {
			options,
			_marker: PhantomData,
		}
	}

	/// Returns all definitions keyed by slug.
	pub fn all(&self) -> CoreResult<BTreeMap<String, T>> {
		Ok(get_typed(self.options.as_ref(), T::OPTION_KEY)?.unwrap_or_default())
	}

	/// Looks up a definition by slug.
	pub fn get(&self, slug: &str) -> CoreResult<Option<T>> {
		Ok(self.all()?.remove(slug))
	}

	/// Returns true if a definition with this slug exists.
	pub fn contains(&self, slug: &str) -> CoreResult<bool> {
		Ok(self.all()?.contains_key(slug))
	}

	/// Stores a new definition.
	///
	/// # Errors
	///
	/// Returns [`CoreError::SlugConflict`] if the slug is already registered.
	pub fn create(&self, definition: T) -> CoreResult<()> {
		let mut all = self.all()?;
		let slug = definition.slug().to_string();
		if all.contains_key(&slug) {
			return Err(CoreError::SlugConflict { kind: T::KIND, slug });
		}
		all.insert(slug, definition);
		set_typed(self.options.as_ref(), T::OPTION_KEY, &all)
	}

	/// Removes every definition, returning how many there were.
	pub fn clear(&self) -> CoreResult<usize> {
		let count = self.all()?.len();
		self.options.delete_option(T::OPTION_KEY)?;
		Ok(count)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemorySite;
	use rstest::{fixture, rstest};

	#[fixture]
	fn models() -> ModelRegistry {
		let site = Arc::new(MemorySite::new(std::env::temp_dir()));
		ModelRegistry::new(site)
	}

	#[rstest]
	fn test_create_and_get(models: ModelRegistry) {
		models.create(ContentModel::new("rabbit", "Rabbit", "Rabbits")).unwrap();

		assert!(models.contains("rabbit").unwrap());
		assert_eq!(models.get("rabbit").unwrap().unwrap().plural, "Rabbits");
		assert!(models.get("hare").unwrap().is_none());
	}

	#[rstest]
	fn test_create_existing_slug_conflicts(models: ModelRegistry) {
		models.create(ContentModel::new("rabbit", "Rabbit", "Rabbits")).unwrap();

		let result = models.create(ContentModel::new("rabbit", "Bunny", "Bunnies"));

		assert!(matches!(result, Err(CoreError::SlugConflict { kind: "model", .. })));
		assert_eq!(models.get("rabbit").unwrap().unwrap().singular, "Rabbit");
	}

	#[rstest]
	fn test_clear_is_idempotent(models: ModelRegistry) {
		models.create(ContentModel::new("rabbit", "Rabbit", "Rabbits")).unwrap();
		models.create(ContentModel::new("hare", "Hare", "Hares")).unwrap();

		assert_eq!(models.clear().unwrap(), 2);
		assert_eq!(models.clear().unwrap(), 0);
		assert!(models.all().unwrap().is_empty());
	}

	#[rstest]
	fn test_malformed_option_is_reported() {
		let site = Arc::new(MemorySite::new(std::env::temp_dir()));
		site.set_option(TAXONOMIES_OPTION, serde_json::json!("not a map")).unwrap();
		let taxonomies = TaxonomyRegistry::new(site);

		let result = taxonomies.all();

		assert!(matches!(result, Err(CoreError::InvalidOption { .. })));
	}
}
