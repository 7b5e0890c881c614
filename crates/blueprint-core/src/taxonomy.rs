//! Classification schemes and their terms.

use serde::{Deserialize, Serialize};

use crate::model::ApiVisibility;

/// Host identifier of a term.
pub type TermId = u64;

/// A custom classification scheme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
	/// Unique taxonomy slug.
	pub slug: String,
	/// Singular label.
	pub singular: String,
	/// Plural label.
	pub plural: String,
	/// Model slugs this taxonomy applies to.
	#[serde(default)]
	pub types: Vec<String>,
	/// Whether terms may have parents.
	#[serde(default)]
	pub hierarchical: bool,
	/// API visibility.
	#[serde(default)]
	pub api_visibility: ApiVisibility,
	/// Exposed through the REST API.
	#[serde(default = "default_true")]
	pub show_in_rest: bool,
	/// Exposed through the GraphQL API.
	#[serde(default = "default_true")]
	pub show_in_graphql: bool,
}

fn default_true() -> bool {
	true
}

impl Taxonomy {
	/// Creates a flat taxonomy attached to the given models.
	pub fn new<I, S>(slug: impl Into<String>, singular: impl Into<String>, plural: impl Into<String>, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			slug: slug.into(),
			singular: singular.into(),
			plural: plural.into(),
			types: types.into_iter().map(Into::into).collect(),
			hierarchical: false,
			api_visibility: ApiVisibility::default(),
			show_in_rest: true,
			show_in_graphql: true,
		}
	}

	/// Marks the taxonomy as hierarchical.
	pub fn hierarchical(mut self) -> Self {
		self.hierarchical = true;
		self
	}
}

/// A value within a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
	/// Host identifier.
	pub id: TermId,
	/// Owning taxonomy slug.
	pub taxonomy: String,
	/// Slug, unique within the taxonomy.
	pub slug: String,
	/// Display name.
	pub name: String,
	/// Parent term, for hierarchical taxonomies.
	#[serde(default)]
	pub parent: Option<TermId>,
}

/// Values for a term that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTerm {
	/// Owning taxonomy slug.
	pub taxonomy: String,
	/// Slug, unique within the taxonomy.
	pub slug: String,
	/// Display name.
	pub name: String,
	/// Parent term.
	pub parent: Option<TermId>,
}

impl NewTerm {
	/// Creates a root term.
	pub fn new(taxonomy: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			taxonomy: taxonomy.into(),
			slug: slug.into(),
			name: name.into(),
			parent: None,
		}
	}

	/// Sets the parent term.
	pub fn with_parent(mut self, parent: TermId) -> Self {
		self.parent = Some(parent);
		self
	}
}
