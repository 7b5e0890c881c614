//! Content model (type) definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Who may read a model's entries through the host APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVisibility {
	/// Readable without authentication.
	Public,
	/// Requires authentication.
	#[default]
	Private,
}

/// Multiplicity constraint of a relationship definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
	/// Each endpoint appears at most once per relationship.
	OneToOne,
	/// Each "from" endpoint appears at most once per relationship.
	OneToMany,
	/// Each "to" endpoint appears at most once per relationship.
	ManyToOne,
	/// No uniqueness constraint.
	ManyToMany,
}

impl Cardinality {
	/// Returns the kebab-case name used in definitions.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::OneToOne => "one-to-one",
			Self::OneToMany => "one-to-many",
			Self::ManyToOne => "many-to-one",
			Self::ManyToMany => "many-to-many",
		}
	}

	/// Returns true if the "from" endpoint may hold at most one link.
	pub fn unique_from(&self) -> bool {
		matches!(self, Self::OneToOne | Self::OneToMany)
	}

	/// Returns true if the "to" endpoint may hold at most one link.
	pub fn unique_to(&self) -> bool {
		matches!(self, Self::OneToOne | Self::ManyToOne)
	}
}

impl fmt::Display for Cardinality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
	/// Single-line or multi-line text.
	Text,
	/// Rich text.
	RichText,
	/// Number.
	Number,
	/// Date.
	Date,
	/// True/false.
	Boolean,
	/// Reference to a media item.
	Media,
	/// One or more predefined choices.
	MultipleChoice,
	/// Email address.
	Email,
	/// Link to entries of another model.
	Relationship,
}

/// A field of a content model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
	/// Stable field identifier inside the model.
	pub id: String,
	/// Field slug, used as meta key and relationship name.
	pub slug: String,
	/// Human-readable name.
	pub name: String,
	/// Field kind.
	#[serde(rename = "type")]
	pub field_type: FieldType,
	/// Position in the editing form.
	#[serde(default)]
	pub position: u32,
	/// Whether a value is mandatory.
	#[serde(default)]
	pub required: bool,
	/// For relationship fields, the referenced model slug.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
	/// For relationship fields, the multiplicity constraint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cardinality: Option<Cardinality>,
}

impl FieldDefinition {
	/// Creates a field whose id and slug are both `slug`.
	pub fn new(slug: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
		let slug = slug.into();
		Self {
			id: slug.clone(),
			slug,
			name: name.into(),
			field_type,
			position: 0,
			required: false,
			reference: None,
			cardinality: None,
		}
	}

	/// Creates a relationship field.
	pub fn relationship(
		slug: impl Into<String>,
		name: impl Into<String>,
		reference: impl Into<String>,
		cardinality: Cardinality,
	) -> Self {
		let mut field = Self::new(slug, name, FieldType::Relationship);
		field.reference = Some(reference.into());
		field.cardinality = Some(cardinality);
		field
	}
}

/// A custom content type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentModel {
	/// Unique type slug.
	pub slug: String,
	/// Singular label.
	pub singular: String,
	/// Plural label.
	pub plural: String,
	/// Free-form description.
	#[serde(default)]
	pub description: String,
	/// API visibility.
	#[serde(default)]
	pub api_visibility: ApiVisibility,
	/// Exposed through the REST API.
	#[serde(default = "default_true")]
	pub show_in_rest: bool,
	/// Exposed through the GraphQL API.
	#[serde(default = "default_true")]
	pub show_in_graphql: bool,
	/// Fields keyed by field id.
	#[serde(default)]
	pub fields: BTreeMap<String, FieldDefinition>,
}

fn default_true() -> bool {
	true
}

impl ContentModel {
	/// Creates a model with no fields.
	pub fn new(slug: impl Into<String>, singular: impl Into<String>, plural: impl Into<String>) -> Self {
		Self {
			slug: slug.into(),
			singular: singular.into(),
			plural: plural.into(),
			description: String::new(),
			api_visibility: ApiVisibility::default(),
			show_in_rest: true,
			show_in_graphql: true,
			fields: BTreeMap::new(),
		}
	}

	/// Adds a field, keyed by its id.
	pub fn with_field(mut self, field: FieldDefinition) -> Self {
		self.fields.insert(field.id.clone(), field);
		self
	}
}
