//! Field values attached to entries.
//!
//! Field values are stored as an ordered list of `{meta_key, meta_value}` pairs per
//! entry. The value itself is a tagged union over the shapes the content model
//! produces, so the import pipeline can tell media references apart from plain
//! numbers without inspecting the key.
//!
//! # JSON representation
//!
//! ```json
//! {"meta_key": "title", "meta_value": "Peter"}
//! {"meta_key": "weight", "meta_value": 2.5}
//! {"meta_key": "colors", "meta_value": ["white", "brown"]}
//! {"meta_key": "photo", "meta_value": {"media_id": 17}}
//! ```

use serde::{Deserialize, Serialize};

use crate::media::MediaId;

/// A single scalar field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
	/// Boolean value.
	Boolean(bool),
	/// Integral number.
	Integer(i64),
	/// Floating-point number.
	Float(f64),
	/// Text value.
	Text(String),
}

impl From<&str> for ScalarValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for ScalarValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for ScalarValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<bool> for ScalarValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

/// Reference to a media item by host identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference {
	/// Referenced media item.
	pub media_id: MediaId,
}

/// Value of a field attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// Reference to a media item.
	Media(MediaReference),
	/// Ordered list of scalars (e.g. multiple choice).
	List(Vec<ScalarValue>),
	/// Single scalar.
	Scalar(ScalarValue),
}

impl FieldValue {
	/// Creates a media reference value.
	pub fn media(media_id: MediaId) -> Self {
		Self::Media(MediaReference { media_id })
	}

	/// Creates a text value.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Scalar(ScalarValue::Text(value.into()))
	}

	/// Returns the referenced media item, if this is a media reference.
	pub fn media_id(&self) -> Option<MediaId> {
		match self {
			Self::Media(reference) => Some(reference.media_id),
			_ => None,
		}
	}
}

impl From<ScalarValue> for FieldValue {
	fn from(value: ScalarValue) -> Self {
		Self::Scalar(value)
	}
}

/// One `{key, value}` pair attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
	/// Field key.
	pub meta_key: String,
	/// Field value.
	pub meta_value: FieldValue,
}

impl MetaEntry {
	/// Creates a new pair.
	pub fn new(meta_key: impl Into<String>, meta_value: impl Into<FieldValue>) -> Self {
		Self {
			meta_key: meta_key.into(),
			meta_value: meta_value.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!("Peter"), FieldValue::text("Peter"))]
	#[case(json!(3), FieldValue::Scalar(ScalarValue::Integer(3)))]
	#[case(json!(2.5), FieldValue::Scalar(ScalarValue::Float(2.5)))]
	#[case(json!(true), FieldValue::Scalar(ScalarValue::Boolean(true)))]
	#[case(json!(["white", 2]), FieldValue::List(vec!["white".into(), ScalarValue::Integer(2)]))]
	#[case(json!({"media_id": 17}), FieldValue::media(17))]
	fn test_field_value_shapes(#[case] raw: serde_json::Value, #[case] expected: FieldValue) {
		let parsed: FieldValue = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(parsed, expected);
		assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
	}

	#[rstest]
	fn test_numeric_scalar_is_not_a_media_reference() {
		let value: FieldValue = serde_json::from_value(json!(17)).unwrap();
		assert_eq!(value.media_id(), None);
		assert_eq!(FieldValue::media(17).media_id(), Some(17));
	}

	#[rstest]
	fn test_meta_entry_json_shape() {
		let meta = MetaEntry::new("photo", FieldValue::media(4));
		assert_eq!(
			serde_json::to_value(&meta).unwrap(),
			json!({"meta_key": "photo", "meta_value": {"media_id": 4}})
		);
	}
}
