//! Relationship records.

use blueprint_core::EntryId;
use serde::{Deserialize, Serialize};

/// Row identifier inside a relationship table.
pub type RecordId = u64;

/// A directed link between two entries, as exported and replayed.
///
/// `id1` is always the "from" endpoint of the relationship definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
	pub id1: EntryId,
	pub id2: EntryId,
	pub name: String,
	#[serde(default)]
	pub order: u32,
}

impl Link {
	/// Creates a link with order 0.
	pub fn new(id1: EntryId, id2: EntryId, name: impl Into<String>) -> Self {
		Self {
			id1,
			id2,
			name: name.into(),
			order: 0,
		}
	}

	/// Sets the order.
	pub fn with_order(mut self, order: u32) -> Self {
		self.order = order;
		self
	}
}

/// A stored link together with its row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
	pub id: RecordId,
	#[serde(flatten)]
	pub link: Link,
}

impl RelationshipRecord {
	/// Returns true if this record connects exactly `from -> to` under `name`.
	pub fn is(&self, from: EntryId, to: EntryId, name: &str) -> bool {
		self.link.id1 == from && self.link.id2 == to && self.link.name == name
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_record_serializes_flat() {
		let record = RelationshipRecord {
			id: 7,
			link: Link::new(1, 2, "friend").with_order(3),
		};

		let json = serde_json::to_value(&record).unwrap();

		assert_eq!(
			json,
			serde_json::json!({"id": 7, "id1": 1, "id2": 2, "name": "friend", "order": 3})
		);
	}

	#[rstest]
	fn test_link_order_defaults_to_zero() {
		let link: Link = serde_json::from_str(r#"{"id1": 4, "id2": 5, "name": "friend"}"#).unwrap();
		assert_eq!(link.order, 0);
	}
}
