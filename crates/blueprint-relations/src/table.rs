//! Relationship table interface and in-memory implementation.

use std::collections::BTreeMap;

use blueprint_core::EntryId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::RelationResult;
use crate::record::{Link, RecordId, RelationshipRecord};

/// Raw storage for relationship records.
///
/// The table applies no rules of its own. Bulk replays write through it
/// directly, while live edits go through
/// [`RelationshipStore`](crate::store::RelationshipStore), which checks
/// cardinality first.
pub trait RelationshipTable: Send + Sync {
	/// Appends a record and returns it with its row identifier.
	fn insert(&self, link: Link) -> RelationResult<RelationshipRecord>;

	/// Returns every record in insertion order.
	fn records(&self) -> RelationResult<Vec<RelationshipRecord>>;

	/// Removes a record by row identifier.
	fn remove(&self, id: RecordId) -> RelationResult<bool>;

	/// Removes every record, returning how many there were.
	fn clear(&self) -> RelationResult<usize>;

	/// Order for the next link from `id_from` under `name`.
	///
	/// Defaults to one past the highest order among the stored records.
	/// Tables that remember orders of removed records return at least that.
	fn next_order(&self, id_from: EntryId, name: &str) -> RelationResult<u32> {
		Ok(self
			.records_named(name)?
			.iter()
			.filter(|r| r.link.id1 == id_from)
			.map(|r| r.link.order + 1)
			.max()
			.unwrap_or(0))
	}

	/// Returns the records stored under `name`.
	fn records_named(&self, name: &str) -> RelationResult<Vec<RelationshipRecord>> {
		Ok(self
			.records()?
			.into_iter()
			.filter(|r| r.link.name == name)
			.collect())
	}
}

/// Next unused order for one `(id_from, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMark {
	pub id_from: EntryId,
	pub name: String,
	pub next: u32,
}

#[derive(Debug, Default)]
struct TableState {
	records: Vec<RelationshipRecord>,
	next_id: RecordId,
	// survives remove and clear so orders are never handed out twice
	order_marks: BTreeMap<(EntryId, String), u32>,
}

impl TableState {
	fn raise_mark(&mut self, link: &Link) {
		let mark = self.order_marks.entry((link.id1, link.name.clone())).or_insert(0);
		*mark = (*mark).max(link.order + 1);
	}
}

/// A [`RelationshipTable`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryRelationshipTable {
	state: RwLock<TableState>,
}

impl MemoryRelationshipTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a table holding previously saved records.
	pub fn from_records(records: Vec<RelationshipRecord>) -> Self {
		let next_id = records.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
		let mut state = TableState {
			next_id,
			..TableState::default()
		};
		for record in records {
			state.raise_mark(&record.link);
			state.records.push(record);
		}
		Self {
			state: RwLock::new(state),
		}
	}

	/// Restores order marks saved with [`order_marks`](Self::order_marks).
	///
	/// Marks lower than what the held records already imply are ignored.
	pub fn with_order_marks(self, marks: Vec<OrderMark>) -> Self {
		{
			let mut state = self.state.write();
			for mark in marks {
				let next = state.order_marks.entry((mark.id_from, mark.name)).or_insert(0);
				*next = (*next).max(mark.next);
			}
		}
		self
	}

	/// Current order marks, for saving alongside the records.
	pub fn order_marks(&self) -> Vec<OrderMark> {
		self.state
			.read()
			.order_marks
			.iter()
			.map(|((id_from, name), next)| OrderMark {
				id_from: *id_from,
				name: name.clone(),
				next: *next,
			})
			.collect()
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.state.read().records.len()
	}

	/// Returns true if the table has no records.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl RelationshipTable for MemoryRelationshipTable {
	fn insert(&self, link: Link) -> RelationResult<RelationshipRecord> {
		let mut state = self.state.write();
		let id = state.next_id.max(1);
		state.next_id = id + 1;
		state.raise_mark(&link);
		let record = RelationshipRecord { id, link };
		state.records.push(record.clone());
		Ok(record)
	}

	fn records(&self) -> RelationResult<Vec<RelationshipRecord>> {
		Ok(self.state.read().records.clone())
	}

	fn next_order(&self, id_from: EntryId, name: &str) -> RelationResult<u32> {
		Ok(self
			.state
			.read()
			.order_marks
			.get(&(id_from, name.to_string()))
			.copied()
			.unwrap_or(0))
	}

	fn remove(&self, id: RecordId) -> RelationResult<bool> {
		let mut state = self.state.write();
		let before = state.records.len();
		state.records.retain(|r| r.id != id);
		Ok(state.records.len() != before)
	}

	fn clear(&self) -> RelationResult<usize> {
		let mut state = self.state.write();
		let count = state.records.len();
		state.records.clear();
		Ok(count)
	}
}
