//! Cardinality-enforcing relationship store.

use std::sync::Arc;

use blueprint_core::{Cardinality, EntryId};

use crate::cardinality::find_conflict;
use crate::error::{RelationError, RelationResult};
use crate::record::{Link, RelationshipRecord};
use crate::table::RelationshipTable;

/// Which side of a relationship to follow in [`RelationshipStore::get_related`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
	/// Entries this entry links to.
	#[default]
	Outgoing,
	/// Entries linking to this entry.
	Incoming,
	/// Both of the above.
	Both,
}

/// Live link editing over a [`RelationshipTable`].
#[derive(Clone)]
pub struct RelationshipStore {
	table: Arc<dyn RelationshipTable>,
}

impl RelationshipStore {
	/// Creates a store over the given table.
	pub fn new(table: Arc<dyn RelationshipTable>) -> Self {
		Self { table }
	}

	/// The underlying table.
	pub fn table(&self) -> &Arc<dyn RelationshipTable> {
		&self.table
	}

	/// Links `id_from -> id_to` under `name`.
	///
	/// The new record's order comes from
	/// [`RelationshipTable::next_order`], so an unlink never frees an order
	/// for reuse. Linking an existing pair returns the stored
	/// record unchanged.
	///
	/// # Errors
	///
	/// Returns [`RelationError::CardinalityViolation`] without writing anything
	/// if the link would break `cardinality`.
	pub fn link(
		&self,
		id_from: EntryId,
		id_to: EntryId,
		name: &str,
		cardinality: Cardinality,
	) -> RelationResult<RelationshipRecord> {
		let records = self.table.records_named(name)?;

		if let Some(existing) = records.iter().find(|r| r.is(id_from, id_to, name)) {
			tracing::debug!(id_from, id_to, name, "link already present");
			return Ok(existing.clone());
		}

		if let Some(conflicting) = find_conflict(&records, cardinality, id_from, id_to) {
			return Err(RelationError::CardinalityViolation {
				name: name.to_string(),
				cardinality,
				id_from,
				id_to,
				conflicting,
			});
		}

		let order = self.table.next_order(id_from, name)?;

		let record = self
			.table
			.insert(Link::new(id_from, id_to, name).with_order(order))?;
		tracing::debug!(id_from, id_to, name, order, "linked entries");
		Ok(record)
	}

	/// Removes the `id_from -> id_to` link under `name`.
	///
	/// Returns whether anything was removed. A missing link is not an error.
	pub fn unlink(&self, id_from: EntryId, id_to: EntryId, name: &str) -> RelationResult<bool> {
		let mut removed = false;
		for record in self.table.records_named(name)? {
			if record.is(id_from, id_to, name) {
				removed |= self.table.remove(record.id)?;
			}
		}
		Ok(removed)
	}

	/// Returns the entries related to `id` under `name`, in link order.
	pub fn get_related(&self, id: EntryId, name: &str, direction: Direction) -> RelationResult<Vec<EntryId>> {
		let mut related: Vec<(u32, u64, EntryId)> = self
			.table
			.records_named(name)?
			.into_iter()
			.filter_map(|r| {
				let other = match direction {
					Direction::Outgoing if r.link.id1 == id => r.link.id2,
					Direction::Incoming if r.link.id2 == id => r.link.id1,
					Direction::Both if r.link.id1 == id => r.link.id2,
					Direction::Both if r.link.id2 == id => r.link.id1,
					_ => return None,
				};
				Some((r.link.order, r.id, other))
			})
			.collect();
		related.sort();
		Ok(related.into_iter().map(|(_, _, other)| other).collect())
	}
}
