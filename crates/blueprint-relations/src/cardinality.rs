//! Write-time cardinality rules.

use blueprint_core::{Cardinality, EntryId};

use crate::record::RelationshipRecord;

/// Finds the endpoint that blocks linking `from -> to`.
///
/// `records` must all belong to the relationship being linked. Returns the
/// entry that already occupies a unique side, or `None` if the link is allowed.
pub fn find_conflict(
	records: &[RelationshipRecord],
	cardinality: Cardinality,
	from: EntryId,
	to: EntryId,
) -> Option<EntryId> {
	if cardinality.unique_from() && records.iter().any(|r| r.link.id1 == from) {
		return Some(from);
	}
	if cardinality.unique_to() && records.iter().any(|r| r.link.id2 == to) {
		return Some(to);
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::record::Link;
	use rstest::rstest;

	fn existing() -> Vec<RelationshipRecord> {
		vec![RelationshipRecord {
			id: 1,
			link: Link::new(1, 2, "rel"),
		}]
	}

	#[rstest]
	#[case::one_to_one_reused_from(Cardinality::OneToOne, 1, 3, Some(1))]
	#[case::one_to_one_reused_to(Cardinality::OneToOne, 4, 2, Some(2))]
	#[case::one_to_one_fresh(Cardinality::OneToOne, 4, 5, None)]
	#[case::one_to_many_reused_from(Cardinality::OneToMany, 1, 3, Some(1))]
	#[case::one_to_many_reused_to(Cardinality::OneToMany, 4, 2, None)]
	#[case::many_to_one_reused_from(Cardinality::ManyToOne, 1, 3, None)]
	#[case::many_to_one_reused_to(Cardinality::ManyToOne, 4, 2, Some(2))]
	#[case::many_to_many(Cardinality::ManyToMany, 1, 2, None)]
	fn test_find_conflict(
		#[case] cardinality: Cardinality,
		#[case] from: EntryId,
		#[case] to: EntryId,
		#[case] expected: Option<EntryId>,
	) {
		assert_eq!(find_conflict(&existing(), cardinality, from, to), expected);
	}
}
