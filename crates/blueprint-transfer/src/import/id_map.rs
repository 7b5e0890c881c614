//! Source-to-destination identifier maps.

use std::collections::BTreeMap;

/// Outcome of looking up a source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Created during this import.
	Mapped(u64),
	/// Not created during this import; taken to name a record already at the
	/// destination under the same identifier.
	Passthrough(u64),
}

impl Resolution {
	/// Destination identifier.
	pub fn id(self) -> u64 {
		match self {
			Self::Mapped(id) | Self::Passthrough(id) => id,
		}
	}

	/// Returns true if the identifier came from the map.
	pub fn is_mapped(self) -> bool {
		matches!(self, Self::Mapped(_))
	}
}

/// Identifiers created for one record family during an import.
///
/// Each import step that creates records returns one of these, and later
/// steps resolve references through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdMap {
	family: &'static str,
	ids: BTreeMap<u64, u64>,
}

impl IdMap {
	/// Creates an empty map for a record family ("entry", "term", "media").
	pub fn new(family: &'static str) -> Self {
		Self {
			family,
			ids: BTreeMap::new(),
		}
	}

	/// Records that `source` now lives at `destination`.
	pub fn insert(&mut self, source: u64, destination: u64) {
		self.ids.insert(source, destination);
	}

	/// Looks up a mapped identifier.
	pub fn get(&self, source: u64) -> Option<u64> {
		self.ids.get(&source).copied()
	}

	/// Resolves a reference, passing unmapped identifiers through unchanged.
	pub fn resolve(&self, source: u64) -> Resolution {
		match self.get(source) {
			Some(destination) => Resolution::Mapped(destination),
			None => {
				tracing::debug!(family = self.family, id = source, "unmapped identifier passed through");
				Resolution::Passthrough(source)
			}
		}
	}

	/// Number of mapped identifiers.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Returns true if nothing was mapped.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_resolve_mapped_and_passthrough() {
		let mut map = IdMap::new("entry");
		map.insert(1, 101);

		assert_eq!(map.resolve(1), Resolution::Mapped(101));
		assert_eq!(map.resolve(2), Resolution::Passthrough(2));
		assert_eq!(map.resolve(2).id(), 2);
		assert!(!map.resolve(2).is_mapped());
		assert_eq!(map.len(), 1);
	}
}
