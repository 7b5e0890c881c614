//! # blueprint-relations
//!
//! Directed relationship links between content entries.
//!
//! Each link is stored as a [`RelationshipRecord`] `(id1, id2, name, order)` in a
//! [`RelationshipTable`]. Live editing goes through [`RelationshipStore`], which
//! enforces the relationship's [`Cardinality`] before writing. Bulk replay
//! (e.g. an import) writes to the table directly.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use blueprint_relations::{Cardinality, Direction, MemoryRelationshipTable, RelationshipStore};
//!
//! let store = RelationshipStore::new(Arc::new(MemoryRelationshipTable::new()));
//! store.link(1, 2, "spouse", Cardinality::OneToOne).unwrap();
//!
//! assert!(store.link(1, 3, "spouse", Cardinality::OneToOne).is_err());
//! assert_eq!(store.get_related(2, "spouse", Direction::Incoming).unwrap(), vec![1]);
//! ```

pub mod cardinality;
pub mod error;
pub mod record;
pub mod store;
pub mod table;

pub use blueprint_core::Cardinality;
pub use error::{RelationError, RelationResult};
pub use record::{Link, RecordId, RelationshipRecord};
pub use store::{Direction, RelationshipStore};
pub use table::{MemoryRelationshipTable, OrderMark, RelationshipTable};
