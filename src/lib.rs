//! # Blueprint
//!
//! Portable content blueprints for a content management host.
//!
//! A blueprint is a zip archive holding a JSON manifest and the media files
//! it references. It captures custom content models, taxonomies, published
//! entries with their field values and term assignments, entry-to-entry
//! relationships and selected host options, so one site's content structure
//! can be replayed on another.
//!
//! ## Crates
//!
//! - [`core`] - content models, taxonomies, entries, media and the host store traits
//! - [`relations`] - the relationship table and cardinality enforcement
//! - [`transfer`] - manifest, archive, export, import and reset
//!
//! ## Feature Flags
//!
//! - `core` - [`core`] only
//! - `relations` - adds [`relations`]
//! - `transfer` - adds [`transfer`]
//! - `full` (default) - everything
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use blueprint::core::MemorySite;
//! use blueprint::relations::MemoryRelationshipTable;
//! use blueprint::transfer::{ExportRequest, Exporter, SiteContext, TransferSettings};
//!
//! let site = Arc::new(MemorySite::new("/var/lib/site/media"));
//! let context = SiteContext::from_memory(site, Arc::new(MemoryRelationshipTable::new()));
//! let outcome = Exporter::new(context, TransferSettings::default())
//! 	.export(&ExportRequest::for_types(["rabbit"]))?;
//! println!("wrote {}", outcome.archive.display());
//! # Ok::<(), blueprint::transfer::TransferError>(())
//! ```

#[cfg(feature = "core")]
pub use blueprint_core as core;

#[cfg(feature = "relations")]
pub use blueprint_relations as relations;

#[cfg(feature = "transfer")]
pub use blueprint_transfer as transfer;

#[cfg(feature = "transfer")]
pub use blueprint_transfer::prelude;
