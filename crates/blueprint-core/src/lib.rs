//! Content model types and host store interfaces for content blueprints.
//!
//! This crate defines the vocabulary shared by the blueprint pipeline:
//!
//! - **Entries**: typed units of content ([`Entry`]) with ordered field values ([`MetaEntry`])
//! - **Models**: custom content type definitions ([`ContentModel`]) and their fields
//! - **Taxonomies**: classification schemes ([`Taxonomy`]) and their terms ([`Term`])
//! - **Media**: uploaded files ([`MediaItem`]) and derived renditions
//!
//! # Host Collaborators
//!
//! The pipeline never talks to a concrete CMS. It consumes the host through the
//! traits in [`store`] and [`options`]:
//!
//! - [`ContentStore`] - create/read typed entries and their field values
//! - [`ClassificationStore`] - taxonomy terms and term assignments
//! - [`MediaStore`] - file copy-in and rendition generation
//! - [`OptionRepository`] - the host key/value store that persists definitions
//!
//! [`ModelRegistry`] and [`TaxonomyRegistry`] are built on top of an injected
//! [`OptionRepository`] and detect slug conflicts.
//!
//! [`MemorySite`](memory::MemorySite) implements every collaborator in memory and
//! can be persisted as a JSON snapshot.

#![warn(missing_docs)]

pub mod entry;
pub mod error;
pub mod field;
pub mod media;
pub mod memory;
pub mod model;
pub mod options;
pub mod registry;
pub mod store;
pub mod taxonomy;

pub use entry::{Entry, EntryId, EntryQuery, EntryStatus, NewEntry};
pub use error::{CoreError, CoreResult};
pub use field::{FieldValue, MediaReference, MetaEntry, ScalarValue};
pub use media::{MediaId, MediaItem, Rendition, RenditionSize};
pub use memory::{MemorySite, SiteSnapshot};
pub use model::{ApiVisibility, Cardinality, ContentModel, FieldDefinition, FieldType};
pub use options::OptionRepository;
pub use registry::{Definition, DefinitionRegistry, ModelRegistry, TaxonomyRegistry};
pub use store::{ClassificationStore, ContentStore, MediaStore};
pub use taxonomy::{NewTerm, Taxonomy, Term, TermId};
