//! Portable content blueprints: export, import and reset.
//!
//! A blueprint archive is a zip holding a JSON [`Manifest`] at its root and the
//! referenced media under `media/{id}/{filename}`. It carries content model and
//! taxonomy definitions, published entries, their field values and term
//! assignments, and the relationship links between them.
//!
//! - **Export**: [`Exporter`] walks a source site and writes an archive
//! - **Import**: [`Importer`] replays an archive on a destination site,
//!   remapping every identifier through [`IdMap`]s
//! - **Reset**: [`Resetter`] deletes what blueprints created
//!
//! # Quick Start
//!
//! ```ignore
//! use blueprint_transfer::prelude::*;
//!
//! let exporter = Exporter::new(source, TransferSettings::default());
//! let outcome = exporter.export(&ExportRequest::for_types(["rabbit"]))?;
//!
//! let importer = Importer::new(destination, TransferSettings::default());
//! let report = importer.import_blueprint(&outcome.archive)?;
//! for line in report.summary_lines() {
//!     println!("{line}");
//! }
//! ```
//!
//! # Commands
//!
//! - [`ExportCommand`](commands::ExportCommand) - export to an archive
//! - [`ImportCommand`](commands::ImportCommand) - import from an archive
//! - [`ResetCommand`](commands::ResetCommand) - delete by family

pub mod archive;
pub mod commands;
pub mod context;
pub mod error;
pub mod export;
pub mod import;
pub mod manifest;
pub mod prelude;
pub mod reset;
pub mod settings;
pub mod version;

pub use context::SiteContext;
pub use error::{TransferError, TransferResult};
pub use export::{ExportOutcome, ExportRequest, Exporter};
pub use import::{IdMap, ImportReport, Importer, ItemErrorKind, ItemFailure, Resolution, StepReport};
pub use manifest::{Manifest, ManifestMeta, MetaOverrides};
pub use reset::{ResetReport, ResetScope, Resetter};
pub use settings::TransferSettings;
