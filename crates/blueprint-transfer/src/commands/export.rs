//! export command implementation.

use std::path::PathBuf;

use colored::Colorize;

use crate::context::SiteContext;
use crate::error::{TransferError, TransferResult};
use crate::export::{ExportOutcome, ExportRequest, Exporter};
use crate::manifest::MetaOverrides;
use crate::settings::TransferSettings;

/// Arguments for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
	/// Entry types to export.
	pub types: Vec<String>,
	/// Taxonomies to export.
	pub taxonomies: Vec<String>,
	/// Blueprint name, also used for the archive file name.
	pub name: Option<String>,
}

/// Options for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
	/// Manifest description.
	pub description: Option<String>,
	/// Host options to include.
	pub option_keys: Vec<String>,
	/// Directory receiving the archive.
	pub output_dir: Option<PathBuf>,
	/// Verbosity level.
	pub verbosity: u8,
}

impl ExportOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the manifest description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the host options to include.
	pub fn with_option_keys(mut self, keys: Vec<String>) -> Self {
		self.option_keys = keys;
		self
	}

	/// Sets the output directory.
	pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.output_dir = Some(dir.into());
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Exports content types, taxonomies and their content into an archive.
pub struct ExportCommand {
	site: SiteContext,
	settings: TransferSettings,
}

impl ExportCommand {
	/// Creates a new export command over a source site.
	pub fn new(site: SiteContext, settings: TransferSettings) -> Self {
		Self { site, settings }
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"export"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Exports content types and their content into a blueprint archive"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: export [options] type [type ...]

Exports content types and their content into a blueprint archive.

Arguments:
  type                   Content type slugs to export

Options:
  --taxonomy, -t SLUG    Taxonomy to export (repeatable)
  --name NAME            Blueprint name, used for the archive file name
  --description TEXT     Blueprint description
  --option KEY           Host option to include (repeatable)
  --output DIR           Directory receiving the archive
"#
	}

	/// Executes the export command and returns the archive path.
	pub fn execute(&self, args: ExportArgs, options: ExportOptions) -> TransferResult<PathBuf> {
		if args.types.is_empty() {
			return Err(TransferError::Config(
				"at least one content type must be specified".to_string(),
			));
		}

		let mut settings = self.settings.clone();
		if let Some(dir) = options.output_dir {
			settings = settings.with_output_dir(dir);
		}
		let overrides = MetaOverrides {
			name: args.name,
			description: options.description,
			..MetaOverrides::default()
		};

		let request = ExportRequest::for_types(args.types)
			.with_taxonomies(args.taxonomies)
			.with_option_keys(options.option_keys)
			.with_overrides(overrides);
		let outcome = Exporter::new(self.site.clone(), settings).export(&request)?;

		if options.verbosity > 0 {
			self.print_result(&outcome);
		}
		Ok(outcome.archive)
	}

	fn print_result(&self, outcome: &ExportOutcome) {
		let manifest = &outcome.manifest;
		println!(
			"{} {}",
			"Exported".green().bold(),
			outcome.archive.display().to_string().cyan()
		);
		println!("  models:        {}", manifest.models.len());
		println!("  taxonomies:    {}", manifest.taxonomies.len());
		println!("  entries:       {}", manifest.posts.len());
		println!("  media:         {}", manifest.media.len());
		println!("  relationships: {}", manifest.relationships.len());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use blueprint_core::{ContentModel, MemorySite};
	use blueprint_relations::MemoryRelationshipTable;
	use rstest::rstest;
	use std::sync::Arc;

	#[rstest]
	fn test_command_metadata() {
		let site = SiteContext::from_memory(
			Arc::new(MemorySite::new(std::env::temp_dir())),
			Arc::new(MemoryRelationshipTable::new()),
		);
		let command = ExportCommand::new(site, TransferSettings::default());

		assert_eq!(command.name(), "export");
		assert!(command.help().contains("--taxonomy"));
	}

	#[rstest]
	fn test_execute_requires_types() {
		let site = SiteContext::from_memory(
			Arc::new(MemorySite::new(std::env::temp_dir())),
			Arc::new(MemoryRelationshipTable::new()),
		);
		let command = ExportCommand::new(site, TransferSettings::default());

		let result = command.execute(ExportArgs::default(), ExportOptions::new());

		assert!(matches!(result, Err(TransferError::Config(_))));
	}

	#[rstest]
	fn test_execute_writes_named_archive() {
		let root = tempfile::tempdir().unwrap();
		let site = SiteContext::from_memory(
			Arc::new(MemorySite::new(root.path().join("media"))),
			Arc::new(MemoryRelationshipTable::new()),
		);
		site.models()
			.create(ContentModel::new("rabbit", "Rabbit", "Rabbits"))
			.unwrap();
		let command = ExportCommand::new(site, TransferSettings::default());
		let args = ExportArgs {
			types: vec!["rabbit".to_string()],
			name: Some("Spring Warren".to_string()),
			..ExportArgs::default()
		};

		let archive = command
			.execute(args, ExportOptions::new().with_output_dir(root.path()))
			.unwrap();

		assert_eq!(archive, root.path().join("spring-warren.zip"));
		assert!(archive.is_file());
	}
}
