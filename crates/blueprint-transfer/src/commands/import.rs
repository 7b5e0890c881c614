//! import command implementation.

use std::path::PathBuf;

use colored::Colorize;

use crate::context::SiteContext;
use crate::error::{TransferError, TransferResult};
use crate::import::{ImportReport, Importer};
use crate::settings::TransferSettings;

/// Arguments for the import command.
#[derive(Debug, Clone, Default)]
pub struct ImportArgs {
	/// Archive to import.
	pub archive: PathBuf,
}

/// Options for the import command.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
	/// Replace host options that already exist.
	pub overwrite_options: bool,
	/// Verbosity level.
	pub verbosity: u8,
}

impl ImportOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether existing host options are replaced.
	pub fn with_overwrite_options(mut self, overwrite: bool) -> Self {
		self.overwrite_options = overwrite;
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Imports a blueprint archive into a destination site.
pub struct ImportCommand {
	site: SiteContext,
	settings: TransferSettings,
}

impl ImportCommand {
	/// Creates a new import command over a destination site.
	pub fn new(site: SiteContext, settings: TransferSettings) -> Self {
		Self { site, settings }
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"import"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Imports a blueprint archive, remapping every identifier"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: import [options] archive

Imports a blueprint archive. The archive is removed after a successful import.

Arguments:
  archive                Blueprint zip archive

Options:
  --overwrite-options    Replace host options that already exist
"#
	}

	/// Executes the import command.
	///
	/// Per-item failures are part of the returned report, not errors.
	pub fn execute(&self, args: ImportArgs, options: ImportOptions) -> TransferResult<ImportReport> {
		if !args.archive.is_file() {
			return Err(TransferError::io(
				&args.archive,
				std::io::Error::new(std::io::ErrorKind::NotFound, "archive not found"),
			));
		}

		let settings = self
			.settings
			.clone()
			.with_overwrite_options(options.overwrite_options || self.settings.overwrite_options);
		let report = Importer::new(self.site.clone(), settings).import_blueprint(&args.archive)?;

		if options.verbosity > 0 {
			self.print_result(&report);
		}
		Ok(report)
	}

	fn print_result(&self, report: &ImportReport) {
		for step in &report.steps {
			let line = step.summary_line();
			if step.is_clean() {
				println!("  {} {}", "✓".green(), line);
			} else {
				println!("  {} {}", "!".yellow().bold(), line);
			}
		}

		let failures: Vec<_> = report.failures().collect();
		if !failures.is_empty() {
			eprintln!("{}", "Item failures:".yellow().bold());
			for failure in failures {
				eprintln!("  - {failure}");
			}
		}
		if !report.cleaned_up {
			eprintln!("{}", "Staging files could not be fully removed".yellow());
		}
	}
}
