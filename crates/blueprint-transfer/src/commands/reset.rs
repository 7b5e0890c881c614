//! reset command implementation.

use colored::Colorize;

use crate::context::SiteContext;
use crate::error::{TransferError, TransferResult};
use crate::reset::{ResetReport, ResetScope, Resetter};

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
	/// Families to delete.
	pub scope: ResetScope,
	/// Verbosity level.
	pub verbosity: u8,
}

impl ResetOptions {
	/// Creates new options deleting nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the families to delete.
	pub fn with_scope(mut self, scope: ResetScope) -> Self {
		self.scope = scope;
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// Deletes blueprint data from a site.
pub struct ResetCommand {
	site: SiteContext,
}

impl ResetCommand {
	/// Creates a new reset command.
	pub fn new(site: SiteContext) -> Self {
		Self { site }
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"reset"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Deletes content, classifications, relationships, media and definitions"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: reset [options]

Deletes data created through content blueprints.

Options:
  --all                  Select every family below
  --posts                Delete entries of registered types
  --media                Delete media used by those entries
  --relationships        Delete every relationship record
  --terms                Delete terms of registered taxonomies
  --taxonomies           Delete taxonomy definitions
  --models               Delete content type definitions
  --include-core         Also delete host-owned entries and media
"#
	}

	/// Executes the reset command.
	pub fn execute(&self, options: ResetOptions) -> TransferResult<ResetReport> {
		let scope = options.scope;
		if !(scope.posts || scope.media || scope.relationships || scope.terms || scope.taxonomies || scope.models) {
			return Err(TransferError::Config("nothing selected to reset".to_string()));
		}

		let report = Resetter::new(self.site.clone()).reset(&scope)?;

		if options.verbosity > 0 {
			self.print_result(&report);
		}
		Ok(report)
	}

	fn print_result(&self, report: &ResetReport) {
		println!("{} {} record(s)", "Deleted".red().bold(), report.total());
		for (family, count) in report.counts() {
			println!("  {family:<14} {count}");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use blueprint_core::MemorySite;
	use blueprint_relations::MemoryRelationshipTable;
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	#[fixture]
	fn command() -> ResetCommand {
		ResetCommand::new(SiteContext::from_memory(
			Arc::new(MemorySite::new(std::env::temp_dir())),
			Arc::new(MemoryRelationshipTable::new()),
		))
	}

	#[rstest]
	fn test_empty_scope_is_rejected(command: ResetCommand) {
		let result = command.execute(ResetOptions::new());
		assert!(matches!(result, Err(TransferError::Config(_))));
	}

	#[rstest]
	fn test_reset_on_empty_site_deletes_nothing(command: ResetCommand) {
		let report = command
			.execute(ResetOptions::new().with_scope(ResetScope::all()))
			.unwrap();
		assert_eq!(report.total(), 0);
	}
}
