//! Per-step and whole-import results.

use std::fmt;

use blueprint_core::CoreError;

use super::id_map::IdMap;

/// Why a single item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemErrorKind {
	/// A record with the same slug already exists.
	SlugConflict,
	/// The item refers to something missing at the destination.
	UnresolvableReference,
	/// The host store rejected the write.
	Store,
}

impl ItemErrorKind {
	/// Classifies a host store error.
	pub fn of(error: &CoreError) -> Self {
		match error {
			CoreError::SlugConflict { .. } => Self::SlugConflict,
			CoreError::NotFound { .. } => Self::UnresolvableReference,
			_ => Self::Store,
		}
	}

	fn plural_label(self) -> &'static str {
		match self {
			Self::SlugConflict => "conflicts",
			Self::UnresolvableReference => "unresolved references",
			Self::Store => "store errors",
		}
	}
}

impl fmt::Display for ItemErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::SlugConflict => "slug conflict",
			Self::UnresolvableReference => "unresolvable reference",
			Self::Store => "store error",
		})
	}
}

/// One item that a step could not import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
	/// Record family, e.g. "models".
	pub family: &'static str,
	/// Identifier of the item, as written in the manifest.
	pub item: String,
	pub kind: ItemErrorKind,
	pub message: String,
}

impl fmt::Display for ItemFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} '{}': {}: {}", self.family, self.item, self.kind, self.message)
	}
}

/// Outcome of one import step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
	/// Step name, e.g. "create_models".
	pub step: &'static str,
	/// Record family the step imports.
	pub family: &'static str,
	/// Items the step tried to import.
	pub attempted: usize,
	/// Items imported or reused.
	pub succeeded: usize,
	/// Items intentionally left out.
	pub skipped: usize,
	pub failures: Vec<ItemFailure>,
}

impl StepReport {
	pub(crate) fn new(step: &'static str, family: &'static str) -> Self {
		Self {
			step,
			family,
			attempted: 0,
			succeeded: 0,
			skipped: 0,
			failures: Vec::new(),
		}
	}

	pub(crate) fn succeed(&mut self) {
		self.attempted += 1;
		self.succeeded += 1;
	}

	pub(crate) fn skip(&mut self, item: impl fmt::Display, reason: &str) {
		self.attempted += 1;
		self.skipped += 1;
		tracing::info!(step = self.step, item = %item, reason, "skipped item");
	}

	pub(crate) fn fail(&mut self, item: impl fmt::Display, kind: ItemErrorKind, message: impl Into<String>) {
		let failure = ItemFailure {
			family: self.family,
			item: item.to_string(),
			kind,
			message: message.into(),
		};
		tracing::warn!(step = self.step, failure = %failure, "item failed");
		self.attempted += 1;
		self.failures.push(failure);
	}

	pub(crate) fn fail_core(&mut self, item: impl fmt::Display, error: &CoreError) {
		self.fail(item, ItemErrorKind::of(error), error.to_string());
	}

	/// Number of failures of one kind.
	pub fn count(&self, kind: ItemErrorKind) -> usize {
		self.failures.iter().filter(|f| f.kind == kind).count()
	}

	/// Returns true if no item failed.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}

	/// One-line summary such as "3 of 5 taxonomies imported, 2 conflicts".
	pub fn summary_line(&self) -> String {
		let mut line = format!("{} of {} {} imported", self.succeeded, self.attempted, self.family);
		if self.skipped > 0 {
			line.push_str(&format!(", {} skipped", self.skipped));
		}
		for kind in [
			ItemErrorKind::SlugConflict,
			ItemErrorKind::UnresolvableReference,
			ItemErrorKind::Store,
		] {
			let count = self.count(kind);
			if count > 0 {
				line.push_str(&format!(", {count} {}", kind.plural_label()));
			}
		}
		line
	}
}

/// Outcome of a whole import.
#[derive(Debug, Clone)]
pub struct ImportReport {
	pub steps: Vec<StepReport>,
	/// Source to destination entry identifiers.
	pub entries: IdMap,
	/// Source to destination term identifiers.
	pub terms: IdMap,
	/// Source to destination media identifiers.
	pub media: IdMap,
	/// Whether the staging directory and archive were removed.
	pub cleaned_up: bool,
}

impl ImportReport {
	/// Looks up a step by name.
	pub fn step(&self, name: &str) -> Option<&StepReport> {
		self.steps.iter().find(|s| s.step == name)
	}

	/// Every per-item failure across all steps, in step order.
	pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
		self.steps.iter().flat_map(|s| s.failures.iter())
	}

	/// Returns true if no item failed in any step.
	pub fn is_clean(&self) -> bool {
		self.steps.iter().all(StepReport::is_clean)
	}

	/// One summary line per step.
	pub fn summary_lines(&self) -> Vec<String> {
		self.steps.iter().map(StepReport::summary_line).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_summary_line_counts_conflicts() {
		let mut report = StepReport::new("import_taxonomies", "taxonomies");
		for _ in 0..3 {
			report.succeed();
		}
		report.fail("genre", ItemErrorKind::SlugConflict, "exists");
		report.fail("mood", ItemErrorKind::SlugConflict, "exists");

		assert_eq!(report.summary_line(), "3 of 5 taxonomies imported, 2 conflicts");
		assert_eq!(report.count(ItemErrorKind::SlugConflict), 2);
		assert!(!report.is_clean());
	}

	#[rstest]
	fn test_summary_line_lists_skips_and_references() {
		let mut report = StepReport::new("import_posts", "entries");
		report.succeed();
		report.skip(4, "type missing");
		report.fail(7, ItemErrorKind::UnresolvableReference, "gone");

		assert_eq!(
			report.summary_line(),
			"1 of 3 entries imported, 1 skipped, 1 unresolved references"
		);
	}

	#[rstest]
	#[case(CoreError::SlugConflict { kind: "model", slug: "rabbit".to_string() }, ItemErrorKind::SlugConflict)]
	#[case(CoreError::NotFound { kind: "entry", id: "3".to_string() }, ItemErrorKind::UnresolvableReference)]
	#[case(CoreError::Storage("full".to_string()), ItemErrorKind::Store)]
	fn test_classify_core_errors(#[case] error: CoreError, #[case] expected: ItemErrorKind) {
		assert_eq!(ItemErrorKind::of(&error), expected);
	}

	#[rstest]
	fn test_import_report_aggregates() {
		let mut clean = StepReport::new("create_models", "models");
		clean.succeed();
		let mut dirty = StepReport::new("tag_posts", "term assignments");
		dirty.fail("1", ItemErrorKind::UnresolvableReference, "unknown taxonomy");
		let report = ImportReport {
			steps: vec![clean, dirty],
			entries: IdMap::new("entry"),
			terms: IdMap::new("term"),
			media: IdMap::new("media"),
			cleaned_up: true,
		};

		assert!(!report.is_clean());
		assert_eq!(report.failures().count(), 1);
		assert_eq!(report.step("create_models").unwrap().succeeded, 1);
		assert_eq!(report.summary_lines()[0], "1 of 1 models imported");
	}
}
