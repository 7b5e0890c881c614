//! Version requirement checks.

use semver::Version;

use crate::error::{TransferError, TransferResult};
use crate::manifest::Requirements;

/// Parses a version, accepting short forms such as `6.4` or `v7`.
///
/// Missing minor and patch components are filled with zero.
pub fn parse_version(input: &str) -> Result<Version, semver::Error> {
	let trimmed = input.trim().trim_start_matches('v');
	let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
	let (core, suffix) = trimmed.split_at(core_end);
	let padded = match core.matches('.').count() {
		0 => format!("{core}.0.0{suffix}"),
		1 => format!("{core}.0{suffix}"),
		_ => trimmed.to_string(),
	};
	Version::parse(&padded)
}

/// Fails unless both running versions satisfy the manifest's minimums.
pub fn check_versions(requires: &Requirements, host: &str, plugin: &str) -> TransferResult<()> {
	check_component("host", &requires.host, host)?;
	check_component("plugin", &requires.plugin, plugin)
}

fn check_component(component: &'static str, required: &str, actual: &str) -> TransferResult<()> {
	let required_version = parse_version(required)
		.map_err(|e| TransferError::InvalidManifest(format!("requires.{component} '{required}': {e}")))?;
	let actual_version = parse_version(actual)
		.map_err(|e| TransferError::Config(format!("{component} version '{actual}': {e}")))?;

	if actual_version < required_version {
		return Err(TransferError::IncompatibleVersion {
			component,
			required: required.to_string(),
			actual: actual.to_string(),
		});
	}
	tracing::debug!(component, required, actual, "version requirement satisfied");
	Ok(())
}
