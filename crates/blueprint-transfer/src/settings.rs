//! Transfer settings.
//!
//! Settings are read from a TOML file; any key left out keeps its default.
//!
//! ```toml
//! host_version = "6.4.0"
//! staging_dir = "/var/tmp/blueprint"
//! default_taxonomies = ["category"]
//! option_keys = ["site_name"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TransferError, TransferResult};

/// Version of this crate, reported as the running plugin version.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default host version reported when none is configured.
pub const DEFAULT_HOST_VERSION: &str = "6.4.0";

/// Environment and file layout used by export, import and reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
	/// Version of the running host.
	pub host_version: String,
	/// Version of the running plugin.
	pub plugin_version: String,
	/// Where archives are unpacked during import.
	pub staging_dir: PathBuf,
	/// Where exported archives are written.
	pub output_dir: PathBuf,
	/// Manifest file name at the archive root.
	pub manifest_file: String,
	/// Taxonomies whose assignments are always exported.
	pub default_taxonomies: Vec<String>,
	/// Host options copied into exports.
	pub option_keys: Vec<String>,
	/// Replace existing host options on import instead of reporting a conflict.
	pub overwrite_options: bool,
}

impl Default for TransferSettings {
	fn default() -> Self {
		Self {
			host_version: DEFAULT_HOST_VERSION.to_string(),
			plugin_version: PLUGIN_VERSION.to_string(),
			staging_dir: std::env::temp_dir().join("blueprint"),
			output_dir: PathBuf::from("."),
			manifest_file: "manifest.json".to_string(),
			default_taxonomies: vec!["category".to_string()],
			option_keys: Vec::new(),
			overwrite_options: false,
		}
	}
}

impl TransferSettings {
	/// Creates default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from TOML text.
	pub fn from_toml_str(content: &str) -> TransferResult<Self> {
		toml::from_str(content).map_err(|e| TransferError::Config(e.to_string()))
	}

	/// Loads settings from a TOML file.
	pub fn from_toml_file(path: &Path) -> TransferResult<Self> {
		let content = fs::read_to_string(path).map_err(|e| TransferError::io(path, e))?;
		let settings = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), "loaded transfer settings");
		Ok(settings)
	}

	/// Sets the running host version.
	pub fn with_host_version(mut self, version: impl Into<String>) -> Self {
		self.host_version = version.into();
		self
	}

	/// Sets the running plugin version.
	pub fn with_plugin_version(mut self, version: impl Into<String>) -> Self {
		self.plugin_version = version.into();
		self
	}

	/// Sets the staging directory.
	pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.staging_dir = dir.into();
		self
	}

	/// Sets the output directory.
	pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.output_dir = dir.into();
		self
	}

	/// Sets the manifest file name.
	pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
		self.manifest_file = name.into();
		self
	}

	/// Sets the taxonomies always exported.
	pub fn with_default_taxonomies(mut self, taxonomies: Vec<String>) -> Self {
		self.default_taxonomies = taxonomies;
		self
	}

	/// Sets the host options copied into exports.
	pub fn with_option_keys(mut self, keys: Vec<String>) -> Self {
		self.option_keys = keys;
		self
	}

	/// Sets whether imports replace existing options.
	pub fn with_overwrite_options(mut self, overwrite: bool) -> Self {
		self.overwrite_options = overwrite;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = TransferSettings::default();

		assert_eq!(settings.host_version, "6.4.0");
		assert_eq!(settings.plugin_version, PLUGIN_VERSION);
		assert_eq!(settings.manifest_file, "manifest.json");
		assert_eq!(settings.default_taxonomies, vec!["category".to_string()]);
		assert!(!settings.overwrite_options);
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		let settings = TransferSettings::from_toml_str(
			r#"
host_version = "5.9"
option_keys = ["site_name", "site_tagline"]
"#,
		)
		.unwrap();

		assert_eq!(settings.host_version, "5.9");
		assert_eq!(settings.option_keys.len(), 2);
		assert_eq!(settings.manifest_file, "manifest.json");
	}

	#[rstest]
	fn test_from_toml_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("blueprint.toml");
		std::fs::write(&path, "overwrite_options = true\n").unwrap();

		let settings = TransferSettings::from_toml_file(&path).unwrap();

		assert!(settings.overwrite_options);
	}

	#[rstest]
	fn test_invalid_toml_is_config_error() {
		let result = TransferSettings::from_toml_str("host_version = [");
		assert!(matches!(result, Err(TransferError::Config(_))));
	}

	#[rstest]
	fn test_builder_overrides() {
		let settings = TransferSettings::new()
			.with_host_version("7.0")
			.with_staging_dir("/tmp/stage")
			.with_overwrite_options(true);

		assert_eq!(settings.host_version, "7.0");
		assert_eq!(settings.staging_dir, PathBuf::from("/tmp/stage"));
		assert!(settings.overwrite_options);
	}
}
