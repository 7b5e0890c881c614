//! Zip packaging of staged export directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{TransferError, TransferResult};

/// File name used when a blueprint name sanitizes to nothing.
const FALLBACK_NAME: &str = "blueprint";

/// Sanitized archive file name for a blueprint name.
pub fn archive_file_name(name: &str) -> String {
	let slug = slug::slugify(name);
	if slug.is_empty() {
		format!("{FALLBACK_NAME}.zip")
	} else {
		format!("{slug}.zip")
	}
}

/// Packs every file under `dir` into `{parent of dir}/{sanitized name}.zip`.
///
/// Entry names are relative to `dir` and use `/` separators. An existing file
/// at the target path is overwritten.
pub fn zip_archive(dir: &Path, name: &str) -> TransferResult<PathBuf> {
	let parent = dir.parent().unwrap_or_else(|| Path::new("."));
	let target = parent.join(archive_file_name(name));

	let mut files = Vec::new();
	for entry in WalkDir::new(dir).sort_by_file_name() {
		let entry = entry.map_err(|e| {
			let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
			TransferError::io(path, io::Error::other(e.to_string()))
		})?;
		if entry.file_type().is_file() {
			files.push(entry.into_path());
		}
	}

	let file = fs::File::create(&target).map_err(|e| TransferError::io(&target, e))?;
	let mut writer = ZipWriter::new(file);
	let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

	for path in &files {
		let relative = path
			.strip_prefix(dir)
			.map_err(|e| TransferError::InvalidManifest(e.to_string()))?;
		let entry_name = relative.to_string_lossy().replace('\\', "/");
		writer.start_file(entry_name, options)?;
		let mut source = fs::File::open(path).map_err(|e| TransferError::io(path, e))?;
		io::copy(&mut source, &mut writer).map_err(|e| TransferError::io(path, e))?;
	}
	writer.finish()?;

	tracing::info!(archive = %target.display(), files = files.len(), "wrote archive");
	Ok(target)
}

/// Unpacks an archive into a fresh directory under `staging_root`.
///
/// Entries whose names would land outside the staging directory make the
/// whole archive invalid. On any failure the staging directory is removed.
pub fn unzip_archive(archive: &Path, staging_root: &Path) -> TransferResult<PathBuf> {
	let file = fs::File::open(archive).map_err(|e| TransferError::io(archive, e))?;
	let mut zip = ZipArchive::new(file)?;

	let staging = staging_root.join(format!("import-{}", uuid::Uuid::new_v4()));
	fs::create_dir_all(&staging).map_err(|e| TransferError::io(&staging, e))?;

	if let Err(e) = extract_entries(&mut zip, &staging) {
		if let Err(cleanup) = fs::remove_dir_all(&staging) {
			tracing::warn!(path = %staging.display(), error = %cleanup, "failed to remove staging directory");
		}
		return Err(e);
	}

	tracing::info!(archive = %archive.display(), staging = %staging.display(), entries = zip.len(), "unpacked archive");
	Ok(staging)
}

fn extract_entries(zip: &mut ZipArchive<fs::File>, staging: &Path) -> TransferResult<()> {
	for index in 0..zip.len() {
		let mut entry = zip.by_index(index)?;
		let relative = entry
			.enclosed_name()
			.map(Path::to_path_buf)
			.ok_or_else(|| TransferError::InvalidManifest(format!("unsafe archive entry '{}'", entry.name())))?;
		let out_path = staging.join(relative);

		if entry.is_dir() {
			fs::create_dir_all(&out_path).map_err(|e| TransferError::io(&out_path, e))?;
			continue;
		}
		if let Some(parent) = out_path.parent() {
			fs::create_dir_all(parent).map_err(|e| TransferError::io(parent, e))?;
		}
		let mut out = fs::File::create(&out_path).map_err(|e| TransferError::io(&out_path, e))?;
		io::copy(&mut entry, &mut out).map_err(|e| TransferError::io(&out_path, e))?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	#[case("My Warren!", "my-warren.zip")]
	#[case("Rabbit", "rabbit.zip")]
	#[case("???", "blueprint.zip")]
	fn test_archive_file_name(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(archive_file_name(name), expected);
	}

	#[rstest]
	fn test_zip_then_unzip_preserves_tree() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		let dir = root.path().join("export");
		fs::create_dir_all(dir.join("media/3")).unwrap();
		fs::write(dir.join("manifest.json"), b"{}").unwrap();
		fs::write(dir.join("media/3/photo.png"), b"png").unwrap();

		// Act
		let archive = zip_archive(&dir, "My Warren").unwrap();
		let staging = unzip_archive(&archive, &root.path().join("staging")).unwrap();

		// Assert
		assert_eq!(archive, root.path().join("my-warren.zip"));
		assert_eq!(fs::read(staging.join("manifest.json")).unwrap(), b"{}");
		assert_eq!(fs::read(staging.join("media/3/photo.png")).unwrap(), b"png");
	}

	#[rstest]
	fn test_unzip_rejects_escaping_entries() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		let archive = root.path().join("evil.zip");
		{
			let mut writer = ZipWriter::new(fs::File::create(&archive).unwrap());
			writer.start_file("manifest.json", FileOptions::default()).unwrap();
			writer.write_all(b"{}").unwrap();
			writer.start_file("../escape.txt", FileOptions::default()).unwrap();
			writer.write_all(b"nope").unwrap();
			writer.finish().unwrap();
		}
		let staging_root = root.path().join("staging");

		// Act
		let result = unzip_archive(&archive, &staging_root);

		// Assert
		assert!(matches!(result, Err(TransferError::InvalidManifest(_))));
		assert!(!root.path().join("escape.txt").exists());
		assert_eq!(fs::read_dir(&staging_root).unwrap().count(), 0);
	}

	#[rstest]
	fn test_unzip_missing_archive_is_io_error() {
		let root = tempfile::tempdir().unwrap();
		let result = unzip_archive(&root.path().join("absent.zip"), root.path());
		assert!(matches!(result, Err(TransferError::Io { .. })));
	}
}
