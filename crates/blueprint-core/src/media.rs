//! Media items and derived renditions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Host identifier of a media item.
pub type MediaId = u64;

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
	/// Host identifier.
	pub id: MediaId,
	/// Original file name.
	pub filename: String,
	/// MIME type detected from the file name.
	pub mime_type: String,
	/// Display title.
	pub title: String,
	/// Location relative to the media root.
	pub file: PathBuf,
	/// File size in bytes.
	pub size: u64,
	/// Derived renditions.
	#[serde(default)]
	pub renditions: Vec<Rendition>,
}

impl MediaItem {
	/// Returns true for image MIME types.
	pub fn is_image(&self) -> bool {
		self.mime_type.starts_with("image/")
	}
}

/// A resized copy of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendition {
	/// Size name (e.g. "thumbnail").
	pub name: String,
	/// Actual width in pixels.
	pub width: u32,
	/// Actual height in pixels.
	pub height: u32,
	/// Location relative to the media root.
	pub file: PathBuf,
}

/// A named rendition size the host generates for every image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionSize {
	/// Size name.
	pub name: String,
	/// Maximum width in pixels.
	pub width: u32,
	/// Maximum height in pixels.
	pub height: u32,
}

impl RenditionSize {
	/// Creates a size.
	pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
		Self {
			name: name.into(),
			width,
			height,
		}
	}

	/// Sizes a stock host generates.
	pub fn defaults() -> Vec<Self> {
		vec![Self::new("thumbnail", 150, 150), Self::new("medium", 300, 300)]
	}
}

/// Detects a MIME type from a file name's extension.
pub fn mime_type_for(filename: &str) -> String {
	mime_guess::from_path(filename).first_or_octet_stream().to_string()
}

/// Writes one thumbnail per size next to `source` and describes them.
///
/// Returns an empty list when the file cannot be decoded as an image.
pub(crate) fn render_thumbnails(
	media_root: &Path,
	item: &MediaItem,
	sizes: &[RenditionSize],
) -> CoreResult<Vec<Rendition>> {
	let source = media_root.join(&item.file);
	let image = match image::open(&source) {
		Ok(image) => image,
		Err(e) => {
			tracing::debug!(media_id = item.id, error = %e, "media is not a decodable image, skipping renditions");
			return Ok(Vec::new());
		}
	};

	let stem = Path::new(&item.filename)
		.file_stem()
		.and_then(|s| s.to_str())
		.unwrap_or("media");
	let ext = Path::new(&item.filename)
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("png");
	let dir = item.file.parent().map(Path::to_path_buf).unwrap_or_default();

	let mut renditions = Vec::with_capacity(sizes.len());
	for size in sizes {
		let thumb = image.thumbnail(size.width, size.height);
		let file = dir.join(format!("{stem}-{}x{}.{ext}", thumb.width(), thumb.height()));
		let target = media_root.join(&file);
		thumb
			.save(&target)
			.map_err(|e| CoreError::Storage(format!("failed to write rendition {}: {e}", target.display())))?;
		renditions.push(Rendition {
			name: size.name.clone(),
			width: thumb.width(),
			height: thumb.height(),
			file,
		});
	}
	Ok(renditions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("photo.JPG", "image/jpeg")]
	#[case("scan.pdf", "application/pdf")]
	#[case("noext", "application/octet-stream")]
	fn test_mime_type_for(#[case] filename: &str, #[case] expected: &str) {
		assert_eq!(mime_type_for(filename), expected);
	}

	#[rstest]
	fn test_render_thumbnails_skips_non_images() {
		let root = tempfile::tempdir().unwrap();
		std::fs::write(root.path().join("notes.txt"), b"not an image").unwrap();
		let item = MediaItem {
			id: 1,
			filename: "notes.txt".to_string(),
			mime_type: "text/plain".to_string(),
			title: "notes".to_string(),
			file: PathBuf::from("notes.txt"),
			size: 12,
			renditions: Vec::new(),
		};

		let renditions = render_thumbnails(root.path(), &item, &RenditionSize::defaults()).unwrap();
		assert!(renditions.is_empty());
	}

	#[rstest]
	fn test_render_thumbnails_for_png() {
		let root = tempfile::tempdir().unwrap();
		let img = image::RgbImage::from_pixel(400, 200, image::Rgb([200, 10, 10]));
		img.save(root.path().join("wide.png")).unwrap();
		let item = MediaItem {
			id: 1,
			filename: "wide.png".to_string(),
			mime_type: "image/png".to_string(),
			title: "wide".to_string(),
			file: PathBuf::from("wide.png"),
			size: 0,
			renditions: Vec::new(),
		};

		let renditions = render_thumbnails(root.path(), &item, &[RenditionSize::new("thumbnail", 150, 150)]).unwrap();

		assert_eq!(renditions.len(), 1);
		assert_eq!(renditions[0].width, 150);
		assert_eq!(renditions[0].height, 75);
		assert!(root.path().join(&renditions[0].file).exists());
	}
}
